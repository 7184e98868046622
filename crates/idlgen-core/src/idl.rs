//! Matter IDL data model
//!
//! The parsed form of a `.matter` file. Backends render from this tree;
//! the pipeline itself treats it as opaque.

use serde::Serialize;

/// A complete parsed IDL file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Idl {
    /// Enums declared at file scope
    pub enums: Vec<Enum>,

    /// Bitmaps declared at file scope
    pub bitmaps: Vec<Bitmap>,

    /// Structs declared at file scope
    pub structs: Vec<Struct>,

    /// Server and client clusters, in declaration order
    pub clusters: Vec<Cluster>,

    /// Endpoint compositions
    pub endpoints: Vec<Endpoint>,
}

/// Which side of the interaction a cluster describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSide {
    /// Implemented by the device
    Server,
    /// Used by a controller talking to the device
    Client,
}

/// A cluster definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cluster {
    /// Server or client
    pub side: ClusterSide,

    /// Cluster name, e.g. `OnOff`
    pub name: String,

    /// Cluster id
    pub code: u64,

    /// Cluster-scoped enums
    pub enums: Vec<Enum>,

    /// Cluster-scoped bitmaps
    pub bitmaps: Vec<Bitmap>,

    /// Cluster-scoped structs (including command payloads)
    pub structs: Vec<Struct>,

    /// Events
    pub events: Vec<Event>,

    /// Attributes
    pub attributes: Vec<Attribute>,

    /// Commands
    pub commands: Vec<Command>,
}

/// One named constant inside an enum or bitmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantEntry {
    /// Entry name
    pub name: String,

    /// Numeric value
    pub code: u64,
}

/// An enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    /// Enum name
    pub name: String,

    /// Underlying integer type, e.g. `ENUM8`
    pub base_type: String,

    /// Entries in declaration order
    pub entries: Vec<ConstantEntry>,
}

/// A bitmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bitmap {
    /// Bitmap name
    pub name: String,

    /// Underlying integer type, e.g. `BITMAP8`
    pub base_type: String,

    /// Flag entries in declaration order
    pub entries: Vec<ConstantEntry>,
}

/// Field-level qualifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldQualities {
    /// Field may be absent
    pub optional: bool,

    /// Field may be null
    pub nullable: bool,

    /// Field is scoped to a fabric
    pub fabric_sensitive: bool,
}

/// A typed, numbered field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Data type name, e.g. `INT8U` or a struct name
    pub data_type: String,

    /// Maximum length for strings and octet strings, from `TYPE<N>`
    pub max_length: Option<u64>,

    /// Field name
    pub name: String,

    /// Field id
    pub code: u64,

    /// Whether this is a list (`name[]`)
    pub is_list: bool,

    /// Qualifiers
    pub qualities: FieldQualities,
}

/// Role of a struct in a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "lowercase")]
pub enum StructTag {
    /// Plain data struct
    Regular,
    /// Payload of a command request
    Request,
    /// Payload of a command response, with its command id
    Response(u64),
}

/// A struct definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Struct {
    /// Struct name
    pub name: String,

    /// Role
    pub tag: StructTag,

    /// Members
    pub fields: Vec<Field>,
}

/// Event priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
    /// Critical
    Critical,
    /// Informational
    Info,
    /// Debug
    Debug,
}

/// An event definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Priority
    pub priority: EventPriority,

    /// Event name
    pub name: String,

    /// Event id
    pub code: u64,

    /// Whether the event is fabric sensitive
    pub fabric_sensitive: bool,

    /// Payload fields
    pub fields: Vec<Field>,
}

/// An attribute definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// The attribute's field declaration (type, name, id)
    pub definition: Field,

    /// Declared `readonly`
    pub readonly: bool,

    /// Declared `nodefault`
    pub nodefault: bool,
}

/// A command definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Command name
    pub name: String,

    /// Command id
    pub code: u64,

    /// Request payload struct, if any
    pub input_param: Option<String>,

    /// Response name (a response struct or `DefaultSuccess`)
    pub output_param: String,

    /// Requires a timed interaction
    pub timed: bool,
}

/// How a cluster is placed on an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointClusterRole {
    /// Cluster served by the endpoint
    Server,
    /// Cluster bound for outgoing interactions
    Binding,
}

/// A cluster instance on an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointCluster {
    /// Role on the endpoint
    pub role: EndpointClusterRole,

    /// Referenced cluster name
    pub name: String,
}

/// An endpoint composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Endpoint number
    pub number: u64,

    /// Clusters placed on the endpoint
    pub clusters: Vec<EndpointCluster>,
}

impl Idl {
    /// Iterate over clusters on the given side
    pub fn clusters_on(&self, side: ClusterSide) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |c| c.side == side)
    }
}

impl Attribute {
    /// Attribute name
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Attribute id
    pub fn code(&self) -> u64 {
        self.definition.code
    }
}
