//! idlgen Core Library
//!
//! This crate provides the Matter IDL front end for idlgen:
//! - The parsed IDL data model ([`Idl`])
//! - Tokenizer and recursive-descent parser
//! - Positioned parse errors
//!
//! # Example
//!
//! ```rust,ignore
//! use idlgen_core::Parser;
//!
//! let text = std::fs::read_to_string("controller-clusters.matter")?;
//! let idl = Parser::new().parse(&text)?;
//! for cluster in &idl.clusters {
//!     println!("{} = {}", cluster.name, cluster.code);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod idl;
pub mod lexer;
pub mod parser;

pub use error::{ParseError, Result};
pub use idl::Idl;
pub use parser::Parser;
