//! Matter IDL parser
//!
//! Recursive descent over the token stream from [`crate::lexer`].
//!
//! # Example
//!
//! ```rust
//! use idlgen_core::Parser;
//!
//! let idl = Parser::new()
//!     .parse("client cluster OnOff = 6 { command Off(): DefaultSuccess = 0; }")
//!     .unwrap();
//! assert_eq!(idl.clusters[0].commands[0].name, "Off");
//! ```

use crate::error::{ParseError, Result};
use crate::idl::*;
use crate::lexer::{Token, TokenKind, tokenize};

/// Parser for `.matter` IDL text
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete IDL document
    pub fn parse(&self, text: &str) -> Result<Idl> {
        let tokens = tokenize(text)?;
        tracing::debug!(tokens = tokens.len(), "Tokenized IDL input");

        let mut stream = TokenStream { tokens, pos: 0 };
        let mut idl = Idl::default();

        while !stream.at_end() {
            let keyword = stream.peek_ident().ok_or_else(|| stream.unexpected("a declaration"))?;
            match keyword.as_str() {
                "enum" => idl.enums.push(stream.enum_decl()?),
                "bitmap" => idl.bitmaps.push(stream.bitmap_decl()?),
                "struct" | "request" | "response" => idl.structs.push(stream.struct_decl()?),
                "server" | "client" => idl.clusters.push(stream.cluster_decl()?),
                "endpoint" => idl.endpoints.push(stream.endpoint_decl()?),
                _ => return Err(stream.unexpected("a declaration")),
            }
        }

        Ok(idl)
    }
}

struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    /// Lowercased identifier at the cursor, for keyword matching
    fn peek_ident(&self) -> Option<String> {
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) => Some(name.to_ascii_lowercase()),
            _ => None,
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::at(
                format!("expected {expected}, found {}", token.kind.describe()),
                token.line,
                token.column,
            ),
            None => ParseError::unpositioned(format!(
                "unexpected end of input, expected {expected}"
            )),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_ident().as_deref() == Some(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    fn ident(&mut self) -> Result<String> {
        if let Some(TokenKind::Ident(name)) = self.peek_kind() {
            let name = name.clone();
            self.pos += 1;
            return Ok(name);
        }
        Err(self.unexpected("an identifier"))
    }

    fn int(&mut self) -> Result<u64> {
        match self.peek_kind() {
            Some(&TokenKind::Int(value)) => {
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.unexpected("an integer")),
        }
    }

    /// `= INT`
    fn code(&mut self) -> Result<u64> {
        self.expect(TokenKind::Eq)?;
        self.int()
    }

    /// `{ (ID = INT ;)* }`
    fn constant_entries(&mut self) -> Result<Vec<ConstantEntry>> {
        self.expect(TokenKind::LBrace)?;
        let mut entries = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let name = self.ident()?;
            let code = self.code()?;
            self.expect(TokenKind::Semi)?;
            entries.push(ConstantEntry { name, code });
        }
        Ok(entries)
    }

    fn enum_decl(&mut self) -> Result<Enum> {
        self.expect_keyword("enum")?;
        let name = self.ident()?;
        self.expect(TokenKind::Colon)?;
        let base_type = self.ident()?;
        let entries = self.constant_entries()?;
        Ok(Enum {
            name,
            base_type,
            entries,
        })
    }

    fn bitmap_decl(&mut self) -> Result<Bitmap> {
        self.expect_keyword("bitmap")?;
        let name = self.ident()?;
        self.expect(TokenKind::Colon)?;
        let base_type = self.ident()?;
        let entries = self.constant_entries()?;
        Ok(Bitmap {
            name,
            base_type,
            entries,
        })
    }

    fn field(&mut self) -> Result<Field> {
        let mut qualities = FieldQualities::default();
        loop {
            if self.eat_keyword("optional") {
                qualities.optional = true;
            } else if self.eat_keyword("nullable") {
                qualities.nullable = true;
            } else if self.eat_keyword("fabric_sensitive") {
                qualities.fabric_sensitive = true;
            } else {
                break;
            }
        }

        let data_type = self.ident()?;
        let max_length = if self.eat(&TokenKind::Lt) {
            let length = self.int()?;
            self.expect(TokenKind::Gt)?;
            Some(length)
        } else {
            None
        };

        let name = self.ident()?;
        let is_list = if self.eat(&TokenKind::LBracket) {
            self.expect(TokenKind::RBracket)?;
            true
        } else {
            false
        };

        let code = self.code()?;
        self.expect(TokenKind::Semi)?;

        Ok(Field {
            data_type,
            max_length,
            name,
            code,
            is_list,
            qualities,
        })
    }

    fn fields(&mut self) -> Result<Vec<Field>> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            fields.push(self.field()?);
        }
        Ok(fields)
    }

    fn struct_decl(&mut self) -> Result<Struct> {
        let role = if self.eat_keyword("request") {
            Some("request")
        } else if self.eat_keyword("response") {
            Some("response")
        } else {
            None
        };
        self.expect_keyword("struct")?;
        let name = self.ident()?;

        let tag = match role {
            Some("request") => StructTag::Request,
            Some(_) => StructTag::Response(self.code()?),
            None => StructTag::Regular,
        };

        let fields = self.fields()?;
        Ok(Struct { name, tag, fields })
    }

    fn event_decl(&mut self) -> Result<Event> {
        let fabric_sensitive = self.eat_keyword("fabric_sensitive");
        let priority = match self.peek_ident().as_deref() {
            Some("critical") => EventPriority::Critical,
            Some("info") => EventPriority::Info,
            Some("debug") => EventPriority::Debug,
            _ => return Err(self.unexpected("an event priority")),
        };
        self.pos += 1;
        self.expect_keyword("event")?;

        let name = self.ident()?;
        let code = self.code()?;
        let fields = self.fields()?;
        Ok(Event {
            priority,
            name,
            code,
            fabric_sensitive,
            fields,
        })
    }

    fn attribute_decl(&mut self) -> Result<Attribute> {
        let mut readonly = false;
        let mut nodefault = false;
        loop {
            if self.eat_keyword("readonly") {
                readonly = true;
            } else if self.eat_keyword("nodefault") {
                nodefault = true;
            } else {
                break;
            }
        }
        self.expect_keyword("attribute")?;
        let definition = self.field()?;
        Ok(Attribute {
            definition,
            readonly,
            nodefault,
        })
    }

    fn command_decl(&mut self) -> Result<Command> {
        let timed = self.eat_keyword("timed");
        self.expect_keyword("command")?;
        let name = self.ident()?;

        self.expect(TokenKind::LParen)?;
        let input_param = if self.eat(&TokenKind::RParen) {
            None
        } else {
            let param = self.ident()?;
            self.expect(TokenKind::RParen)?;
            Some(param)
        };

        self.expect(TokenKind::Colon)?;
        let output_param = self.ident()?;
        let code = self.code()?;
        self.expect(TokenKind::Semi)?;

        Ok(Command {
            name,
            code,
            input_param,
            output_param,
            timed,
        })
    }

    fn cluster_decl(&mut self) -> Result<Cluster> {
        let side = if self.eat_keyword("server") {
            ClusterSide::Server
        } else {
            self.expect_keyword("client")?;
            ClusterSide::Client
        };
        self.expect_keyword("cluster")?;
        let name = self.ident()?;
        let code = self.code()?;

        let mut cluster = Cluster {
            side,
            name,
            code,
            enums: Vec::new(),
            bitmaps: Vec::new(),
            structs: Vec::new(),
            events: Vec::new(),
            attributes: Vec::new(),
            commands: Vec::new(),
        };

        self.expect(TokenKind::LBrace)?;
        while !self.eat(&TokenKind::RBrace) {
            let keyword = self
                .peek_ident()
                .ok_or_else(|| self.unexpected("a cluster member"))?;
            match keyword.as_str() {
                "enum" => cluster.enums.push(self.enum_decl()?),
                "bitmap" => cluster.bitmaps.push(self.bitmap_decl()?),
                "struct" | "request" | "response" => cluster.structs.push(self.struct_decl()?),
                "critical" | "info" | "debug" => cluster.events.push(self.event_decl()?),
                "readonly" | "nodefault" | "attribute" => {
                    cluster.attributes.push(self.attribute_decl()?)
                }
                "timed" | "command" => cluster.commands.push(self.command_decl()?),
                "fabric_sensitive" => {
                    // Only events take a leading fabric_sensitive at member level.
                    cluster.events.push(self.event_decl()?)
                }
                _ => return Err(self.unexpected("a cluster member")),
            }
        }

        tracing::trace!(cluster = %cluster.name, "Parsed cluster");
        Ok(cluster)
    }

    fn endpoint_decl(&mut self) -> Result<Endpoint> {
        self.expect_keyword("endpoint")?;
        let number = self.int()?;
        self.expect(TokenKind::LBrace)?;

        let mut clusters = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let role = if self.eat_keyword("server") {
                EndpointClusterRole::Server
            } else if self.eat_keyword("binding") {
                EndpointClusterRole::Binding
            } else {
                return Err(self.unexpected("'server' or 'binding'"));
            };
            self.expect_keyword("cluster")?;
            let name = self.ident()?;
            self.expect(TokenKind::Semi)?;
            clusters.push(EndpointCluster { role, name });
        }

        Ok(Endpoint { number, clusters })
    }
}
