//! Tokenizer for Matter IDL text
//!
//! Keywords are not distinguished here; the parser matches identifiers
//! against them contextually.

use crate::error::{ParseError, Result};

/// Token types for Matter IDL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Ident(String),
    /// Decimal or `0x` hexadecimal integer
    Int(u64),

    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Lt,       // <
    Gt,       // >
    Semi,     // ;
    Colon,    // :
    Eq,       // =
    Comma,    // ,
}

/// A token with its 1-based source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Line of the first character
    pub line: usize,
    /// Column of the first character
    pub column: usize,
}

impl TokenKind {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("'{name}'"),
            TokenKind::Int(value) => format!("integer {value}"),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::Semi => "';'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool, out: &mut String) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
    }
}

/// Split IDL text into tokens, dropping whitespace and comments
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut cursor = Cursor::new(text);
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek() {
        let (line, column) = (cursor.line, cursor.column);

        if c.is_whitespace() {
            cursor.bump();
            continue;
        }

        if c == '/' {
            cursor.bump();
            match cursor.peek() {
                Some('/') => {
                    while let Some(c) = cursor.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('*') => {
                    cursor.bump();
                    let mut prev = '\0';
                    loop {
                        match cursor.bump() {
                            Some('/') if prev == '*' => break,
                            Some(c) => prev = c,
                            None => {
                                return Err(ParseError::at(
                                    "unterminated block comment",
                                    line,
                                    column,
                                ));
                            }
                        }
                    }
                }
                _ => return Err(ParseError::at("unexpected character '/'", line, column)),
            }
            continue;
        }

        let kind = if c.is_ascii_alphabetic() || c == '_' {
            let mut ident = String::new();
            cursor.eat_while(|c| c.is_ascii_alphanumeric() || c == '_', &mut ident);
            TokenKind::Ident(ident)
        } else if c.is_ascii_digit() {
            let mut digits = String::new();
            cursor.eat_while(|c| c.is_ascii_alphanumeric(), &mut digits);
            TokenKind::Int(parse_int(&digits).ok_or_else(|| {
                ParseError::at(format!("invalid integer literal '{digits}'"), line, column)
            })?)
        } else {
            cursor.bump();
            match c {
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '<' => TokenKind::Lt,
                '>' => TokenKind::Gt,
                ';' => TokenKind::Semi,
                ':' => TokenKind::Colon,
                '=' => TokenKind::Eq,
                ',' => TokenKind::Comma,
                other => {
                    return Err(ParseError::at(
                        format!("unexpected character '{other}'"),
                        line,
                        column,
                    ));
                }
            }
        };

        tokens.push(Token { kind, line, column });
    }

    Ok(tokens)
}

fn parse_int(literal: &str) -> Option<u64> {
    match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => literal.parse().ok(),
    }
}
