//! XML parser implementation
//!
//! Unlike a data-oriented parser this one keeps whitespace, comments and the
//! raw attribute text, so the resulting [`Document`] writes back unchanged.

use indexmap::{IndexMap, IndexSet};

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::lexer::Cursor;
use crate::lexer::cursor::is_whitespace;
use crate::xml::escape::decode_entities_with;
use crate::xml::model::{Document, Element, Node};

/// XML parser over decoded (UTF-8) text
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    entities: Entities,
}

/// General entities the document type declaration makes available
#[derive(Debug, Default)]
enum Entities {
    /// No DOCTYPE: only the predefined entities
    #[default]
    Predefined,
    /// Names declared in the internal subset
    Declared(IndexSet<String>),
    /// An external subset may declare anything
    External,
}

impl Entities {
    fn from_doctype(body: &str) -> Self {
        let (head, subset) = body.split_once('[').unwrap_or((body, ""));
        if head.contains("SYSTEM") || head.contains("PUBLIC") || subset.contains('%') {
            return Self::External;
        }

        let names = subset
            .split("<!ENTITY")
            .skip(1)
            .filter_map(|decl| decl.split_whitespace().next())
            .map(str::to_string)
            .collect();
        Self::Declared(names)
    }

    fn is_declared(&self, name: &str) -> bool {
        match self {
            Self::Predefined => false,
            Self::Declared(names) => names.contains(name),
            Self::External => true,
        }
    }
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            entities: Entities::Predefined,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        let prolog = self.parse_misc(true)?;

        if self.cursor.is_eof() {
            return Err(self.expected("root element", "end of input"));
        }
        let root = self.parse_element(1)?;

        let epilog = self.parse_misc(false)?;
        if !self.cursor.is_eof() {
            return Err(self.expected("end of input", "element"));
        }

        let mut document = Document::new(root);
        document.prolog = prolog;
        document.epilog = epilog;
        Ok(document)
    }

    /// Whitespace, comments and processing instructions outside the root
    fn parse_misc(&mut self, allow_declarations: bool) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            if self.cursor.starts_with(b"<?") {
                nodes.push(self.parse_processing_instruction()?);
            } else if self.cursor.starts_with(b"<!--") {
                nodes.push(self.parse_comment()?);
            } else if allow_declarations && self.cursor.starts_with(b"<!") {
                let declaration = self.parse_declaration()?;
                if let Node::Declaration(body) = &declaration {
                    if let Some(doctype) = body.strip_prefix("DOCTYPE") {
                        self.entities = Entities::from_doctype(doctype);
                    }
                }
                nodes.push(declaration);
            } else if self.cursor.current().is_some_and(is_whitespace) {
                let start = self.cursor.pos();
                self.cursor.skip_whitespace();
                nodes.push(Node::Text(self.string_from(start)?));
            } else {
                break;
            }
        }

        match self.cursor.current() {
            None | Some(b'<') => Ok(nodes),
            Some(_) => Err(self.expected("markup", "text outside the root element")),
        }
    }

    fn parse_element(&mut self, depth: usize) -> Result<Element> {
        if depth > self.config.max_depth {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                self.cursor.position(),
            ));
        }

        self.expect_byte(b'<')?;
        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes_start = self.cursor.pos();
        let attributes = self.parse_attributes()?;
        let raw_attributes = self.string_from(attributes_start)?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            return Ok(Element::from_parts(
                name,
                attributes,
                raw_attributes,
                true,
                String::new(),
                Vec::new(),
            ));
        }
        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        let close_padding = loop {
            if self.cursor.starts_with(b"</") {
                let pos = self.cursor.position();
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            expected: name,
                            found: close_name,
                        },
                        pos,
                    ));
                }
                let padding_start = self.cursor.pos();
                self.cursor.skip_whitespace();
                let padding = self.string_from(padding_start)?;
                self.expect_byte(b'>')?;
                break padding;
            }

            if self.cursor.starts_with(b"<!--") {
                children.push(self.parse_comment()?);
            } else if self.cursor.starts_with(b"<![CDATA[") {
                children.push(self.parse_cdata()?);
            } else if self.cursor.starts_with(b"<?") {
                children.push(self.parse_processing_instruction()?);
            } else if self.cursor.starts_with(b"<!") {
                return Err(self.error_here("declaration inside element"));
            } else if self.cursor.current() == Some(b'<') {
                children.push(Node::Element(self.parse_element(depth + 1)?));
            } else if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::Unterminated {
                        construct: "element",
                    },
                    Span::at(self.cursor.position()),
                    format!("unterminated element <{name}>"),
                ));
            } else {
                children.push(self.parse_text()?);
            }
        };

        Ok(Element::from_parts(
            name,
            attributes,
            raw_attributes,
            false,
            close_padding,
            children,
        ))
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => {
                    return Err(Error::new(
                        ErrorKind::Unterminated {
                            construct: "start tag",
                        },
                        Span::at(self.cursor.position()),
                    ));
                }
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_kind_here(ErrorKind::DuplicateAttribute { name }));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.expected("quoted attribute value", "unquoted value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.string_from(start)?;
                self.cursor.advance();
                return self.decode(&raw);
            }
            if b == b'<' {
                return Err(self.error_here("'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(Error::new(
            ErrorKind::Unterminated {
                construct: "attribute value",
            },
            Span::at(self.cursor.position()),
        ))
    }

    fn parse_text(&mut self) -> Result<Node> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.string_from(start)?;
        // validated now so that later reads can decode without failing
        self.decode(&raw)?;
        Ok(Node::Text(raw))
    }

    fn parse_comment(&mut self) -> Result<Node> {
        self.cursor.advance_by(4);
        let body = self.take_until(b"-->", "comment")?;
        Ok(Node::Comment(body))
    }

    fn parse_cdata(&mut self) -> Result<Node> {
        self.cursor.advance_by(9);
        let body = self.take_until(b"]]>", "CDATA section")?;
        Ok(Node::CData(body))
    }

    fn parse_processing_instruction(&mut self) -> Result<Node> {
        self.cursor.advance_by(2);
        let body = self.take_until(b"?>", "processing instruction")?;
        Ok(Node::ProcessingInstruction(body))
    }

    /// `<!DOCTYPE ...>`, including an internal subset in brackets
    fn parse_declaration(&mut self) -> Result<Node> {
        self.cursor.advance_by(2);
        let start = self.cursor.pos();
        let mut brackets = 0usize;
        let mut quote = None;

        while let Some(b) = self.cursor.current() {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'>') if brackets == 0 => {
                    let body = self.string_from(start)?;
                    self.cursor.advance();
                    return Ok(Node::Declaration(body));
                }
                _ => {}
            }
            self.cursor.advance();
        }

        Err(Error::new(
            ErrorKind::Unterminated {
                construct: "declaration",
            },
            Span::at(self.cursor.position()),
        ))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.expected("name", "end of input"));
        };
        if !is_name_start(first) {
            return Err(self.error_kind_here(ErrorKind::InvalidToken));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        self.string_from(start)
    }

    /// Consume up to and including `terminator`, returning what came before it
    fn take_until(&mut self, terminator: &[u8], construct: &'static str) -> Result<String> {
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(terminator) {
                let body = self.string_from(start)?;
                self.cursor.advance_by(terminator.len());
                return Ok(body);
            }
            self.cursor.advance();
        }
        Err(Error::new(
            ErrorKind::Unterminated { construct },
            Span::at(self.cursor.position()),
        ))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            return Ok(());
        }
        let found = match self.cursor.current() {
            Some(b) => format!("'{}'", char::from(b)),
            None => "end of input".to_string(),
        };
        Err(self.expected(&format!("'{}'", char::from(expected)), &found))
    }

    fn string_from(&self, start: usize) -> Result<String> {
        std::str::from_utf8(self.cursor.slice_from(start))
            .map(str::to_string)
            .map_err(|_| self.error_kind_here(ErrorKind::InvalidUtf8))
    }

    fn decode(&self, raw: &str) -> Result<String> {
        decode_entities_with(raw, |name| self.entities.is_declared(name)).map_err(|err| {
            Error::with_message(
                err.kind().clone(),
                Span::at(self.cursor.position()),
                err.message(),
            )
        })
    }

    fn expected(&self, expected: &str, found: &str) -> Error {
        self.error_kind_here(ErrorKind::Expected {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }

    fn error_kind_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::at(self.cursor.position()),
            message.to_string(),
        )
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || !b.is_ascii()
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}
