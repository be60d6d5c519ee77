//! Layout-preserving XML tree

pub mod encoding;
pub mod escape;
pub mod model;
pub mod parser;
pub mod writer;

pub use encoding::Encoding;
pub use model::{Document, Element, Node, Removed, TrailingText};
pub use parser::Parser;

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::input::Input;

/// Decode and parse a complete document
///
/// The encoding comes from the XML declaration, defaulting to UTF-8. A
/// leading byte-order mark is remembered and written back.
pub fn parse(input: &Input<'_>, config: Config) -> Result<Document> {
    if input.len() > config.max_size {
        return Err(Error::new(
            ErrorKind::MaxSizeExceeded {
                max: config.max_size,
            },
            Span::empty(),
        ));
    }

    let body = input.body();
    let declared = encoding::declared_encoding(body);
    let encoding = match declared.as_deref() {
        Some(label) => Encoding::from_label(label).ok_or_else(|| {
            Error::new(
                ErrorKind::UnsupportedEncoding {
                    encoding: label.to_string(),
                },
                Span::empty(),
            )
        })?,
        None => encoding::DEFAULT_ENCODING,
    };
    debug!(
        file = input.filename().unwrap_or("<memory>"),
        %encoding,
        bytes = input.len(),
        "parsing xml"
    );

    let text = encoding.decode(body)?;
    let mut document = Parser::with_config(text.as_bytes(), config).parse()?;
    document.bom = input.has_bom();
    document.encoding = declared;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latin1_document() -> Result<()> {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><n>caf\xE9</n>";
        let doc = parse(&Input::from_bytes(bytes), Config::default())?;
        assert_eq!(doc.root.text(), "café");
        assert_eq!(doc.encoding(), Encoding::Latin1);
        assert_eq!(doc.to_bytes(), bytes.to_vec());
        Ok(())
    }

    #[test]
    fn test_unsupported_encoding() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"EBCDIC\"?><n/>";
        let err = parse(&Input::from_bytes(bytes), Config::default()).err();
        assert!(matches!(
            err.as_ref().map(Error::kind),
            Some(ErrorKind::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn test_size_limit() {
        let config = Config::default().with_max_size(3);
        let err = parse(&Input::from_str("<abc/>"), config).err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ErrorKind::MaxSizeExceeded { max: 3 })
        );
    }

    #[test]
    fn test_bom_round_trip() -> Result<()> {
        let bytes = b"\xEF\xBB\xBF<a>x</a>";
        let doc = parse(&Input::from_bytes(bytes), Config::default())?;
        assert!(doc.has_bom());
        assert_eq!(doc.to_bytes(), bytes.to_vec());
        Ok(())
    }
}
