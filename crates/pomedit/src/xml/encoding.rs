//! Character encodings accepted in the XML declaration

use std::fmt;

use crate::error::{Error, ErrorKind, Pos, Result};

/// Encoding assumed when the document does not declare one
pub const DEFAULT_ENCODING: Encoding = Encoding::Utf8;

/// Supported document encodings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    /// Resolve an encoding label as written in `<?xml encoding="..."?>`
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "us-ascii" | "ascii" => Some(Self::Ascii),
            "iso-8859-1" | "iso8859-1" | "iso_8859-1" | "latin1" | "latin-1" | "l1" => {
                Some(Self::Latin1)
            }
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
        }
    }

    /// Decode raw document bytes into text
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(text.to_string()),
                Err(err) => Err(Error::at(
                    ErrorKind::InvalidUtf8,
                    pos_of(bytes, err.valid_up_to()),
                )),
            },
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    crate::error::Span::at(pos_of(bytes, offset)),
                    "byte outside US-ASCII",
                )),
                None => Ok(bytes.iter().copied().map(char::from).collect()),
            },
            Self::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
        }
    }

    /// Encode text, writing unrepresentable characters as numeric references
    pub fn encode(self, text: &str) -> Vec<u8> {
        let limit = match self {
            Self::Utf8 => return text.as_bytes().to_vec(),
            Self::Ascii => 0x7F,
            Self::Latin1 => 0xFF,
        };
        let mut out = Vec::with_capacity(text.len());
        for ch in text.chars() {
            match u8::try_from(u32::from(ch)) {
                Ok(byte) if u32::from(ch) <= limit => out.push(byte),
                _ => out.extend_from_slice(format!("&#{};", u32::from(ch)).as_bytes()),
            }
        }
        out
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read the encoding label from a leading `<?xml ...?>` declaration
///
/// The declaration is pure ASCII in every supported encoding, so this runs
/// on raw bytes before decoding.
pub fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let rest = bytes.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(rest.get(..end)?).ok()?;

    let after = decl.split_once("encoding")?.1.trim_start();
    let after = after.strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = after.get(1..)?;
    let close = value.find(quote)?;
    value.get(..close).map(str::to_string)
}

fn pos_of(bytes: &[u8], offset: usize) -> Pos {
    let prefix = bytes.get(..offset).unwrap_or(bytes);
    let line = prefix.iter().filter(|b| **b == b'\n').count();
    let col = prefix
        .iter()
        .rev()
        .take_while(|b| **b != b'\n')
        .count();
    Pos::new(
        offset,
        u32::try_from(line + 1).unwrap_or(u32::MAX),
        u32::try_from(col + 1).unwrap_or(u32::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_encoding() {
        let xml = b"<?xml version=\"1.0\" encoding='ISO-8859-1'?><a/>";
        assert_eq!(declared_encoding(xml), Some("ISO-8859-1".to_string()));
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><a/>"), None);
        assert_eq!(declared_encoding(b"<a/>"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Encoding::from_label("utf-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_label(" UTF-8 "), Some(Encoding::Utf8));
        assert_eq!(Encoding::from_label("Latin1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::from_label("Shift_JIS"), None);
    }

    #[test]
    fn test_latin1_round_trip() -> Result<()> {
        let bytes = b"caf\xE9";
        let text = Encoding::Latin1.decode(bytes)?;
        assert_eq!(text, "café");
        assert_eq!(Encoding::Latin1.encode(&text), bytes.to_vec());
        Ok(())
    }

    #[test]
    fn test_unrepresentable_becomes_reference() {
        assert_eq!(Encoding::Ascii.encode("a\u{e9}"), b"a&#233;".to_vec());
        assert_eq!(Encoding::Latin1.encode("\u{20ac}"), b"&#8364;".to_vec());
    }

    #[test]
    fn test_invalid_utf8_position() {
        let err = Encoding::Utf8.decode(b"<a>\n\xFF</a>").err();
        let pos = err.map(|e| e.span().start);
        assert_eq!(pos, Some(Pos::new(4, 2, 1)));
    }
}
