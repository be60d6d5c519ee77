//! Entity decoding and escaping

use crate::error::{Error, ErrorKind, Result, Span};

/// Decode the predefined and numeric character references in `input`
///
/// Other well-formed references (`&name;`) are kept as written: their
/// replacement text belongs to the document type declaration.
pub fn decode_entities(input: &str) -> Result<String> {
    decode_entities_with(input, |_| true)
}

/// Like [`decode_entities`], but only named references accepted by
/// `is_declared` are kept; any other name is an error
pub fn decode_entities_with(input: &str, is_declared: impl Fn(&str) -> bool) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        if !terminated {
            return Err(invalid_entity(&entity));
        }
        match entity.as_str() {
            "amp" => result.push('&'),
            "lt" => result.push('<'),
            "gt" => result.push('>'),
            "quot" => result.push('"'),
            "apos" => result.push('\''),
            name if name.starts_with('#') => match decode_numeric_entity(name) {
                Some(decoded) => result.push(decoded),
                None => return Err(invalid_entity(name)),
            },
            name if is_name(name) && is_declared(name) => {
                result.push('&');
                result.push_str(name);
                result.push(';');
            }
            name => return Err(invalid_entity(name)),
        }
    }

    Ok(result)
}

fn invalid_entity(entity: &str) -> Error {
    Error::with_message(
        ErrorKind::InvalidEntity,
        Span::empty(),
        format!("invalid xml entity: &{entity}"),
    )
}

fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

/// Escape character data for use between tags
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value for use inside double quotes
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_predefined_and_numeric() -> Result<()> {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;")?, "a & b <c>");
        assert_eq!(decode_entities("&#65;&#x42;")?, "AB");
        Ok(())
    }

    #[test]
    fn test_decode_rejects_bare_ampersand() {
        assert!(decode_entities("fish & chips").is_err());
        assert!(decode_entities("fish & chips;").is_err());
        assert!(decode_entities("&;").is_err());
        assert!(decode_entities("&#xZZ;").is_err());
    }

    #[test]
    fn test_named_reference_kept_verbatim() -> Result<()> {
        assert_eq!(decode_entities("v&version;-&amp;")?, "v&version;-&");
        Ok(())
    }

    #[test]
    fn test_undeclared_reference_rejected() -> Result<()> {
        let declared = |name: &str| name == "version";
        assert_eq!(decode_entities_with("&version;", declared)?, "&version;");
        assert!(decode_entities_with("&nbsp;", declared).is_err());
        Ok(())
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("1 < 2 & 3"), "1 &lt; 2 &amp; 3");
        assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
    }
}
