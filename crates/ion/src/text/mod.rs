//! Ion text encoding: a compact/pretty writer and a structural reader.

mod reader;
mod writer;

pub use reader::TextReader;
pub use writer::TextWriter;

/// Words that cannot be written as bare symbols.
const KEYWORDS: [&str; 4] = ["null", "true", "false", "nan"];

/// Returns `true` when `text` can be written as an unquoted symbol.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') && !KEYWORDS.contains(&text)
}

#[cfg(test)]
mod tests {
    use super::is_identifier;

    #[test]
    fn identifiers() {
        assert!(is_identifier("id"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("$ion_1_0"));
        assert!(is_identifier("a1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("a:b"));
        assert!(!is_identifier("null"));
        assert!(!is_identifier("nan"));
    }
}
