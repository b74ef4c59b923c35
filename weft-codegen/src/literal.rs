/// Render `value` as a Rust string literal, quotes included.
///
/// Quotes, backslashes and control characters are escaped, so the result is
/// always a single valid token that evaluates back to `value`.
pub fn rust_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        assert_eq!(rust_str("gen/out"), r#""gen/out""#);
    }

    #[test]
    fn test_escapes_quotes_and_backslashes() {
        assert_eq!(rust_str(r#"C:\out "x""#), r#""C:\\out \"x\"""#);
    }

    #[test]
    fn test_cannot_break_out_of_literal() {
        let hostile = "\"); std::process::exit(0); (\"";
        let lit = rust_str(hostile);
        assert_eq!(lit, r#""\"); std::process::exit(0); (\"""#);
        // Every inner quote is escaped.
        let inner = &lit[1..lit.len() - 1];
        assert!(
            inner
                .match_indices('"')
                .all(|(i, _)| inner.as_bytes()[i - 1] == b'\\')
        );
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(rust_str("a\nb\tc\0"), r#""a\nb\tc\0""#);
        assert_eq!(rust_str("\u{1b}"), r#""\u{1b}""#);
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(rust_str("sortie/données"), "\"sortie/données\"");
    }
}
