use serde_json::Value;

use super::FormatOptions;
use crate::{engine::Dictionary, error::Result};

pub fn typescript_declarations(dictionary: &Dictionary, _options: &FormatOptions) -> Result<String> {
    let mut code = String::from("// Auto-generated type definitions, do not edit manually.\n\n");
    for token in &dictionary.all_tokens {
        code.push_str(&format!(
            "export declare const {} = {};\n",
            token.name,
            literal(&token.value)
        ));
    }
    Ok(code)
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => escape_non_ascii(s),
        other => other.to_string(),
    }
}

/// Quotes `text` as an ASCII-only string literal.
///
/// Every UTF-16 code unit outside printable ASCII becomes `\uXXXX`, so
/// characters beyond the BMP turn into a surrogate pair.
pub fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let mut units = [0u16; 2];
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(ch),
            _ => {
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::ResolvedToken, Token};
    use proptest::prelude::*;
    use serde_json::json;

    /// Reads back a literal produced by [`escape_non_ascii`].
    fn unescape(literal: &str) -> String {
        let inner = literal
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .expect("quoted literal");
        let mut units = Vec::new();
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                assert!(ch.is_ascii());
                units.push(ch as u16);
                continue;
            }
            match chars.next() {
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    units.push(u16::from_str_radix(&hex, 16).unwrap());
                }
                Some(escaped) => units.push(escaped as u16),
                None => panic!("dangling backslash"),
            }
        }
        String::from_utf16(&units).unwrap()
    }

    #[test]
    fn escapes() {
        assert_eq!(escape_non_ascii("OK"), "\"OK\"");
        assert_eq!(escape_non_ascii("确定"), "\"\\u786e\\u5b9a\"");
        assert_eq!(escape_non_ascii("café"), "\"caf\\u00e9\"");
        assert_eq!(escape_non_ascii("😀"), "\"\\ud83d\\ude00\"");
        assert_eq!(escape_non_ascii("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(escape_non_ascii("line\nbreak"), "\"line\\u000abreak\"");
    }

    #[test]
    fn declarations() {
        let tokens = [("TextOk", json!("确定")), ("TextLines", json!(2))]
            .into_iter()
            .map(|(name, value)| ResolvedToken {
                name: name.to_string(),
                path: vec![name.to_string()],
                value: value.clone(),
                original: Token::new(value, "text"),
            })
            .collect();
        let code =
            typescript_declarations(&Dictionary { all_tokens: tokens }, &FormatOptions::default())
                .unwrap();
        assert_eq!(
            code,
            "// Auto-generated type definitions, do not edit manually.\n\n\
             export declare const TextOk = \"\\u786e\\u5b9a\";\n\
             export declare const TextLines = 2;\n"
        );
    }

    proptest! {
        #[test]
        fn escaping_round_trips(text in "\\PC*", extra in "[\\x{80}-\\x{10FFFF}]") {
            let text = format!("{text}{extra}");
            let escaped = escape_non_ascii(&text);
            prop_assert!(escaped.is_ascii());
            prop_assert_eq!(unescape(&escaped), text);
        }
    }
}
