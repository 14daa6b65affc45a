use super::{FormatOptions, GENERATED_HEADER};
use crate::{engine::Dictionary, error::Result};

/// One `export const` per token, values as JSON literals.
pub fn es6_constants(dictionary: &Dictionary, _options: &FormatOptions) -> Result<String> {
    let mut code = format!("{GENERATED_HEADER}\n");
    for token in &dictionary.all_tokens {
        code.push_str(&format!("export const {} = {};", token.name, token.value));
        if let Some(comment) = token.comment() {
            code.push_str(&format!(" // {comment}"));
        }
        code.push('\n');
    }
    Ok(code)
}

#[test]
fn es6() {
    use crate::{engine::ResolvedToken, Token};
    use serde_json::json;

    let mut original = Token::new("保存", "text");
    original.description = Some("save button".to_string());
    let dictionary = Dictionary {
        all_tokens: vec![ResolvedToken {
            name: "TextSave".to_string(),
            path: vec!["text".to_string(), "save".to_string()],
            value: json!("保存"),
            original,
        }],
    };
    let code = es6_constants(&dictionary, &FormatOptions::default()).unwrap();
    assert!(code.starts_with(GENERATED_HEADER));
    assert!(code.ends_with("export const TextSave = \"保存\"; // save button\n"));
}
