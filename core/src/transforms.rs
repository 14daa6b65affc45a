use convert_case::{Case, Casing};
use csscolorparser::Color;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Token;

/// The naming and value transforms applied to one platform's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformGroup {
    /// kebab-case names, colors as hex or `rgba()`.
    Css,
    /// PascalCase names, colors as hex.
    Js,
}
impl TransformGroup {
    pub fn name(&self, path: &[String]) -> String {
        let joined = path.iter().map(|segment| slugify(segment)).join(" ");
        match self {
            TransformGroup::Css => joined.to_case(Case::Kebab),
            TransformGroup::Js => joined.to_case(Case::Pascal),
        }
    }
    pub fn value(&self, token: &Token) -> Value {
        let value = token.value().cloned().unwrap_or(Value::Null);
        if token.kind() != Some("color") {
            return value;
        }
        match &value {
            Value::String(raw) => match csscolorparser::parse(raw) {
                Ok(color) => Value::String(match self {
                    TransformGroup::Css => css_color(&color),
                    TransformGroup::Js => color.to_hex_string(),
                }),
                Err(_) => value,
            },
            _ => value,
        }
    }
}

fn css_color(color: &Color) -> String {
    if color.a < 1.0 {
        color.to_rgb_string()
    } else {
        color.to_hex_string()
    }
}

pub(crate) fn slugify(s: &str) -> String {
    deunicode::deunicode(
        &s.replace(',', "c")
            .replace('+', "p")
            .replace('.', "d")
            .replace(|c: char| matches!(c, '(' | ')' | '/'), " "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn names() {
        let p = path(&["Button", "padding", "small"]);
        assert_eq!(TransformGroup::Css.name(&p), "button-padding-small");
        assert_eq!(TransformGroup::Js.name(&p), "ButtonPaddingSmall");
        let p = path(&["text", "pageTitle"]);
        assert_eq!(TransformGroup::Css.name(&p), "text-page-title");
        assert_eq!(TransformGroup::Js.name(&p), "TextPageTitle");
        assert_eq!(TransformGroup::Css.name(&path(&["Font Size"])), "font-size");
    }

    #[test]
    fn colors() {
        let red = Token::new("red", "color");
        assert_eq!(TransformGroup::Css.value(&red), json!("#ff0000"));
        assert_eq!(TransformGroup::Js.value(&red), json!("#ff0000"));

        let shade = Token::new("rgba(0, 0, 0, 0.5)", "color");
        let Value::String(css) = TransformGroup::Css.value(&shade) else {
            panic!("expected a string");
        };
        assert!(css.starts_with("rgba("));

        let reference = Token::new("{color.base}", "color");
        assert_eq!(TransformGroup::Css.value(&reference), json!("{color.base}"));
    }

    #[test]
    fn non_colors_pass_through() {
        assert_eq!(TransformGroup::Css.value(&Token::new("red", "text")), json!("red"));
        assert_eq!(TransformGroup::Css.value(&Token::new(1.5, "number")), json!(1.5));
        assert_eq!(TransformGroup::Css.value(&Token::default()), Value::Null);
    }
}
