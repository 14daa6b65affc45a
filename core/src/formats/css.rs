use itertools::Itertools;

use super::{plain_value, FormatOptions, GENERATED_HEADER};
use crate::{
    engine::{Dictionary, ResolvedToken},
    error::Result,
    units::{is_dimension, Unit},
};

/// `:root` custom properties for every token, then one `.variables-<unit>`
/// ruleset per unit redeclaring the dimension tokens in that unit.
pub fn variables_with_units(dictionary: &Dictionary, options: &FormatOptions) -> Result<String> {
    let converter = &options.converter;
    let root = std::iter::once(format!(
        "  font-size: {}px;",
        converter.config().base_font_size
    ))
    .chain(dictionary.all_tokens.iter().map(css_property))
    .collect_vec();
    let mut output = format!("{GENERATED_HEADER}\n{}", ruleset(":root", &root));

    let dimensions = dictionary
        .all_tokens
        .iter()
        .filter(|token| is_dimension(&token.value))
        .collect_vec();
    for unit in Unit::ALL {
        let lines = dimensions
            .iter()
            .map(|token| {
                let literal = plain_value(&token.value);
                converter
                    .convert(&literal, unit)
                    .map(|value| format!("  --{}: {value};", token.name))
                    .map_err(|err| err.in_token(&token.name))
            })
            .collect::<Result<Vec<_>>>()?;
        output.push_str(&format!("\n/**\n * Variables in {unit} units\n */\n"));
        output.push_str(&ruleset(&format!(".variables-{unit}"), &lines));
    }
    Ok(output)
}

fn css_property(token: &ResolvedToken) -> String {
    let mut line = format!("  --{}: {};", token.name, plain_value(&token.value));
    if let Some(comment) = token.comment() {
        line.push_str(&format!(" /* {} */", comment.replace("*/", "*\\/")));
    }
    line
}

fn ruleset(selector: &str, lines: &[String]) -> String {
    let mut out = format!("{selector} {{\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}
