use std::{fmt, sync::OnceLock};

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    engine::Dictionary,
    error::{Result, TokenError},
    units::UnitConverter,
};

pub mod css;
pub mod declarations;
pub mod javascript;

pub const CSS_VARIABLES: &str = "css/variables-units";
pub const TYPESCRIPT_DECLARATIONS: &str = "typescript/declarations";
pub const JAVASCRIPT_ES6: &str = "javascript/es6";

pub(crate) const GENERATED_HEADER: &str =
    "/**\n * Do not edit directly, this file was auto-generated.\n */\n";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatOptions {
    pub converter: UnitConverter,
}

pub type FormatFn = fn(&Dictionary, &FormatOptions) -> Result<String>;

/// Format name to renderer. The shared instance behind [`FormatRegistry::global`]
/// is built on first use and never changes afterwards.
#[derive(Clone)]
pub struct FormatRegistry {
    formats: IndexMap<&'static str, FormatFn>,
}
impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.formats.keys()).finish()
    }
}
impl FormatRegistry {
    pub fn builtin() -> Self {
        let mut formats: IndexMap<&'static str, FormatFn> = IndexMap::new();
        formats.insert(CSS_VARIABLES, css::variables_with_units);
        formats.insert(TYPESCRIPT_DECLARATIONS, declarations::typescript_declarations);
        formats.insert(JAVASCRIPT_ES6, javascript::es6_constants);
        FormatRegistry { formats }
    }
    pub fn global() -> &'static FormatRegistry {
        static REGISTRY: OnceLock<FormatRegistry> = OnceLock::new();
        REGISTRY.get_or_init(FormatRegistry::builtin)
    }
    pub fn get(&self, name: &str) -> Result<FormatFn> {
        self.formats
            .get(name)
            .copied()
            .ok_or_else(|| TokenError::UnknownFormat(name.to_string()))
    }
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.formats.keys().copied()
    }
    pub fn render(
        &self,
        name: &str,
        dictionary: &Dictionary,
        options: &FormatOptions,
    ) -> Result<String> {
        self.get(name)?(dictionary, options)
    }
}

/// A value as it appears inside generated CSS: strings bare, anything else as JSON.
pub(crate) fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[test]
fn registry() {
    let registry = FormatRegistry::global();
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        [CSS_VARIABLES, TYPESCRIPT_DECLARATIONS, JAVASCRIPT_ES6]
    );
    assert!(matches!(
        registry.render("scss/map", &Dictionary::default(), &FormatOptions::default()),
        Err(TokenError::UnknownFormat(name)) if name == "scss/map"
    ));
    assert!(std::ptr::eq(registry, FormatRegistry::global()));
}
