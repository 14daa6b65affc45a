use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub mod engine;
pub mod error;
pub mod formats;
pub mod text;
pub mod transforms;
pub mod units;

pub use engine::{
    Dictionary, FileConfig, PlatformConfig, ResolvedToken, TokenEngine, TokenFilter,
};
pub use error::{Result, TokenError};
pub use formats::{FormatOptions, FormatRegistry};
pub use text::TextTokens;
pub use transforms::TransformGroup;
pub use units::{Dimension, Unit, UnitConfig, UnitConverter};

/// Top-level keys that carry document metadata rather than tokens.
pub const RESERVED_KEYS: [&str; 2] = ["$themes", "$metadata"];

/// A token leaf. Either field convention may be present; readers go through
/// [`Token::value`] and [`Token::kind`], which prefer the `$`-prefixed field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "$value", default, skip_serializing_if = "Option::is_none")]
    pub dtcg_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(rename = "$type", default, skip_serializing_if = "Option::is_none")]
    pub dtcg_type: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(
        rename = "$description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dtcg_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}
impl Token {
    pub fn new(value: impl Into<Value>, kind: impl Into<String>) -> Self {
        Token {
            dtcg_value: Some(value.into()),
            dtcg_type: Some(kind.into()),
            ..Default::default()
        }
    }
    pub fn value(&self) -> Option<&Value> {
        self.dtcg_value.as_ref().or(self.value.as_ref())
    }
    pub fn kind(&self) -> Option<&str> {
        self.dtcg_type.as_deref().or(self.type_.as_deref())
    }
    pub fn description(&self) -> Option<&str> {
        self.dtcg_description
            .as_deref()
            .or(self.description.as_deref())
            .or(self.comment.as_deref())
    }
    pub fn is_text(&self) -> bool {
        self.kind() == Some("text")
    }
    /// Fills whichever of each field pair is absent from its counterpart.
    pub fn normalize(&mut self) {
        if self.dtcg_value.is_none() {
            self.dtcg_value = self.value.clone();
        }
        if self.value.is_none() {
            self.value = self.dtcg_value.clone();
        }
        if self.dtcg_type.is_none() {
            self.dtcg_type = self.type_.clone();
        }
        if self.type_.is_none() {
            self.type_ = self.dtcg_type.clone();
        }
    }
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
    fn is_leaf(map: &Map<String, Value>) -> bool {
        map.contains_key("$value") || map.contains_key("value")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenOrGroup {
    Token(Token),
    Group(TokenTree),
}
impl TokenOrGroup {
    fn from_json(value: Value) -> serde_json::Result<Option<Self>> {
        match value {
            Value::Object(map) if Token::is_leaf(&map) => {
                serde_json::from_value(Value::Object(map)).map(|token| Some(Self::Token(token)))
            }
            Value::Object(map) => TokenTree::from_map(map).map(|tree| Some(Self::Group(tree))),
            _ => Ok(None),
        }
    }
}

/// An ordered tree of token groups. Key order follows the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTree {
    /// Group-level `$type`, inherited by descendant tokens without a type.
    pub kind: Option<String>,
    children: IndexMap<String, TokenOrGroup>,
}
impl TokenTree {
    fn from_map(map: Map<String, Value>) -> serde_json::Result<Self> {
        let mut tree = TokenTree::default();
        for (key, value) in map {
            match value {
                Value::String(kind) if key == "$type" || key == "type" => tree.kind = Some(kind),
                // `$description`, `$extensions` and the like describe the group itself.
                _ if key.starts_with('$') => {}
                value => {
                    if let Some(node) = TokenOrGroup::from_json(value)? {
                        tree.children.insert(key, node);
                    }
                }
            }
        }
        Ok(tree)
    }
    pub fn get(&self, key: &str) -> Option<&TokenOrGroup> {
        self.children.get(key)
    }
    /// Inserts or replaces `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, node: TokenOrGroup) {
        self.children.insert(key.into(), node);
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TokenOrGroup)> {
        self.children.iter()
    }
    pub fn len(&self) -> usize {
        self.children.len()
    }
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
    /// Top-level entries minus the reserved metadata keys.
    pub fn namespaces(&self) -> impl Iterator<Item = (&String, &TokenOrGroup)> {
        self.children
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
    }
    /// Every token leaf in document order with its full path, normalized and
    /// carrying the nearest inherited group type when it declares none.
    pub fn flatten(&self) -> Vec<(Vec<String>, Token)> {
        let mut out = Vec::new();
        self.walk(&mut Vec::new(), None, &mut out);
        out
    }
    fn walk<'a>(
        &'a self,
        path: &mut Vec<String>,
        inherited: Option<&'a str>,
        out: &mut Vec<(Vec<String>, Token)>,
    ) {
        let kind = self.kind.as_deref().or(inherited);
        for (key, node) in &self.children {
            path.push(key.clone());
            match node {
                TokenOrGroup::Token(token) => {
                    let mut token = token.clone();
                    if token.kind().is_none() {
                        token.dtcg_type = kind.map(str::to_string);
                    }
                    out.push((path.clone(), token.normalized()));
                }
                TokenOrGroup::Group(group) => group.walk(path, kind, out),
            }
            path.pop();
        }
    }
}
impl FromIterator<(String, TokenOrGroup)> for TokenTree {
    fn from_iter<I: IntoIterator<Item = (String, TokenOrGroup)>>(iter: I) -> Self {
        TokenTree {
            kind: None,
            children: iter.into_iter().collect(),
        }
    }
}
impl<'de> Deserialize<'de> for TokenTree {
    fn deserialize<D>(deserializer: D) -> Result<TokenTree, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        TokenTree::from_map(map).map_err(de::Error::custom)
    }
}
