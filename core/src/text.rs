use indexmap::IndexMap;
use tracing::debug;

use crate::{Token, TokenOrGroup, TokenTree};

/// The text-token document flattened to `name -> token`.
///
/// Built once per run and only read afterwards. Group names are dropped, so
/// a name defined by several groups keeps the token of the last group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextTokens {
    tokens: IndexMap<String, Token>,
}
impl TextTokens {
    pub fn merge(document: &TokenTree) -> Self {
        let mut tokens = IndexMap::new();
        for (group_name, node) in document.namespaces() {
            let TokenOrGroup::Group(group) = node else {
                debug!(key = %group_name, "skipping text token outside of a group");
                continue;
            };
            for (name, node) in group.iter() {
                let TokenOrGroup::Token(token) = node else {
                    debug!(group = %group_name, key = %name, "skipping nested text group");
                    continue;
                };
                let mut token = token.clone();
                if token.kind().is_none() {
                    token.dtcg_type = group.kind.clone();
                }
                if tokens.insert(name.clone(), token.normalized()).is_some() {
                    debug!(group = %group_name, name = %name, "text token overrides an earlier group");
                }
            }
        }
        TextTokens { tokens }
    }
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.tokens.get(name)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Token)> {
        self.tokens.iter()
    }
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    /// A fresh tree holding a copy of every text token.
    pub fn to_group(&self) -> TokenTree {
        self.tokens
            .iter()
            .map(|(name, token)| (name.clone(), TokenOrGroup::Token(token.clone())))
            .collect()
    }
}
