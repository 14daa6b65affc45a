//! A small build engine: walks a [`TokenTree`], applies a platform's
//! transforms, and writes each configured file through the format registry.
//!
//! Token references (`{group.token}`) are passed through untouched.

use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, TokenError},
    formats::{FormatOptions, FormatRegistry},
    transforms::TransformGroup,
    Token, TokenTree,
};

/// A token after flattening and transforms, as handed to a format.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    pub name: String,
    pub path: Vec<String>,
    pub value: Value,
    pub original: Token,
}
impl ResolvedToken {
    pub fn comment(&self) -> Option<&str> {
        self.original.description()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    pub all_tokens: Vec<ResolvedToken>,
}
impl Dictionary {
    pub fn filtered(&self, filter: Option<TokenFilter>) -> Dictionary {
        Dictionary {
            all_tokens: self
                .all_tokens
                .iter()
                .filter(|token| filter.map_or(true, |filter| filter.matches(token)))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenFilter {
    Text,
    NonText,
}
impl TokenFilter {
    pub fn matches(&self, token: &ResolvedToken) -> bool {
        match self {
            TokenFilter::Text => token.original.is_text(),
            TokenFilter::NonText => !token.original.is_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileConfig {
    pub destination: String,
    pub format: String,
    pub filter: Option<TokenFilter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub transform_group: TransformGroup,
    pub build_path: PathBuf,
    pub files: Vec<FileConfig>,
    pub options: FormatOptions,
}

pub struct TokenEngine<'r> {
    tokens: TokenTree,
    platforms: IndexMap<String, PlatformConfig>,
    registry: &'r FormatRegistry,
}
impl TokenEngine<'static> {
    pub fn new(tokens: TokenTree, platforms: IndexMap<String, PlatformConfig>) -> Self {
        TokenEngine::with_registry(tokens, platforms, FormatRegistry::global())
    }
}
impl<'r> TokenEngine<'r> {
    pub fn with_registry(
        tokens: TokenTree,
        platforms: IndexMap<String, PlatformConfig>,
        registry: &'r FormatRegistry,
    ) -> Self {
        TokenEngine {
            tokens,
            platforms,
            registry,
        }
    }

    pub fn dictionary(&self, platform: &PlatformConfig) -> Dictionary {
        let group = platform.transform_group;
        let mut seen = HashSet::new();
        let all_tokens = self
            .tokens
            .flatten()
            .into_iter()
            .map(|(path, token)| {
                let name = group.name(&path);
                if !seen.insert(name.clone()) {
                    warn!(%name, path = %path.join("."), "token name collision");
                }
                ResolvedToken {
                    value: group.value(&token),
                    name,
                    path,
                    original: token,
                }
            })
            .collect();
        Dictionary { all_tokens }
    }

    /// Removes every file the platforms would write, and their build
    /// directories once empty.
    pub async fn clean_all_platforms(&self) -> Result<()> {
        for (name, platform) in &self.platforms {
            for file in &platform.files {
                let path = platform.build_path.join(&file.destination);
                match fs::remove_file(&path).await {
                    Ok(()) => debug!(platform = %name, path = %path.display(), "removed"),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(source) => return Err(TokenError::Io { path, source }),
                }
            }
            remove_dir_if_empty(&platform.build_path).await?;
        }
        Ok(())
    }

    pub async fn build_all_platforms(&self) -> Result<()> {
        for (name, platform) in &self.platforms {
            let dictionary = self.dictionary(platform);
            let mut outputs = Vec::with_capacity(platform.files.len());
            for file in &platform.files {
                let subset = dictionary.filtered(file.filter);
                let contents = self
                    .registry
                    .render(&file.format, &subset, &platform.options)?;
                outputs.push((file, subset.all_tokens.len(), contents));
            }
            fs::create_dir_all(&platform.build_path)
                .await
                .map_err(TokenError::io(&platform.build_path))?;
            for (file, count, contents) in outputs {
                let path = platform.build_path.join(&file.destination);
                fs::write(&path, contents)
                    .await
                    .map_err(TokenError::io(&path))?;
                info!(platform = %name, path = %path.display(), tokens = count, "wrote");
            }
        }
        Ok(())
    }
}

async fn remove_dir_if_empty(dir: &Path) -> Result<()> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(TokenError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };
    let first = entries.next_entry().await.map_err(TokenError::io(dir))?;
    if first.is_none() {
        fs::remove_dir(dir).await.map_err(TokenError::io(dir))?;
        debug!(path = %dir.display(), "removed empty build directory");
    }
    Ok(())
}
