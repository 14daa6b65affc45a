//! One build per namespace, all running at once.
//!
//! Every namespace gets its own token tree (the namespace subtree plus a
//! `text` group holding the shared text tokens) and its own output directory,
//! so jobs share nothing mutable. The run succeeds only if every job does.

use std::{path::PathBuf, sync::Arc};

use design_tokens_core::{
    formats::{CSS_VARIABLES, JAVASCRIPT_ES6, TYPESCRIPT_DECLARATIONS},
    FileConfig, FormatOptions, PlatformConfig, TextTokens, TokenEngine, TokenFilter,
    TokenOrGroup, TokenTree, TransformGroup, UnitConverter,
};
use futures::future::join_all;
use indexmap::IndexMap;
use tokio::process::Command;
use tracing::{error, info, info_span, warn, Instrument};

use crate::{
    config::{BuildConfig, NamespaceSettings},
    error::NamespaceError,
    loader::{is_directory_name, namespace_name, read_tree_if_exists},
};

/// Key under which the text tokens are merged into every namespace.
pub const TEXT_GROUP: &str = "text";

#[derive(Debug)]
pub struct NamespaceJob {
    pub key: String,
    pub name: String,
    pub build_path: PathBuf,
    pub settings: NamespaceSettings,
    subtree: TokenTree,
    text: Arc<TextTokens>,
    options: FormatOptions,
}
impl NamespaceJob {
    pub fn new(key: &str, node: &TokenOrGroup, text: Arc<TextTokens>, config: &BuildConfig) -> Self {
        let name = namespace_name(key);
        let subtree = match node {
            TokenOrGroup::Group(tree) => tree.clone(),
            TokenOrGroup::Token(_) => {
                warn!(namespace = %key, "namespace is a single token, building it without its own tokens");
                TokenTree::default()
            }
        };
        NamespaceJob {
            key: key.to_string(),
            build_path: config.target_dir.join(&name),
            settings: config.namespace(&name).cloned().unwrap_or_default(),
            name,
            subtree,
            text,
            options: FormatOptions {
                converter: UnitConverter::new(config.units),
            },
        }
    }

    /// The namespace subtree with the text tokens added under [`TEXT_GROUP`].
    pub fn tokens(&self) -> TokenTree {
        let mut tokens = self.subtree.clone();
        tokens.insert(TEXT_GROUP, TokenOrGroup::Group(self.text.to_group()));
        tokens
    }

    pub fn platforms(&self) -> IndexMap<String, PlatformConfig> {
        let mut platforms = IndexMap::new();
        platforms.insert(
            "css".to_string(),
            PlatformConfig {
                transform_group: TransformGroup::Css,
                build_path: self.build_path.clone(),
                files: vec![FileConfig {
                    destination: "variables.css".to_string(),
                    format: CSS_VARIABLES.to_string(),
                    filter: Some(TokenFilter::NonText),
                }],
                options: self.options.clone(),
            },
        );
        if self.settings.text {
            platforms.insert(
                "js".to_string(),
                PlatformConfig {
                    transform_group: TransformGroup::Js,
                    build_path: self.build_path.clone(),
                    files: vec![
                        FileConfig {
                            destination: "tokens.js".to_string(),
                            format: JAVASCRIPT_ES6.to_string(),
                            filter: Some(TokenFilter::Text),
                        },
                        FileConfig {
                            destination: "tokens.d.ts".to_string(),
                            format: TYPESCRIPT_DECLARATIONS.to_string(),
                            filter: Some(TokenFilter::Text),
                        },
                    ],
                    options: self.options.clone(),
                },
            );
        }
        platforms
    }

    pub async fn run(self) -> Result<(), NamespaceError> {
        let engine = TokenEngine::new(self.tokens(), self.platforms());
        engine.clean_all_platforms().await?;
        engine.build_all_platforms().await?;
        if let Some(command) = &self.settings.script {
            run_post_build(command).await?;
        }
        info!("namespace built");
        Ok(())
    }
}

async fn run_post_build(command: &str) -> Result<(), NamespaceError> {
    info!(%command, "running post-build command");
    let status = shell(command)
        .status()
        .await
        .map_err(|source| NamespaceError::PostBuildSpawn {
            command: command.to_string(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(NamespaceError::PostBuildFailed {
            command: command.to_string(),
            status,
        })
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[derive(Debug)]
pub struct NamespaceFailure {
    pub namespace: String,
    pub error: NamespaceError,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub built: Vec<String>,
    pub failures: Vec<NamespaceFailure>,
}
impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads both token documents and builds every namespace concurrently.
///
/// All jobs run to completion even after one of them fails.
pub async fn run(config: &BuildConfig) -> RunReport {
    let tokens = read_tree_if_exists(&config.source).await;
    let text = Arc::new(TextTokens::merge(
        &read_tree_if_exists(&config.text_source).await,
    ));
    info!(text_tokens = text.len(), "loaded token documents");

    let jobs: Vec<_> = tokens
        .namespaces()
        .map(|(key, node)| NamespaceJob::new(key, node, Arc::clone(&text), config))
        .collect();
    let mut owners: IndexMap<String, Vec<String>> = IndexMap::new();
    for job in &jobs {
        owners.entry(job.name.clone()).or_default().push(job.key.clone());
    }

    let mut report = RunReport::default();
    let mut keys = Vec::new();
    let mut handles = Vec::new();
    for job in jobs {
        if let Some(err) = output_conflict(&job, &owners) {
            error!(namespace = %job.key, error = %err, "namespace not built");
            report.failures.push(NamespaceFailure {
                namespace: job.key,
                error: err,
            });
            continue;
        }
        let span = info_span!("namespace", name = %job.name, path = %job.build_path.display());
        keys.push(job.key.clone());
        handles.push(tokio::spawn(job.run().instrument(span)));
    }
    info!(namespaces = keys.len(), "dispatched namespace builds");

    for (key, outcome) in keys.into_iter().zip(join_all(handles).await) {
        match outcome {
            Ok(Ok(())) => report.built.push(key),
            Ok(Err(err)) => {
                error!(namespace = %key, error = %err, "namespace build failed");
                report.failures.push(NamespaceFailure {
                    namespace: key,
                    error: err,
                });
            }
            Err(join_err) => {
                error!(namespace = %key, error = %join_err, "unexpected failure in namespace build");
                report.failures.push(NamespaceFailure {
                    namespace: key,
                    error: NamespaceError::Unexpected(join_err.to_string()),
                });
            }
        }
    }
    report
}

/// Each namespace needs an output directory of its own; jobs sharing one would
/// clean and overwrite each other's files.
fn output_conflict(
    job: &NamespaceJob,
    owners: &IndexMap<String, Vec<String>>,
) -> Option<NamespaceError> {
    if !is_directory_name(&job.name) {
        return Some(NamespaceError::InvalidName(job.name.clone()));
    }
    match owners.get(&job.name) {
        Some(keys) if keys.len() > 1 => Some(NamespaceError::OutputConflict {
            directory: job.build_path.clone(),
            namespaces: keys.clone(),
        }),
        _ => None,
    }
}
