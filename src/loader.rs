use std::path::Path;

use design_tokens_core::TokenTree;
use tokio::fs;
use tracing::{debug, warn};

/// Reads a token document, treating a missing or unparseable file as empty.
pub async fn read_tree_if_exists(path: &Path) -> TokenTree {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "token document not readable, using an empty tree");
            return TokenTree::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(tree) => tree,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "token document is not valid JSON, using an empty tree");
            TokenTree::default()
        }
    }
}

/// `"Mobile/Button"` -> `"button"`.
pub fn namespace_name(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).to_lowercase()
}

/// Whether `name` is usable as a single directory under the target root.
pub fn is_directory_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(namespace_name("Button"), "button");
        assert_eq!(namespace_name("Mobile/Nav Bar"), "nav bar");
        assert_eq!(namespace_name("a/b/"), "");
    }

    #[test]
    fn directory_names() {
        assert!(is_directory_name("button"));
        assert!(is_directory_name("nav bar"));
        assert!(!is_directory_name(""));
        assert!(!is_directory_name("."));
        assert!(!is_directory_name(".."));
        assert!(!is_directory_name("a\\b"));
    }

    #[tokio::test]
    async fn missing_and_invalid_documents_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_tree_if_exists(&dir.path().join("none.json")).await.is_empty());

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, "{ not json").unwrap();
        assert!(read_tree_if_exists(&invalid).await.is_empty());

        let list = dir.path().join("list.json");
        std::fs::write(&list, "[1, 2]").unwrap();
        assert!(read_tree_if_exists(&list).await.is_empty());

        let valid = dir.path().join("valid.json");
        std::fs::write(&valid, r#"{ "Card": { "gap": { "$value": "4px" } } }"#).unwrap();
        assert_eq!(read_tree_if_exists(&valid).await.len(), 1);
    }
}
