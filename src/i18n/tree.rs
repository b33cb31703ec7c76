// src/i18n/tree.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of a locale's translation tree.
///
/// Leaves are localized strings, internal nodes map a key segment to a child.
/// Any other JSON value (numbers, arrays, null) is rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationNode {
    Text(String),
    Branch(BTreeMap<String, TranslationNode>),
}

impl TranslationNode {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TranslationNode::Text(text) => Some(text),
            TranslationNode::Branch(_) => None,
        }
    }

    /// Child under `segment` if this node is a branch holding that key
    pub fn child(&self, segment: &str) -> Option<&TranslationNode> {
        match self {
            TranslationNode::Branch(children) => children.get(segment),
            TranslationNode::Text(_) => None,
        }
    }

    /// Every dot-separated path that ends on a string leaf, in sorted order
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(self, "", &mut paths);
        paths
    }
}

fn collect_leaf_paths(node: &TranslationNode, prefix: &str, out: &mut Vec<String>) {
    match node {
        TranslationNode::Text(_) => out.push(prefix.to_string()),
        TranslationNode::Branch(children) => {
            for (key, child) in children {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                collect_leaf_paths(child, &path, out);
            }
        }
    }
}
