//! Document loading boundary.
//!
//! Comparisons open a secondary ("hidden") document from storage. The
//! engine only sees the [`DocumentLoader`] trait; [`JsonLoader`] is the
//! concrete implementation over the on-disk JSON document format.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use canopy_types::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::error::{OutlineError, OutlineResult};
use crate::node::{Node, NodeKind};

/// Loads a fully-populated document from a path.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> OutlineResult<Document>;
}

/// One node record in the on-disk format.
#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    kind: NodeKind,
    #[serde(default)]
    children: Vec<NodeId>,
}

/// The on-disk document format: a flat node table plus the root list.
///
/// Clones serialize naturally — a node mounted twice appears in two
/// `children` lists but has exactly one record.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    name: String,
    nodes: Vec<NodeRecord>,
    roots: Vec<NodeId>,
}

/// Loader for `.canopy` JSON document files.
#[derive(Debug, Default)]
pub struct JsonLoader;

impl JsonLoader {
    pub fn new() -> Self {
        Self
    }

    /// Write a document to `path` in the JSON format.
    pub fn save(&self, doc: &Document, path: &Path) -> OutlineResult<()> {
        let file = DocumentFile {
            name: doc.name().to_string(),
            nodes: doc
                .nodes()
                .map(|(id, n)| NodeRecord {
                    id,
                    title: n.title.clone(),
                    body: n.body.clone(),
                    kind: n.kind,
                    children: n.children.clone(),
                })
                .collect(),
            roots: doc.roots().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| OutlineError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|source| OutlineError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DocumentLoader for JsonLoader {
    fn load(&self, path: &Path) -> OutlineResult<Document> {
        let text = read_file_text(path)?;
        let file: DocumentFile = serde_json::from_str(&text).map_err(|e| OutlineError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut arena = HashMap::with_capacity(file.nodes.len());
        for record in file.nodes {
            let node = Node {
                title: record.title,
                body: record.body,
                kind: record.kind,
                children: record.children,
            };
            if arena.insert(record.id, node).is_some() {
                return Err(OutlineError::Malformed {
                    path: path.to_path_buf(),
                    reason: format!("duplicate node record {}", record.id),
                });
            }
        }

        // Every referenced id must resolve.
        for (id, node) in &arena {
            for child in &node.children {
                if !arena.contains_key(child) {
                    return Err(OutlineError::Malformed {
                        path: path.to_path_buf(),
                        reason: format!("node {id} references missing child {child}"),
                    });
                }
            }
        }
        for root in &file.roots {
            if !arena.contains_key(root) {
                return Err(OutlineError::Malformed {
                    path: path.to_path_buf(),
                    reason: format!("missing root node {root}"),
                });
            }
        }

        debug!(path = %path.display(), nodes = arena.len(), "loaded document");
        Ok(Document::from_parts(file.name, arena, file.roots))
    }
}

/// Read a whole text file, distinguishing "not found" from other I/O
/// failures.
pub fn read_file_text(path: &Path) -> OutlineResult<String> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => OutlineError::NotFound(path.to_path_buf()),
        _ => OutlineError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> Document {
        let mut doc = Document::new("sample");
        let root = doc.push_root(Node::new("Intro", "hello"));
        let child = doc.insert_as_last_child(&root).unwrap();
        doc.set_title(&child, "Body").unwrap();
        doc.set_body(&child, "world").unwrap();
        doc
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.canopy");
        let doc = sample_doc();
        let loader = JsonLoader::new();
        loader.save(&doc, &path).unwrap();

        let loaded = loader.load(&path).unwrap();
        assert_eq!(loaded.name(), "sample");
        assert_eq!(loaded.node_count(), 2);

        let intro = loaded.find_by_title("Intro").unwrap();
        assert_eq!(loaded.body(&intro).unwrap(), "hello");
        let body = loaded.find_by_title("Body").unwrap();
        assert_eq!(loaded.body(&body).unwrap(), "world");
    }

    #[test]
    fn roundtrip_preserves_clone_sharing() {
        let mut doc = Document::new("clones");
        let orig = doc.push_root(Node::new("orig", "shared"));
        let host = doc.push_root(Node::new("host", ""));
        doc.clone_position(&orig, &host).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clones.canopy");
        let loader = JsonLoader::new();
        loader.save(&doc, &path).unwrap();
        let loaded = loader.load(&path).unwrap();

        // Two mounts, one arena entry.
        assert_eq!(loaded.walk().count(), 3);
        assert_eq!(loaded.node_count(), 2);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = JsonLoader::new()
            .load(Path::new("/nonexistent/doc.canopy"))
            .unwrap_err();
        assert!(matches!(err, OutlineError::NotFound(_)));
    }

    #[test]
    fn garbage_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.canopy");
        std::fs::write(&path, "not json").unwrap();
        let err = JsonLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, OutlineError::Malformed { .. }));
    }

    #[test]
    fn dangling_child_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dangling.canopy");
        let json = format!(
            r#"{{"name":"x","nodes":[{{"id":"{}","title":"a","children":["{}"]}}],"roots":[]}}"#,
            NodeId::mint(),
            NodeId::mint()
        );
        std::fs::write(&path, json).unwrap();
        let err = JsonLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, OutlineError::Malformed { .. }));
    }

    #[test]
    fn empty_document_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.canopy");
        let loader = JsonLoader::new();
        loader.save(&Document::new("empty"), &path).unwrap();
        let loaded = loader.load(&path).unwrap();
        assert!(loaded.is_empty());
    }
}
