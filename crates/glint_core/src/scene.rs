//! Scenes and the scene-graph linker.
//!
//! Nodes only declare their children. After load the linker walks every
//! scene from its roots and fills in each node's `parent` and linked
//! `children`, so the graph can be navigated both ways by key.

use std::collections::HashSet;

use glint_math::Mat4;
use serde_json::Value;

use crate::error::{GltfError, GltfResult};
use crate::node::Node;
use crate::registry::Registry;

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub name: String,
    /// Root node keys in manifest order
    pub nodes: Vec<String>,
    pub extras: Value,
}

/// Link parent and child pointers for every node reachable from a scene.
///
/// Existing links are cleared first, so linking twice gives the same graph.
/// A node listed both as a scene root and as someone's child is treated as
/// that parent's child.
pub(crate) fn link(registry: &mut Registry) -> GltfResult<()> {
    let keys: Vec<String> = registry.nodes().map(|(key, _)| key.to_string()).collect();
    for key in &keys {
        let node = registry.node_mut(key)?;
        node.parent = None;
        node.children.clear();
    }

    let roots: Vec<String> = registry
        .scenes()
        .flat_map(|(_, scene)| scene.nodes.iter().cloned())
        .collect();

    let mut linked = HashSet::new();
    for root in &roots {
        visit(registry, root, &mut linked)?;
    }

    log::debug!("Linked {} of {} nodes into scenes", linked.len(), keys.len());
    Ok(())
}

enum Step {
    Enter { key: String, parent: Option<String> },
    Leave(String),
}

/// Depth-first walk from `root`, with an explicit stack so deep chains
/// cannot exhaust the thread stack.
fn visit(registry: &mut Registry, root: &str, linked: &mut HashSet<String>) -> GltfResult<()> {
    let mut path: HashSet<String> = HashSet::new();
    let mut stack = vec![Step::Enter {
        key: root.to_string(),
        parent: None,
    }];

    while let Some(step) = stack.pop() {
        let (key, parent) = match step {
            Step::Leave(key) => {
                path.remove(&key);
                continue;
            }
            Step::Enter { key, parent } => (key, parent),
        };

        if path.contains(&key) {
            return Err(GltfError::CyclicScene { node: key });
        }

        if linked.contains(&key) {
            let Some(parent) = parent else {
                continue;
            };
            let node = registry.node_mut(&key)?;
            match node.parent.clone() {
                Some(first) if first == parent => {}
                Some(first) => {
                    return Err(GltfError::MultipleParents {
                        node: key,
                        first,
                        second: parent,
                    })
                }
                // Was linked as a scene root; adopt it.
                None => {
                    node.parent = Some(parent.clone());
                    registry.node_mut(&parent)?.children.push(key);
                }
            }
            continue;
        }

        let child_keys = {
            let node = registry.node_mut(&key)?;
            node.parent = parent.clone();
            node.child_keys.clone()
        };
        if let Some(parent) = &parent {
            registry.node_mut(parent)?.children.push(key.clone());
        }
        linked.insert(key.clone());

        path.insert(key.clone());
        stack.push(Step::Leave(key.clone()));
        // Reverse so the first child is visited first.
        for child in child_keys.into_iter().rev() {
            stack.push(Step::Enter {
                key: child,
                parent: Some(key.clone()),
            });
        }
    }
    Ok(())
}

/// Depth-first search for `key` through linked children, starting at
/// `root` itself.
pub fn find_node_by_key<'a>(registry: &'a Registry, key: &str, root: &str) -> Option<&'a Node> {
    let mut stack = vec![root];
    let mut seen = HashSet::new();
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        let node = registry.node(current).ok()?;
        if current == key {
            return Some(node);
        }
        // Reverse so the first child is searched first.
        stack.extend(node.children.iter().rev().map(String::as_str));
    }
    None
}

/// Model-space matrix of `key`: its local matrix composed with every
/// ancestor's.
pub fn world_transform(registry: &Registry, key: &str) -> GltfResult<Mat4> {
    let mut node = registry.node(key)?;
    let mut matrix = node.local_matrix();
    let mut depth = 0;
    while let Some(parent) = node.parent.as_deref() {
        depth += 1;
        if depth > registry.node_count() {
            return Err(GltfError::CyclicScene {
                node: key.to_string(),
            });
        }
        node = registry.node(parent)?;
        matrix = node.local_matrix() * matrix;
    }
    Ok(matrix)
}
