// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object tree payload from the CAD translation service.
//!
//! Trees arrive as `{ data: { objects: [node, ...] } }` where each node is
//! `{ objectid, name, objects: [...] }`. The documented spelling
//! (`objectId` / `children`) is accepted as well. Conversion from JSON never
//! recurses on the call stack, so arbitrarily deep trees are safe.

use serde::Serialize;
use serde_json::Value;

/// A node of the upstream object hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTreeNode {
    pub object_id: i64,
    pub name: String,
    pub children: Vec<RawTreeNode>,
}

impl RawTreeNode {
    pub fn new(object_id: i64, name: impl Into<String>) -> Self {
        Self {
            object_id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RawTreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Convert one JSON node (and its subtree).
    ///
    /// Returns `None` if the node itself has no usable object id. Malformed
    /// descendants are dropped together with their subtrees.
    pub fn from_value(value: &Value) -> Option<Self> {
        struct Frame<'a> {
            pending: std::slice::Iter<'a, Value>,
            node: RawTreeNode,
        }

        let mut stack = vec![Frame {
            pending: child_values(value).iter(),
            node: node_header(value)?,
        }];
        let mut dropped = 0usize;

        loop {
            let next_child = stack.last_mut().and_then(|frame| frame.pending.next());
            match next_child {
                Some(child) => match node_header(child) {
                    Some(node) => stack.push(Frame {
                        pending: child_values(child).iter(),
                        node,
                    }),
                    None => dropped += 1,
                },
                None => {
                    let finished = stack.pop()?.node;
                    match stack.last_mut() {
                        Some(parent) => parent.node.children.push(finished),
                        None => {
                            if dropped > 0 {
                                tracing::warn!(
                                    root = finished.object_id,
                                    dropped,
                                    "Dropped malformed tree nodes"
                                );
                            }
                            return Some(finished);
                        }
                    }
                }
            }
        }
    }

    /// Number of nodes in this subtree, counted without recursion.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

impl Drop for RawTreeNode {
    // Iterative teardown; the derived drop would recurse once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Extract the top-level nodes from an object tree payload.
///
/// Anything other than an array at `data.objects` is treated as an empty
/// tree. Roots without an object id are skipped.
pub fn roots_from_payload(payload: &Value) -> Vec<RawTreeNode> {
    let Some(objects) = payload.pointer("/data/objects").and_then(Value::as_array) else {
        tracing::debug!("Object tree payload has no objects array; treating as empty");
        return Vec::new();
    };

    let roots: Vec<RawTreeNode> = objects.iter().filter_map(RawTreeNode::from_value).collect();
    if roots.len() < objects.len() {
        tracing::warn!(
            skipped = objects.len() - roots.len(),
            "Skipped tree roots without an object id"
        );
    }
    roots
}

/// Object ids are integers upstream, but occasionally arrive as strings.
pub fn object_id_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn node_header(value: &Value) -> Option<RawTreeNode> {
    let object = value.as_object()?;
    let object_id = object
        .get("objectid")
        .or_else(|| object.get("objectId"))
        .and_then(object_id_of)?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(RawTreeNode::new(object_id, name))
}

fn child_values(value: &Value) -> &[Value] {
    value
        .get("objects")
        .or_else(|| value.get("children"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
