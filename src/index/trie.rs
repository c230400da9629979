//! KeyIndex implementation
//!
//! Arena-backed 256-ary trie.

use std::convert::Infallible;

use crate::error::{KeylogError, Result};
use super::ByteRange;

/// Position of a node inside the arena
type NodeId = usize;

const ROOT: NodeId = 0;

/// A trie node: sparse children sorted by byte, plus the key's current ref
#[derive(Debug, Default, Clone)]
struct Node {
    children: Vec<(u8, NodeId)>,
    range: Option<ByteRange>,
}

impl Node {
    fn child(&self, byte: u8) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|pos| self.children[pos].1)
    }
}

/// One level of the explicit DFS stack
struct Frame {
    node: NodeId,
    next_child: usize,
}

/// In-memory prefix index over every key the log has ever touched
#[derive(Debug, Clone)]
pub struct KeyIndex {
    /// Node arena; `nodes[0]` is the root (the empty key)
    nodes: Vec<Node>,

    /// Number of nodes currently holding a ref
    live: usize,
}

impl KeyIndex {
    /// Create an index holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            live: 0,
        }
    }

    /// Install `range` as the latest location of `key`, creating the path if needed
    pub fn set(&mut self, key: &[u8], range: ByteRange) {
        let mut current = ROOT;
        for &byte in key {
            current = self.child_or_insert(current, byte);
        }

        let node = &mut self.nodes[current];
        if node.range.replace(range).is_none() {
            self.live += 1;
        }
    }

    /// Clear the ref of `key`; the node itself stays in the tree
    pub fn delete(&mut self, key: &[u8]) {
        if let Some(id) = self.find(key) {
            if self.nodes[id].range.take().is_some() {
                self.live -= 1;
            }
        }
    }

    /// Latest location of `key`, if the key is live
    pub fn get(&self, key: &[u8]) -> Option<ByteRange> {
        self.find(key).and_then(|id| self.nodes[id].range)
    }

    /// Visit every live key under `prefix` in ascending byte order
    ///
    /// Fails with `PrefixNotFound` when the path for `prefix` was never
    /// created, regardless of whether any live key sits below it. The first
    /// error returned by `callback` stops the traversal and is returned.
    pub fn walk<F>(&self, prefix: &[u8], callback: F) -> Result<()>
    where
        F: FnMut(&[u8], ByteRange) -> Result<()>,
    {
        let start = self.find(prefix).ok_or_else(|| KeylogError::PrefixNotFound {
            prefix: prefix.to_vec(),
        })?;

        self.traverse(start, prefix.to_vec(), callback)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of allocated nodes, dead ones included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Rebuild the trie keeping only paths that lead to live keys
    pub fn compacted(&self) -> Self {
        let mut fresh = Self::new();
        let copied = self.traverse(ROOT, Vec::new(), |key, range| {
            fresh.set(key, range);
            Ok::<(), Infallible>(())
        });
        match copied {
            Ok(()) => fresh,
            Err(never) => match never {},
        }
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Pre-order DFS below `start`, where `key` already spells `start`
    fn traverse<F, E>(
        &self,
        start: NodeId,
        mut key: Vec<u8>,
        mut callback: F,
    ) -> std::result::Result<(), E>
    where
        F: FnMut(&[u8], ByteRange) -> std::result::Result<(), E>,
    {
        if let Some(range) = self.nodes[start].range {
            callback(key.as_slice(), range)?;
        }

        let mut stack = vec![Frame {
            node: start,
            next_child: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let node = &self.nodes[frame.node];
            match node.children.get(frame.next_child) {
                Some(&(byte, child)) => {
                    frame.next_child += 1;
                    key.push(byte);
                    if let Some(range) = self.nodes[child].range {
                        callback(key.as_slice(), range)?;
                    }
                    stack.push(Frame {
                        node: child,
                        next_child: 0,
                    });
                }
                None => {
                    stack.pop();
                    // The start frame owns the prefix, which is never popped
                    if !stack.is_empty() {
                        key.pop();
                    }
                }
            }
        }

        Ok(())
    }

    fn find(&self, key: &[u8]) -> Option<NodeId> {
        let mut current = ROOT;
        for &byte in key {
            current = self.nodes[current].child(byte)?;
        }
        Some(current)
    }

    fn child_or_insert(&mut self, parent: NodeId, byte: u8) -> NodeId {
        let children = &self.nodes[parent].children;
        match children.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(pos) => children[pos].1,
            Err(pos) => {
                let id = self.nodes.len();
                self.nodes.push(Node::default());
                self.nodes[parent].children.insert(pos, (byte, id));
                id
            }
        }
    }
}

impl Default for KeyIndex {
    fn default() -> Self {
        Self::new()
    }
}
