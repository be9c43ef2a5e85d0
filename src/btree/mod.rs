//! The ordered container at the bottom of the stack: a B-tree of order
//! `m`, holding fixed-arity [`Key`] rows, with lazy-tombstone delete and
//! explicit rebalancing.
//!
//! Nodes live in an arena (`Vec<Node>`) addressed by `NodeId` rather than
//! behind `Rc`/`RefCell`, avoiding a shared-parent back-reference.
//! `rebalance` never needs to walk upward: it rebuilds the whole tree from
//! a fresh in-order scan whenever any node has been dirtied by a delete,
//! which restores the strict B-tree invariants over the whole tree from
//! the root without needing parent pointers at all.

mod bounds;
mod iter;
mod node;

pub use bounds::SliceBounds;
pub(crate) use node::NodeId;
use node::Node;

use log::trace;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::value::Value;

pub(crate) use iter::SliceIter;

/// A B-tree of order `m`, storing rows of a fixed `arity`.
#[derive(Debug, Clone)]
pub struct BTree {
    order: usize,
    arity: usize,
    arena: Vec<Node>,
    root: NodeId,
    len: usize,
    rebalance_queue: Vec<NodeId>,
}

impl BTree {
    /// `order` must be at least 2.
    pub fn new(order: usize, arity: usize) -> Result<BTree> {
        if order < 2 {
            return Err(Error::InvalidArgument(format!(
                "order must be >= 2, got {}",
                order
            )));
        }
        Ok(BTree {
            order,
            arity,
            arena: vec![Node::leaf()],
            root: 0,
            len: 0,
            rebalance_queue: Vec::new(),
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Count of live (non-tombstoned) rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    fn check_arity(&self, row: &[Value], what: &str) -> Result<()> {
        if row.len() > self.arity {
            return Err(Error::InvalidArgument(format!(
                "{} of length {} exceeds row arity {}",
                what,
                row.len(),
                self.arity
            )));
        }
        Ok(())
    }

    /// Insert `row`. A row identical, field for field, to an existing live
    /// row is a no-op; a tombstoned match is resurrected; a distinct row
    /// (even one sharing every key-column value) is inserted alongside.
    pub fn insert(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.arity {
            return Err(Error::InvalidArgument(format!(
                "row arity {} does not match tree arity {}",
                row.len(),
                self.arity
            )));
        }
        let key = Key::new(row);

        if self.arena[self.root].is_full(self.order) {
            let mut new_root = Node::internal();
            new_root.children.push(self.root);
            let new_root_id = self.arena.len();
            self.arena.push(new_root);
            self.root = new_root_id;
            self.split_child(new_root_id, 0);
        }
        self.insert_non_full(self.root, key);
        Ok(())
    }

    fn insert_non_full(&mut self, node_id: NodeId, key: Key) {
        let leaf = self.arena[node_id].leaf;
        let i = bounds::lower_bound_row(&self.arena[node_id].keys, &key);

        if leaf {
            let keys = &mut self.arena[node_id].keys;
            if i < keys.len() && keys[i] == key {
                if keys[i].is_deleted() {
                    keys[i].clear_deleted();
                    self.len += 1;
                }
                // else: identical full row already live, no-op.
            } else {
                keys.insert(i, key);
                self.len += 1;
            }
            return;
        }

        let mut i = i;
        let child_id = self.arena[node_id].children[i];
        if self.arena[child_id].is_full(self.order) {
            self.split_child(node_id, i);
            if key > self.arena[node_id].keys[i] {
                i += 1;
            }
        }
        let child_id = self.arena[node_id].children[i];
        self.insert_non_full(child_id, key);
    }

    /// Promote the median key of `parent.children[i]` into `parent`,
    /// splitting the child into two siblings of order `m - 1` keys each.
    fn split_child(&mut self, parent_id: NodeId, i: usize) {
        let order = self.order;
        let child_id = self.arena[parent_id].children[i];
        let child_leaf = self.arena[child_id].leaf;

        let (promoted, sibling_keys, sibling_children) = {
            let child = &mut self.arena[child_id];
            let tail = child.keys.split_off(order);
            let promoted = child.keys.pop().expect("full node has >= order keys");
            let sibling_children = if child_leaf {
                Vec::new()
            } else {
                child.children.split_off(order)
            };
            (promoted, tail, sibling_children)
        };

        let mut sibling = if child_leaf {
            Node::leaf()
        } else {
            Node::internal()
        };
        sibling.keys = sibling_keys;
        sibling.children = sibling_children;
        let sibling_id = self.arena.len();
        self.arena.push(sibling);

        let parent = &mut self.arena[parent_id];
        parent.keys.insert(i, promoted);
        parent.children.insert(i + 1, sibling_id);
        trace!(target: "btree", "split child {} of parent {} at index {}", child_id, parent_id, i);
    }

    /// True iff a live row exists whose leading fields equal `prefix`.
    pub fn contains(&self, prefix: &[Value]) -> Result<bool> {
        self.check_arity(prefix, "lookup key")?;
        Ok(self
            .iter(SliceBounds::point(prefix.to_vec()), false)
            .next()
            .is_some())
    }

    /// Lazily iterate the `(node, i)` positions selected by `bounds`, in
    /// the requested direction, skipping tombstones.
    pub fn iter(&self, bounds: SliceBounds, reverse: bool) -> impl Iterator<Item = &Key> {
        SliceIter::new(self, bounds, reverse)
    }

    /// Full ascending iteration.
    pub fn iter_all(&self) -> impl Iterator<Item = &Key> {
        self.iter(SliceBounds::unbounded(), false)
    }

    /// Tombstone every live row selected by `bounds`. Physical removal is
    /// deferred to `rebalance`.
    pub fn delete(&mut self, bounds: SliceBounds) -> Result<usize> {
        let mut count = 0;
        self.delete_at(self.root, &bounds, &mut count);
        Ok(count)
    }

    fn delete_at(&mut self, node_id: NodeId, bounds: &SliceBounds, count: &mut usize) {
        let (l, r) = bounds.window(&self.arena[node_id].keys);
        if r <= l {
            return;
        }

        if self.arena[node_id].leaf {
            for i in l..r {
                let key = &mut self.arena[node_id].keys[i];
                if !key.is_deleted() {
                    key.mark_deleted();
                    *count += 1;
                    self.len -= 1;
                }
            }
        } else {
            for pos in l..=r {
                let child_id = self.arena[node_id].children[pos];
                self.delete_at(child_id, bounds, count);
                if pos < r {
                    let key = &mut self.arena[node_id].keys[pos];
                    if !key.is_deleted() {
                        key.mark_deleted();
                        *count += 1;
                        self.len -= 1;
                    }
                }
            }
        }

        self.arena[node_id].needs_rebalance = true;
        self.rebalance_queue.push(node_id);
    }

    /// Rebuild every dirtied subtree. Implemented as a single full-tree
    /// rebuild whenever anything is dirty: materialise the live rows in
    /// order and reinsert them into a fresh tree of the same order. A
    /// clean tree is left untouched.
    pub fn rebalance(&mut self) {
        if self.rebalance_queue.is_empty() {
            return;
        }

        let rows: Vec<Vec<Value>> = self
            .iter_all()
            .map(|k| k.fields().to_vec())
            .collect();

        trace!(target: "btree", "rebalancing {} live rows", rows.len());

        let mut fresh = BTree::new(self.order, self.arity).expect("order already validated");
        for row in rows {
            fresh.insert(row).expect("row arity already validated");
        }

        self.arena = fresh.arena;
        self.root = fresh.root;
        self.len = fresh.len;
        self.rebalance_queue.clear();
    }

    /// True iff any node has been dirtied by a delete since the last
    /// rebalance.
    pub fn needs_rebalance(&self) -> bool {
        !self.rebalance_queue.is_empty()
    }

    /// Validate the strict B-tree invariants over the whole tree (used by
    /// property tests after `rebalance`).
    #[cfg(test)]
    pub(crate) fn validate(&self) -> bool {
        self.validate_at(self.root, true)
    }

    #[cfg(test)]
    fn validate_at(&self, node_id: NodeId, is_root: bool) -> bool {
        let node = &self.arena[node_id];
        if !is_root && !node.is_valid(self.order, false) {
            return false;
        }
        if is_root {
            if node.keys.is_empty() && !node.children.is_empty() {
                return false;
            }
            if !node.leaf && node.children.len() < 2 {
                return false;
            }
        }
        for (i, &child_id) in node.children.iter().enumerate() {
            if !self.validate_at(child_id, false) {
                return false;
            }
            let child = &self.arena[child_id];
            if let Some(first) = child.keys.first() {
                if i > 0 && *first < node.keys[i - 1] {
                    return false;
                }
            }
            if let Some(last) = child.keys.last() {
                if i < node.keys.len() && *last > node.keys[i] {
                    return false;
                }
            }
        }
        true
    }
}
