//! The `Key` type stored at each B-tree slot: a fixed-arity tuple of
//! [`Value`] fields plus a tombstone flag.

use std::cmp::Ordering;

use crate::value::Value;

/// An ordered sequence of typed fields with a `deleted` tombstone flag.
///
/// Once constructed the field tuple is immutable; only `deleted` may
/// toggle. Ordering and equality only ever compare the field tuple --
/// `deleted` never participates, so a tombstoned key still sorts exactly
/// where the live key did.
#[derive(Debug, Clone)]
pub struct Key {
    fields: Vec<Value>,
    deleted: bool,
}

impl Key {
    pub fn new(fields: Vec<Value>) -> Key {
        Key {
            fields,
            deleted: false,
        }
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Value> {
        self.fields
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    pub fn clear_deleted(&mut self) {
        self.deleted = false;
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    /// Strict lexicographic comparison, field by field, of two *full-arity*
    /// keys (both keys stored in the same tree always share arity). This
    /// must never take the shortcut of returning as soon as
    /// `a[i] >= b[i]`; every shared position is compared in turn.
    fn cmp(&self, other: &Self) -> Ordering {
        self.fields.cmp(&other.fields)
    }
}

/// Strict lexicographic comparison of a stored (full-arity) key's fields
/// against a query bound that may be shorter -- a prefix. Only the shared
/// positions are compared; if every shared position is equal the bound is
/// considered to match regardless of any extra trailing fields the stored
/// key carries. This is distinct from `Key::cmp`, which never sees
/// mismatched arities.
pub fn compare_prefix(stored: &[Value], bound: &[Value]) -> Ordering {
    for (a, b) in stored.iter().zip(bound.iter()) {
        match a.cmp(b) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
