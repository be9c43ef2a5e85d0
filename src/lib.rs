//! An in-memory, ordered-index engine plus a small relational selection
//! algebra layered on top of it.
//!
//! A [`btree::BTree`] stores variable-arity composite rows under a
//! declared [`schema::Schema`], with point lookup, forward/reverse range
//! slicing, tombstone deletion and explicit rebalancing. An [`index::Index`]
//! wraps one as a named, typed store; a [`table::Table`] owns a primary
//! index plus zero or more auxiliary indices and exposes insert/upsert/
//! update/delete together with a query planner (`slice`/`order_by`) that
//! picks whichever index, or chain of indices, can serve a given query.
//! Everything above the B-tree is expressed as a [`selection::Selection`]:
//! a lazy, composable row producer that `filter`, `limit`, `select`,
//! `order_by`, `derive` and `group_by` all return.
//!
//! This crate has no persistence, concurrency, or network surface: it is a
//! single-threaded, in-process library.

pub mod btree;
pub mod error;
pub mod index;
pub mod key;
pub mod row;
pub mod schema;
pub mod selection;
pub mod table;
pub mod value;

pub use error::{Error, Result};
pub use index::Index;
pub use key::Key;
pub use schema::{Column, Schema};
pub use selection::Selection;
pub use table::{Table, TableHandle};
pub use value::{Type, Value};
