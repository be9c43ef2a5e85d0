//! Column and schema declarations.
//!
//! A [`Schema`] fixes, once and for all, the ordered list of key columns
//! and value columns a [`crate::table::Table`] or [`crate::index::Index`]
//! stores rows under. Row arity and sort-key length are derived from it.

use std::fmt;

use crate::error::{Error, Result};
use crate::value::Type;

/// A single named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: Type,
}

impl Column {
    pub fn new<S: Into<String>>(name: S, ty: Type) -> Column {
        Column {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.ty)
    }
}

/// `(key_columns, value_columns)`: an ordered list of key columns followed
/// by an ordered list of value columns. A row's length is
/// `key.len() + value.len()`; the first `key.len()` fields are the sort
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    key: Vec<Column>,
    value: Vec<Column>,
}

impl Schema {
    pub fn new(key: Vec<Column>, value: Vec<Column>) -> Schema {
        Schema { key, value }
    }

    /// Number of key columns.
    pub fn key_len(&self) -> usize {
        self.key.len()
    }

    /// Total row arity: key columns plus value columns.
    pub fn len(&self) -> usize {
        self.key.len() + self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key_columns(&self) -> &[Column] {
        &self.key
    }

    pub fn value_columns(&self) -> &[Column] {
        &self.value
    }

    /// All columns, key columns first, in schema order.
    pub fn columns(&self) -> Vec<&Column> {
        self.key.iter().chain(self.value.iter()).collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns().into_iter().map(|c| c.name.clone()).collect()
    }

    pub fn key_names(&self) -> Vec<String> {
        self.key.iter().map(|c| c.name.clone()).collect()
    }

    /// Position of a column by name, searching key columns then value
    /// columns, matching schema order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.column_names().iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| self.columns()[i])
    }

    /// Build a new schema that is a projection of `self` onto `names`, in
    /// the order given. Used by `ColumnSelection::schema` and by
    /// `Table::add_index` to derive an auxiliary index's schema.
    pub fn project(&self, names: &[String]) -> Result<Schema> {
        let columns = self.columns();
        let mut projected = Vec::with_capacity(names.len());
        for name in names {
            let col = columns
                .iter()
                .find(|c| &c.name == name)
                .ok_or_else(|| Error::InvalidArgument(format!("unknown column {:?}", name)))?;
            projected.push((*col).clone());
        }
        Ok(Schema::new(projected, Vec::new()))
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.columns().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;
