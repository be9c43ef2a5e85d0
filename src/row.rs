//! A borrowed, read-only view of a row that lets predicates and derived
//! columns address fields by name instead of position.
//!
//! `Row` never materialises a `HashMap`: `get` is a linear scan over the
//! schema's column list, which is short (column counts are small) and
//! keeps the common case -- one or two lookups per predicate -- free of
//! allocation.

use crate::schema::Schema;
use crate::value::Value;

pub struct Row<'a> {
    schema: &'a Schema,
    fields: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn new(schema: &'a Schema, fields: &'a [Value]) -> Row<'a> {
        Row { schema, fields }
    }

    /// The field stored under `name`, if the schema declares such a column.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.schema.position(name).map(|i| &self.fields[i])
    }

    pub fn fields(&self) -> &'a [Value] {
        self.fields
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }
}
