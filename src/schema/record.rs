//! Record contract and field descriptor table
//!
//! A record type declares its table, its primary key and one [`Field`]
//! per struct field. Descriptors carry a typed getter/setter pair so the
//! store never needs runtime reflection.

use std::fmt;

use crate::error::DbResult;
use crate::value::{Value, ValueKind};

/// Tag that removes a field from the schema and from stored documents
pub const EXCLUDED_TAG: &str = "-";

/// A host type that can be stored in a table.
///
/// `Default` supplies the starting point when a document is decoded into a
/// fresh record: fields missing from the document keep their default.
pub trait Record: Default {
    /// Name of the backing table file, without extension
    fn table_name() -> &'static str;

    /// Field identifier or external name of the primary key field
    fn primary_key() -> &'static str;

    /// Field descriptors in declaration order
    fn fields() -> Vec<Field<Self>>;
}

/// Static description of one record field
pub struct Field<R> {
    name: &'static str,
    tag: &'static str,
    kind: ValueKind,
    get: fn(&R) -> DbResult<Value>,
    set: fn(&mut R, Value) -> DbResult<()>,
}

impl<R> Field<R> {
    pub fn new(
        name: &'static str,
        kind: ValueKind,
        get: fn(&R) -> DbResult<Value>,
        set: fn(&mut R, Value) -> DbResult<()>,
    ) -> Self {
        Self {
            name,
            tag: "",
            kind,
            get,
            set,
        }
    }

    /// Sets the serialization tag: `alias[,modifier...]` or `-` to exclude.
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Field identifier
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Alias portion of the tag, falling back to the field identifier
    pub fn external_name(&self) -> &'static str {
        match self.tag.split(',').next() {
            Some(alias) if !alias.is_empty() => alias,
            _ => self.name,
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.tag == EXCLUDED_TAG
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Reads the field from a record
    pub fn get(&self, record: &R) -> DbResult<Value> {
        (self.get)(record)
    }

    /// Assigns the field on a record
    pub fn set(&self, record: &mut R, value: Value) -> DbResult<()> {
        (self.set)(record, value)
    }
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Field<R> {}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Builds a [`Field`] for a struct field whose type is serde-serializable.
///
/// ```ignore
/// field!(User, id: Int)
/// field!(User, name: Str, "full_name,omitempty")
/// field!(User, token: Str, "-")
/// ```
#[macro_export]
macro_rules! field {
    ($record:ty, $field:ident : $kind:ident) => {
        $crate::schema::Field::<$record>::new(
            stringify!($field),
            $crate::value::ValueKind::$kind,
            |record: &$record| $crate::value::Value::encode(&record.$field),
            |record: &mut $record, value: $crate::value::Value| {
                record.$field = value.decode()?;
                Ok(())
            },
        )
    };
    ($record:ty, $field:ident : $kind:ident, $tag:literal) => {
        $crate::field!($record, $field: $kind).tag($tag)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;

    #[derive(Default)]
    struct Point {
        x: i32,
        label: String,
    }

    #[test]
    fn test_external_name_defaults_to_identifier() {
        let f = field!(Point, x: Int);
        assert_eq!(f.name(), "x");
        assert_eq!(f.external_name(), "x");
        assert!(!f.is_excluded());
    }

    #[test]
    fn test_external_name_strips_modifiers() {
        let f = field!(Point, label: Str, "tag,omitempty");
        assert_eq!(f.external_name(), "tag");

        let f = field!(Point, label: Str, ",omitempty");
        assert_eq!(f.external_name(), "label");
    }

    #[test]
    fn test_exclusion_tag() {
        assert!(field!(Point, label: Str, "-").is_excluded());
        // "-," names the field "-" rather than excluding it
        let f = field!(Point, label: Str, "-,");
        assert!(!f.is_excluded());
        assert_eq!(f.external_name(), "-");
    }

    #[test]
    fn test_get_and_set() {
        let f = field!(Point, x: Int);
        let mut p = Point::default();

        f.set(&mut p, Value::Int(42)).unwrap();
        assert_eq!(p.x, 42);
        assert_eq!(f.get(&p).unwrap(), Value::Int(42));
        assert!(f.set(&mut p, Value::from("x")).is_err());
    }
}
