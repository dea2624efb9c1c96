//! Column metadata and schema derivation
//!
//! A schema is derived from a record type on every operation. Exactly one
//! column is primary; when several fields match the declared key the first
//! one in declaration order wins.

use crate::document::Document;
use crate::error::{DbError, DbResult};
use crate::value::{Value, ValueKind};

use super::record::Record;

/// Derived metadata for one stored field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field identifier
    pub name: String,
    /// Key used in stored documents
    pub external_name: String,
    pub primary: bool,
    /// Declared kind of the field
    pub kind: ValueKind,
}

impl Column {
    pub fn new(name: impl Into<String>, external_name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            external_name: external_name.into(),
            primary: false,
            kind,
        }
    }

    /// True when `field` names this column by identifier or external name
    pub fn matches(&self, field: &str) -> bool {
        self.name == field || self.external_name == field
    }

    /// Reads this column's value from a document, external name first
    pub fn value_in<'d>(&self, document: &'d Document) -> Option<&'d Value> {
        document.getter(&[&self.external_name, &self.name])
    }
}

/// Table name plus ordered column metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    table_name: String,
    columns: Vec<Column>,
}

impl Schema {
    /// Builds a schema, marking the first column matching `primary_key`.
    ///
    /// Fails with `PrimaryKeyMissing` when no column matches.
    pub fn new(
        table_name: impl Into<String>,
        primary_key: &str,
        mut columns: Vec<Column>,
    ) -> DbResult<Self> {
        let table_name = table_name.into();
        for column in columns.iter_mut() {
            column.primary = false;
        }
        match columns.iter_mut().find(|c| c.matches(primary_key)) {
            Some(column) => column.primary = true,
            None => return Err(DbError::primary_key_missing(table_name)),
        }
        Ok(Self {
            table_name,
            columns,
        })
    }

    /// Derives the schema of a record type from its field table.
    pub fn of<R: Record>() -> DbResult<Self> {
        let columns = R::fields()
            .iter()
            .filter(|field| !field.is_excluded())
            .map(|field| Column::new(field.name(), field.external_name(), field.kind()))
            .collect();
        Self::new(R::table_name(), R::primary_key(), columns)
    }

    /// Infers a schema for an untyped table from its stored documents.
    ///
    /// Columns follow first-seen key order; a column's kind is taken from
    /// its first non-null value. The primary key column is appended with
    /// kind `null` when no document carries it.
    pub fn infer(
        table_name: impl Into<String>,
        primary_key: &str,
        documents: &[Document],
    ) -> DbResult<Self> {
        let mut columns: Vec<Column> = Vec::new();
        for document in documents {
            for (key, value) in document {
                match columns.iter_mut().find(|c| c.name == *key) {
                    Some(column) if column.kind == ValueKind::Null => column.kind = value.kind(),
                    Some(_) => {}
                    None => columns.push(Column::new(key.clone(), key.clone(), value.kind())),
                }
            }
        }
        if !columns.iter().any(|c| c.matches(primary_key)) {
            columns.push(Column::new(primary_key, primary_key, ValueKind::Null));
        }
        Self::new(table_name, primary_key, columns)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn primary_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary)
    }

    /// Looks up a column by identifier or external name
    pub fn get_column(&self, field: &str) -> DbResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.matches(field))
            .ok_or_else(|| DbError::ColumnNotExists(field.to_string()))
    }

    /// Reads the current value of a named field from a record instance
    pub fn get_field_value<R: Record>(&self, record: &R, field: &str) -> DbResult<(Value, &Column)> {
        let column = self.get_column(field)?;
        let descriptor = R::fields()
            .into_iter()
            .find(|f| !f.is_excluded() && f.name() == column.name)
            .ok_or_else(|| DbError::ColumnNotExists(field.to_string()))?;
        Ok((descriptor.get(record)?, column))
    }

    /// Reads the primary key value from a record instance.
    ///
    /// Any lookup failure is reported as `PrimaryKeyMissing`.
    pub fn primary_value<R: Record>(&self, record: &R) -> DbResult<Value> {
        let primary = self
            .primary_column()
            .ok_or_else(|| DbError::primary_key_missing(&self.table_name))?;
        self.get_field_value(record, &primary.name)
            .map(|(value, _)| value)
            .map_err(|_| DbError::primary_key_missing(&self.table_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use crate::schema::Field;

    #[derive(Debug, Default)]
    struct Account {
        id: u64,
        email: String,
        balance: f64,
        password: String,
    }

    impl Record for Account {
        fn table_name() -> &'static str {
            "accounts"
        }

        fn primary_key() -> &'static str {
            "account_id"
        }

        fn fields() -> Vec<Field<Self>> {
            vec![
                field!(Account, id: UInt, "account_id"),
                field!(Account, email: Str, "email,omitempty"),
                field!(Account, balance: Float),
                field!(Account, password: Str, "-"),
            ]
        }
    }

    #[derive(Debug, Default)]
    struct Orphan {
        value: i64,
    }

    impl Record for Orphan {
        fn table_name() -> &'static str {
            "orphans"
        }

        fn primary_key() -> &'static str {
            "id"
        }

        fn fields() -> Vec<Field<Self>> {
            vec![field!(Orphan, value: Int)]
        }
    }

    #[derive(Debug, Default)]
    struct Twin {
        id: i64,
        code: i64,
    }

    impl Record for Twin {
        fn table_name() -> &'static str {
            "twins"
        }

        fn primary_key() -> &'static str {
            "id"
        }

        fn fields() -> Vec<Field<Self>> {
            vec![field!(Twin, code: Int, "id"), field!(Twin, id: Int)]
        }
    }

    #[test]
    fn test_schema_derivation() {
        let schema = Schema::of::<Account>().unwrap();

        assert_eq!(schema.table_name(), "accounts");
        let names: Vec<_> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "balance"]);
        assert_eq!(schema.columns()[1].external_name, "email");
        assert_eq!(schema.columns()[2].kind, ValueKind::Float);
    }

    #[test]
    fn test_primary_key_by_external_name() {
        let schema = Schema::of::<Account>().unwrap();
        let primary = schema.primary_column().unwrap();
        assert_eq!(primary.name, "id");
        assert_eq!(primary.external_name, "account_id");
    }

    #[test]
    fn test_missing_primary_key_fails() {
        let err = Schema::of::<Orphan>().unwrap_err();
        assert!(matches!(err, DbError::PrimaryKeyMissing { ref table } if table == "orphans"));
    }

    #[test]
    fn test_first_matching_primary_wins() {
        let schema = Schema::of::<Twin>().unwrap();
        assert_eq!(schema.primary_column().unwrap().name, "code");
        assert_eq!(schema.columns().iter().filter(|c| c.primary).count(), 1);
    }

    #[test]
    fn test_get_column() {
        let schema = Schema::of::<Account>().unwrap();
        assert_eq!(schema.get_column("account_id").unwrap().name, "id");
        assert_eq!(schema.get_column("id").unwrap().name, "id");
        assert!(matches!(
            schema.get_column("password"),
            Err(DbError::ColumnNotExists(_))
        ));
    }

    #[test]
    fn test_field_and_primary_values() {
        let schema = Schema::of::<Account>().unwrap();
        let account = Account {
            id: 9,
            email: "a@b.c".into(),
            balance: 1.5,
            password: "hunter2".into(),
        };

        let (value, column) = schema.get_field_value(&account, "email").unwrap();
        assert_eq!(value, Value::from("a@b.c"));
        assert_eq!(column.name, "email");

        assert_eq!(schema.primary_value(&account).unwrap(), Value::Int(9));
        assert!(schema.get_field_value(&account, "nope").is_err());
    }

    #[test]
    fn test_primary_value_maps_lookup_failure() {
        // schema of a different record type: the primary column has no descriptor
        let schema = Schema::new(
            "accounts",
            "ghost",
            vec![Column::new("ghost", "ghost", ValueKind::Int)],
        )
        .unwrap();
        let err = schema.primary_value(&Account::default()).unwrap_err();
        assert!(matches!(err, DbError::PrimaryKeyMissing { .. }));
    }

    #[test]
    fn test_infer_from_documents() {
        let mut first = Document::new();
        first.insert("id", 1i64);
        first.insert("nick", Value::Null);
        let mut second = Document::new();
        second.insert("nick", "z");
        second.insert("score", 2.5f64);

        let schema = Schema::infer("players", "id", &[first, second]).unwrap();
        assert_eq!(schema.primary_column().unwrap().name, "id");
        assert_eq!(schema.get_column("nick").unwrap().kind, ValueKind::Str);
        assert_eq!(schema.get_column("score").unwrap().kind, ValueKind::Float);
    }

    #[test]
    fn test_infer_empty_table_adds_primary() {
        let schema = Schema::infer("empty", "id", &[]).unwrap();
        assert_eq!(schema.columns().len(), 1);
        assert!(schema.primary_column().is_some());
    }
}
