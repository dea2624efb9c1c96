//! Expression filtering for query execution
//!
//! Matching rules:
//! - unknown field: `!=` matches, every other operator does not
//! - the document value is looked up by external name, then identifier;
//!   an absent key reads as null
//! - `=` needs a successful comparison equal to zero
//! - `!=` matches on a non-zero result or on a failed comparison
//! - `>` additionally requires the column's declared kind to be orderable;
//!   `>=`, `<`, `<=` do not check the kind

use std::cmp::Ordering;

use crate::document::Document;
use crate::schema::Schema;
use crate::value::{compare, Value};

use super::ast::{Expression, Operator};

/// Evaluates expressions against documents
pub struct ExpressionFilter;

impl ExpressionFilter {
    /// Checks if a document matches all expressions (AND, short-circuit)
    pub fn matches(schema: &Schema, document: &Document, expressions: &[Expression]) -> bool {
        expressions
            .iter()
            .all(|expr| Self::matches_expression(schema, document, expr))
    }

    /// Checks if a document matches a single expression
    pub fn matches_expression(schema: &Schema, document: &Document, expr: &Expression) -> bool {
        let column = match schema.get_column(&expr.field) {
            Ok(column) => column,
            Err(_) => return expr.op == Operator::Ne,
        };

        let null = Value::Null;
        let actual = column.value_in(document).unwrap_or(&null);
        let ordering = compare(actual, &expr.value);

        match expr.op {
            Operator::Eq => ordering == Ok(Ordering::Equal),
            Operator::Ne => ordering != Ok(Ordering::Equal),
            Operator::Gt => column.kind.is_comparable() && ordering == Ok(Ordering::Greater),
            Operator::Ge => matches!(ordering, Ok(Ordering::Greater | Ordering::Equal)),
            Operator::Lt => ordering == Ok(Ordering::Less),
            Operator::Le => matches!(ordering, Ok(Ordering::Less | Ordering::Equal)),
        }
    }
}
