//! Query builder and executor
//!
//! A query owns a snapshot of a table's documents taken when it was built.
//! Conditions, offset and limit are accumulated first; every call to
//! `documents`, `find`, `records`, `project`, `count` or `first` evaluates
//! the snapshot from scratch.
//!
//! Execution order:
//! 1. Empty snapshot: `RecordNotFound`
//! 2. Scan documents in file order
//! 3. Keep documents matching every expression
//! 4. Skip the first `offset` matches
//! 5. Stop after `limit` matches (0 = unbounded)

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::document::Document;
use crate::error::{DbError, DbResult};
use crate::schema::{Record, Schema};
use crate::value::Value;

use super::ast::{Expression, Operator};
use super::filters::ExpressionFilter;

/// Fluent query over a table snapshot
#[derive(Debug, Clone)]
pub struct Query {
    schema: Schema,
    documents: Vec<Document>,
    expressions: Vec<Expression>,
    offset: usize,
    limit: usize,
}

impl Query {
    pub fn new(schema: Schema, documents: Vec<Document>) -> Self {
        Self {
            schema,
            documents,
            expressions: Vec::new(),
            offset: 0,
            limit: 0,
        }
    }

    /// Adds a condition; all conditions must hold for a document to match.
    pub fn and_where(self, field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.with_expression(Expression::new(field, op, value))
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }

    /// Skips the first `n` matches
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = n;
        self
    }

    /// Returns at most `n` matches; 0 removes the limit
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// Number of documents in the snapshot
    pub fn snapshot_len(&self) -> usize {
        self.documents.len()
    }

    fn matching(&self) -> DbResult<impl Iterator<Item = &Document> + '_> {
        if self.documents.is_empty() {
            return Err(DbError::RecordNotFound);
        }
        let limit = if self.limit == 0 { usize::MAX } else { self.limit };
        Ok(self
            .documents
            .iter()
            .filter(move |doc| ExpressionFilter::matches(&self.schema, doc, &self.expressions))
            .skip(self.offset)
            .take(limit))
    }

    /// Returns the matching documents.
    ///
    /// An empty snapshot is `RecordNotFound`; a non-empty snapshot with no
    /// matches yields an empty vector.
    pub fn documents(&self) -> DbResult<Vec<Document>> {
        Ok(self.matching()?.cloned().collect())
    }

    /// Decodes each match into a fresh record and appends it to `out`.
    ///
    /// Records are decoded through their field table: aliased keys are
    /// honoured, excluded fields and missing keys keep their `Default`.
    /// `out` is left untouched when any match fails to decode.
    pub fn find<R: Record>(&self, out: &mut Vec<R>) -> DbResult<()> {
        let decoded = self.records()?;
        out.extend(decoded);
        Ok(())
    }

    /// Decodes each match into a fresh record through its field table
    pub fn records<R: Record>(&self) -> DbResult<Vec<R>> {
        self.matching()?.map(Document::decode_record).collect()
    }

    /// Projects each match onto a plain serde type by key name and appends
    /// it to `out`; missing keys keep their default.
    pub fn project<T>(&self, out: &mut Vec<T>) -> DbResult<()>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let projected = self
            .matching()?
            .map(Document::project)
            .collect::<DbResult<Vec<T>>>()?;
        out.extend(projected);
        Ok(())
    }

    /// Number of matches after offset and limit
    pub fn count(&self) -> DbResult<usize> {
        Ok(self.matching()?.count())
    }

    /// First match after offset decoded as a record, or `RecordNotFound`
    pub fn first<R: Record>(&self) -> DbResult<R> {
        self.matching()?
            .next()
            .ok_or(DbError::RecordNotFound)?
            .decode_record()
    }
}
