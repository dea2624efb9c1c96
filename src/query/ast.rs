//! Query expression structures
//!
//! An expression is a single `field <op> literal` condition. Expressions in
//! a query are combined with AND.

use std::fmt;
use std::str::FromStr;

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// field = value
    Eq,
    /// field != value
    Ne,
    /// field > value
    Gt,
    /// field >= value
    Ge,
    /// field < value
    Lt,
    /// field <= value
    Le,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }
}

impl FromStr for Operator {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            other => Err(DbError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Matched against column identifier or external name
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Expression {
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Parses `field<op>literal`, e.g. `age>=18` or `name = "Bob"`.
    ///
    /// The literal is read as JSON when it parses, otherwise it is taken as
    /// a raw string, so `name=Bob` and `name="Bob"` are equivalent.
    pub fn parse(input: &str) -> DbResult<Self> {
        let start = input
            .find(|c| matches!(c, '=' | '!' | '<' | '>'))
            .ok_or_else(|| DbError::InvalidWhere(input.to_string()))?;
        let field = input[..start].trim();
        let rest = &input[start..];
        let op_len = rest
            .chars()
            .take(2)
            .take_while(|c| matches!(c, '=' | '!' | '<' | '>'))
            .count();
        let op: Operator = rest[..op_len].parse()?;
        let literal = rest[op_len..].trim();

        if field.is_empty() || literal.is_empty() {
            return Err(DbError::InvalidWhere(input.to_string()));
        }

        let value = match serde_json::from_str::<serde_json::Value>(literal) {
            Ok(json) => Value::from(json),
            Err(_) => Value::from(literal),
        };
        Ok(Self::new(field, op, value))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literal = serde_json::Value::from(self.value.clone());
        write!(f, "{} {} {}", self.field, self.op, literal)
    }
}
