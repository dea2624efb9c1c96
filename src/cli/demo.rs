//! Users walkthrough for `jsondb demo`
//!
//! Inserts, replaces, finds, queries and deletes a small `users` table,
//! printing one JSON line per step. Failed steps are reported and the
//! walkthrough continues. Meant for an empty data directory; an existing
//! `users` table gets the demo rows appended.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::DbResult;
use crate::field;
use crate::query::Operator;
use crate::schema::{Field, Record};
use crate::store::Store;

use super::errors::CliResult;
use super::io::write_line;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl Record for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn primary_key() -> &'static str {
        "id"
    }

    fn fields() -> Vec<Field<Self>> {
        vec![field!(User, id: Int), field!(User, name: Str)]
    }
}

pub fn run<W: Write>(store: &Store, out: &mut W) -> CliResult<()> {
    report(out, "insert", {
        let user = User::new(1, "Hello");
        store.insert(&user).and_then(|_| to_value(&user))
    })?;

    report(out, "replace_into", {
        let user = User::new(2, "Test");
        store.replace_into(&user).and_then(|_| to_value(&user))
    })?;

    report(out, "find", find(store, 2))?;

    report(out, "replace_into", {
        let user = User::new(2, "Updated");
        store.replace_into(&user).and_then(|_| to_value(&user))
    })?;

    report(out, "query", {
        store
            .query::<User>()
            .and_then(|query| query.and_where("id", Operator::Gt, 0i64).records::<User>())
            .and_then(|users| to_value(&users))
    })?;

    report(out, "delete", {
        let user = User::new(1, "");
        store.delete(&user).map(|_| json!({ "id": 1 }))
    })?;

    report(out, "find", find(store, 1))
}

fn find(store: &Store, id: i64) -> DbResult<Value> {
    let mut user = User {
        id,
        ..Default::default()
    };
    store.find(&mut user)?;
    to_value(&user)
}

fn to_value<T: Serialize>(value: &T) -> DbResult<Value> {
    Ok(serde_json::to_value(value)?)
}

fn report<W: Write>(out: &mut W, step: &str, result: DbResult<Value>) -> CliResult<()> {
    match result {
        Ok(data) => write_line(
            out,
            &json!({
                "step": step,
                "status": "ok",
                "data": data
            }),
        ),
        Err(e) => write_line(
            out,
            &json!({
                "step": step,
                "status": "error",
                "code": e.code(),
                "message": e.to_string()
            }),
        ),
    }
}
