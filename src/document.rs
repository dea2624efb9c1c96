//! Documents: the stored form of a record
//!
//! A document maps each field's external name to a dynamic [`Value`].
//! Keys are kept sorted so a rewritten table file is byte-stable.

use std::collections::btree_map::{self, BTreeMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DbResult;
use crate::schema::Record;
use crate::value::Value;

/// A string-keyed mapping of dynamic values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a record into a document using its field table.
    ///
    /// Excluded fields are skipped; structured field values become nested
    /// documents.
    pub fn from_record<R: Record>(record: &R) -> DbResult<Document> {
        let mut doc = Document::new();
        for field in R::fields() {
            if field.is_excluded() {
                continue;
            }
            doc.insert(field.external_name(), field.get(record)?);
        }
        Ok(doc)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Returns the value of the first candidate key that is present.
    ///
    /// Callers pass the external name before the field identifier so either
    /// spelling in the stored document is accepted.
    pub fn getter(&self, names: &[&str]) -> Option<&Value> {
        names.iter().find_map(|name| self.0.get(*name))
    }

    /// Projects the document onto a plain serde type by key name.
    ///
    /// Stored keys are laid over `T::default()`, so missing keys keep their
    /// default and unknown keys are ignored. Field tables play no part here;
    /// records go through [`decode_record`](Self::decode_record).
    pub fn project<T: Serialize + DeserializeOwned + Default>(&self) -> DbResult<T> {
        let mut json = serde_json::to_value(T::default())?;
        match json.as_object_mut() {
            Some(base) => {
                for (key, value) in self.iter() {
                    base.insert(key.clone(), serde_json::Value::from(value.clone()));
                }
            }
            None => json = serde_json::to_value(self)?,
        }
        Ok(serde_json::from_value(json)?)
    }

    /// Decodes the document into a fresh record.
    ///
    /// Fields without a matching key keep their `Default` value.
    pub fn decode_record<R: Record>(&self) -> DbResult<R> {
        let mut record = R::default();
        self.decode_into(&mut record)?;
        Ok(record)
    }

    /// Decodes the document into an existing record.
    ///
    /// Only fields present in the document are assigned; a `null` that the
    /// field type cannot hold leaves the field untouched.
    pub fn decode_into<R: Record>(&self, record: &mut R) -> DbResult<()> {
        for field in R::fields() {
            if field.is_excluded() {
                continue;
            }
            let value = match self.getter(&[field.external_name(), field.name()]) {
                Some(value) => value.clone(),
                None => continue,
            };
            let was_null = value.is_null();
            match field.set(record, value) {
                Ok(()) => {}
                Err(_) if was_null => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Document(map)
    }
}
