//! Ready-made model backed by a JSON attribute map
//!
//! `Record` covers what most applications need from a bound model:
//! - attributes (`serde_json::Map`, insertion ordered)
//! - relations to other records
//! - display accessors (what views show)
//! - form mutators (what forms show), matched by studly-cased name, so
//!   `created_at` and `createdAt` name the same `formCreatedAtAttribute`
//!
//! The mutator name index is built lazily on first lookup and cached for the
//! lifetime of the record.

use std::fmt;

use once_cell::unsync::OnceCell;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::error::FormError;
use crate::model::{FormAccessible, Model, Node};
use crate::util::studly;

/// Accessor or mutator callback: receives the record and the raw value
pub type Accessor = Box<dyn Fn(&Record, Value) -> Value>;

/// Attribute-map model with relations, display accessors and form mutators
#[derive(Default)]
pub struct Record {
    attributes: Map<String, Value>,
    relations: FxHashMap<String, Record>,
    accessors: FxHashMap<String, Accessor>,
    form_mutators: FxHashMap<String, Accessor>,
    /// "formCreatedAtAttribute" → registered key
    mutator_index: OnceCell<FxHashMap<String, String>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object (nested objects stay plain values)
    pub fn from_value(value: Value) -> Result<Self, FormError> {
        match value {
            Value::Object(attributes) => Ok(Self {
                attributes,
                ..Self::default()
            }),
            other => Err(FormError::InvalidModel {
                value_type: value_type(&other).to_string(),
            }),
        }
    }

    /// Set an attribute (builder style)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Attach a related record
    pub fn with_relation(mut self, key: impl Into<String>, related: Record) -> Self {
        self.relations.insert(key.into(), related);
        self
    }

    /// Register a display accessor (used by views and by forms without a form mutator)
    pub fn with_accessor<F>(mut self, key: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Record, Value) -> Value + 'static,
    {
        self.accessors.insert(key.into(), Box::new(accessor));
        self
    }

    /// Register a form mutator
    pub fn with_form_mutator<F>(mut self, key: impl Into<String>, mutator: F) -> Self
    where
        F: Fn(&Record, Value) -> Value + 'static,
    {
        self.form_mutators.insert(key.into(), Box::new(mutator));
        // Registrations change the name index
        self.mutator_index = OnceCell::new();
        self
    }

    /// Raw attribute map
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Related record by name
    pub fn relation(&self, key: &str) -> Option<&Record> {
        self.relations.get(key)
    }

    /// Display value of an attribute, as a view would show it
    pub fn display_value(&self, key: &str) -> Option<Value> {
        self.attribute(key).map(Node::into_value)
    }

    fn mutator_index(&self) -> &FxHashMap<String, String> {
        self.mutator_index.get_or_init(|| {
            self.form_mutators
                .keys()
                .map(|key| (form_mutator_name(key), key.clone()))
                .collect()
        })
    }

    fn form_mutator(&self, key: &str) -> Option<&Accessor> {
        let registered = self.mutator_index().get(&form_mutator_name(key))?;
        self.form_mutators.get(registered)
    }
}

/// Conventional form mutator name for an attribute key
///
/// "created_at" → "formCreatedAtAttribute"
pub fn form_mutator_name(key: &str) -> String {
    format!("form{}Attribute", studly(key))
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Model for Record {
    fn attribute(&self, key: &str) -> Option<Node<'_>> {
        if let Some(accessor) = self.accessors.get(key) {
            let raw = self.attributes.get(key).cloned().unwrap_or(Value::Null);
            return Some(Node::owned(accessor(self, raw)));
        }
        if let Some(value) = self.attributes.get(key) {
            return Some(Node::borrowed(value));
        }
        self.relations.get(key).map(|related| Node::Model(related))
    }

    fn raw_attribute(&self, key: &str) -> Option<Value> {
        self.attributes.get(key).cloned()
    }

    fn to_value(&self) -> Value {
        let mut snapshot = self.attributes.clone();
        for (key, related) in &self.relations {
            snapshot
                .entry(key.clone())
                .or_insert_with(|| related.to_value());
        }
        Value::Object(snapshot)
    }

    fn form_accessor(&self) -> Option<&dyn FormAccessible> {
        if self.form_mutators.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl FormAccessible for Record {
    fn has_form_mutator(&self, key: &str) -> bool {
        self.form_mutator(key).is_some()
    }

    fn mutate_form_attribute(&self, key: &str, value: Value) -> Value {
        match self.form_mutator(key) {
            Some(mutator) => mutator(self, value),
            None => value,
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("attributes", &self.attributes)
            .field("relations", &self.relations)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .field("form_mutators", &self.form_mutators.keys().collect::<Vec<_>>())
            .finish()
    }
}
