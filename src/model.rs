//! Bound models and the form accessor capability
//!
//! A field path is resolved against a tree of [`Node`]s: plain nested values
//! (`serde_json::Value` mappings and sequences) or models exposing keyed
//! attribute access. Models may hold other models (relations), so a path like
//! `related[address][street]` hops model → model → mapping.
//!
//! Models that opt into [`FormAccessible`] can transform a raw attribute
//! specifically for form display. At every model hop the rule is:
//!
//! ```text
//! has form mutator for key?  ── yes ──▶ mutator(raw stored value)
//!          │
//!          no
//!          ▼
//! model.attribute(key)   (display value, may run a display accessor)
//! ```

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::path;

/// A position in the resolution tree
#[derive(Clone)]
pub enum Node<'a> {
    /// Plain value: mapping, sequence or scalar
    Value(Cow<'a, Value>),
    /// Object exposing keyed attribute access
    Model(&'a dyn Model),
}

impl<'a> Node<'a> {
    /// Borrow a plain value
    pub fn borrowed(value: &'a Value) -> Self {
        Node::Value(Cow::Borrowed(value))
    }

    /// Wrap a computed value
    pub fn owned(value: Value) -> Self {
        Node::Value(Cow::Owned(value))
    }

    /// Step into a named key
    ///
    /// Mappings use keyed lookup, sequences accept a decimal key as an index,
    /// models go through their form accessor. Anything else is a dead end.
    pub fn key(self, key: &str) -> Option<Node<'a>> {
        match self {
            Node::Model(model) => model.form_attribute(key),
            Node::Value(Cow::Borrowed(value)) => lookup_key(value, key).map(Node::borrowed),
            Node::Value(Cow::Owned(value)) => lookup_key(&value, key).cloned().map(Node::owned),
        }
    }

    /// Step into a numeric index
    ///
    /// Sequences use positional lookup; mappings and models look up the
    /// decimal key (`{"1": "L"}` answers index 1).
    pub fn index(self, index: usize) -> Option<Node<'a>> {
        match self {
            Node::Model(model) => model.form_attribute(&index.to_string()),
            Node::Value(Cow::Borrowed(value)) => lookup_index(value, index).map(Node::borrowed),
            Node::Value(Cow::Owned(value)) => {
                lookup_index(&value, index).cloned().map(Node::owned)
            }
        }
    }

    /// True for a plain JSON null
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Value(value) if value.is_null())
    }

    /// Collapse into a plain value (models become their attribute snapshot)
    pub fn into_value(self) -> Value {
        match self {
            Node::Value(value) => value.into_owned(),
            Node::Model(model) => model.to_value(),
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Node::Model(model) => f.debug_tuple("Model").field(&model.to_value()).finish(),
        }
    }
}

fn lookup_key<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

fn lookup_index(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.get(&index.to_string()),
        _ => None,
    }
}

/// Keyed attribute access for an application-supplied model
pub trait Model {
    /// Attribute as the model presents it for display
    ///
    /// Runs the model's display accessor when it has one. Relations are
    /// returned as `Node::Model` so resolution can keep hopping.
    fn attribute(&self, key: &str) -> Option<Node<'_>>;

    /// Raw stored attribute, before any accessor runs
    fn raw_attribute(&self, key: &str) -> Option<Value>;

    /// Snapshot of the model as a plain value
    fn to_value(&self) -> Value;

    /// The form accessor capability, for models that opt in
    fn form_accessor(&self) -> Option<&dyn FormAccessible> {
        None
    }

    /// Attribute as it should appear in a form (one hop)
    ///
    /// A registered form mutator receives the raw stored value (null when
    /// missing) and bypasses the display accessor. Without one the display
    /// value is returned unchanged.
    fn form_attribute(&self, key: &str) -> Option<Node<'_>> {
        if let Some(accessor) = self.form_accessor() {
            if accessor.has_form_mutator(key) {
                let raw = self.raw_attribute(key).unwrap_or(Value::Null);
                return Some(Node::owned(accessor.mutate_form_attribute(key, raw)));
            }
        }
        self.attribute(key)
    }

    /// Form value for a dotted or bracketed field name
    ///
    /// Every model reached along the path applies its own form mutators.
    fn form_value(&self, name: &str) -> Option<Value>
    where
        Self: Sized,
    {
        path::resolve(&path::parse(name), Node::Model(self)).map(Node::into_value)
    }
}

/// Plain nested data bound as a model (no accessors, no form mutators)
impl Model for Value {
    fn attribute(&self, key: &str) -> Option<Node<'_>> {
        lookup_key(self, key).map(Node::borrowed)
    }

    fn raw_attribute(&self, key: &str) -> Option<Value> {
        lookup_key(self, key).cloned()
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// Per-attribute form mutators
///
/// Distinct from display accessors: a model can present `created_at` as
/// "1 second ago" in views while forms receive a timestamp.
pub trait FormAccessible {
    /// Does a form mutator exist for `key`?
    fn has_form_mutator(&self, key: &str) -> bool;

    /// Apply the form mutator for `key` to the raw stored value
    ///
    /// Only called after `has_form_mutator(key)` returned true.
    fn mutate_form_attribute(&self, key: &str, value: Value) -> Value;
}
