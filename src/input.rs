//! Old input and request input storage
//!
//! Both the session's old input (values from a failed submission) and the
//! current request's input are read-only trees queried by dotted key.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::Node;
use crate::path;

/// Read-only view over submitted input
pub trait InputSource {
    /// Value at a dotted key (`"person.name"`), None when absent or null
    fn get(&self, key: &str) -> Option<Value>;

    /// Is there a non-null value at the dotted key?
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// True when nothing at all was submitted
    fn is_empty(&self) -> bool;
}

/// Input tree backed by a JSON value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct InputBag {
    data: Value,
}

impl InputBag {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Empty bag
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    /// Access the whole input tree
    pub fn all(&self) -> &Value {
        &self.data
    }
}

impl From<Value> for InputBag {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}

impl InputSource for InputBag {
    fn get(&self, key: &str) -> Option<Value> {
        // A literal top-level key wins over dotted traversal
        if let Some(value) = self.data.as_object().and_then(|map| map.get(key)) {
            return (!value.is_null()).then(|| value.clone());
        }

        // Dotted keys vary with submitted data, so they stay out of the parse cache
        path::resolve(&path::parse(key), Node::borrowed(&self.data))
            .filter(|node| !node.is_null())
            .map(Node::into_value)
    }

    fn is_empty(&self) -> bool {
        match &self.data {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_simple_key() {
        let bag = InputBag::new(json!({"agree": 1}));
        assert_eq!(bag.get("agree"), Some(json!(1)));
        assert!(bag.has("agree"));
    }

    #[test]
    fn get_nested_path() {
        let bag = InputBag::new(json!({"person": {"name": "John", "surname": "Doe"}}));
        assert_eq!(bag.get("person.name"), Some(json!("John")));
        assert_eq!(bag.get("person.surname"), Some(json!("Doe")));
    }

    #[test]
    fn get_array_index() {
        let bag = InputBag::new(json!({"checkbox_array": [1, 2, 3]}));
        assert_eq!(bag.get("checkbox_array"), Some(json!([1, 2, 3])));
        assert_eq!(bag.get("checkbox_array.1"), Some(json!(2)));
    }

    #[test]
    fn literal_dotted_key_wins() {
        let bag = InputBag::new(json!({"name.with.dots": "some value", "name": {"with": {"dots": "nested"}}}));
        assert_eq!(bag.get("name.with.dots"), Some(json!("some value")));
    }

    #[test]
    fn null_counts_as_absent() {
        let bag = InputBag::new(json!({"a": null, "b": {"c": null}}));
        assert_eq!(bag.get("a"), None);
        assert_eq!(bag.get("b.c"), None);
        assert!(!bag.has("a"));
    }

    #[test]
    fn missing_path() {
        let bag = InputBag::new(json!({"a": 1}));
        assert!(bag.get("a.b").is_none());
        assert!(bag.get("unknown").is_none());
    }

    #[test]
    fn emptiness() {
        assert!(InputBag::empty().is_empty());
        assert!(InputBag::default().is_empty());
        assert!(!InputBag::new(json!([1])).is_empty());
        assert!(!InputBag::new(json!({"a": 1})).is_empty());
    }

    #[test]
    fn deserialize_transparent() {
        let bag: InputBag = serde_yaml::from_str("countries: ['1']").unwrap();
        assert_eq!(bag.get("countries"), Some(json!(["1"])));
    }
}
