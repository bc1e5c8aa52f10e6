//! Ordered HTML attribute maps and their rendering
//!
//! Insertion order is rendering order. `set` overwrites an existing entry in
//! place and appends new ones, so builders can layer caller options, config
//! defaults and computed attributes (`name`, `type`, `value`, `id`) without
//! reshuffling what the caller wrote.

use std::fmt;

use serde_json::Value;

use crate::compare::scalar_string;
use crate::error::FormError;
use crate::util::escape;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// `key="text"`
    Text(String),
    /// `true` renders the bare key, `false` renders nothing
    Bool(bool),
    /// Space-joined, e.g. class lists
    List(Vec<String>),
    /// Never rendered (keeps its position)
    Null,
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Convert a JSON value; mappings and nested sequences have no attribute form
    pub fn from_json(value: &Value) -> Option<AttrValue> {
        match value {
            Value::Null => Some(AttrValue::Null),
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::Number(n) => Some(AttrValue::Text(n.to_string())),
            Value::String(s) => Some(AttrValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .filter(|item| !matches!(item, Value::Null | Value::Bool(false)))
                .map(scalar_string)
                .collect::<Option<Vec<_>>>()
                .map(AttrValue::List),
            Value::Object(_) => None,
        }
    }

    /// Words of a class-like value
    fn words(&self) -> Vec<String> {
        match self {
            AttrValue::Text(text) => text.split_whitespace().map(str::to_string).collect(),
            AttrValue::List(items) => items.clone(),
            AttrValue::Bool(_) | AttrValue::Null => Vec::new(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Text(value.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(value: Vec<&str>) -> Self {
        AttrValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

/// Ordered attribute map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON mapping or a list of flags
    ///
    /// `{class: btn, disabled: true}` and `[disabled, readonly]` are both
    /// accepted; null means no attributes.
    pub fn from_value(value: &Value, element: &str) -> Result<Self, FormError> {
        let invalid = || FormError::InvalidAttributes {
            element: element.to_string(),
        };
        let mut attributes = Attributes::new();
        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    // Numeric keys carry a flag name: {0: disabled}
                    if key.bytes().all(|b| b.is_ascii_digit()) {
                        let flag = value.as_str().ok_or_else(invalid)?;
                        attributes.flag(flag);
                        continue;
                    }
                    let value = AttrValue::from_json(value).ok_or_else(invalid)?;
                    attributes.set(key.as_str(), value);
                }
            }
            Value::Array(items) => {
                for item in items {
                    let flag = item.as_str().ok_or_else(invalid)?;
                    attributes.flag(flag);
                }
            }
            _ => return Err(invalid()),
        }
        Ok(attributes)
    }

    /// Set a value, overwriting in place or appending
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Add a boolean attribute (`disabled`, `multiple`, `readonly`)
    pub fn flag(&mut self, key: impl Into<String>) {
        self.set(key, true);
    }

    /// Set only when the key is absent
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        if !self.contains_key(&key) {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text value of an attribute
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_text)
    }

    /// Present with a non-null value
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Overlay another map: existing keys are overwritten in place, new keys appended
    pub fn merge(&mut self, other: Attributes) {
        for (key, value) in other.entries {
            self.set(key, value);
        }
    }

    /// Append words to a class-like attribute
    pub fn append_words(&mut self, key: &str, value: &AttrValue) {
        let mut words = self.get(key).map(AttrValue::words).unwrap_or_default();
        for word in value.words() {
            if !words.contains(&word) {
                words.push(word);
            }
        }
        self.set(key, AttrValue::Text(words.join(" ")));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as ` key="value" flag ...` (leading space), or an empty string
    pub fn render(&self) -> String {
        let parts: Vec<String> = self
            .entries
            .iter()
            .filter_map(|(key, value)| render_entry(key, value))
            .collect();

        if parts.is_empty() {
            String::new()
        } else {
            format!(" {}", parts.join(" "))
        }
    }
}

fn render_entry(key: &str, value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::Null => None,
        // The value attribute keeps booleans as data
        AttrValue::Bool(flag) if key == "value" => {
            Some(format!("value=\"{}\"", if *flag { "1" } else { "" }))
        }
        AttrValue::Bool(true) => Some(key.to_string()),
        AttrValue::Bool(false) => None,
        AttrValue::List(items) => Some(format!("{}=\"{}\"", key, escape(&items.join(" ")))),
        AttrValue::Text(text) => Some(format!("{}=\"{}\"", key, escape(text))),
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.set(key, value);
        }
        attributes
    }
}

impl<K: Into<String>, V: Into<AttrValue>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_empty() {
        assert_eq!(Attributes::new().render(), "");
    }

    #[test]
    fn render_text_and_flags() {
        let mut attrs = Attributes::from([("class", "span2")]);
        attrs.flag("disabled");
        assert_eq!(attrs.render(), r#" class="span2" disabled"#);
    }

    #[test]
    fn render_booleans() {
        assert_eq!(Attributes::from([("my-property", true)]).render(), " my-property");
        assert_eq!(Attributes::from([("my-property", false)]).render(), "");
        assert_eq!(Attributes::from([("value", true)]).render(), r#" value="1""#);
        assert_eq!(Attributes::from([("value", false)]).render(), r#" value="""#);
    }

    #[test]
    fn render_class_list() {
        let attrs = Attributes::new().with("class", vec!["class-a", "class-b"]);
        assert_eq!(attrs.render(), r#" class="class-a class-b""#);
    }

    #[test]
    fn render_escapes_without_double_encoding() {
        let attrs = Attributes::from([("title", "a < b & c &amp; d \"q\"")]);
        assert_eq!(attrs.render(), r#" title="a &lt; b &amp; c &amp; d &quot;q&quot;""#);
    }

    #[test]
    fn null_keeps_position() {
        let mut attrs = Attributes::new();
        attrs.set("id", AttrValue::Null);
        attrs.set("name", "size");
        attrs.set("id", "select-id");
        assert_eq!(attrs.render(), r#" id="select-id" name="size""#);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut attrs = Attributes::from([("a", "1"), ("b", "2")]);
        attrs.set("a", "3");
        attrs.set("c", "4");
        assert_eq!(attrs.render(), r#" a="3" b="2" c="4""#);
    }

    #[test]
    fn merge_follows_array_merge() {
        let mut attrs = Attributes::from([("class", "form"), ("id", "x")]);
        attrs.merge(Attributes::from([("method", "POST"), ("class", "wide")]));
        assert_eq!(attrs.render(), r#" class="wide" id="x" method="POST""#);
    }

    #[test]
    fn set_default_only_when_absent() {
        let mut attrs = Attributes::from([("type", "submit")]);
        attrs.set_default("type", "button");
        attrs.set_default("class", "btn");
        assert_eq!(attrs.render(), r#" type="submit" class="btn""#);
    }

    #[test]
    fn append_words_deduplicates() {
        let mut attrs = Attributes::from([("class", "form")]);
        attrs.append_words("class", &AttrValue::from("form form--login"));
        assert_eq!(attrs.text("class"), Some("form form--login"));
    }

    #[test]
    fn from_value_mapping_and_flags() {
        let attrs = Attributes::from_value(&json!({"data-foo": "bar", "disabled": true}), "option").unwrap();
        assert_eq!(attrs.render(), r#" data-foo="bar" disabled"#);

        let attrs = Attributes::from_value(&json!(["multiple"]), "select").unwrap();
        assert_eq!(attrs.render(), " multiple");

        let attrs = Attributes::from_value(&json!({"class": ["class-a", false, "class-c"]}), "input").unwrap();
        assert_eq!(attrs.render(), r#" class="class-a class-c""#);
    }

    #[test]
    fn from_value_rejects_nested_mappings() {
        let err = Attributes::from_value(&json!({"data": {"a": 1}}), "input").unwrap_err();
        assert!(matches!(err, FormError::InvalidAttributes { ref element } if element == "input"));
        assert!(Attributes::from_value(&json!("class"), "input").is_err());
    }
}
