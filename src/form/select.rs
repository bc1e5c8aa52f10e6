//! Select option lists
//!
//! Options keep their insertion order. A list is built either in code
//! (`SelectOptions::new().option("L", "Large")`) or from JSON/YAML:
//!
//! - mapping `{L: Large, S: Small}`: keys are values, entries are labels
//! - mapping entry holding a mapping or a sequence: an option group
//! - sequence `[Male, Female]`: every label is its own value

use serde_json::Value;

use crate::compare::{option_selected, scalar_string};
use crate::error::FormError;
use crate::html::Attributes;
use crate::util::escape;

/// A single `<option>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub attributes: Attributes,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            attributes: Attributes::new(),
        }
    }
}

/// A top-level entry: an option or an `<optgroup>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEntry {
    Option(SelectOption),
    Group {
        label: String,
        options: Vec<SelectOption>,
        attributes: Attributes,
    },
}

/// Ordered option list for `select` and `datalist`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    entries: Vec<SelectEntry>,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options from value/label pairs
    pub fn from_pairs<I, V, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let mut options = Self::new();
        for (value, label) in pairs {
            options.push(SelectEntry::Option(SelectOption::new(value, label)));
        }
        options
    }

    /// Add an option
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.push(SelectEntry::Option(SelectOption::new(value, label)));
        self
    }

    /// Add an option with its own attributes
    pub fn option_with(
        mut self,
        value: impl Into<String>,
        label: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        let mut option = SelectOption::new(value, label);
        option.attributes = attributes;
        self.push(SelectEntry::Option(option));
        self
    }

    /// Add an option group from value/label pairs
    pub fn group<I, V, L>(mut self, label: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        self.push(SelectEntry::Group {
            label: label.into(),
            options: pairs
                .into_iter()
                .map(|(value, label)| SelectOption::new(value, label))
                .collect(),
            attributes: Attributes::new(),
        });
        self
    }

    pub fn push(&mut self, entry: SelectEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SelectEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a JSON mapping or sequence
    pub fn from_value(value: &Value, field: &str) -> Result<Self, FormError> {
        let invalid = || FormError::InvalidOptions {
            field: field.to_string(),
        };
        let mut options = Self::new();
        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, item) in map {
                    match item {
                        Value::Object(_) | Value::Array(_) => {
                            let group = Self::from_value(item, field)?;
                            let mut members = Vec::new();
                            for entry in group.entries {
                                match entry {
                                    SelectEntry::Option(option) => members.push(option),
                                    SelectEntry::Group { .. } => return Err(invalid()),
                                }
                            }
                            options.push(SelectEntry::Group {
                                label: key.clone(),
                                options: members,
                                attributes: Attributes::new(),
                            });
                        }
                        scalar => {
                            let label = scalar_string(scalar).ok_or_else(invalid)?;
                            options.push(SelectEntry::Option(SelectOption::new(key.clone(), label)));
                        }
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    let label = scalar_string(item).ok_or_else(invalid)?;
                    options.push(SelectEntry::Option(SelectOption::new(label.clone(), label)));
                }
            }
            _ => return Err(invalid()),
        }
        Ok(options)
    }

    /// Attach per-option and per-group attributes
    ///
    /// `option_attributes` maps option values to attribute maps; a group
    /// label maps to a nested mapping for the options inside that group.
    /// `group_attributes` maps group labels to attribute maps.
    pub fn apply_attributes(
        &mut self,
        option_attributes: &Value,
        group_attributes: &Value,
    ) -> Result<(), FormError> {
        for entry in &mut self.entries {
            match entry {
                SelectEntry::Option(option) => {
                    if let Some(attrs) = option_attributes.get(&option.value) {
                        option.attributes.merge(Attributes::from_value(attrs, "option")?);
                    }
                }
                SelectEntry::Group {
                    label,
                    options,
                    attributes,
                } => {
                    if let Some(attrs) = group_attributes.get(label.as_str()) {
                        attributes.merge(Attributes::from_value(attrs, "optgroup")?);
                    }
                    let Some(nested) = option_attributes.get(label.as_str()) else {
                        continue;
                    };
                    for option in options {
                        if let Some(attrs) = nested.get(&option.value) {
                            option.attributes.merge(Attributes::from_value(attrs, "option")?);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Render every entry against the resolved selection
    pub fn render(&self, selected: &Value) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                SelectEntry::Option(option) => render_option(option, selected),
                SelectEntry::Group {
                    label,
                    options,
                    attributes,
                } => {
                    let inner: String = options
                        .iter()
                        .map(|option| render_option(option, selected))
                        .collect();
                    format!(
                        "<optgroup label=\"{}\"{}>{inner}</optgroup>",
                        escape(label),
                        attributes.render()
                    )
                }
            })
            .collect()
    }
}

/// `<option value=".." selected="selected" ..>label</option>`
pub fn render_option(option: &SelectOption, selected: &Value) -> String {
    let is_selected = option_selected(&option.value, selected);
    let mut attributes = Attributes::new()
        .with("value", option.value.as_str())
        .with("selected", is_selected.then_some("selected"));
    attributes.merge(option.attributes.clone());
    format!("<option{}>{}</option>", attributes.render(), escape(&option.label))
}

/// Leading empty-valued option; selected when nothing else is
pub fn render_placeholder(label: &str, selected: &Value) -> String {
    let attributes = Attributes::new()
        .with("selected", option_selected("", selected).then_some("selected"))
        .with("value", "");
    format!("<option{}>{}</option>", attributes.render(), escape(label))
}
