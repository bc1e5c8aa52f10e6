//! Per-element default attributes and attribute groups
//!
//! ```yaml
//! html:
//!   image: { class: img-fluid }
//! form:
//!   text: { class: form-control }
//!   button: { class: btn btn-primary }
//! group:
//!   login-form: { class: form form--login }
//! ```
//!
//! Defaults fill attributes the caller did not set. A `group` attribute is
//! replaced by the attributes of the named group; class words are appended
//! to the caller's classes instead of replacing them.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FormError;
use crate::html::{AttrValue, Attributes};

/// Attribute name that selects a group
const GROUP_KEY: &str = "group";

/// Config sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Generic tags: tag, image, link, meta, ol, ul, dl
    Html,
    /// Form elements: open, label, text, select, option, checkable, button, ...
    Form,
}

/// Default attributes per element plus named groups
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HtmlConfig {
    #[serde(default)]
    pub html: HashMap<String, Value>,

    #[serde(default)]
    pub form: HashMap<String, Value>,

    #[serde(default)]
    pub group: HashMap<String, Value>,
}

impl HtmlConfig {
    /// Parse from YAML text, validating every attribute map
    pub fn from_yaml(yaml: &str) -> Result<Self, FormError> {
        let config: HtmlConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&yaml)?;
        debug!(
            path = %path.display(),
            html = config.html.len(),
            form = config.form.len(),
            groups = config.group.len(),
            "loaded html config"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), FormError> {
        for (element, value) in self.html.iter().chain(&self.form).chain(&self.group) {
            Attributes::from_value(value, element)?;
        }
        Ok(())
    }

    /// Defaults configured for an element
    pub fn defaults(&self, section: Section, element: &str) -> Attributes {
        let table = match section {
            Section::Html => &self.html,
            Section::Form => &self.form,
        };
        table
            .get(element)
            .and_then(|value| Attributes::from_value(value, element).ok())
            .unwrap_or_default()
    }

    /// Attributes of a named group
    pub fn group(&self, name: &str) -> Option<Attributes> {
        self.group
            .get(name)
            .and_then(|value| Attributes::from_value(value, name).ok())
    }

    /// Expand the `group` attribute and fill element defaults
    pub fn apply(&self, section: Section, element: &str, attributes: &Attributes) -> Attributes {
        let mut applied = attributes.clone();

        if let Some(group) = applied.remove(GROUP_KEY) {
            let name = group.as_text().unwrap_or_default();
            match self.group(name) {
                Some(extra) => fill(&mut applied, extra),
                None => warn!(group = name, element, "unknown attribute group"),
            }
        }

        fill(&mut applied, self.defaults(section, element));
        applied
    }
}

/// Add `extra` without overriding the caller; class words accumulate
fn fill(attributes: &mut Attributes, extra: Attributes) {
    for (key, value) in extra.iter() {
        if key == "class" {
            attributes.append_words(key, value);
        } else if !matches!(value, AttrValue::Null) {
            attributes.set_default(key, value.clone());
        }
    }
}
