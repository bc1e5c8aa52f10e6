//! Form documents: a whole form described in YAML
//!
//! ```yaml
//! open: { method: PUT, url: /users/1, class: form }
//! model: true
//! fields:
//!   - { type: text, name: email, label: E-mail }
//!   - { type: select, name: size, options: { L: Large, S: Small } }
//!   - { type: checkbox, name: agree, checked: true }
//!   - { type: submit, value: Save }
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::FormError;
use crate::field::InputType;
use crate::form::{FormBuilder, SelectOptions};
use crate::html::Attributes;

/// Widest select-range a document may ask for
pub const MAX_RANGE_OPTIONS: u64 = 10_000;

/// Field kinds a document can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Input(InputType),
    Textarea,
    Select,
    SelectRange,
    SelectMonth,
    Datalist,
    Button,
}

impl FieldKind {
    /// Kinds that render without a field name
    fn is_nameless(&self) -> bool {
        matches!(
            self,
            FieldKind::Button
                | FieldKind::Input(InputType::Submit | InputType::Reset | InputType::Image)
        )
    }
}

impl FromStr for FieldKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textarea" => Ok(FieldKind::Textarea),
            "select" => Ok(FieldKind::Select),
            "select-range" | "select-year" => Ok(FieldKind::SelectRange),
            "select-month" => Ok(FieldKind::SelectMonth),
            "datalist" => Ok(FieldKind::Datalist),
            "button" => Ok(FieldKind::Button),
            other => other.parse().map(FieldKind::Input),
        }
    }
}

/// One field of a form document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Default value (or the selection for selects, the content for buttons)
    #[serde(default)]
    pub value: Option<Value>,

    /// Explicit checked state for checkboxes and radios
    #[serde(default)]
    pub checked: Option<bool>,

    /// Renders a `<label>` before the field
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub options: Value,

    #[serde(default)]
    pub option_attributes: Value,

    #[serde(default)]
    pub group_attributes: Value,

    #[serde(default)]
    pub attributes: Value,

    /// Bounds for select-range
    #[serde(default)]
    pub begin: Option<i64>,

    #[serde(default)]
    pub end: Option<i64>,
}

impl FieldSpec {
    pub fn field_kind(&self) -> Result<FieldKind, FormError> {
        self.kind.parse()
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    fn require_name(&self, kind: FieldKind) -> Result<&str, FormError> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(name),
            _ if kind.is_nameless() => Ok(""),
            _ => Err(FormError::MissingFieldName {
                kind: self.kind.clone(),
            }),
        }
    }

    /// select-range bounds, rejecting spans too wide to render
    fn range_bounds(&self, name: &str) -> Result<(i64, i64), FormError> {
        let (Some(begin), Some(end)) = (self.begin, self.end) else {
            return Err(FormError::InvalidOptions {
                field: name.to_string(),
            });
        };
        let span = begin.abs_diff(end).saturating_add(1);
        if span > MAX_RANGE_OPTIONS {
            return Err(FormError::RangeTooLarge {
                field: name.to_string(),
                span,
                limit: MAX_RANGE_OPTIONS,
            });
        }
        Ok((begin, end))
    }

    fn select_options(&self) -> Result<SelectOptions, FormError> {
        let mut options = SelectOptions::from_value(&self.options, self.display_name())?;
        options.apply_attributes(&self.option_attributes, &self.group_attributes)?;
        Ok(options)
    }

    /// Render this field (and its label) with the given builder
    pub fn render(&self, form: &mut FormBuilder<'_>) -> Result<String, FormError> {
        let kind = self.field_kind()?;
        let name = self.require_name(kind)?;
        let attributes = Attributes::from_value(&self.attributes, &self.kind)?;

        let mut html = String::new();
        if let Some(label) = &self.label {
            html.push_str(&form.label(name, Some(label.as_str()), &Attributes::new(), true));
        }

        let field = match kind {
            FieldKind::Input(InputType::Checkbox) => {
                form.checkbox(name, self.value.clone(), self.checked, &attributes)
            }
            FieldKind::Input(InputType::Radio) => {
                form.radio(name, self.value.clone(), self.checked, &attributes)
            }
            FieldKind::Input(InputType::Password) => form.password(name, &attributes),
            FieldKind::Input(InputType::File) => form.file(name, &attributes),
            FieldKind::Input(InputType::Submit) => {
                form.submit(self.value.as_ref().and_then(Value::as_str), &attributes)
            }
            FieldKind::Input(InputType::Reset) => {
                form.reset(self.value.as_ref().and_then(Value::as_str), &attributes)
            }
            FieldKind::Input(InputType::Image) => {
                let url = self.value.as_ref().and_then(Value::as_str).unwrap_or_default();
                form.image(url, self.name.as_deref(), &attributes)
            }
            FieldKind::Input(input) => form.input(input, Some(name), self.value.clone(), &attributes),
            FieldKind::Textarea => form.textarea(name, self.value.clone(), &attributes),
            FieldKind::Select => {
                form.select(name, &self.select_options()?, self.value.clone(), &attributes)
            }
            FieldKind::SelectRange => {
                let (begin, end) = self.range_bounds(name)?;
                form.select_range(name, begin, end, self.value.clone(), &attributes)
            }
            FieldKind::SelectMonth => form.select_month(name, self.value.clone(), &attributes),
            FieldKind::Datalist => form.datalist(name, &self.select_options()?),
            FieldKind::Button => {
                let content = self.value.as_ref().and_then(Value::as_str).unwrap_or_default();
                form.button(content, &attributes)
            }
        };

        if !html.is_empty() {
            html.push('\n');
        }
        html.push_str(&field);
        Ok(html)
    }
}

/// A whole form: opening tag options plus fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormDocument {
    /// `<form>` attributes; without them only the fields are rendered
    #[serde(default)]
    pub open: Option<Value>,

    /// The form repopulates from a bound model (rendering fails without one)
    #[serde(default)]
    pub model: bool,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormDocument {
    /// Parse and check every field kind and name
    pub fn from_yaml(yaml: &str) -> Result<Self, FormError> {
        let document: FormDocument = serde_yaml::from_str(yaml)?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let document = Self::from_yaml(&yaml)?;
        debug!(path = %path.display(), fields = document.fields.len(), "loaded form document");
        Ok(document)
    }

    fn validate(&self) -> Result<(), FormError> {
        for field in &self.fields {
            let kind = field.field_kind()?;
            let name = field.require_name(kind)?;
            if kind == FieldKind::SelectRange && field.begin.is_some() && field.end.is_some() {
                field.range_bounds(name)?;
            }
        }
        Ok(())
    }

    /// Render the form, one element per line
    pub fn render(&self, form: &mut FormBuilder<'_>) -> Result<String, FormError> {
        if self.model && !form.resolver().is_bound() {
            return Err(FormError::ModelNotBound {
                field: self
                    .fields
                    .first()
                    .map(|field| field.display_name().to_string())
                    .unwrap_or_else(|| "form".to_string()),
            });
        }

        let mut lines = Vec::with_capacity(self.fields.len() + 2);

        if let Some(open) = &self.open {
            let attributes = Attributes::from_value(open, "form")?;
            lines.push(form.open(&attributes));
        }

        for field in &self.fields {
            lines.push(field.render(form)?);
        }

        if self.open.is_some() {
            lines.push(form.close());
        }

        Ok(lines.join("\n"))
    }
}
