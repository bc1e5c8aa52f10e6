//! Error types with fix suggestions
//!
//! Value resolution itself never fails: missing keys and malformed field
//! names degrade to `None`. The variants below are usage errors and
//! decoding failures around the resolver, never resolution results.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Binding errors (FORM-001 to FORM-002)
    // ─────────────────────────────────────────────────────────────

    #[error("FORM-001: No model bound while resolving '{field}' against the model")]
    ModelNotBound { field: String },

    #[error("FORM-002: Model data must be a mapping, got {value_type}")]
    InvalidModel { value_type: String },

    // ─────────────────────────────────────────────────────────────
    // Form document errors (FORM-010 to FORM-013)
    // ─────────────────────────────────────────────────────────────

    #[error("FORM-010: Unknown field type '{kind}'")]
    UnknownFieldType { kind: String },

    #[error("FORM-011: Field of type '{kind}' requires a name")]
    MissingFieldName { kind: String },

    #[error("FORM-012: Options for '{field}' must be a mapping or a list")]
    InvalidOptions { field: String },

    #[error("FORM-013: Range for '{field}' spans {span} options (limit {limit})")]
    RangeTooLarge { field: String, span: u64, limit: u64 },

    // ─────────────────────────────────────────────────────────────
    // Configuration errors (FORM-020)
    // ─────────────────────────────────────────────────────────────

    #[error("FORM-020: Attributes for '{element}' must be a mapping or a list of flags")]
    InvalidAttributes { element: String },
}

impl FixSuggestion for FormError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FormError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            FormError::JsonParse(_) => Some("Check JSON syntax (try parsing with jq)"),
            FormError::Io(_) => Some("Check file path and permissions"),
            FormError::ModelNotBound { .. } => {
                Some("Bind a model first (FormBuilder::model or ValueResolver::bind)")
            }
            FormError::InvalidModel { .. } => {
                Some("Provide the model as an object: {\"name\": \"value\", ...}")
            }
            FormError::UnknownFieldType { .. } => Some(
                "Use one of: text, email, password, hidden, textarea, select, checkbox, radio, ...",
            ),
            FormError::MissingFieldName { .. } => Some("Add a name: key to the field"),
            FormError::InvalidOptions { .. } => {
                Some("Use options: {value: label} or options: [label, ...]")
            }
            FormError::RangeTooLarge { .. } => {
                Some("Narrow begin/end, or use a number field for wide ranges")
            }
            FormError::InvalidAttributes { .. } => {
                Some("Use attributes: {class: btn} or attributes: [disabled]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_bound_message_names_field() {
        let err = FormError::ModelNotBound {
            field: "user[name]".to_string(),
        };
        assert!(err.to_string().contains("FORM-001"));
        assert!(err.to_string().contains("user[name]"));
        assert!(err.fix_suggestion().is_some());
    }

    #[test]
    fn yaml_errors_convert() {
        let err: FormError = serde_yaml::from_str::<Vec<String>>("a: [")
            .unwrap_err()
            .into();
        assert!(matches!(err, FormError::YamlParse(_)));
    }
}
