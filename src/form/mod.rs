//! Form building: inputs, selects, checkables and YAML form documents

pub mod builder;
pub mod document;
pub mod select;

pub use builder::FormBuilder;
pub use document::{FieldKind, FieldSpec, FormDocument};
pub use select::{SelectEntry, SelectOption, SelectOptions};
