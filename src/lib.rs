//! formbind - HTML and form builder with model binding
//!
//! Field values are resolved from request input, old input, the bound model
//! (through per-attribute form mutators) and explicit defaults, then
//! rendered as escaped markup.

pub mod compare;
pub mod config;
pub mod error;
pub mod field;
pub mod form;
pub mod html;
pub mod input;
pub mod model;
pub mod path;
pub mod record;
pub mod resolver;
pub mod util;

pub use config::{HtmlConfig, Section};
pub use error::{FixSuggestion, FormError};
pub use field::InputType;
pub use form::{FieldKind, FieldSpec, FormBuilder, FormDocument, SelectEntry, SelectOption, SelectOptions};
pub use html::{AttrValue, Attributes, HtmlBuilder};
pub use input::{InputBag, InputSource};
pub use model::{FormAccessible, Model, Node};
pub use path::{Path, Segment};
pub use record::Record;
pub use resolver::ValueResolver;
