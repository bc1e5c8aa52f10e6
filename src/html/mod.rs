//! HTML rendering: attribute maps and the generic tag builder

pub mod attributes;
pub mod builder;

pub use attributes::{AttrValue, Attributes};
pub use builder::HtmlBuilder;
