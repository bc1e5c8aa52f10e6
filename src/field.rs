//! Input field types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// `<input type="...">` values known to the form builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    Text,
    Email,
    Password,
    Hidden,
    Tel,
    Number,
    Date,
    Datetime,
    DatetimeLocal,
    Time,
    Url,
    Week,
    Month,
    Range,
    Search,
    Color,
    File,
    Checkbox,
    Radio,
    Submit,
    Reset,
    Image,
}

impl InputType {
    pub const ALL: [InputType; 22] = [
        InputType::Text,
        InputType::Email,
        InputType::Password,
        InputType::Hidden,
        InputType::Tel,
        InputType::Number,
        InputType::Date,
        InputType::Datetime,
        InputType::DatetimeLocal,
        InputType::Time,
        InputType::Url,
        InputType::Week,
        InputType::Month,
        InputType::Range,
        InputType::Search,
        InputType::Color,
        InputType::File,
        InputType::Checkbox,
        InputType::Radio,
        InputType::Submit,
        InputType::Reset,
        InputType::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Password => "password",
            InputType::Hidden => "hidden",
            InputType::Tel => "tel",
            InputType::Number => "number",
            InputType::Date => "date",
            InputType::Datetime => "datetime",
            InputType::DatetimeLocal => "datetime-local",
            InputType::Time => "time",
            InputType::Url => "url",
            InputType::Week => "week",
            InputType::Month => "month",
            InputType::Range => "range",
            InputType::Search => "search",
            InputType::Color => "color",
            InputType::File => "file",
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
            InputType::Submit => "submit",
            InputType::Reset => "reset",
            InputType::Image => "image",
        }
    }

    /// Types whose value never comes from the resolver
    ///
    /// Password and file inputs must not echo submitted data back; checkbox
    /// and radio values are fixed and only their checked state is resolved.
    pub fn skips_value(&self) -> bool {
        matches!(
            self,
            InputType::Password | InputType::File | InputType::Checkbox | InputType::Radio
        )
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FormError::UnknownFieldType {
                kind: s.to_string(),
            })
    }
}
