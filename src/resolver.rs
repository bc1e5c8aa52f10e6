//! Value resolution and repopulation
//!
//! Decides which value a form field renders. First match wins:
//!
//! ```text
//! 1. request     (consider-request on, non-null at the dotted key)
//! 2. old input   (present, non-empty, non-null at the dotted key)
//! 3. bound model (path walk with form mutators at every model hop)
//! 4. default     (may be None: no value attribute)
//! ```
//!
//! Password and file fields never reach steps 1-3. Checkbox and radio fields
//! resolve a checked state instead of a value (see [`ValueResolver::checkbox_checked`]
//! and [`ValueResolver::radio_checked`]).

use serde_json::Value;
use tracing::{debug, trace};

use crate::compare::{contains_loose, loose_eq};
use crate::error::FormError;
use crate::field::InputType;
use crate::input::InputSource;
use crate::model::{Model, Node};
use crate::path;

/// Hidden field used for method spoofing; never repopulated from input
const METHOD_FIELD: &str = "_method";

/// Resolution state for one request/response cycle
///
/// Borrows the bound model and input sources; it never owns or mutates them.
#[derive(Clone, Copy)]
pub struct ValueResolver<'a> {
    model: Option<&'a dyn Model>,
    old_input: Option<&'a dyn InputSource>,
    request: Option<&'a dyn InputSource>,
    consider_request: bool,
}

impl Default for ValueResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ValueResolver<'a> {
    /// Resolver with no model, no input and consider-request enabled
    pub fn new() -> Self {
        Self {
            model: None,
            old_input: None,
            request: None,
            consider_request: true,
        }
    }

    pub fn with_old_input(mut self, old_input: &'a dyn InputSource) -> Self {
        self.old_input = Some(old_input);
        self
    }

    pub fn with_request(mut self, request: &'a dyn InputSource) -> Self {
        self.request = Some(request);
        self
    }

    pub fn set_old_input(&mut self, old_input: Option<&'a dyn InputSource>) {
        self.old_input = old_input;
    }

    pub fn set_request(&mut self, request: Option<&'a dyn InputSource>) {
        self.request = request;
    }

    /// Bind a model, replacing any previous binding
    pub fn bind(&mut self, model: &'a dyn Model) {
        if self.model.is_some() {
            debug!("replacing bound model");
        } else {
            debug!("binding model");
        }
        self.model = Some(model);
    }

    /// Forget the bound model
    pub fn unbind(&mut self) {
        if self.model.take().is_some() {
            debug!("unbound model");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.model.is_some()
    }

    /// The bound model, if any
    pub fn model(&self) -> Option<&'a dyn Model> {
        self.model
    }

    /// Whether request input takes part in resolution
    pub fn set_consider_request(&mut self, consider: bool) {
        debug!(consider, "consider request");
        self.consider_request = consider;
    }

    pub fn consider_request(&self) -> bool {
        self.consider_request
    }

    /// Value a field should render
    pub fn resolve_value(&self, name: &str, default: Option<Value>) -> Option<Value> {
        if name != METHOD_FIELD {
            if let Some(value) = self.request_value(name) {
                trace!(field = name, source = "request", "resolved");
                return Some(value);
            }
            if let Some(value) = self.old(name) {
                trace!(field = name, source = "old_input", "resolved");
                return Some(value);
            }
        }

        if let Some(value) = self.model_value(name) {
            trace!(field = name, source = "model", "resolved");
            return Some(value);
        }

        trace!(field = name, source = "default", has_default = default.is_some(), "resolved");
        default
    }

    /// Value for a field of the given input type
    ///
    /// Types that skip value resolution return the caller's value unchanged.
    pub fn resolve_field(&self, kind: InputType, name: &str, default: Option<Value>) -> Option<Value> {
        if kind.skips_value() {
            trace!(field = name, kind = kind.as_str(), "value resolution skipped");
            return default;
        }
        self.resolve_value(name, default)
    }

    /// Request value at the field's dotted key (None when consider-request is off)
    pub fn request_value(&self, name: &str) -> Option<Value> {
        if !self.consider_request {
            return None;
        }
        let request = self.request?;
        lookup(request, name)
    }

    /// Old input value at the field's dotted key
    pub fn old(&self, name: &str) -> Option<Value> {
        let old_input = self.old_input?;
        if old_input.is_empty() {
            return None;
        }
        lookup(old_input, name)
    }

    /// True when no old input was flashed (or it holds nothing)
    pub fn old_input_is_empty(&self) -> bool {
        self.old_input.map_or(true, |old| old.is_empty())
    }

    /// Form value of the bound model at the field path (None when unbound)
    pub fn model_value(&self, name: &str) -> Option<Value> {
        let model = self.model?;
        path::resolve(&path::parse_cached(name), Node::Model(model))
            .filter(|node| !node.is_null())
            .map(Node::into_value)
    }

    /// Like [`model_value`](Self::model_value) but a missing model is a usage error
    pub fn bound_value(&self, name: &str) -> Result<Option<Value>, FormError> {
        if self.model.is_none() {
            return Err(FormError::ModelNotBound {
                field: name.to_string(),
            });
        }
        Ok(self.model_value(name))
    }

    /// Checked state of a checkbox with the given value
    ///
    /// - submitted form without this box (old input present, no entry): unchecked
    /// - nothing known about the field: `checked` decides
    /// - resolved sequence: membership (objects match on `id`)
    /// - otherwise loose equality with `value`
    pub fn checkbox_checked(&self, name: &str, value: &Value, checked: Option<bool>) -> bool {
        let request = self.request_value(name);

        if !self.old_input_is_empty() && self.old(name).is_none() && request.is_none() {
            trace!(field = name, "checkbox absent from submitted input");
            return false;
        }

        if request.is_none() && self.missing_old_and_model(name) {
            return checked.unwrap_or(false);
        }

        let default = checked.map(Value::Bool);
        match self.resolve_value(name, default) {
            Some(Value::Array(items)) => contains_loose(&items, value),
            Some(posted) => loose_eq(&posted, value),
            None => false,
        }
    }

    /// Checked state of a radio button with the given value
    pub fn radio_checked(&self, name: &str, value: &Value, checked: Option<bool>) -> bool {
        if self.request_value(name).is_none() && self.missing_old_and_model(name) {
            return checked.unwrap_or(false);
        }

        self.resolve_value(name, None)
            .is_some_and(|posted| loose_eq(&posted, value))
    }

    fn missing_old_and_model(&self, name: &str) -> bool {
        self.old(name).is_none() && self.model_value(name).is_none()
    }
}

fn lookup(source: &dyn InputSource, name: &str) -> Option<Value> {
    let key = path::parse_cached(name).dotted_key();
    if key.is_empty() {
        return None;
    }
    source.get(&key)
}
