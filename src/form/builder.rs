//! Form element builder with model binding and repopulation
//!
//! Every field asks the [`ValueResolver`] what to render, then lays out its
//! attributes in a fixed order: caller attributes first (with config
//! defaults), then `name`, `type`, `value` and `id`.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::compare::scalar_string;
use crate::config::{HtmlConfig, Section};
use crate::field::InputType;
use crate::form::select::{render_placeholder, SelectOptions};
use crate::html::{AttrValue, Attributes, HtmlBuilder};
use crate::input::InputSource;
use crate::model::Model;
use crate::resolver::ValueResolver;
use crate::util::{escape, title_from_name};

/// Options consumed by `open` instead of being rendered
const RESERVED: [&str; 5] = ["method", "url", "route", "action", "files"];

/// Methods browsers cannot send; submitted as POST plus a `_method` field
const SPOOFED_METHODS: [&str; 3] = ["DELETE", "PATCH", "PUT"];

const DEFAULT_COLS: u32 = 50;
const DEFAULT_ROWS: u32 = 10;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// "60x15" textarea shorthand
static TEXTAREA_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").expect("valid regex"));

/// Builds form markup for one request/response cycle
pub struct FormBuilder<'a> {
    html: HtmlBuilder,
    resolver: ValueResolver<'a>,
    /// Field names that received a label (they get a matching `id`)
    labels: Vec<String>,
    csrf_token: Option<String>,
    current_url: String,
}

impl<'a> FormBuilder<'a> {
    pub fn new(html: HtmlBuilder) -> Self {
        Self {
            html,
            resolver: ValueResolver::new(),
            labels: Vec::new(),
            csrf_token: None,
            current_url: String::new(),
        }
    }

    /// Builder sharing the given config
    pub fn with_config(config: Arc<HtmlConfig>) -> Self {
        Self::new(HtmlBuilder::with_config(config))
    }

    /// Token rendered in non-GET forms
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Form action when `open` gets no `url`
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.current_url = url.into();
        self
    }

    pub fn with_old_input(mut self, old_input: &'a dyn InputSource) -> Self {
        self.resolver.set_old_input(Some(old_input));
        self
    }

    pub fn with_request(mut self, request: &'a dyn InputSource) -> Self {
        self.resolver.set_request(Some(request));
        self
    }

    pub fn html(&self) -> &HtmlBuilder {
        &self.html
    }

    pub fn resolver(&self) -> &ValueResolver<'a> {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut ValueResolver<'a> {
        &mut self.resolver
    }

    /// Whether request input repopulates fields
    pub fn consider_request(&mut self, consider: bool) {
        self.resolver.set_consider_request(consider);
    }

    /// Bind a model without opening a form
    pub fn set_model(&mut self, model: &'a dyn Model) {
        self.resolver.bind(model);
    }

    pub fn get_model(&self) -> Option<&'a dyn Model> {
        self.resolver.model()
    }

    /// Old input value for a field
    pub fn old(&self, name: &str) -> Option<Value> {
        self.resolver.old(name)
    }

    /// Value a field named `name` would render
    pub fn value_attribute(&self, name: &str, value: Option<Value>) -> Option<Value> {
        self.resolver.resolve_value(name, value)
    }

    fn config(&self) -> &HtmlConfig {
        self.html.config()
    }

    fn apply_config(&self, element: &str, attributes: &Attributes) -> Attributes {
        self.config().apply(Section::Form, element, attributes)
    }

    // ─────────────────────────────────────────────────────────────
    // Form open/close
    // ─────────────────────────────────────────────────────────────

    /// `<form ...>` plus the hidden method and token fields it needs
    pub fn open(&self, options: &Attributes) -> String {
        let options = self.apply_config("open", options);
        let method = options.text("method").unwrap_or("post").to_uppercase();

        let mut attributes = Attributes::new();
        attributes.set("method", if method == "GET" { "GET" } else { "POST" });
        attributes.set("action", self.action(&options));
        attributes.set("accept-charset", "UTF-8");

        let mut extra = options.clone();
        for key in RESERVED {
            extra.remove(key);
        }
        if files_flag(options.get("files")) {
            extra.set("enctype", "multipart/form-data");
        }
        attributes.merge(extra);

        format!("<form{}>{}", attributes.render(), self.appendage(&method))
    }

    /// Bind a model, then open the form
    pub fn model(&mut self, model: &'a dyn Model, options: &Attributes) -> String {
        self.resolver.bind(model);
        self.open(options)
    }

    /// `</form>`; forgets labels and the bound model
    pub fn close(&mut self) -> String {
        self.labels.clear();
        self.resolver.unbind();
        "</form>".to_string()
    }

    /// Hidden `_token` field (empty when no token is configured)
    pub fn token(&self) -> String {
        match &self.csrf_token {
            Some(token) => self.hidden("_token", Some(Value::String(token.clone())), &Attributes::new()),
            None => String::new(),
        }
    }

    fn action(&self, options: &Attributes) -> String {
        options
            .text("url")
            .or_else(|| options.text("action"))
            .unwrap_or(&self.current_url)
            .to_string()
    }

    fn appendage(&self, method: &str) -> String {
        let mut html = String::new();
        if SPOOFED_METHODS.contains(&method) {
            html.push_str(&self.hidden(
                "_method",
                Some(Value::String(method.to_string())),
                &Attributes::new(),
            ));
        }
        if method != "GET" {
            html.push_str(&self.token());
        }
        html
    }

    // ─────────────────────────────────────────────────────────────
    // Labels and inputs
    // ─────────────────────────────────────────────────────────────

    /// `<label for="name">`; later fields named `name` get `id="name"`
    pub fn label(&mut self, name: &str, value: Option<&str>, attributes: &Attributes, escape_html: bool) -> String {
        self.labels.push(name.to_string());
        let attributes = self.apply_config("label", attributes);

        let value = match value {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => title_from_name(name),
        };
        let value = if escape_html { escape(&value) } else { value };

        format!("<label for=\"{}\"{}>{value}</label>", escape(name), attributes.render())
    }

    /// Generic `<input>`
    pub fn input(&self, kind: InputType, name: Option<&str>, value: Option<Value>, attributes: &Attributes) -> String {
        let element = match kind {
            InputType::Checkbox | InputType::Radio => "checkable",
            other => other.as_str(),
        };
        let mut attributes = self.apply_config(element, attributes);

        if !attributes.contains_key("name") {
            attributes.set("name", name);
        }
        let id = self.id_attribute(name, &attributes);
        let value = match name {
            Some(name) => self.resolver.resolve_field(kind, name, value),
            None => value,
        };

        attributes.set("type", kind.as_str());
        attributes.set("value", value_attr(value));
        attributes.set("id", id);

        format!("<input{}>", attributes.render())
    }

    pub fn text(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Text, Some(name), value, attributes)
    }

    pub fn email(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Email, Some(name), value, attributes)
    }

    pub fn tel(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Tel, Some(name), value, attributes)
    }

    pub fn number(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Number, Some(name), value, attributes)
    }

    pub fn date(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Date, Some(name), value, attributes)
    }

    pub fn datetime(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Datetime, Some(name), value, attributes)
    }

    pub fn datetime_local(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::DatetimeLocal, Some(name), value, attributes)
    }

    pub fn time(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Time, Some(name), value, attributes)
    }

    pub fn url(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Url, Some(name), value, attributes)
    }

    pub fn week(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Week, Some(name), value, attributes)
    }

    pub fn month(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Month, Some(name), value, attributes)
    }

    pub fn range(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Range, Some(name), value, attributes)
    }

    pub fn search(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Search, Some(name), value, attributes)
    }

    pub fn color(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Color, Some(name), value, attributes)
    }

    pub fn hidden(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        self.input(InputType::Hidden, Some(name), value, attributes)
    }

    /// Password input; always renders an empty value
    pub fn password(&self, name: &str, attributes: &Attributes) -> String {
        self.input(InputType::Password, Some(name), Some(Value::String(String::new())), attributes)
    }

    /// File input; never has a value
    pub fn file(&self, name: &str, attributes: &Attributes) -> String {
        self.input(InputType::File, Some(name), None, attributes)
    }

    /// `<textarea>` with `cols`/`rows` (default 50x10, or the `size` shorthand)
    pub fn textarea(&self, name: &str, value: Option<Value>, attributes: &Attributes) -> String {
        let mut attributes = self.apply_config("textarea", attributes);

        if !attributes.contains_key("name") {
            attributes.set("name", name);
        }
        set_textarea_size(&mut attributes);
        let id = self.id_attribute(Some(name), &attributes);
        attributes.set("id", id);
        attributes.remove("size");

        let content = self
            .resolver
            .resolve_value(name, value)
            .and_then(|value| scalar_string(&value))
            .unwrap_or_default();

        format!("<textarea{}>{}</textarea>", attributes.render(), escape(&content))
    }

    // ─────────────────────────────────────────────────────────────
    // Selects
    // ─────────────────────────────────────────────────────────────

    /// `<select>` with the resolved selection marked
    ///
    /// A `placeholder` attribute becomes a leading empty option.
    pub fn select(&self, name: &str, options: &SelectOptions, selected: Option<Value>, attributes: &Attributes) -> String {
        let mut attributes = self.apply_config("select", attributes);
        let selected = self.resolver.resolve_value(name, selected).unwrap_or(Value::Null);

        let id = self.id_attribute(Some(name), &attributes);
        attributes.set("id", id);
        if !attributes.contains_key("name") {
            attributes.set("name", name);
        }

        let mut html = String::new();
        if let Some(placeholder) = attributes.remove("placeholder") {
            let label = placeholder.as_text().unwrap_or_default();
            html.push_str(&render_placeholder(label, &selected));
        }
        html.push_str(&options.render(&selected));

        format!("<select{}>{html}</select>", attributes.render())
    }

    /// Select with one option per number from `begin` to `end` (either direction)
    pub fn select_range(&self, name: &str, begin: i64, end: i64, selected: Option<Value>, attributes: &Attributes) -> String {
        let numbers: Vec<i64> = if begin <= end {
            (begin..=end).collect()
        } else {
            (end..=begin).rev().collect()
        };
        let options = SelectOptions::from_pairs(numbers.iter().map(|n| (n.to_string(), n.to_string())));
        self.select(name, &options, selected, attributes)
    }

    /// Same as [`select_range`](Self::select_range), named for year pickers
    pub fn select_year(&self, name: &str, begin: i64, end: i64, selected: Option<Value>, attributes: &Attributes) -> String {
        self.select_range(name, begin, end, selected, attributes)
    }

    /// Months 1-12 labelled with English month names
    pub fn select_month(&self, name: &str, selected: Option<Value>, attributes: &Attributes) -> String {
        let options = SelectOptions::from_pairs(
            MONTHS
                .iter()
                .enumerate()
                .map(|(i, month)| ((i + 1).to_string(), *month)),
        );
        self.select(name, &options, selected, attributes)
    }

    /// `<datalist id="...">` of suggestion options
    pub fn datalist(&self, id: &str, options: &SelectOptions) -> String {
        let attributes = Attributes::new().with("id", id);
        format!("<datalist{}>{}</datalist>", attributes.render(), options.render(&Value::Null))
    }

    // ─────────────────────────────────────────────────────────────
    // Checkable inputs
    // ─────────────────────────────────────────────────────────────

    /// Checkbox; the value defaults to 1
    pub fn checkbox(&self, name: &str, value: Option<Value>, checked: Option<bool>, attributes: &Attributes) -> String {
        let value = value.unwrap_or_else(|| Value::from(1));
        let is_checked = self.resolver.checkbox_checked(name, &value, checked);
        self.checkable(InputType::Checkbox, name, value, is_checked, attributes)
    }

    /// Radio button; the value defaults to the field name
    pub fn radio(&self, name: &str, value: Option<Value>, checked: Option<bool>, attributes: &Attributes) -> String {
        let value = value.unwrap_or_else(|| Value::String(name.to_string()));
        let is_checked = self.resolver.radio_checked(name, &value, checked);
        self.checkable(InputType::Radio, name, value, is_checked, attributes)
    }

    fn checkable(&self, kind: InputType, name: &str, value: Value, checked: bool, attributes: &Attributes) -> String {
        let mut attributes = attributes.clone();
        if checked {
            attributes.set("checked", "checked");
        }
        self.input(kind, Some(name), Some(value), &attributes)
    }

    // ─────────────────────────────────────────────────────────────
    // Buttons
    // ─────────────────────────────────────────────────────────────

    pub fn submit(&self, value: Option<&str>, attributes: &Attributes) -> String {
        self.input(InputType::Submit, None, value.map(Value::from), attributes)
    }

    pub fn reset(&self, value: Option<&str>, attributes: &Attributes) -> String {
        self.input(InputType::Reset, None, value.map(Value::from), attributes)
    }

    /// Image submit button
    pub fn image(&self, url: &str, name: Option<&str>, attributes: &Attributes) -> String {
        let mut merged = Attributes::new().with("src", url);
        merged.merge(attributes.clone());
        self.input(InputType::Image, name, None, &merged)
    }

    /// `<button>`; `type` defaults to `button`, the content is markup
    pub fn button(&self, value: &str, attributes: &Attributes) -> String {
        let mut attributes = self.apply_config("button", attributes);
        attributes.set_default("type", "button");
        format!("<button{}>{value}</button>", attributes.render())
    }

    /// Explicit `id`, else the field name when a label was rendered for it
    fn id_attribute(&self, name: Option<&str>, attributes: &Attributes) -> Option<String> {
        if let Some(id) = attributes.get("id").filter(|id| !id.is_null()) {
            return id.as_text().map(str::to_string);
        }
        name.filter(|name| self.labels.iter().any(|label| label == name))
            .map(str::to_string)
    }
}

fn files_flag(value: Option<&AttrValue>) -> bool {
    match value {
        Some(AttrValue::Bool(flag)) => *flag,
        Some(AttrValue::Text(text)) => matches!(text.as_str(), "1" | "true"),
        _ => false,
    }
}

/// Resolved value as a `value` attribute (mappings have no attribute form)
fn value_attr(value: Option<Value>) -> AttrValue {
    value
        .as_ref()
        .and_then(AttrValue::from_json)
        .unwrap_or(AttrValue::Null)
}

fn set_textarea_size(attributes: &mut Attributes) {
    if let Some(size) = attributes.text("size").map(str::to_string) {
        match TEXTAREA_SIZE.captures(&size) {
            Some(caps) => {
                attributes.set("cols", &caps[1]);
                attributes.set("rows", &caps[2]);
                return;
            }
            None => warn!(size = %size, "malformed textarea size, using defaults"),
        }
    }
    attributes.set_default("cols", DEFAULT_COLS);
    attributes.set_default("rows", DEFAULT_ROWS);
}
