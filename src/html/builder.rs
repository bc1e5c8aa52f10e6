//! Generic HTML tag builder

use std::sync::Arc;

use serde_json::Value;

use crate::compare::scalar_string;
use crate::config::{HtmlConfig, Section};
use crate::html::Attributes;
use crate::util::escape;

/// Builds tags, images, links, lists and meta tags
#[derive(Debug, Clone, Default)]
pub struct HtmlBuilder {
    config: Arc<HtmlConfig>,
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Arc<HtmlConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<HtmlConfig> {
        &self.config
    }

    /// Escape text for HTML (existing entities are kept)
    pub fn entities(&self, value: &str) -> String {
        escape(value)
    }

    /// Render an attribute map (leading space, or empty)
    pub fn attributes(&self, attributes: &Attributes) -> String {
        attributes.render()
    }

    /// `<name attrs>content</name>`; content is inserted as markup
    pub fn tag(&self, name: &str, content: &str, attributes: &Attributes) -> String {
        let attributes = self.config.apply(Section::Html, "tag", attributes);
        format!("<{name}{}>{content}</{name}>", attributes.render())
    }

    /// `<img src="url" alt="...">`
    pub fn image(&self, url: &str, alt: Option<&str>, attributes: &Attributes) -> String {
        let mut attributes = self.config.apply(Section::Html, "image", attributes);
        attributes.set("alt", alt);
        format!("<img src=\"{}\"{}>", escape(url), attributes.render())
    }

    /// `<a href="url">title</a>`; the title defaults to the URL
    pub fn link(&self, url: &str, title: Option<&str>, attributes: &Attributes, escape_title: bool) -> String {
        let attributes = self.config.apply(Section::Html, "link", attributes);
        let title = match title {
            Some(title) if escape_title => escape(title),
            Some(title) => title.to_string(),
            None => escape(url),
        };
        format!("<a href=\"{}\"{}>{title}</a>", escape(url), attributes.render())
    }

    /// Ordered list from a sequence, or a mapping of keyed sub-lists
    pub fn ol(&self, list: &Value, attributes: &Attributes) -> String {
        let attributes = self.config.apply(Section::Html, "ol", attributes);
        listing("ol", list, &attributes)
    }

    /// Unordered list from a sequence, or a mapping of keyed sub-lists
    pub fn ul(&self, list: &Value, attributes: &Attributes) -> String {
        let attributes = self.config.apply(Section::Html, "ul", attributes);
        listing("ul", list, &attributes)
    }

    /// Description list from term/description pairs
    pub fn dl<I, K, V>(&self, list: I, attributes: &Attributes) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let attributes = self.config.apply(Section::Html, "dl", attributes);
        let mut html = format!("<dl{}>", attributes.render());
        for (term, description) in list {
            html.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>",
                escape(term.as_ref()),
                escape(description.as_ref())
            ));
        }
        html.push_str("</dl>");
        html
    }

    /// `<meta name="..." content="...">`; caller attributes override both
    pub fn meta(&self, name: Option<&str>, content: &str, attributes: &Attributes) -> String {
        let mut merged = Attributes::new().with("name", name).with("content", content);
        merged.merge(self.config.apply(Section::Html, "meta", attributes));
        format!("<meta{}>", merged.render())
    }
}

/// Empty lists render nothing
fn listing(kind: &str, list: &Value, attributes: &Attributes) -> String {
    let items: Vec<(Option<&str>, &Value)> = match list {
        Value::Array(items) => items.iter().map(|item| (None, item)).collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, item)| {
                // Positional keys carry no label
                let label = (!key.bytes().all(|b| b.is_ascii_digit())).then_some(key.as_str());
                (label, item)
            })
            .collect(),
        _ => return String::new(),
    };

    if items.is_empty() {
        return String::new();
    }

    let html: String = items
        .into_iter()
        .map(|(label, item)| listing_element(kind, label, item))
        .collect();

    format!("<{kind}{}>{html}</{kind}>", attributes.render())
}

fn listing_element(kind: &str, label: Option<&str>, item: &Value) -> String {
    match item {
        Value::Array(_) | Value::Object(_) => {
            let nested = listing(kind, item, &Attributes::new());
            match label {
                Some(label) => format!("<li>{}{nested}</li>", escape(label)),
                None => nested,
            }
        }
        scalar => format!("<li>{}</li>", escape(&scalar_string(scalar).unwrap_or_default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_keyed_lists() {
        let html = HtmlBuilder::new();
        let list = json!({"Fruit": ["apple", "pear"], "0": "plain"});
        assert_eq!(
            html.ul(&list, &Attributes::new()),
            "<ul><li>Fruit<ul><li>apple</li><li>pear</li></ul></li><li>plain</li></ul>"
        );
    }

    #[test]
    fn nested_positional_lists() {
        let html = HtmlBuilder::new();
        let list = json!(["a", ["b", "c"]]);
        assert_eq!(
            html.ol(&list, &Attributes::new()),
            "<ol><li>a</li><ol><li>b</li><li>c</li></ol></ol>"
        );
    }

    #[test]
    fn empty_list_renders_nothing() {
        let html = HtmlBuilder::new();
        assert_eq!(html.ul(&json!([]), &Attributes::from([("class", "x")])), "");
        assert_eq!(html.ol(&json!("scalar"), &Attributes::new()), "");
    }

    #[test]
    fn link_title_defaults_to_url() {
        let html = HtmlBuilder::new();
        assert_eq!(
            html.link("http://example.com", None, &Attributes::new(), true),
            r#"<a href="http://example.com">http://example.com</a>"#
        );
    }

    #[test]
    fn config_defaults_apply() {
        let config = HtmlConfig::from_yaml("html:\n  image: { class: img-fluid }\n").unwrap();
        let html = HtmlBuilder::with_config(Arc::new(config));
        assert_eq!(
            html.image("/a.png", Some("A"), &Attributes::new()),
            r#"<img src="/a.png" class="img-fluid" alt="A">"#
        );
    }
}
