//! Integration tests for generic HTML helpers

use std::sync::Arc;

use formbind::{Attributes, HtmlBuilder, HtmlConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

fn example() -> Attributes {
    Attributes::from([("class", "example")])
}

#[test]
fn test_dl() {
    let html = HtmlBuilder::new();
    assert_eq!(
        html.dl([("foo", "bar"), ("bing", "baz")], &example()),
        r#"<dl class="example"><dt>foo</dt><dd>bar</dd><dt>bing</dt><dd>baz</dd></dl>"#
    );
}

#[test]
fn test_ol() {
    let html = HtmlBuilder::new();
    assert_eq!(
        html.ol(&json!(["foo", "bar", "&amp;"]), &example()),
        r#"<ol class="example"><li>foo</li><li>bar</li><li>&amp;</li></ol>"#
    );
}

#[test]
fn test_ul() {
    let html = HtmlBuilder::new();
    assert_eq!(
        html.ul(&json!(["foo", "bar", "&amp;"]), &example()),
        r#"<ul class="example"><li>foo</li><li>bar</li><li>&amp;</li></ul>"#
    );
}

#[test]
fn test_empty_list_renders_nothing() {
    let html = HtmlBuilder::new();
    assert_eq!(html.ul(&json!([]), &example()), "");
}

#[test]
fn test_meta() {
    let html = HtmlBuilder::new();
    assert_eq!(
        html.meta(Some("description"), "Lorem ipsum dolor sit amet.", &Attributes::new()),
        r#"<meta name="description" content="Lorem ipsum dolor sit amet.">"#
    );
}

#[test]
fn test_meta_open_graph() {
    let html = HtmlBuilder::new();
    assert_eq!(
        html.meta(None, "website", &Attributes::from([("property", "og:type")])),
        r#"<meta content="website" property="og:type">"#
    );
}

#[test]
fn test_tag() {
    let html = HtmlBuilder::new();

    assert_eq!(
        html.tag("p", "Lorem ipsum dolor sit amet.", &Attributes::new()),
        "<p>Lorem ipsum dolor sit amet.</p>"
    );
    assert_eq!(
        html.tag("p", "Lorem ipsum dolor sit amet.", &Attributes::from([("class", "text-center")])),
        r#"<p class="text-center">Lorem ipsum dolor sit amet.</p>"#
    );
    assert_eq!(
        html.tag("div", "<p>Lorem ipsum dolor sit amet.</p>", &Attributes::from([("class", "row")])),
        r#"<div class="row"><p>Lorem ipsum dolor sit amet.</p></div>"#
    );

    let content = [
        html.image("http://example.com/image1", None, &Attributes::new()),
        html.image("http://example.com/image2", None, &Attributes::new()),
    ]
    .concat();
    assert_eq!(
        html.tag("div", &content, &Attributes::from([("class", "row")])),
        r#"<div class="row"><img src="http://example.com/image1"><img src="http://example.com/image2"></div>"#
    );
}

#[test]
fn test_link() {
    let html = HtmlBuilder::new();
    let class = Attributes::from([("class", "example-link")]);

    assert_eq!(
        html.link("http://www.example.com", Some("<span>Example.com</span>"), &class, true),
        r#"<a href="http://www.example.com" class="example-link">&lt;span&gt;Example.com&lt;/span&gt;</a>"#
    );
    assert_eq!(
        html.link("http://www.example.com", Some("<span>Example.com</span>"), &class, false),
        r#"<a href="http://www.example.com" class="example-link"><span>Example.com</span></a>"#
    );
    assert_eq!(
        html.link("https://a.com/b?id=4&not_id=5", Some("URL which needs escaping"), &Attributes::new(), true),
        r#"<a href="https://a.com/b?id=4&amp;not_id=5">URL which needs escaping</a>"#
    );
}

#[test]
fn test_image_alt() {
    let html = HtmlBuilder::new();
    assert_eq!(
        html.image("/logo.png", Some("Logo & co"), &Attributes::new()),
        r#"<img src="/logo.png" alt="Logo &amp; co">"#
    );
}

#[test]
fn test_boolean_attributes() {
    let html = HtmlBuilder::new();

    assert_eq!(
        html.attributes(&Attributes::from([("my-property", true)])).trim(),
        "my-property"
    );
    assert_eq!(html.attributes(&Attributes::from([("my-property", false)])).trim(), "");
}

#[test]
fn test_array_class_attributes() {
    let html = HtmlBuilder::new();

    assert_eq!(
        html.attributes(&Attributes::from([("class", vec!["class-a", "class-b"])])).trim(),
        r#"class="class-a class-b""#
    );

    let attributes = Attributes::from_value(&json!({"class": ["class-a", false, "class-c"]}), "div").unwrap();
    assert_eq!(html.attributes(&attributes).trim(), r#"class="class-a class-c""#);
}

#[test]
fn test_configured_defaults() {
    let config = HtmlConfig::from_yaml(
        r#"
html:
  link: { rel: noopener }
  ul: { class: list }
"#,
    )
    .unwrap();
    let html = HtmlBuilder::with_config(Arc::new(config));

    assert_eq!(
        html.link("/docs", None, &Attributes::new(), true),
        r#"<a href="/docs" rel="noopener">/docs</a>"#
    );
    assert_eq!(
        html.ul(&json!(["a"]), &Attributes::from([("class", "compact")])),
        r#"<ul class="compact list"><li>a</li></ul>"#
    );
}
