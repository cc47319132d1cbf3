//! Building node trees.

use std::collections::HashMap;

use kstring::KString;
use lazy_static::lazy_static;
use shtml_safe::{SafeString, TrustLevel, myfrom::{MyFrom, ks}};

use crate::{content::{Content, apply_all},
            node::{Attribute, Case, Condition, Element, IndentStyle::{self, *},
                   Multi, Node, Subsection, Switch, Text, Value}};

/// (name, indent style, void element)
const PROTOTYPES: &[(&str, IndentStyle, bool)] = &[
    // Void elements
    ("area", Block, true),
    ("base", Inline, true),
    ("br", Inline, true),
    ("command", Inline, true),
    ("embed", Block, true),
    ("hr", Block, true),
    ("img", Inline, true),
    ("input", Block, true),
    ("keygen", Block, true),
    ("link", Block, true),
    ("meta", Block, true),
    ("param", Block, true),
    ("source", Block, true),
    ("track", Block, true),
    ("wbr", Inline, true),

    ("article", Block, false),
    ("address", Block, false),
    ("aside", Block, false),
    ("body", Block, false),
    ("blockquote", Block, false),
    ("button", Block, false),
    ("canvas", Block, false),
    ("caption", Block, false),
    ("code", Block, false),
    ("colgroup", Block, false),
    ("datalist", Block, false),
    ("dl", Block, false),
    ("fieldset", Block, false),
    ("figcaption", Block, false),
    ("figure", Block, false),
    ("footer", Block, false),
    ("form", Block, false),
    ("h1", Block, false),
    ("h2", Block, false),
    ("h3", Block, false),
    ("h4", Block, false),
    ("h5", Block, false),
    ("h6", Block, false),
    ("head", Block, false),
    ("header", Block, false),
    ("html", Block, false),
    ("hgroup", Block, false),
    ("iframe", Block, false),
    ("legend", Block, false),
    ("nav", Block, false),
    ("p", Block, false),
    ("ol", Block, false),
    ("optgroup", Block, false),
    ("samp", Block, false),
    ("script", Block, false),
    ("section", Block, false),
    ("style", Block, false),
    ("table", Block, false),
    ("tbody", Block, false),
    ("textarea", Block, false),
    ("tfoot", Block, false),
    ("thead", Block, false),
    ("title", Block, false),
    ("ul", Block, false),
];

lazy_static!{
    static ref PROTOTYPE_MAP: HashMap<&'static str, (IndentStyle, bool)> =
        PROTOTYPES.iter().map(|&(name, indent, void)| (name, (indent, void))).collect();
}

/// The defaults for elements called `name`: inline and paired, unless
/// HTML says otherwise.
pub fn prototype(name: &str) -> (IndentStyle, bool) {
    PROTOTYPE_MAP.get(name).copied().unwrap_or((Inline, false))
}

/// An element with the defaults for its name, then `contents`
/// applied in order.
pub fn element<T>(name: T, contents: Vec<Content>) -> Node
    where KString: MyFrom<T>
{
    let name = ks(name);
    let (indent, self_closing) = prototype(&name);
    let mut node = Node::Element(Element {
        name,
        indent,
        self_closing,
        ..Element::default()
    });
    let error = apply_all(&mut node, contents);
    if let Node::Element(e) = &mut node {
        e.error = error;
    }
    node
}

pub fn multi(contents: Vec<Content>) -> Node {
    let mut node = Node::Multi(Multi::default());
    let error = apply_all(&mut node, contents);
    if let Node::Multi(m) = &mut node {
        m.error = error;
    }
    node
}

pub fn text(value: impl Into<Value>) -> Node {
    Node::Text(Text { value: value.into(), width: None })
}

/// Text reflowed to `width`, regardless of `CompileOptions::text_width`.
pub fn text_with(value: impl Into<Value>, width: usize) -> Node {
    Node::Text(Text { value: value.into(), width: Some(width) })
}

pub fn raw(value: impl Into<Value>) -> Node {
    Node::Raw(value.into())
}

pub fn attribute<T>(name: T, value: impl Into<Value>) -> Attribute
    where KString: MyFrom<T>
{
    Attribute { name: ks(name), value: value.into(), trust: TrustLevel::Untrusted }
}

/// The attribute `data-{name}`, with values required to be at
/// `trust` (data attributes themselves require nothing).
pub fn data_attribute(name: &str, value: impl Into<Value>, trust: TrustLevel) -> Attribute {
    Attribute {
        name: KString::from(format!("data-{name}")),
        value: value.into(),
        trust
    }
}

pub fn subsection<T>(name: T, prototype: Node) -> Node
    where KString: MyFrom<T>
{
    Node::Subsection(Subsection { name: ks(name), prototype: Box::new(prototype) })
}

pub fn switch(cases: Vec<(Condition, Option<Node>)>, default: Option<Node>) -> Node {
    Node::Switch(Switch {
        cases: cases.into_iter()
            .map(|(condition, output)| Case { condition, output })
            .collect(),
        default: default.map(Box::new),
    })
}

/// A complete page: the doctype, then `<html>` with `head` and `body`.
pub fn html_page(head: Node, body: Node, contents: Vec<Content>) -> Node {
    let mut html = vec![Content::Node(head), Content::Node(body)];
    html.extend(contents);
    multi(vec![
        Content::Node(text_with(SafeString::constant("<!doctype html>"), 0)),
        Content::Node(element("html", html)),
    ])
}

/// `<head>`, starting with the charset declaration.
pub fn head(contents: Vec<Content>) -> Node {
    let mut all = vec![Content::Node(meta(vec![
        Content::Attribute(attribute("charset", "utf-8"))]))];
    all.extend(contents);
    element("head", all)
}

pub fn body(contents: Vec<Content>) -> Node {
    element("body", contents)
}

pub fn meta(contents: Vec<Content>) -> Node {
    element("meta", contents)
}

pub fn p(contents: Vec<Content>) -> Node {
    element("p", contents)
}

pub fn div(contents: Vec<Content>) -> Node {
    element("div", contents)
}

pub fn span(contents: Vec<Content>) -> Node {
    element("span", contents)
}

pub fn a(contents: Vec<Content>) -> Node {
    element("a", contents)
}
