//! Markdown/MDX rendering into a presentation-agnostic element tree
//!
//! Rendering happens in two steps. [`MarkdownRenderer::parse`] folds the
//! pulldown-cmark event stream into typed [`Node`]s. [`MarkdownRenderer::render`]
//! then lowers those nodes into [`Element`]s using a caller-supplied
//! [`ComponentMap`] that names the component for each node kind.
//!
//! Raw markup (HTML or MDX component tags) is passed through untouched and
//! nothing in here fails: input the parser does not understand comes out as
//! literal text.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use serde::Serialize;
use serde_json::Value;

/// A parsed markup node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Heading {
        level: u8,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    /// `start` is set for ordered lists
    List {
        start: Option<u64>,
        children: Vec<Node>,
    },
    ListItem {
        checked: Option<bool>,
        children: Vec<Node>,
    },
    BlockQuote {
        children: Vec<Node>,
    },
    CodeBlock {
        lang: Option<String>,
        code: String,
    },
    InlineCode {
        code: String,
    },
    Emphasis {
        children: Vec<Node>,
    },
    Strong {
        children: Vec<Node>,
    },
    Strikethrough {
        children: Vec<Node>,
    },
    Link {
        href: String,
        title: Option<String>,
        children: Vec<Node>,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    Table {
        children: Vec<Node>,
    },
    TableRow {
        children: Vec<Node>,
    },
    TableCell {
        header: bool,
        children: Vec<Node>,
    },
    /// Raw HTML or MDX markup passed through verbatim
    Raw {
        html: String,
        block: bool,
    },
    Text {
        text: String,
    },
    SoftBreak,
    HardBreak,
    Rule,
}

impl Node {
    /// The mapping key for this node; text-like nodes have none
    pub fn kind(&self) -> Option<NodeKind> {
        let kind = match self {
            Node::Heading { level, .. } => NodeKind::Heading(*level),
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::List { start: Some(_), .. } => NodeKind::OrderedList,
            Node::List { start: None, .. } => NodeKind::BulletList,
            Node::ListItem { .. } => NodeKind::ListItem,
            Node::BlockQuote { .. } => NodeKind::BlockQuote,
            Node::CodeBlock { .. } => NodeKind::CodeBlock,
            Node::InlineCode { .. } => NodeKind::InlineCode,
            Node::Emphasis { .. } => NodeKind::Emphasis,
            Node::Strong { .. } => NodeKind::Strong,
            Node::Strikethrough { .. } => NodeKind::Strikethrough,
            Node::Link { .. } => NodeKind::Link,
            Node::Image { .. } => NodeKind::Image,
            Node::Table { .. } => NodeKind::Table,
            Node::TableRow { .. } => NodeKind::TableRow,
            Node::TableCell { header: true, .. } => NodeKind::TableHeaderCell,
            Node::TableCell { header: false, .. } => NodeKind::TableCell,
            Node::HardBreak => NodeKind::HardBreak,
            Node::Rule => NodeKind::Rule,
            Node::Raw { .. } | Node::Text { .. } | Node::SoftBreak => return None,
        };
        Some(kind)
    }

    fn children(&self) -> &[Node] {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::BlockQuote { children }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Strikethrough { children }
            | Node::Link { children, .. }
            | Node::Table { children }
            | Node::TableRow { children }
            | Node::TableCell { children, .. } => children,
            _ => &[],
        }
    }
}

/// Node kinds a [`ComponentMap`] can assign components to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Level 1 to 6
    Heading(u8),
    Paragraph,
    BulletList,
    OrderedList,
    ListItem,
    BlockQuote,
    CodeBlock,
    InlineCode,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    Table,
    TableRow,
    TableHeaderCell,
    TableCell,
    HardBreak,
    Rule,
}

impl NodeKind {
    pub const ALL: [NodeKind; 24] = [
        NodeKind::Heading(1),
        NodeKind::Heading(2),
        NodeKind::Heading(3),
        NodeKind::Heading(4),
        NodeKind::Heading(5),
        NodeKind::Heading(6),
        NodeKind::Paragraph,
        NodeKind::BulletList,
        NodeKind::OrderedList,
        NodeKind::ListItem,
        NodeKind::BlockQuote,
        NodeKind::CodeBlock,
        NodeKind::InlineCode,
        NodeKind::Emphasis,
        NodeKind::Strong,
        NodeKind::Strikethrough,
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::Table,
        NodeKind::TableRow,
        NodeKind::TableHeaderCell,
        NodeKind::TableCell,
        NodeKind::HardBreak,
        NodeKind::Rule,
    ];

    /// Name used in configuration files
    pub fn name(&self) -> String {
        match self {
            NodeKind::Heading(level) => format!("heading{}", level),
            NodeKind::Paragraph => "paragraph".to_string(),
            NodeKind::BulletList => "bullet_list".to_string(),
            NodeKind::OrderedList => "ordered_list".to_string(),
            NodeKind::ListItem => "list_item".to_string(),
            NodeKind::BlockQuote => "block_quote".to_string(),
            NodeKind::CodeBlock => "code_block".to_string(),
            NodeKind::InlineCode => "inline_code".to_string(),
            NodeKind::Emphasis => "emphasis".to_string(),
            NodeKind::Strong => "strong".to_string(),
            NodeKind::Strikethrough => "strikethrough".to_string(),
            NodeKind::Link => "link".to_string(),
            NodeKind::Image => "image".to_string(),
            NodeKind::Table => "table".to_string(),
            NodeKind::TableRow => "table_row".to_string(),
            NodeKind::TableHeaderCell => "table_header_cell".to_string(),
            NodeKind::TableCell => "table_cell".to_string(),
            NodeKind::HardBreak => "hard_break".to_string(),
            NodeKind::Rule => "rule".to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .find(|kind| kind.name() == s)
            .copied()
            .ok_or_else(|| format!("unknown node kind '{}'", s))
    }
}

/// Node kind to component name table, supplied by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentMap {
    entries: HashMap<NodeKind, String>,
}

impl ComponentMap {
    /// An empty table: every node renders as a fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain HTML element names for every kind
    pub fn html() -> Self {
        let mut map = Self::new();
        for kind in NodeKind::ALL {
            let name = match kind {
                NodeKind::Heading(level) => format!("h{}", level),
                NodeKind::Paragraph => "p".to_string(),
                NodeKind::BulletList => "ul".to_string(),
                NodeKind::OrderedList => "ol".to_string(),
                NodeKind::ListItem => "li".to_string(),
                NodeKind::BlockQuote => "blockquote".to_string(),
                NodeKind::CodeBlock => "pre".to_string(),
                NodeKind::InlineCode => "code".to_string(),
                NodeKind::Emphasis => "em".to_string(),
                NodeKind::Strong => "strong".to_string(),
                NodeKind::Strikethrough => "del".to_string(),
                NodeKind::Link => "a".to_string(),
                NodeKind::Image => "img".to_string(),
                NodeKind::Table => "table".to_string(),
                NodeKind::TableRow => "tr".to_string(),
                NodeKind::TableHeaderCell => "th".to_string(),
                NodeKind::TableCell => "td".to_string(),
                NodeKind::HardBreak => "br".to_string(),
                NodeKind::Rule => "hr".to_string(),
            };
            map.entries.insert(kind, name);
        }
        map
    }

    pub fn with(mut self, kind: NodeKind, component: impl Into<String>) -> Self {
        self.insert(kind, component);
        self
    }

    pub fn insert(&mut self, kind: NodeKind, component: impl Into<String>) {
        self.entries.insert(kind, component.into());
    }

    pub fn get(&self, kind: NodeKind) -> Option<&str> {
        self.entries.get(&kind).map(String::as_str)
    }
}

/// A render-ready element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Component {
        name: String,
        #[serde(skip_serializing_if = "IndexMap::is_empty")]
        props: IndexMap<String, Value>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        children: Vec<Element>,
    },
    Text {
        value: String,
    },
    Raw {
        value: String,
    },
}

/// Markdown renderer
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        // No smart punctuation: text is passed on exactly as written
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        Self { options }
    }

    /// Parse a body into nodes
    pub fn parse(&self, markdown: &str) -> Vec<Node> {
        let mut builder = TreeBuilder::new();
        for event in Parser::new_ext(markdown, self.options) {
            builder.push(event);
        }
        builder.finish()
    }

    /// Parse a body and lower it through `components`
    pub fn render(&self, markdown: &str, components: &ComponentMap) -> Vec<Element> {
        let nodes = self.parse(markdown);
        let mut out = Vec::new();
        for node in &nodes {
            lower(node, components, &mut out);
        }
        out
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Container currently being filled
enum Open {
    Heading(u8),
    Paragraph,
    List(Option<u64>),
    Item(Option<bool>),
    BlockQuote,
    CodeBlock(Option<String>),
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: Option<String> },
    Image { src: String, title: Option<String> },
    Table,
    TableHead,
    TableRow,
    TableCell,
    HtmlBlock,
    /// Anything else; its children are spliced into the parent
    Transparent,
}

struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<(Open, Vec<Node>)>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        }
    }

    fn push_node(&mut self, node: Node) {
        let children = self.current();
        if let Node::Text { text } = &node {
            if let Some(Node::Text { text: last }) = children.last_mut() {
                last.push_str(text);
                return;
            }
        }
        children.push(node);
    }

    fn push(&mut self, event: Event) {
        match event {
            Event::Start(tag) => {
                let open = open_for(tag);
                self.stack.push((open, Vec::new()));
            }
            Event::End(_) => self.close(),
            Event::Text(text) => self.push_node(Node::Text {
                text: text.into_string(),
            }),
            Event::Code(code) => self.push_node(Node::InlineCode {
                code: code.into_string(),
            }),
            Event::Html(html) => self.push_node(Node::Raw {
                html: html.into_string(),
                block: true,
            }),
            Event::InlineHtml(html) => self.push_node(Node::Raw {
                html: html.into_string(),
                block: false,
            }),
            Event::SoftBreak => self.push_node(Node::SoftBreak),
            Event::HardBreak => self.push_node(Node::HardBreak),
            Event::Rule => self.push_node(Node::Rule),
            // Loose lists put the marker inside the item's paragraph
            Event::TaskListMarker(checked) => {
                let item = self.stack.iter_mut().rev().find_map(|(open, _)| match open {
                    Open::Item(state) => Some(state),
                    _ => None,
                });
                if let Some(state) = item {
                    *state = Some(checked);
                }
            }
            Event::FootnoteReference(label) => self.push_node(Node::Text {
                text: format!("[^{}]", label),
            }),
            // Math is not enabled in the parser options; anything else is dropped
            other => {
                tracing::debug!("Dropping unsupported markdown event: {:?}", other);
            }
        }
    }

    fn close(&mut self) {
        let Some((open, children)) = self.stack.pop() else {
            return;
        };
        for node in build(open, children) {
            self.push_node(node);
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }
}

fn open_for(tag: Tag) -> Open {
    match tag {
        Tag::Heading { level, .. } => Open::Heading(level as u8),
        Tag::Paragraph => Open::Paragraph,
        Tag::List(start) => Open::List(start),
        Tag::Item => Open::Item(None),
        Tag::BlockQuote(_) => Open::BlockQuote,
        Tag::CodeBlock(kind) => {
            let lang = match kind {
                CodeBlockKind::Fenced(info) => info
                    .split_whitespace()
                    .next()
                    .map(|lang| lang.to_string()),
                CodeBlockKind::Indented => None,
            };
            Open::CodeBlock(lang)
        }
        Tag::Emphasis => Open::Emphasis,
        Tag::Strong => Open::Strong,
        Tag::Strikethrough => Open::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => Open::Link {
            href: dest_url.into_string(),
            title: non_empty(title.into_string()),
        },
        Tag::Image {
            dest_url, title, ..
        } => Open::Image {
            src: dest_url.into_string(),
            title: non_empty(title.into_string()),
        },
        Tag::Table(_) => Open::Table,
        Tag::TableHead => Open::TableHead,
        Tag::TableRow => Open::TableRow,
        Tag::TableCell => Open::TableCell,
        Tag::HtmlBlock => Open::HtmlBlock,
        _ => Open::Transparent,
    }
}

fn build(open: Open, children: Vec<Node>) -> Vec<Node> {
    let node = match open {
        Open::Heading(level) => Node::Heading { level, children },
        Open::Paragraph => Node::Paragraph { children },
        Open::List(start) => Node::List { start, children },
        Open::Item(checked) => Node::ListItem { checked, children },
        Open::BlockQuote => Node::BlockQuote { children },
        Open::CodeBlock(lang) => Node::CodeBlock {
            lang,
            code: plain_text(&children),
        },
        Open::Emphasis => Node::Emphasis { children },
        Open::Strong => Node::Strong { children },
        Open::Strikethrough => Node::Strikethrough { children },
        Open::Link { href, title } => Node::Link {
            href,
            title,
            children,
        },
        Open::Image { src, title } => Node::Image {
            src,
            alt: plain_text(&children),
            title,
        },
        Open::Table => Node::Table { children },
        // Header cells sit directly in the head, without a row
        Open::TableHead => Node::TableRow {
            children: children
                .into_iter()
                .map(|cell| match cell {
                    Node::TableCell { children, .. } => Node::TableCell {
                        header: true,
                        children,
                    },
                    other => other,
                })
                .collect(),
        },
        Open::TableRow => Node::TableRow { children },
        Open::TableCell => Node::TableCell {
            header: false,
            children,
        },
        Open::HtmlBlock => Node::Raw {
            html: children
                .iter()
                .map(|node| match node {
                    Node::Raw { html, .. } => html.as_str(),
                    Node::Text { text } => text.as_str(),
                    _ => "",
                })
                .collect(),
            block: true,
        },
        Open::Transparent => return children,
    };
    vec![node]
}

/// Concatenated text content of a node list
fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { text } => out.push_str(text),
            Node::InlineCode { code } | Node::CodeBlock { code, .. } => out.push_str(code),
            Node::Image { alt, .. } => out.push_str(alt),
            Node::SoftBreak | Node::HardBreak => out.push('\n'),
            other => collect_text(other.children(), out),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn lower(node: &Node, components: &ComponentMap, out: &mut Vec<Element>) {
    let kind = match node {
        Node::Text { text } => return push_text(out, text),
        Node::SoftBreak => return push_text(out, "\n"),
        Node::Raw { html, .. } => {
            out.push(Element::Raw {
                value: html.clone(),
            });
            return;
        }
        other => match other.kind() {
            Some(kind) => kind,
            None => return,
        },
    };

    let mut children = Vec::new();
    match node {
        Node::CodeBlock { code, .. } | Node::InlineCode { code } => push_text(&mut children, code),
        Node::Image { .. } | Node::Rule | Node::HardBreak => {}
        other => {
            for child in other.children() {
                lower(child, components, &mut children);
            }
        }
    }

    match components.get(kind) {
        Some(name) => out.push(Element::Component {
            name: name.to_string(),
            props: props_for(node),
            children,
        }),
        // Unmapped kinds render as fragments
        None => match node {
            Node::Image { alt, .. } => push_text(out, alt),
            Node::HardBreak => push_text(out, "\n"),
            _ => {
                for child in children {
                    match child {
                        Element::Text { value } => push_text(out, &value),
                        other => out.push(other),
                    }
                }
            }
        },
    }
}

fn props_for(node: &Node) -> IndexMap<String, Value> {
    let mut props = IndexMap::new();
    match node {
        Node::Link { href, title, .. } => {
            props.insert("href".to_string(), Value::from(href.as_str()));
            if let Some(title) = title {
                props.insert("title".to_string(), Value::from(title.as_str()));
            }
        }
        Node::Image { src, alt, title } => {
            props.insert("src".to_string(), Value::from(src.as_str()));
            props.insert("alt".to_string(), Value::from(alt.as_str()));
            if let Some(title) = title {
                props.insert("title".to_string(), Value::from(title.as_str()));
            }
        }
        Node::CodeBlock {
            lang: Some(lang), ..
        } => {
            props.insert(
                "className".to_string(),
                Value::from(format!("language-{}", lang)),
            );
        }
        Node::List {
            start: Some(start), ..
        } if *start != 1 => {
            props.insert("start".to_string(), Value::from(*start));
        }
        Node::ListItem {
            checked: Some(checked),
            ..
        } => {
            props.insert("checked".to_string(), Value::from(*checked));
        }
        _ => {}
    }
    props
}

fn push_text(out: &mut Vec<Element>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Element::Text { value }) = out.last_mut() {
        value.push_str(text);
    } else {
        out.push(Element::Text {
            value: text.to_string(),
        });
    }
}

const VOID_ELEMENTS: [&str; 4] = ["br", "hr", "img", "input"];

/// Serialize an element tree as HTML
///
/// Component names are used as tag names, `className` becomes `class`,
/// boolean props become bare attributes. `pre` wraps its text in `<code>`
/// carrying the class, and a `checked` list item gets a disabled checkbox.
pub fn to_html(elements: &[Element]) -> String {
    let mut out = String::new();
    for element in elements {
        write_html(element, &mut out);
    }
    out
}

fn write_html(element: &Element, out: &mut String) {
    match element {
        Element::Text { value } => out.push_str(&html_escape(value)),
        Element::Raw { value } => out.push_str(value),
        Element::Component {
            name,
            props,
            children,
        } => {
            out.push('<');
            out.push_str(name);
            match name.as_str() {
                "pre" => {
                    out.push_str("><code");
                    write_attrs(props, out);
                    out.push('>');
                    write_children(children, out);
                    out.push_str("</code></pre>");
                    return;
                }
                "li" => match props.get("checked") {
                    Some(Value::Bool(checked)) => {
                        let rest: IndexMap<String, Value> = props
                            .iter()
                            .filter(|(key, _)| key.as_str() != "checked")
                            .map(|(key, value)| (key.clone(), value.clone()))
                            .collect();
                        write_attrs(&rest, out);
                        out.push_str("><input type=\"checkbox\" disabled");
                        if *checked {
                            out.push_str(" checked");
                        }
                        out.push_str(" />");
                    }
                    _ => {
                        write_attrs(props, out);
                        out.push('>');
                    }
                },
                _ => {
                    write_attrs(props, out);
                    if children.is_empty() && VOID_ELEMENTS.contains(&name.as_str()) {
                        out.push_str(" />");
                        return;
                    }
                    out.push('>');
                }
            }
            write_children(children, out);
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn write_children(children: &[Element], out: &mut String) {
    for child in children {
        write_html(child, out);
    }
}

fn write_attrs(props: &IndexMap<String, Value>, out: &mut String) {
    for (key, value) in props {
        let attr = if key == "className" { "class" } else { key };
        match value {
            Value::Bool(true) => {
                out.push(' ');
                out.push_str(attr);
            }
            Value::Bool(false) | Value::Null => {}
            Value::String(s) => {
                out.push_str(&format!(" {}=\"{}\"", attr, html_escape(s)));
            }
            other => {
                out.push_str(&format!(" {}=\"{}\"", attr, html_escape(&other.to_string())));
            }
        }
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text {
            text: s.to_string(),
        }
    }

    #[test]
    fn test_parse_heading_and_paragraph() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("## Hello World\n\nThis is a test.");
        assert_eq!(
            nodes,
            vec![
                Node::Heading {
                    level: 2,
                    children: vec![text("Hello World")],
                },
                Node::Paragraph {
                    children: vec![text("This is a test.")],
                },
            ]
        );
    }

    #[test]
    fn test_parse_lists_and_tasks() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("3. three\n4. four\n\n- [x] done\n- [ ] open\n");
        match &nodes[0] {
            Node::List {
                start: Some(3),
                children,
            } => assert_eq!(children.len(), 2),
            other => panic!("expected ordered list, got {:?}", other),
        }
        match &nodes[1] {
            Node::List {
                start: None,
                children,
            } => {
                assert!(matches!(children[0], Node::ListItem { checked: Some(true), .. }));
                assert!(matches!(children[1], Node::ListItem { checked: Some(false), .. }));
            }
            other => panic!("expected bullet list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_loose_task_list() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("- [x] done\n\n- [ ] open\n");
        match &nodes[0] {
            Node::List { children, .. } => {
                assert_eq!(children.len(), 2);
                match &children[0] {
                    Node::ListItem { checked, children } => {
                        assert_eq!(*checked, Some(true));
                        assert_eq!(
                            children[0],
                            Node::Paragraph {
                                children: vec![text("done")],
                            }
                        );
                    }
                    other => panic!("expected list item, got {:?}", other),
                }
                assert!(matches!(children[1], Node::ListItem { checked: Some(false), .. }));
            }
            other => panic!("expected bullet list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_code_block_language() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("```rust title=\"main.rs\"\nfn main() {}\n```\n");
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                lang: Some("rust".to_string()),
                code: "fn main() {}\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("Intro\n\n```js\nlet a = 1;\nlet b = 2;\n");
        assert_eq!(nodes.len(), 2);
        assert_eq!(
            nodes[1],
            Node::CodeBlock {
                lang: Some("js".to_string()),
                code: "let a = 1;\nlet b = 2;\n".to_string(),
            }
        );
    }

    #[test]
    fn test_inline_markup_passthrough() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("Hello <span class=\"x\">there</span> `code`!");
        assert_eq!(
            nodes,
            vec![Node::Paragraph {
                children: vec![
                    text("Hello "),
                    Node::Raw {
                        html: "<span class=\"x\">".to_string(),
                        block: false,
                    },
                    text("there"),
                    Node::Raw {
                        html: "</span>".to_string(),
                        block: false,
                    },
                    text(" "),
                    Node::InlineCode {
                        code: "code".to_string(),
                    },
                    text("!"),
                ],
            }]
        );
    }

    #[test]
    fn test_component_block_passthrough() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("<Callout type=\"warn\">\nCareful here\n</Callout>\n\nAfter.");
        match &nodes[0] {
            Node::Raw { html, block: true } => {
                assert!(html.starts_with("<Callout type=\"warn\">"));
                assert!(html.contains("Careful here"));
                assert!(html.contains("</Callout>"));
            }
            other => panic!("expected raw block, got {:?}", other),
        }
        assert_eq!(
            nodes[1],
            Node::Paragraph {
                children: vec![text("After.")],
            }
        );
    }

    #[test]
    fn test_unknown_syntax_is_literal_text() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("{frontmatter.title} and **unclosed");
        assert_eq!(
            nodes,
            vec![Node::Paragraph {
                children: vec![text("{frontmatter.title} and **unclosed")],
            }]
        );
    }

    #[test]
    fn test_image_alt_and_link() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("![a *cat*](/uploads/cat.png \"Cat\") [site](https://example.com)");
        match &nodes[0] {
            Node::Paragraph { children } => {
                assert_eq!(
                    children[0],
                    Node::Image {
                        src: "/uploads/cat.png".to_string(),
                        alt: "a cat".to_string(),
                        title: Some("Cat".to_string()),
                    }
                );
                assert_eq!(
                    children[2],
                    Node::Link {
                        href: "https://example.com".to_string(),
                        title: None,
                        children: vec![text("site")],
                    }
                );
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_table_header_cells() {
        let renderer = MarkdownRenderer::new();
        let nodes = renderer.parse("| A | B |\n|---|---|\n| 1 | 2 |\n");
        let Node::Table { children } = &nodes[0] else {
            panic!("expected table, got {:?}", nodes[0]);
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].children()[0].kind(), Some(NodeKind::TableHeaderCell));
        assert_eq!(children[1].children()[0].kind(), Some(NodeKind::TableCell));
    }

    #[test]
    fn test_render_with_html_map() {
        let renderer = MarkdownRenderer::new();
        let elements = renderer.render(
            "# Title\n\nSee [docs](/d \"Docs\") & <b>bold</b>\n\n```sh\necho <hi>\n```\n\n![alt](/a.png)",
            &ComponentMap::html(),
        );
        let html = to_html(&elements);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<a href=\"/d\" title=\"Docs\">docs</a> &amp; <b>bold</b>"));
        assert!(html.contains("<pre><code class=\"language-sh\">echo &lt;hi&gt;\n</code></pre>"));
        assert!(html.contains("<img src=\"/a.png\" alt=\"alt\" />"));
    }

    #[test]
    fn test_render_with_custom_components() {
        let components = ComponentMap::new()
            .with(NodeKind::Heading(2), "SectionTitle")
            .with(NodeKind::Paragraph, "Body");
        let elements = MarkdownRenderer::new().render("## Skills\n\nText *here*", &components);
        assert_eq!(
            elements,
            vec![
                Element::Component {
                    name: "SectionTitle".to_string(),
                    props: IndexMap::new(),
                    children: vec![Element::Text {
                        value: "Skills".to_string(),
                    }],
                },
                // Emphasis is unmapped, so its text merges into the paragraph
                Element::Component {
                    name: "Body".to_string(),
                    props: IndexMap::new(),
                    children: vec![Element::Text {
                        value: "Text here".to_string(),
                    }],
                },
            ]
        );
    }

    #[test]
    fn test_render_task_item_props() {
        let elements = MarkdownRenderer::new().render("- [x] done", &ComponentMap::html());
        let html = to_html(&elements);
        assert!(
            html.starts_with("<ul><li><input type=\"checkbox\" disabled checked />"),
            "{}",
            html
        );
        assert!(html.ends_with("done</li></ul>"), "{}", html);

        let elements =
            MarkdownRenderer::new().render("- [ ] open\n- plain", &ComponentMap::html());
        assert_eq!(
            to_html(&elements),
            "<ul><li><input type=\"checkbox\" disabled />open</li><li>plain</li></ul>"
        );
    }

    #[test]
    fn test_element_json_shape() {
        let elements = MarkdownRenderer::new().render("[x](/y)", &ComponentMap::html());
        let json = serde_json::to_value(&elements).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "type": "component",
                "name": "p",
                "children": [{
                    "type": "component",
                    "name": "a",
                    "props": {"href": "/y"},
                    "children": [{"type": "text", "value": "x"}]
                }]
            }])
        );
    }

    #[test]
    fn test_node_kind_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.name().parse::<NodeKind>().unwrap(), kind);
        }
        assert!("heading7".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_empty_input() {
        let renderer = MarkdownRenderer::new();
        assert!(renderer.parse("").is_empty());
        assert_eq!(to_html(&renderer.render("", &ComponentMap::html())), "");
    }
}
