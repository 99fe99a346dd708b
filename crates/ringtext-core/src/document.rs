//! Host-agnostic shape documents for circular text.
//!
//! The host consumes an SVG-like tree of tagged nodes; the same tree renders
//! the local preview, so what the user sees is exactly what gets sent.

use crate::geometry::{GeometryError, circle_path};
use crate::style::TextStyle;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Side length of the square canvas shared by preview and emitted documents.
pub const CANVAS_SIZE: f64 = 300.0;

/// Identifier of the path node the text flows along.
pub const TEXT_PATH_ID: &str = "textCirclePath";

/// Errors building a shape document.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("font size must be positive and finite, got {0}")]
    InvalidFontSize(f64),
    #[error("letter spacing must be finite, got {0}")]
    InvalidLetterSpacing(f64),
    #[error("rotation must be finite, got {0}")]
    InvalidRotation(f64),
}

/// An attribute value: numbers stay numbers on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Numeric constructor collapsing whole values to integers, so `300.0`
    /// serializes as `300`.
    pub fn number(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            AttrValue::Int(value as i64)
        } else {
            AttrValue::Float(value)
        }
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            AttrValue::Int(v) => out.push_str(&v.to_string()),
            AttrValue::Float(v) => out.push_str(&v.to_string()),
            AttrValue::Text(v) => out.push_str(&escape_attr(v)),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::number(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<u16> for AttrValue {
    fn from(value: u16) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Node content: either literal text or nested child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeContent {
    Text(String),
    Children(Vec<SvgNode>),
}

/// One tagged node of a shape document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<NodeContent>,
}

impl SvgNode {
    /// Create a node with the given tag and no attributes or content.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            content: None,
        }
    }

    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append a child node.
    pub fn child(mut self, node: SvgNode) -> Self {
        match &mut self.content {
            Some(NodeContent::Children(children)) => children.push(node),
            _ => self.content = Some(NodeContent::Children(vec![node])),
        }
        self
    }

    /// Set literal text content, replacing any children.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.content = Some(NodeContent::Text(content.into()));
        self
    }

    /// Render the node tree as SVG markup.
    ///
    /// Text content and attribute values are XML-escaped, so arbitrary user
    /// text cannot break the document structure.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            value.write_markup(out);
            out.push('"');
        }
        match &self.content {
            None => out.push_str("/>"),
            Some(content) => {
                out.push('>');
                match content {
                    NodeContent::Text(text) => out.push_str(&escape_text(text)),
                    NodeContent::Children(children) => {
                        for node in children {
                            node.write_markup(out);
                        }
                    }
                }
                out.push_str("</");
                out.push_str(&self.tag);
                out.push('>');
            }
        }
    }
}

/// The shape description sent to the host with a `create-shape` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    /// Shape archetype tag; always `"svg"` for circular text.
    #[serde(rename = "type")]
    pub kind: String,
    /// The document tree rooted at an `svg` node.
    pub content: SvgNode,
}

impl ShapeDocument {
    /// Wrap a root node as an SVG shape document.
    pub fn svg(content: SvgNode) -> Self {
        Self {
            kind: "svg".to_string(),
            content,
        }
    }
}

/// Center of the shared canvas.
pub fn canvas_center() -> Point {
    Point::new(CANVAS_SIZE / 2.0, CANVAS_SIZE / 2.0)
}

/// Build the shape document for a circular-text style.
///
/// Pure transform: identical input styles produce structurally identical
/// documents. Fails closed on invalid parameters, emitting no partial tree.
pub fn circular_text_document(style: &TextStyle) -> Result<ShapeDocument, DocumentError> {
    style.validate()?;
    let center = canvas_center();
    let path = circle_path(center, style.radius, style.position)?;
    let rotation = style.normalized_rotation();

    let root = SvgNode::new("svg")
        .attr("width", CANVAS_SIZE)
        .attr("height", CANVAS_SIZE)
        .attr(
            "viewBox",
            format!("0 0 {} {}", CANVAS_SIZE as i64, CANVAS_SIZE as i64),
        )
        .child(
            SvgNode::new("defs").child(
                SvgNode::new("path")
                    .attr("id", TEXT_PATH_ID)
                    .attr("d", path.to_svg()),
            ),
        )
        .child(
            SvgNode::new("text")
                .attr("fill", "currentColor")
                .attr("font-size", style.font_size)
                .attr("font-weight", style.font_weight.value())
                .attr("letter-spacing", style.letter_spacing)
                .attr(
                    "transform",
                    format!("rotate({}, {}, {})", rotation, center.x as i64, center.y as i64),
                )
                .child(
                    SvgNode::new("textPath")
                        .attr("href", format!("#{TEXT_PATH_ID}"))
                        .attr("startOffset", "50%")
                        .attr("text-anchor", "middle")
                        .text(style.text.clone()),
                ),
        );

    Ok(ShapeDocument::svg(root))
}

/// Render the standalone preview markup for a style: the circular text plus
/// a thin guide circle marking the path, on the same canvas the emitted
/// document uses.
pub fn preview_markup(style: &TextStyle) -> Result<String, DocumentError> {
    style.validate()?;
    let center = canvas_center();
    let path = circle_path(center, style.radius, style.position)?;
    let rotation = style.normalized_rotation();

    let root = SvgNode::new("svg")
        .attr("width", CANVAS_SIZE)
        .attr("height", CANVAS_SIZE)
        .attr(
            "viewBox",
            format!("0 0 {} {}", CANVAS_SIZE as i64, CANVAS_SIZE as i64),
        )
        .child(
            SvgNode::new("circle")
                .attr("cx", center.x)
                .attr("cy", center.y)
                .attr("r", style.radius)
                .attr("fill", "none")
                .attr("stroke", "#333")
                .attr("stroke-width", 1i64),
        )
        .child(
            SvgNode::new("defs").child(
                SvgNode::new("path")
                    .attr("id", TEXT_PATH_ID)
                    .attr("d", path.to_svg()),
            ),
        )
        .child(
            SvgNode::new("text")
                .attr("fill", "white")
                .attr("font-size", style.font_size)
                .attr("font-weight", style.font_weight.value())
                .attr("letter-spacing", style.letter_spacing)
                .attr(
                    "transform",
                    format!("rotate({}, {}, {})", rotation, center.x as i64, center.y as i64),
                )
                .child(
                    SvgNode::new("textPath")
                        .attr("href", format!("#{TEXT_PATH_ID}"))
                        .attr("startOffset", "50%")
                        .attr("text-anchor", "middle")
                        .text(style.text.clone()),
                ),
        );

    Ok(root.to_markup())
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
