//! RingText Core Library
//!
//! Platform-agnostic geometry and shape-document generation for circular
//! text: maps style parameters onto a closed circular path and serializes
//! the corresponding SVG-like shape tree sent to the host design editor.

pub mod document;
pub mod geometry;
pub mod style;

pub use document::{
    AttrValue, CANVAS_SIZE, DocumentError, NodeContent, ShapeDocument, SvgNode, TEXT_PATH_ID,
    canvas_center, circular_text_document, preview_markup,
};
pub use geometry::{
    ArcSegment, CirclePath, GeometryError, SweepDirection, TextPosition, circle_path,
};
pub use style::{FontWeight, TextStyle};
