//! Text style parameters for circular text.

use crate::document::DocumentError;
use crate::geometry::TextPosition;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Radius range offered by the editing UI, in canvas units.
pub const RADIUS_RANGE: RangeInclusive<f64> = 50.0..=200.0;
/// Font size range offered by the editing UI, in pixels.
pub const FONT_SIZE_RANGE: RangeInclusive<f64> = 8.0..=24.0;
/// Letter spacing range offered by the editing UI, in pixels.
pub const LETTER_SPACING_RANGE: RangeInclusive<f64> = -2.0..=10.0;
/// Rotation range offered by the editing UI, in degrees.
pub const ROTATION_RANGE: RangeInclusive<f64> = 0.0..=360.0;

/// Font weight on the discrete CSS scale (100 to 900 in steps of 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const THIN: FontWeight = FontWeight(100);
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const REGULAR: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const BLACK: FontWeight = FontWeight(900);

    /// Snap an arbitrary value onto the discrete scale.
    pub fn new(value: u16) -> Self {
        let rounded = ((u32::from(value) + 50) / 100) * 100;
        FontWeight(rounded.clamp(100, 900) as u16)
    }

    /// The numeric CSS weight.
    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::REGULAR
    }
}

/// Parameters describing a circular-text shape.
///
/// A plain value object: recomputed on every parameter change, carries no
/// identity. The geometry and serializer layers consume it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// The literal text flowed along the circle.
    pub text: String,
    /// Circle radius in canvas units.
    pub radius: f64,
    /// Font size in pixels.
    pub font_size: f64,
    /// Additional spacing between glyphs, in pixels.
    pub letter_spacing: f64,
    /// Font weight on the discrete CSS scale.
    pub font_weight: FontWeight,
    /// Text placement relative to the circle.
    pub position: TextPosition,
    /// Rotation of the whole text element around the canvas center, degrees.
    pub rotation_degrees: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            text: "Circular Text Example".to_string(),
            radius: 100.0,
            font_size: 14.0,
            letter_spacing: 0.0,
            font_weight: FontWeight::REGULAR,
            position: TextPosition::Outside,
            rotation_degrees: 0.0,
        }
    }
}

impl TextStyle {
    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the circle radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the text placement.
    pub fn with_position(mut self, position: TextPosition) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Clamp all numeric parameters into the ranges the editing UI offers.
    ///
    /// The geometry engine itself accepts any positive radius; this is the
    /// caller-side sanitization applied to slider input.
    pub fn clamped(mut self) -> Self {
        self.radius = self.radius.clamp(*RADIUS_RANGE.start(), *RADIUS_RANGE.end());
        self.font_size = self
            .font_size
            .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
        self.letter_spacing = self
            .letter_spacing
            .clamp(*LETTER_SPACING_RANGE.start(), *LETTER_SPACING_RANGE.end());
        self.rotation_degrees = self
            .rotation_degrees
            .clamp(*ROTATION_RANGE.start(), *ROTATION_RANGE.end());
        self
    }

    /// Rotation normalized into `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation_degrees.rem_euclid(360.0)
    }

    /// Check the non-geometric parameters.
    ///
    /// Radius validation lives in the geometry engine.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(DocumentError::InvalidFontSize(self.font_size));
        }
        if !self.letter_spacing.is_finite() {
            return Err(DocumentError::InvalidLetterSpacing(self.letter_spacing));
        }
        if !self.rotation_degrees.is_finite() {
            return Err(DocumentError::InvalidRotation(self.rotation_degrees));
        }
        Ok(())
    }
}
