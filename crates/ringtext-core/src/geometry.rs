//! Circular-path geometry for text-on-a-circle layout.

use kurbo::{Arc, BezPath, Point, SvgArc, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geometry errors.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("radius must be finite, got {0}")]
    NonFiniteRadius(f64),
}

/// Which side of the circle the text flows along.
///
/// Outside text reads left-to-right along the outer edge; inside text faces
/// the circle center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    #[default]
    Outside,
    Inside,
}

impl TextPosition {
    /// Arc traversal direction for this placement.
    pub fn sweep(self) -> SweepDirection {
        match self {
            TextPosition::Outside => SweepDirection::Clockwise,
            TextPosition::Inside => SweepDirection::CounterClockwise,
        }
    }
}

/// SVG-style sweep direction between two points on a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    Clockwise,
    CounterClockwise,
}

impl SweepDirection {
    /// The SVG arc-command sweep flag.
    pub fn flag(self) -> u8 {
        match self {
            SweepDirection::Clockwise => 1,
            SweepDirection::CounterClockwise => 0,
        }
    }

    pub fn is_clockwise(self) -> bool {
        matches!(self, SweepDirection::Clockwise)
    }
}

/// One arc command of a circle path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    /// Arc radius (both axes; the path is a true circle).
    pub radius: f64,
    /// SVG large-arc flag.
    pub large_arc: bool,
    /// Traversal direction.
    pub sweep: SweepDirection,
    /// Arc end point.
    pub end: Point,
}

/// A closed circle expressed as two consecutive half-circle arcs.
///
/// The path starts at the topmost point of the circle and returns to it, so
/// a text-layout consumer flowing along the path with a 50% start offset
/// centers the text at the bottom of the circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePath {
    /// Start (and end) point: the topmost point of the circle.
    pub start: Point,
    /// The two half-circle arcs, in traversal order.
    pub arcs: [ArcSegment; 2],
}

impl CirclePath {
    /// Render as an SVG path-data string.
    ///
    /// Whole coordinates print without a fractional part, matching what the
    /// host expects in shape documents.
    pub fn to_svg(&self) -> String {
        let mut d = format!("M {},{}", fmt_coord(self.start.x), fmt_coord(self.start.y));
        for arc in &self.arcs {
            d.push_str(&format!(
                " A {},{} 0 {},{} {},{}",
                fmt_coord(arc.radius),
                fmt_coord(arc.radius),
                u8::from(arc.large_arc),
                arc.sweep.flag(),
                fmt_coord(arc.end.x),
                fmt_coord(arc.end.y),
            ));
        }
        d
    }

    /// Tessellate into a cubic-Bezier path for local preview rendering.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        let mut from = self.start;
        for seg in &self.arcs {
            let svg_arc = SvgArc {
                from,
                to: seg.end,
                radii: Vec2::new(seg.radius, seg.radius),
                x_rotation: 0.0,
                large_arc: seg.large_arc,
                sweep: seg.sweep.is_clockwise(),
            };
            if let Some(arc) = Arc::from_svg_arc(&svg_arc) {
                arc.to_cubic_beziers(0.1, |p1, p2, p3| {
                    path.curve_to(p1, p2, p3);
                });
            }
            from = seg.end;
        }
        path.close_path();
        path
    }
}

/// Build the closed circle path that circular text flows along.
///
/// Two 180-degree arcs run from the topmost point of the circle through the
/// bottommost point and back. Outside placement traverses clockwise (sweep
/// flag 1) so glyphs face outward; inside placement inverts both sweep flags.
pub fn circle_path(
    center: Point,
    radius: f64,
    position: TextPosition,
) -> Result<CirclePath, GeometryError> {
    if !radius.is_finite() {
        return Err(GeometryError::NonFiniteRadius(radius));
    }
    if radius <= 0.0 {
        return Err(GeometryError::NonPositiveRadius(radius));
    }

    let top = Point::new(center.x, center.y - radius);
    let bottom = Point::new(center.x, center.y + radius);
    let sweep = position.sweep();

    let half = |end: Point| ArcSegment {
        radius,
        large_arc: true,
        sweep,
        end,
    };

    Ok(CirclePath {
        start: top,
        arcs: [half(bottom), half(top)],
    })
}

/// Format a coordinate the way the host shape schema expects: whole values
/// without a trailing `.0`.
fn fmt_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
