use std::f64::consts::PI;
use std::fmt;

use crate::config::GaugeConfig;
use crate::geometry::angle_for;

/// Draw/gap pair for a dashed circle stroke: `arc` drawn, then a gap as long
/// as the whole circumference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashArray {
    pub arc: f64,
    pub circumference: f64,
}

impl DashArray {
    /// Fraction of the ring covered by the drawn dash.
    pub fn coverage(&self) -> f64 {
        if self.circumference == 0.0 {
            0.0
        } else {
            self.arc / self.circumference
        }
    }
}

impl fmt::Display for DashArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.arc, self.circumference)
    }
}

/// Rotation about a center point, in degrees. The stroke of a circle starts
/// at east (3 o'clock), so this is where the dash begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub cx: f64,
    pub cy: f64,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rotate({}, {}, {})", self.degrees, self.cx, self.cy)
    }
}

/// A partial ring, expressed as a dashed circle stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcGeometry {
    /// Radius of the stroke's center line.
    pub radius: f64,
    pub stroke_width: f64,
    pub dash: DashArray,
    pub rotation: Rotation,
    pub color: Option<String>,
}

impl ArcGeometry {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Ring of outer `radius` and thickness `width` covering `start..end` of the
/// value domain.
pub fn build_arc(
    config: &GaugeConfig,
    radius: f64,
    start: f64,
    end: f64,
    width: f64,
) -> ArcGeometry {
    let start_angle = angle_for(start, config);
    let end_angle = angle_for(end, config);
    let ring_radius = radius - width / 2.0;
    let circumference = 2.0 * PI * ring_radius;

    ArcGeometry {
        radius: ring_radius,
        stroke_width: width,
        dash: DashArray {
            arc: circumference * (end_angle - start_angle) / 360.0,
            circumference,
        },
        // -90 turns the stroke's eastward start to north
        rotation: Rotation {
            degrees: config.start_angle + start_angle - 90.0,
            cx: config.radius,
            cy: config.radius,
        },
        color: None,
    }
}
