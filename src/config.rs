use std::str::FromStr;

use bon::Builder;
use palette::Srgb;

use crate::error::GaugeError;
use crate::geometry;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a CSS color: a named color (`red`, `gold`) or a `#rgb` / `#rrggbb`
    /// hex string. `transparent` and anything unrecognised yield `None`.
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim();
        if is_transparent(css) {
            return None;
        }
        let rgb: Srgb<u8> = if css.starts_with('#') {
            Srgb::from_str(css).ok()?
        } else {
            palette::named::from_str(&css.to_ascii_lowercase())?
        };
        Some(Self::new(rgb.red, rgb.green, rgb.blue))
    }

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Whether a CSS color string means "paint nothing".
pub fn is_transparent(css: &str) -> bool {
    let css = css.trim();
    css.is_empty() || css.eq_ignore_ascii_case("transparent")
}

/// Colors and text sizes used when the gauge is drawn.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub indicator: Color,
    pub indicator_track: Color,
    pub indicator_track_alpha: f32,
    pub text: Color,
    pub axis_width: f64,
    pub face_opacity: f32,
    pub readout_font_size: f32,
    pub max_framerate: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            indicator: Color::new(0x03, 0x9b, 0xe5),
            indicator_track: Color::new(0xc0, 0xc0, 0xc0),
            indicator_track_alpha: 0.5,
            text: Color::new(0x66, 0x66, 0x66),
            axis_width: 2.0,
            face_opacity: 0.5,
            readout_font_size: 50.0,
            max_framerate: 60.0,
        }
    }
}

/// Everything that shapes the gauge, apart from its value and ranges.
///
/// Angles are in degrees, clockwise from north, and may be negative. Lengths
/// other than `width` and `height` are in viewBox units, where the whole gauge
/// spans `0..2 * radius` on both axes.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = 0.0)]
    pub start_angle: f64,
    #[builder(default = 360.0)]
    pub end_angle: f64,
    #[builder(default = 0.0)]
    pub min: f64,
    #[builder(default = 100.0)]
    pub max: f64,

    #[builder(default = 200.0)]
    pub radius: f64,
    /// Output viewport width in pixels.
    #[builder(default = 250.0)]
    pub width: f64,
    /// Output viewport height in pixels.
    #[builder(default = 250.0)]
    pub height: f64,
    /// Ring thickness as a fraction of the radius.
    #[builder(default = 0.2)]
    pub stroke: f64,

    #[builder(default = 30.0)]
    pub range_width: f64,
    #[builder(default = 15.0)]
    pub indicator_width: f64,
    #[builder(default = 30.0)]
    pub label_size: f64,

    #[builder(default = 10.0)]
    pub major_tick_interval: f64,
    #[builder(default = 2.0)]
    pub minor_tick_interval: f64,

    #[builder(default)]
    pub theme: Theme,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    /// Rejects configurations the layout cannot map values onto.
    pub fn validate(&self) -> Result<(), GaugeError> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(GaugeError::NonFiniteDomain {
                min: self.min,
                max: self.max,
            });
        }
        if self.min == self.max {
            return Err(GaugeError::EmptyDomain(self.min));
        }
        if !(self.min < self.max) {
            return Err(GaugeError::InvertedDomain {
                min: self.min,
                max: self.max,
            });
        }
        if !(self.minor_tick_interval.is_finite() && self.minor_tick_interval > 0.0) {
            return Err(GaugeError::InvalidTickInterval(self.minor_tick_interval));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GaugeError::InvalidRadius(self.radius));
        }
        Ok(())
    }

    pub fn ranges_radius(&self) -> f64 {
        self.radius - 2.0 * self.label_size
    }

    pub fn axis_radius(&self) -> f64 {
        self.ranges_radius() - self.range_width
    }

    pub fn indicator_radius(&self) -> f64 {
        self.axis_radius() + self.indicator_width - 1.0
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke * self.radius
    }

    /// Signed sweep in degrees, as configured.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// A sweep of 0° or a whole turn draws the full circle.
    pub fn is_full_circle(&self) -> bool {
        let sweep = self.sweep().abs();
        sweep == 0.0 || sweep == 360.0
    }

    /// Point on a circle of `radius` around this gauge's center.
    pub fn point_on_circle(&self, radius: f64, angle: f64) -> (i32, i32) {
        geometry::point_on_circle(self.radius, radius, angle)
    }
}
