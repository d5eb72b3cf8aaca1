//! Geometry engine for a radial gauge: a value between a minimum and maximum
//! drawn as a ring sweep over an axis, with colored range bands, tick marks and
//! a numeric readout.
//!
//! The layout functions are pure. [`Gauge`] holds the mutable state and turns
//! it into a [`Scene`], which can be written out as SVG or rasterized into a
//! window.

// ============================================================================
// MODULES
// ============================================================================

pub mod arc;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ranges;
pub mod raster;
pub mod scene;
pub mod svg;
pub mod ticks;
mod window;

pub use arc::{build_arc, ArcGeometry, DashArray, Rotation};
pub use config::{Color, GaugeConfig, Theme};
pub use error::GaugeError;
pub use geometry::{
    angle_for, compute_display_size, enumerate_sweep, normalize_angle, point_on_circle,
    DisplaySize, DisplaySizeCache, Sweep,
};
pub use ranges::{color_for, default_ranges, Band, Range, RangeTable};
pub use raster::{load_font, Canvas};
pub use scene::{build_scene, DrawCommand, Outline, Scene, Viewport};
pub use svg::render_svg;
pub use ticks::{layout_ticks, Tick, TickLabel};

use config::is_transparent;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Properties touched since the last [`Gauge::take_changes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub value: bool,
    pub sweep: bool,
    pub bounds: bool,
    pub ranges: bool,
    pub viewport: bool,
}

impl Changes {
    pub fn all() -> Self {
        Self {
            value: true,
            sweep: true,
            bounds: true,
            ranges: true,
            viewport: true,
        }
    }

    pub fn any(&self) -> bool {
        self.value || self.sweep || self.bounds || self.ranges || self.viewport
    }
}

/// Updates for a gauge shown in a window, sent from another thread.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    SetValue(f64),
    SetSweep(f64, f64),   // start, end
    SetBounds(f64, f64),  // min, max
    SetRanges(Vec<Range>),
}

/// A gauge with its current value and ranges.
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    ranges: RangeTable,
    value: f64,
    changes: Changes,
    display: DisplaySizeCache,
}

fn warn_unparsed_colors(ranges: &RangeTable) {
    for range in ranges.as_slice() {
        if !is_transparent(&range.color) && Color::parse(&range.color).is_none() {
            log::warn!(
                "range at {} has unrecognised color {:?}; it will not be rasterized",
                range.threshold,
                range.color
            );
        }
    }
}

impl Gauge {
    /// Validates `config` and starts the gauge at its minimum.
    pub fn new(
        config: GaugeConfig,
        ranges: impl IntoIterator<Item = Range>,
    ) -> Result<Self, GaugeError> {
        config.validate()?;
        let ranges = RangeTable::new(ranges);
        warn_unparsed_colors(&ranges);
        Ok(Self {
            value: config.min,
            config,
            ranges,
            changes: Changes::all(),
            display: DisplaySizeCache::new(),
        })
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Values outside the bounds are kept and drawn past the ends of the sweep.
    pub fn set_value(&mut self, value: f64) {
        if value != self.value {
            self.value = value;
            self.changes.value = true;
        }
    }

    pub fn set_sweep(&mut self, start: f64, end: f64) {
        if (start, end) != (self.config.start_angle, self.config.end_angle) {
            self.config.start_angle = start;
            self.config.end_angle = end;
            self.display.invalidate();
            self.changes.sweep = true;
        }
    }

    /// Changes the value domain. Nothing changes if the new domain is invalid.
    pub fn set_bounds(&mut self, min: f64, max: f64) -> Result<(), GaugeError> {
        if (min, max) == (self.config.min, self.config.max) {
            return Ok(());
        }
        let mut candidate = self.config.clone();
        candidate.min = min;
        candidate.max = max;
        candidate.validate()?;
        self.config = candidate;
        self.changes.bounds = true;
        Ok(())
    }

    pub fn set_ranges(&mut self, ranges: &[Range]) {
        let previous = std::mem::take(&mut self.ranges);
        self.ranges.replace(ranges);
        if self.ranges != previous {
            warn_unparsed_colors(&self.ranges);
            self.changes.ranges = true;
        }
    }

    /// Output size in pixels, before cropping to the visible arc.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if (width, height) != (self.config.width, self.config.height) {
            self.config.width = width;
            self.config.height = height;
            self.changes.viewport = true;
        }
    }

    pub fn apply(&mut self, command: GaugeCommand) -> Result<(), GaugeError> {
        log::debug!("applying {command:?}");
        match command {
            GaugeCommand::SetValue(value) => self.set_value(value),
            GaugeCommand::SetSweep(start, end) => self.set_sweep(start, end),
            GaugeCommand::SetBounds(min, max) => self.set_bounds(min, max)?,
            GaugeCommand::SetRanges(ranges) => self.set_ranges(&ranges),
        }
        Ok(())
    }

    /// Returns what changed since the previous call and clears the record.
    pub fn take_changes(&mut self) -> Changes {
        std::mem::take(&mut self.changes)
    }

    pub fn display_size(&mut self) -> DisplaySize {
        self.display.get(&self.config)
    }

    /// Color of the range band the current value falls in.
    pub fn value_color(&self) -> Option<&str> {
        self.ranges.color_for(self.value, self.config.max)
    }

    pub fn scene(&mut self) -> Scene {
        let display = self.display_size();
        build_scene(&self.config, &self.ranges, self.value, display)
    }

    pub fn to_svg(&mut self) -> String {
        render_svg(&self.scene())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge() -> Gauge {
        Gauge::new(GaugeConfig::default(), default_ranges()).expect("default config is valid")
    }

    #[test]
    fn starts_at_min_with_everything_dirty() {
        let mut gauge = gauge();
        assert_eq!(gauge.value(), 0.0);
        assert_eq!(gauge.ranges().len(), 2);
        assert_eq!(gauge.take_changes(), Changes::all());
        assert!(!gauge.take_changes().any());
    }

    #[test]
    fn rejects_an_empty_domain() {
        let config = GaugeConfig::builder().min(4.0).max(4.0).build();
        assert!(matches!(
            Gauge::new(config, Vec::new()),
            Err(GaugeError::EmptyDomain(_))
        ));
    }

    #[test]
    fn rejects_unbounded_domains() {
        let config = GaugeConfig::builder().max(f64::INFINITY).build();
        assert!(matches!(
            Gauge::new(config, Vec::new()),
            Err(GaugeError::NonFiniteDomain { .. })
        ));

        let mut gauge = gauge();
        assert!(gauge.set_bounds(0.0, f64::INFINITY).is_err());
        assert_eq!(gauge.config().max, 100.0);
    }

    #[test]
    fn setters_only_record_real_changes() {
        let mut gauge = gauge();
        gauge.take_changes();

        gauge.set_value(0.0);
        gauge.set_sweep(0.0, 360.0);
        gauge.set_ranges(&default_ranges());
        assert!(!gauge.take_changes().any());

        gauge.set_value(80.0);
        gauge.set_viewport(300.0, 300.0);
        let changes = gauge.take_changes();
        assert!(changes.value && changes.viewport);
        assert!(!changes.sweep && !changes.bounds && !changes.ranges);
    }

    #[test]
    fn invalid_bounds_leave_the_gauge_untouched() {
        let mut gauge = gauge();
        gauge.take_changes();
        assert!(gauge.set_bounds(10.0, 10.0).is_err());
        assert!(gauge.set_bounds(10.0, 0.0).is_err());
        assert_eq!((gauge.config().min, gauge.config().max), (0.0, 100.0));
        assert!(!gauge.take_changes().bounds);

        gauge.set_bounds(-50.0, 50.0).expect("valid bounds");
        assert_eq!(gauge.config().min, -50.0);
        assert!(gauge.take_changes().bounds);
    }

    #[test]
    fn sweep_change_refreshes_the_display_size() {
        let mut gauge = gauge();
        assert_eq!(gauge.display_size().height, 250.0);
        gauge.apply(GaugeCommand::SetSweep(-90.0, 90.0)).expect("sweep never fails");
        assert_eq!(gauge.display_size().height, 125.0);
        assert!(gauge.take_changes().sweep);
    }

    #[test]
    fn value_color_follows_the_ranges() {
        let mut gauge = gauge();
        assert_eq!(gauge.value_color(), None);
        gauge.apply(GaugeCommand::SetValue(95.0)).expect("value never fails");
        assert_eq!(gauge.value_color(), Some("red"));
        gauge
            .apply(GaugeCommand::SetRanges(vec![Range::new(0.0, "green")]))
            .expect("ranges never fail");
        assert_eq!(gauge.value_color(), Some("green"));
    }

    #[test]
    fn svg_reflects_the_current_value() {
        let mut gauge = gauge();
        gauge.set_value(42.0);
        let svg = gauge.to_svg();
        assert!(svg.contains(">42</text>"));
    }
}
