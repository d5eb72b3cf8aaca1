// ============================================================================
// RETAINED MODE SCENE
// ============================================================================
//
// The layout functions produce numbers; the scene collects them, in painter's
// order, into commands that a renderer (SVG or raster) can replay.

use crate::arc::{build_arc, ArcGeometry};
use crate::config::{is_transparent, GaugeConfig};
use crate::geometry::DisplaySize;
use crate::ranges::RangeTable;
use crate::ticks::layout_ticks;

/// The axis circle between the sweep's two ends, in viewBox units.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    /// Center coordinate on both axes, the gauge's outer radius.
    pub center: f64,
    pub radius: f64,
    /// Point at the end angle, where the path starts.
    pub from: (i32, i32),
    /// Point at the start angle, where the path ends.
    pub to: (i32, i32),
    pub start_angle: f64,
    /// Clockwise extent in degrees, in `0..360`; 0 for a full circle.
    pub span: f64,
    pub full_circle: bool,
}

impl Outline {
    pub fn new(config: &GaugeConfig, radius: f64) -> Self {
        let full_circle = config.is_full_circle();
        let span = if full_circle {
            0.0
        } else {
            config.sweep().rem_euclid(360.0)
        };
        Self {
            center: config.radius,
            radius,
            from: config.point_on_circle(radius, config.end_angle),
            to: config.point_on_circle(radius, config.start_angle),
            start_angle: config.start_angle,
            span,
            full_circle: full_circle || span == 0.0,
        }
    }

    /// SVG path data running counter-clockwise from the end of the sweep back
    /// to its start.
    pub fn path(&self) -> String {
        let large_arc = u8::from(self.span > 180.0);
        format!(
            "M {} {} A {r} {r} 0 {large_arc} 0 {} {}",
            self.from.0,
            self.from.1,
            self.to.0,
            self.to.1,
            r = self.radius
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Dashed circle stroke; `arc.color` holds the CSS color.
    Ring {
        class: &'static str,
        arc: ArcGeometry,
        opacity: f32,
    },
    Face {
        outline: Outline,
        fill: String,
        opacity: f32,
    },
    Axis {
        outline: Outline,
        stroke: String,
        stroke_width: f64,
    },
    Tick {
        start: (i32, i32),
        end: (i32, i32),
        stroke: String,
    },
    Label {
        anchor: (i32, i32),
        text: String,
        font_size: f64,
        fill: String,
    },
    /// The numeric readout. Unlike everything else it is placed in output
    /// pixels, relative to the top-left of the visible box.
    Readout {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        fill: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Full output size in pixels, before cropping to `display`.
    pub width: f64,
    pub height: f64,
    /// Side of the square viewBox, `2 * radius`.
    pub view_box: f64,
    pub display: DisplaySize,
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new(config: &GaugeConfig, display: DisplaySize) -> Self {
        Self {
            width: config.width,
            height: config.height,
            view_box: 2.0 * config.radius,
            display,
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

/// Maps viewBox units onto output pixels the way SVG's default
/// `xMidYMid meet` does: uniform scale, centered on the short axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    pub fn new(scene: &Scene) -> Self {
        let scale = if scene.view_box > 0.0 {
            (scene.width / scene.view_box).min(scene.height / scene.view_box)
        } else {
            0.0
        };
        Self {
            scale,
            offset_x: (scene.width - scene.view_box * scale) / 2.0,
            offset_y: (scene.height - scene.view_box * scale) / 2.0,
        }
    }

    pub fn to_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }

    pub fn from_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.offset_x) / self.scale,
            (y - self.offset_y) / self.scale,
        )
    }

    pub fn length(&self, l: f64) -> f64 {
        l * self.scale
    }
}

/// Vertical offset of the readout, as a percentage of its own height.
///
/// Ranges from -50 (centered) when nothing overflows to 15 when half of the
/// gauge is cropped away.
pub fn readout_offset_percent(display: DisplaySize, height: f64) -> f64 {
    if height == 0.0 {
        return -50.0;
    }
    -50.0 + 65.0 * ((1.0 - display.height / height) / 0.5)
}

/// Lays out the whole gauge for `value`.
pub fn build_scene(
    config: &GaugeConfig,
    ranges: &RangeTable,
    value: f64,
    display: DisplaySize,
) -> Scene {
    let theme = &config.theme;
    let text = theme.text.to_css();
    let mut scene = Scene::new(config, display);

    for band in ranges.bands(config.max) {
        if is_transparent(band.color) {
            continue;
        }
        let arc = build_arc(
            config,
            config.ranges_radius(),
            band.start,
            band.end,
            config.range_width,
        )
        .with_color(band.color);
        scene.add_command(DrawCommand::Ring {
            class: "range",
            arc,
            opacity: 1.0,
        });
    }

    let indicator_radius = config.indicator_radius();
    scene.add_command(DrawCommand::Ring {
        class: "indicator-track",
        arc: build_arc(config, indicator_radius, value, config.max, config.indicator_width)
            .with_color(theme.indicator_track.to_css()),
        opacity: theme.indicator_track_alpha,
    });
    scene.add_command(DrawCommand::Ring {
        class: "indicator",
        arc: build_arc(config, indicator_radius, 0.0, value, config.indicator_width)
            .with_color(theme.indicator.to_css()),
        opacity: 1.0,
    });

    let outline = Outline::new(config, config.axis_radius());
    if let Some(fill) = ranges
        .color_for(value, config.max)
        .filter(|c| !is_transparent(c))
    {
        scene.add_command(DrawCommand::Face {
            outline: outline.clone(),
            fill: fill.to_string(),
            opacity: theme.face_opacity,
        });
    }

    scene.add_command(DrawCommand::Axis {
        outline,
        stroke: text.clone(),
        stroke_width: theme.axis_width,
    });
    for tick in layout_ticks(config) {
        scene.add_command(DrawCommand::Tick {
            start: tick.start,
            end: tick.end,
            stroke: text.clone(),
        });
        if let Some(label) = tick.label {
            scene.add_command(DrawCommand::Label {
                anchor: label.anchor,
                text: label.text(),
                font_size: config.label_size,
                fill: text.clone(),
            });
        }
    }

    let font_size = theme.readout_font_size as f64;
    let middle = readout_offset_percent(display, config.height);
    scene.add_command(DrawCommand::Readout {
        x: display.width / 2.0,
        y: display.height / 2.0 + middle / 100.0 * font_size + font_size / 2.0,
        text: format!("{}", value),
        font_size,
        fill: text,
    });

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::compute_display_size;
    use crate::ranges::Range;
    use approx::assert_relative_eq;

    fn stock_ranges() -> RangeTable {
        RangeTable::new([Range::new(90.0, "red"), Range::new(75.0, "yellow")])
    }

    fn classes(scene: &Scene) -> Vec<&'static str> {
        scene
            .commands()
            .iter()
            .map(|c| match c {
                DrawCommand::Ring { class, .. } => *class,
                DrawCommand::Face { .. } => "face",
                DrawCommand::Axis { .. } => "axis",
                DrawCommand::Tick { .. } => "tick",
                DrawCommand::Label { .. } => "label",
                DrawCommand::Readout { .. } => "readout",
            })
            .collect()
    }

    #[test]
    fn paints_in_template_order() {
        let config = GaugeConfig::default();
        let display = compute_display_size(&config);
        let scene = build_scene(&config, &stock_ranges(), 80.0, display);
        let classes = classes(&scene);
        assert_eq!(
            &classes[..6],
            &["range", "range", "indicator-track", "indicator", "face", "axis"]
        );
        assert_eq!(classes.iter().filter(|c| **c == "tick").count(), 51);
        assert_eq!(classes.iter().filter(|c| **c == "label").count(), 11);
        assert_eq!(classes.last(), Some(&"readout"));
    }

    #[test]
    fn face_is_skipped_without_a_band_color() {
        let config = GaugeConfig::default();
        let display = compute_display_size(&config);
        let scene = build_scene(&config, &stock_ranges(), 20.0, display);
        assert!(!classes(&scene).contains(&"face"));

        let clear = RangeTable::new([Range::new(0.0, "transparent")]);
        let scene = build_scene(&config, &clear, 20.0, display);
        assert!(!classes(&scene).contains(&"face"));
        assert!(!classes(&scene).contains(&"range"));
    }

    #[test]
    fn face_takes_the_value_band_color() {
        let config = GaugeConfig::default();
        let scene = build_scene(
            &config,
            &stock_ranges(),
            95.0,
            compute_display_size(&config),
        );
        let fill = scene.commands().iter().find_map(|c| match c {
            DrawCommand::Face { fill, .. } => Some(fill.as_str()),
            _ => None,
        });
        assert_eq!(fill, Some("red"));
    }

    #[test]
    fn outline_path_for_a_partial_sweep() {
        let config = GaugeConfig::builder()
            .radius(1.0)
            .start_angle(-90.0)
            .end_angle(90.0)
            .build();
        let outline = Outline::new(&config, 1.0);
        assert!(!outline.full_circle);
        assert_eq!(outline.span, 180.0);
        assert_eq!(outline.path(), "M 2 1 A 1 1 0 0 0 0 1");

        let wide = GaugeConfig::builder()
            .start_angle(-135.0)
            .end_angle(135.0)
            .build();
        assert!(Outline::new(&wide, 100.0).path().contains(" 0 1 0 "));
    }

    #[test]
    fn viewport_meets_the_short_side() {
        let config = GaugeConfig::builder()
            .radius(100.0)
            .width(400.0)
            .height(200.0)
            .build();
        let scene = Scene::new(&config, compute_display_size(&config));
        let viewport = Viewport::new(&scene);
        assert_relative_eq!(viewport.scale, 1.0);
        assert_relative_eq!(viewport.offset_x, 100.0);
        assert_relative_eq!(viewport.offset_y, 0.0);
        assert_eq!(viewport.to_pixels(100.0, 100.0), (200.0, 100.0));
        assert_eq!(viewport.from_pixels(200.0, 100.0), (100.0, 100.0));
    }

    #[test]
    fn readout_centers_when_nothing_overflows() {
        let config = GaugeConfig::default();
        let display = compute_display_size(&config);
        assert_relative_eq!(readout_offset_percent(display, config.height), -50.0);

        let half = DisplaySize {
            width: 250.0,
            height: 125.0,
        };
        assert_relative_eq!(readout_offset_percent(half, 250.0), 15.0);

        let scene = build_scene(&config, &RangeTable::default(), 42.0, display);
        match scene.commands().last() {
            Some(DrawCommand::Readout { x, y, text, .. }) => {
                assert_relative_eq!(*x, 125.0);
                assert_relative_eq!(*y, 125.0);
                assert_eq!(text, "42");
            }
            other => panic!("expected readout, got {other:?}"),
        }
    }
}
