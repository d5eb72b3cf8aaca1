//! Angle and circle math for the gauge.
//!
//! All angles are in degrees, with 0° pointing north (towards negative y on
//! screen) and increasing clockwise.

use crate::config::GaugeConfig;

/// Converts a negative angle into the clockwise-from-north range by adding a
/// single turn. Angles that are already non-negative are returned unchanged,
/// so 360 stays 360.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Rounds half-up, so `-0.5` becomes `0` rather than `-1`.
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Integer point at `angle` on a circle of `radius` around the center of a
/// gauge whose outer radius is `center`.
///
/// `center` doubles as the center coordinate on both axes, since the gauge's
/// viewBox spans `0..2 * center`.
pub fn point_on_circle(center: f64, radius: f64, angle: f64) -> (i32, i32) {
    let t = normalize_angle(angle).to_radians();
    (
        round_half_up(center + radius * t.sin()),
        round_half_up(center - radius * t.cos()),
    )
}

/// Whole-degree form of an angle, in `0..=360`.
fn whole_degrees(angle: f64) -> u16 {
    let a = normalize_angle(angle).round();
    let a = if (0.0..=360.0).contains(&a) {
        a
    } else {
        a.rem_euclid(360.0)
    };
    a as u16
}

/// Every whole-degree angle a sweep passes through, both ends included.
///
/// Steps clockwise from the start, emitting 360 and then 0 when the sweep
/// crosses north. A sweep whose ends coincide covers one full lap.
#[derive(Debug, Clone)]
pub struct Sweep {
    cursor: Option<u16>,
    end: u16,
    left_start: bool,
}

/// Enumerates the sweep from `start` to `end` (raw, signed degrees).
pub fn enumerate_sweep(start: f64, end: f64) -> Sweep {
    Sweep {
        cursor: Some(whole_degrees(start)),
        end: whole_degrees(end),
        left_start: false,
    }
}

impl Sweep {
    fn remaining(&self) -> usize {
        let Some(cursor) = self.cursor else {
            return 0;
        };
        let (cursor, end) = (cursor as usize, self.end as usize);
        if cursor < end || (cursor == end && self.left_start) {
            end - cursor + 1
        } else {
            // through 360 and back around from 0
            (360 - cursor + 1) + (end + 1)
        }
    }
}

impl Iterator for Sweep {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        let angle = self.cursor?;
        self.cursor = if angle == self.end && self.left_start {
            None
        } else if angle >= 360 {
            Some(0)
        } else {
            Some(angle + 1)
        };
        self.left_start = true;
        Some(angle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Sweep {}

impl std::iter::FusedIterator for Sweep {}

/// Size of the visible part of the gauge, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

/// Tight box around the visible arc, scaled from viewBox units to the
/// configured output size.
///
/// Only the bottom-right corner is searched: the box always starts at the
/// viewBox origin.
pub fn compute_display_size(config: &GaugeConfig) -> DisplaySize {
    let r = config.radius;
    let (max_x, max_y) = enumerate_sweep(config.start_angle, config.end_angle)
        .map(|angle| point_on_circle(r, r, angle as f64))
        .fold((0, 0), |(mx, my), (x, y)| (mx.max(x), my.max(y)));

    DisplaySize {
        width: config.width * (max_x as f64 / (2.0 * r)),
        height: config.height * (max_y as f64 / (2.0 * r)),
    }
}

/// Angle covered by `value`, measured from the start of the sweep.
///
/// Values outside `[min, max]` extrapolate past the ends of the sweep. An empty
/// domain maps everything to 0.
pub fn angle_for(value: f64, config: &GaugeConfig) -> f64 {
    let span = config.max - config.min;
    if span == 0.0 {
        return 0.0;
    }
    config.sweep() * (config.min + value) / span
}

/// Memoized [`DisplaySize`], keyed by the sweep and viewport it was computed for.
#[derive(Debug, Clone, Default)]
pub struct DisplaySizeCache {
    entry: Option<((f64, f64, f64, f64, f64), DisplaySize)>,
}

impl DisplaySizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached size, recomputing it first if the sweep or the
    /// viewport changed since the last call.
    pub fn get(&mut self, config: &GaugeConfig) -> DisplaySize {
        let key = (
            config.start_angle,
            config.end_angle,
            config.radius,
            config.width,
            config.height,
        );
        match self.entry {
            Some((cached, size)) if cached == key => size,
            _ => {
                let size = compute_display_size(config);
                log::debug!(
                    "display size for sweep {}..{} is {}x{}",
                    config.start_angle,
                    config.end_angle,
                    size.width,
                    size.height
                );
                self.entry = Some((key, size));
                size
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn degrees(start: u16, end: u16) -> Vec<u16> {
        (start..=end).collect()
    }

    #[test]
    fn normalizes_negative_angles_once() {
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(360.0), 360.0);
        assert_eq!(normalize_angle(450.0), 450.0);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_half_up(0.5), 1);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(-1.2), -1);
    }

    #[test]
    fn sweeps_without_wrapping() {
        let got: Vec<u16> = enumerate_sweep(0.0, 45.0).collect();
        assert_eq!(got, degrees(0, 45));
        assert_eq!(got.len(), 46);

        let got: Vec<u16> = enumerate_sweep(180.0, -90.0).collect();
        assert_eq!(got, degrees(180, 270));
    }

    #[test]
    fn sweeps_across_north() {
        let mut want = degrees(270, 360);
        want.extend(degrees(0, 90));

        let got: Vec<u16> = enumerate_sweep(-90.0, 90.0).collect();
        assert_eq!(got, want);
        let got: Vec<u16> = enumerate_sweep(270.0, 90.0).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn coinciding_ends_cover_a_full_lap() {
        let got: Vec<u16> = enumerate_sweep(-90.0, 270.0).collect();
        let mut want = degrees(270, 360);
        want.extend(degrees(0, 270));
        assert_eq!(got, want);
        assert_eq!(got.first(), Some(&270));
        assert_eq!(got.last(), Some(&270));
    }

    #[test]
    fn full_turn_from_north() {
        let got: Vec<u16> = enumerate_sweep(0.0, 360.0).collect();
        assert_eq!(got, degrees(0, 360));
    }

    #[test]
    fn size_hint_is_exact() {
        for (start, end) in [(0.0, 45.0), (-90.0, 90.0), (90.0, 90.0), (360.0, 0.0)] {
            let sweep = enumerate_sweep(start, end);
            let len = sweep.len();
            assert_eq!(sweep.count(), len, "sweep {start}..{end}");
        }
    }

    #[test]
    fn out_of_range_angles_still_terminate() {
        let got: Vec<u16> = enumerate_sweep(400.0, 50.0).collect();
        assert_eq!(got, degrees(40, 50));
        let got: Vec<u16> = enumerate_sweep(0.5, 2.4).collect();
        assert_eq!(got, degrees(1, 2));
    }

    #[test]
    fn points_on_unit_circle() {
        let cases = [
            (0.0, (1, 0)),
            (90.0, (2, 1)),
            (180.0, (1, 2)),
            (270.0, (0, 1)),
            (-90.0, (0, 1)),
        ];
        for (angle, want) in cases {
            assert_eq!(point_on_circle(1.0, 1.0, angle), want, "angle {angle}");
        }
    }

    #[test]
    fn display_size_shrinks_to_the_visible_arc() {
        let cases = [
            (0.0, 360.0, 2.0, 2.0),
            (-90.0, 90.0, 2.0, 1.0),
            (-90.0, 180.0, 2.0, 2.0),
        ];
        for (start, end, want_width, want_height) in cases {
            let config = GaugeConfig::builder()
                .width(2.0)
                .height(2.0)
                .radius(1.0)
                .start_angle(start)
                .end_angle(end)
                .build();
            let size = compute_display_size(&config);
            assert_eq!(size.width, want_width, "width for {start}..{end}");
            assert_eq!(size.height, want_height, "height for {start}..{end}");
        }
    }

    #[test]
    fn display_size_scales_to_output_pixels() {
        let config = GaugeConfig::builder()
            .start_angle(-90.0)
            .end_angle(90.0)
            .build();
        let size = compute_display_size(&config);
        assert_relative_eq!(size.width, 250.0);
        assert_relative_eq!(size.height, 125.0);
    }

    #[test]
    fn maps_values_linearly_onto_the_sweep() {
        let config = GaugeConfig::builder()
            .start_angle(-135.0)
            .end_angle(135.0)
            .build();
        assert_relative_eq!(angle_for(0.0, &config), 0.0);
        assert_relative_eq!(angle_for(50.0, &config), 135.0);
        assert_relative_eq!(angle_for(100.0, &config), 270.0);
        assert_relative_eq!(angle_for(150.0, &config), 405.0);
        assert_relative_eq!(angle_for(-10.0, &config), -27.0);
    }

    #[test]
    fn empty_domain_maps_to_zero() {
        let config = GaugeConfig::builder().min(3.0).max(3.0).build();
        assert_eq!(angle_for(3.0, &config), 0.0);
    }

    #[test]
    fn cache_follows_sweep_changes() {
        let mut config = GaugeConfig::builder()
            .width(2.0)
            .height(2.0)
            .radius(1.0)
            .build();
        let mut cache = DisplaySizeCache::new();
        assert_eq!(cache.get(&config).height, 2.0);

        config.start_angle = -90.0;
        config.end_angle = 90.0;
        assert_eq!(cache.get(&config).height, 1.0);

        config.min = 10.0;
        config.max = 20.0;
        assert_eq!(cache.get(&config).height, 1.0);
    }
}
