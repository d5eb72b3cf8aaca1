use crate::config::GaugeConfig;
use crate::geometry::angle_for;

/// Tolerance used when stepping the value domain and testing divisibility.
const EPSILON: f64 = 1e-9;

/// Upper bound on the number of ticks laid out for one gauge.
pub const MAX_TICKS: usize = 10_000;

/// Gap between the end of a major tick and its label, beyond half the label size.
const LABEL_GAP: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub anchor: (i32, i32),
    pub value: f64,
}

impl TickLabel {
    pub fn text(&self) -> String {
        format!("{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub is_major: bool,
    pub label: Option<TickLabel>,
}

fn is_multiple(value: f64, interval: f64) -> bool {
    if !(interval > 0.0) {
        return false;
    }
    let r = value.rem_euclid(interval);
    r < EPSILON || interval - r < EPSILON
}

/// Tick marks from `min` to `max` every `minor_tick_interval`. Ticks on a
/// multiple of `major_tick_interval` are longer and carry a label.
///
/// Yields nothing when the domain would need more than [`MAX_TICKS`] ticks.
pub fn layout_ticks(config: &GaugeConfig) -> Vec<Tick> {
    let step = config.minor_tick_interval;
    if !(step.is_finite() && step > 0.0) || !(config.max >= config.min) {
        return Vec::new();
    }

    let steps = ((config.max - config.min) / step + EPSILON).floor();
    if !(steps.is_finite() && steps < MAX_TICKS as f64) {
        log::warn!(
            "{}..{} every {} needs too many ticks; drawing none",
            config.min,
            config.max,
            step
        );
        return Vec::new();
    }
    let count = steps as usize + 1;
    let axis = config.axis_radius();

    (0..count)
        .map(|k| {
            let value = config.min + k as f64 * step;
            let angle = angle_for(value, config) + config.start_angle;
            let is_major = is_multiple(value, config.major_tick_interval);
            let length = if is_major {
                config.range_width
            } else {
                config.indicator_width
            };
            let label = is_major.then(|| TickLabel {
                anchor: config.point_on_circle(
                    axis + length + config.label_size / 2.0 + LABEL_GAP,
                    angle,
                ),
                value,
            });

            Tick {
                value,
                start: config.point_on_circle(axis, angle),
                end: config.point_on_circle(axis + length, angle),
                is_major,
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_the_domain_by_the_minor_interval() {
        let ticks = layout_ticks(&GaugeConfig::default());
        assert_eq!(ticks.len(), 51);
        assert_eq!(ticks.first().map(|t| t.value), Some(0.0));
        assert_eq!(ticks.last().map(|t| t.value), Some(100.0));
        assert_eq!(ticks.iter().filter(|t| t.is_major).count(), 11);
    }

    #[test]
    fn major_ticks_are_longer_and_labelled() {
        let config = GaugeConfig::default();
        let ticks = layout_ticks(&config);

        // value 0 sits at north: x stays on the center line
        let zero = &ticks[0];
        assert!(zero.is_major);
        assert_eq!(zero.start, (200, 90));
        assert_eq!(zero.end, (200, 60));
        let label = zero.label.as_ref().expect("major tick has a label");
        assert_eq!(label.anchor, (200, 40));
        assert_eq!(label.text(), "0");

        let minor = &ticks[1];
        assert!(!minor.is_major);
        assert!(minor.label.is_none());
        assert_eq!(minor.value, 2.0);
    }

    #[test]
    fn ticks_follow_the_sweep() {
        let config = GaugeConfig::builder()
            .start_angle(90.0)
            .end_angle(270.0)
            .min(0.0)
            .max(10.0)
            .minor_tick_interval(5.0)
            .build();
        let ticks = layout_ticks(&config);
        let starts: Vec<(i32, i32)> = ticks.iter().map(|t| t.start).collect();
        assert_eq!(starts, vec![(310, 200), (200, 310), (90, 200)]);
    }

    #[test]
    fn fractional_steps_do_not_drift() {
        let config = GaugeConfig::builder()
            .min(0.0)
            .max(1.0)
            .minor_tick_interval(0.1)
            .major_tick_interval(0.5)
            .build();
        let ticks = layout_ticks(&config);
        assert_eq!(ticks.len(), 11);
        let majors: Vec<f64> = ticks.iter().filter(|t| t.is_major).map(|t| t.value).collect();
        assert_eq!(majors, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn oversized_domains_yield_no_ticks() {
        let huge = GaugeConfig::builder().max(1e12).build();
        assert!(layout_ticks(&huge).is_empty());

        let unbounded = GaugeConfig::builder().max(f64::INFINITY).build();
        assert!(layout_ticks(&unbounded).is_empty());

        let at_cap = GaugeConfig::builder()
            .max((MAX_TICKS - 1) as f64)
            .minor_tick_interval(1.0)
            .build();
        assert_eq!(layout_ticks(&at_cap).len(), MAX_TICKS);
    }

    #[test]
    fn invalid_step_yields_no_ticks() {
        let config = GaugeConfig::builder().minor_tick_interval(0.0).build();
        assert!(layout_ticks(&config).is_empty());
    }
}
