/// A colored band that starts at `threshold` and runs up to the next range's
/// threshold, or up to the gauge maximum for the last range.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub threshold: f64,
    pub color: String,
}

impl Range {
    pub fn new(threshold: f64, color: impl Into<String>) -> Self {
        Self {
            threshold,
            color: color.into(),
        }
    }
}

/// One resolved band: `start..end` in the value domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<'a> {
    pub start: f64,
    pub end: f64,
    pub color: &'a str,
}

/// Ranges kept in ascending threshold order.
///
/// Ranges sharing a threshold keep the order they were given in. All but the
/// last of them end up with an empty band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeTable {
    ranges: Vec<Range>,
}

impl RangeTable {
    pub fn new(ranges: impl IntoIterator<Item = Range>) -> Self {
        let mut ranges: Vec<Range> = ranges.into_iter().collect();
        ranges.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Self { ranges }
    }

    /// Swaps in a copy of `ranges`, sorted. The caller's slice is left as is.
    pub fn replace(&mut self, ranges: &[Range]) {
        *self = Self::new(ranges.iter().cloned());
        log::debug!("range table now holds {} bands", self.ranges.len());
    }

    pub fn insert(&mut self, range: Range) {
        let at = self
            .ranges
            .partition_point(|r| r.threshold.total_cmp(&range.threshold).is_le());
        self.ranges.insert(at, range);
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn as_slice(&self) -> &[Range] {
        &self.ranges
    }

    /// Bands in ascending order. The last band ends at `max`.
    pub fn bands(&self, max: f64) -> impl Iterator<Item = Band<'_>> + '_ {
        self.ranges.iter().enumerate().map(move |(i, range)| Band {
            start: range.threshold,
            end: self.ranges.get(i + 1).map_or(max, |next| next.threshold),
            color: &range.color,
        })
    }

    /// Color of the band holding `value`, if any.
    pub fn color_for(&self, value: f64, max: f64) -> Option<&str> {
        let last = self.ranges.len().checked_sub(1)?;
        self.bands(max)
            .enumerate()
            .find(|(i, band)| {
                value >= band.start && (value < band.end || (*i == last && value <= band.end))
            })
            .map(|(_, band)| band.color)
    }
}

impl From<Vec<Range>> for RangeTable {
    fn from(ranges: Vec<Range>) -> Self {
        Self::new(ranges)
    }
}

/// Warning at 75, danger at 90.
pub fn default_ranges() -> Vec<Range> {
    vec![Range::new(75.0, "yellow"), Range::new(90.0, "red")]
}

/// Free-standing form of [`RangeTable::color_for`].
pub fn color_for(value: f64, ranges: &RangeTable, max: f64) -> Option<&str> {
    ranges.color_for(value, max)
}
