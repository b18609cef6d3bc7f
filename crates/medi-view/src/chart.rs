//! Chart geometry.
//!
//! Pure functions from a label → count [`Distribution`] to pie segments and bar
//! lengths. Identical input always yields identical output.

use medi_core::payload::{Record, kind_of};
use serde::Serialize;

use crate::error::ViewError;

/// Cyclic segment palette.
pub const PALETTE: [&str; 5] = ["#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6"];

/// Ordered label → nonnegative count mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    entries: Vec<(String, f64)>,
}

impl Distribution {
    /// Build from label/count pairs in order. Negative, NaN and infinite counts are dropped.
    pub fn new<L: Into<String>>(entries: impl IntoIterator<Item = (L, f64)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|(_, count)| count.is_finite() && *count >= 0.0)
                .map(|(label, count)| (label.into(), count))
                .collect(),
        }
    }

    /// Build from a summary mapping, keeping insertion order.
    ///
    /// Entries whose value is not a nonnegative number are skipped.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let entries = record.iter().filter_map(|(label, value)| match value.as_f64() {
            Some(count) if count.is_finite() && count >= 0.0 => Some((label.clone(), count)),
            _ => {
                tracing::debug!(label, kind = kind_of(value), "skipping non-count distribution entry");
                None
            }
        });
        Self {
            entries: entries.collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(label, count)| (label.as_str(), *count))
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Largest count, `0.0` when empty.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.entries.iter().map(|(_, count)| *count).fold(0.0, f64::max)
    }
}

/// One arc of a pie chart, in fractions of a full turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSegment {
    pub label: String,
    pub count: f64,
    pub start_fraction: f64,
    pub sweep_fraction: f64,
    pub color_index: usize,
}

impl PieSegment {
    /// Display percentage, rounded half-up. Percentages of a chart need not sum to 100.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u32 {
        (self.sweep_fraction * 100.0).round() as u32
    }

    #[must_use]
    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index % PALETTE.len()]
    }
}

/// One bar, with its length relative to the longest bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub label: String,
    pub count: f64,
    pub length_fraction: f64,
}

/// Pie arcs in insertion order; each start is the sum of the sweeps before it.
///
/// # Errors
///
/// Returns [`ViewError::EmptyDistribution`] when the counts sum to zero.
pub fn pie_segments(distribution: &Distribution) -> Result<Vec<PieSegment>, ViewError> {
    let total = distribution.total();
    if total <= 0.0 {
        return Err(ViewError::EmptyDistribution);
    }

    let mut start = 0.0;
    Ok(distribution
        .iter()
        .enumerate()
        .map(|(position, (label, count))| {
            let sweep = count / total;
            let segment = PieSegment {
                label: label.to_string(),
                count,
                start_fraction: start,
                sweep_fraction: sweep,
                color_index: position % PALETTE.len(),
            };
            start += sweep;
            segment
        })
        .collect())
}

/// Bar lengths in insertion order, scaled so the largest count is `1.0`.
///
/// # Errors
///
/// Returns [`ViewError::EmptyDistribution`] when the largest count is zero.
pub fn bar_lengths(distribution: &Distribution) -> Result<Vec<BarSegment>, ViewError> {
    let max = distribution.max();
    if max <= 0.0 {
        return Err(ViewError::EmptyDistribution);
    }

    Ok(distribution
        .iter()
        .map(|(label, count)| BarSegment {
            label: label.to_string(),
            count,
            length_fraction: count / max,
        })
        .collect())
}
