//! # medi-view
//!
//! Turns a [`PatientResultPayload`](medi_core::PatientResultPayload) into one of four
//! render models and derives chart geometry.
//!
//! - [`project`] / [`project_body`]: view projection with per-view empty states
//! - [`chart`]: pure pie and bar geometry over a [`Distribution`]
//!
//! Nothing here fails on payload shape. Missing or degenerate substructures become
//! [`RenderModel::Empty`] for the affected view only.

pub mod chart;

mod aggregate;
mod error;

pub use aggregate::{
    BarChartModel, CardValue, Column, EmptyState, Entry, PieChartModel, RankedList, RenderModel,
    StatCard, StatisticsModel, TableModel, cell_text, humanize_key, project, project_body,
};
pub use chart::{BarSegment, Distribution, PALETTE, PieSegment, bar_lengths, pie_segments};
pub use error::ViewError;
