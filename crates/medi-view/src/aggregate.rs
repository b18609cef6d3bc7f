//! View projection of a result payload.
//!
//! Table columns are derived from the first patient record's key set at render time;
//! later records are laid out against those columns and any key they lack renders
//! as an empty cell.

use medi_core::payload::{
    AGE_DISTRIBUTION_KEY, CITIES_KEY, GENDER_DISTRIBUTION_KEY, LOCATIONS_KEY, Record, STATES_KEY,
};
use medi_core::{PatientResultPayload, ResponseBody, ViewKind};
use serde::Serialize;
use serde_json::Value;

use crate::chart::{self, BarSegment, Distribution, PieSegment};

pub const NO_DATA: &str = "No data available";
pub const NO_PATIENTS: &str = "No patient data available";
pub const NO_SUMMARY: &str = "No summary data available";
pub const NO_GENDER_DATA: &str = "No gender data available";
pub const NO_AGE_DATA: &str = "No age group data available";

/// A renderable projection of one payload for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderModel {
    Table(TableModel),
    Statistics(StatisticsModel),
    PieChart(PieChartModel),
    BarChart(BarChartModel),
    /// Nothing to show for this view. Not an error.
    Empty(EmptyState),
}

impl RenderModel {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub view: ViewKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableModel {
    pub columns: Vec<Column>,
    /// One cell per column, in column order.
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CardValue {
    Scalar(String),
    /// A nested mapping, in insertion order.
    Entries(Vec<Entry>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub key: String,
    pub title: String,
    pub value: CardValue,
}

/// A location mapping ranked by descending count; ties keep encounter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedList {
    pub key: String,
    pub title: String,
    pub entries: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsModel {
    /// Search parameters echoed by the backend, when present.
    pub query: Option<StatCard>,
    pub cards: Vec<StatCard>,
    pub locations: Vec<RankedList>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChartModel {
    pub title: String,
    pub total: f64,
    pub segments: Vec<PieSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartModel {
    pub title: String,
    pub bars: Vec<BarSegment>,
}

/// Project a generation's response body.
///
/// An undecodable body renders the generic empty state in every view.
#[must_use]
pub fn project_body(body: &ResponseBody, view: ViewKind) -> RenderModel {
    match body {
        ResponseBody::Payload(payload) => project(payload, view),
        ResponseBody::Malformed { .. } => empty(view, NO_DATA),
    }
}

/// Project a payload into one view. Never fails; missing data yields an empty state.
#[must_use]
pub fn project(payload: &PatientResultPayload, view: ViewKind) -> RenderModel {
    match view {
        ViewKind::Table => table(payload),
        ViewKind::Statistics => statistics(payload),
        ViewKind::GenderChart => gender_chart(payload),
        ViewKind::AgeChart => age_chart(payload),
    }
}

fn empty(view: ViewKind, message: &str) -> RenderModel {
    RenderModel::Empty(EmptyState {
        view,
        message: message.to_string(),
    })
}

fn table(payload: &PatientResultPayload) -> RenderModel {
    let patients = payload.patients();
    let Some(first) = patients.first() else {
        return empty(ViewKind::Table, NO_PATIENTS);
    };

    let columns: Vec<Column> = first
        .keys()
        .map(|key| Column {
            key: key.clone(),
            title: humanize_key(key),
        })
        .collect();

    let rows = patients
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.get(&column.key).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    RenderModel::Table(TableModel { columns, rows })
}

fn statistics(payload: &PatientResultPayload) -> RenderModel {
    let query = payload
        .query
        .as_ref()
        .filter(|params| !params.is_empty())
        .map(|params| StatCard {
            key: "query".to_string(),
            title: "Query".to_string(),
            value: CardValue::Entries(entries(params)),
        });

    let Some(summary) = payload.summary.as_ref() else {
        return empty(ViewKind::Statistics, NO_SUMMARY);
    };

    let cards: Vec<StatCard> = summary
        .iter()
        .filter(|(key, _)| key.as_str() != LOCATIONS_KEY)
        .map(|(key, value)| StatCard {
            key: key.clone(),
            title: humanize_key(key),
            value: match value {
                Value::Object(nested) => CardValue::Entries(entries(nested)),
                scalar => CardValue::Scalar(cell_text(scalar)),
            },
        })
        .collect();

    let locations: Vec<RankedList> = [(CITIES_KEY, "Cities"), (STATES_KEY, "States")]
        .into_iter()
        .filter_map(|(key, title)| {
            payload.location_map(key).map(|mapping| RankedList {
                key: key.to_string(),
                title: title.to_string(),
                entries: ranked(mapping),
            })
        })
        .collect();

    if cards.is_empty() && locations.is_empty() {
        return empty(ViewKind::Statistics, NO_SUMMARY);
    }

    RenderModel::Statistics(StatisticsModel {
        query,
        cards,
        locations,
    })
}

fn gender_chart(payload: &PatientResultPayload) -> RenderModel {
    let Some(distribution) = payload.gender_distribution().map(Distribution::from_record) else {
        return empty(ViewKind::GenderChart, NO_GENDER_DATA);
    };
    match chart::pie_segments(&distribution) {
        Ok(segments) => RenderModel::PieChart(PieChartModel {
            title: "Gender Distribution".to_string(),
            total: distribution.total(),
            segments,
        }),
        Err(error) => {
            tracing::debug!(%error, "gender chart has nothing to draw");
            empty(ViewKind::GenderChart, NO_GENDER_DATA)
        }
    }
}

fn age_chart(payload: &PatientResultPayload) -> RenderModel {
    let Some(distribution) = payload.age_distribution().map(Distribution::from_record) else {
        return empty(ViewKind::AgeChart, NO_AGE_DATA);
    };
    match chart::bar_lengths(&distribution) {
        Ok(bars) => RenderModel::BarChart(BarChartModel {
            title: "Age Group Distribution".to_string(),
            bars,
        }),
        Err(error) => {
            tracing::debug!(%error, "age chart has nothing to draw");
            empty(ViewKind::AgeChart, NO_AGE_DATA)
        }
    }
}

fn entries(mapping: &Record) -> Vec<Entry> {
    mapping
        .iter()
        .map(|(label, value)| Entry {
            label: label.clone(),
            value: cell_text(value),
        })
        .collect()
}

fn ranked(mapping: &Record) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = mapping
        .iter()
        .filter_map(|(label, value)| value.as_f64().map(|count| (label.clone(), count)))
        .collect();
    // `sort_by` is stable, so equal counts keep their encounter order.
    entries.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    entries
}

/// Flat text for one field value.
///
/// Strings render verbatim, `null` as empty, arrays and objects as compact JSON.
#[must_use]
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// `age_group` → `Age group`.
#[must_use]
pub fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
