//! Terminal rendering of view models, generations and suggestions.

use std::fmt::Write as _;

use medi_core::{Generation, GenerationStatus, ViewKind};
use medi_suggest::SuggestionState;
use medi_view::{
    BarChartModel, CardValue, PieChartModel, RenderModel, StatisticsModel, TableModel,
    project_body,
};

use super::table::{TableOptions, display_width, render_entity_table};

pub const PENDING_MESSAGE: &str = "Generating response...";

/// Fill characters for pie strips when color is off, one per palette slot.
const PLAIN_FILLS: [char; 5] = ['█', '▓', '▒', '░', '▪'];

#[derive(Clone, Copy, Debug)]
pub struct ViewOptions {
    pub table: TableOptions,
    pub bar_width: usize,
}

impl ViewOptions {
    const fn color(&self) -> bool {
        self.table.color
    }
}

#[must_use]
pub fn render_model(model: &RenderModel, options: ViewOptions) -> String {
    match model {
        RenderModel::Table(table) => render_patient_table(table, options),
        RenderModel::Statistics(stats) => render_statistics(stats),
        RenderModel::PieChart(pie) => render_pie(pie, options),
        RenderModel::BarChart(bars) => render_bars(bars, options),
        RenderModel::Empty(empty) => empty.message.clone(),
    }
}

fn render_patient_table(table: &TableModel, options: ViewOptions) -> String {
    let headers = table.columns.iter().map(|c| c.title.as_str()).collect::<Vec<_>>();
    render_entity_table(&headers, &table.rows, options.table)
}

fn render_statistics(stats: &StatisticsModel) -> String {
    let mut out = String::new();
    for card in stats.query.iter().chain(&stats.cards) {
        match &card.value {
            CardValue::Scalar(value) => {
                let _ = writeln!(out, "{}: {value}", card.title);
            }
            CardValue::Entries(entries) => {
                let _ = writeln!(out, "{}", card.title);
                for entry in entries {
                    let _ = writeln!(out, "  {}: {}", entry.label, entry.value);
                }
            }
        }
    }

    if !stats.locations.is_empty() {
        out.push_str("Location Distribution\n");
        for list in &stats.locations {
            let _ = writeln!(out, "  {}", list.title);
            let width = list
                .entries
                .iter()
                .map(|(label, _)| display_width(label))
                .max()
                .unwrap_or(0);
            for (label, count) in &list.entries {
                let pad = width - display_width(label);
                let _ = writeln!(out, "    {label}{}  {count}", " ".repeat(pad));
            }
        }
    }

    out.trim_end().to_string()
}

#[allow(clippy::cast_precision_loss)]
fn render_pie(pie: &PieChartModel, options: ViewOptions) -> String {
    let width = options.bar_width;
    let strip: String = (0..width)
        .map(|cell| {
            let position = (cell as f64 + 0.5) / width as f64;
            pie.segments
                .iter()
                .rev()
                .find(|segment| segment.start_fraction <= position)
                .map_or_else(|| " ".to_string(), |segment| fill(segment.color_index, segment.color(), options))
        })
        .collect();

    let mut out = format!("{} (total {})\n[{strip}]\n", pie.title, pie.total);
    for segment in &pie.segments {
        let _ = writeln!(
            out,
            "{} {}: {} ({}%)",
            fill(segment.color_index, segment.color(), options),
            segment.label,
            segment.count,
            segment.percent()
        );
    }
    out.trim_end().to_string()
}

fn fill(color_index: usize, hex: &str, options: ViewOptions) -> String {
    if options.color()
        && let Some((r, g, b)) = parse_hex(hex)
    {
        return format!("\u{1b}[38;2;{r};{g};{b}m█\u{1b}[0m");
    }
    PLAIN_FILLS[color_index % PLAIN_FILLS.len()].to_string()
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn render_bars(chart: &BarChartModel, options: ViewOptions) -> String {
    let label_width = chart
        .bars
        .iter()
        .map(|bar| display_width(&bar.label))
        .max()
        .unwrap_or(0);

    let mut out = format!("{}\n", chart.title);
    for bar in &chart.bars {
        let cells = (bar.length_fraction * options.bar_width as f64).round() as usize;
        let pad = label_width - display_width(&bar.label);
        let body = "█".repeat(cells);
        let body = if options.color() {
            format!("\u{1b}[34m{body}\u{1b}[0m")
        } else {
            body
        };
        let _ = writeln!(out, "{}{} {body} {}", bar.label, " ".repeat(pad), bar.count);
    }
    out.trim_end().to_string()
}

/// One conversation entry: timestamp, prompt, then the outcome.
#[must_use]
pub fn render_generation(generation: &Generation, views: &[ViewKind], options: ViewOptions) -> String {
    let time = generation
        .created_at
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S");
    let mut out = format!("[{time}] {} > {}\n", generation.id, generation.prompt);

    match generation.status() {
        GenerationStatus::Pending => {
            let _ = writeln!(out, "  {PENDING_MESSAGE}");
        }
        GenerationStatus::Error => {
            let message = generation.error_message().unwrap_or("Failed to generate response");
            let _ = writeln!(out, "  error: {message}");
        }
        GenerationStatus::Success => {
            if let Some(body) = generation.response() {
                for view in views {
                    let _ = writeln!(out, "── {} ──", view.title());
                    let _ = writeln!(out, "{}", render_model(&project_body(body, *view), options));
                }
            }
        }
    }
    out.trim_end().to_string()
}

/// Compact list of every generation in submission order.
#[must_use]
pub fn render_history(generations: &[Generation], options: TableOptions) -> String {
    if generations.is_empty() {
        return String::from("(no generations yet)");
    }
    let rows = generations
        .iter()
        .map(|generation| {
            vec![
                generation.id.to_string(),
                generation
                    .created_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string(),
                generation.status().to_string(),
                generation.prompt.clone(),
            ]
        })
        .collect::<Vec<_>>();
    render_entity_table(&["Id", "Time", "Status", "Prompt"], &rows, options)
}

/// The suggestion dropdown, numbered from 1, with the selection marked.
#[must_use]
pub fn render_suggestions(state: &SuggestionState) -> String {
    if !state.visible {
        return String::new();
    }
    let mut out = String::new();
    for (index, phrase) in state.matches.iter().enumerate() {
        let marker = if state.selected == Some(index) { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {}. {phrase}", index + 1);
    }
    let _ = write!(out, "({} suggestions)", state.matches.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use medi_core::{GenerationId, PatientResultPayload, ResponseBody};
    use medi_view::project;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PLAIN: ViewOptions = ViewOptions {
        table: TableOptions {
            max_width: None,
            color: false,
        },
        bar_width: 8,
    };

    fn payload() -> PatientResultPayload {
        PatientResultPayload::from_value(json!({
            "summary": {
                "total_patients": 4,
                "gender_distribution": {"male": 3, "female": 1},
                "age_distribution": {"18-30": 1, "31-50": 4},
                "locations": {"cities": {"Cairo": 1, "Dubai": 3}}
            },
            "patients": [{"full_name": "Ali", "age": 40}]
        }))
        .unwrap()
    }

    #[test]
    fn pie_legend_shows_counts_and_percentages() {
        let text = render_model(&project(&payload(), ViewKind::GenderChart), PLAIN);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Gender Distribution (total 4)");
        assert_eq!(lines[1], "[██████▓▓]");
        assert_eq!(lines[2], "█ male: 3 (75%)");
        assert_eq!(lines[3], "▓ female: 1 (25%)");
    }

    #[test]
    fn bars_scale_to_width() {
        let text = render_model(&project(&payload(), ViewKind::AgeChart), PLAIN);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Age Group Distribution");
        assert_eq!(lines[1], "18-30 ██ 1");
        assert_eq!(lines[2], "31-50 ████████ 4");
    }

    #[test]
    fn statistics_rank_cities() {
        let text = render_model(&project(&payload(), ViewKind::Statistics), PLAIN);
        assert!(text.starts_with("Total patients: 4"));
        assert!(text.contains("  male: 3"));
        let dubai = text.find("Dubai").unwrap();
        let cairo = text.find("Cairo").unwrap();
        assert!(dubai < cairo);
    }

    #[test]
    fn table_uses_humanized_titles() {
        let text = render_model(&project(&payload(), ViewKind::Table), PLAIN);
        assert!(text.lines().next().unwrap().starts_with("Full name"));
    }

    #[test]
    fn generation_states_render() {
        let mut generation = Generation::pending(GenerationId::new(1), "Find all patients", Utc::now());
        assert!(render_generation(&generation, &[ViewKind::Table], PLAIN).ends_with(PENDING_MESSAGE));

        generation.resolve_error("API Error: 500 Internal Server Error").unwrap();
        assert!(
            render_generation(&generation, &[ViewKind::Table], PLAIN)
                .ends_with("error: API Error: 500 Internal Server Error")
        );
    }

    #[test]
    fn malformed_success_renders_no_data() {
        let mut generation = Generation::pending(GenerationId::new(2), "q", Utc::now());
        generation
            .resolve_success(ResponseBody::from_response(Some("oops")))
            .unwrap();
        let text = render_generation(&generation, &[ViewKind::Table], PLAIN);
        assert!(text.contains("── Patient Table ──"));
        assert!(text.ends_with("No data available"));
    }

    #[test]
    fn suggestions_mark_selection() {
        let state = SuggestionState {
            query: "all patients".into(),
            matches: vec!["Find all patients".into(), "Get all patients".into()],
            selected: Some(1),
            open: true,
            visible: true,
        };
        assert_eq!(
            render_suggestions(&state),
            "  1. Find all patients\n> 2. Get all patients\n(2 suggestions)"
        );
    }

    #[test]
    fn hidden_suggestions_render_nothing() {
        let state = SuggestionState {
            matches: vec!["Find patients with diabetes".into()],
            open: true,
            ..SuggestionState::default()
        };
        assert_eq!(render_suggestions(&state), "");
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex("#3B82F6"), Some((0x3B, 0x82, 0xF6)));
        assert_eq!(parse_hex("3B82F6"), None);
    }
}
