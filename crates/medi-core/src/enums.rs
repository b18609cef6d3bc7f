//! Status enums and view kinds for MediFire.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! unless they mirror a CLI-facing name. Status enums with state machines provide
//! `allowed_next_states()` to enforce valid transitions at the store layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// GenerationStatus
// ---------------------------------------------------------------------------

/// Status of a generation through its request lifecycle.
///
/// ```text
/// pending → success
///         → error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Success,
    Error,
}

impl GenerationStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Success, Self::Error],
            Self::Success | Self::Error => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ViewKind
// ---------------------------------------------------------------------------

/// One of the four alternate presentations of a single payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Table,
    Statistics,
    GenderChart,
    AgeChart,
}

impl ViewKind {
    /// All views in sidebar order.
    pub const ALL: [Self; 4] = [
        Self::Table,
        Self::Statistics,
        Self::GenderChart,
        Self::AgeChart,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Statistics => "statistics",
            Self::GenderChart => "gender-chart",
            Self::AgeChart => "age-chart",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Table => "Patient Table",
            Self::Statistics => "Statistics",
            Self::GenderChart => "Gender Chart",
            Self::AgeChart => "Age Groups",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "statistics" | "stats" => Ok(Self::Statistics),
            "gender-chart" | "gender" => Ok(Self::GenderChart),
            "age-chart" | "age" => Ok(Self::AgeChart),
            other => Err(CoreError::Validation(format!("unknown view '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// SubmitPolicy
// ---------------------------------------------------------------------------

/// Gate applied to user-initiated submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// Reject a submission while any generation is still pending.
    #[default]
    SingleFlight,
    /// Accept submissions regardless of outstanding generations.
    Concurrent,
}

impl SubmitPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleFlight => "single_flight",
            Self::Concurrent => "concurrent",
        }
    }
}

impl fmt::Display for SubmitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_reach_both_terminals() {
        assert!(GenerationStatus::Pending.can_transition_to(GenerationStatus::Success));
        assert!(GenerationStatus::Pending.can_transition_to(GenerationStatus::Error));
        assert!(!GenerationStatus::Pending.can_transition_to(GenerationStatus::Pending));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for status in [GenerationStatus::Success, GenerationStatus::Error] {
            assert!(status.is_terminal());
            assert!(status.allowed_next_states().is_empty());
            assert!(!status.can_transition_to(GenerationStatus::Pending));
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&GenerationStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn view_kind_parses_aliases() {
        assert_eq!("stats".parse::<ViewKind>().unwrap(), ViewKind::Statistics);
        assert_eq!(" Gender ".parse::<ViewKind>().unwrap(), ViewKind::GenderChart);
        assert_eq!("age-chart".parse::<ViewKind>().unwrap(), ViewKind::AgeChart);
        assert!("pie".parse::<ViewKind>().is_err());
    }

    #[test]
    fn view_kind_display_roundtrips_through_parse() {
        for view in ViewKind::ALL {
            assert_eq!(view.to_string().parse::<ViewKind>().unwrap(), view);
        }
    }

    #[test]
    fn submit_policy_defaults_to_single_flight() {
        assert_eq!(SubmitPolicy::default(), SubmitPolicy::SingleFlight);
        let parsed: SubmitPolicy = serde_json::from_str("\"concurrent\"").unwrap();
        assert_eq!(parsed, SubmitPolicy::Concurrent);
    }
}
