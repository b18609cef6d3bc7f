//! General application configuration.

use medi_core::ViewKind;
use serde::{Deserialize, Serialize};

const fn default_view() -> ViewKind {
    ViewKind::Table
}

/// Default width of a full-length bar, in columns.
const fn default_bar_width() -> usize {
    40
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// View shown for a fresh result.
    #[serde(default = "default_view")]
    pub default_view: ViewKind,

    /// Column width of the longest bar in chart views.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_view: default_view(),
            bar_width: default_bar_width(),
        }
    }
}
