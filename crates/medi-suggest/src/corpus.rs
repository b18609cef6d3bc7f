//! Built-in prompt phrases offered by autocomplete, grouped by intent.
//!
//! Bracketed phrases are templates the user completes after committing.

pub const GENERAL: &[&str] = &[
    "Find all patients",
    "Show me all patients",
    "List all patients in the system",
    "Get all patients",
    "Fetch all patients",
    "Retrieve all patient records",
    "Pull up all patients",
    "Search for all patients",
    "Look up every patient",
];

pub const CONDITION: &[&str] = &[
    "Find patients with diabetes",
    "Show me patients with hypertension",
    "List patients with asthma",
    "Get patients who have heart disease",
    "Fetch patients with breast cancer",
    "Retrieve patients with chronic kidney disease",
    "Pull up patients with anxiety",
    "Search for patients with anemia",
    "Look up patients with depression",
    "Give me patients with obesity",
];

pub const AGE: &[&str] = &[
    "Find patients aged 65",
    "Show me patients over 60",
    "Get all patients under 18",
    "List patients between 30 and 40 years old",
    "Fetch patients older than 80",
];

pub const GENDER: &[&str] = &[
    "Find male patients",
    "Show me female patients",
    "Get patients recorded as non-binary",
    "List patients with unknown gender",
    "Pull up male and female patients",
];

pub const LOCATION: &[&str] = &[
    "Find patients in Dubai",
    "Show me patients located in Cairo",
    "Get patients in city: [City Name]",
    "Fetch patients registered at [Facility Name]",
];

pub const IDENTIFIER: &[&str] = &[
    "Find patient with identifier 12345",
    "Show me patient with MRN 67890",
    "Get patient with national ID 987654321",
    "Look up patient with phone number +1234567890",
    "Search for patient with email john@example.com",
];

pub const MISSING_DATA: &[&str] = &[
    "Find patients with no recorded birthdate",
    "Get patients with missing phone numbers",
    "Show me patients with unknown gender",
];

pub const TEMPLATES: &[&str] = &[
    "Find patients with condition: [CONDITION]",
    "Get patients born before [YYYY-MM-DD]",
    "Search for patients in [CITY]",
    "Pull up patient with identifier: [IDENTIFIER]",
];

/// Every group, in display order.
pub const GROUPS: &[&[&str]] = &[
    GENERAL,
    CONDITION,
    AGE,
    GENDER,
    LOCATION,
    IDENTIFIER,
    MISSING_DATA,
    TEMPLATES,
];

/// Flattened corpus in display order.
pub fn phrases() -> impl Iterator<Item = &'static str> {
    GROUPS.iter().flat_map(|group| group.iter().copied())
}

/// Starter prompts offered while the conversation is empty.
pub const QUICK_PROMPTS: &[(&str, &str)] = &[
    ("Find Patients", "Find all patients with diabetes who are males"),
    (
        "Create New Entries",
        "Create a new patient entry for a 45-year-old male named John Doe",
    ),
    ("Search for Insights", "Show me patients over 60 with hypertension"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_has_no_duplicates() {
        let all: Vec<&str> = phrases().collect();
        let mut deduped = all.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(all.len(), deduped.len());
    }

    #[test]
    fn corpus_starts_with_general_group() {
        assert_eq!(phrases().next(), Some("Find all patients"));
        assert_eq!(phrases().count(), 45);
    }
}
