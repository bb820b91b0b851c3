//! Keyword-based sport-category detection.
//!
//! The club hosts both handball and floorball content in the same knowledge
//! base; tagging the question with its sport keeps retrieval from mixing the
//! two schedules. This is a plain substring match, kept free of any network
//! coupling so it can be tested on its own.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SportCategory {
    Handball,
    Floorball,
}

impl fmt::Display for SportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SportCategory::Handball => write!(f, "Handball"),
            SportCategory::Floorball => write!(f, "Floorball"),
        }
    }
}

/// Classify a free-text message by sport, or `None` when no keyword matches.
pub fn detect_category(message: &str) -> Option<SportCategory> {
    let lower = message.to_lowercase();
    if lower.contains("handball") {
        Some(SportCategory::Handball)
    } else if lower.contains("floorball") || lower.contains("unihockey") {
        Some(SportCategory::Floorball)
    } else {
        None
    }
}

/// Prefix the message with a category tag to bias document retrieval.
/// Messages without a detected category pass through unchanged.
pub fn tag_message(category: Option<SportCategory>, message: &str) -> String {
    match category {
        Some(category) => format!("[Sportart: {}] {}", category, message),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_handball() {
        assert_eq!(
            detect_category("Wann ist das nächste Handballspiel?"),
            Some(SportCategory::Handball)
        );
    }

    #[test]
    fn test_detects_floorball_case_insensitive() {
        assert_eq!(
            detect_category("Gibt es FLOORBALL-Training am Montag?"),
            Some(SportCategory::Floorball)
        );
        assert_eq!(
            detect_category("Was ist Unihockey?"),
            Some(SportCategory::Floorball)
        );
    }

    #[test]
    fn test_no_category_for_general_questions() {
        assert_eq!(detect_category("Wie werde ich Mitglied?"), None);
    }

    #[test]
    fn test_tag_message_prefixes_category() {
        let tagged = tag_message(Some(SportCategory::Handball), "Wann ist Training?");
        assert_eq!(tagged, "[Sportart: Handball] Wann ist Training?");
    }

    #[test]
    fn test_tag_message_without_category_is_identity() {
        assert_eq!(tag_message(None, "Hallo!"), "Hallo!");
    }
}
