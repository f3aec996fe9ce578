//! Transient add-record form state.
//!
//! # Invariants
//! - `hours` holds NaN when the raw input did not parse as a number.
//! - A reset form has an empty title, zero hours and no error message.

/// Form input owned by the record list view-model.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub title: String,
    pub hours: f64,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            title: String::new(),
            hours: 0.0,
            error_message: None,
        }
    }
}

impl FormState {
    /// Clears inputs and error message after a successful add.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns whether both input fields hold their reset values.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.hours == 0.0
    }
}

/// Parses raw hours text the way a numeric input field does.
///
/// Blank input reads as `0`; anything unparsable reads as NaN so that
/// validation, not parsing, decides what is acceptable.
pub fn parse_hours_input(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::{parse_hours_input, FormState};

    #[test]
    fn parse_hours_input_follows_numeric_field_rules() {
        assert_eq!(parse_hours_input(""), 0.0);
        assert_eq!(parse_hours_input("  "), 0.0);
        assert_eq!(parse_hours_input(" 2.5 "), 2.5);
        assert_eq!(parse_hours_input("-1"), -1.0);
        assert!(parse_hours_input("two").is_nan());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = FormState {
            title: "Math".to_string(),
            hours: 2.0,
            error_message: Some("boom".to_string()),
        };
        form.reset();
        assert_eq!(form, FormState::default());
        assert!(form.is_empty());
    }
}
