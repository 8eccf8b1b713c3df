pub mod attendance;
pub mod classes;
pub mod notices;
pub mod seed;
pub mod students;
pub mod subjects;
pub mod teachers;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::listing::FieldValue;

pub(crate) fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn stamp(ts: Option<&DateTime<Utc>>) -> Option<FieldValue> {
    ts.map(FieldValue::timestamp)
}

pub(crate) fn optional_text(v: Option<&String>) -> Option<FieldValue> {
    v.filter(|s| !s.trim().is_empty()).map(FieldValue::text)
}

/// Share of `part` in `whole` as a percentage with one decimal.
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(percent(1, 3), 33.3);
        assert_eq!(percent(2, 3), 66.7);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(5, 5), 100.0);
    }

    #[test]
    fn blank_required_field_fails() {
        assert!(required("className", "   ").is_err());
        assert!(required("className", "Grade 2").is_ok());
    }
}
