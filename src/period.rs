use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

/// A calendar month in `YYYY-MM` form.
///
/// The inner string is always valid, so lexicographic ordering is also
/// chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(String);

impl Month {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Month {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !well_formed {
            return Err(ReportError::validation(format!(
                "month must look like YYYY-MM, got {:?}",
                s
            )));
        }

        let month_num: u32 = s[5..].parse().unwrap_or(0);
        if !(1..=12).contains(&month_num) {
            return Err(ReportError::validation(format!("month out of range in {:?}", s)));
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims() {
        let month: Month = " 2026-01 ".parse().unwrap();
        assert_eq!(month.as_str(), "2026-01");
    }

    #[test]
    fn rejects_malformed_months() {
        for bad in ["", "2026", "2026-1", "2026/01", "26-01-01", "2026-13", "2026-00", "abcd-ef"] {
            assert!(bad.parse::<Month>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn orders_chronologically() {
        let earlier: Month = "2025-12".parse().unwrap();
        let later: Month = "2026-01".parse().unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<Month>("\"2026-02\"").is_ok());
        assert!(serde_json::from_str::<Month>("\"February\"").is_err());
    }
}
