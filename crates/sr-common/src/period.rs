//! Reporting period.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The time window a report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// Display label, e.g. "October 2026".
    pub label: String,
    /// First day covered (inclusive).
    pub start_date: NaiveDate,
    /// Last day covered (inclusive).
    pub end_date: NaiveDate,
}

impl ReportPeriod {
    /// Create a new period.
    pub fn new(label: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            label: label.into(),
            start_date,
            end_date,
        }
    }

    /// Check that the period does not end before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(Error::InvalidPeriod {
                label: self.label.clone(),
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Date range as shown on the cover page.
    pub fn range_formatted(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }

    /// Label reduced to lowercase ASCII words joined by dashes.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.label.len());
        for c in self.label.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.is_empty() {
            slug.push_str("period");
        }
        slug
    }

    /// Suggested filename for a document covering this period.
    pub fn filename(&self, prefix: &str, extension: &str) -> String {
        format!(
            "{}_{}_{}_{}.{}",
            prefix,
            self.slug(),
            self.start_date.format("%Y%m%d"),
            self.end_date.format("%Y%m%d"),
            extension
        )
    }
}
