//! BYEASTER -- expand or limit candidate dates by their day offset from Easter Sunday.
//!
//! A yearly rule expands every candidate into one date per applicable offset
//! in the candidate's year. Any finer frequency keeps a candidate only when
//! its measured offset from that year's Easter Sunday is configured.
//!
//! Offsets outside `-366..=366` are reported to a [`DiagnosticSink`] and
//! skipped; offsets that fall outside a particular year are skipped silently.
//! A transform never fails.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, CandidateDate};
use crate::easter::{self, MAX_OFFSET_MAGNITUDE};
use crate::error::{EasterError, Result};
use crate::frequency::{Frequency, Mode};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A non-fatal condition met while transforming candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The configured offset exceeds the ±366 day bound.
    InvalidOffset { offset: i32 },
    /// Easter Sunday of the candidate's year is not representable; the
    /// candidate was dropped.
    EasterUnavailable { year: i32 },
    /// The candidate could not be moved to `date` (its zone has no instant
    /// to offer there, e.g. at the edge of the representable range).
    UnrepresentableDate { date: NaiveDate },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidOffset { offset } => {
                write!(f, "Invalid day relative to Easter Sunday: {}", offset)
            }
            Diagnostic::EasterUnavailable { year } => {
                write!(f, "Easter Sunday unavailable for year {}", year)
            }
            Diagnostic::UnrepresentableDate { date } => {
                write!(f, "Candidate cannot be moved to {}", date)
            }
        }
    }
}

/// Receiver for [`Diagnostic`]s. Reporting never alters control flow.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: every diagnostic becomes a `TRACE` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::trace!(target: "easter_engine::rule", "{}", diagnostic);
    }
}

/// The BYEASTER part of a recurrence rule: a set of day offsets relative to
/// Easter Sunday, applied according to the rule's frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRule")]
pub struct EasterOffsetRule {
    offsets: Vec<i32>,
    frequency: Frequency,
}

#[derive(Deserialize)]
struct RawRule {
    offsets: Vec<i32>,
    frequency: Frequency,
}

impl From<RawRule> for EasterOffsetRule {
    fn from(raw: RawRule) -> Self {
        EasterOffsetRule::new(raw.offsets, raw.frequency)
    }
}

impl EasterOffsetRule {
    /// Build a rule. Duplicate offsets are dropped; the first occurrence
    /// fixes the expansion order.
    pub fn new(offsets: impl IntoIterator<Item = i32>, frequency: Frequency) -> Self {
        let mut unique = Vec::new();
        for offset in offsets {
            if !unique.contains(&offset) {
                unique.push(offset);
            }
        }
        EasterOffsetRule {
            offsets: unique,
            frequency,
        }
    }

    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// A rule without offsets leaves every candidate set untouched.
    pub fn is_active(&self) -> bool {
        !self.offsets.is_empty()
    }

    /// Apply the rule, reporting diagnostics as `tracing` events.
    pub fn transform<T: CandidateDate>(&self, dates: Vec<T>) -> Vec<T> {
        self.transform_with(dates, &TracingSink)
    }

    /// Apply the rule, reporting diagnostics to `sink`.
    ///
    /// Expansion appends results per candidate in offset order; limiting keeps
    /// the input order. No de-duplication is performed.
    pub fn transform_with<T: CandidateDate>(
        &self,
        dates: Vec<T>,
        sink: &dyn DiagnosticSink,
    ) -> Vec<T> {
        if !self.is_active() {
            return dates;
        }

        let mut anchors = EasterAnchors::default();
        let mut result = Vec::new();

        for candidate in dates {
            let year = candidate.date().year();
            let easter_day = match anchors.day_of_year(year) {
                Some(day) => day,
                None => {
                    sink.report(Diagnostic::EasterUnavailable { year });
                    continue;
                }
            };

            match self.frequency.mode() {
                Mode::Expand => self.expand(&candidate, year, easter_day, sink, &mut result),
                Mode::Limit => {
                    if self.matches(&candidate, easter_day) {
                        result.push(candidate);
                    }
                }
            }
        }

        result
    }

    /// Apply the rule to ISO strings and format the result in their precision.
    ///
    /// The list is read as `YYYY-MM-DDTHH:MM:SS` date-times if any entry
    /// contains a `T`, otherwise as `YYYY-MM-DD` dates.
    ///
    /// # Errors
    /// Returns `EasterError::InvalidDateTime` for the first entry that does not
    /// parse in the chosen precision.
    pub fn transform_iso<S: AsRef<str>>(&self, dates: &[S]) -> Result<Vec<String>> {
        if dates.iter().any(|d| d.as_ref().contains('T')) {
            let parsed = dates
                .iter()
                .map(|d| {
                    parse_iso(d.as_ref(), ISO_DATETIME_FORMAT, NaiveDateTime::parse_from_str)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(self
                .transform(parsed)
                .iter()
                .map(|d| d.format(ISO_DATETIME_FORMAT).to_string())
                .collect())
        } else {
            let parsed = dates
                .iter()
                .map(|d| parse_iso(d.as_ref(), ISO_DATE_FORMAT, NaiveDate::parse_from_str))
                .collect::<Result<Vec<_>>>()?;
            Ok(self
                .transform(parsed)
                .iter()
                .map(|d| d.format(ISO_DATE_FORMAT).to_string())
                .collect())
        }
    }

    fn expand<T: CandidateDate>(
        &self,
        candidate: &T,
        year: i32,
        easter_day: i64,
        sink: &dyn DiagnosticSink,
        out: &mut Vec<T>,
    ) {
        // Offsets landing on Jan 1 .. Dec 31 of this year.
        let min_offset = 1 - easter_day;
        let max_offset = calendar::days_in_year(year) - easter_day;

        for &offset in &self.offsets {
            if !(-MAX_OFFSET_MAGNITUDE..=MAX_OFFSET_MAGNITUDE).contains(&offset) {
                sink.report(Diagnostic::InvalidOffset { offset });
                continue;
            }

            let offset = i64::from(offset);
            if offset < min_offset || offset > max_offset {
                continue;
            }

            let Some(date) = calendar::from_day_of_year(year, easter_day + offset) else {
                continue;
            };
            match candidate.with_date(date) {
                Some(value) => out.push(value),
                None => sink.report(Diagnostic::UnrepresentableDate { date }),
            }
        }
    }

    fn matches<T: CandidateDate>(&self, candidate: &T, easter_day: i64) -> bool {
        let actual = i64::from(candidate.date().ordinal()) - easter_day;
        i32::try_from(actual).is_ok_and(|offset| self.offsets.contains(&offset))
    }
}

fn parse_iso<T>(
    value: &str,
    format: &str,
    parse: fn(&str, &str) -> chrono::ParseResult<T>,
) -> Result<T> {
    parse(value, format)
        .map_err(|e| EasterError::InvalidDateTime(format!("'{}': {}", value, e)))
}

/// Easter Sunday day-of-year per year, computed once per transform call.
#[derive(Default)]
struct EasterAnchors {
    by_year: HashMap<i32, Option<i64>>,
}

impl EasterAnchors {
    fn day_of_year(&mut self, year: i32) -> Option<i64> {
        *self.by_year.entry(year).or_insert_with(|| {
            easter::easter_sunday(year)
                .ok()
                .and_then(|easter| calendar::day_of_year_in(easter, year))
        })
    }
}
