//! # easter-engine
//!
//! Easter Sunday computus and the BYEASTER recurrence extension.
//!
//! Easter Sunday is computed with the Julian algorithm up to and including
//! 1583 and with the Gregorian algorithm afterwards. The date is then used as
//! an anchor for recurrence rules: `BYEASTER=-2,0,1` expands a yearly rule to
//! Good Friday, Easter Sunday and Easter Monday, or limits a finer-grained
//! rule to those days.
//!
//! ## Modules
//!
//! - [`easter`] — year → Easter Sunday (Julian / Gregorian computus)
//! - [`calendar`] — ordinal-day arithmetic and the [`CandidateDate`] abstraction
//! - [`frequency`] — recurrence frequency and its expand/limit mode
//! - [`rule`] — [`EasterOffsetRule`], the BYEASTER transform
//! - [`expander`] — RRULE string (with optional BYEASTER) → concrete instances
//! - [`error`] — Error types

pub mod calendar;
pub mod easter;
pub mod error;
pub mod expander;
pub mod frequency;
pub mod rule;

pub use calendar::CandidateDate;
pub use easter::{easter_sunday, valid_offset_range, Computus};
pub use error::EasterError;
pub use expander::{expand_rrule, ExpandedEvent};
pub use frequency::{Frequency, Mode};
pub use rule::{Diagnostic, DiagnosticSink, EasterOffsetRule, TracingSink};
