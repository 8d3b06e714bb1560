//! RRULE expansion with BYEASTER support.
//!
//! The `rrule` crate (v0.13) does not know the BYEASTER extension, so the part
//! is split off first. The remaining rule is expanded by `rrule`, and the
//! resulting instants are passed through [`EasterOffsetRule`] before being
//! bounded, ordered and counted.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use rrule::RRuleSet;

use crate::error::{EasterError, Result};
use crate::frequency::{Frequency, Mode};
use crate::rule::EasterOffsetRule;

/// Instances returned when neither the caller nor the rule sets a COUNT.
const DEFAULT_MAX_INSTANCES: u16 = 500;

/// Base instances generated by `rrule` before the BYEASTER transform runs.
/// COUNT cannot be handed to `rrule` on this path because it counts
/// post-transform instances.
const RAW_EXPANSION_LIMIT: u16 = 5_000;

const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single expanded event instance with start and end times.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// An RRULE split into the part `rrule` understands and its BYEASTER part.
#[derive(Debug, Clone, PartialEq)]
pub struct EasterRuleParts {
    /// The rule without BYEASTER and COUNT.
    pub base: String,
    /// BYEASTER offsets with the rule's frequency; inactive when absent.
    pub rule: EasterOffsetRule,
    /// COUNT taken from the rule, if any.
    pub count: Option<u32>,
}

/// Split an RRULE string (e.g. `"FREQ=YEARLY;BYEASTER=-2,0"`) into its parts.
///
/// # Errors
/// Returns `EasterError::InvalidRule` if FREQ is missing or unknown, a part is
/// not `KEY=VALUE`, or a BYEASTER/COUNT value is not an integer.
pub fn parse_byeaster(rrule: &str) -> Result<EasterRuleParts> {
    let body = rrule.trim();
    let body = body
        .strip_prefix("RRULE:")
        .or_else(|| body.strip_prefix("rrule:"))
        .unwrap_or(body);

    let mut base = Vec::new();
    let mut offsets = Vec::new();
    let mut frequency = None;
    let mut count = None;

    for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| EasterError::InvalidRule(format!("malformed part '{}'", part)))?;

        match key.trim().to_ascii_uppercase().as_str() {
            "BYEASTER" => {
                for raw in value.split(',') {
                    let offset = raw.trim().parse::<i32>().map_err(|_| {
                        EasterError::InvalidRule(format!("invalid BYEASTER value '{}'", raw))
                    })?;
                    offsets.push(offset);
                }
            }
            "COUNT" => {
                let c = value.trim().parse::<u32>().map_err(|_| {
                    EasterError::InvalidRule(format!("invalid COUNT value '{}'", value))
                })?;
                count = Some(c);
            }
            "FREQ" => {
                frequency = Some(value.parse::<Frequency>()?);
                base.push(part);
            }
            _ => base.push(part),
        }
    }

    let frequency =
        frequency.ok_or_else(|| EasterError::InvalidRule("missing FREQ".to_string()))?;

    Ok(EasterRuleParts {
        base: base.join(";"),
        rule: EasterOffsetRule::new(offsets, frequency),
        count,
    })
}

/// Expand an RRULE string, optionally carrying BYEASTER, into concrete instances.
///
/// # Arguments
/// - `rrule` -- RFC 5545 RRULE string (e.g., "FREQ=YEARLY;BYEASTER=-2,0,1")
/// - `dtstart` -- Local datetime string (e.g., "2026-01-01T10:00:00")
/// - `duration_minutes` -- Duration of each instance in minutes
/// - `timezone` -- IANA timezone (e.g., "Europe/Budapest")
/// - `until` -- Optional end boundary for expansion (local datetime string)
/// - `count` -- Optional maximum number of instances (overrides COUNT in rrule)
///
/// With BYEASTER present, a YEARLY rule yields the offset days of every year
/// the base rule visits, and finer frequencies keep only base instances on
/// those days. Instances before `dtstart` or after `until` are dropped.
///
/// # Errors
/// Returns `EasterError::InvalidRule` if the RRULE string is empty or unparseable.
/// Returns `EasterError::InvalidTimezone` if the timezone is not a valid IANA identifier.
/// Returns `EasterError::InvalidDateTime` if `dtstart` or `until` is malformed.
pub fn expand_rrule(
    rrule: &str,
    dtstart: &str,
    duration_minutes: u32,
    timezone: &str,
    until: Option<&str>,
    count: Option<u32>,
) -> Result<Vec<ExpandedEvent>> {
    if rrule.trim().is_empty() {
        return Err(EasterError::InvalidRule("empty RRULE string".to_string()));
    }

    // Short-circuit: caller explicitly wants zero instances.
    if count == Some(0) {
        return Ok(Vec::new());
    }

    let _tz: chrono_tz::Tz = timezone
        .parse()
        .map_err(|_| EasterError::InvalidTimezone(timezone.to_string()))?;

    let start_local = parse_local(dtstart)?;
    let until_local = until.map(parse_local).transpose()?;

    let parts = parse_byeaster(rrule)?;
    let count = count.or(parts.count);
    let limit = count.map_or(usize::from(DEFAULT_MAX_INSTANCES), |c| c as usize);
    let duration = Duration::minutes(i64::from(duration_minutes));

    if !parts.rule.is_active() {
        let base = match count {
            Some(c) => format!("{};COUNT={}", parts.base, c),
            None => parts.base,
        };
        let rrule_set = build_rrule_set(&base, dtstart, timezone, until)?;
        let max_count = count.map_or(DEFAULT_MAX_INSTANCES, |c| {
            u16::try_from(c).unwrap_or(u16::MAX)
        });

        let mut events: Vec<ExpandedEvent> = rrule_set
            .all(max_count)
            .dates
            .into_iter()
            .map(|dt| to_event(dt.with_timezone(&Utc), duration))
            .collect();
        events.truncate(limit);
        return Ok(events);
    }

    // A yearly expansion can move a base instance back before UNTIL, so the
    // base rule runs to the end of UNTIL's year and the bound is applied after
    // the transform.
    let base_until = match (parts.rule.frequency().mode(), until_local) {
        (Mode::Expand, Some(u)) => NaiveDate::from_ymd_opt(u.year(), 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|end| end.format(LOCAL_DATETIME_FORMAT).to_string()),
        _ => until.map(str::to_string),
    };
    let rrule_set = build_rrule_set(&parts.base, dtstart, timezone, base_until.as_deref())?;
    let base_instances = rrule_set.all(RAW_EXPANSION_LIMIT).dates;
    tracing::debug!(
        base = base_instances.len(),
        offsets = ?parts.rule.offsets(),
        frequency = %parts.rule.frequency(),
        "applying BYEASTER to base instances"
    );

    let mut instances = parts.rule.transform(base_instances);
    instances.retain(|dt| {
        let local = dt.naive_local();
        local >= start_local && until_local.is_none_or(|u| local <= u)
    });
    instances.sort();
    instances.dedup();

    Ok(instances
        .into_iter()
        .take(limit)
        .map(|dt| to_event(dt.with_timezone(&Utc), duration))
        .collect())
}

/// Build an `RRuleSet` from a rule body, a local DTSTART and an optional UNTIL.
fn build_rrule_set(
    rule: &str,
    dtstart: &str,
    timezone: &str,
    until: Option<&str>,
) -> Result<RRuleSet> {
    // Convert the dtstart from "2026-02-17T14:00:00" to iCalendar format "20260217T140000".
    let dtstart_ical = dtstart.replace(['-', ':'], "");
    let mut rule = rule.to_string();

    // The rrule crate requires UNTIL and DTSTART to share the same timezone.
    // For UTC, UNTIL must end with "Z"; for other timezones, use bare local time.
    if let Some(until_str) = until {
        if !rule.to_uppercase().contains("UNTIL=") {
            let mut until_ical = until_str.replace(['-', ':'], "");
            if timezone == "UTC" {
                until_ical.push('Z');
            }
            rule = format!("{};UNTIL={}", rule, until_ical);
        }
    }

    let rrule_text = format!(
        "DTSTART;TZID={}:{}\nRRULE:{}",
        timezone, dtstart_ical, rule
    );

    rrule_text
        .parse()
        .map_err(|e| EasterError::InvalidRule(format!("{}", e)))
}

fn parse_local(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, LOCAL_DATETIME_FORMAT)
        .map_err(|e| EasterError::InvalidDateTime(format!("'{}': {}", s, e)))
}

fn to_event(start: DateTime<Utc>, duration: Duration) -> ExpandedEvent {
    ExpandedEvent {
        start,
        end: start + duration,
    }
}
