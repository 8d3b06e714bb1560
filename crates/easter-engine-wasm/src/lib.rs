//! WASM bindings for easter-engine.
//!
//! Exposes the Easter Sunday lookup, the BYEASTER transform and BYEASTER-aware
//! RRULE expansion to JavaScript via `wasm-bindgen`. All complex types are
//! passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p easter-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/easter-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/easter_engine_wasm.wasm
//! ```

use easter_engine::expander::ExpandedEvent;
use easter_engine::{EasterOffsetRule, Frequency};
use serde::Serialize;
use wasm_bindgen::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ExpandedEventDto {
    start: String,
    end: String,
}

impl From<&ExpandedEvent> for ExpandedEventDto {
    fn from(e: &ExpandedEvent) -> Self {
        Self {
            start: e.start.to_rfc3339(),
            end: e.end.to_rfc3339(),
        }
    }
}

fn js_err(context: &str, e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Easter Sunday of `year` as a `YYYY-MM-DD` string (proleptic Gregorian).
#[wasm_bindgen(js_name = "easterSunday")]
pub fn easter_sunday(year: i32) -> Result<String, JsValue> {
    easter_engine::easter_sunday(year)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Apply a BYEASTER rule to a list of dates.
///
/// `dates_json` is a JSON array of ISO date or datetime strings,
/// `offsets_json` a JSON array of integers, `frequency` an RFC 5545 FREQ name.
/// Returns a JSON array of strings in the input's precision: date-times when
/// any input carries a time, dates otherwise.
#[wasm_bindgen(js_name = "applyEasterRule")]
pub fn apply_easter_rule(
    dates_json: &str,
    offsets_json: &str,
    frequency: &str,
) -> Result<String, JsValue> {
    let dates: Vec<String> =
        serde_json::from_str(dates_json).map_err(|e| js_err("Invalid dates JSON", e))?;
    let offsets: Vec<i32> =
        serde_json::from_str(offsets_json).map_err(|e| js_err("Invalid offsets JSON", e))?;
    let frequency: Frequency = frequency
        .parse()
        .map_err(|e| JsValue::from_str(&format!("{}", e)))?;

    let rule = EasterOffsetRule::new(offsets, frequency);
    let result = rule
        .transform_iso(dates.as_slice())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&result).map_err(|e| js_err("Serialization error", e))
}

/// Expand an RRULE string (optionally with BYEASTER) into concrete instances.
///
/// Returns a JSON string containing an array of `{start, end}` objects with
/// RFC 3339 datetime strings.
#[wasm_bindgen(js_name = "expandRRule")]
pub fn expand_rrule(
    rrule: &str,
    dtstart: &str,
    duration_minutes: u32,
    timezone: &str,
    until: Option<String>,
    max_count: Option<u32>,
) -> Result<String, JsValue> {
    let events = easter_engine::expand_rrule(
        rrule,
        dtstart,
        duration_minutes,
        timezone,
        until.as_deref(),
        max_count,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let dtos: Vec<ExpandedEventDto> = events.iter().map(ExpandedEventDto::from).collect();

    serde_json::to_string(&dtos).map_err(|e| js_err("Serialization error", e))
}
