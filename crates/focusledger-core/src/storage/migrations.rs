//! Ledger document schemas and the migration chain.
//!
//! Decoding walks [`SCHEMA_CHAIN`] in order. The first attempt that parses
//! the document wins; attempts other than the current schema mark the
//! result as migrated so the store re-saves it in the current shape.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::{day_key, parse_day_key};
use crate::ledger::{DayLedger, HourBucket, Ledger, Segment, DEFAULT_DAILY_GOAL_MINUTES, UNCATEGORIZED};

/// Current schema version.
///
/// Increment this when adding a new schema to the chain.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Current on-disk shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LedgerDocument {
    pub schema_version: u32,
    pub productivity_data: BTreeMap<String, Vec<HourBucket>>,
    pub productive_session_count: u32,
    pub daily_goal_minutes: u32,
    pub categories: Vec<String>,
}

impl From<&Ledger> for LedgerDocument {
    fn from(ledger: &Ledger) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            productivity_data: ledger
                .days()
                .map(|(date, day)| (day_key(date), day.hours().to_vec()))
                .collect(),
            productive_session_count: ledger.sessions_since_long_break(),
            daily_goal_minutes: ledger.daily_goal_minutes(),
            categories: ledger.categories().to_vec(),
        }
    }
}

impl LedgerDocument {
    pub fn into_ledger(self) -> Ledger {
        let days = collect_days(self.productivity_data);
        Ledger::from_parts(
            days,
            self.productive_session_count,
            self.daily_goal_minutes,
            self.categories,
        )
    }
}

/// The current shape as written before documents carried `schemaVersion`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct UnversionedDocument {
    productivity_data: BTreeMap<String, Vec<HourBucket>>,
    productive_session_count: u32,
    daily_goal_minutes: u32,
    categories: Vec<String>,
}

/// Schema 1: segments carried an optional free-form `tag`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDocument {
    productivity_data: BTreeMap<String, Vec<LegacyHourBucket>>,
    #[serde(default)]
    productive_session_count: u32,
    #[serde(default = "default_goal")]
    daily_goal_minutes: u32,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyHourBucket {
    hour: u32,
    #[serde(default)]
    segments: Vec<LegacySegment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySegment {
    start_minute: u32,
    duration_minutes: u32,
    #[serde(default)]
    tag: Option<String>,
    /// Present when a category-carrying segment reached this fallback.
    #[serde(default)]
    category: Option<String>,
}

fn default_goal() -> u32 {
    DEFAULT_DAILY_GOAL_MINUTES
}

/// One entry in the decode chain.
pub struct SchemaAttempt {
    pub tag: &'static str,
    pub decode: fn(&str) -> Result<Ledger, serde_json::Error>,
    /// Whether a successful decode must be re-persisted in the current schema.
    pub migrates: bool,
}

/// Tried in order, newest first.
pub const SCHEMA_CHAIN: &[SchemaAttempt] = &[
    SchemaAttempt {
        tag: "v2",
        decode: decode_current,
        migrates: false,
    },
    SchemaAttempt {
        tag: "v2-unversioned",
        decode: decode_unversioned,
        migrates: true,
    },
    SchemaAttempt {
        tag: "v1-tagged",
        decode: decode_legacy_tagged,
        migrates: true,
    },
];

/// Result of a successful walk of the chain.
#[derive(Debug)]
pub struct Decoded {
    pub ledger: Ledger,
    pub schema: &'static str,
    pub migrated: bool,
}

/// Decode `raw` with the first schema that accepts it.
pub fn decode(raw: &str) -> Option<Decoded> {
    for attempt in SCHEMA_CHAIN {
        match (attempt.decode)(raw) {
            Ok(ledger) => {
                return Some(Decoded {
                    ledger,
                    schema: attempt.tag,
                    migrated: attempt.migrates,
                })
            }
            Err(err) => debug!(schema = attempt.tag, %err, "schema did not match"),
        }
    }
    None
}

/// Decode the current schema.
pub fn decode_current(raw: &str) -> Result<Ledger, serde_json::Error> {
    let document: LedgerDocument = serde_json::from_str(raw)?;
    if document.schema_version != CURRENT_SCHEMA_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported schema version {}",
            document.schema_version
        )));
    }
    Ok(document.into_ledger())
}

/// Decode the current shape without a version stamp. Every segment must
/// carry its `category`; re-saving adds the stamp.
pub fn decode_unversioned(raw: &str) -> Result<Ledger, serde_json::Error> {
    let document: UnversionedDocument = serde_json::from_str(raw)?;
    Ok(Ledger::from_parts(
        collect_days(document.productivity_data),
        document.productive_session_count,
        document.daily_goal_minutes,
        document.categories,
    ))
}

/// Decode schema 1 and lift it to the current model. Missing or blank
/// tags become [`UNCATEGORIZED`], which joins the category list when used.
pub fn decode_legacy_tagged(raw: &str) -> Result<Ledger, serde_json::Error> {
    let legacy: LegacyDocument = serde_json::from_str(raw)?;
    let mut categories = legacy.categories;
    let mut productivity_data = BTreeMap::new();

    for (key, buckets) in legacy.productivity_data {
        let buckets = buckets
            .into_iter()
            .map(|bucket| HourBucket {
                hour: bucket.hour,
                segments: bucket
                    .segments
                    .into_iter()
                    .filter_map(|segment| {
                        let category = segment
                            .category
                            .or(segment.tag)
                            .map(|name| name.trim().to_string())
                            .filter(|name| !name.is_empty())
                            .unwrap_or_else(|| UNCATEGORIZED.to_string());
                        let segment =
                            Segment::new(segment.start_minute, segment.duration_minutes, category)?;
                        if !categories.iter().any(|c| c == segment.category()) {
                            categories.push(segment.category().to_string());
                        }
                        Some(segment)
                    })
                    .collect(),
            })
            .collect();
        productivity_data.insert(key, buckets);
    }

    Ok(Ledger::from_parts(
        collect_days(productivity_data),
        legacy.productive_session_count,
        legacy.daily_goal_minutes,
        categories,
    ))
}

fn collect_days(data: BTreeMap<String, Vec<HourBucket>>) -> BTreeMap<chrono::NaiveDate, DayLedger> {
    let mut days = BTreeMap::new();
    for (key, buckets) in data {
        match parse_day_key(&key) {
            Ok(date) => match days.entry(date) {
                Entry::Vacant(slot) => {
                    slot.insert(DayLedger::from_buckets(buckets));
                }
                Entry::Occupied(_) => warn!(%key, "dropping duplicate day, keeping the first"),
            },
            Err(err) => warn!(%err, "dropping day with unparsable key"),
        }
    }
    days
}
