//! Recent indicator readings for the detail view's trend column.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{UtcDateTime, KNOWN_INDICATORS};

/// Number of most recent readings kept per protocol.
pub const HISTORY_WINDOW: usize = 6;

/// Chronological readings of one indicator; `None` marks a missing reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub indicator: String,
    pub values: Vec<Option<f64>>,
}

/// Last [`HISTORY_WINDOW`] readings of every known indicator for one protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorHistory {
    pub protocol_id: String,
    pub timestamps: Vec<String>,
    pub series: Vec<IndicatorSeries>,
}

impl IndicatorHistory {
    pub fn empty(protocol_id: impl Into<String>) -> Self {
        build_indicator_history(protocol_id, &[])
    }

    pub fn series_for(&self, indicator: &str) -> Option<&IndicatorSeries> {
        self.series.iter().find(|series| series.indicator == indicator)
    }
}

/// Builds the history for `protocol_id` from raw history rows.
///
/// Rows are matched case-insensitively on `parentProtocol`, ordered newest
/// first by `timestamp` (unparseable timestamps last), cut to the window and
/// returned oldest first.
pub fn build_indicator_history(
    protocol_id: impl Into<String>,
    rows: &[Map<String, Value>],
) -> IndicatorHistory {
    let protocol_id = protocol_id.into();
    let key = protocol_id.to_lowercase();

    let mut matching = rows
        .iter()
        .filter(|row| {
            row.get("parentProtocol")
                .and_then(Value::as_str)
                .is_some_and(|id| id.to_lowercase() == key)
        })
        .map(|row| {
            let ts = row
                .get("timestamp")
                .and_then(Value::as_str)
                .and_then(UtcDateTime::parse_lenient);
            (ts, row)
        })
        .collect::<Vec<_>>();

    matching.sort_by(|(a, _), (b, _)| b.cmp(a));
    matching.truncate(HISTORY_WINDOW);
    matching.reverse();

    let timestamps = matching
        .iter()
        .map(|(_, row)| {
            row.get("timestamp")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        })
        .collect();

    let series = KNOWN_INDICATORS
        .iter()
        .map(|indicator| IndicatorSeries {
            indicator: (*indicator).to_owned(),
            values: matching
                .iter()
                .map(|(_, row)| {
                    row.get(*indicator)
                        .and_then(Value::as_f64)
                        .filter(|value| value.is_finite())
                })
                .collect(),
        })
        .collect();

    IndicatorHistory {
        protocol_id,
        timestamps,
        series,
    }
}
