//! Detail-view indicator extraction.

use serde::Serialize;

use crate::{change_base_name, humanize_label, OnchainRecord};

/// One line of the detail view: a humanized indicator and its latest value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub label: String,
    pub current_value: Option<f64>,
}

/// Pairs every change-indicator field with its current-value field.
///
/// Output follows the record's field order. The current value is `None` when
/// the companion field is missing or not a finite number.
pub fn extract_indicators(record: &OnchainRecord) -> Vec<IndicatorRow> {
    record
        .fields()
        .keys()
        .filter_map(|key| change_base_name(key))
        .map(|base| IndicatorRow {
            current_value: record
                .get(&base)
                .and_then(|value| value.as_f64())
                .filter(|value| value.is_finite()),
            label: humanize_label(&base),
        })
        .collect()
}
