//! Sentiment classifiers for the fundamental and on-chain axes.
//!
//! Both classifiers are total: unrecognized or missing input falls back to
//! [`SentimentType::Neutral`] (fundamental) or counts as a neutral vote (on-chain).

use serde::Serialize;
use serde_json::Value;

use crate::{OnchainRecord, OnchainSentiment, SentimentType};

const BULLISH_BUCKETS: [&str; 2] = ["top 5%", "top 10%"];
const NEUTRAL_BUCKETS: [&str; 4] = ["top 20%", "top 30%", "top 40%", "top 50%"];
const OPEN_ENDED_BUCKETS: [&str; 2] = ["top 50% +", "top 50%+"];
const BEARISH_BUCKETS: [&str; 5] = ["bottom", "top 60%", "top 70%", "top 80%", "top 90%"];

/// Maps a percentile rank description such as `"Top 5%"` to a sentiment.
///
/// Rules are checked in order; the first match wins:
/// 1. `top 5%` / `top 10%` is bullish.
/// 2. `top 20%`..`top 50%` is neutral unless the text is the open-ended `top 50% +`.
/// 3. `top 50% +`, `bottom`, `top 60%`..`top 90%` is bearish.
/// 4. Anything else is neutral.
pub fn classify_fundamental(rank_description: &str) -> SentimentType {
    let desc = rank_description.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|needle| desc.contains(needle));

    if contains_any(&BULLISH_BUCKETS) {
        return SentimentType::Bullish;
    }

    let open_ended = contains_any(&OPEN_ENDED_BUCKETS);
    if contains_any(&NEUTRAL_BUCKETS) && !open_ended {
        return SentimentType::Neutral;
    }

    if open_ended || contains_any(&BEARISH_BUCKETS) {
        return SentimentType::Bearish;
    }

    SentimentType::Neutral
}

/// Per-class vote counts over a record's change indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTally {
    pub bullish: usize,
    pub bearish: usize,
    pub neutral: usize,
}

impl SentimentTally {
    pub fn record(&mut self, sentiment: SentimentType) {
        match sentiment {
            SentimentType::Bullish => self.bullish += 1,
            SentimentType::Bearish => self.bearish += 1,
            SentimentType::Neutral => self.neutral += 1,
        }
    }

    /// Resolves the tally; bullish wins every tie it takes part in, neutral
    /// beats bearish on a tie, and bearish is the fallback.
    ///
    /// An empty tally resolves to bullish.
    pub const fn resolve(self) -> SentimentType {
        if self.bullish >= self.neutral && self.bullish >= self.bearish {
            SentimentType::Bullish
        } else if self.neutral > self.bullish && self.neutral >= self.bearish {
            SentimentType::Neutral
        } else {
            SentimentType::Bearish
        }
    }
}

/// Votes a single change-indicator value: negative change is an inflow (bullish),
/// positive is an outflow (bearish); zero, null, objects and non-numeric text
/// are neutral.
///
/// Booleans and numeric text (including the empty string) cast no vote.
pub fn classify_change(value: &Value) -> Option<SentimentType> {
    match value {
        Value::Number(number) => Some(match number.as_f64() {
            Some(change) if change < 0.0 => SentimentType::Bullish,
            Some(change) if change > 0.0 => SentimentType::Bearish,
            _ => SentimentType::Neutral,
        }),
        Value::Bool(_) => None,
        Value::String(text) if is_numeric_text(text) => None,
        _ => Some(SentimentType::Neutral),
    }
}

/// Text that coerces to a number: blank, a decimal literal, or `Infinity`.
fn is_numeric_text(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    if matches!(trimmed, "Infinity" | "+Infinity" | "-Infinity") {
        return true;
    }
    let literal = trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'));
    literal && trimmed.parse::<f64>().is_ok_and(|number| !number.is_nan())
}

/// Tallies every `_chg_7h` field of the record that casts a vote.
pub fn tally_onchain(record: &OnchainRecord) -> SentimentTally {
    let mut tally = SentimentTally::default();
    for (_, value) in record.change_fields() {
        if let Some(sentiment) = classify_change(value) {
            tally.record(sentiment);
        }
    }
    tally
}

/// Derives on-chain sentiment from the record's change indicators, ignoring
/// any supplied sentiment.
pub fn classify_onchain(record: &OnchainRecord) -> SentimentType {
    let tally = tally_onchain(record);
    let sentiment = tally.resolve();

    tracing::debug!(
        protocol = %record.protocol_id,
        bullish = tally.bullish,
        bearish = tally.bearish,
        neutral = tally.neutral,
        %sentiment,
        "classified onchain indicators"
    );

    sentiment
}

/// Uses the upstream-supplied sentiment when present, otherwise derives it.
pub fn resolve_onchain(record: &OnchainRecord) -> SentimentType {
    match record.sentiment {
        OnchainSentiment::Supplied(sentiment) => sentiment,
        OnchainSentiment::Derive => classify_onchain(record),
    }
}
