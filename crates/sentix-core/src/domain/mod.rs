//! # Domain Models
//!
//! Typed records for the two upstream feeds and the rows the dashboard renders.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SentimentType`] | Bullish / bearish / neutral classification |
//! | [`FundamentalRecord`] | Fundamental-analysis snapshot for one protocol |
//! | [`OnchainRecord`] | On-chain flow snapshot for one protocol |
//! | [`OnchainSentiment`] | Supplied-or-derive choice for on-chain sentiment |
//! | [`DisplayRow`] | Merged table row |
//! | [`SchemaReport`] | Indicator drift against [`KNOWN_INDICATORS`] |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Upstream records are loosely typed JSON. Modeled fields degrade to empty
//! values instead of failing, so a single malformed record never rejects a feed.

mod indicator;
mod records;
mod sentiment;
mod timestamp;

pub use indicator::{
    change_base_name, humanize_label, SchemaReport, CHANGE_SUFFIX, KNOWN_INDICATORS,
};
pub use records::{DisplayRow, FundamentalRecord, OnchainRecord, OnchainSentiment};
pub use sentiment::SentimentType;
pub use timestamp::UtcDateTime;
