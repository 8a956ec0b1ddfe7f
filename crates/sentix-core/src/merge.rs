//! Join of the fundamental and on-chain feeds into table rows.
//!
//! The on-chain feed decides which rows exist and in which order; fundamental
//! records only enrich them. Protocol ids match case-insensitively.

use std::collections::{HashMap, HashSet};

use crate::aggregate::aggregate_overall;
use crate::classify::{classify_fundamental, resolve_onchain};
use crate::{DisplayRow, FundamentalRecord, OnchainRecord, SentimentType};

/// Price shown for every row until a price source exists.
pub const PRICE_PLACEHOLDER: &str = "$100K";

/// Prefix the on-chain service puts in front of protocol ids.
pub const PROTOCOL_PREFIX: &str = "parent#";

/// Position of a letter grade on the rank ladder; unknown grades rank lowest.
pub fn rank_priority(rank: &str) -> u8 {
    match rank {
        "A+" => 7,
        "A" => 6,
        "B+" => 5,
        "B" => 4,
        "C+" => 3,
        "C" => 2,
        "D" => 1,
        _ => 0,
    }
}

/// Normalized join key for protocol ids.
pub fn protocol_key(protocol_id: &str) -> String {
    protocol_id.to_lowercase()
}

/// Ticker fallback for rows without a fundamental match: `parent#aave` -> `AAVE`.
pub fn derive_symbol(protocol_id: &str) -> String {
    protocol_id
        .strip_prefix(PROTOCOL_PREFIX)
        .unwrap_or(protocol_id)
        .to_uppercase()
}

/// Indexes fundamental records by normalized protocol id.
///
/// Duplicates keep the earlier record unless the later one has a strictly
/// better rank. Records without a protocol id are ignored.
pub fn index_fundamentals(records: &[FundamentalRecord]) -> HashMap<String, &FundamentalRecord> {
    let mut index: HashMap<String, &FundamentalRecord> = HashMap::with_capacity(records.len());

    for record in records {
        if record.protocol_id.is_empty() {
            continue;
        }

        let key = protocol_key(&record.protocol_id);
        match index.get(&key) {
            Some(existing) if rank_priority(&record.rank) <= rank_priority(&existing.rank) => {}
            _ => {
                index.insert(key, record);
            }
        }
    }

    index
}

/// Merges both feeds into display rows using [`PRICE_PLACEHOLDER`] as the price.
pub fn merge_tokens(
    fundamentals: &[FundamentalRecord],
    onchain: &[OnchainRecord],
) -> Vec<DisplayRow> {
    merge_tokens_with_price(fundamentals, onchain, PRICE_PLACEHOLDER)
}

/// Merges both feeds into display rows, one per unique on-chain protocol id,
/// in on-chain order.
pub fn merge_tokens_with_price(
    fundamentals: &[FundamentalRecord],
    onchain: &[OnchainRecord],
    price: &str,
) -> Vec<DisplayRow> {
    let index = index_fundamentals(fundamentals);
    let mut seen = HashSet::with_capacity(onchain.len());
    let mut rows = Vec::with_capacity(onchain.len());

    for record in onchain {
        if record.protocol_id.is_empty() {
            continue;
        }

        let key = protocol_key(&record.protocol_id);
        if !seen.insert(key.clone()) {
            continue;
        }

        let matched = index.get(&key).copied();
        let fundamental_sentiment = matched
            .map(|fundamental| classify_fundamental(&fundamental.rank_description))
            .unwrap_or(SentimentType::Neutral);
        let onchain_sentiment = resolve_onchain(record);
        let technical_sentiment = SentimentType::Neutral;
        let overall_sentiment =
            aggregate_overall(fundamental_sentiment, onchain_sentiment, technical_sentiment);

        let symbol = matched
            .map(|fundamental| fundamental.symbol.as_str())
            .filter(|symbol| !symbol.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| derive_symbol(&record.protocol_id));
        let logo_url = matched
            .map(|fundamental| fundamental.logo_url.clone())
            .unwrap_or_default();

        rows.push(DisplayRow {
            protocol_id: record.protocol_id.clone(),
            symbol,
            logo_url,
            price: price.to_owned(),
            fundamental_sentiment,
            onchain_sentiment,
            technical_sentiment,
            overall_sentiment,
            onchain_data: record.clone(),
        });
    }

    tracing::debug!(
        fundamentals = fundamentals.len(),
        matched_fundamentals = index.len(),
        onchain = onchain.len(),
        rows = rows.len(),
        "merged feeds"
    );

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_ladder_orders_grades() {
        let ladder = ["A+", "A", "B+", "B", "C+", "C", "D"];
        for pair in ladder.windows(2) {
            assert!(rank_priority(pair[0]) > rank_priority(pair[1]));
        }
        assert_eq!(rank_priority("D"), 1);
        assert_eq!(rank_priority("Z"), 0);
        assert_eq!(rank_priority(""), 0);
    }

    #[test]
    fn equal_rank_keeps_first_seen() {
        let records = vec![
            FundamentalRecord::new("parent#x").with_symbol("FIRST").with_rank("B", ""),
            FundamentalRecord::new("PARENT#X").with_symbol("SECOND").with_rank("B", ""),
            FundamentalRecord::new("parent#x").with_symbol("THIRD").with_rank("C", ""),
        ];

        let index = index_fundamentals(&records);
        assert_eq!(index.len(), 1);
        assert_eq!(index["parent#x"].symbol, "FIRST");
    }

    #[test]
    fn fundamentals_without_id_are_ignored() {
        let records = vec![FundamentalRecord::new("").with_rank("A+", "Top 5%")];
        assert!(index_fundamentals(&records).is_empty());
    }

    #[test]
    fn derives_symbol_from_protocol_id() {
        assert_eq!(derive_symbol("parent#aave"), "AAVE");
        assert_eq!(derive_symbol("lido"), "LIDO");
        assert_eq!(derive_symbol("PARENT#aave"), "PARENT#AAVE");
    }

    #[test]
    fn empty_fundamental_symbol_falls_back_to_derived() {
        let fundamentals = vec![FundamentalRecord::new("parent#gmx").with_logo_url("https://logo")];
        let onchain = vec![OnchainRecord::new("parent#gmx")];

        let rows = merge_tokens(&fundamentals, &onchain);
        assert_eq!(rows[0].symbol, "GMX");
        assert_eq!(rows[0].logo_url, "https://logo");
    }

    #[test]
    fn skips_onchain_records_without_id() {
        let onchain = vec![OnchainRecord::new(""), OnchainRecord::new("parent#a")];
        let rows = merge_tokens(&[], &onchain);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].protocol_id, "parent#a");
    }
}
