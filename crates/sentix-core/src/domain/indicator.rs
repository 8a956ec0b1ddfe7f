use serde::Serialize;

/// Suffix marking a 7-hour change indicator on an on-chain record.
pub const CHANGE_SUFFIX: &str = "_chg_7h";

/// Indicator base names published by the on-chain flow service.
///
/// Each base name is the current-value field; `<base>_chg_7h` is its change field.
pub const KNOWN_INDICATORS: [&str; 18] = [
    "exchange_net_flow_usd",
    "exchange_avg_flow_usd",
    "exchange_wallet_count",
    "whale_net_flow_usd",
    "whale_avg_flow_usd",
    "whale_wallet_count",
    "fresh_wallets_net_flow_usd",
    "fresh_wallets_avg_flow_usd",
    "fresh_wallets_wallet_count",
    "top_pnl_net_flow_usd",
    "top_pnl_avg_flow_usd",
    "top_pnl_wallet_count",
    "smart_trader_net_flow_usd",
    "smart_trader_avg_flow_usd",
    "smart_trader_wallet_count",
    "public_figure_net_flow_usd",
    "public_figure_avg_flow_usd",
    "public_figure_wallet_count",
];

// Longest first so `_chg_7h` is stripped whole.
const CHANGE_SPELLINGS: [&str; 4] = ["_chg_7h", "_chg7h", "chg_7h", "chg7h"];

/// Returns the base name of a change-indicator field.
///
/// A key is a change indicator when it contains `chg7h` or `chg_7h` anywhere,
/// in any case. A trailing marker (with or without a leading underscore) is
/// stripped; a key with the marker embedded elsewhere is its own base name.
pub fn change_base_name(key: &str) -> Option<String> {
    let lower = key.to_ascii_lowercase();
    if !lower.contains("chg7h") && !lower.contains("chg_7h") {
        return None;
    }

    let base = CHANGE_SPELLINGS
        .iter()
        .find(|suffix| lower.ends_with(*suffix))
        .map_or(key, |suffix| &key[..key.len() - suffix.len()]);
    Some(base.to_owned())
}

/// Title-cases each underscore-separated word: `whale_net_flow` -> `Whale Net Flow`.
pub fn humanize_label(base: &str) -> String {
    base.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drift between a record's indicators and [`KNOWN_INDICATORS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaReport {
    pub unknown_indicators: Vec<String>,
    pub missing_indicators: Vec<String>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_indicators.is_empty() && self.missing_indicators.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.unknown_indicators.is_empty() {
            warnings.push(format!(
                "unknown onchain indicators: {}",
                self.unknown_indicators.join(", ")
            ));
        }
        if !self.missing_indicators.is_empty() {
            warnings.push(format!(
                "missing onchain indicators: {}",
                self.missing_indicators.join(", ")
            ));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_change_spelling() {
        assert_eq!(
            change_base_name("whale_net_flow_usd_chg_7h").as_deref(),
            Some("whale_net_flow_usd")
        );
        assert_eq!(
            change_base_name("Whale_Net_Flow_USD_CHG7H").as_deref(),
            Some("Whale_Net_Flow_USD")
        );
        assert_eq!(change_base_name("netflowchg7h").as_deref(), Some("netflow"));
        assert_eq!(change_base_name("whale_net_flow_usd"), None);
    }

    #[test]
    fn embedded_marker_is_its_own_base() {
        assert_eq!(
            change_base_name("whale_CHG7H_delta").as_deref(),
            Some("whale_CHG7H_delta")
        );
        assert_eq!(change_base_name("chg_7h_window").as_deref(), Some("chg_7h_window"));
        assert_eq!(change_base_name("change_7h"), None);
    }

    #[test]
    fn humanizes_snake_case() {
        assert_eq!(humanize_label("exchange_net_flow_usd"), "Exchange Net Flow Usd");
        assert_eq!(humanize_label("top_pnl"), "Top Pnl");
        assert_eq!(humanize_label(""), "");
    }

    #[test]
    fn clean_report_has_no_warnings() {
        let report = SchemaReport::default();
        assert!(report.is_clean());
        assert!(report.warnings().is_empty());
    }
}
