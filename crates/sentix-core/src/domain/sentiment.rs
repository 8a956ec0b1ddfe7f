use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Three-way market sentiment used by every axis of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentType {
    Bullish,
    Bearish,
    Neutral,
}

impl SentimentType {
    /// Legend order.
    pub const ALL: [Self; 3] = [Self::Bullish, Self::Neutral, Self::Bearish];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }

    /// Badge text shown next to each sentiment.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        }
    }
}

impl Display for SentimentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bullish" => Ok(Self::Bullish),
            "bearish" => Ok(Self::Bearish),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ValidationError::InvalidSentiment {
                value: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            " Bullish ".parse::<SentimentType>().expect("must parse"),
            SentimentType::Bullish
        );
        assert_eq!(
            "NEUTRAL".parse::<SentimentType>().expect("must parse"),
            SentimentType::Neutral
        );
    }

    #[test]
    fn rejects_unknown_sentiment() {
        let err = "mixed".parse::<SentimentType>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSentiment { .. }));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&SentimentType::Bearish).expect("serializes");
        assert_eq!(json, "\"bearish\"");
    }
}
