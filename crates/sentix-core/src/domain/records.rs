use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::indicator::{change_base_name, SchemaReport, CHANGE_SUFFIX, KNOWN_INDICATORS};
use super::sentiment::SentimentType;

const PROTOCOL_KEY: &str = "parentProtocol";
const SENTIMENT_KEY: &str = "overall_sentiment";

/// One asset's fundamental-analysis snapshot from the fundamental feed.
///
/// Every modeled field tolerates absence and JSON `null`; both read as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    #[serde(rename = "parentProtocol", default, deserialize_with = "lenient_string")]
    pub protocol_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: String,
    #[serde(rename = "logo", default, deserialize_with = "lenient_string")]
    pub logo_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rank_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rank: String,
    /// Indicator fields the dashboard does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FundamentalRecord {
    pub fn new(protocol_id: impl Into<String>) -> Self {
        Self {
            protocol_id: protocol_id.into(),
            ..Self::default()
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn with_logo_url(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = logo_url.into();
        self
    }

    pub fn with_rank(mut self, rank: impl Into<String>, description: impl Into<String>) -> Self {
        self.rank = rank.into();
        self.rank_description = description.into();
        self
    }
}

/// How a record's on-chain sentiment is obtained, resolved once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnchainSentiment {
    /// The upstream service already computed it; used verbatim.
    Supplied(SentimentType),
    /// Derive it from the record's change indicators.
    Derive,
}

/// One asset's on-chain flow snapshot.
///
/// Fields other than the protocol id and the supplied sentiment are kept in
/// arrival order so indicator extraction can follow the upstream layout.
#[derive(Debug, Clone, PartialEq)]
pub struct OnchainRecord {
    pub protocol_id: String,
    pub sentiment: OnchainSentiment,
    fields: Map<String, Value>,
}

impl OnchainRecord {
    pub fn new(protocol_id: impl Into<String>) -> Self {
        Self {
            protocol_id: protocol_id.into(),
            sentiment: OnchainSentiment::Derive,
            fields: Map::new(),
        }
    }

    /// Builds a record from a raw upstream JSON object.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        let protocol_id = match fields.shift_remove(PROTOCOL_KEY) {
            Some(value) => value_to_string(value),
            None => String::new(),
        };
        let sentiment = match fields.shift_remove(SENTIMENT_KEY) {
            Some(Value::String(raw)) if !raw.trim().is_empty() => match raw.parse() {
                Ok(sentiment) => OnchainSentiment::Supplied(sentiment),
                Err(_) => {
                    tracing::warn!(
                        protocol = %protocol_id,
                        value = %raw,
                        "ignoring unrecognized supplied onchain sentiment"
                    );
                    OnchainSentiment::Derive
                }
            },
            _ => OnchainSentiment::Derive,
        };

        Self {
            protocol_id,
            sentiment,
            fields,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: SentimentType) -> Self {
        self.sentiment = OnchainSentiment::Supplied(sentiment);
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Fields named with the `_chg_7h` suffix, in record order.
    pub fn change_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(key, _)| key.ends_with(CHANGE_SUFFIX))
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Compares the record's change indicators with the known indicator catalogue.
    pub fn schema_report(&self) -> SchemaReport {
        let present = self
            .fields
            .keys()
            .filter_map(|key| change_base_name(key))
            .collect::<Vec<_>>();

        let unknown_indicators = present
            .iter()
            .filter(|base| !KNOWN_INDICATORS.contains(&base.as_str()))
            .cloned()
            .collect();
        let missing_indicators = KNOWN_INDICATORS
            .iter()
            .filter(|known| !present.iter().any(|base| base == *known))
            .map(|known| (*known).to_owned())
            .collect();

        SchemaReport {
            unknown_indicators,
            missing_indicators,
        }
    }
}

impl<'de> Deserialize<'de> for OnchainRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_fields)
    }
}

impl Serialize for OnchainRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let supplied = match self.sentiment {
            OnchainSentiment::Supplied(sentiment) => Some(sentiment),
            OnchainSentiment::Derive => None,
        };
        let mut map = serializer.serialize_map(Some(
            self.fields.len() + 1 + usize::from(supplied.is_some()),
        ))?;
        map.serialize_entry(PROTOCOL_KEY, &self.protocol_id)?;
        if let Some(sentiment) = supplied {
            map.serialize_entry(SENTIMENT_KEY, &sentiment)?;
        }
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One rendered table row, unique per normalized protocol id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub protocol_id: String,
    pub symbol: String,
    pub logo_url: String,
    pub price: String,
    pub fundamental_sentiment: SentimentType,
    pub onchain_sentiment: SentimentType,
    pub technical_sentiment: SentimentType,
    pub overall_sentiment: SentimentType,
    /// Originating on-chain record for the detail view.
    #[serde(skip)]
    pub onchain_data: OnchainRecord,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
