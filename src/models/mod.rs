use serde::{Deserialize, Serialize};

pub mod audit;
pub mod auth;
pub mod billing;
pub mod client;
pub mod credit;
pub mod graphql;
pub mod pagination;
pub mod payment;

//My Own error message
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Clone, Serialize)]
pub struct GeneralInfo {
    pub api_version: String,
}

/// Wire models that have a dedicated GraphQL shape (dates, free-form payloads)
pub trait GraphQLMappable<GraphQLType> {
    fn to_graphql_type(&self) -> GraphQLType;
}

/// The upstream serializes decimal fields as strings ("100.00"), older endpoints
/// send plain numbers, so both are accepted.
pub mod amount {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    impl RawAmount {
        fn into_f64<E: de::Error>(self) -> Result<f64, E> {
            match self {
                RawAmount::Number(value) => Ok(value),
                RawAmount::Text(text) => text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| E::custom(format!("invalid decimal amount: {text}"))),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawAmount::deserialize(deserializer)?.into_f64()
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawAmount>::deserialize(deserializer)?
            .map(RawAmount::into_f64)
            .transpose()
    }

    /// Amounts are compared in cents so 0.1 + 0.2 style drift can't fail a check
    pub fn to_cents(value: f64) -> i64 {
        (value * 100.0).round() as i64
    }
}

/// Free-form JSON objects attached to events and audit entries
pub mod payload {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    /// A missing object and an explicit `null` both read as empty
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Strings go as they are, `null` as nothing, everything else as compact JSON
    pub fn display_value(value: &Value) -> String {
        match value {
            Value::String(text) => text.to_owned(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
