//! Broker Image Model

use serde::{Deserialize, Serialize};

/// Broker image entity (at most one per broker)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BrokerImage {
    pub id: i64,
    pub broker_id: i64,
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Create broker image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerImageCreate {
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Update broker image payload (full replacement of name and data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerImageUpdate {
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Image bytes travel as standard base64 strings in JSON
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| serde::de::Error::custom(format!("invalid base64 image data: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_is_base64_on_the_wire() {
        let image = BrokerImage {
            id: 1,
            broker_id: 2,
            name: "logo".into(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], "iVBORw==");
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let res = serde_json::from_str::<BrokerImageCreate>(r#"{"name":"logo","data":"***"}"#);
        assert!(res.is_err());
    }
}
