// Every wire message and state record goes through bincode 2 with the standard configuration
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Serialize data using bincode 2.0 with standard configuration
pub fn serialize<T: Serialize + bincode::Encode>(data: &T) -> Result<Vec<u8>> {
    let config = bincode::config::standard();
    bincode::encode_to_vec(data, config)
        .map_err(|e| LedgerError::Serialization(format!("Serialization failed: {e}")))
}

/// Deserialize data using bincode 2.0 with standard configuration
pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de> + bincode::Decode<()>,
{
    let config = bincode::config::standard();
    let (data, read) = bincode::decode_from_slice(bytes, config)
        .map_err(|e| LedgerError::Serialization(format!("Deserialization failed: {e}")))?;
    if read != bytes.len() {
        return Err(LedgerError::Serialization(format!(
            "Deserialization left {} trailing bytes",
            bytes.len() - read
        )));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
    struct TestRecord {
        public_key: String,
        name: String,
        addresses: Vec<String>,
    }

    #[test]
    fn test_serialize_deserialize() {
        let original = TestRecord {
            public_key: "02ab".to_string(),
            name: "Acme Clinic".to_string(),
            addresses: vec!["a".to_string(), "b".to_string()],
        };

        let serialized = serialize(&original).expect("Serialization should work");
        let deserialized: TestRecord = deserialize(&serialized).expect("Deserialization should work");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let record = TestRecord {
            public_key: "02ab".to_string(),
            name: "n".to_string(),
            addresses: vec![],
        };
        assert_eq!(serialize(&record).unwrap(), serialize(&record).unwrap());
    }

    #[test]
    fn test_deserialize_invalid_data() {
        let invalid_bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        let result: Result<TestRecord> = deserialize(&invalid_bytes);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_trailing_bytes() {
        let mut bytes = serialize(&7u32).unwrap();
        bytes.push(0);
        let result: Result<u32> = deserialize(&bytes);
        assert!(result.is_err());
    }
}
