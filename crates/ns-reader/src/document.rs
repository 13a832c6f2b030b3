use bson::Document;
use serde::Deserialize;

pub type DecodeFailure = Box<dyn std::error::Error + Send + Sync>;

/// Turns a record payload into a structured document.
pub trait DocumentDecoder {
    type Document;

    fn decode(&self, payload: &[u8]) -> Result<Self::Document, DecodeFailure>;
}

/// BSON payloads, as stored for index definitions.
///
/// Records may be padded past the end of the document, so only the
/// length-prefixed document itself is decoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct BsonDecoder;

impl DocumentDecoder for BsonDecoder {
    type Document = Document;

    fn decode(&self, payload: &[u8]) -> Result<Document, DecodeFailure> {
        let Some(prefix) = payload.get(..4) else {
            return Err(format!("payload of {} bytes has no length prefix", payload.len()).into());
        };
        let declared = i32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
        let doc_len = usize::try_from(declared)
            .ok()
            .filter(|n| (5..=payload.len()).contains(n))
            .ok_or_else(|| {
                format!(
                    "document length {declared} does not fit payload of {} bytes",
                    payload.len()
                )
            })?;
        Ok(bson::from_slice::<Document>(&payload[..doc_len])?)
    }
}

/// Index definition as stored in `system.indexes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexInfo {
    pub key: Document,
    pub name: String,
    pub ns: String,
    #[serde(default)]
    pub v: Option<i32>,
    #[serde(default)]
    pub unique: Option<bool>,
}

impl IndexInfo {
    pub fn from_document(doc: &Document) -> Result<Self, bson::de::Error> {
        bson::from_document(doc.clone())
    }
}
