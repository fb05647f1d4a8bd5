use serde::Deserialize;
use serde_json::{Map, Value};

/// Decoded body of a dictionary API call
#[derive(Debug, Clone, PartialEq)]
pub enum DictionaryResponse {
    Entries(Vec<EntryPayload>),
    /// "Did you mean" mode: the API answers with plain strings
    Suggestions(Vec<String>),
    Empty,
}

/// One entry object together with its `meta.id`
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPayload {
    pub id: String,
    pub data: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResponse {
    Suggestions(Vec<String>),
    Entries(Vec<Map<String, Value>>),
    Other(Value),
}

impl EntryPayload {
    fn from_object(object: Map<String, Value>) -> Option<Self> {
        let id = object
            .get("meta")
            .and_then(|meta| meta.get("id"))
            .and_then(Value::as_str)?
            .to_string();

        Some(Self {
            id,
            data: Value::Object(object),
        })
    }
}

impl DictionaryResponse {
    /// Decode a raw body. Only malformed JSON is an error; any well-formed
    /// shape that is neither a list of strings nor a list of objects is `Empty`.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let response = match serde_json::from_str::<RawResponse>(raw)? {
            RawResponse::Suggestions(suggestions) if !suggestions.is_empty() => {
                DictionaryResponse::Suggestions(suggestions)
            }
            RawResponse::Entries(objects) => {
                let entries: Vec<EntryPayload> = objects
                    .into_iter()
                    .filter_map(EntryPayload::from_object)
                    .collect();

                if entries.is_empty() {
                    DictionaryResponse::Empty
                } else {
                    DictionaryResponse::Entries(entries)
                }
            }
            RawResponse::Suggestions(_) | RawResponse::Other(_) => DictionaryResponse::Empty,
        };

        Ok(response)
    }
}
