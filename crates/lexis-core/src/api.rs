//! Response boundary consumed by the HTTP layer: every operation returns a
//! status code and a JSON body, never a bare error.

use lexis_types::Requester;
use serde::Serialize;
use serde_json::{Value, json};

use crate::audio::AudioStore;
use crate::error::{LookupError, MediaError};
use crate::icon::IconStore;
use crate::lookup::{LookupOutcome, WordLookupService};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(500, e.to_string()),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

impl From<LookupError> for ApiResponse {
    fn from(e: LookupError) -> Self {
        Self::error(e.status(), e.to_string())
    }
}

impl From<MediaError> for ApiResponse {
    fn from(e: MediaError) -> Self {
        Self::error(e.status(), e.to_string())
    }
}

pub async fn lookup_word(
    service: &WordLookupService,
    word: &str,
    requester: Option<&Requester>,
) -> ApiResponse {
    let outcome = match requester {
        Some(requester) => service.lookup_as(word, requester).await,
        None => service.lookup(word).await,
    };

    match outcome {
        Ok(LookupOutcome::Found(view)) => ApiResponse::ok(view),
        Ok(LookupOutcome::NotFound { suggestions }) => ApiResponse {
            status: 404,
            body: json!({
                "error": format!("No dictionary entry for {word:?}"),
                "suggestions": suggestions,
            }),
        },
        Err(e) => e.into(),
    }
}

pub async fn upload_icon(
    store: &IconStore,
    entry_id: &str,
    image: &[u8],
    requester: &Requester,
) -> ApiResponse {
    into_response(store.upload(entry_id, image, requester).await.map(|icon| icon.view()))
}

pub async fn approve_icon(store: &IconStore, id: u64, requester: &Requester) -> ApiResponse {
    into_response(store.approve(id, requester).await.map(|icon| icon.view()))
}

pub async fn pending_icons(store: &IconStore, requester: &Requester) -> ApiResponse {
    into_response(store.pending(requester).await)
}

pub async fn pronunciation(store: &AudioStore, key: &str) -> ApiResponse {
    into_response(store.get(key).await.map(|audio| audio.view()))
}

fn into_response<T: Serialize>(result: Result<T, MediaError>) -> ApiResponse {
    match result {
        Ok(body) => ApiResponse::ok(body),
        Err(e) => e.into(),
    }
}
