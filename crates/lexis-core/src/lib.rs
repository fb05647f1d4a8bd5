pub mod api;
pub mod audio;
pub mod blob;
pub mod error;
pub mod flight;
pub mod icon;
pub mod lookup;
pub mod response;
pub mod store;

#[cfg(test)]
mod tests;

pub use audio::AudioStore;
pub use blob::BlobStore;
pub use error::{LookupError, MediaError, StoreError};
pub use icon::IconStore;
pub use lookup::{LookupOutcome, WordLookupService};
pub use response::{DictionaryResponse, EntryPayload};
pub use store::{MemoryRepository, Repository};
