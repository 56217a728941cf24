//! Remote reading-list providers.
//!
//! The controller only talks to the [`ItemSource`] trait; [`pocket`] is the
//! HTTP implementation used by the binary.

pub mod pocket;

use thiserror::Error;

use crate::core::item::Item;

/// Supplies the ordered snapshot and accepts mutations.
///
/// Every call blocks until the provider answers.
pub trait ItemSource {
    fn retrieve(&mut self) -> Result<Vec<Item>, SourceError>;
    fn archive(&mut self, item_id: &str) -> Result<(), SourceError>;
    fn delete(&mut self, item_id: &str) -> Result<(), SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Http { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{action} of item {item_id} was rejected")]
    Rejected {
        action: &'static str,
        item_id: String,
    },
}
