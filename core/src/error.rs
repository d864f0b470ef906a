//! Error types for the card builder client.
//!
//! # Design
//! The remote endpoint has no notion of "not found" at the HTTP level, so
//! every non-2xx status lands in `HttpError` with the raw status and body.
//! Decode failures cover both the outer response body and the JSON string
//! nested inside a `getCardData` payload.

use thiserror::Error;

/// Errors returned by the client, its transports and the gallery walker.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not complete the exchange (DNS, connect, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request parameters could not be form-encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A page picked for random sampling came back without entries.
    #[error("gallery page {page} has no cards")]
    EmptyGallery { page: u32 },

    /// A gallery reported more pages than the walker is allowed to fetch.
    #[error("gallery has {pages} pages, limit is {limit}")]
    TooManyPages { pages: u32, limit: u32 },
}

impl ApiError {
    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        ApiError::DeserializationError(err.to_string())
    }
}
