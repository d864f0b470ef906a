//! Client for the card builder `admin-ajax.php` API.
//!
//! # Overview
//! Every call is a form-encoded POST carrying a `method` discriminator.
//! `CardBuilderClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern); `Session`
//! pairs it with a `Transport` to perform one blocking round trip per call.
//!
//! # Design
//! - `CardBuilderClient` is stateless: it holds only its `ClientConfig`.
//! - `getCardData` responses are decoded twice, once for the envelope and
//!   once for the JSON string in its `data` field.
//! - Response shapes trust the server: missing fields default, unknown
//!   fields are kept.
//! - No retries, caching or rate limiting. Errors propagate as `ApiError`.

pub mod client;
pub mod config;
pub mod error;
pub mod gallery;
pub mod http;
pub mod summary;
pub mod types;

pub use client::{CardBuilderClient, Session, GET_CARD_DATA, GET_GALLERY_CARDS};
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::ApiError;
pub use gallery::{
    Card, CardFetcher, Category, Gallery, GalleryQuery, Language, Order, UserCards,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use summary::CardSummary;
pub use types::{CardData, CardInfo, GalleryOptions, GalleryPage};
