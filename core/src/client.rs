//! Stateless request builder and response parser for the card builder API.
//!
//! # Design
//! Every remote call is a form-encoded POST to one endpoint, discriminated by
//! a `method` field. `CardBuilderClient::build_request` covers any method;
//! the `build_*`/`parse_*` pairs for `getCardData` and `get_gallery_cards`
//! layer typed shapes on top of it. Nothing here touches the network: see
//! `Session` for the part that drives a `Transport`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport, FORM_CONTENT_TYPE,
};
use crate::types::{CardData, GalleryOptions, GalleryPage};

pub const GET_CARD_DATA: &str = "getCardData";
pub const GET_GALLERY_CARDS: &str = "get_gallery_cards";

#[derive(Serialize)]
struct CardDataParams {
    id: u64,
}

/// `getCardData` wraps the real payload in a JSON string.
#[derive(Deserialize)]
struct CardDataEnvelope {
    data: String,
}

/// Synchronous, stateless client for the card builder API.
#[derive(Debug, Clone, Default)]
pub struct CardBuilderClient {
    config: ClientConfig,
}

impl CardBuilderClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a POST for `method` carrying `params`.
    ///
    /// `params` must serialize to a JSON object. The body is the form
    /// encoding of `method`, then `action` when configured, then each param
    /// in key order. A param named `method` or `action` overrides the fixed
    /// field in place, so every key is sent once.
    pub fn build_request<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<HttpRequest, ApiError> {
        let mut pairs = vec![("method".to_string(), method.to_string())];
        if let Some(action) = &self.config.action {
            pairs.push(("action".to_string(), action.clone()));
        }
        let fixed = pairs.len();
        for (key, value) in form_pairs(params)? {
            match pairs[..fixed].iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }

        let body = serde_urlencoded::to_string(&pairs)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        debug!(method, endpoint = %self.config.endpoint, "built request");
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.config.endpoint.clone(),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body,
        })
    }

    /// Parse any response into raw JSON.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_json(response)
    }

    pub fn build_get_card_data(&self, id: u64) -> Result<HttpRequest, ApiError> {
        self.build_request(GET_CARD_DATA, &CardDataParams { id })
    }

    /// Parse a `getCardData` response, decoding the nested `data` string.
    pub fn parse_get_card_data(&self, response: HttpResponse) -> Result<CardData, ApiError> {
        let envelope: CardDataEnvelope = self.parse_json(response)?;
        serde_json::from_str(&envelope.data).map_err(ApiError::decode)
    }

    pub fn build_get_cards(&self, options: &GalleryOptions) -> Result<HttpRequest, ApiError> {
        self.build_request(GET_GALLERY_CARDS, options)
    }

    pub fn parse_get_cards(&self, response: HttpResponse) -> Result<GalleryPage, ApiError> {
        self.parse_json(response)
    }

    fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        debug!(status = response.status, bytes = response.body.len(), "parsing response");
        serde_json::from_str(&response.body).map_err(ApiError::decode)
    }
}

/// Map non-success status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "card builder returned an error status");
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Flatten a serializable object into form fields.
///
/// Nulls are dropped, booleans are sent as `true`/`false` like any other
/// form encoder would, nested arrays and objects are sent as JSON text.
fn form_pairs<P: Serialize + ?Sized>(params: &P) -> Result<Vec<(String, String)>, ApiError> {
    let value =
        serde_json::to_value(params).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::SerializationError(format!(
                "params must be an object, got {other}"
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            nested => nested.to_string(),
        };
        pairs.push((key, text));
    }
    Ok(pairs)
}

/// A client bound to a transport. Each call is one blocking round trip.
#[derive(Clone)]
pub struct Session<T = UreqTransport> {
    client: CardBuilderClient,
    transport: T,
}

impl Session<UreqTransport> {
    /// Session against the public endpoint over a default `ureq` agent.
    pub fn connect() -> Self {
        Self::new(CardBuilderClient::default(), UreqTransport::new())
    }
}

impl<T: Transport> Session<T> {
    pub fn new(client: CardBuilderClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CardBuilderClient {
        &self.client
    }

    /// Call any remote method and return its raw JSON response.
    pub fn request<P: Serialize + ?Sized>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<Value, ApiError> {
        let req = self.client.build_request(method, params)?;
        self.client.parse_response(self.transport.execute(&req)?)
    }

    pub fn get_card_data(&self, id: u64) -> Result<CardData, ApiError> {
        let req = self.client.build_get_card_data(id)?;
        self.client.parse_get_card_data(self.transport.execute(&req)?)
    }

    pub fn get_cards(&self, options: &GalleryOptions) -> Result<GalleryPage, ApiError> {
        let req = self.client.build_get_cards(options)?;
        self.client.parse_get_cards(self.transport.execute(&req)?)
    }
}
