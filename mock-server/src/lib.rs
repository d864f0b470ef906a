use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, warn};

pub const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// A card as the mock keeps it: listing fields plus the render config
/// that `getCardData` hands out as a JSON string.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredCard {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub user_id: String,
    pub user_name: String,
    pub likes: u32,
    pub nsfw: bool,
    pub tags: Option<String>,
    pub data: Value,
}

impl StoredCard {
    pub fn new(id: u64, name: &str, category: &str, user_id: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            category: category.to_string(),
            user_id: user_id.to_string(),
            user_name: format!("user{user_id}"),
            likes: 0,
            nsfw: false,
            tags: None,
            data: json!({
                "width": 2010,
                "height": 2814,
                "version": "m15Regular",
                "frames": [{
                    "name": "Red Frame",
                    "src": "/img/frames/m15/regular/m15FrameR.png",
                    "masks": [],
                }],
                "text": {"title": {
                    "name": "Title",
                    "text": name,
                    "y": 0.0613,
                    "width": 0.8,
                    "height": 0.05,
                    "size": 0.038,
                }},
                "infoArtist": "Jane Doe",
                "infoSet": "MOCK",
                "infoNumber": format!("{id}"),
            }),
        }
    }

    pub fn likes(mut self, likes: u32) -> Self {
        self.likes = likes;
        self
    }

    pub fn nsfw(mut self) -> Self {
        self.nsfw = true;
        self
    }

    /// The gallery listing entry for this card.
    pub fn info(&self) -> Value {
        let nsfw = if self.nsfw { "1" } else { "0" };
        json!({
            "id": self.id.to_string(),
            "image_url": format!(
                "https://mtgcardbuilder.com/wp-content/uploads/cards/{}.png",
                self.id
            ),
            "category": self.category,
            "tags": self.tags,
            "likes": (self.likes > 0).then(|| self.likes.to_string()),
            "dislikes": null,
            "user_id": self.user_id,
            "user_name": self.user_name,
            "artist_name": "",
            "card_edition": "",
            "card_id": null,
            "email": "",
            "face": "single",
            "nsfw": nsfw,
            "pp_id": null,
            "prints_regular": "0",
            "search_card_name": self.name.to_lowercase(),
            "status": "1",
            "visual_type": "custom",
        })
    }
}

#[derive(Clone, Debug)]
pub struct Store {
    pub cards: Vec<StoredCard>,
    pub page_size: usize,
    /// When set, every call answers with this status.
    pub fail_with: Option<u16>,
}

impl Store {
    pub fn new(cards: Vec<StoredCard>) -> Self {
        Self {
            cards,
            page_size: DEFAULT_PAGE_SIZE,
            fail_with: None,
        }
    }

    /// Seven cards from two users across a few categories.
    pub fn sample() -> Self {
        Self::new(vec![
            StoredCard::new(101, "Shivan Dragon", "Creature", "17").likes(12),
            StoredCard::new(102, "Lightning Bolt", "Instant", "17").likes(40),
            StoredCard::new(103, "Chandra, Torch of Defiance", "Planeswalker", "17"),
            StoredCard::new(104, "Serra Angel", "Creature", "23").likes(3),
            StoredCard::new(105, "Forest", "Land", "23"),
            StoredCard::new(106, "Llanowar Elves", "creature", "23").likes(7),
            StoredCard::new(107, "Questionable Art", "Creature", "23").nsfw(),
        ])
    }
}

/// The store is fixed once the router is built.
pub type Db = Arc<Store>;

pub fn app() -> Router {
    app_with(Store::sample())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(store);
    Router::new().route(AJAX_PATH, post(ajax)).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

async fn ajax(State(store): State<Db>, Form(fields): Form<HashMap<String, String>>) -> Response {
    if let Some(status) = store.fail_with {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "mock failure").into_response();
    }

    let method = fields.get("method").map(String::as_str).unwrap_or_default();
    debug!(method, "ajax call");
    match method {
        "getCardData" => card_data(&store, &fields),
        "get_gallery_cards" => gallery_cards(&store, &fields),
        other => {
            warn!(method = other, "unknown method");
            // WordPress answers unroutable ajax calls with a bare 0
            (StatusCode::BAD_REQUEST, "0").into_response()
        }
    }
}

fn card_data(store: &Store, fields: &HashMap<String, String>) -> Response {
    let Some(id) = fields.get("id").and_then(|id| id.parse::<u64>().ok()) else {
        return (StatusCode::BAD_REQUEST, "0").into_response();
    };
    match store.cards.iter().find(|card| card.id == id) {
        Some(card) => Json(json!({ "data": card.data.to_string() })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "card not found" }))).into_response(),
    }
}

fn gallery_cards(store: &Store, fields: &HashMap<String, String>) -> Response {
    let category = fields.get("category").map(String::as_str).unwrap_or("all");
    let user = fields.get("showIsDashboard");
    let hide_nsfw = fields.get("nsfw").is_some_and(|v| v == "0");
    let page: usize = fields.get("cpage").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);

    let mut matching: Vec<&StoredCard> = store
        .cards
        .iter()
        .filter(|card| category == "all" || card.category.eq_ignore_ascii_case(category))
        .filter(|card| user.map_or(true, |u| &card.user_id == u))
        .filter(|card| !(hide_nsfw && card.nsfw))
        .collect();
    match fields.get("order").map(String::as_str) {
        Some("top") => matching.sort_by(|a, b| b.likes.cmp(&a.likes).then(b.id.cmp(&a.id))),
        _ => matching.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    let page_size = store.page_size.max(1);
    let total = matching.len().div_ceil(page_size).max(1);
    let data: Vec<Value> = matching
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(|card| card.info())
        .collect();

    Json(json!({
        "current": page,
        "total": total,
        "data": data,
        "is": "0",
        "liked": [],
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn info_renders_listing_strings() {
        let info = StoredCard::new(9, "Shivan Dragon", "Creature", "17").likes(5).info();
        assert_eq!(info["id"], "9");
        assert_eq!(info["likes"], "5");
        assert_eq!(info["nsfw"], "0");
        assert_eq!(info["search_card_name"], "shivan dragon");
        assert!(info["dislikes"].is_null());
    }

    #[test]
    fn info_without_likes_is_null() {
        let info = StoredCard::new(9, "Forest", "Land", "17").info();
        assert!(info["likes"].is_null());
    }

    #[test]
    fn stored_data_mentions_card_name() {
        let card = StoredCard::new(9, "Forest", "Land", "17");
        assert_eq!(card.data["text"]["title"]["text"], "Forest");
        assert_eq!(card.data["infoNumber"], "9");
    }

    #[test]
    fn sample_store_has_two_users() {
        let store = Store::sample();
        assert_eq!(store.cards.len(), 7);
        assert_eq!(store.cards.iter().filter(|c| c.user_id == "17").count(), 3);
        assert_eq!(store.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn card_data_requires_numeric_id() {
        let store = Store::sample();
        let resp = card_data(&store, &fields(&[("method", "getCardData"), ("id", "abc")]));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn gallery_cards_out_of_range_page_still_answers() {
        let store = Store::sample();
        let resp = gallery_cards(&store, &fields(&[("cpage", "99")]));
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
