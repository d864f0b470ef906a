//! Typed gallery filters and a page walker on top of `Session::get_cards`.
//!
//! # Design
//! `GalleryQuery` is what a caller means; `GalleryOptions` is what the wire
//! wants. `Gallery` turns one into the other per page and walks pages one
//! at a time. Walking is opt-in: `Session::get_cards` never iterates.
//!
//! `CardFetcher` sits one level up and samples the gallery, collecting
//! cards grouped by the user who made them. Randomness comes from a
//! caller-supplied `rand::Rng` so runs can be seeded.

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::Session;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{CardData, CardInfo, GalleryOptions, GalleryPage};

/// Galleries larger than this are refused by `fetch_all_cards`.
pub const DEFAULT_MAX_PAGES: u32 = 20;

/// Users tried by `CardFetcher::add_random_user_gallery` before giving up.
pub const USER_GALLERY_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Creature,
    Planeswalker,
    Instant,
    Sorcery,
    Land,
    Enchantment,
    Artifact,
    Token,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Creature => "creature",
            Category::Planeswalker => "planeswalker",
            Category::Instant => "instant",
            Category::Sorcery => "sorcery",
            Category::Land => "land",
            Category::Enchantment => "enchantment",
            Category::Artifact => "artifact",
            Category::Token => "token",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Languages the gallery can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Ja,
    Ko,
    Ru,
    Zhs,
    Zht,
    Ph,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Ru => "ru",
            Language::Zhs => "zhs",
            Language::Zht => "zht",
            Language::Ph => "ph",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Recent,
    Top,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Recent => "recent",
            Order::Top => "top",
        }
    }
}

/// Gallery filter. `category: None` means every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<Category>,
    pub language: Option<Language>,
    pub nsfw: Option<bool>,
    pub order: Order,
    /// Real cards instead of custom ones.
    pub real: bool,
    /// Restrict to one user's dashboard.
    pub user_id: Option<String>,
}

impl GalleryQuery {
    pub fn page_options(&self, page: u32) -> GalleryOptions {
        GalleryOptions {
            category: Some(self.category.map_or("all", Category::as_str).to_string()),
            cpage: Some(page),
            lang: self.language.map(|l| l.code().to_string()),
            nsfw: self.nsfw.map(u8::from),
            order: Some(self.order.as_str().to_string()),
            other: Some(u8::from(!self.real)),
            show_is_dashboard: self.user_id.clone(),
            ..GalleryOptions::default()
        }
    }

    pub fn for_user(&self, user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..self.clone()
        }
    }
}

/// A gallery entry with its full render data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub info: CardInfo,
    pub data: CardData,
}

/// Walks the pages of one gallery query.
pub struct Gallery<'s, T: Transport> {
    session: &'s Session<T>,
    query: GalleryQuery,
    max_pages: u32,
}

impl<'s, T: Transport> Gallery<'s, T> {
    pub fn new(session: &'s Session<T>, query: GalleryQuery) -> Self {
        Self {
            session,
            query,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn query(&self) -> &GalleryQuery {
        &self.query
    }

    /// Fetch one page. Categories come back in mixed case and are lowered.
    pub fn fetch_page(&self, page: u32) -> Result<GalleryPage, ApiError> {
        let mut result = self.session.get_cards(&self.query.page_options(page))?;
        result.lowercase_categories();
        debug!(page, entries = result.len(), "fetched gallery page");
        Ok(result)
    }

    pub fn page_count(&self) -> Result<u32, ApiError> {
        self.fetch_page(1)?
            .total()
            .ok_or_else(|| ApiError::DeserializationError("gallery page has no total".to_string()))
    }

    /// Every card on one page together with its render data.
    pub fn fetch_cards_in_page(&self, page: u32) -> Result<BTreeMap<String, Card>, ApiError> {
        let mut cards = BTreeMap::new();
        for info in self.fetch_page(page)?.entries() {
            let id = entry_id(&info)?;
            let data = self.session.get_card_data(parse_card_id(&id)?)?;
            cards.insert(id, Card { info, data });
        }
        Ok(cards)
    }

    /// Every card in the gallery, keyed by card id.
    pub fn fetch_all_cards(&self) -> Result<BTreeMap<String, Card>, ApiError> {
        let pages = self.page_count()?;
        if pages > self.max_pages {
            return Err(ApiError::TooManyPages {
                pages,
                limit: self.max_pages,
            });
        }

        info!(pages, user = ?self.query.user_id, "walking gallery");
        let mut cards = BTreeMap::new();
        for page in 1..=pages {
            cards.extend(self.fetch_cards_in_page(page)?);
        }
        Ok(cards)
    }

    /// A random entry from a random page.
    pub fn fetch_random_card_info<R>(&self, rng: &mut R) -> Result<CardInfo, ApiError>
    where
        R: Rng + ?Sized,
    {
        let pages = self.page_count()?.max(1);
        let page = rng.gen_range(1..=pages);
        self.fetch_page(page)?
            .entries()
            .choose(rng)
            .cloned()
            .ok_or(ApiError::EmptyGallery { page })
    }
}

/// Cards grouped by user id, then by card id.
pub type UserCards = BTreeMap<String, BTreeMap<String, Card>>;

/// Samples the gallery and collects cards per user.
///
/// The query's `user_id` is ignored; the fetcher sets it per user when it
/// walks a user's own gallery.
pub struct CardFetcher<'s, T: Transport> {
    session: &'s Session<T>,
    query: GalleryQuery,
    max_pages: u32,
    users: UserCards,
}

impl<'s, T: Transport> CardFetcher<'s, T> {
    pub fn new(session: &'s Session<T>, query: GalleryQuery) -> Self {
        Self {
            session,
            query: GalleryQuery {
                user_id: None,
                ..query
            },
            max_pages: DEFAULT_MAX_PAGES,
            users: BTreeMap::new(),
        }
    }

    /// Page limit for each user gallery walked.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn users(&self) -> &UserCards {
        &self.users
    }

    pub fn into_users(self) -> UserCards {
        self.users
    }

    /// Start tracking a user. Cards already collected for them are kept.
    pub fn add_user(&mut self, user_id: &str) {
        self.users.entry(user_id.to_string()).or_default();
    }

    /// Track the author of a random gallery card and return their id.
    pub fn add_random_user<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, ApiError> {
        let info = self.gallery(self.query.clone()).fetch_random_card_info(rng)?;
        let user_id = entry_user(&info)?;
        self.add_user(&user_id);
        Ok(user_id)
    }

    /// Collect every card of a random user.
    ///
    /// Users whose gallery has too many pages are skipped, up to
    /// `USER_GALLERY_ATTEMPTS` users in total. When a language is set, only
    /// cards in that language or with no language are kept.
    pub fn add_random_user_gallery<R>(&mut self, rng: &mut R) -> Result<String, ApiError>
    where
        R: Rng + ?Sized,
    {
        let mut attempt = 1;
        loop {
            let user_id = self.add_random_user(&mut *rng)?;
            match self.gallery(self.query.for_user(&user_id)).fetch_all_cards() {
                Ok(cards) => {
                    let language = self.query.language;
                    let kept: Vec<_> = cards
                        .into_iter()
                        .filter(|(_, card)| matches_language(card, language))
                        .collect();
                    debug!(user = %user_id, cards = kept.len(), "collected user gallery");
                    self.users.entry(user_id.clone()).or_default().extend(kept);
                    return Ok(user_id);
                }
                Err(ApiError::TooManyPages { pages, .. }) if attempt < USER_GALLERY_ATTEMPTS => {
                    warn!(attempt, user = %user_id, pages, "user gallery too large, skipping");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Collect one random card under its author. Returns the card id.
    pub fn add_random_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, ApiError> {
        let info = self.gallery(self.query.clone()).fetch_random_card_info(rng)?;
        let user_id = entry_user(&info)?;
        let id = entry_id(&info)?;
        let data = self.session.get_card_data(parse_card_id(&id)?)?;
        self.users
            .entry(user_id)
            .or_default()
            .insert(id.clone(), Card { info, data });
        Ok(id)
    }

    fn gallery(&self, query: GalleryQuery) -> Gallery<'s, T> {
        Gallery::new(self.session, query).max_pages(self.max_pages)
    }
}

/// Cards without a language always match.
fn matches_language(card: &Card, language: Option<Language>) -> bool {
    let Some(language) = language else {
        return true;
    };
    let card_language = card.data.info_language.to_lowercase();
    card_language.is_empty() || card_language == language.code()
}

fn entry_id(info: &CardInfo) -> Result<String, ApiError> {
    info.id()
        .ok_or_else(|| ApiError::DeserializationError("gallery entry has no id".to_string()))
}

fn entry_user(info: &CardInfo) -> Result<String, ApiError> {
    info.user_id()
        .ok_or_else(|| ApiError::DeserializationError("gallery entry has no user_id".to_string()))
}

fn parse_card_id(id: &str) -> Result<u64, ApiError> {
    id.parse()
        .map_err(|_| ApiError::DeserializationError(format!("card id {id:?} is not numeric")))
}
