//! Response and parameter shapes for the card builder API.
//!
//! # Design
//! The server owns these shapes and the client trusts it. `CardData` and
//! its layers deserialize with `#[serde(default)]` so absent fields fall
//! back to empty values, and fields this crate does not model are kept in
//! an `extra` map. Gallery listings go further: `GalleryPage` and
//! `CardInfo` hold the raw JSON object and read typed values out of it on
//! demand, so a listing round-trips byte for byte whatever its field types.
//!
//! Geometry is `f64` throughout because the builder stores positions as
//! fractions of the card size.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Position and size of a layer, relative to the card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Set symbol bounds carry an alignment on top of the usual box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolBounds {
    #[serde(flatten)]
    pub bounds: Bounds,
    pub vertical: String,
    pub horizontal: String,
}

/// One line of the collector info strip at the bottom of the card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottomInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    pub color: String,
    pub font: String,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub one_line: bool,
    pub outline_width: f64,
    pub size: f64,
    pub text: String,
    pub width: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottomInfoSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_left: Option<BottomInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mid_left: Option<BottomInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<BottomInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<BottomInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizards: Option<BottomInfo>,
    /// Lines added by newer frame packs.
    #[serde(flatten)]
    pub other: BTreeMap<String, BottomInfo>,
}

/// A frame layer. `src` is a URL or an inline data URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    pub name: String,
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complementary: Option<Vec<i64>>,
    pub image: Value,
    pub masks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A positioned, styled text field (title, type line, rules text, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextBlock {
    pub name: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_line: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_y: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Loyalty abilities of a planeswalker, or chapters of a saga.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityBlock {
    pub abilities: Vec<String>,
    pub count: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full render configuration of one card, as stored by the builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardData {
    pub width: f64,
    pub height: f64,
    pub version: String,

    pub art_source: String,
    pub art_x: f64,
    pub art_y: f64,
    pub art_zoom: f64,
    pub art_rotate: String,
    pub art_bounds: Bounds,

    pub art_overlay_source: String,
    pub art_overlay_x: f64,
    pub art_overlay_y: f64,
    pub art_overlay_zoom: f64,
    pub art_overlay_rotate: f64,

    pub frames: Vec<Frame>,
    pub text: BTreeMap<String, TextBlock>,
    pub bottom_info: BottomInfoSet,

    pub mana_symbols: Vec<Value>,
    pub custom_mana_symbols: Vec<Value>,

    pub set_symbol_source: String,
    pub set_symbol_x: f64,
    pub set_symbol_y: f64,
    pub set_symbol_zoom: f64,
    pub set_symbol_bounds: SymbolBounds,

    pub watermark_source: String,
    pub watermark_x: f64,
    pub watermark_y: f64,
    pub watermark_zoom: f64,
    pub watermark_bounds: Bounds,
    pub watermark_left: String,
    pub watermark_right: String,
    pub watermark_opacity: f64,

    pub info_artist: String,
    pub info_language: String,
    pub info_number: String,
    pub info_rarity: String,
    pub info_set: String,
    pub info_year: String,

    pub illus: String,
    pub signature1: String,
    pub signature2: String,

    pub margins: bool,
    pub margin_x: f64,
    pub margin_y: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub planeswalker: Option<AbilityBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saga: Option<AbilityBlock>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Summary of one card as listed in the gallery.
///
/// The entry is kept exactly as the server sent it. Accessors read through
/// to the raw object and accept counters and ids as either strings
/// (`"42"`) or numbers (`42`); a field that is absent or of another type
/// reads as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardInfo {
    raw: Map<String, Value>,
}

impl CardInfo {
    pub fn id(&self) -> Option<String> {
        self.raw.get("id").and_then(text)
    }

    pub fn user_id(&self) -> Option<String> {
        self.raw.get("user_id").and_then(text)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.str_field("user_name")
    }

    pub fn image_url(&self) -> Option<&str> {
        self.str_field("image_url")
    }

    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    pub fn card_id(&self) -> Option<&str> {
        self.str_field("card_id")
    }

    pub fn visual_type(&self) -> Option<&str> {
        self.str_field("visual_type")
    }

    pub fn tags(&self) -> Option<&str> {
        self.str_field("tags")
    }

    /// Comma separated tags, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn likes(&self) -> Option<u64> {
        self.raw.get("likes").and_then(count)
    }

    pub fn dislikes(&self) -> Option<u64> {
        self.raw.get("dislikes").and_then(count)
    }

    pub fn is_nsfw(&self) -> bool {
        self.raw.get("nsfw").is_some_and(flag)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for CardInfo {
    fn from(raw: Map<String, Value>) -> Self {
        Self { raw }
    }
}

/// One page of the gallery listing, kept as the server sent it.
///
/// Serializing a `GalleryPage` yields the original object unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GalleryPage {
    raw: Map<String, Value>,
}

impl GalleryPage {
    pub fn current(&self) -> Option<u32> {
        self.raw.get("current").and_then(count).and_then(|n| u32::try_from(n).ok())
    }

    /// Number of pages the gallery reports for the current filter.
    pub fn total(&self) -> Option<u32> {
        self.raw.get("total").and_then(count).and_then(|n| u32::try_from(n).ok())
    }

    /// The listed cards. Entries that are not objects are skipped.
    pub fn entries(&self) -> Vec<CardInfo> {
        self.data()
            .iter()
            .filter_map(|entry| entry.as_object().cloned().map(CardInfo::from))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    pub fn liked(&self) -> &[Value] {
        self.raw.get("liked").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub(crate) fn lowercase_categories(&mut self) {
        if let Some(Value::Array(entries)) = self.raw.get_mut("data") {
            for entry in entries {
                if let Some(Value::String(category)) = entry.get_mut("category") {
                    *category = category.to_lowercase();
                }
            }
        }
    }

    fn data(&self) -> &[Value] {
        self.raw.get("data").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
    }
}

/// A string, or a number rendered in decimal.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A non-negative integer given as a number or a numeric string.
fn count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `"1"`, `1` and `true` are set; anything else is not.
fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        other => count(other).is_some_and(|n| n != 0),
    }
}

/// Wire options for `get_gallery_cards`. Unset options are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dashboard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_is_dashboard: Option<String>,
}
