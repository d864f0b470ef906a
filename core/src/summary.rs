//! Compact projection of a card's render configuration.
//!
//! `CardData` is mostly geometry; `CardSummary` keeps what identifies a
//! card: its frames, collector info, rules text and ability blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{AbilityBlock, CardData, Frame};

/// Frame sources longer than this are inline data URLs, not links.
pub const MAX_FRAME_SRC_LEN: usize = 1000;

/// Set symbols are only kept when the builder itself hosts them.
pub const HOSTED_SYMBOL_PREFIX: &str = "https://www.mtgcardbuilder.com/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub category: Option<String>,
    pub name: String,
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoSummary {
    pub artist: String,
    pub language: String,
    pub number: String,
    pub rarity: String,
    pub set: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySummary {
    pub abilities: Vec<String>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSummary {
    pub name: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSummary {
    pub frames: Vec<FrameSummary>,
    pub info: InfoSummary,
    pub planeswalker: Option<AbilitySummary>,
    pub saga: Option<AbilitySummary>,
    pub set_symbol: Option<String>,
    pub text: BTreeMap<String, TextSummary>,
    pub version: String,
}

impl From<&Frame> for FrameSummary {
    fn from(frame: &Frame) -> Self {
        Self {
            category: frame.cat.clone(),
            name: frame.name.clone(),
            src: (frame.src.len() <= MAX_FRAME_SRC_LEN).then(|| frame.src.clone()),
        }
    }
}

impl From<&AbilityBlock> for AbilitySummary {
    fn from(block: &AbilityBlock) -> Self {
        Self {
            abilities: block.abilities.clone(),
            count: block.count,
        }
    }
}

impl CardData {
    pub fn summary(&self) -> CardSummary {
        CardSummary {
            frames: self.frames.iter().map(FrameSummary::from).collect(),
            info: InfoSummary {
                artist: self.info_artist.clone(),
                language: self.info_language.clone(),
                number: self.info_number.clone(),
                rarity: self.info_rarity.clone(),
                set: self.info_set.clone(),
                year: self.info_year.clone(),
            },
            planeswalker: self.planeswalker.as_ref().map(AbilitySummary::from),
            saga: self.saga.as_ref().map(AbilitySummary::from),
            set_symbol: self
                .set_symbol_source
                .starts_with(HOSTED_SYMBOL_PREFIX)
                .then(|| self.set_symbol_source.clone()),
            text: self
                .text
                .iter()
                .map(|(id, block)| {
                    let name = (!block.name.is_empty()).then(|| block.name.clone());
                    (id.clone(), TextSummary { name, text: block.text.clone() })
                })
                .collect(),
            version: self.version.clone(),
        }
    }
}
