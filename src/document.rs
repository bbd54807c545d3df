//! Project document: the canonical JSON form of a project
//!
//! # Format
//!
//! ```json
//! {
//!   "size": 12,
//!   "sprites": [{"name": "Sprite 0", "size": 12, "data": [[null, 3], [3, null]]}],
//!   "palette": ["#1A1C2C", "#5D275D"],
//!   "selected": 0,
//!   "map": [-1, 0, -1],
//!   "transparent": false
//! }
//! ```
//!
//! `map`, `transparent`, `palette` and `sprites` may be missing. Loading is
//! all-or-nothing: one bad sprite rejects the whole document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Colour;
use crate::models::{Cell, Palette, Project, Sprite, SpriteBank, SpriteError, TileMap};

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Not JSON, or not shaped like a project document
    #[error("failed to parse project document: {0}")]
    Parse(#[from] serde_json::Error),
    /// A sprite's grid disagrees with its declared size
    #[error("sprite {index}: {source}")]
    SizeMismatch {
        index: usize,
        #[source]
        source: SpriteError,
    },
}

/// A sprite as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRecord {
    pub name: String,
    pub size: usize,
    pub data: Vec<Vec<Cell>>,
}

/// Serialized project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub size: usize,
    #[serde(default)]
    pub sprites: Vec<SpriteRecord>,
    #[serde(default)]
    pub palette: Vec<Colour>,
    #[serde(default)]
    pub selected: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<Vec<i32>>,
    #[serde(default)]
    pub transparent: bool,
}

impl ProjectDocument {
    /// Parse document text.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, DocumentError> {
        let json =
            if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }
}

/// Snapshot a project as a document.
pub fn serialize(project: &Project) -> ProjectDocument {
    ProjectDocument {
        size: project.size,
        sprites: project
            .sprites
            .iter()
            .map(|s| SpriteRecord { name: s.name().to_string(), size: s.size(), data: s.data().to_vec() })
            .collect(),
        palette: project.palette.colours().to_vec(),
        selected: project.selected_sprite_index(),
        map: Some(project.map.to_flat()),
        transparent: project.transparent,
    }
}

/// Rebuild a project from a document.
///
/// `map_width`/`map_height` give the map dimensions, which the document
/// doesn't carry; a missing map becomes an empty map of that size, and a
/// stored map with more cells than that gains rows instead of losing cells.
pub fn deserialize(
    doc: ProjectDocument,
    map_width: usize,
    map_height: usize,
) -> Result<Project, DocumentError> {
    let mut sprites = Vec::with_capacity(doc.sprites.len());
    for (index, record) in doc.sprites.into_iter().enumerate() {
        let mut sprite = Sprite::new(record.name, record.size);
        sprite
            .load_data(record.data)
            .map_err(|source| DocumentError::SizeMismatch { index, source })?;
        if record.size != doc.size {
            log::warn!(
                "sprite {} is {}x{} but project size is {}",
                index,
                record.size,
                record.size,
                doc.size
            );
        }
        sprites.push(sprite);
    }

    let mut bank = SpriteBank::new(sprites);
    if !bank.is_empty() && bank.select(doc.selected).is_err() {
        log::warn!("selected sprite {} out of range, selecting sprite 0", doc.selected);
    }

    let map = match doc.map {
        Some(cells) => TileMap::from_flat(cells, map_width, map_height),
        None => TileMap::new(map_width, map_height),
    };

    Ok(Project {
        size: doc.size,
        sprites: bank,
        palette: Palette::new(doc.palette),
        map,
        transparent: doc.transparent,
    })
}

/// Parse and rebuild in one step.
pub fn from_json(text: &str, map_width: usize, map_height: usize) -> Result<Project, DocumentError> {
    deserialize(ProjectDocument::parse(text)?, map_width, map_height)
}

/// Serialize straight to JSON text.
pub fn to_json(project: &Project, pretty: bool) -> Result<String, DocumentError> {
    serialize(project).to_json(pretty)
}
