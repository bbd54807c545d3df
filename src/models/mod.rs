//! Data models for a pixed project (palette, sprites, bank, tile map)

mod bank;
mod palette;
mod project;
mod sprite;
mod tilemap;

// Re-export all public types
pub use bank::{BankError, SpriteBank};
pub use palette::{BulkDecode, Palette, PaletteError, Substitution};
pub use project::{NewProjectSettings, Project};
pub use sprite::{Cell, Sprite, SpriteError};
pub use tilemap::{TileMap, TileMapError, EMPTY_TILE};
