//! The project aggregate.

use rand::Rng;

use super::bank::SpriteBank;
use super::palette::Palette;
use super::tilemap::TileMap;

/// Dimensions used when creating a fresh project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewProjectSettings {
    pub sprite_size: usize,
    pub bank_size: usize,
    pub palette_size: usize,
    pub map_width: usize,
    pub map_height: usize,
}

impl Default for NewProjectSettings {
    fn default() -> Self {
        Self { sprite_size: 12, bank_size: 128, palette_size: 16, map_width: 12, map_height: 6 }
    }
}

/// Everything that gets persisted and exported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Sprite edge length shared by the bank and the export grid
    pub size: usize,
    pub sprites: SpriteBank,
    pub palette: Palette,
    pub map: TileMap,
    /// Render empty cells transparent instead of black
    pub transparent: bool,
}

impl Project {
    /// Fresh project: random palette, blank sprites, empty map.
    pub fn generate<R: Rng + ?Sized>(settings: &NewProjectSettings, rng: &mut R) -> Self {
        Self {
            size: settings.sprite_size,
            sprites: SpriteBank::blank(settings.bank_size, settings.sprite_size),
            palette: Palette::random(settings.palette_size, rng),
            map: TileMap::new(settings.map_width, settings.map_height),
            transparent: false,
        }
    }

    /// Index of the selected sprite, 0 for an empty bank.
    pub fn selected_sprite_index(&self) -> usize {
        self.sprites.selected_index().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uses_settings() {
        let settings = NewProjectSettings {
            sprite_size: 8,
            bank_size: 4,
            palette_size: 5,
            map_width: 3,
            map_height: 2,
        };
        let project = Project::generate(&settings, &mut rand::thread_rng());
        assert_eq!(project.size, 8);
        assert_eq!(project.sprites.len(), 4);
        assert!(project.sprites.iter().all(|s| s.size() == 8));
        assert_eq!(project.palette.len(), 5);
        assert_eq!(project.map.len(), 6);
        assert!(!project.transparent);
        assert_eq!(project.selected_sprite_index(), 0);
    }

    #[test]
    fn test_default_settings_match_editor_defaults() {
        let settings = NewProjectSettings::default();
        assert_eq!(settings.sprite_size, 12);
        assert_eq!(settings.bank_size, 128);
        assert_eq!(settings.palette_size, 16);
        assert_eq!((settings.map_width, settings.map_height), (12, 6));
    }
}
