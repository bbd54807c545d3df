//! Project store: the one owner of mutable project state
//!
//! Every mutation goes through a [`ProjectStore`] method. When the mutation
//! completes the store tells its listeners what changed, tagged with the
//! [`Region`] affected, so views can redraw just that part. The store also
//! keeps the tile map thumbnail cache in step with palette and sprite edits.

use image::RgbaImage;
use rand::Rng;
use thiserror::Error;

use crate::color::Colour;
use crate::document::{self, DocumentError, ProjectDocument};
use crate::models::{
    BankError, BulkDecode, Cell, NewProjectSettings, PaletteError, Project, Sprite, SpriteError,
    TileMapError,
};
use crate::storage::{KeyValueStore, StorageError, PROJECT_KEY};
use crate::thumbnails::ThumbnailCache;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no project loaded")]
    NoProject,
    #[error("cell ({x}, {y}) out of bounds for {size}x{size} sprite")]
    CellOutOfBounds { x: usize, y: usize, size: usize },
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Map(#[from] TileMapError),
    #[error(transparent)]
    Sprite(#[from] SpriteError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Part of the project a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Palette,
    Sprites,
    Map,
    Project,
}

/// Notification sent to listeners after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A project was created, loaded or imported
    ProjectReplaced,
    /// The project was erased
    ProjectUnloaded,
    Transparency(bool),
    PaletteColour(usize),
    PaletteBulk(Vec<usize>),
    PaletteSelection(usize),
    /// Individual cells of one sprite
    SpriteCells { sprite: usize, cells: Vec<(usize, usize)> },
    /// Whole sprite content (tools, paste)
    Sprite(usize),
    SpriteRenamed(usize),
    SpriteSelection(usize),
    MapCell(usize),
    MapCleared,
}

impl Change {
    pub fn region(&self) -> Region {
        match self {
            Change::ProjectReplaced | Change::ProjectUnloaded | Change::Transparency(_) => {
                Region::Project
            }
            Change::PaletteColour(_) | Change::PaletteBulk(_) | Change::PaletteSelection(_) => {
                Region::Palette
            }
            Change::SpriteCells { .. }
            | Change::Sprite(_)
            | Change::SpriteRenamed(_)
            | Change::SpriteSelection(_) => Region::Sprites,
            Change::MapCell(_) | Change::MapCleared => Region::Map,
        }
    }
}

/// Handle returned by [`ProjectStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&Change)>;

struct Subscription {
    id: ListenerId,
    region: Option<Region>,
    listener: Listener,
}

/// Owns the current project (if any) and publishes changes.
pub struct ProjectStore {
    project: Option<Project>,
    map_width: usize,
    map_height: usize,
    thumbnails: ThumbnailCache,
    subscriptions: Vec<Subscription>,
    next_listener: usize,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("project", &self.project)
            .field("map_width", &self.map_width)
            .field("map_height", &self.map_height)
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}

impl ProjectStore {
    /// An empty store. `map_width`×`map_height` is used whenever a map has
    /// to be rebuilt from a document.
    pub fn new(map_width: usize, map_height: usize) -> Self {
        Self {
            project: None,
            map_width,
            map_height,
            thumbnails: ThumbnailCache::new(0, false),
            subscriptions: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn with_project(project: Project) -> Self {
        let mut store = Self::new(project.map.width(), project.map.height());
        store.install(project);
        store
    }

    pub fn is_loaded(&self) -> bool {
        self.project.is_some()
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// The current project, or [`StoreError::NoProject`].
    pub fn require(&self) -> Result<&Project, StoreError> {
        self.project.as_ref().ok_or(StoreError::NoProject)
    }

    fn require_mut(&mut self) -> Result<&mut Project, StoreError> {
        self.project.as_mut().ok_or(StoreError::NoProject)
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Listen to every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) -> ListenerId {
        self.add_subscription(None, Box::new(listener))
    }

    /// Listen to changes in one region only.
    pub fn subscribe_region(
        &mut self,
        region: Region,
        listener: impl FnMut(&Change) + 'static,
    ) -> ListenerId {
        self.add_subscription(Some(region), Box::new(listener))
    }

    fn add_subscription(&mut self, region: Option<Region>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.subscriptions.push(Subscription { id, region, listener });
        id
    }

    /// Returns false if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    fn notify(&mut self, change: Change) {
        match &change {
            Change::ProjectReplaced | Change::ProjectUnloaded => {}
            Change::Transparency(flag) => self.thumbnails.set_transparent(*flag),
            Change::PaletteColour(_) | Change::PaletteBulk(_) => {
                self.thumbnails.on_palette_changed()
            }
            Change::SpriteCells { sprite, .. } | Change::Sprite(sprite) => {
                self.thumbnails.on_sprite_changed(*sprite)
            }
            _ => {}
        }

        let region = change.region();
        for sub in &mut self.subscriptions {
            if sub.region.map_or(true, |r| r == region) {
                (sub.listener)(&change);
            }
        }
    }

    // ------------------------------------------------------------------
    // Whole-project lifecycle
    // ------------------------------------------------------------------

    fn install(&mut self, project: Project) {
        let stale = project.map.stale_cells(project.sprites.len());
        if !stale.is_empty() {
            log::warn!(
                "{} map cells reference sprites outside the {}-sprite bank; shown as empty",
                stale.len(),
                project.sprites.len()
            );
        }
        self.thumbnails.reset(project.size, project.transparent);
        self.project = Some(project);
    }

    /// Replace the project wholesale.
    pub fn replace(&mut self, project: Project) {
        self.install(project);
        self.notify(Change::ProjectReplaced);
    }

    /// Create a fresh project with random colours.
    pub fn new_project<R: Rng + ?Sized>(&mut self, settings: &NewProjectSettings, rng: &mut R) {
        log::debug!(
            "creating project: {} sprites of {}x{}, {} colors",
            settings.bank_size,
            settings.sprite_size,
            settings.sprite_size,
            settings.palette_size
        );
        self.map_width = settings.map_width;
        self.map_height = settings.map_height;
        self.replace(Project::generate(settings, rng));
    }

    /// Drop the in-memory project.
    pub fn unload(&mut self) {
        if self.project.take().is_some() {
            self.notify(Change::ProjectUnloaded);
        }
    }

    /// Load document text. On failure the current project is kept.
    pub fn load_document(&mut self, text: &str) -> Result<(), StoreError> {
        match document::from_json(text, self.map_width, self.map_height) {
            Ok(project) => {
                self.replace(project);
                Ok(())
            }
            Err(e) => {
                log::error!("project load aborted: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn to_document(&self) -> Result<ProjectDocument, StoreError> {
        Ok(document::serialize(self.require()?))
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, StoreError> {
        Ok(self.to_document()?.to_json(pretty)?)
    }

    /// Load the project slot. `Ok(false)` when the slot is empty.
    pub fn load_from(&mut self, storage: &dyn KeyValueStore) -> Result<bool, StoreError> {
        match storage.get(PROJECT_KEY)? {
            Some(text) => {
                self.load_document(&text)?;
                log::debug!("loaded project from storage");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write the current project into the project slot.
    pub fn save_to(&self, storage: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = self.to_json(false)?;
        storage.set(PROJECT_KEY, &json)?;
        Ok(())
    }

    /// Replace both the stored slot and the in-memory project with an
    /// external document. The document is validated first; a bad one
    /// touches neither.
    pub fn import_into(
        &mut self,
        storage: &mut dyn KeyValueStore,
        text: &str,
    ) -> Result<(), StoreError> {
        let project = document::from_json(text, self.map_width, self.map_height).map_err(|e| {
            log::error!("import rejected: {}", e);
            e
        })?;
        storage.set(PROJECT_KEY, text)?;
        self.replace(project);
        Ok(())
    }

    /// Remove the project slot and unload the project.
    pub fn erase(&mut self, storage: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        storage.remove(PROJECT_KEY)?;
        self.unload();
        Ok(())
    }

    pub fn set_transparent(&mut self, transparent: bool) -> Result<(), StoreError> {
        self.require_mut()?.transparent = transparent;
        self.notify(Change::Transparency(transparent));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Sprites
    // ------------------------------------------------------------------

    fn sprite_mut(&mut self, index: usize) -> Result<&mut Sprite, StoreError> {
        Ok(self.require_mut()?.sprites.try_get_mut(index)?)
    }

    /// Write `cell` into each listed `(x, y)` of sprite `sprite`.
    ///
    /// All coordinates are checked before anything is written.
    pub fn paint_cells(
        &mut self,
        sprite: usize,
        cells: &[(usize, usize)],
        cell: Cell,
    ) -> Result<(), StoreError> {
        let target = self.sprite_mut(sprite)?;
        let size = target.size();
        if let Some(&(x, y)) = cells.iter().find(|&&(x, y)| x >= size || y >= size) {
            return Err(StoreError::CellOutOfBounds { x, y, size });
        }
        for &(x, y) in cells {
            target.set_cell(x, y, cell);
        }
        if !cells.is_empty() {
            self.notify(Change::SpriteCells { sprite, cells: cells.to_vec() });
        }
        Ok(())
    }

    pub fn paint_cell(
        &mut self,
        sprite: usize,
        x: usize,
        y: usize,
        cell: Cell,
    ) -> Result<(), StoreError> {
        self.paint_cells(sprite, &[(x, y)], cell)
    }

    /// Run a whole-sprite operation.
    pub fn transform_sprite(
        &mut self,
        sprite: usize,
        op: impl FnOnce(&mut Sprite),
    ) -> Result<(), StoreError> {
        op(self.sprite_mut(sprite)?);
        self.notify(Change::Sprite(sprite));
        Ok(())
    }

    /// Replace a sprite's grid (and optionally its name).
    pub fn load_sprite(
        &mut self,
        sprite: usize,
        data: Vec<Vec<Cell>>,
        name: Option<&str>,
    ) -> Result<(), StoreError> {
        let target = self.sprite_mut(sprite)?;
        target.load_data(data)?;
        if let Some(name) = name {
            target.set_name(name);
        }
        self.notify(Change::Sprite(sprite));
        Ok(())
    }

    pub fn copy_sprite_data(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        self.require_mut()?.sprites.copy_sprite(from, to)?;
        self.notify(Change::Sprite(to));
        Ok(())
    }

    pub fn rename_sprite(&mut self, sprite: usize, name: &str) -> Result<(), StoreError> {
        self.sprite_mut(sprite)?.set_name(name);
        self.notify(Change::SpriteRenamed(sprite));
        Ok(())
    }

    pub fn select_sprite(&mut self, sprite: usize) -> Result<(), StoreError> {
        self.require_mut()?.sprites.select(sprite)?;
        self.notify(Change::SpriteSelection(sprite));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Palette
    // ------------------------------------------------------------------

    pub fn select_colour(&mut self, index: usize) -> Result<(), StoreError> {
        self.require_mut()?.palette.select(index)?;
        self.notify(Change::PaletteSelection(index));
        Ok(())
    }

    pub fn set_colour(&mut self, index: usize, colour: Colour) -> Result<(), StoreError> {
        self.require_mut()?.palette.set_colour_at(index, colour)?;
        self.notify(Change::PaletteColour(index));
        Ok(())
    }

    /// Apply bulk-edited palette text.
    pub fn decode_palette_text(&mut self, text: &str) -> Result<BulkDecode, StoreError> {
        let result = self.require_mut()?.palette.decode_bulk_text(text);
        if !result.updated.is_empty() {
            self.notify(Change::PaletteBulk(result.updated.clone()));
        }
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Tile map
    // ------------------------------------------------------------------

    /// Point map cell `index` at sprite `sprite`.
    pub fn place_tile(&mut self, index: usize, sprite: usize) -> Result<(), StoreError> {
        let project = self.require_mut()?;
        if sprite >= project.sprites.len() {
            return Err(BankError::OutOfRange { index: sprite, len: project.sprites.len() }.into());
        }
        project.map.place(index, sprite)?;
        self.notify(Change::MapCell(index));
        Ok(())
    }

    pub fn clear_tile(&mut self, index: usize) -> Result<(), StoreError> {
        self.require_mut()?.map.clear(index)?;
        self.notify(Change::MapCell(index));
        Ok(())
    }

    pub fn clear_map(&mut self) -> Result<(), StoreError> {
        self.require_mut()?.map.clear_all();
        self.notify(Change::MapCleared);
        Ok(())
    }

    /// Thumbnail for map cell `index`.
    pub fn tile_thumbnail(&mut self, index: usize) -> Result<&RgbaImage, StoreError> {
        let project = self.project.as_ref().ok_or(StoreError::NoProject)?;
        let cell = project
            .map
            .cells()
            .get(index)
            .copied()
            .ok_or(TileMapError::OutOfRange { index, len: project.map.len() })?;
        Ok(self.thumbnails.thumbnail_for(cell, &project.sprites, &project.palette))
    }

    /// Whole map as one image.
    pub fn render_map(&mut self) -> Result<RgbaImage, StoreError> {
        let project = self.project.as_ref().ok_or(StoreError::NoProject)?;
        Ok(self.thumbnails.render_map(&project.map, &project.sprites, &project.palette))
    }

    /// Sprite rasters rendered by the thumbnail cache so far.
    pub fn thumbnail_renders(&self) -> u64 {
        self.thumbnails.render_count()
    }
}
