//! Pixel editor interaction logic
//!
//! Turns pointer input on the editor view into cell writes on the active
//! sprite. The editor owns no pixels: every write goes through the
//! [`ProjectStore`], and each operation reports what needs redrawing.

use std::str::FromStr;

use thiserror::Error;

use crate::color::Colour;
use crate::models::{BankError, Cell, Sprite};
use crate::store::{ProjectStore, StoreError};
use crate::surface::Surface;

/// Grid line colour of the editor view
pub const GRID_COLOUR: Colour = Colour { r: 0x22, g: 0x22, b: 0x22 };

/// Grid line thickness in pixels
pub const GRID_LINE_WIDTH: u32 = 2;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("palette is empty, no colour to paint with")]
    NoColour,
    #[error("clipboard is empty")]
    EmptyClipboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Paints the selected colour
    Primary,
    /// Erases
    Secondary,
}

/// Pointer input in editor view pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Press { x: f64, y: f64, button: Button },
    /// `engaged` is the button still held, if any
    Move { x: f64, y: f64, engaged: Option<Button> },
    Release,
    /// Discrete click outside of a stroke
    Activate { x: f64, y: f64, button: Button },
}

/// Whole-sprite tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Clear,
    FlipX,
    FlipY,
    Recolor,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::Clear,
        Tool::FlipX,
        Tool::FlipY,
        Tool::Recolor,
        Tool::MoveUp,
        Tool::MoveDown,
        Tool::MoveLeft,
        Tool::MoveRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Clear => "clear",
            Tool::FlipX => "flip-x",
            Tool::FlipY => "flip-y",
            Tool::Recolor => "recolor",
            Tool::MoveUp => "up",
            Tool::MoveDown => "down",
            Tool::MoveLeft => "left",
            Tool::MoveRight => "right",
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(s)).ok_or_else(|| {
            let names: Vec<_> = Tool::ALL.iter().map(|t| t.name()).collect();
            format!("unknown tool '{}' (expected one of: {})", s, names.join(", "))
        })
    }
}

/// What the view has to redraw after an editor operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redraw {
    None,
    /// Sprite cells in visit order
    Cells(Vec<(usize, usize)>),
    Full,
}

/// Cells on the line from `p0` to `p1`, both ends included, in order.
///
/// Consecutive cells touch (including diagonally), so a fast drag leaves no
/// gaps.
pub fn line_cells(p0: (i64, i64), p1: (i64, i64)) -> Vec<(i64, i64)> {
    let mut cells = Vec::new();

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        cells.push((x0, y0));

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    cells
}

/// Editor state for one view.
#[derive(Debug, Clone)]
pub struct PixelEditor {
    cell_size: u32,
    sprite: usize,
    stroke: Option<(usize, usize)>,
    clipboard: Option<Sprite>,
}

impl PixelEditor {
    pub fn new(cell_size: u32) -> Self {
        Self { cell_size: cell_size.max(1), sprite: 0, stroke: None, clipboard: None }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Index of the sprite being edited.
    pub fn sprite_index(&self) -> usize {
        self.sprite
    }

    /// Edit sprite `index` and make it the bank selection.
    pub fn edit_sprite(&mut self, store: &mut ProjectStore, index: usize) -> Result<(), EditorError> {
        store.select_sprite(index)?;
        self.sprite = index;
        self.stroke = None;
        Ok(())
    }

    /// Pick up whatever sprite the store has selected.
    pub fn follow_selection(&mut self, store: &ProjectStore) -> Result<(), EditorError> {
        self.sprite = store.require()?.selected_sprite_index();
        self.stroke = None;
        Ok(())
    }

    pub fn in_stroke(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn clipboard(&self) -> Option<&Sprite> {
        self.clipboard.as_ref()
    }

    /// View pixel to cell coordinates, unclamped.
    pub fn pointer_to_cell(&self, px: f64, py: f64) -> (i64, i64) {
        let size = f64::from(self.cell_size);
        ((px / size).floor() as i64, (py / size).floor() as i64)
    }

    fn clamp(cell: (i64, i64), size: usize) -> (usize, usize) {
        let max = size.saturating_sub(1) as i64;
        (cell.0.clamp(0, max) as usize, cell.1.clamp(0, max) as usize)
    }

    fn active<'a>(&self, store: &'a ProjectStore) -> Result<&'a Sprite, EditorError> {
        let project = store.require()?;
        let len = project.sprites.len();
        project
            .sprites
            .get(self.sprite)
            .ok_or_else(|| StoreError::from(BankError::OutOfRange { index: self.sprite, len }).into())
    }

    fn sprite_size(&self, store: &ProjectStore) -> Result<usize, EditorError> {
        Ok(self.active(store)?.size())
    }

    fn cell_for(&self, store: &ProjectStore, button: Button) -> Result<Cell, EditorError> {
        match button {
            Button::Primary => {
                let selected = store.require()?.palette.selected().ok_or(EditorError::NoColour)?;
                Ok(Some(selected))
            }
            Button::Secondary => Ok(None),
        }
    }

    fn apply(
        &self,
        store: &mut ProjectStore,
        cells: Vec<(usize, usize)>,
        button: Button,
    ) -> Result<Redraw, EditorError> {
        let cell = self.cell_for(store, button)?;
        store.paint_cells(self.sprite, &cells, cell)?;
        Ok(Redraw::Cells(cells))
    }

    /// Write the selected palette index at `(x, y)`.
    pub fn paint(&mut self, store: &mut ProjectStore, x: usize, y: usize) -> Result<Redraw, EditorError> {
        self.apply(store, vec![(x, y)], Button::Primary)
    }

    /// Empty the cell at `(x, y)`.
    pub fn erase(&mut self, store: &mut ProjectStore, x: usize, y: usize) -> Result<Redraw, EditorError> {
        self.apply(store, vec![(x, y)], Button::Secondary)
    }

    /// Apply `button` along the line between two cells.
    pub fn stroke_line(
        &mut self,
        store: &mut ProjectStore,
        from: (usize, usize),
        to: (usize, usize),
        button: Button,
    ) -> Result<Redraw, EditorError> {
        let size = self.sprite_size(store)?;
        let cells = line_cells((from.0 as i64, from.1 as i64), (to.0 as i64, to.1 as i64))
            .into_iter()
            .map(|c| Self::clamp(c, size))
            .collect();
        self.apply(store, cells, button)
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, store: &mut ProjectStore, input: PointerInput) -> Result<Redraw, EditorError> {
        match input {
            PointerInput::Press { x, y, button } => {
                let cell = Self::clamp(self.pointer_to_cell(x, y), self.sprite_size(store)?);
                self.stroke = Some(cell);
                self.apply(store, vec![cell], button)
            }
            PointerInput::Move { x, y, engaged: Some(button) } => {
                let cell = Self::clamp(self.pointer_to_cell(x, y), self.sprite_size(store)?);
                let from = self.stroke.unwrap_or(cell);
                if self.stroke == Some(cell) {
                    return Ok(Redraw::None);
                }
                self.stroke = Some(cell);
                self.stroke_line(store, from, cell, button)
            }
            PointerInput::Move { engaged: None, .. } | PointerInput::Release => {
                self.stroke = None;
                Ok(Redraw::None)
            }
            PointerInput::Activate { x, y, button } => {
                let cell = Self::clamp(self.pointer_to_cell(x, y), self.sprite_size(store)?);
                self.apply(store, vec![cell], button)
            }
        }
    }

    /// Run a whole-sprite tool on the active sprite.
    pub fn apply_tool(&mut self, store: &mut ProjectStore, tool: Tool) -> Result<Redraw, EditorError> {
        let recolor_target = match tool {
            Tool::Recolor => Some(store.require()?.palette.selected().ok_or(EditorError::NoColour)?),
            _ => None,
        };
        log::debug!("tool {} on sprite {}", tool.name(), self.sprite);
        store.transform_sprite(self.sprite, |sprite| match tool {
            Tool::Clear => sprite.clear(),
            Tool::FlipX => sprite.flip_horizontal(),
            Tool::FlipY => sprite.flip_vertical(),
            Tool::Recolor => {
                if let Some(target) = recolor_target {
                    sprite.recolor_all(target)
                }
            }
            Tool::MoveUp => sprite.shift_up(),
            Tool::MoveDown => sprite.shift_down(),
            Tool::MoveLeft => sprite.shift_left(),
            Tool::MoveRight => sprite.shift_right(),
        })?;
        Ok(Redraw::Full)
    }

    /// Put a copy of the active sprite on the clipboard.
    pub fn copy(&mut self, store: &ProjectStore) -> Result<(), EditorError> {
        self.clipboard = Some(self.active(store)?.clone());
        Ok(())
    }

    /// Overwrite the active sprite with the clipboard (data and name).
    pub fn paste(&mut self, store: &mut ProjectStore) -> Result<Redraw, EditorError> {
        let clip = self.clipboard.as_ref().ok_or(EditorError::EmptyClipboard)?;
        store.load_sprite(self.sprite, clip.data().to_vec(), Some(clip.name()))?;
        Ok(Redraw::Full)
    }

    /// Draw the editor view of the active sprite onto `surface`.
    ///
    /// Background is black unless the project is transparent, each cell is a
    /// `cell_size` square, and a grid is drawn on every cell boundary.
    pub fn render_view<S: Surface + ?Sized>(
        &self,
        store: &ProjectStore,
        surface: &mut S,
    ) -> Result<(), EditorError> {
        let project = store.require()?;
        let sprite = self.active(store)?;
        let size = sprite.size();
        let (width, height) = (surface.width(), surface.height());

        surface.clear();
        if !project.transparent {
            surface.fill_rect(0, 0, width, height, Colour::BLACK);
        }

        for (y, row) in sprite.data().iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(colour) = cell.and_then(|i| project.palette.colour_at(i)) {
                    surface.fill_rect(
                        x as u32 * self.cell_size,
                        y as u32 * self.cell_size,
                        self.cell_size,
                        self.cell_size,
                        colour,
                    );
                }
            }
        }

        // Lines are centred on the boundary, so the outer ones are half width.
        let half = GRID_LINE_WIDTH / 2;
        for i in 0..=size as u32 {
            let pos = i * self.cell_size;
            let start = pos.saturating_sub(half);
            let thickness = pos + (GRID_LINE_WIDTH - half) - start;
            surface.fill_rect(start, 0, thickness, height, GRID_COLOUR);
            surface.fill_rect(0, start, width, thickness, GRID_COLOUR);
        }
        Ok(())
    }
}

impl Default for PixelEditor {
    fn default() -> Self {
        Self::new(32)
    }
}
