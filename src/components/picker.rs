use eframe::egui;
use egui::{Sense, Ui};

use crate::canvas::RasterView;
use crate::raster::{LIGHT_GREY, PALETTE_SIZE, Palette, Raster, WHITE};

/// Swatch columns in the picker grid; 16 palette entries fill two rows.
pub const SWATCH_COLUMNS: usize = 8;
/// Swatch rows in the picker grid.
pub const SWATCH_ROWS: usize = 2;

/// Grid position of palette entry `index`: indices 0–7 on the top row,
/// 8–15 on the bottom row. A bijection over `[0, 16)`.
pub fn swatch_position(index: u8) -> (usize, usize) {
    (
        index as usize % SWATCH_COLUMNS,
        index as usize / SWATCH_COLUMNS,
    )
}

// ============================================================================
// PALETTE PICKER — a raster-shaped control for choosing a colour index
// ============================================================================

/// Swatch picker built from an 8×2 raster whose cell values are the palette
/// indices themselves, plus the currently selected index.
///
/// Owns its raster view rather than specialising it: the picker delegates to
/// the view for drawing primitives and keeps selection handling to itself.
pub struct PalettePicker {
    view: RasterView,
    selected: u8,
}

impl PalettePicker {
    pub fn new(cell_px: f32) -> Self {
        let mut raster = Raster::new(SWATCH_COLUMNS, SWATCH_ROWS);
        for index in 0..PALETTE_SIZE as u8 {
            let (x, y) = swatch_position(index);
            raster.set(x, y, index);
        }
        Self {
            view: RasterView::new(raster, cell_px),
            selected: 0,
        }
    }

    /// Currently selected palette index.
    pub fn selected(&self) -> u8 {
        self.selected
    }

    /// Make `index` the current selection (the eyedropper pushes sampled
    /// colours through here).
    pub fn select(&mut self, index: u8) {
        debug_assert!((index as usize) < PALETTE_SIZE);
        self.selected = index;
    }

    /// Palette index stored at a swatch cell.
    pub fn swatch_at(&self, x: usize, y: usize) -> u8 {
        self.view.raster.get(x, y)
    }

    pub fn show(&mut self, ui: &mut Ui, palette: &Palette) -> egui::Response {
        let (response, painter) = self.view.allocate(ui, Sense::click());
        let origin = response.rect.min;

        // Selection changes before painting so the mark lands on the new
        // swatch within the same frame.
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = self.view.pointer_to_cell(origin, pos);
                self.selected = self.swatch_at(x, y);
            }
        }

        self.view.paint_cells(&painter, origin, palette);

        let (sx, sy) = swatch_position(self.selected);
        self.view.mark_cell(&painter, origin, sx, sy, WHITE, palette);

        if let Some(pos) = response.hover_pos() {
            let (x, y) = self.view.pointer_to_cell(origin, pos);
            self.view
                .outline_cell(&painter, origin, x, y, LIGHT_GREY, 4.0, palette);
        }

        response
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn swatch_layout_is_a_bijection() {
        let mut seen = HashSet::new();
        for index in 0..16u8 {
            let (x, y) = swatch_position(index);
            assert!(x < SWATCH_COLUMNS && y < SWATCH_ROWS);
            assert!(seen.insert((x, y)), "position ({x}, {y}) reused");
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn first_row_then_second_row() {
        for index in 0..8u8 {
            assert_eq!(swatch_position(index), (index as usize, 0));
        }
        for index in 8..16u8 {
            assert_eq!(swatch_position(index), (index as usize - 8, 1));
        }
    }

    #[test]
    fn picker_cells_hold_their_own_index() {
        let picker = PalettePicker::new(24.0);
        for index in 0..16u8 {
            let (x, y) = swatch_position(index);
            assert_eq!(picker.swatch_at(x, y), index);
        }
    }

    #[test]
    fn selection_defaults_to_zero_and_follows_select() {
        let mut picker = PalettePicker::new(24.0);
        assert_eq!(picker.selected(), 0);
        picker.select(9);
        assert_eq!(picker.selected(), 9);
    }
}
