use eframe::egui;
use egui::{Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::raster::{Palette, Raster};

// ============================================================================
// RASTER VIEW — draws a raster at a fixed cell scale and maps pointer
// positions back to cells
// ============================================================================

/// A raster bound to a square on-screen surface.
///
/// The view allocates its own `width*cell_px × height*cell_px` region, so the
/// surface is always exactly divisible into cells; there is no non-square or
/// fractional-cell case to guard against.
pub struct RasterView {
    pub raster: Raster,
    cell_px: f32,
}

impl RasterView {
    pub fn new(raster: Raster, cell_px: f32) -> Self {
        Self { raster, cell_px }
    }

    pub fn cell_px(&self) -> f32 {
        self.cell_px
    }

    /// On-screen size of the full grid.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.raster.width() as f32 * self.cell_px,
            self.raster.height() as f32 * self.cell_px,
        )
    }

    /// Allocate the view's screen region and return the response plus a
    /// painter clipped to it. Callers paint cells and decorations afterwards
    /// so interaction can mutate the raster within the same frame.
    pub fn allocate(&self, ui: &mut Ui, sense: Sense) -> (egui::Response, egui::Painter) {
        ui.allocate_painter(self.size(), sense)
    }

    /// Draw the view read-only (profile cards, previews).
    pub fn show(&self, ui: &mut Ui, palette: &Palette) -> egui::Response {
        let (response, painter) = self.allocate(ui, Sense::hover());
        self.paint_cells(&painter, response.rect.min, palette);
        response
    }

    /// One filled square per cell, coloured by the palette entry at the
    /// cell's index.
    pub fn paint_cells(&self, painter: &egui::Painter, origin: Pos2, palette: &Palette) {
        for y in 0..self.raster.height() {
            for x in 0..self.raster.width() {
                painter.rect_filled(
                    self.cell_rect(origin, x, y),
                    0.0,
                    palette.color(self.raster.get(x, y)),
                );
            }
        }
    }

    /// Screen rect covered by cell `(x, y)`.
    pub fn cell_rect(&self, origin: Pos2, x: usize, y: usize) -> Rect {
        Rect::from_min_size(
            origin + Vec2::new(x as f32 * self.cell_px, y as f32 * self.cell_px),
            Vec2::splat(self.cell_px),
        )
    }

    /// Stroke a rectangle around a cell, inset by half the line width so the
    /// stroke stays inside the cell. Cosmetic only.
    pub fn outline_cell(
        &self,
        painter: &egui::Painter,
        origin: Pos2,
        x: usize,
        y: usize,
        color_index: u8,
        thickness: f32,
        palette: &Palette,
    ) {
        let rect = self.cell_rect(origin, x, y).shrink(thickness / 2.0);
        painter.rect_stroke(rect, 0.0, Stroke::new(thickness, palette.color(color_index)));
    }

    /// Paint a centered square one third of the cell size, used as a hover
    /// and selection cue. Cosmetic only.
    pub fn mark_cell(
        &self,
        painter: &egui::Painter,
        origin: Pos2,
        x: usize,
        y: usize,
        color_index: u8,
        palette: &Palette,
    ) {
        let third = self.cell_px / 3.0;
        let rect = Rect::from_min_size(
            origin + Vec2::new(x as f32 * self.cell_px + third, y as f32 * self.cell_px + third),
            Vec2::splat(third),
        );
        painter.rect_filled(rect, 0.0, palette.color(color_index));
    }

    /// Map a view-local position to a cell coordinate by truncating integer
    /// division, clamped so positions on the far edge still land inside the
    /// grid.
    pub fn cell_at(&self, local: Vec2) -> (usize, usize) {
        let x = ((local.x / self.cell_px).trunc() as isize)
            .clamp(0, self.raster.width() as isize - 1);
        let y = ((local.y / self.cell_px).trunc() as isize)
            .clamp(0, self.raster.height() as isize - 1);
        (x as usize, y as usize)
    }

    /// [`RasterView::cell_at`] against an absolute pointer position.
    pub fn pointer_to_cell(&self, origin: Pos2, pointer: Pos2) -> (usize, usize) {
        self.cell_at(pointer - origin)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> RasterView {
        RasterView::new(Raster::avatar(), 16.0)
    }

    #[test]
    fn cell_boundaries_truncate() {
        let v = view();
        for k in 0..16 {
            // Both edges of cell k map back to cell k.
            let low = k as f32 * 16.0;
            let high = low + 15.0;
            assert_eq!(v.cell_at(Vec2::new(low, low)), (k, k));
            assert_eq!(v.cell_at(Vec2::new(high, high)), (k, k));
        }
    }

    #[test]
    fn cell_at_is_monotonic() {
        let v = view();
        let mut last = 0;
        for px in 0..(16 * 16) {
            let (x, _) = v.cell_at(Vec2::new(px as f32, 0.0));
            assert!(x >= last);
            last = x;
        }
    }

    #[test]
    fn positions_outside_clamp_to_grid() {
        let v = view();
        assert_eq!(v.cell_at(Vec2::new(-5.0, -5.0)), (0, 0));
        assert_eq!(v.cell_at(Vec2::new(1000.0, 1000.0)), (15, 15));
        // The far edge itself belongs to the last cell.
        assert_eq!(v.cell_at(Vec2::new(256.0, 256.0)), (15, 15));
    }

    #[test]
    fn view_size_matches_grid() {
        assert_eq!(view().size(), Vec2::new(256.0, 256.0));
    }
}
