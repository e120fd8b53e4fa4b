use eframe::egui;
use egui::{Sense, Ui};

use crate::canvas::RasterView;
use crate::components::picker::PalettePicker;
use crate::raster::{CodecError, Palette, Raster, WHITE};

/// Editor canvas cell size in points (16×16 grid → 256 pt square).
const EDITOR_CELL_PX: f32 = 16.0;
/// Picker swatch size in points.
const SWATCH_CELL_PX: f32 = 24.0;

// ============================================================================
// AVATAR EDITOR — paint interaction over an editable raster plus a picker
// ============================================================================

/// The pixel-art avatar editor: an editable 16×16 raster view, the swatch
/// picker below it, and a readout of the wire encoding.
///
/// Pointer bindings on the canvas:
/// - primary button (click or held while moving): paint the hovered cell
///   with the picker's selected colour;
/// - secondary click: eyedropper — pick up the hovered cell's colour;
/// - hovering: outline the hovered cell and mark it with the paint colour.
///
/// No undo history and no multi-cell brush.
pub struct AvatarEditor {
    pub view: RasterView,
    pub picker: PalettePicker,
}

impl Default for AvatarEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarEditor {
    pub fn new() -> Self {
        Self {
            view: RasterView::new(Raster::avatar(), EDITOR_CELL_PX),
            picker: PalettePicker::new(SWATCH_CELL_PX),
        }
    }

    /// Reset the canvas to the blank background.
    pub fn clear(&mut self) {
        self.view.raster.clear(WHITE);
    }

    /// Replace the canvas contents from an encoded avatar.
    pub fn load_base64(&mut self, text: &str) -> Result<(), CodecError> {
        self.view.raster.decode_base64(text)
    }

    /// Current wire encoding of the canvas.
    pub fn encoded(&self) -> String {
        self.view.raster.encode_base64()
    }

    /// Paint a cell with the selected colour.
    pub fn paint_at(&mut self, x: usize, y: usize) {
        let color = self.picker.selected();
        self.view.raster.set(x, y, color);
    }

    /// Eyedropper: make a cell's colour the current selection.
    pub fn sample_at(&mut self, x: usize, y: usize) {
        let color = self.view.raster.get(x, y);
        self.picker.select(color);
    }

    pub fn show(&mut self, ui: &mut Ui, palette: &Palette) {
        ui.vertical(|ui| {
            self.show_canvas(ui, palette);
            ui.add_space(8.0);
            self.picker.show(ui, palette);
            ui.add_space(4.0);
            ui.collapsing("Encoded avatar", |ui| {
                // Live wire-format readout, handy when poking the API by hand.
                ui.add(
                    egui::Label::new(egui::RichText::new(self.encoded()).monospace().size(10.0))
                        .wrap(true),
                );
            });
        });
    }

    fn show_canvas(&mut self, ui: &mut Ui, palette: &Palette) {
        let (response, painter) = self.view.allocate(ui, Sense::click_and_drag());
        let origin = response.rect.min;

        // Prefer the interaction position so drag-to-paint keeps tracking
        // while a button is held.
        let hovered_cell = response
            .interact_pointer_pos()
            .or_else(|| response.hover_pos())
            .map(|pos| self.view.pointer_to_cell(origin, pos));

        // Mutate before painting so this frame already shows the stroke.
        if let Some((x, y)) = hovered_cell {
            if ui.input(|i| i.pointer.primary_down()) {
                // Covers both the initial press and drag-to-paint.
                self.paint_at(x, y);
            }
            if response.secondary_clicked() {
                self.sample_at(x, y);
            }
        }

        self.view.paint_cells(&painter, origin, palette);

        if let Some((x, y)) = hovered_cell {
            self.view
                .outline_cell(&painter, origin, x, y, WHITE, 1.0, palette);
            self.view
                .mark_cell(&painter, origin, x, y, self.picker.selected(), palette);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
