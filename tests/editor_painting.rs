//! Paint-interaction behavior of the avatar editor, driven through the same
//! cell-mapping and mutation paths the pointer bindings use.

use doctrine_desktop::components::editor::AvatarEditor;
use doctrine_desktop::raster::WHITE;
use egui::Vec2;

#[test]
fn primary_click_paints_only_the_clicked_cell() {
    let mut editor = AvatarEditor::new();
    editor.picker.select(5);

    // A pointer position inside cell (2, 3).
    let s = editor.view.cell_px();
    let (x, y) = editor
        .view
        .cell_at(Vec2::new(2.0 * s + s / 2.0, 3.0 * s + s / 2.0));
    assert_eq!((x, y), (2, 3));
    editor.paint_at(x, y);

    for cy in 0..16 {
        for cx in 0..16 {
            let expected = if (cx, cy) == (2, 3) { 5 } else { WHITE };
            assert_eq!(editor.view.raster.get(cx, cy), expected);
        }
    }
}

#[test]
fn secondary_click_samples_the_cell_colour() {
    let mut editor = AvatarEditor::new();
    editor.view.raster.set(1, 1, 9);

    let s = editor.view.cell_px();
    let (x, y) = editor.view.cell_at(Vec2::new(1.5 * s, 1.5 * s));
    assert_eq!((x, y), (1, 1));
    editor.sample_at(x, y);

    assert_eq!(editor.picker.selected(), 9);
    // Sampling must not repaint anything.
    assert_eq!(editor.view.raster.get(1, 1), 9);
}

#[test]
fn drag_paints_every_visited_cell() {
    let mut editor = AvatarEditor::new();
    editor.picker.select(14);

    let s = editor.view.cell_px();
    for step in 0..8 {
        let pos = Vec2::new(step as f32 * s + 1.0, 0.5 * s);
        let (x, y) = editor.view.cell_at(pos);
        editor.paint_at(x, y);
    }

    for cx in 0..8 {
        assert_eq!(editor.view.raster.get(cx, 0), 14);
    }
    assert_eq!(editor.view.raster.get(8, 0), WHITE);
}
