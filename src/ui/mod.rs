use macroquad::prelude::*;

pub mod browser;
pub mod status;

// ===================================
// SHARED DRAW HELPERS
// ===================================

pub const FONT_SIZE: u16 = 16;
pub const ROW_HEIGHT: f32 = 17.0;
pub const MARGIN: f32 = 12.0;

pub const TEXT_COLOR: Color = WHITE;
pub const DIM_COLOR: Color = GRAY;
pub const CURSOR_ROW_COLOR: Color = Color {
    r: 0.25,
    g: 0.25,
    b: 0.35,
    a: 1.0,
};

pub fn text(s: &str, x: f32, y: f32) {
    draw_text(s, x, y, FONT_SIZE as f32, TEXT_COLOR);
}

pub fn text_dim(s: &str, x: f32, y: f32) {
    draw_text(s, x, y, FONT_SIZE as f32, DIM_COLOR);
}

pub fn text_centered(s: &str, y: f32) {
    let dims = measure_text(s, None, FONT_SIZE, 1.0);
    draw_text(
        s,
        screen_width() / 2.0 - dims.width / 2.0,
        y,
        FONT_SIZE as f32,
        TEXT_COLOR,
    );
}
