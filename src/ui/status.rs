use macroquad::prelude::*;

use crate::menu::VISIBLE_ITEMS;
use crate::types::{BatchSummary, Notice};
use crate::ui;

pub fn draw_working(label: &str) {
    clear_background(BLACK);
    ui::text_centered(label, screen_height() / 2.0);
}

pub fn draw_summary(summary: &BatchSummary) {
    clear_background(BLACK);

    let x = ui::MARGIN;
    let mut y = ui::MARGIN + ui::ROW_HEIGHT;

    ui::text(&format!("=== {} ===", summary.title), x, y);
    y += ui::ROW_HEIGHT * 2.0;

    // Long batches overflow the screen; keep the tail visible.
    let keep = VISIBLE_ITEMS.saturating_sub(4);
    let start = summary.lines.len().saturating_sub(keep);
    if start > 0 {
        ui::text_dim(&format!("... {} earlier entries ...", start), x, y);
        y += ui::ROW_HEIGHT;
    }
    for line in &summary.lines[start..] {
        ui::text(line, x, y);
        y += ui::ROW_HEIGHT;
    }

    y += ui::ROW_HEIGHT;
    ui::text(&summary.completed_line(), x, y);
    y += ui::ROW_HEIGHT * 2.0;
    ui::text("Press B to continue.", x, y);
}

pub fn draw_notice(notice: &Notice) {
    clear_background(BLACK);
    ui::text_centered(&notice.message, screen_height() / 2.0);

    if notice.show_countdown {
        let seconds = notice.remaining.ceil().max(0.0) as u32;
        ui::text_centered(
            &format!("Back in {} seconds...", seconds),
            screen_height() / 2.0 + ui::ROW_HEIGHT * 2.0,
        );
    }
}

pub fn draw_fatal(message: &str) {
    clear_background(BLACK);
    ui::text_centered(message, screen_height() / 2.0);
    ui::text_centered(
        "Press + to exit.",
        screen_height() / 2.0 + ui::ROW_HEIGHT * 2.0,
    );
}
