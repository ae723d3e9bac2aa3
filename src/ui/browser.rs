use macroquad::prelude::*;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::input::InputState;
use crate::menu::{analog_step, sort_label, BrowserState, VISIBLE_ITEMS};
use crate::types::{Job, Notice, Screen};
use crate::ui;
use crate::VERSION_NUMBER;

// Continuous stick scroll runs on a 50 ms repeat timer so the scroll speed
// does not depend on the frame rate.
pub const ANALOG_REPEAT_SECS: f32 = 0.05;

const EMPTY_GENERATE_NOTICE_SECS: f32 = 2.0;
const EMPTY_DELETE_NOTICE_SECS: f32 = 1.5;

pub fn update(
    catalog: &mut Catalog,
    state: &mut BrowserState,
    input: &InputState,
    config: &mut Config,
    next_screen: &mut Option<Screen>,
    analog_timer: &mut f32,
    dt: f32,
) {
    if input.exit {
        state.exit_requested = true;
        return;
    }

    if input.reload {
        *next_screen = Some(Screen::Working(Job::Reload));
        return;
    }

    let total = catalog.len();

    if input.up {
        state.move_cursor(total, -1);
    }
    if input.down {
        state.move_cursor(total, 1);
    }
    if input.left {
        state.jump_cursor(total, -1);
    }
    if input.right {
        state.jump_cursor(total, 1);
    }
    if input.page_up {
        state.move_cursor(total, -(VISIBLE_ITEMS as i64));
    }
    if input.page_down {
        state.move_cursor(total, VISIBLE_ITEMS as i64);
    }

    if input.toggle {
        if let Some(now_selected) = catalog.toggle(state.cursor) {
            if now_selected {
                state.selected_count += 1;
            } else {
                state.selected_count -= 1;
            }
        }
    }

    if input.toggle_all {
        state.selected_count = catalog.toggle_all();
    }

    if input.toggle_images {
        state.images_enabled = !state.images_enabled;
        config.download_images = state.images_enabled;
        config.save();
    }

    if input.sort {
        let (field, ascending) = state.advance_sort();
        catalog.sort(field, ascending);
    }

    if input.generate {
        if state.selected_count == 0 {
            *next_screen = Some(Screen::Notice(Notice::brief(
                "No amiibos selected.",
                EMPTY_GENERATE_NOTICE_SECS,
            )));
        } else {
            *next_screen = Some(Screen::Working(Job::Generate));
        }
        return;
    }

    if input.delete {
        if state.selected_count == 0 {
            *next_screen = Some(Screen::Notice(Notice::brief(
                "No amiibos selected for deletion.",
                EMPTY_DELETE_NOTICE_SECS,
            )));
        } else {
            *next_screen = Some(Screen::Working(Job::Delete));
        }
        return;
    }

    // Continuous stick scrolling with variable speed based on deflection.
    *analog_timer -= dt;
    if *analog_timer <= 0.0 {
        let step = analog_step(input.stick_y);
        if step != 0 {
            state.move_cursor(total, step);
            *analog_timer = ANALOG_REPEAT_SECS;
        } else {
            *analog_timer = 0.0;
        }
    }
}

pub fn draw(catalog: &Catalog, state: &BrowserState) {
    clear_background(BLACK);

    let x = ui::MARGIN;
    let mut y = ui::MARGIN + ui::ROW_HEIGHT;

    ui::text(
        "=== AmiiGen ===                        - : Update DB  |  + : Exit",
        x,
        y,
    );
    let version_dims = measure_text(VERSION_NUMBER, None, ui::FONT_SIZE, 1.0);
    ui::text_dim(
        VERSION_NUMBER,
        screen_width() - version_dims.width - ui::MARGIN,
        y,
    );
    y += ui::ROW_HEIGHT;

    ui::text(
        &format!(
            "Selected: {}/{}   Images: {}   Sort: {}",
            state.selected_count,
            catalog.len(),
            if state.images_enabled { "ON " } else { "OFF" },
            sort_label(state.sort_index),
        ),
        x,
        y,
    );
    y += ui::ROW_HEIGHT;

    ui::text_dim(
        "ZL : Select All | ZR : Toggle Images | Y : Sort | X : Generate | LStick : Delete",
        x,
        y,
    );
    y += ui::ROW_HEIGHT;

    if catalog.is_empty() {
        ui::text("No amiibos in the database.", x, y + ui::ROW_HEIGHT);
        return;
    }

    let end = (state.scroll + VISIBLE_ITEMS).min(catalog.len());
    for index in state.scroll..end {
        let Some(entry) = catalog.get(index) else {
            break;
        };
        y += ui::ROW_HEIGHT;

        if index == state.cursor {
            draw_rectangle(
                0.0,
                y - ui::FONT_SIZE as f32,
                screen_width(),
                ui::ROW_HEIGHT,
                ui::CURSOR_ROW_COLOR,
            );
        }

        let cursor = if index == state.cursor { ">" } else { " " };
        let marker = if entry.selected { "x" } else { " " };
        ui::text(
            &format!("{} [{}] {}) {}", cursor, marker, index + 1, entry.label()),
            x,
            y,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn small_catalog() -> Catalog {
        let doc = json!({
            "amiibo": [
                { "name": "Mario", "amiiboSeries": "Super Smash Bros." },
                { "name": "Callie", "amiiboSeries": "Splatoon" },
            ]
        });
        Catalog::from_document(&doc).unwrap()
    }

    fn run_update(
        catalog: &mut Catalog,
        state: &mut BrowserState,
        input: &InputState,
    ) -> Option<Screen> {
        let mut next = None;
        let mut timer = 0.0;
        let mut config = Config::default();
        update(catalog, state, input, &mut config, &mut next, &mut timer, 0.016);
        next
    }

    #[test]
    fn delete_with_empty_selection_flashes_a_notice() {
        let mut catalog = small_catalog();
        let mut state = BrowserState::new(false);
        let mut input = InputState::new();
        input.delete = true;

        let next = run_update(&mut catalog, &mut state, &input);

        match next {
            Some(Screen::Notice(notice)) => {
                assert!(notice.message.contains("No amiibos selected"));
            }
            other => panic!("expected a notice, got {:?}", other),
        }
        // No entries were touched.
        assert_eq!(catalog.count_selected(), 0);
    }

    #[test]
    fn generate_with_a_selection_enters_the_working_state() {
        let mut catalog = small_catalog();
        let mut state = BrowserState::new(false);
        catalog.toggle(0);
        state.selected_count = 1;

        let mut input = InputState::new();
        input.generate = true;

        let next = run_update(&mut catalog, &mut state, &input);
        assert_eq!(next, Some(Screen::Working(Job::Generate)));
    }

    #[test]
    fn exit_button_requests_session_end() {
        let mut catalog = small_catalog();
        let mut state = BrowserState::new(false);
        let mut input = InputState::new();
        input.exit = true;

        run_update(&mut catalog, &mut state, &input);
        assert!(state.exit_requested);
    }

    #[test]
    fn toggle_keeps_the_running_count_in_step() {
        let mut catalog = small_catalog();
        let mut state = BrowserState::new(false);
        let mut input = InputState::new();
        input.toggle = true;

        run_update(&mut catalog, &mut state, &input);
        assert_eq!(state.selected_count, 1);
        run_update(&mut catalog, &mut state, &input);
        assert_eq!(state.selected_count, 0);
    }

    #[test]
    fn analog_scroll_is_paced_by_the_repeat_timer() {
        let doc = json!({ "amiibo": (0..60).map(|i| json!({ "name": format!("E{}", i) })).collect::<Vec<_>>() });
        let mut catalog = Catalog::from_document(&doc).unwrap();
        let mut state = BrowserState::new(false);
        let mut input = InputState::new();
        input.stick_y = -1.0; // stick fully down

        let mut next = None;
        let mut timer = 0.0;
        let mut config = Config::default();

        update(&mut catalog, &mut state, &input, &mut config, &mut next, &mut timer, 0.016);
        assert_eq!(state.cursor, 10);

        // Next frame arrives before the repeat window elapses: no movement.
        update(&mut catalog, &mut state, &input, &mut config, &mut next, &mut timer, 0.016);
        assert_eq!(state.cursor, 10);

        // Once the window elapses the cursor steps again.
        update(&mut catalog, &mut state, &input, &mut config, &mut next, &mut timer, 0.05);
        assert_eq!(state.cursor, 20);
    }

    #[test]
    fn sort_button_reorders_the_catalog() {
        let mut catalog = small_catalog();
        let mut state = BrowserState::new(false);
        let mut input = InputState::new();
        input.sort = true;

        // Option 1 is amiiboSeries descending.
        run_update(&mut catalog, &mut state, &input);
        assert_eq!(state.sort_index, 1);
        assert_eq!(catalog.get(0).unwrap().series(), "Super Smash Bros.");
    }
}
