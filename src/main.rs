use gilrs::Gilrs;
use macroquad::prelude::*;
use std::path::{Path, PathBuf};

mod amiibo;
mod batch;
mod catalog;
mod config;
mod input;
mod menu;
mod net;
mod types;
mod ui;

use catalog::Catalog;
use config::Config;
use input::InputState;
use menu::{BrowserState, SORT_OPTIONS};
use types::{Job, Notice, Screen};

const SCREEN_WIDTH: i32 = 1280;
const SCREEN_HEIGHT: i32 = 720;
pub const VERSION_NUMBER: &str = "V0.2";

// How long the settle countdown runs after a successful database reload.
const RELOAD_SETTLE_SECS: f32 = 5.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "AmiiGen".to_owned(),
        window_resizable: false,
        window_width: SCREEN_WIDTH,
        window_height: SCREEN_HEIGHT,
        high_dpi: false,
        fullscreen: false,

        ..Default::default()
    }
}

/// Makes sure a database exists on disk, then parses it into a catalog.
fn load_catalog(config: &Config, db_path: &Path) -> Result<Catalog, String> {
    net::ensure_database(&config.database_url, db_path)?;
    let doc = catalog::read_document(db_path)?;
    Catalog::from_document(&doc)
}

/// The full manual-reload action: redownload, reparse, replace.
fn reload_catalog(config: &Config, db_path: &Path) -> Result<Catalog, String> {
    net::update_database(&config.database_url, db_path)?;
    let doc = catalog::read_document(db_path)?;
    Catalog::from_document(&doc)
}

fn resolve_paths(config: &Config) -> Option<(PathBuf, PathBuf)> {
    let db_path = config::database_path()?;
    let amiibo_dir = config.amiibo_dir_path()?;
    Some((db_path, amiibo_dir))
}

#[macroquad::main(window_conf)]
async fn main() {
    println!("[Info] AmiiGen {} starting...", VERSION_NUMBER);

    let mut config = Config::load();

    // Initialize gamepad support
    let mut gilrs = Gilrs::new().unwrap();
    let mut input_state = InputState::new();

    let mut catalog = Catalog::default();
    let mut state = BrowserState::new(config.download_images);

    let (db_path, amiibo_dir) = match resolve_paths(&config) {
        Some(paths) => paths,
        None => {
            eprintln!("[Error] Could not find user's data directory.");
            return;
        }
    };

    let mut current_screen = match load_catalog(&config, &db_path) {
        Ok(loaded) => {
            catalog = loaded;
            let (field, ascending) = SORT_OPTIONS[state.sort_index];
            catalog.sort(field, ascending);
            println!("[Info] Loaded {} amiibos", catalog.len());
            Screen::Browser
        }
        Err(e) => {
            eprintln!("[Error] {}", e);
            Screen::Fatal(e)
        }
    };

    // The working screen is presented for one frame before its job runs, so
    // the user sees what the session is blocked on.
    let mut working_armed = false;
    let mut analog_timer = 0.0f32;

    loop {
        if state.exit_requested {
            break;
        }

        input_state.reset();
        input_state.update_keyboard();
        input_state.update_controller(&mut gilrs);

        let dt = get_frame_time();
        let mut next_screen: Option<Screen> = None;

        match &mut current_screen {
            Screen::Browser => {
                ui::browser::draw(&catalog, &state);
                ui::browser::update(
                    &mut catalog,
                    &mut state,
                    &input_state,
                    &mut config,
                    &mut next_screen,
                    &mut analog_timer,
                    dt,
                );
            }
            Screen::Working(job) => {
                let job = *job;
                let label = match job {
                    Job::Generate => format!(
                        "Generating {} amiibos. Please wait...",
                        state.selected_count
                    ),
                    Job::Delete => {
                        format!("Deleting {} amiibos. Please wait...", state.selected_count)
                    }
                    Job::Reload => {
                        "Updating amiibo database. This might take a few seconds.".to_string()
                    }
                };
                ui::status::draw_working(&label);

                if working_armed {
                    working_armed = false;
                    match job {
                        Job::Generate => {
                            let summary = batch::generate_selected(
                                &mut catalog,
                                state.images_enabled,
                                &amiibo_dir,
                                config.image_height,
                            );
                            state.selected_count = 0;
                            next_screen = Some(Screen::Summary(summary));
                        }
                        Job::Delete => {
                            let summary = batch::delete_selected(&mut catalog, &amiibo_dir);
                            state.selected_count = 0;
                            next_screen = Some(Screen::Summary(summary));
                        }
                        Job::Reload => match reload_catalog(&config, &db_path) {
                            Ok(loaded) => {
                                catalog = loaded;
                                state.reset();
                                let (field, ascending) = SORT_OPTIONS[state.sort_index];
                                catalog.sort(field, ascending);
                                println!("[Info] Database updated, {} amiibos", catalog.len());
                                next_screen = Some(Screen::Notice(Notice::countdown(
                                    "Database updated!",
                                    RELOAD_SETTLE_SECS,
                                )));
                            }
                            Err(e) => {
                                // Never keep browsing against a database that
                                // failed to come back.
                                eprintln!("[Error] Database update failed: {}", e);
                                state.exit_requested = true;
                            }
                        },
                    }
                } else {
                    working_armed = true;
                }
            }
            Screen::Summary(summary) => {
                ui::status::draw_summary(summary);
                if input_state.back {
                    next_screen = Some(Screen::Browser);
                }
            }
            Screen::Notice(notice) => {
                notice.remaining -= dt;
                ui::status::draw_notice(notice);
                if notice.remaining <= 0.0 {
                    next_screen = Some(Screen::Browser);
                }
            }
            Screen::Fatal(message) => {
                ui::status::draw_fatal(message);
                if input_state.exit {
                    state.exit_requested = true;
                }
            }
        }

        if let Some(screen) = next_screen {
            current_screen = screen;
        }

        next_frame().await
    }

    println!("[Info] AmiiGen exiting.");
}
