use serde::{Deserialize, Serialize};
use std::{error::Error, fs, path::PathBuf};

pub const AMIIBO_API_URL: &str = "https://www.amiiboapi.com/api/amiibo/";

/// Returns the path to the user's data directory for AmiiGen.
/// This is a public helper function for other modules to use.
pub fn get_user_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|path| path.join(".local/share/amiigen"))
}

/// The downloaded amiibo database lives next to the config file.
pub fn database_path() -> Option<PathBuf> {
    get_user_data_dir().map(|dir| dir.join("amiibos.json"))
}

/// Gets the full path to the config.toml configuration file.
fn get_config_path() -> Result<PathBuf, Box<dyn Error>> {
    let mut config_path = get_user_data_dir().ok_or("Could not find user's data directory.")?;
    fs::create_dir_all(&config_path)?; // Create the directory if it doesn't exist
    config_path.push("config.toml");
    Ok(config_path)
}

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub amiibo_dir: Option<String>,
    pub download_images: bool,
    pub image_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: AMIIBO_API_URL.to_string(),
            amiibo_dir: None,
            download_images: false,
            image_height: 150,
        }
    }
}

impl Config {
    /// Loads the configuration from config.toml, or returns a default if it fails.
    pub fn load() -> Self {
        if let Ok(config_path) = get_config_path() {
            if let Ok(content) = fs::read_to_string(config_path) {
                if let Ok(config) = toml::from_str(&content) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Saves the current configuration to config.toml.
    pub fn save(&self) {
        if let Ok(config_path) = get_config_path() {
            if let Ok(toml_string) = toml::to_string_pretty(self) {
                let _ = fs::write(config_path, toml_string);
            }
        }
    }

    /// Where generated records go. The config can point this anywhere;
    /// by default it sits inside the data directory.
    pub fn amiibo_dir_path(&self) -> Option<PathBuf> {
        match &self.amiibo_dir {
            Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
            _ => get_user_data_dir().map(|dir| dir.join("amiibo")),
        }
    }
}
