use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogEntry;
use crate::net;

/// The five fields packed into the 16-hex-digit amiibo id (head + tail).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmiiboId {
    pub game_character_id: u16,
    pub character_variant: u8,
    pub figure_type: u8,
    pub model_number: u16,
    pub series: u8,
}

impl AmiiboId {
    pub fn parse(id: &str) -> Option<AmiiboId> {
        if id.len() < 16 || !id.is_ascii() {
            return None;
        }

        Some(AmiiboId {
            game_character_id: u16::from_str_radix(&id[0..4], 16).ok()?,
            character_variant: u8::from_str_radix(&id[4..6], 16).ok()?,
            figure_type: u8::from_str_radix(&id[6..8], 16).ok()?,
            model_number: u16::from_str_radix(&id[8..12], 16).ok()?,
            series: u8::from_str_radix(&id[12..14], 16).ok()?,
        })
    }
}

// The descriptor stores the character id in the console's byte order.
pub fn swap_u16(val: u16) -> u16 {
    (val << 8) | (val >> 8)
}

/// Strips characters the target filesystem chokes on and maps path
/// separators to underscores.
pub fn sanitize_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| !is_blacklisted(*c))
        .map(|c| if c == '/' { '_' } else { c })
        .collect()
}

fn is_blacklisted(c: char) -> bool {
    !c.is_ascii() || matches!(c, '!' | '?' | '.' | ',' | '\'' | '\\')
}

/// The on-disk home of one record: `<base>/<series>/<name>_<id>/`.
pub fn record_dir(entry: &CatalogEntry, base: &Path) -> Result<PathBuf, String> {
    let id = entry
        .record_id()
        .ok_or_else(|| "missing head or tail in entry data".to_string())?;
    let series = entry
        .amiibo_series
        .as_deref()
        .ok_or_else(|| "missing amiiboSeries or name in entry data".to_string())?;
    let name = entry
        .name
        .as_deref()
        .ok_or_else(|| "missing amiiboSeries or name in entry data".to_string())?;

    Ok(base
        .join(sanitize_name(series))
        .join(format!("{}_{}", sanitize_name(name), id)))
}

/// Materializes one emulated figurine record: directory, flag file, JSON
/// descriptor and (optionally) a resized thumbnail. Refuses to overwrite an
/// existing record.
pub fn generate(
    entry: &CatalogEntry,
    with_image: bool,
    base: &Path,
    image_height: u32,
) -> Result<(), String> {
    let id_str = entry
        .record_id()
        .ok_or_else(|| "missing head or tail in entry data".to_string())?;
    let id = AmiiboId::parse(&id_str).ok_or_else(|| "amiibo id is invalid".to_string())?;

    let dir = record_dir(entry, base)?;
    if dir.exists() {
        return Err("record already exists".to_string());
    }

    fs::create_dir_all(&dir).map_err(|e| format!("failed to create record directory: {}", e))?;

    fs::File::create(dir.join("amiibo.flag"))
        .map_err(|e| format!("failed to create amiibo.flag: {}", e))?;

    let descriptor = build_descriptor(entry.name(), &id);
    let text = serde_json::to_string_pretty(&descriptor)
        .map_err(|e| format!("failed to encode descriptor: {}", e))?;
    fs::write(dir.join("amiibo.json"), text)
        .map_err(|e| format!("failed to write amiibo.json: {}", e))?;

    if with_image {
        if let Some(url) = entry.image.as_deref() {
            let png_path = dir.join("amiibo.png");
            match net::download_file(url, &png_path) {
                Ok(_) => {
                    if let Err(e) = resize_to_height(&png_path, image_height) {
                        eprintln!("[Error] Failed to process image: {}", e);
                    }
                }
                // A missing thumbnail is not worth failing the record over.
                Err(e) => eprintln!("[Error] Failed to download image: {}", e),
            }
        }
    }

    Ok(())
}

/// Removes a record's directory tree.
pub fn erase(entry: &CatalogEntry, base: &Path) -> Result<(), String> {
    let id_str = entry
        .record_id()
        .ok_or_else(|| "missing head or tail in entry data".to_string())?;
    AmiiboId::parse(&id_str).ok_or_else(|| "amiibo id is invalid".to_string())?;

    let dir = record_dir(entry, base)?;
    fs::remove_dir_all(&dir).map_err(|e| format!("failed to delete record: {}", e))?;
    Ok(())
}

// The fixed descriptor schema the emuiibo backend expects. The uuid is
// 7 random bytes padded with 3 zeroes.
fn build_descriptor(name: &str, id: &AmiiboId) -> Value {
    let now = Utc::now();
    let date = json!({ "y": now.year(), "m": now.month(), "d": now.day() });

    let mut uuid = [0u8; 10];
    for byte in uuid.iter_mut().take(7) {
        *byte = rand::random::<u8>();
    }

    json!({
        "name": name,
        "write_counter": 0,
        "version": 0,
        "first_write_date": date,
        "last_write_date": date,
        "mii_charinfo_file": "mii-charinfo.bin",
        "id": {
            "game_character_id": swap_u16(id.game_character_id),
            "character_variant": id.character_variant,
            "figure_type": id.figure_type,
            "series": id.series,
            "model_number": id.model_number,
        },
        "uuid": uuid.to_vec(),
    })
}

/// Shrinks the image at `path` to `target_height`, keeping the aspect ratio
/// and rewriting it as an RGBA PNG.
pub fn resize_to_height(path: &Path, target_height: u32) -> Result<(), String> {
    let img = image::open(path).map_err(|e| format!("failed to load image: {}", e))?;
    let (width, height) = (img.width(), img.height());
    if height == 0 {
        return Err("image has no height".to_string());
    }

    let new_width = (target_height * width) / height;
    if new_width == 0 || target_height == 0 {
        return Err("invalid image dimensions for resizing".to_string());
    }

    let resized = img
        .resize_exact(new_width, target_height, image::imageops::FilterType::Triangle)
        .to_rgba8();
    resized
        .save(path)
        .map_err(|e| format!("failed to write resized image: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn callie() -> CatalogEntry {
        CatalogEntry::from_value(&json!({
            "name": "Callie",
            "amiiboSeries": "Splatoon",
            "head": "04000100",
            "tail": "03520902",
        }))
    }

    #[test]
    fn id_decoding_slices_the_hex_fields() {
        let id = AmiiboId::parse("0100000000040002").unwrap();
        assert_eq!(id.game_character_id, 0x0100);
        assert_eq!(id.character_variant, 0x00);
        assert_eq!(id.figure_type, 0x00);
        assert_eq!(id.model_number, 0x0004);
        assert_eq!(id.series, 0x00);
    }

    #[test]
    fn id_parse_rejects_bad_input() {
        assert_eq!(AmiiboId::parse(""), None);
        assert_eq!(AmiiboId::parse("0100"), None);
        assert_eq!(AmiiboId::parse("zzzz000000040002"), None);
        assert_eq!(AmiiboId::parse("ständchen0000000"), None);
    }

    #[test]
    fn swap_u16_flips_the_bytes() {
        assert_eq!(swap_u16(0x0108), 0x0801);
        assert_eq!(swap_u16(0xfeed), 0xedfe);
    }

    #[test]
    fn sanitize_strips_blacklisted_characters() {
        assert_eq!(sanitize_name("Mr. Game & Watch!"), "Mr Game & Watch");
        assert_eq!(sanitize_name("Zelda/Loftwing"), "Zelda_Loftwing");
        assert_eq!(sanitize_name("Pokémon"), "Pokmon");
    }

    #[test]
    fn record_dir_builds_the_expected_layout() {
        let dir = record_dir(&callie(), Path::new("/base")).unwrap();
        assert_eq!(
            dir,
            Path::new("/base/Splatoon/Callie_0400010003520902")
        );
    }

    #[test]
    fn generate_writes_flag_and_descriptor() {
        let base = tempdir().unwrap();
        let entry = callie();

        generate(&entry, false, base.path(), 150).unwrap();

        let dir = record_dir(&entry, base.path()).unwrap();
        assert!(dir.join("amiibo.flag").exists());
        let flag = std::fs::metadata(dir.join("amiibo.flag")).unwrap();
        assert_eq!(flag.len(), 0);

        let descriptor: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("amiibo.json")).unwrap())
                .unwrap();
        assert_eq!(descriptor["name"], "Callie");
        assert_eq!(descriptor["write_counter"], 0);
        assert_eq!(descriptor["mii_charinfo_file"], "mii-charinfo.bin");
        // 0x0400 byte-swapped.
        assert_eq!(descriptor["id"]["game_character_id"], 0x0004);
        assert_eq!(descriptor["id"]["model_number"], 0x0352);
        let uuid = descriptor["uuid"].as_array().unwrap();
        assert_eq!(uuid.len(), 10);
        assert!(uuid[7..].iter().all(|b| b == &json!(0)));
        assert!(descriptor["first_write_date"]["y"].is_number());
    }

    #[test]
    fn generate_refuses_to_overwrite() {
        let base = tempdir().unwrap();
        let entry = callie();
        generate(&entry, false, base.path(), 150).unwrap();
        assert!(generate(&entry, false, base.path(), 150).is_err());
    }

    #[test]
    fn generate_fails_without_an_id() {
        let base = tempdir().unwrap();
        let entry = CatalogEntry::from_value(&json!({ "name": "Nameless", "amiiboSeries": "X" }));
        assert!(generate(&entry, false, base.path(), 150).is_err());
        // Nothing was written.
        assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn erase_removes_the_record_tree() {
        let base = tempdir().unwrap();
        let entry = callie();
        generate(&entry, false, base.path(), 150).unwrap();
        let dir = record_dir(&entry, base.path()).unwrap();
        assert!(dir.exists());

        erase(&entry, base.path()).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn erase_on_a_missing_record_reports_failure() {
        let base = tempdir().unwrap();
        assert!(erase(&callie(), base.path()).is_err());
    }

    #[test]
    fn resize_keeps_the_aspect_ratio() {
        let base = tempdir().unwrap();
        let path = base.path().join("thumb.png");
        image::RgbaImage::new(40, 80).save(&path).unwrap();

        resize_to_height(&path, 20).unwrap();

        let resized = image::open(&path).unwrap();
        assert_eq!(resized.height(), 20);
        assert_eq!(resized.width(), 10);
    }
}
