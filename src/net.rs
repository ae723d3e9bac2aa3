use once_cell::sync::Lazy;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = "AmiiGen/0.2";
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;
// Anything smaller than this is an error page, not a database or an image.
const MIN_DOWNLOAD_BYTES: usize = 100;

static CLIENT: Lazy<reqwest::blocking::Client> = Lazy::new(|| {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .unwrap()
});

/// One-shot GET to a file on disk. The body is staged in a temp file next to
/// the destination and only swapped in once the download checks out.
pub fn download_file(url: &str, dest: &Path) -> Result<u64, String> {
    if url.is_empty() {
        return Err("empty download url".to_string());
    }

    let response = CLIENT
        .get(url)
        .send()
        .map_err(|e| format!("download failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("http error: {}", status));
    }

    let bytes = response
        .bytes()
        .map_err(|e| format!("failed to read download: {}", e))?;
    if bytes.len() < MIN_DOWNLOAD_BYTES {
        return Err(format!("downloaded file too small: {} bytes", bytes.len()));
    }

    let dir = dest
        .parent()
        .ok_or_else(|| "invalid download destination".to_string())?;
    fs::create_dir_all(dir).map_err(|e| e.to_string())?;

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| e.to_string())?;
    staged.write_all(&bytes).map_err(|e| e.to_string())?;
    staged.persist(dest).map_err(|e| e.to_string())?;

    Ok(bytes.len() as u64)
}

/// Makes sure a database file is present, downloading one if it is not.
pub fn ensure_database(url: &str, db_path: &Path) -> Result<(), String> {
    if db_path.exists() {
        let size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
        println!("[Info] Database found ({} bytes)", size);
        return Ok(());
    }

    println!("[Info] No database found. Downloading...");
    download_database(url, db_path)
}

/// Drops the current database and fetches a fresh one.
pub fn update_database(url: &str, db_path: &Path) -> Result<(), String> {
    if db_path.exists() {
        if let Err(e) = fs::remove_file(db_path) {
            eprintln!("[Error] Failed to remove old database: {}", e);
        }
    }

    download_database(url, db_path)
}

fn download_database(url: &str, db_path: &Path) -> Result<(), String> {
    println!("[Info] Connecting to {}", url);
    println!("[Info] This may take 30-60 seconds depending on connection...");

    let size = download_file(url, db_path)?;
    println!("[Info] Download completed successfully ({} bytes)", size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_rejected_before_any_io() {
        let err = download_file("", Path::new("/tmp/never-written")).unwrap_err();
        assert!(err.contains("empty"));
    }
}
