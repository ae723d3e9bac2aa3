use std::fs;
use std::path::Path;

use crate::amiibo;
use crate::catalog::Catalog;
use crate::types::BatchSummary;

/// One in-order pass over the catalog, generating a record for every
/// selected entry. Selection flags are cleared as entries are processed,
/// whether or not their record could be written.
pub fn generate_selected(
    catalog: &mut Catalog,
    with_image: bool,
    amiibo_dir: &Path,
    image_height: u32,
) -> BatchSummary {
    let total = catalog.count_selected();
    let mut summary = BatchSummary::new("GENERATE");

    for index in 0..catalog.len() {
        let selected = catalog.get(index).map(|e| e.selected).unwrap_or(false);
        if !selected {
            continue;
        }
        summary.processed += 1;

        let (label, result) = match catalog.get(index) {
            Some(entry) => (
                entry.label(),
                amiibo::generate(entry, with_image, amiibo_dir, image_height),
            ),
            None => continue,
        };

        match result {
            Ok(()) => {
                println!("[Info] [{}/{}] Generated: {}", summary.processed, total, label);
                summary.succeeded += 1;
                summary.lines.push(format!("[{}/{}] {}... OK", summary.processed, total, label));
            }
            Err(e) => {
                eprintln!("[Error] [{}/{}] {}: {}", summary.processed, total, label, e);
                summary.failed += 1;
                summary
                    .lines
                    .push(format!("[{}/{}] {}... FAILED ({})", summary.processed, total, label, e));
            }
        }

        if let Some(entry) = catalog.get_mut(index) {
            entry.selected = false;
        }
    }

    summary
}

/// The matching pass for deletion. Records whose directory is already gone
/// count as skipped, not failed; empty series directories left behind are
/// swept up afterwards.
pub fn delete_selected(catalog: &mut Catalog, amiibo_dir: &Path) -> BatchSummary {
    let total = catalog.count_selected();
    let mut summary = BatchSummary::new("DELETE");

    for index in 0..catalog.len() {
        let selected = catalog.get(index).map(|e| e.selected).unwrap_or(false);
        if !selected {
            continue;
        }
        summary.processed += 1;

        let (label, result) = match catalog.get(index) {
            Some(entry) => {
                let missing = matches!(
                    amiibo::record_dir(entry, amiibo_dir),
                    Ok(dir) if !dir.exists()
                );
                if missing {
                    (entry.label(), None)
                } else {
                    (entry.label(), Some(amiibo::erase(entry, amiibo_dir)))
                }
            }
            None => continue,
        };

        match result {
            None => {
                println!("[Info] [{}/{}] {}... SKIP (not found)", summary.processed, total, label);
                summary.skipped += 1;
                summary
                    .lines
                    .push(format!("[{}/{}] {}... SKIP (not found)", summary.processed, total, label));
            }
            Some(Ok(())) => {
                println!("[Info] [{}/{}] Deleted: {}", summary.processed, total, label);
                summary.succeeded += 1;
                summary.lines.push(format!("[{}/{}] {}... OK", summary.processed, total, label));
            }
            Some(Err(e)) => {
                eprintln!("[Error] [{}/{}] {}: {}", summary.processed, total, label, e);
                summary.failed += 1;
                summary
                    .lines
                    .push(format!("[{}/{}] {}... FAILED ({})", summary.processed, total, label, e));
            }
        }

        if let Some(entry) = catalog.get_mut(index) {
            entry.selected = false;
        }
    }

    sweep_empty_dirs(amiibo_dir);

    summary
}

// A deleted record can leave its series directory empty; clean those up.
// Cleanup problems are not worth surfacing.
fn sweep_empty_dirs(base: &Path) {
    let Ok(entries) = fs::read_dir(base) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let empty = fs::read_dir(&path)
            .map(|mut children| children.next().is_none())
            .unwrap_or(false);
        if empty {
            let _ = fs::remove_dir(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use serde_json::json;
    use tempfile::tempdir;

    fn catalog_of_three() -> Catalog {
        let doc = json!({
            "amiibo": [
                { "name": "Mario", "amiiboSeries": "Super Smash Bros.", "head": "00000000", "tail": "00000002" },
                { "name": "Callie", "amiiboSeries": "Splatoon", "head": "04000100", "tail": "03520902" },
                { "name": "Broken" },
            ]
        });
        Catalog::from_document(&doc).unwrap()
    }

    #[test]
    fn empty_selection_processes_nothing() {
        let base = tempdir().unwrap();
        let mut catalog = catalog_of_three();

        let summary = generate_selected(&mut catalog, false, base.path(), 150);

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.lines.is_empty());
        // No record directories appeared.
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn generate_only_touches_selected_entries_and_clears_flags() {
        let base = tempdir().unwrap();
        let mut catalog = catalog_of_three();
        catalog.toggle(0);
        catalog.toggle(1);

        let summary = generate_selected(&mut catalog, false, base.path(), 150);

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(catalog.count_selected(), 0);
        assert!(base.path().join("Super Smash Bros").exists());
        assert!(base.path().join("Splatoon").exists());
    }

    #[test]
    fn generate_counts_failures_but_keeps_going() {
        let base = tempdir().unwrap();
        let mut catalog = catalog_of_three();
        catalog.toggle(1);
        catalog.toggle(2); // no id, cannot generate

        let summary = generate_selected(&mut catalog, false, base.path(), 150);

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        // The failed entry was still unselected.
        assert_eq!(catalog.count_selected(), 0);
    }

    #[test]
    fn delete_skips_missing_records_and_sweeps_empty_series_dirs() {
        let base = tempdir().unwrap();
        let mut catalog = catalog_of_three();

        // Materialize only Callie, then ask for both deletions.
        catalog.toggle(1);
        generate_selected(&mut catalog, false, base.path(), 150);
        catalog.toggle(0);
        catalog.toggle(1);

        let summary = delete_selected(&mut catalog, base.path());

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(catalog.count_selected(), 0);
        // The now-empty Splatoon series directory was removed too.
        assert!(!base.path().join("Splatoon").exists());
    }

    #[test]
    fn delete_reports_invalid_entries_as_failures() {
        let base = tempdir().unwrap();
        let mut catalog = catalog_of_three();
        catalog.toggle(2);

        let summary = delete_selected(&mut catalog, base.path());

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 0);
    }
}
