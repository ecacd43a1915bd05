use crate::utils::catalogue::{CatalogueHandle, parse_catalogue};
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Reloads the catalogue whenever the pet data file is modified.
pub struct SourceWatcher {
    _watcher: notify::RecommendedWatcher,
}

impl SourceWatcher {
    pub fn new(path: &Path, catalogue: Arc<CatalogueHandle>) -> notify::Result<Self> {
        let path: PathBuf = path.to_path_buf();

        let (tx, rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        std::thread::spawn(move || {
            for res in rx {
                match res {
                    Ok(event) if matches!(event.kind, EventKind::Modify(_)) => {
                        // Editors often write in several steps.
                        std::thread::sleep(Duration::from_millis(100));
                        reload_from_file(&path, &catalogue);
                    }
                    Ok(_) => {}
                    Err(e) => log::error!("Pet data watcher error: {:?}", e),
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

/// Parse `path` and swap it in. A failed read or parse keeps the old data.
pub fn reload_from_file(path: &Path, catalogue: &CatalogueHandle) -> bool {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| parse_catalogue(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(next) => {
            log::info!("Pet data changed, reloaded {} pets", next.len());
            catalogue.replace(next);
            true
        }
        Err(e) => {
            log::error!("Failed to reload pet data from {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::catalogue::Catalogue;

    #[test]
    fn test_reload_from_file_swaps_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.txt");
        std::fs::write(&path, r#"{ ["Bee"] = new():Tag("Buzz") }"#).unwrap();

        let handle = CatalogueHandle::new(Catalogue::empty());
        assert!(reload_from_file(&path, &handle));
        assert!(handle.snapshot().get("Bee").is_some());
    }

    #[test]
    fn test_broken_file_keeps_previous_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.txt");
        std::fs::write(&path, r#"{ ["Bee"] = new() }"#).unwrap();
        let handle = CatalogueHandle::new(Catalogue::empty());
        reload_from_file(&path, &handle);

        std::fs::write(&path, "half-written").unwrap();
        assert!(!reload_from_file(&path, &handle));
        assert_eq!(handle.snapshot().len(), 1);
    }
}
