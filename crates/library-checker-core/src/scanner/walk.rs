use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// One immediate subdirectory of the library root, named after an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistFolder {
    pub path: PathBuf,
    pub name: String,
}

/// Fails with [`Error::Directory`] unless `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(Error::Directory {
            path: root.to_path_buf(),
            reason: "the provided directory does not exist".to_string(),
        });
    }
    if !root.is_dir() {
        return Err(Error::Directory {
            path: root.to_path_buf(),
            reason: "the provided path is not a directory".to_string(),
        });
    }
    Ok(())
}

/// List the immediate subdirectories of `root`, sorted by name.
/// Files and symlinks are ignored; unreadable entries are logged and skipped.
pub fn scan_artist_folders(root: &Path) -> Result<Vec<ArtistFolder>> {
    validate_root(root)?;

    let mut folders = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            // depth 0 means the root itself could not be read
            Err(err) if err.depth() == 0 => {
                return Err(Error::Directory {
                    path: root.to_path_buf(),
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                error!("Error reading entry in {}: {}", root.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        folders.push(ArtistFolder {
            path: root.join(&name),
            name,
        });
    }

    debug!("Found {} artist folders in {}", folders.len(), root.display());
    Ok(folders)
}
