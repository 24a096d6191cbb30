use crate::errors::{HistError, Result};
use crate::image_loader::is_supported_image;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Listed when the extension is a known image type or missing entirely;
/// decoding sniffs the content either way.
fn is_candidate(path: &Path) -> bool {
    path.extension().is_none() || is_supported_image(path)
}

/// Images directly inside `folder`, in natural file name order.
/// Symlinks are followed.
pub fn discover_images(folder: &Path) -> Result<Vec<PathBuf>> {
    let directory_err = |message: String| HistError::DirectoryRead {
        path: folder.to_path_buf(),
        message,
    };

    if !folder.is_dir() {
        return Err(directory_err("not a directory".to_string()));
    }

    let walker = WalkDir::new(folder)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1);

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| directory_err(e.to_string()))?;
        let path = entry.path();
        if entry.file_type().is_file() && !is_hidden(path) && is_candidate(path) {
            images.push(path.to_path_buf());
        }
    }

    images.sort_by(|a, b| natord::compare(&sort_key(a), &sort_key(b)));
    log::debug!("Discovered {} images in {:?}", images.len(), folder);
    Ok(images)
}
