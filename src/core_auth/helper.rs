use log::debug;
use std::path::{Path, PathBuf};

/// A per-user folder replaces the server root only when it exists and is a
/// directory; anything else silently falls back to `default_root`.
pub async fn user_root(default_root: &Path, user_folder: Option<&Path>) -> PathBuf {
    if let Some(folder) = user_folder {
        match tokio::fs::metadata(folder).await {
            Ok(metadata) if metadata.is_dir() => return folder.to_path_buf(),
            _ => debug!(
                "User folder {:?} is not a usable directory, using {:?}",
                folder, default_root
            ),
        }
    }
    default_root.to_path_buf()
}

/// A configured password matches only an identical supplied one. An entry
/// without a password never matches.
pub fn password_matches(configured: Option<&str>, supplied: Option<&str>) -> bool {
    matches!((configured, supplied), (Some(expected), Some(given)) if expected == given)
}
