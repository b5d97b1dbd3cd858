//! Filesystem locations for storage and trace files.

use std::path::{Path, PathBuf};

/// Name of the key-value store file inside the data directory.
pub const STORE_FILE: &str = "store.json";

/// Returns the default data directory.
///
/// Resolves to the platform data directory (`$XDG_DATA_HOME/eventmap` on
/// Linux) and falls back to `./.eventmap` when the platform has none.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".eventmap"), |dir| dir.join("eventmap"))
}

/// Path of the key-value store under `data_dir`.
#[must_use]
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, or with no known home directory, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use eventmap::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_the_crate_name() {
        let dir = get_data_dir();
        assert!(dir.ends_with("eventmap") || dir.ends_with(".eventmap"));
        assert_eq!(store_path(&dir).file_name().unwrap(), STORE_FILE);
    }

    #[test]
    fn tilde_expansion_leaves_other_paths_alone() {
        assert_eq!(expand_tilde("relative/file.json"), PathBuf::from("relative/file.json"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x.toml"), home.join("x.toml"));
        }
    }
}
