use std::path::PathBuf;

use dirs_next::home_dir;

/// Expands a leading `~` (alone, `~/`, or `~\`) to the user's home directory.
///
/// Paths without a tilde prefix are returned trimmed but otherwise unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde(" /etc/rentals.json "), PathBuf::from("/etc/rentals.json"));
    }

    #[test]
    fn home_prefix_is_expanded() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/rentals/config.json"), home.join("rentals/config.json"));
        }
    }
}
