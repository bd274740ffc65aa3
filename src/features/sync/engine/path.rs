//! Path normalization for catalog keys.
//!
//! Stored names use `/` separators and keep their original casing. Matching
//! between disk and catalog uses the case-folded form from [`match_key`].

use std::path::{Component, Path, MAIN_SEPARATOR};

/// Path of `absolute` relative to `base`, `/` separated, without a leading `./`.
///
/// When `absolute` is not under `base` (different volumes, mixed prefixes) this
/// falls back to stripping `base` as a string prefix and never fails.
pub fn normalize(absolute: &Path, base: &Path) -> String {
    let relative = match absolute.strip_prefix(base) {
        Ok(relative) => relative
            .components()
            .filter_map(|component| match component {
                Component::CurDir => None,
                other => Some(other.as_os_str().to_string_lossy().into_owned()),
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => {
            let absolute = absolute.to_string_lossy();
            let base = base.to_string_lossy();
            absolute
                .strip_prefix(base.as_ref())
                .unwrap_or(absolute.as_ref())
                .trim_start_matches(['/', MAIN_SEPARATOR])
                .to_string()
        }
    };

    canonical_separators(&relative)
}

/// Case-folded comparison key for a stored or normalized name
pub fn match_key(name: &str) -> String {
    canonical_separators(name).to_lowercase()
}

/// A backslash is only a separator on platforms that use it as one; elsewhere
/// it is an ordinary file name character.
fn canonical_separators(path: &str) -> String {
    let unified = if MAIN_SEPARATOR == '\\' {
        path.replace('\\', "/")
    } else {
        path.to_string()
    };
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_nested_file() {
        let base = PathBuf::from("/srv/shared");
        let file = base.join("Team A").join("Report.TXT");

        assert_eq!(normalize(&file, &base), "Team A/Report.TXT");
    }

    #[test]
    fn test_normalize_strips_current_dir_marker() {
        let base = PathBuf::from("shared");
        let file = PathBuf::from("shared/./docs/a.md");

        assert_eq!(normalize(&file, &base), "docs/a.md");
    }

    #[test]
    fn test_normalize_keeps_dot_files() {
        let base = PathBuf::from("/srv/shared");

        assert_eq!(normalize(&base.join(".env"), &base), ".env");
    }

    #[test]
    fn test_normalize_unrelated_path_is_best_effort() {
        let base = PathBuf::from("/srv/shared");
        let file = PathBuf::from("/mnt/other/x.txt");

        assert_eq!(normalize(&file, &base), "mnt/other/x.txt");
    }

    #[test]
    fn test_match_key_folds_case() {
        assert_eq!(match_key("./a/B.md"), "a/b.md");
        assert_eq!(match_key("report.txt"), match_key("REPORT.txt"));
    }

    #[cfg(windows)]
    #[test]
    fn test_match_key_unifies_windows_separators() {
        assert_eq!(match_key("Docs\\Report.TXT"), "docs/report.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_backslash_is_a_name_character_on_unix() {
        let base = PathBuf::from("/srv/shared");
        let file = base.join("a\\b.txt");

        assert_eq!(normalize(&file, &base), "a\\b.txt");
        assert_eq!(match_key("A\\B.txt"), "a\\b.txt");
        assert_ne!(match_key("a\\b.txt"), match_key("a/b.txt"));
    }
}
