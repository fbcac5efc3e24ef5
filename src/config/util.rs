//! Configuration utility functions.

use std::path::{Path, PathBuf};

use url::Url;

/// Parse a site URL, ensuring the path ends in `/`.
///
/// Returns `None` for strings that are not absolute hierarchical URLs
/// (`example.org`, `mailto:x@y`).
///
/// # Examples
/// ```ignore
/// parse_site_url("https://example.org/en/0.1.34") -> Some("https://example.org/en/0.1.34/")
/// parse_site_url("https://example.org")           -> Some("https://example.org/")
/// parse_site_url("example.org")                   -> None
/// ```
pub fn parse_site_url(url_str: &str) -> Option<Url> {
    let mut url = Url::parse(url_str.trim()).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/docs/site/guide/  ← cwd
/// /home/user/docs/llmstxt.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

/// Upward search starting at `start`.
pub fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    // An absolute path is taken as-is
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_site_url() {
        assert_eq!(
            parse_site_url("https://example.org/en/0.1.34").map(String::from),
            Some("https://example.org/en/0.1.34/".to_string())
        );
        assert_eq!(
            parse_site_url("https://example.org/en/0.1.34/").map(String::from),
            Some("https://example.org/en/0.1.34/".to_string())
        );
        assert_eq!(
            parse_site_url("https://example.org").map(String::from),
            Some("https://example.org/".to_string())
        );
    }

    #[test]
    fn test_parse_site_url_invalid() {
        assert!(parse_site_url("example.org").is_none());
        assert!(parse_site_url("mailto:me@example.org").is_none());
        assert!(parse_site_url("").is_none());
    }

    #[test]
    fn test_find_config_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("site/guide");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("llmstxt.toml"), "").unwrap();

        let found = find_config_from(&nested, Path::new("llmstxt.toml"));
        assert_eq!(found, Some(dir.path().join("llmstxt.toml")));
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_from(dir.path(), &path), None);
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_from(Path::new("/"), &path), Some(path));
    }
}
