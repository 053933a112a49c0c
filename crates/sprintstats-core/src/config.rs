//! Layered configuration.
//!
//! Settings come from a list of candidate TOML files merged in priority
//! order (later candidates win per key), with command-line flags applied on
//! top by the caller. An explicitly requested file that does not exist is a
//! warning, not a failure: the discovered candidates are used instead.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Candidate config files, lowest priority first. `~/` expands to the
/// user's home directory regardless of working directory.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "/etc/sprintstats.toml",
    "~/.sprintstats.toml",
    "sprintstats.toml",
];

/// File-backed settings. Every key is optional; the CLI decides which are
/// required for a given run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub user: Option<String>,
    pub password: Option<String>,
    pub server: Option<String>,
    pub default_points: Option<f64>,
}

impl Settings {
    /// Overlay `other` on top of `self`, key by key. Keys absent in `other`
    /// keep their current value.
    pub fn merge(&mut self, other: Settings) {
        if other.user.is_some() {
            self.user = other.user;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.default_points.is_some() {
            self.default_points = other.default_points;
        }
    }

    /// Points assumed for unscored issues. Defaults to `0`.
    #[must_use]
    pub fn default_points(&self) -> f64 {
        self.default_points.unwrap_or(0.0)
    }
}

/// Expand a leading `~/` to the user's home directory.
#[must_use]
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn read_settings(path: &Path) -> Result<Settings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Load settings from the candidate files, merged lowest priority first.
///
/// When `explicit` is given and exists, its settings override everything the
/// candidates supplied. When it is given but missing, a warning is logged
/// and the discovered candidates are used on their own.
///
/// # Errors
///
/// Returns an error when an existing config file cannot be read or parsed.
pub fn load_settings(explicit: Option<&Path>, candidates: &[&str]) -> Result<Settings> {
    let mut merged = Settings::default();
    for candidate in candidates {
        let path = expand_path(candidate);
        if path.exists() {
            log::debug!("Loading settings from {}", path.display());
            merged.merge(read_settings(&path)?);
        }
    }

    if let Some(path) = explicit {
        if path.exists() {
            merged.merge(read_settings(path)?);
        } else {
            log::warn!(
                "Specified config file {} not found, falling back to discovered files",
                path.display()
            );
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn as_candidates(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_later_candidates_override_earlier_ones() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_config(&dir, "a.toml", "server = \"https://one.example.com\"\nuser = \"alice\"\n"),
            write_config(&dir, "b.toml", "server = \"https://two.example.com\"\n"),
        ];
        let candidates = as_candidates(&paths);
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();

        let settings = load_settings(None, &refs).unwrap();
        assert_eq!(settings.server.as_deref(), Some("https://two.example.com"));
        // Keys missing from the later file survive from the earlier one.
        assert_eq!(settings.user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_each_prefix_of_the_candidate_list_wins_in_order() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..4)
            .map(|n| write_config(&dir, &format!("{n}.toml"), &format!("default_points = {n}\n")))
            .collect();
        let candidates = as_candidates(&paths);

        for n in 0..4 {
            let refs: Vec<&str> = candidates[0..=n].iter().map(String::as_str).collect();
            let settings = load_settings(None, &refs).unwrap();
            assert!((settings.default_points() - n as f64).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_missing_candidates_are_skipped() {
        let dir = TempDir::new().unwrap();
        let existing = write_config(&dir, "real.toml", "user = \"bob\"\n");
        let missing = dir.path().join("not-there.toml");
        let candidates = as_candidates(&[missing, existing]);
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();

        let settings = load_settings(None, &refs).unwrap();
        assert_eq!(settings.user.as_deref(), Some("bob"));
    }

    #[test]
    fn test_explicit_path_overrides_candidates() {
        let dir = TempDir::new().unwrap();
        let candidate = write_config(&dir, "base.toml", "user = \"alice\"\nserver = \"https://a\"\n");
        let explicit = write_config(&dir, "override.toml", "user = \"carol\"\n");
        let candidates = as_candidates(&[candidate]);
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();

        let settings = load_settings(Some(&explicit), &refs).unwrap();
        assert_eq!(settings.user.as_deref(), Some("carol"));
        assert_eq!(settings.server.as_deref(), Some("https://a"));
    }

    #[test]
    fn test_nonexistent_explicit_path_falls_back() {
        let dir = TempDir::new().unwrap();
        let candidate = write_config(&dir, "base.toml", "user = \"alice\"\n");
        let candidates = as_candidates(&[candidate]);
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();

        let settings = load_settings(Some(Path::new("/no/such/config.toml")), &refs).unwrap();
        assert_eq!(settings.user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_default_points_defaults_to_zero() {
        let settings = load_settings(None, &[]).unwrap();
        assert!(settings.default_points.is_none());
        assert!(settings.default_points().abs() < f64::EPSILON);
    }

    #[test]
    fn test_expand_path_resolves_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_path("~/sprintstats.toml"), home.join("sprintstats.toml"));
    }

    #[test]
    fn test_expand_path_leaves_absolute_paths_alone() {
        assert_eq!(
            expand_path("/etc/sprintstats.toml"),
            PathBuf::from("/etc/sprintstats.toml")
        );
    }

    #[test]
    fn test_merge_prefers_incoming_keys() {
        let mut base = Settings {
            user: Some("alice".to_string()),
            password: Some("secret".to_string()),
            server: None,
            default_points: Some(1.0),
        };
        base.merge(Settings {
            user: Some("bob".to_string()),
            password: None,
            server: Some("https://jira.example.com".to_string()),
            default_points: None,
        });

        assert_eq!(base.user.as_deref(), Some("bob"));
        assert_eq!(base.password.as_deref(), Some("secret"));
        assert_eq!(base.server.as_deref(), Some("https://jira.example.com"));
        assert!((base.default_points() - 1.0).abs() < f64::EPSILON);
    }
}
