use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::catalog::Catalog;

/// Default settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "festival.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the stored lineup records
    pub data_dir: PathBuf,
    pub bind_addr: String,
    /// TOML file replacing the built-in stages, times and seed roster
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            bind_addr: "127.0.0.1:8080".into(),
            catalog_path: None,
        }
    }
}

/// Resolves settings: defaults, then the TOML file, then `FESTIVAL_*`
/// environment variables.
///
/// An explicit `path` must exist; the default `festival.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => read_settings_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_settings_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Settings::default(),
    };
    Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let settings = toml::from_str(&raw)
        .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("FESTIVAL_DATA_DIR") {
        settings.data_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("FESTIVAL_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("FESTIVAL_CATALOG") {
        settings.catalog_path = Some(PathBuf::from(v));
    }
    settings
}

/// The configured catalog, or the built-in festival when none is set
pub fn load_catalog(settings: &Settings) -> anyhow::Result<Catalog> {
    let Some(path) = settings.catalog_path.as_deref() else {
        return Ok(Catalog::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog '{}'", path.display()))?;
    let catalog: Catalog = toml::from_str(&raw)
        .with_context(|| format!("invalid catalog '{}'", path.display()))?;
    catalog
        .validate()
        .with_context(|| format!("invalid catalog '{}'", path.display()))?;
    info!(
        path = %path.display(),
        stages = catalog.stages.len(),
        time_slots = catalog.time_slots.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn settings_file_overrides_defaults_field_by_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("festival.toml");
        fs::write(&path, "data_dir = \"/var/lib/lineup\"\n").unwrap();

        let settings = read_settings_file(&path).unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("/var/lib/lineup"));
        assert_eq!(settings.bind_addr, Settings::default().bind_addr);
    }

    #[test]
    fn explicit_missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn environment_wins_over_file_values() {
        let env: HashMap<&str, &str> = [("FESTIVAL_BIND", "0.0.0.0:9000"), ("FESTIVAL_CATALOG", "cat.toml")]
            .into_iter()
            .collect();

        let settings = apply_env_overrides(Settings::default(), |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.bind_addr, "0.0.0.0:9000");
        assert_eq!(settings.catalog_path, Some(PathBuf::from("cat.toml")));
        assert_eq!(settings.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn catalog_file_replaces_the_built_in_festival() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
stages = ["North", "South"]
time_slots = ["6:00 PM", "7:00 PM"]

[[seed]]
key = "local"
performers = ["The Openers", "The Closers"]
"#,
        )
        .unwrap();
        let settings = Settings {
            catalog_path: Some(path),
            ..Settings::default()
        };

        let catalog = load_catalog(&settings).unwrap();

        assert_eq!(catalog.stages, vec!["North", "South"]);
        let roster = catalog.seed_roster();
        assert_eq!(roster[1].id.as_str(), "local-1");
        assert_eq!(roster[1].name, "The Closers");
    }

    #[test]
    fn catalog_with_duplicate_stages_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "stages = [\"A\", \"A\"]\ntime_slots = [\"1:00 PM\"]\n").unwrap();
        let settings = Settings {
            catalog_path: Some(path),
            ..Settings::default()
        };

        assert!(load_catalog(&settings).is_err());
    }

    #[test]
    fn catalog_with_blank_seed_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            "stages = [\"A\"]\ntime_slots = [\"1:00 PM\"]\n\n[[seed]]\nkey = \"local\"\nperformers = [\"\"]\n",
        )
        .unwrap();
        let settings = Settings {
            catalog_path: Some(path),
            ..Settings::default()
        };

        let err = load_catalog(&settings).unwrap_err();
        assert!(format!("{err:#}").contains("blank performer name"));
    }
}
