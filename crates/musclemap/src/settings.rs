//! Layered analysis settings: profile, then file, then environment.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use musclemap_core::{AnalysisConfig, ConfigProfile};
use std::path::Path;

/// Environment variable prefix (`MUSCLEMAP_MIN_EDGE_WEIGHT=2`)
pub const ENV_PREFIX: &str = "MUSCLEMAP";

/// Load an [`AnalysisConfig`] from the selected profile, an optional config
/// file (YAML, JSON, or TOML by extension), and `MUSCLEMAP_*` variables.
pub fn load_analysis_config(profile: ConfigProfile, file: Option<&Path>) -> Result<AnalysisConfig> {
    load_with_environment(profile, file, env_source())
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("included_roles")
}

fn load_with_environment(
    profile: ConfigProfile,
    file: Option<&Path>,
    environment: Environment,
) -> Result<AnalysisConfig> {
    let base = Config::try_from(&profile.create_config())
        .with_context(|| format!("Failed to seed settings from profile '{}'", profile))?;

    let mut builder = Config::builder().add_source(base);
    if let Some(path) = file {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        builder = builder.add_source(File::from(path));
    }

    let config: AnalysisConfig = builder
        .add_source(environment)
        .build()
        .context("Failed to read settings")?
        .try_deserialize()
        .context("Invalid settings")?;

    config.validate()?;
    log::debug!("Loaded settings (profile: {}): {:?}", profile, config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use musclemap_core::LinkRole;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(source))
    }

    #[test]
    fn test_profile_only() {
        let config = load_with_environment(ConfigProfile::Strict, None, env(&[])).unwrap();
        assert_eq!(config, ConfigProfile::Strict.create_config());
    }

    #[test]
    fn test_file_overrides_profile() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("musclemap.yaml");
        std::fs::write(&path, "min_edge_weight: 3\nmax_partners: 5\n").unwrap();

        let config =
            load_with_environment(ConfigProfile::Default, Some(&path), env(&[])).unwrap();
        assert_eq!(config.min_edge_weight, 3);
        assert_eq!(config.max_partners, 5);
        assert_eq!(config.log_level, "INFO");
    }

    #[test]
    fn test_environment_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("musclemap.json");
        std::fs::write(&path, r#"{"min_edge_weight": 3}"#).unwrap();

        let vars = [
            ("MUSCLEMAP_MIN_EDGE_WEIGHT", "4"),
            ("MUSCLEMAP_INCLUDED_ROLES", "primary,stabilizer"),
        ];
        let config =
            load_with_environment(ConfigProfile::Default, Some(&path), env(&vars)).unwrap();
        assert_eq!(config.min_edge_weight, 4);
        assert!(config.includes_role(LinkRole::Stabilizer));
        assert!(!config.includes_role(LinkRole::Secondary));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = load_with_environment(
            ConfigProfile::Default,
            None,
            env(&[("MUSCLEMAP_MIN_EDGE_WEIGHT", "0")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = load_with_environment(
            ConfigProfile::Default,
            Some(Path::new("/nonexistent/musclemap.yaml")),
            env(&[]),
        );
        assert!(result.is_err());
    }
}
