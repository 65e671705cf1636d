use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub model: Option<ModelConfig>,
    pub output: Option<OutputConfig>,
    pub schema: Option<SchemaConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub max_length: Option<u32>,
    pub min_length: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub path: Option<String>,
}

/// Platform config directory path: `<config_dir>/sysrev/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sysrev").join("config.toml"))
}

/// Load config by cascading CWD `.sysrev.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".sysrev.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        model: Some(ModelConfig {
            endpoint: overlay
                .model
                .as_ref()
                .and_then(|m| m.endpoint.clone())
                .or_else(|| base.model.as_ref().and_then(|m| m.endpoint.clone())),
            api_token: overlay
                .model
                .as_ref()
                .and_then(|m| m.api_token.clone())
                .or_else(|| base.model.as_ref().and_then(|m| m.api_token.clone())),
            max_length: overlay
                .model
                .as_ref()
                .and_then(|m| m.max_length)
                .or_else(|| base.model.as_ref().and_then(|m| m.max_length)),
            min_length: overlay
                .model
                .as_ref()
                .and_then(|m| m.min_length)
                .or_else(|| base.model.as_ref().and_then(|m| m.min_length)),
        }),
        output: Some(OutputConfig {
            path: overlay
                .output
                .as_ref()
                .and_then(|o| o.path.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.path.clone())),
            format: overlay
                .output
                .as_ref()
                .and_then(|o| o.format.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.format.clone())),
        }),
        schema: Some(SchemaConfig {
            path: overlay
                .schema
                .as_ref()
                .and_then(|s| s.path.clone())
                .or_else(|| base.schema.as_ref().and_then(|s| s.path.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_round_trip_toml() {
        let config = ConfigFile {
            model: Some(ModelConfig {
                endpoint: Some("http://localhost:8080/summarize".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.model.unwrap().endpoint.unwrap(),
            "http://localhost:8080/summarize"
        );
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let parsed: ConfigFile = toml::from_str("[model]\nmax_length = 200\n").unwrap();
        assert_eq!(parsed.model.as_ref().unwrap().max_length, Some(200));
        assert!(parsed.model.unwrap().endpoint.is_none());
        assert!(parsed.output.is_none());
        assert!(parsed.schema.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            model: Some(ModelConfig {
                endpoint: Some("http://base/".to_string()),
                max_length: Some(100),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            model: Some(ModelConfig {
                endpoint: Some("http://overlay/".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let model = merged.model.unwrap();
        assert_eq!(model.endpoint.unwrap(), "http://overlay/");
        // Base value preserved when overlay is silent
        assert_eq!(model.max_length, Some(100));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            schema: Some(SchemaConfig {
                path: Some("custom_schema.json".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.schema.unwrap().path.unwrap(), "custom_schema.json");
    }
}
