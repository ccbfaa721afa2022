//! Split configuration file loading and saving.

use anyhow::{bail, Context, Result};
use std::path::Path;

use vsplit_models::SplitConfig;

/// Load a split configuration from a YAML or JSON file.
pub fn load(path: &Path) -> Result<SplitConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    match extension(path).as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&text)
            .with_context(|| format!("Invalid YAML config {}", path.display())),
        "json" => serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON config {}", path.display())),
        other => bail!("Unsupported config format: .{}", other),
    }
}

/// Save a split configuration to a YAML or JSON file (by extension,
/// defaulting to YAML).
pub fn save(config: &SplitConfig, path: &Path) -> Result<()> {
    let text = match extension(path).as_str() {
        "json" => serde_json::to_string_pretty(config)?,
        _ => serde_yaml::to_string(config)?,
    };
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vsplit_models::QualityPreset;

    fn sample_config(dir: &TempDir) -> SplitConfig {
        let mut config = SplitConfig::new(dir.path().join("in.mp4"), dir.path().join("out"));
        config.max_segment_secs = 900;
        config.quality = QualityPreset::Low;
        config
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("split.yaml");
        let config = sample_config(&dir);

        save(&config, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.max_segment_secs, 900);
        assert_eq!(loaded.quality, QualityPreset::Low);
        assert_eq!(loaded.source_path, config.source_path);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("split.json");
        let config = sample_config(&dir);

        save(&config, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.max_segment_secs, 900);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("split.toml");
        std::fs::write(&path, "x = 1").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("split.json");
        std::fs::write(&path, r#"{"source_path": "in.mp4", "output_dir": "out"}"#).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.max_segment_secs, 1200);
        assert_eq!(loaded.threads, 4);
    }
}
