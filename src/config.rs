use crate::types::Config;
use anyhow::{bail, Context, Result};
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config: Config = serde_yaml::from_str(&contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Startup validation. A system that cannot orient itself must refuse to
    /// start rather than run without stop geometry.
    pub fn validate(&self) -> Result<()> {
        if self.stop_lines.positions.is_empty() {
            bail!("Config contains no stop line positions");
        }
        if self.detection.min_look_ahead <= 0.0
            || self.detection.max_look_ahead <= self.detection.min_look_ahead
        {
            bail!(
                "Invalid look-ahead window: min={}, max={}",
                self.detection.min_look_ahead,
                self.detection.max_look_ahead
            );
        }
        if self.detection.min_frame_interval <= 0.0 {
            bail!(
                "Invalid frame interval: {}",
                self.detection.min_frame_interval
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::types::*;

    fn test_config() -> Config {
        Config {
            site: SiteConfig {
                is_site: false,
                stop_position: [8.0, 16.2],
            },
            detection: DetectionConfig {
                min_look_ahead: 25.0,
                max_look_ahead: 100.0,
                min_frame_interval: 0.1,
            },
            stop_lines: StopLineConfig {
                positions: vec![[10.0, 10.0], [60.0, 5.0]],
            },
            replay: ReplayConfig {
                scenario_dir: "scenarios".to_string(),
                max_pending_outputs: 64,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_stop_lines_rejected() {
        let mut config = test_config();
        config.stop_lines.positions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_look_ahead_window_rejected() {
        let mut config = test_config();
        config.detection.max_look_ahead = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_config_accepted() {
        assert!(test_config().validate().is_ok());
    }
}
