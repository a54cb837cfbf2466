use serde::Deserialize;
use thiserror::Error;

use crate::sky::Site;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub station: Option<StationConfig>,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The observing site. Missing or unparseable coordinates fall back to
    /// the LOFAR core.
    pub fn site(&self) -> Site {
        let Some(station) = &self.station else {
            return Site::default();
        };
        Site::from_coordinates(&station.coordinates, Some(station.altitude_m)).unwrap_or_else(
            || {
                log::warn!(
                    "Invalid station coordinates {:?}, using the LOFAR core",
                    station.coordinates
                );
                Site::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.site(), Site::default());
    }

    #[test]
    fn station_from_config() {
        let config: Config = serde_yaml::from_str(indoc::indoc! {r#"
            station:
              coordinates: "-26.7, 116.67"
              altitude_m: 377
            web:
              bind: "127.0.0.1:3000"
        "#})
        .unwrap();

        let site = config.site();
        assert_eq!(site.latitude_deg, -26.7);
        assert_eq!(site.longitude_deg, 116.67);
        assert_eq!(site.altitude_m, 377.0);
        assert_eq!(config.web.bind, "127.0.0.1:3000");
    }

    #[test]
    fn bad_station_falls_back() {
        let config: Config = serde_yaml::from_str(indoc::indoc! {r#"
            station:
              coordinates: "north pole"
        "#})
        .unwrap();
        assert_eq!(config.site(), Site::default());
    }
}
