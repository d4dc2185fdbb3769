use std::path::PathBuf;
use std::time::Duration;

use winit::dpi::LogicalSize;

use ember_bridge::BridgeConfig;
use ember_bridge::logging::LoggingConfig;

/// Desktop host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Directory handed to the engine as its asset root.
    pub asset_root: PathBuf,

    /// Whether to go borderless fullscreen when the host asks for immersive mode.
    pub immersive: bool,

    pub bridge: BridgeConfig,
    pub logging: LoggingConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            title: "ember".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            asset_root: PathBuf::from("assets"),
            immersive: false,
            bridge: BridgeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl HostConfig {
    /// Defaults overridden by the process environment.
    ///
    /// | variable | effect |
    /// |---|---|
    /// | `EMBER_ASSETS` | asset root directory |
    /// | `EMBER_IMMERSIVE` | borderless fullscreen on focus |
    /// | `EMBER_FRAME_MS` | render worker frame interval |
    /// | `EMBER_HEARTBEAT` | frames between heartbeat lines, `0` disables |
    /// | `EMBER_LOG` | log filter, takes precedence over `RUST_LOG` |
    /// | `EMBER_LOG_TAG` | log line prefix |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(root) = var("EMBER_ASSETS") {
            config.asset_root = PathBuf::from(root);
        }
        if let Some(flag) = var("EMBER_IMMERSIVE") {
            config.immersive = parse_flag(&flag);
        }
        if let Some(ms) = var("EMBER_FRAME_MS").and_then(|v| parse_number("EMBER_FRAME_MS", &v)) {
            config.bridge = config.bridge.with_frame_interval(Duration::from_millis(ms));
        }
        if let Some(frames) = var("EMBER_HEARTBEAT").and_then(|v| parse_number("EMBER_HEARTBEAT", &v)) {
            config.bridge = config.bridge.with_heartbeat_every(frames);
        }
        if let Some(filter) = var("EMBER_LOG") {
            config.logging = config.logging.with_filter(filter);
        }
        if let Some(tag) = var("EMBER_LOG_TAG") {
            config.logging = config.logging.with_tag(tag);
        }
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// Runs before the logger is installed, so a bad value goes to stderr.
fn parse_number(key: &str, value: &str) -> Option<u64> {
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("ignoring {key}={value:?}: not a whole number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn no_variables_keeps_defaults() {
        let c = HostConfig::from_vars(vars(&[]));
        assert_eq!(c.asset_root, PathBuf::from("assets"));
        assert_eq!(c.bridge.frame_interval, ember_bridge::config::DEFAULT_FRAME_INTERVAL);
        assert_eq!(c.logging.env_filter, None);
        assert_eq!(c.logging.tag, "EMBER");
    }

    #[test]
    fn variables_override_bridge_and_logging() {
        let c = HostConfig::from_vars(vars(&[
            ("EMBER_ASSETS", "/tmp/game"),
            ("EMBER_IMMERSIVE", "yes"),
            ("EMBER_FRAME_MS", "33"),
            ("EMBER_HEARTBEAT", "0"),
            ("EMBER_LOG", "ember_bridge=trace"),
            ("EMBER_LOG_TAG", "GAME"),
        ]));
        assert_eq!(c.asset_root, PathBuf::from("/tmp/game"));
        assert!(c.immersive);
        assert_eq!(c.bridge.frame_interval, Duration::from_millis(33));
        assert_eq!(c.bridge.heartbeat_every, 0);
        assert_eq!(c.logging.env_filter.as_deref(), Some("ember_bridge=trace"));
        assert_eq!(c.logging.tag, "GAME");
    }

    #[test]
    fn malformed_numbers_are_ignored() {
        let c = HostConfig::from_vars(vars(&[("EMBER_FRAME_MS", "fast"), ("EMBER_HEARTBEAT", "-1")]));
        assert_eq!(c.bridge.frame_interval, ember_bridge::config::DEFAULT_FRAME_INTERVAL);
        assert_eq!(c.bridge.heartbeat_every, ember_bridge::config::DEFAULT_HEARTBEAT_FRAMES);
    }
}
