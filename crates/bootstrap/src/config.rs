use serde::Deserialize;

/// Bootstrap tuning knobs. The defaults match the behavior the engine was
/// tuned with; none of these are protocol constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Concurrent bulk-pull requests per attempt.
    pub max_in_flight: usize,
    /// Blocks requested per bulk-pull.
    pub max_pull_count: u32,
    /// Candidates sampled per weighted account draw.
    pub backoff_exclusion: usize,
    /// Whether a progressed send also forwards its destination account.
    pub forward_send_destinations: bool,
    /// Requests between statistics dumps.
    pub stats_interval: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 1,
            max_pull_count: 256,
            backoff_exclusion: 16,
            forward_send_destinations: true,
            stats_interval: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BootstrapConfig;

    #[test]
    fn test_config_load() {
        let config_string = r#"
            max_in_flight = 4
            max_pull_count = 16
        "#;

        let config = toml::from_str::<BootstrapConfig>(config_string).unwrap();
        assert_eq!(config.max_in_flight, 4);
        assert_eq!(config.max_pull_count, 16);
        // Unset knobs keep their defaults.
        assert_eq!(config.backoff_exclusion, 16);
        assert!(config.forward_send_destinations);
    }
}
