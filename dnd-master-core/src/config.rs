//! Runtime configuration for the front ends.

use std::path::PathBuf;

/// Environment variable naming the party store file.
pub const ENV_PARTY_FILE: &str = "DND_MASTER_PARTY_FILE";
/// Environment variable naming the scenario legacy party files migrate into.
pub const ENV_LEGACY_SCENARIO: &str = "DND_MASTER_LEGACY_SCENARIO";
/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "DND_MASTER_LOG";
/// Environment variable holding a fixed dice seed.
pub const ENV_SEED: &str = "DND_MASTER_SEED";

/// Configuration shared by the command-line tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding every scenario's party.
    pub party_state_path: PathBuf,

    /// Scenario a legacy single-party file is filed under.
    pub legacy_scenario: String,

    /// `tracing` filter directive.
    pub log_filter: String,

    /// Seed for reproducible dice; random when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            party_state_path: PathBuf::from("party_state.json"),
            legacy_scenario: "default".to_string(),
            log_filter: "dnd_master=info,dnd_master_core=info".to_string(),
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment and a `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// An unparsable seed is ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_PARTY_FILE) {
            config.party_state_path = PathBuf::from(path);
        }
        if let Some(scenario) = lookup(ENV_LEGACY_SCENARIO).filter(|s| !s.is_empty()) {
            config.legacy_scenario = scenario;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }
        config.seed = lookup(ENV_SEED).and_then(|s| s.trim().parse().ok());
        config
    }

    /// Set the party store path.
    pub fn with_party_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.party_state_path = path.into();
        self
    }

    /// Set the scenario legacy files migrate into.
    pub fn with_legacy_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.legacy_scenario = scenario.into();
        self
    }

    /// Set the log filter.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Fix the dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.party_state_path, PathBuf::from("party_state.json"));
        assert_eq!(config.legacy_scenario, "default");
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_PARTY_FILE, "/tmp/parties.json"),
            (ENV_LEGACY_SCENARIO, "old"),
            (ENV_LOG, "debug"),
            (ENV_SEED, " 42 "),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.party_state_path, PathBuf::from("/tmp/parties.json"));
        assert_eq!(config.legacy_scenario, "old");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_bad_seed_ignored() {
        let config = Config::from_lookup(|key| (key == ENV_SEED).then(|| "lucky".to_string()));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::new()
            .with_party_state_path("saves/parties.json")
            .with_legacy_scenario("legacy")
            .with_seed(7);
        assert_eq!(config.party_state_path, PathBuf::from("saves/parties.json"));
        assert_eq!(config.legacy_scenario, "legacy");
        assert_eq!(config.seed, Some(7));
    }
}
