use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::errors::CoreError;

/// Environment variable holding the container label
pub const ENV_LABEL: &str = "IOC_CONTAINER_LABEL";
/// Environment variable holding the alias policy
pub const ENV_ALIAS_POLICY: &str = "IOC_ALIAS_POLICY";
/// Environment variable toggling cycle detection
pub const ENV_DETECT_CYCLES: &str = "IOC_DETECT_CYCLES";
/// Environment variable holding the maximum resolution depth
pub const ENV_MAX_RESOLUTION_DEPTH: &str = "IOC_MAX_RESOLUTION_DEPTH";

/// How an alias shared by several classes picks its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasPolicy {
    /// The class registered first under the alias
    #[default]
    FirstRegistered,
    /// The class registered last under the alias
    LastRegistered,
    /// Fail when more than one class shares the alias
    Strict,
}

impl AliasPolicy {
    /// Get the policy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AliasPolicy::FirstRegistered => "first_registered",
            AliasPolicy::LastRegistered => "last_registered",
            AliasPolicy::Strict => "strict",
        }
    }
}

impl std::fmt::Display for AliasPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AliasPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_registered" | "first" => Ok(AliasPolicy::FirstRegistered),
            "last_registered" | "last" => Ok(AliasPolicy::LastRegistered),
            "strict" => Ok(AliasPolicy::Strict),
            _ => Err(CoreError::configuration(format!(
                "invalid alias policy '{}', expected first_registered, last_registered or strict",
                s
            ))),
        }
    }
}

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Human readable label, used in logs and snapshots
    pub label: Option<String>,
    /// Tie-break for aliases shared by several classes
    pub alias_policy: AliasPolicy,
    /// Fail with `CircularDependency` when a class is met again on the resolution path
    pub detect_cycles: bool,
    /// Upper bound on nested resolutions
    pub max_resolution_depth: usize,
}

impl ContainerConfig {
    /// Default maximum resolution depth
    pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 100;

    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            label: None,
            alias_policy: AliasPolicy::FirstRegistered,
            detect_cycles: true,
            max_resolution_depth: Self::DEFAULT_MAX_RESOLUTION_DEPTH,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the alias policy
    pub fn with_alias_policy(mut self, policy: AliasPolicy) -> Self {
        self.alias_policy = policy;
        self
    }

    /// Enable or disable cycle detection
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Set the maximum resolution depth
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup on top of the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(label) = lookup(ENV_LABEL) {
            config.label = Some(label);
        }

        if let Some(policy) = lookup(ENV_ALIAS_POLICY) {
            config.alias_policy = policy.parse()?;
        }

        if let Some(flag) = lookup(ENV_DETECT_CYCLES) {
            config.detect_cycles = parse_flag(ENV_DETECT_CYCLES, &flag)?;
        }

        if let Some(depth) = lookup(ENV_MAX_RESOLUTION_DEPTH) {
            config.max_resolution_depth = depth.trim().parse().map_err(|_| {
                CoreError::configuration(format!(
                    "invalid value '{}' for {}, expected a positive integer",
                    depth, ENV_MAX_RESOLUTION_DEPTH
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CoreError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_resolution_depth == 0 {
            return Err(CoreError::configuration(
                "max_resolution_depth must be greater than zero",
            ));
        }

        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err(CoreError::configuration("label must not be blank"));
            }
        }

        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::configuration(format!(
            "invalid value '{}' for {}, expected true or false",
            value, key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ContainerConfig::default();
        assert_eq!(config.alias_policy, AliasPolicy::FirstRegistered);
        assert!(config.detect_cycles);
        assert_eq!(config.max_resolution_depth, 100);
        assert!(config.label.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_alias_policy_parsing() {
        assert_eq!("first".parse::<AliasPolicy>().unwrap(), AliasPolicy::FirstRegistered);
        assert_eq!("Last-Registered".parse::<AliasPolicy>().unwrap(), AliasPolicy::LastRegistered);
        assert_eq!("strict".parse::<AliasPolicy>().unwrap(), AliasPolicy::Strict);
        assert!("random".parse::<AliasPolicy>().unwrap_err().is_configuration());
        assert_eq!(AliasPolicy::LastRegistered.to_string(), "last_registered");
    }

    #[test]
    fn test_from_lookup() {
        let config = ContainerConfig::from_lookup(lookup(&[
            (ENV_LABEL, "request"),
            (ENV_ALIAS_POLICY, "strict"),
            (ENV_DETECT_CYCLES, "off"),
            (ENV_MAX_RESOLUTION_DEPTH, "12"),
        ]))
        .unwrap();

        assert_eq!(config.label.as_deref(), Some("request"));
        assert_eq!(config.alias_policy, AliasPolicy::Strict);
        assert!(!config.detect_cycles);
        assert_eq!(config.max_resolution_depth, 12);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(ContainerConfig::from_lookup(lookup(&[(ENV_DETECT_CYCLES, "maybe")])).is_err());
        assert!(
            ContainerConfig::from_lookup(lookup(&[(ENV_MAX_RESOLUTION_DEPTH, "deep")])).is_err()
        );
        assert!(ContainerConfig::from_lookup(lookup(&[(ENV_MAX_RESOLUTION_DEPTH, "0")])).is_err());
    }

    #[test]
    fn test_from_yaml() {
        let config = ContainerConfig::from_yaml_str(
            "label: app\nalias_policy: last_registered\n",
        )
        .unwrap();

        assert_eq!(config.label.as_deref(), Some("app"));
        assert_eq!(config.alias_policy, AliasPolicy::LastRegistered);
        assert!(config.detect_cycles);
        assert_eq!(config.max_resolution_depth, ContainerConfig::DEFAULT_MAX_RESOLUTION_DEPTH);
    }

    #[test]
    fn test_from_yaml_errors() {
        assert!(matches!(
            ContainerConfig::from_yaml_str("alias_policy: sometimes\n"),
            Err(CoreError::Yaml(_))
        ));
        assert!(ContainerConfig::from_yaml_str("max_resolution_depth: 0\n")
            .unwrap_err()
            .is_configuration());
    }
}
