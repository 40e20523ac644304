//! Maps a threat score to a severity tier and recommended action. Stateless; bands are
//! closed on their lower side (a score equal to a threshold stays in the lower tier).

use crate::config::SeverityConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Allow,
    Monitor,
    Block,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }

    pub fn action(self) -> Action {
        match self {
            Severity::Low => Action::Allow,
            Severity::Medium => Action::Monitor,
            Severity::High => Action::Block,
        }
    }
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Allow => "ALLOW",
            Action::Monitor => "MONITOR",
            Action::Block => "BLOCK",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub severity: Severity,
    pub action: Action,
}

#[derive(Debug, Clone)]
pub struct SeverityPolicy {
    config: SeverityConfig,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self::new(SeverityConfig::default())
    }
}

impl SeverityPolicy {
    pub fn new(config: SeverityConfig) -> Self {
        Self { config }
    }

    pub fn severity(&self, score: f32) -> Severity {
        if score > self.config.high_threshold {
            Severity::High
        } else if score > self.config.medium_threshold {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn assess(&self, score: f32) -> Assessment {
        let severity = self.severity(score);
        Assessment {
            severity,
            action: severity.action(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess(score: f32) -> (Severity, Action) {
        let a = SeverityPolicy::default().assess(score);
        (a.severity, a.action)
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(assess(0.0), (Severity::Low, Action::Allow));
        assert_eq!(assess(0.5), (Severity::Low, Action::Allow));
        assert_eq!(assess(0.50001), (Severity::Medium, Action::Monitor));
        assert_eq!(assess(0.8), (Severity::Medium, Action::Monitor));
        assert_eq!(assess(0.80001), (Severity::High, Action::Block));
        assert_eq!(assess(1.0), (Severity::High, Action::Block));
    }

    #[test]
    fn custom_thresholds() {
        let policy = SeverityPolicy::new(SeverityConfig {
            high_threshold: 0.9,
            medium_threshold: 0.3,
        });
        assert_eq!(policy.severity(0.85), Severity::Medium);
        assert_eq!(policy.severity(0.3), Severity::Low);
        assert_eq!(policy.severity(0.95), Severity::High);
    }

    #[test]
    fn renders_uppercase() {
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Action::Monitor.to_string(), "MONITOR");
        assert_eq!(serde_json::to_string(&Severity::Medium).unwrap(), "\"MEDIUM\"");
    }
}
