//! Scripted navigation sequences.
//!
//! ```toml
//! [[step]]
//! location = "/a"
//!
//! [[step]]
//! location = "/b"
//! wait_ms = 150
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RouterError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(rename = "step", default)]
    pub steps: Vec<ReplayStep>,
}

/// One navigation, followed by a pause before the next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStep {
    pub location: String,
    #[serde(default)]
    pub wait_ms: u64,
}

impl ReplayStep {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

impl ReplayScript {
    pub fn parse(content: &str) -> Result<Self, RouterError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, RouterError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Total time the script waits between steps.
    pub fn duration(&self) -> Duration {
        self.steps.iter().map(ReplayStep::wait).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = ReplayScript::parse(
            r#"
            [[step]]
            location = "/a"

            [[step]]
            location = "/b"
            wait_ms = 150
            "#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[0].wait_ms, 0);
        assert_eq!(script.duration(), Duration::from_millis(150));
    }

    #[test]
    fn test_parse_rejects_missing_location() {
        let err = ReplayScript::parse("[[step]]\nwait_ms = 5\n").unwrap_err();
        assert!(matches!(err, RouterError::Script(_)));
    }
}
