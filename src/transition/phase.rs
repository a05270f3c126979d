//! Mount record animation phases.
//!
//! # State Transitions
//! ```text
//! Entering → Entered: timeout elapsed since the record was stamped
//! Exiting → Exited: timeout elapsed since the record was stamped
//! Entering/Entered → Exiting: forced by a location change (restamps)
//! Exited: terminal, the record is dropped from its store
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Animation phase of a mount record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entering = 0,
    Entered = 1,
    Exiting = 2,
    Exited = 3,
}

impl Phase {
    /// The phase a timer firing moves to once the timeout has elapsed.
    pub fn successor(self) -> Phase {
        match self {
            Phase::Entering | Phase::Entered => Phase::Entered,
            Phase::Exiting | Phase::Exited => Phase::Exited,
        }
    }

    /// Entering or Entered: the record still follows the current location.
    pub fn is_live(self) -> bool {
        self < Phase::Exiting
    }

    /// True when a timer firing could still change this phase.
    pub fn is_animating(self) -> bool {
        self.successor() != self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Entering => "entering",
            Phase::Entered => "entered",
            Phase::Exiting => "exiting",
            Phase::Exited => "exited",
        }
    }
}

impl From<u8> for Phase {
    fn from(val: u8) -> Self {
        match val {
            0 => Phase::Entering,
            1 => Phase::Entered,
            2 => Phase::Exiting,
            _ => Phase::Exited,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_map() {
        assert_eq!(Phase::Entering.successor(), Phase::Entered);
        assert_eq!(Phase::Entered.successor(), Phase::Entered);
        assert_eq!(Phase::Exiting.successor(), Phase::Exited);
        assert_eq!(Phase::Exited.successor(), Phase::Exited);
    }

    #[test]
    fn test_ordering_and_liveness() {
        assert!(Phase::Entering < Phase::Entered);
        assert!(Phase::Entered < Phase::Exiting);
        assert!(Phase::Entered.is_live());
        assert!(!Phase::Exiting.is_live());
        assert!(Phase::Exiting.is_animating());
        assert!(!Phase::Entered.is_animating());
        assert_eq!(Phase::from(2), Phase::Exiting);
        assert_eq!(Phase::from(9), Phase::Exited);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Exiting).unwrap(), "\"exiting\"");
        assert_eq!(Phase::Entering.to_string(), "entering");
    }
}
