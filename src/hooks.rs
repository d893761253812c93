//! Qualified hook keys.
//!
//! Hooks in proxy mode are stored under `before:<op>` and `after:<op>`. The
//! underscore spellings `before_<op>` / `after_<op>` parse to the same keys.

use std::fmt;
use std::str::FromStr;

use crate::error::InvokeError;

/// When a hook runs relative to the delegated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    Before,
    After,
}

impl HookPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            HookPhase::Before => "before",
            HookPhase::After => "after",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hook slot: phase plus operation name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookKey {
    pub phase: HookPhase,
    pub operation: String,
}

impl HookKey {
    pub fn new(phase: HookPhase, operation: impl Into<String>) -> Self {
        Self {
            phase,
            operation: operation.into(),
        }
    }

    pub fn before(operation: impl Into<String>) -> Self {
        Self::new(HookPhase::Before, operation)
    }

    pub fn after(operation: impl Into<String>) -> Self {
        Self::new(HookPhase::After, operation)
    }
}

impl fmt::Display for HookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.phase, self.operation)
    }
}

impl FromStr for HookKey {
    type Err = InvokeError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parsed = [HookPhase::Before, HookPhase::After]
            .into_iter()
            .find_map(|phase| {
                let rest = key.strip_prefix(phase.as_str())?;
                let operation = rest.strip_prefix(':').or_else(|| rest.strip_prefix('_'))?;
                Some(HookKey::new(phase, operation))
            });

        match parsed {
            Some(key) if !key.operation.is_empty() => Ok(key),
            _ => Err(InvokeError::InvalidHookKey(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellings() {
        assert_eq!("before:add".parse::<HookKey>().expect("colon"), HookKey::before("add"));
        assert_eq!("after_add".parse::<HookKey>().expect("underscore"), HookKey::after("add"));
        assert_eq!(
            "before_to_s".parse::<HookKey>().expect("nested underscore"),
            HookKey::before("to_s")
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for key in ["add", "before", "before:", "after_", "around:add", "beforeadd"] {
            assert!(
                matches!(key.parse::<HookKey>(), Err(InvokeError::InvalidHookKey(_))),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_is_qualified() {
        assert_eq!(HookKey::after("sum").to_string(), "after:sum");
    }
}
