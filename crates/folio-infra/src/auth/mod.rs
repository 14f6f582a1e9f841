//! Request authorization.

mod api_key;

pub use api_key::{
    API_KEY_HEADER, ApiKeyGate, DEFAULT_UNPROTECTED_PREFIXES, GateDecision, GateRule, RuleEffect,
    RuleMatcher,
};

/// Raised when a pattern rule fails to compile.
pub use regex::Error as RuleError;
