//! Shared-secret API key gate with an ordered exemption table.

use regex::Regex;
use subtle::ConstantTimeEq;

use folio_core::routes::{DOWNLOAD_SUFFIX, HEALTH_PATH, PORTFOLIOS_PREFIX};

use super::RuleError;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Prefixes whose `/download` paths are public.
pub const DEFAULT_UNPROTECTED_PREFIXES: &[&str] = &[PORTFOLIOS_PREFIX];

/// Public short links: a single segment of five alphanumerics.
const SHORT_LINK_PATTERN: &str = "^/[a-zA-Z0-9]{5}$";

/// What a request matches on.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    Method(&'static str),
    PrefixAndSuffix { prefix: String, suffix: String },
    Pattern(Regex),
    Exact(String),
    Any,
}

impl RuleMatcher {
    fn matches(&self, path: &str, method: &str) -> bool {
        match self {
            Self::Method(expected) => method.eq_ignore_ascii_case(expected),
            Self::PrefixAndSuffix { prefix, suffix } => {
                path.starts_with(prefix.as_str()) && path.ends_with(suffix.as_str())
            }
            Self::Pattern(regex) => regex.is_match(path),
            Self::Exact(expected) => path == expected,
            Self::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEffect {
    Allow,
    RequireKey,
}

/// One row of the gate's rule table.
#[derive(Debug, Clone)]
pub struct GateRule {
    pub matcher: RuleMatcher,
    pub effect: RuleEffect,
}

impl GateRule {
    fn allow(matcher: RuleMatcher) -> Self {
        Self {
            matcher,
            effect: RuleEffect::Allow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Matched an exemption rule.
    Public,
    /// Presented the configured key.
    Authorized,
    Denied,
}

impl GateDecision {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Decides whether a request may proceed.
///
/// Rules are evaluated in order and the first match wins. The last rule
/// always requires the key. A blank secret rejects every protected request.
#[derive(Debug, Clone)]
pub struct ApiKeyGate {
    secret: String,
    rules: Vec<GateRule>,
}

impl ApiKeyGate {
    pub fn new(secret: impl Into<String>) -> Result<Self, RuleError> {
        Self::with_unprotected_prefixes(secret, DEFAULT_UNPROTECTED_PREFIXES)
    }

    pub fn with_unprotected_prefixes<S: AsRef<str>>(
        secret: impl Into<String>,
        prefixes: &[S],
    ) -> Result<Self, RuleError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            tracing::warn!(
                "API key is not configured; protected endpoints will reject every request"
            );
        }

        let mut rules = vec![GateRule::allow(RuleMatcher::Method("OPTIONS"))];
        rules.extend(prefixes.iter().map(|prefix| {
            GateRule::allow(RuleMatcher::PrefixAndSuffix {
                prefix: prefix.as_ref().to_string(),
                suffix: DOWNLOAD_SUFFIX.to_string(),
            })
        }));
        rules.push(GateRule::allow(RuleMatcher::Pattern(Regex::new(
            SHORT_LINK_PATTERN,
        )?)));
        rules.push(GateRule::allow(RuleMatcher::Exact(HEALTH_PATH.to_string())));
        rules.push(GateRule {
            matcher: RuleMatcher::Any,
            effect: RuleEffect::RequireKey,
        });

        Ok(Self { secret, rules })
    }

    pub fn rules(&self) -> &[GateRule] {
        &self.rules
    }

    pub fn authorize(&self, path: &str, method: &str, provided: Option<&str>) -> GateDecision {
        let effect = self
            .rules
            .iter()
            .find(|rule| rule.matcher.matches(path, method))
            .map_or(RuleEffect::RequireKey, |rule| rule.effect);

        match effect {
            RuleEffect::Allow => GateDecision::Public,
            RuleEffect::RequireKey if self.accepts(provided) => GateDecision::Authorized,
            RuleEffect::RequireKey => {
                tracing::error!(
                    path,
                    method,
                    api_key = provided.unwrap_or("null"),
                    "Unauthorized access attempt"
                );
                GateDecision::Denied
            }
        }
    }

    fn accepts(&self, provided: Option<&str>) -> bool {
        if self.secret.trim().is_empty() {
            return false;
        }
        provided.is_some_and(|key| key.as_bytes().ct_eq(self.secret.as_bytes()).into())
    }
}
