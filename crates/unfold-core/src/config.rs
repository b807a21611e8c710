//! Planner configuration that the pipeline and front ends can serialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How many times each phase's strategy list may be re-run while some
    /// strategy still reports a change. `1` means a single ordered pass.
    pub max_strategy_passes: usize,

    /// Record a `RuleTrace` for every strategy application.
    pub trace_rules: bool,

    /// Log placeholders left after the resolution phase at `warn` rather than
    /// `debug`. The validator reports them as an error either way.
    pub warn_unresolved: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_strategy_passes: 1,
            trace_rules: true,
            warn_unresolved: true,
        }
    }
}

impl PlannerConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `UNFOLD_MAX_STRATEGY_PASSES`: passes per phase (values below 1 are clamped)
    /// - `UNFOLD_TRACE_RULES`: `true`/`false`/`1`/`0`
    /// - `UNFOLD_WARN_UNRESOLVED`: `true`/`false`/`1`/`0`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("UNFOLD_MAX_STRATEGY_PASSES").and_then(|s| s.trim().parse::<usize>().ok()) {
            cfg.max_strategy_passes = v;
        }

        if let Some(v) = lookup("UNFOLD_TRACE_RULES").and_then(|s| parse_flag(&s)) {
            cfg.trace_rules = v;
        }

        if let Some(v) = lookup("UNFOLD_WARN_UNRESOLVED").and_then(|s| parse_flag(&s)) {
            cfg.warn_unresolved = v;
        }

        cfg.normalized()
    }

    pub fn normalized(mut self) -> Self {
        self.max_strategy_passes = self.max_strategy_passes.max(1);
        self
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("UNFOLD_MAX_STRATEGY_PASSES", "3"),
            ("UNFOLD_TRACE_RULES", "off"),
        ]
        .into_iter()
        .collect();
        let cfg = PlannerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.max_strategy_passes, 3);
        assert!(!cfg.trace_rules);
        assert!(cfg.warn_unresolved);
    }

    #[test]
    fn garbage_and_zero_fall_back() {
        let cfg = PlannerConfig::from_lookup(|k| match k {
            "UNFOLD_MAX_STRATEGY_PASSES" => Some("0".into()),
            "UNFOLD_WARN_UNRESOLVED" => Some("maybe".into()),
            _ => None,
        });
        assert_eq!(cfg.max_strategy_passes, 1);
        assert!(cfg.warn_unresolved);
    }
}
