use std::time::Duration;

use envconfig::Envconfig;

use crate::types::GlobalArgs;

#[derive(Envconfig, Clone, Debug, PartialEq, Eq)]
pub struct ConvergeConfig {
    #[envconfig(from = "OPRC_CONVERGE_NAMESPACE", default = "default")]
    pub namespace: String,

    /// Env: OPRC_CONVERGE_POLL_INTERVAL_SECS
    #[envconfig(from = "OPRC_CONVERGE_POLL_INTERVAL_SECS", default = "2")]
    pub poll_interval_secs: u64,

    /// Env: OPRC_CONVERGE_POLL_TIMEOUT_SECS
    #[envconfig(from = "OPRC_CONVERGE_POLL_TIMEOUT_SECS", default = "60")]
    pub poll_timeout_secs: u64,

    /// Condition type awaited after submission.
    #[envconfig(from = "OPRC_CONVERGE_CONDITION", default = "Ready")]
    pub condition: String,
}

impl ConvergeConfig {
    /// Flags given on the command line win over the environment.
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(ns) = &args.namespace {
            self.namespace = ns.clone();
        }
        if let Some(secs) = args.interval {
            self.poll_interval_secs = secs;
        }
        if let Some(secs) = args.timeout {
            self.poll_timeout_secs = secs;
        }
        if let Some(cond) = &args.condition {
            self.condition = cond.clone();
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_helm_release_flow() {
        let cfg = ConvergeConfig::init_from_hashmap(&HashMap::new()).unwrap();
        assert_eq!(cfg.namespace, "default");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(2));
        assert_eq!(cfg.poll_timeout(), Duration::from_secs(60));
        assert_eq!(cfg.condition, "Ready");
    }

    #[test]
    fn env_values_are_read() {
        let env = HashMap::from([
            ("OPRC_CONVERGE_NAMESPACE".to_string(), "flux-system".to_string()),
            ("OPRC_CONVERGE_POLL_TIMEOUT_SECS".to_string(), "300".to_string()),
        ]);
        let cfg = ConvergeConfig::init_from_hashmap(&env).unwrap();
        assert_eq!(cfg.namespace, "flux-system");
        assert_eq!(cfg.poll_timeout_secs, 300);
        assert_eq!(cfg.poll_interval_secs, 2);
    }

    #[test]
    fn bad_number_is_an_error() {
        let env = HashMap::from([(
            "OPRC_CONVERGE_POLL_INTERVAL_SECS".to_string(),
            "soon".to_string(),
        )]);
        assert!(ConvergeConfig::init_from_hashmap(&env).is_err());
    }

    #[test]
    fn flags_override_env() {
        let env = HashMap::from([(
            "OPRC_CONVERGE_NAMESPACE".to_string(),
            "flux-system".to_string(),
        )]);
        let args = GlobalArgs {
            namespace: Some("apps".into()),
            timeout: Some(5),
            condition: Some("Released".into()),
            ..Default::default()
        };
        let cfg = ConvergeConfig::init_from_hashmap(&env)
            .unwrap()
            .with_overrides(&args);
        assert_eq!(cfg.namespace, "apps");
        assert_eq!(cfg.poll_timeout_secs, 5);
        assert_eq!(cfg.poll_interval_secs, 2);
        assert_eq!(cfg.condition, "Released");
    }
}
