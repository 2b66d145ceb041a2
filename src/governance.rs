//! Governance record attached to every response: who ran it, with what
//! seed, under what rule catalog. Grounded on the `GovernanceReport` shape
//! in the retrieval pack's schema prototype.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rules::Rule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceReport {
    pub run_id: String,
    pub seed: Option<u64>,
    pub tenant_id: Option<String>,
    pub consent_external: bool,
    pub rule_ids: Vec<String>,
}

impl GovernanceReport {
    pub fn new(seed: Option<u64>, tenant_id: Option<String>, consent_external: bool, rules: &[Rule]) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            seed,
            tenant_id,
            consent_external,
            rule_ids: rules.iter().map(|r| r.id.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_rules;

    #[test]
    fn new_report_carries_all_rule_ids() {
        let rules = default_rules();
        let report = GovernanceReport::new(Some(1), Some("tenant-a".to_string()), false, &rules);
        assert_eq!(report.rule_ids.len(), rules.len());
        assert!(!report.run_id.is_empty());
    }
}
