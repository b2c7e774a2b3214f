//! Rule engine for threshold-based health checks.
//!
//! A rule inspects one typed input and either stays silent or fires with a
//! severity and a recommendation. Rules never keep state between calls: each
//! evaluation returns its own [`RuleFiring`], so a single rule value can be
//! shared freely across threads and requests.
//!
//! [`evaluate_rules`] runs a batch in order. A rule that returns an error is
//! logged and skipped; the rest of the batch still runs.

mod blood_pressure;
mod blood_sugar;
mod bmi;

pub use blood_pressure::PersistentHypertensionRule;
pub use blood_sugar::BloodSugarRule;
pub use bmi::BmiRule;

use crate::{HealthMetric, HealthProfile, Result};
use serde::{Deserialize, Serialize};

/// Rule severity, ordered `Info < Warning < Critical`
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// The more severe of the two
    pub fn max(self, other: Severity) -> Severity {
        std::cmp::max(self, other)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// What a rule reports when it fires
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RuleFiring {
    pub severity: Severity,
    pub recommendation: String,
}

impl RuleFiring {
    pub fn new(severity: Severity, recommendation: impl Into<String>) -> Self {
        Self {
            severity,
            recommendation: recommendation.into(),
        }
    }
}

/// A health rule evaluated against input of type `T`
pub trait Rule<T: ?Sized>: Send + Sync {
    /// Stable identifier, e.g. `BMI_EVALUATION`
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the rule does not fire
    fn evaluate(&self, input: &T) -> Result<Option<RuleFiring>>;
}

/// Aggregate outcome of one batch evaluation
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RuleResult {
    pub fired_rule_names: Vec<String>,
    pub recommendations: Vec<String>,
    pub highest_severity: Severity,
}

impl RuleResult {
    /// Record a fired rule, raising the aggregate severity if needed
    pub fn record(&mut self, rule_name: &str, firing: RuleFiring) {
        self.fired_rule_names.push(rule_name.to_string());
        self.recommendations.push(firing.recommendation);
        self.highest_severity = self.highest_severity.max(firing.severity);
    }

    /// Append another result, keeping order and the highest severity
    pub fn merge(&mut self, other: RuleResult) {
        self.fired_rule_names.extend(other.fired_rule_names);
        self.recommendations.extend(other.recommendations);
        self.highest_severity = self.highest_severity.max(other.highest_severity);
    }

    /// Check if any rules were fired
    pub fn has_results(&self) -> bool {
        !self.fired_rule_names.is_empty()
    }
}

/// Evaluate `rules` in order against `input`
pub fn evaluate_rules<T: ?Sized>(input: &T, rules: &[&dyn Rule<T>]) -> RuleResult {
    let mut result = RuleResult::default();

    tracing::debug!("Evaluating {} rules", rules.len());

    for rule in rules {
        match rule.evaluate(input) {
            Ok(Some(firing)) => {
                tracing::info!("Rule fired: {} ({})", rule.name(), firing.severity);
                result.record(rule.name(), firing);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Error evaluating rule {}: {}", rule.name(), e);
            }
        }
    }

    tracing::debug!(
        "Evaluation complete. Fired rules: {}",
        result.fired_rule_names.len()
    );

    result
}

/// Run the built-in profile and metric rule sets
///
/// Profile rules run first, then metric rules; a missing profile skips the
/// profile rules.
pub fn evaluate_health_rules(
    profile: Option<&HealthProfile>,
    metrics: &[HealthMetric],
) -> RuleResult {
    let mut result = RuleResult::default();

    if let Some(profile) = profile {
        let profile_rules: [&dyn Rule<HealthProfile>; 1] = [&BmiRule];
        result.merge(evaluate_rules(profile, &profile_rules));
    }

    let metric_rules: [&dyn Rule<[HealthMetric]>; 2] =
        [&PersistentHypertensionRule, &BloodSugarRule];
    result.merge(evaluate_rules(metrics, &metric_rules));

    result
}
