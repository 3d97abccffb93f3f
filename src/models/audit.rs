//! Audit trail models.
//!
//! Every calculation step records what it read, what it produced, and the
//! statutory clause it applied, so a report can be traced back line by line.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute clause for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// How serious a warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational; the result is unaffected.
    Low,
    /// Part of the input was ignored.
    Medium,
    /// The result rests on an estimate rather than authoritative data.
    High,
}

/// A warning generated during calculation.
///
/// Warnings record soft conditions that don't prevent a result but change
/// what it was computed from.
///
/// # Example
///
/// ```
/// use pension_engine::models::{AuditWarning, WarningSeverity};
///
/// let warning = AuditWarning::new(
///     "PRICE_INDEX_MISSING",
///     "No price index for 1994-02; month excluded",
///     WarningSeverity::Medium,
/// );
/// assert_eq!(warning.code, "PRICE_INDEX_MISSING");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: WarningSeverity,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&WarningSeverity::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn test_audit_step_round_trips_json_payloads() {
        let step = AuditStep {
            step_number: 3,
            rule_id: "ibl".to_string(),
            rule_name: "Base Settlement Income".to_string(),
            clause_ref: "Ley 100/1993 art. 21".to_string(),
            input: serde_json::json!({ "liquidation_month": "2025-03" }),
            output: serde_json::json!({ "value": "2500000" }),
            reasoning: "Last ten years average won".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        let back: AuditStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
        assert_eq!(back.output["value"], "2500000");
    }
}
