//! Compliance scoring for saved test data.
//!
//! Two stages: named KPI aggregates computed over a data set of row
//! records, then a boolean pass-condition evaluated against those KPIs
//! and externally supplied thresholds. This component never raises:
//! every failure mode (unknown name, malformed expression, bad rule)
//! degrades to a failed verdict, because a testing-compliance system
//! must fail closed rather than crash or silently pass.

pub mod expr;
pub mod rules;

pub use rules::{ComplianceResult, RuleSet, Verdict};
