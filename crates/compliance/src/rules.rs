//! Rule sets: KPI aggregates and the compliance verdict.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::expr;

/// Inbound compliance configuration for one test type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// KPI name -> aggregate formula over a data column, e.g.
    /// `"dryDensity": "AVG(dry_density)"`.
    #[serde(default)]
    pub kpis: BTreeMap<String, String>,
    /// Boolean expression over KPI and threshold names.
    #[serde(default)]
    pub pass_condition: String,
    /// Externally supplied limits referenced by the pass condition.
    #[serde(default)]
    pub thresholds: BTreeMap<String, f64>,
}

/// Verdict plus the KPI map that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub passed: bool,
    pub kpis: BTreeMap<String, f64>,
}

/// Compliance verdict as surfaced on dashboards and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    /// No rule set or no data yet; chosen by the caller, never produced
    /// by evaluation itself.
    Pending,
}

impl Verdict {
    pub fn from_evaluation(result: Option<&ComplianceResult>) -> Self {
        match result {
            Some(r) if r.passed => Verdict::Pass,
            Some(_) => Verdict::Fail,
            None => Verdict::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Aggregate {
    Avg,
    Sum,
    Min,
    Max,
}

/// Split `"AVG(dry_density)"` into the aggregate and the column id.
/// Anything that does not match the shape yields `None`.
fn parse_aggregate(formula: &str) -> Option<(Aggregate, &str)> {
    let formula = formula.trim();
    let open = formula.find('(')?;
    if !formula.ends_with(')') {
        return None;
    }
    let name = formula[..open].trim().to_uppercase();
    let column = formula[open + 1..formula.len() - 1].trim();
    if column.is_empty() {
        return None;
    }
    let agg = match name.as_str() {
        "AVG" | "AVERAGE" => Aggregate::Avg,
        "SUM" => Aggregate::Sum,
        "MIN" => Aggregate::Min,
        "MAX" => Aggregate::Max,
        _ => return None,
    };
    Some((agg, column))
}

/// Numeric values of one column across all records. Missing and
/// non-numeric entries are excluded, not zero-filled: a sample without a
/// reading must not drag an average (or a SUM-backed score) toward zero.
fn column_values(records: &[Map<String, Value>], column: &str) -> Vec<f64> {
    records
        .iter()
        .filter_map(|record| record.get(column))
        .filter_map(|value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}

impl RuleSet {
    /// Stage 1: compute every KPI over the data set. A KPI whose formula
    /// does not parse, or whose column has no numeric data, is 0.
    pub fn compute_kpis(&self, records: &[Map<String, Value>]) -> BTreeMap<String, f64> {
        let mut kpis = BTreeMap::new();
        for (name, formula) in &self.kpis {
            let value = match parse_aggregate(formula) {
                Some((agg, column)) => {
                    let values = column_values(records, column);
                    if values.is_empty() {
                        0.0
                    } else {
                        match agg {
                            Aggregate::Avg => values.iter().sum::<f64>() / values.len() as f64,
                            Aggregate::Sum => values.iter().sum(),
                            Aggregate::Min => values.iter().cloned().fold(f64::INFINITY, f64::min),
                            Aggregate::Max => {
                                values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                            }
                        }
                    }
                }
                None => 0.0,
            };
            kpis.insert(name.clone(), value);
        }
        kpis
    }

    /// Stage 2: the full verdict. Names resolve against KPIs first, then
    /// thresholds; anything unresolvable, malformed, or outside the
    /// expression grammar fails the condition without panicking.
    pub fn evaluate(&self, records: &[Map<String, Value>]) -> ComplianceResult {
        let kpis = self.compute_kpis(records);
        let passed = expr::evaluate(&self.pass_condition, |name| {
            kpis.get(name)
                .or_else(|| self.thresholds.get(name))
                .copied()
        })
        .unwrap_or(false);
        ComplianceResult { passed, kpis }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn density_records() -> Vec<Map<String, Value>> {
        vec![
            record(&[("dry_density", json!(95.0)), ("moisture", json!(10.0))]),
            record(&[("dry_density", json!(97.0)), ("moisture", json!(12.0))]),
            // No density reading and a non-numeric moisture: both excluded.
            record(&[("moisture", json!("n/a"))]),
        ]
    }

    fn rules(condition: &str) -> RuleSet {
        RuleSet {
            kpis: BTreeMap::from([
                ("dryDensity".to_string(), "AVG(dry_density)".to_string()),
                ("worstDensity".to_string(), "MIN(dry_density)".to_string()),
                ("totalMoisture".to_string(), "SUM(moisture)".to_string()),
            ]),
            pass_condition: condition.to_string(),
            thresholds: BTreeMap::from([("minDensity".to_string(), 95.0)]),
        }
    }

    #[test]
    fn test_kpis_exclude_missing_and_non_numeric() {
        let kpis = rules("").compute_kpis(&density_records());
        // Average over the two present readings, not three zero-filled.
        assert_eq!(kpis["dryDensity"], 96.0);
        assert_eq!(kpis["worstDensity"], 95.0);
        assert_eq!(kpis["totalMoisture"], 22.0);
    }

    #[test]
    fn test_empty_column_kpi_is_zero() {
        let ruleset = RuleSet {
            kpis: BTreeMap::from([("x".to_string(), "MAX(absent)".to_string())]),
            ..RuleSet::default()
        };
        assert_eq!(ruleset.compute_kpis(&density_records())["x"], 0.0);
    }

    #[test]
    fn test_unparseable_kpi_formula_is_zero() {
        let ruleset = RuleSet {
            kpis: BTreeMap::from([
                ("a".to_string(), "MEDIAN(dry_density)".to_string()),
                ("b".to_string(), "AVG()".to_string()),
                ("c".to_string(), "garbage".to_string()),
            ]),
            ..RuleSet::default()
        };
        let kpis = ruleset.compute_kpis(&density_records());
        assert_eq!(kpis["a"], 0.0);
        assert_eq!(kpis["b"], 0.0);
        assert_eq!(kpis["c"], 0.0);
    }

    #[test]
    fn test_pass_and_fail_verdicts() {
        let result = rules("dryDensity >= 95").evaluate(&density_records());
        assert!(result.passed);

        let result = rules("dryDensity >= 99").evaluate(&density_records());
        assert!(!result.passed);
        // KPIs are reported either way.
        assert_eq!(result.kpis["dryDensity"], 96.0);
    }

    #[test]
    fn test_thresholds_resolve_in_conditions() {
        let result = rules("worstDensity >= minDensity").evaluate(&density_records());
        assert!(result.passed);
    }

    #[test]
    fn test_injection_attempt_fails_closed() {
        let result = rules("dryDensity >= 95; dropTable()").evaluate(&density_records());
        assert!(!result.passed);
    }

    #[test]
    fn test_unknown_name_fails_closed() {
        let result = rules("ghostKpi >= 1").evaluate(&density_records());
        assert!(!result.passed);
    }

    #[test]
    fn test_kpi_shadows_threshold_of_same_name() {
        let mut ruleset = rules("dryDensity == 96");
        ruleset
            .thresholds
            .insert("dryDensity".to_string(), 12345.0);
        assert!(ruleset.evaluate(&density_records()).passed);
    }

    #[test]
    fn test_verdict_mapping() {
        let passed = ComplianceResult { passed: true, kpis: BTreeMap::new() };
        let failed = ComplianceResult { passed: false, kpis: BTreeMap::new() };
        assert_eq!(Verdict::from_evaluation(Some(&passed)), Verdict::Pass);
        assert_eq!(Verdict::from_evaluation(Some(&failed)), Verdict::Fail);
        assert_eq!(Verdict::from_evaluation(None), Verdict::Pending);
    }

    #[test]
    fn test_numeric_strings_count_as_readings() {
        let records = vec![
            record(&[("dry_density", json!("95.5"))]),
            record(&[("dry_density", json!(96.5))]),
        ];
        let kpis = rules("").compute_kpis(&records);
        assert_eq!(kpis["dryDensity"], 96.0);
    }
}
