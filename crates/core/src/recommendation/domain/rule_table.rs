//! Data-driven service rules: conditions over skin metrics, the service
//! they trigger and the projected score change after the service.

use serde::{Deserialize, Serialize};

use super::service_recommendation::ServiceRecommendation;
use crate::scoring::skin_scores::{SkinMetric, SkinScores};

/// Placeholder in a rule's reason, replaced by the triggering score.
pub const SCORE_PLACEHOLDER: &str = "{score}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Lt,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub metric: SkinMetric,
    pub op: Comparison,
    pub threshold: f64,
}

impl Condition {
    pub fn new(metric: SkinMetric, op: Comparison, threshold: f64) -> Self {
        Self {
            metric,
            op,
            threshold,
        }
    }

    /// Strict comparison: a score equal to the threshold never triggers.
    pub fn holds(&self, scores: &SkinScores) -> bool {
        let value = scores.get(self.metric);
        match self.op {
            Comparison::Gt => value > self.threshold,
            Comparison::Lt => value < self.threshold,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDelta {
    pub metric: SkinMetric,
    pub delta: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub service: String,
    pub conditions: Vec<Condition>,
    /// Suppresses this rule when the named service already matched
    /// earlier in the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless_matched: Option<String>,
    pub reason: String,
    pub expected_effect: String,
    pub estimated_improvement_pct: f64,
    #[serde(default)]
    pub projection: Vec<ProjectionDelta>,
}

impl Rule {
    /// True when every condition holds and the `unless_matched` service is
    /// not among `matched`. A rule without conditions never matches.
    pub fn matches(&self, scores: &SkinScores, matched: &[&str]) -> bool {
        if self.conditions.is_empty() || !self.conditions.iter().all(|c| c.holds(scores)) {
            return false;
        }
        match &self.unless_matched {
            Some(blocker) => !matched.contains(&blocker.as_str()),
            None => true,
        }
    }

    /// Reason text with the first condition's score rounded to an integer.
    pub fn reason_for(&self, scores: &SkinScores) -> String {
        match self.conditions.first() {
            Some(c) => self
                .reason
                .replace(SCORE_PLACEHOLDER, &format!("{:.0}", scores.get(c.metric))),
            None => self.reason.clone(),
        }
    }

    pub fn recommend(&self, scores: &SkinScores) -> ServiceRecommendation {
        ServiceRecommendation {
            service: self.service.clone(),
            reason: self.reason_for(scores),
            expected_effect: self.expected_effect.clone(),
            estimated_improvement_pct: self.estimated_improvement_pct,
        }
    }
}

/// Ordered, immutable rule set. Order matters for `unless_matched` and for
/// applying projection deltas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in salon menu used when no rules file is configured.
    pub fn fallback() -> Self {
        use Comparison::{Gt, Lt};
        use SkinMetric::*;

        Self::new(vec![
            rule(
                "De-Tan Facial",
                Condition::new(PigmentationDensity, Gt, 45.0),
                "Pigmentation density score is {score} (above 45).",
                "Reduce tan and dark spots; improve tone uniformity.",
                25.0,
                (PigmentationDensity, -20.0),
            ),
            rule(
                "Fruit Facial",
                Condition::new(Brightness, Lt, 60.0),
                "Brightness score is {score} (below 60).",
                "Add glow and mild hydration; smooth skin.",
                20.0,
                (Brightness, 15.0),
            ),
            rule(
                "Acne Treatment",
                Condition::new(Redness, Gt, 50.0),
                "Redness score is {score} (above 50).",
                "Calm redness and reduce acne-related inflammation.",
                30.0,
                (Redness, -25.0),
            ),
            rule(
                "Threading / Waxing",
                Condition::new(FacialHairDensity, Gt, 55.0),
                "Facial hair density score is {score} (high).",
                "Clean brow edges and upper lip; smoother finish.",
                15.0,
                (FacialHairDensity, -30.0),
            ),
            Rule {
                unless_matched: Some("Fruit Facial".to_string()),
                ..rule(
                    "Gold/Diamond Facial",
                    Condition::new(Brightness, Lt, 50.0),
                    "Brightness score is {score}; premium boost recommended.",
                    "Brightness boost and slight reflectivity enhancement.",
                    22.0,
                    (Brightness, 10.0),
                )
            },
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::fallback()
    }
}

fn rule(
    service: &str,
    condition: Condition,
    reason: &str,
    expected_effect: &str,
    pct: f64,
    projection: (SkinMetric, f64),
) -> Rule {
    Rule {
        service: service.to_string(),
        conditions: vec![condition],
        unless_matched: None,
        reason: reason.to_string(),
        expected_effect: expected_effect.to_string(),
        estimated_improvement_pct: pct,
        projection: vec![ProjectionDelta {
            metric: projection.0,
            delta: projection.1,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scores(pigmentation: f64, brightness: f64) -> SkinScores {
        SkinScores {
            pigmentation_density: pigmentation,
            brightness,
            measured: true,
            ..SkinScores::neutral()
        }
    }

    #[rstest]
    #[case::above(45.1, true)]
    #[case::equal(45.0, false)]
    #[case::below(30.0, false)]
    fn test_gt_condition_is_strict(#[case] value: f64, #[case] expected: bool) {
        let c = Condition::new(SkinMetric::PigmentationDensity, Comparison::Gt, 45.0);
        assert_eq!(c.holds(&scores(value, 70.0)), expected);
    }

    #[test]
    fn test_reason_interpolates_rounded_score() {
        let table = RuleTable::fallback();
        let detan = &table.rules()[0];
        assert_eq!(
            detan.reason_for(&scores(61.7, 70.0)),
            "Pigmentation density score is 62 (above 45)."
        );
    }

    #[test]
    fn test_unless_matched_blocks_rule() {
        let table = RuleTable::fallback();
        let premium = &table.rules()[4];
        let s = scores(10.0, 40.0);
        assert!(premium.matches(&s, &[]));
        assert!(!premium.matches(&s, &["Fruit Facial"]));
    }

    #[test]
    fn test_rule_without_conditions_never_matches() {
        let mut r = RuleTable::fallback().rules()[0].clone();
        r.conditions.clear();
        assert!(!r.matches(&scores(99.0, 10.0), &[]));
    }

    #[test]
    fn test_fallback_menu() {
        let table = RuleTable::default();
        let services: Vec<&str> = table.rules().iter().map(|r| r.service.as_str()).collect();
        assert_eq!(
            services,
            [
                "De-Tan Facial",
                "Fruit Facial",
                "Acne Treatment",
                "Threading / Waxing",
                "Gold/Diamond Facial"
            ]
        );
    }

    #[test]
    fn test_deserializes_from_json() {
        let json = r#"{
            "rules": [{
                "service": "Hydra Facial",
                "conditions": [
                    {"metric": "texture_roughness", "op": "gt", "threshold": 40},
                    {"metric": "brightness", "op": "lt", "threshold": 80}
                ],
                "reason": "Texture score is {score}.",
                "expected_effect": "Smoother skin.",
                "estimated_improvement_pct": 18.5,
                "projection": [{"metric": "texture_roughness", "delta": -12}]
            }]
        }"#;
        let table: RuleTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 1);
        let r = &table.rules()[0];
        assert_eq!(r.unless_matched, None);
        assert_eq!(r.conditions[1].op, Comparison::Lt);
        assert_eq!(r.projection[0].metric, SkinMetric::TextureRoughness);

        let s = SkinScores {
            texture_roughness: 55.4,
            brightness: 60.0,
            ..SkinScores::neutral()
        };
        assert!(r.matches(&s, &[]));
        assert_eq!(r.recommend(&s).reason, "Texture score is 55.");
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let json = r#"{"rules": [{"service": "X", "conditions": [{"metric": "glow", "op": "gt", "threshold": 1}],
            "reason": "", "expected_effect": "", "estimated_improvement_pct": 1}]}"#;
        assert!(serde_json::from_str::<RuleTable>(json).is_err());
    }
}
