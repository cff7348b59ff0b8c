use std::collections::BTreeMap;

use super::rule_table::{Rule, RuleTable};
use super::service_recommendation::ServiceRecommendation;
use crate::scoring::pixel_statistics::round1;
use crate::scoring::skin_scores::{SkinMetric, SkinScores};

/// Maximum number of services surfaced to staff.
pub const TOP_SERVICES: usize = 3;

/// Projected metric values after following every recommended service,
/// keyed in report order.
pub type ImprovementProjection = BTreeMap<SkinMetric, f64>;

/// Applies a [`RuleTable`] to skin scores.
#[derive(Clone, Debug, Default)]
pub struct RecommendationEngine {
    table: RuleTable,
}

impl RecommendationEngine {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Matching rules in table order, one per service.
    fn matched_rules(&self, scores: &SkinScores) -> Vec<&Rule> {
        let mut matched: Vec<&Rule> = Vec::new();
        for rule in self.table.rules() {
            let services: Vec<&str> = matched.iter().map(|r| r.service.as_str()).collect();
            if services.contains(&rule.service.as_str()) {
                continue;
            }
            if rule.matches(scores, &services) {
                matched.push(rule);
            }
        }
        matched
    }

    /// Every triggered service in table order.
    pub fn recommendations(&self, scores: &SkinScores) -> Vec<ServiceRecommendation> {
        self.matched_rules(scores)
            .into_iter()
            .map(|r| r.recommend(scores))
            .collect()
    }

    /// Triggered services by estimated improvement, highest first. Ties
    /// keep table order.
    pub fn ranked(&self, scores: &SkinScores) -> Vec<ServiceRecommendation> {
        let mut recs = self.recommendations(scores);
        recs.sort_by(|a, b| b.estimated_improvement_pct.total_cmp(&a.estimated_improvement_pct));
        recs
    }

    pub fn top3_services(&self, scores: &SkinScores) -> Vec<ServiceRecommendation> {
        self.ranked(scores)
            .into_iter()
            .take(TOP_SERVICES)
            .map(|mut r| {
                r.estimated_improvement_pct = round1(r.estimated_improvement_pct);
                r
            })
            .collect()
    }

    /// Service names in the order they should be booked.
    pub fn suggested_roadmap(&self, scores: &SkinScores) -> Vec<String> {
        self.ranked(scores).into_iter().map(|r| r.service).collect()
    }

    /// Starts from the current scores and applies each triggered rule's
    /// deltas in table order, clamping to 0..100 after every step.
    pub fn improvement_projection(&self, scores: &SkinScores) -> ImprovementProjection {
        let mut projected = *scores;
        for rule in self.matched_rules(scores) {
            for step in &rule.projection {
                let value = (projected.get(step.metric) + step.delta).clamp(0.0, 100.0);
                projected.set(step.metric, value);
            }
        }
        SkinMetric::ALL
            .into_iter()
            .map(|m| (m, round1(projected.get(m))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::domain::rule_table::{Comparison, Condition, ProjectionDelta};
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn scores(pigmentation: f64, brightness: f64, redness: f64, hair: f64) -> SkinScores {
        SkinScores {
            brightness,
            pigmentation_density: pigmentation,
            redness,
            texture_roughness: 30.0,
            dark_circle_index: 20.0,
            facial_hair_density: hair,
            measured: true,
        }
    }

    fn services(recs: &[ServiceRecommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.service.as_str()).collect()
    }

    #[test]
    fn test_tan_and_dull_skin() {
        let engine = RecommendationEngine::default();
        let s = scores(60.0, 40.0, 10.0, 10.0);

        let top = engine.top3_services(&s);
        assert_eq!(services(&top), ["De-Tan Facial", "Fruit Facial"]);
        assert_relative_eq!(top[0].estimated_improvement_pct, 25.0);
        assert_relative_eq!(top[1].estimated_improvement_pct, 20.0);
        assert_eq!(top[0].reason, "Pigmentation density score is 60 (above 45).");
        assert_eq!(top[1].reason, "Brightness score is 40 (below 60).");
        assert_eq!(top[1].expected_effect, "Add glow and mild hydration; smooth skin.");

        assert_eq!(engine.suggested_roadmap(&s), ["De-Tan Facial", "Fruit Facial"]);

        let proj = engine.improvement_projection(&s);
        assert_relative_eq!(proj[&SkinMetric::PigmentationDensity], 40.0);
        assert_relative_eq!(proj[&SkinMetric::Brightness], 55.0);
        assert_relative_eq!(proj[&SkinMetric::Redness], 10.0);
    }

    #[test]
    fn test_healthy_skin_gets_nothing() {
        let engine = RecommendationEngine::default();
        let s = scores(20.0, 80.0, 10.0, 10.0);
        assert!(engine.top3_services(&s).is_empty());
        assert!(engine.suggested_roadmap(&s).is_empty());
        let proj = engine.improvement_projection(&s);
        assert_eq!(proj.len(), 6);
        assert_relative_eq!(proj[&SkinMetric::Brightness], 80.0);
    }

    #[test]
    fn test_top3_caps_at_three_and_orders_by_pct() {
        let engine = RecommendationEngine::default();
        let s = scores(60.0, 40.0, 70.0, 80.0);
        let top = engine.top3_services(&s);
        assert_eq!(services(&top), ["Acne Treatment", "De-Tan Facial", "Fruit Facial"]);
        assert_eq!(
            engine.suggested_roadmap(&s),
            ["Acne Treatment", "De-Tan Facial", "Fruit Facial", "Threading / Waxing"]
        );
    }

    #[test]
    fn test_projection_accumulates_fallback_deltas() {
        let engine = RecommendationEngine::default();
        let s = scores(10.0, 10.0, 60.0, 20.0);
        let proj = engine.improvement_projection(&s);
        assert_relative_eq!(proj[&SkinMetric::Redness], 35.0);
        assert_relative_eq!(proj[&SkinMetric::Brightness], 25.0);

        let s = scores(50.0, 30.0, 20.0, 70.0);
        let proj = engine.improvement_projection(&s);
        assert_relative_eq!(proj[&SkinMetric::PigmentationDensity], 30.0);
        assert_relative_eq!(proj[&SkinMetric::FacialHairDensity], 40.0);
    }

    #[test]
    fn test_neutral_scores_fire_de_tan_and_brightening_only() {
        // At 50: pigmentation > 45 and brightness < 60 hold; brightness < 50,
        // redness > 50 and hair > 55 do not.
        let engine = RecommendationEngine::default();
        let s = SkinScores::neutral();
        assert_eq!(engine.suggested_roadmap(&s), ["De-Tan Facial", "Fruit Facial"]);

        let proj = engine.improvement_projection(&s);
        assert_relative_eq!(proj[&SkinMetric::Brightness], 65.0);
        assert_relative_eq!(proj[&SkinMetric::PigmentationDensity], 30.0);
        assert_relative_eq!(proj[&SkinMetric::Redness], 50.0);
        assert_relative_eq!(proj[&SkinMetric::FacialHairDensity], 50.0);
    }

    /// Rule that always fires and applies `steps` in order.
    fn stepping_rule(service: &str, steps: &[(SkinMetric, f64)]) -> Rule {
        Rule {
            service: service.to_string(),
            conditions: vec![Condition::new(SkinMetric::TextureRoughness, Comparison::Lt, 1_000.0)],
            unless_matched: None,
            reason: String::new(),
            expected_effect: String::new(),
            estimated_improvement_pct: 10.0,
            projection: steps
                .iter()
                .map(|&(metric, delta)| ProjectionDelta { metric, delta })
                .collect(),
        }
    }

    #[rstest]
    #[case::above_hundred(SkinMetric::Brightness, 95.0, 15.0, 100.0)]
    #[case::below_zero(SkinMetric::Redness, 10.0, -25.0, 0.0)]
    #[case::already_at_bound(SkinMetric::PigmentationDensity, 0.0, -20.0, 0.0)]
    fn test_projection_clamps_to_score_range(
        #[case] metric: SkinMetric,
        #[case] start: f64,
        #[case] delta: f64,
        #[case] expected: f64,
    ) {
        let engine = RecommendationEngine::new(RuleTable::new(vec![stepping_rule(
            "Step",
            &[(metric, delta)],
        )]));
        let mut s = scores(50.0, 50.0, 50.0, 50.0);
        s.set(metric, start);
        assert_relative_eq!(engine.improvement_projection(&s)[&metric], expected);
    }

    #[test]
    fn test_later_deltas_start_from_clamped_value() {
        let engine = RecommendationEngine::new(RuleTable::new(vec![
            stepping_rule("Lift", &[(SkinMetric::Brightness, 15.0), (SkinMetric::Redness, -25.0)]),
            stepping_rule("Settle", &[(SkinMetric::Brightness, -20.0), (SkinMetric::Redness, 5.0)]),
        ]));
        let s = scores(50.0, 95.0, 10.0, 50.0);
        let proj = engine.improvement_projection(&s);
        // 95 + 15 clamps to 100, then 80; 10 - 25 clamps to 0, then 5.
        assert_relative_eq!(proj[&SkinMetric::Brightness], 80.0);
        assert_relative_eq!(proj[&SkinMetric::Redness], 5.0);
    }

    #[test]
    fn test_projection_rounds_at_the_end() {
        let engine = RecommendationEngine::default();
        let mut s = scores(46.04, 70.0, 10.0, 10.0);
        s.texture_roughness = 12.345;
        let proj = engine.improvement_projection(&s);
        assert_relative_eq!(proj[&SkinMetric::PigmentationDensity], 26.0);
        assert_relative_eq!(proj[&SkinMetric::TextureRoughness], 12.3);
    }

    fn custom_rule(service: &str, pct: f64, delta: f64) -> Rule {
        Rule {
            service: service.to_string(),
            conditions: vec![Condition::new(SkinMetric::Brightness, Comparison::Lt, 90.0)],
            unless_matched: None,
            reason: "Brightness {score}".to_string(),
            expected_effect: String::new(),
            estimated_improvement_pct: pct,
            projection: vec![ProjectionDelta {
                metric: SkinMetric::Brightness,
                delta,
            }],
        }
    }

    #[test]
    fn test_duplicate_services_are_reported_once() {
        let engine = RecommendationEngine::new(RuleTable::new(vec![
            custom_rule("Glow", 10.0, 5.0),
            custom_rule("Glow", 40.0, 50.0),
        ]));
        let s = scores(0.0, 40.0, 0.0, 0.0);
        let recs = engine.recommendations(&s);
        assert_eq!(recs.len(), 1);
        assert_relative_eq!(recs[0].estimated_improvement_pct, 10.0);
        assert_relative_eq!(engine.improvement_projection(&s)[&SkinMetric::Brightness], 45.0);
    }

    #[test]
    fn test_ties_keep_table_order() {
        let engine = RecommendationEngine::new(RuleTable::new(vec![
            custom_rule("B", 20.0, 0.0),
            custom_rule("A", 20.0, 0.0),
            custom_rule("C", 30.0, 0.0),
        ]));
        let s = scores(0.0, 40.0, 0.0, 0.0);
        assert_eq!(engine.suggested_roadmap(&s), ["C", "B", "A"]);
    }

    #[test]
    fn test_premium_rule_fires_without_its_blocker() {
        let mut rules = RuleTable::fallback().rules().to_vec();
        rules.retain(|r| r.service != "Fruit Facial");
        let engine = RecommendationEngine::new(RuleTable::new(rules));
        let s = scores(10.0, 40.0, 10.0, 10.0);
        let top = engine.top3_services(&s);
        assert_eq!(services(&top), ["Gold/Diamond Facial"]);
        assert_eq!(top[0].reason, "Brightness score is 40; premium boost recommended.");
        assert_relative_eq!(engine.improvement_projection(&s)[&SkinMetric::Brightness], 50.0);
    }

    #[test]
    fn test_projection_serializes_with_metric_names() {
        let engine = RecommendationEngine::default();
        let json = serde_json::to_value(engine.improvement_projection(&scores(60.0, 40.0, 10.0, 10.0)))
            .unwrap();
        assert_eq!(json["pigmentation_density"], 40.0);
        assert_eq!(json["brightness"], 55.0);
    }
}
