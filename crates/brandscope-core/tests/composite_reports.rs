//! Sequential composite reports against a scripted backend

use brandscope_backend::BackendError;
use brandscope_core::flows::competitive::{FourCsAnalysis, FourCsAnalysisFlow};
use brandscope_core::prelude::*;
use brandscope_core::{CategoryReport, CompetitiveReport, CulturalReport, OutputViolation};
use brandscope_schema::{Contract, ViolationKind};
use brandscope_test_utils::{fixtures, ScriptedBackend};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const FOUR_CS: &str = "specializes in 4Cs analysis";
const PRIORITIZE: &str = "strategy consultant";

fn executor(backend: &Arc<ScriptedBackend>) -> FlowExecutor {
    FlowExecutor::new(backend.clone(), EngineConfig::new())
}

fn brief() -> BrandBrief {
    BrandBrief::new("Acme", "Anvils for cartoon coyotes", "Hardware").with_location("Arizona")
}

#[tokio::test]
async fn competitive_report_merges_both_stages() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond_json(FOUR_CS, fixtures::four_cs_analysis())
            .respond_json(PRIORITIZE, fixtures::prioritized_actions()),
    );
    let report = CompetitiveReportFlow::new(executor(&backend))
        .unwrap()
        .execute(brief())
        .await
        .unwrap();

    assert_eq!(
        report.analysis,
        FourCsAnalysis::decode(fixtures::four_cs_analysis()).unwrap()
    );
    assert_eq!(
        report.actions.high_priority_actions,
        "Launch a direct web store within the quarter."
    );

    let value = report.to_value().unwrap();
    assert!(value.get("competition").is_some());
    assert!(value.get("lowPriorityActions").is_some());
    assert!(CompetitiveReport::schema().is_valid(&value));
}

#[tokio::test]
async fn prioritization_runs_after_analysis_and_sees_it() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond_json(FOUR_CS, fixtures::four_cs_analysis())
            .respond_json(PRIORITIZE, fixtures::prioritized_actions()),
    );
    CompetitiveReportFlow::new(executor(&backend))
        .unwrap()
        .execute(brief())
        .await
        .unwrap();

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains(FOUR_CS));
    assert!(prompts[0].contains("Focus location: Arizona"));
    assert!(prompts[1].contains(PRIORITIZE));
    assert!(prompts[1].contains(
        "- Roadrunner Supply (Direct): rating 4/5, market share 25%. Strengths: Speed, Brand recognition. Weaknesses: Price."
    ));
    assert!(prompts[1].contains("Culture analysis: Desert communities value durable, self-reliant tools."));
}

#[tokio::test]
async fn analysis_failure_stops_the_pipeline() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .fail(
                FOUR_CS,
                BackendError::Status {
                    status: 503,
                    body: "overloaded".into(),
                },
            )
            .respond_json(PRIORITIZE, fixtures::prioritized_actions()),
    );
    let err = CompetitiveReportFlow::new(executor(&backend))
        .unwrap()
        .execute(brief())
        .await
        .unwrap_err();

    assert_eq!(backend.call_count(), 1);
    assert!(err.is_retryable());
    let EngineError::Stage { stage, source } = err else {
        panic!("expected a stage failure, got {err:?}");
    };
    assert_eq!(stage, "generate-4cs-analysis");
    assert!(matches!(*source, EngineError::Transport { .. }));
}

#[tokio::test]
async fn invalid_analysis_never_reaches_prioritization() {
    let mut analysis = fixtures::four_cs_analysis();
    analysis["competition"][1]["rating"] = serde_json::json!(9);
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond_json(FOUR_CS, analysis)
            .respond_json(PRIORITIZE, fixtures::prioritized_actions()),
    );
    let err = CompetitiveReportFlow::new(executor(&backend))
        .unwrap()
        .execute(brief())
        .await
        .unwrap_err();

    assert_eq!(backend.call_count(), 1);
    assert_eq!(err.root_cause().flow(), Some("generate-4cs-analysis"));
    assert!(err.to_string().contains("competition[1].rating"));
}

#[tokio::test]
async fn empty_competition_is_rejected() {
    let mut analysis = fixtures::four_cs_analysis();
    analysis["competition"] = serde_json::json!([]);
    let backend = Arc::new(ScriptedBackend::new().respond_json(FOUR_CS, analysis));
    let err = FourCsAnalysisFlow::new(executor(&backend))
        .unwrap()
        .execute(brief())
        .await
        .unwrap_err();

    let EngineError::OutputContract {
        source: OutputViolation::Schema(violations),
        ..
    } = err
    else {
        panic!("expected a schema violation, got {err:?}");
    };
    assert_eq!(
        violations.at("competition").map(|v| &v.kind),
        Some(&ViolationKind::TooFewItems { len: 0, min: 1 })
    );
}

#[tokio::test]
async fn category_report_feeds_analysis_into_insights() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond_json("specializes in category analysis", fixtures::category_analysis())
            .respond_json("strategic market analyst", fixtures::category_insights()),
    );
    let report = CategoryReportFlow::new(executor(&backend))
        .unwrap()
        .execute(brief().profile())
        .await
        .unwrap();

    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.insights[0].related_data_point, "Hobbyist segment");
    assert!(CategoryReport::schema().is_valid(&report.to_value().unwrap()));

    let prompts = backend.prompts();
    assert!(prompts[1].contains("- Hobbyist: revenue $5.4B, growth 12.5%\n"));
    assert!(prompts[1].contains("- Home renovation: impact High Impact, trend up\n"));
}

#[tokio::test]
async fn cultural_report_feeds_analysis_into_insights() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond_json("cultural strategist and anthropologist", fixtures::cultural_analysis())
            .respond_json("derive 3-4 actionable insights", fixtures::cultural_insights()),
    );
    let report = CulturalReportFlow::new(executor(&backend))
        .unwrap()
        .execute(brief())
        .await
        .unwrap();

    assert_eq!(report.analysis.cultural_fit_score.overall_score, 78.0);
    assert_eq!(report.insights[0].related_trend_or_value, "Repair culture");
    assert!(CulturalReport::schema().is_valid(&report.to_value().unwrap()));
    assert!(backend.prompts()[0].contains("in Arizona"));
}

#[tokio::test]
async fn insight_failure_names_insight_stage() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .respond_json("cultural strategist and anthropologist", fixtures::cultural_analysis())
            .respond_text("derive 3-4 actionable insights", "   "),
    );
    let err = CulturalReportFlow::new(executor(&backend))
        .unwrap()
        .execute(brief())
        .await
        .unwrap_err();

    let EngineError::Stage { stage, source } = err else {
        panic!("expected a stage failure, got {err:?}");
    };
    assert_eq!(stage, "generate-cultural-insights");
    assert!(matches!(*source, EngineError::EmptyResponse { .. }));
}
