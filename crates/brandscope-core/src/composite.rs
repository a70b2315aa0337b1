//! Composite reports
//!
//! Each report runs two flows in order. The second flow starts only after the
//! first has returned a decoded value, and any failure is reported as
//! [`EngineError::Stage`] naming the flow that broke.

use crate::error::EngineError;
use crate::executor::FlowExecutor;
use crate::flow::{Flow, FlowSpec};
use crate::flows::category::{
    CategoryAnalysis, CategoryAnalysisFlow, CategoryAnalysisSpec, CategoryInsight,
    CategoryInsightsFlow, CategoryInsightsInput, CategoryInsightsSpec,
};
use crate::flows::competitive::{
    FourCsAnalysis, FourCsAnalysisFlow, FourCsAnalysisSpec, PrioritizeFlow, PrioritizeInput,
    PrioritizeSpec, PrioritizedActions,
};
use crate::flows::cultural::{
    CulturalAnalysis, CulturalAnalysisFlow, CulturalAnalysisSpec, CulturalInsight,
    CulturalInsightsFlow, CulturalInsightsInput, CulturalInsightsSpec,
};
use crate::flows::{BrandBrief, BusinessProfile};
use async_trait::async_trait;
use brandscope_schema::{Contract, FieldKind, Schema};
use brandscope_template::Template;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One line per competitor, rendered from the 4Cs output
const COMPETITION_TEMPLATE: &str = "{{#each competition}}
- {{this.name}} ({{this.type}}): rating {{this.rating}}/5, market share {{this.marketShare}}%. Strengths: {{this.strengths}}. Weaknesses: {{this.weaknesses}}.
{{/each}}";

/// 4Cs analysis with its prioritized actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveReport {
    #[serde(flatten)]
    pub analysis: FourCsAnalysis,
    #[serde(flatten)]
    pub actions: PrioritizedActions,
}

impl Contract for CompetitiveReport {
    fn schema() -> Schema {
        Schema::object("CompetitiveReport")
            .merge(&FourCsAnalysis::schema())
            .merge(&PrioritizedActions::schema())
    }
}

/// Runs `generate-4cs-analysis` then `prioritize-actionable-insights`
#[derive(Debug)]
pub struct CompetitiveReportFlow {
    analysis: FourCsAnalysisFlow,
    prioritize: PrioritizeFlow,
    competition: Template,
}

impl CompetitiveReportFlow {
    pub const NAME: &'static str = "competitive-report";

    /// # Errors
    /// [`EngineError::Template`] if any constituent template fails its check.
    pub fn new(executor: FlowExecutor) -> Result<Self, EngineError> {
        Ok(Self {
            analysis: FourCsAnalysisFlow::new(executor.clone())?,
            prioritize: PrioritizeFlow::new(executor)?,
            competition: Template::compile(COMPETITION_TEMPLATE, &FourCsAnalysis::schema())?,
        })
    }

    /// Input for the prioritization step
    ///
    /// # Errors
    /// [`EngineError::Config`] if the analysis cannot be serialized.
    pub fn prioritize_input(&self, analysis: &FourCsAnalysis) -> Result<PrioritizeInput, EngineError> {
        let value = analysis
            .to_value()
            .map_err(|e| EngineError::Config(format!("4Cs analysis not serializable: {e}")))?;
        Ok(PrioritizeInput {
            competition_analysis: self.competition.render(&value),
            culture_analysis: analysis.culture.clone(),
            consumer_analysis: analysis.consumer.clone(),
            category_analysis: analysis.category.clone(),
        })
    }
}

#[async_trait]
impl Flow for CompetitiveReportFlow {
    type Input = BrandBrief;
    type Output = CompetitiveReport;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, input: BrandBrief) -> Result<CompetitiveReport, EngineError> {
        info!(flow = Self::NAME, brand = %input.brand_name, "report started");

        let analysis = self
            .analysis
            .execute(input)
            .await
            .map_err(|e| EngineError::stage(FourCsAnalysisSpec::NAME, e))?;
        debug!(competitors = analysis.competition.len(), "4Cs analysis ready");

        let prioritize_input = self
            .prioritize_input(&analysis)
            .map_err(|e| EngineError::stage(PrioritizeSpec::NAME, e))?;
        let actions = self
            .prioritize
            .execute(prioritize_input)
            .await
            .map_err(|e| EngineError::stage(PrioritizeSpec::NAME, e))?;

        info!(flow = Self::NAME, "report finished");
        Ok(CompetitiveReport { analysis, actions })
    }
}

/// Category analysis with insights derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub analysis: CategoryAnalysis,
    pub insights: Vec<CategoryInsight>,
}

impl Contract for CategoryReport {
    fn schema() -> Schema {
        Schema::object("CategoryReport")
            .required("analysis", FieldKind::object(CategoryAnalysis::schema()))
            .required(
                "insights",
                FieldKind::array_of(FieldKind::object(CategoryInsight::schema())),
            )
    }
}

/// Runs `generate-category-analysis` then `generate-category-insights`
#[derive(Debug)]
pub struct CategoryReportFlow {
    analysis: CategoryAnalysisFlow,
    insights: CategoryInsightsFlow,
}

impl CategoryReportFlow {
    pub const NAME: &'static str = "category-report";

    /// # Errors
    /// [`EngineError::Template`] if any constituent template fails its check.
    pub fn new(executor: FlowExecutor) -> Result<Self, EngineError> {
        Ok(Self {
            analysis: CategoryAnalysisFlow::new(executor.clone())?,
            insights: CategoryInsightsFlow::new(executor)?,
        })
    }
}

#[async_trait]
impl Flow for CategoryReportFlow {
    type Input = BusinessProfile;
    type Output = CategoryReport;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, input: BusinessProfile) -> Result<CategoryReport, EngineError> {
        let analysis = self
            .analysis
            .execute(input)
            .await
            .map_err(|e| EngineError::stage(CategoryAnalysisSpec::NAME, e))?;

        let insights = self
            .insights
            .execute(CategoryInsightsInput {
                analysis: analysis.clone(),
            })
            .await
            .map_err(|e| EngineError::stage(CategoryInsightsSpec::NAME, e))?
            .insights;

        info!(flow = Self::NAME, insights = insights.len(), "report finished");
        Ok(CategoryReport { analysis, insights })
    }
}

/// Cultural analysis with insights derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalReport {
    pub analysis: CulturalAnalysis,
    pub insights: Vec<CulturalInsight>,
}

impl Contract for CulturalReport {
    fn schema() -> Schema {
        Schema::object("CulturalReport")
            .required("analysis", FieldKind::object(CulturalAnalysis::schema()))
            .required(
                "insights",
                FieldKind::array_of(FieldKind::object(CulturalInsight::schema())),
            )
    }
}

/// Runs `generate-cultural-analysis` then `generate-cultural-insights`
#[derive(Debug)]
pub struct CulturalReportFlow {
    analysis: CulturalAnalysisFlow,
    insights: CulturalInsightsFlow,
}

impl CulturalReportFlow {
    pub const NAME: &'static str = "cultural-report";

    /// # Errors
    /// [`EngineError::Template`] if any constituent template fails its check.
    pub fn new(executor: FlowExecutor) -> Result<Self, EngineError> {
        Ok(Self {
            analysis: CulturalAnalysisFlow::new(executor.clone())?,
            insights: CulturalInsightsFlow::new(executor)?,
        })
    }
}

#[async_trait]
impl Flow for CulturalReportFlow {
    type Input = BrandBrief;
    type Output = CulturalReport;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, input: BrandBrief) -> Result<CulturalReport, EngineError> {
        let analysis = self
            .analysis
            .execute(input)
            .await
            .map_err(|e| EngineError::stage(CulturalAnalysisSpec::NAME, e))?;

        let insights = self
            .insights
            .execute(CulturalInsightsInput {
                analysis: analysis.clone(),
            })
            .await
            .map_err(|e| EngineError::stage(CulturalInsightsSpec::NAME, e))?
            .insights;

        info!(flow = Self::NAME, insights = insights.len(), "report finished");
        Ok(CulturalReport { analysis, insights })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use brandscope_test_utils::{fixtures, ScriptedBackend};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn executor(backend: &Arc<ScriptedBackend>) -> FlowExecutor {
        FlowExecutor::new(backend.clone(), EngineConfig::new())
    }

    #[test]
    fn competition_renders_one_line_per_competitor() {
        let backend = Arc::new(ScriptedBackend::new());
        let report = CompetitiveReportFlow::new(executor(&backend)).unwrap();
        let analysis = FourCsAnalysis::decode(fixtures::four_cs_analysis()).unwrap();

        let input = report.prioritize_input(&analysis).unwrap();
        assert_eq!(
            input.competition_analysis,
            "- Roadrunner Supply (Direct): rating 4/5, market share 25%. Strengths: Speed, Brand recognition. Weaknesses: Price.\n\
             - Coyote Hardware (Indirect): rating 3.5/5, market share 10.5%. Strengths: Catalog breadth. Weaknesses: Reliability, Support.\n"
        );
        assert_eq!(input.culture_analysis, analysis.culture);
    }

    #[test]
    fn report_schema_flattens_both_outputs() {
        let schema = CompetitiveReport::schema();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "competition",
                "culture",
                "consumer",
                "category",
                "executiveSummary",
                "scores",
                "highPriorityActions",
                "mediumPriorityActions",
                "lowPriorityActions",
            ]
        );
    }

    #[tokio::test]
    async fn category_failure_names_stage() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .respond_json("specializes in category analysis", fixtures::category_analysis())
                .respond_json("strategic market analyst", serde_json::json!({ "insights": "none" })),
        );
        let report = CategoryReportFlow::new(executor(&backend)).unwrap();
        let err = report
            .execute(BusinessProfile {
                brand_name: "Acme".into(),
                description: "Anvils".into(),
                industry: "Hardware".into(),
            })
            .await
            .unwrap_err();

        let EngineError::Stage { stage, source } = err else {
            panic!("expected a stage failure, got {err:?}");
        };
        assert_eq!(stage, "generate-category-insights");
        assert!(matches!(*source, EngineError::OutputContract { .. }));
        assert_eq!(backend.call_count(), 2);
    }
}
