//! Flow registry
//!
//! Name-addressed access to every flow over plain JSON values, for callers
//! that pick a flow at runtime.

use crate::composite::{CategoryReportFlow, CompetitiveReportFlow, CulturalReportFlow};
use crate::error::EngineError;
use crate::executor::FlowExecutor;
use crate::flow::Flow;
use crate::flows::category::{CategoryAnalysisFlow, CategoryInsightsFlow, MarketResearchFlow};
use crate::flows::competitive::{
    AnalyzeCompetitorFlow, DetailedAnalysisFlow, FourCsAnalysisFlow, PrioritizeFlow,
    ReportScoresFlow, SwotFlow,
};
use crate::flows::consumer::{
    AnalyzeCustomerSegmentFlow, BehavioralPatternsFlow, ConsumerAnalysisFlow, DeepDiveFlow,
    DemographicsFlow, JourneyMapFlow, PsychographicsFlow,
};
use crate::flows::cultural::{CulturalAnalysisFlow, CulturalInsightsFlow, GlobalTrendsFlow};
use crate::personas::PersonaGenerationFlow;
use async_trait::async_trait;
use brandscope_schema::{Contract, ContractError, Schema};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A [`Flow`] with its input and output types erased to JSON
#[async_trait]
trait ErasedFlow: Send + Sync {
    fn input_schema(&self) -> Schema;
    fn output_schema(&self) -> Schema;
    async fn run(&self, input: Value) -> Result<Value, EngineError>;
}

struct Erased<F>(F);

#[async_trait]
impl<F: Flow> ErasedFlow for Erased<F> {
    fn input_schema(&self) -> Schema {
        F::Input::schema()
    }

    fn output_schema(&self) -> Schema {
        F::Output::schema()
    }

    async fn run(&self, input: Value) -> Result<Value, EngineError> {
        let name = self.0.name();
        let input = F::Input::decode(input).map_err(|err| match err {
            ContractError::Schema(source) => EngineError::InputContract {
                flow: name.to_string(),
                source,
            },
            ContractError::Decode(e) => EngineError::Config(format!("{name}: input not decodable: {e}")),
        })?;
        let output = self.0.execute(input).await?;
        output
            .to_value()
            .map_err(|e| EngineError::Config(format!("{name}: output not serializable: {e}")))
    }
}

/// Flows by name, in registration order
#[derive(Default)]
pub struct FlowRegistry {
    flows: IndexMap<&'static str, Arc<dyn ErasedFlow>>,
}

impl fmt::Debug for FlowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowRegistry")
            .field("flows", &self.flows.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FlowRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every flow in the library, sharing one executor
    ///
    /// # Errors
    /// [`EngineError::Template`] if any template fails its check.
    pub fn with_defaults(executor: FlowExecutor) -> Result<Self, EngineError> {
        let e = &executor;
        Self::new()
            .with_flow(FourCsAnalysisFlow::new(e.clone())?)?
            .with_flow(PrioritizeFlow::new(e.clone())?)?
            .with_flow(AnalyzeCompetitorFlow::new(e.clone())?)?
            .with_flow(SwotFlow::new(e.clone())?)?
            .with_flow(DetailedAnalysisFlow::new(e.clone())?)?
            .with_flow(ReportScoresFlow::new(e.clone())?)?
            .with_flow(CategoryAnalysisFlow::new(e.clone())?)?
            .with_flow(CategoryInsightsFlow::new(e.clone())?)?
            .with_flow(MarketResearchFlow::new(e.clone())?)?
            .with_flow(ConsumerAnalysisFlow::new(e.clone())?)?
            .with_flow(AnalyzeCustomerSegmentFlow::new(e.clone())?)?
            .with_flow(DeepDiveFlow::new(e.clone())?)?
            .with_flow(JourneyMapFlow::new(e.clone())?)?
            .with_flow(DemographicsFlow::new(e.clone())?)?
            .with_flow(PsychographicsFlow::new(e.clone())?)?
            .with_flow(BehavioralPatternsFlow::new(e.clone())?)?
            .with_flow(CulturalAnalysisFlow::new(e.clone())?)?
            .with_flow(CulturalInsightsFlow::new(e.clone())?)?
            .with_flow(GlobalTrendsFlow::new(e.clone())?)?
            .with_flow(PersonaGenerationFlow::new(e.clone())?)?
            .with_flow(CompetitiveReportFlow::new(e.clone())?)?
            .with_flow(CategoryReportFlow::new(e.clone())?)?
            .with_flow(CulturalReportFlow::new(executor)?)
    }

    /// Register a flow under its own name
    ///
    /// # Errors
    /// [`EngineError::Config`] if the name is already taken.
    pub fn with_flow<F: Flow + 'static>(mut self, flow: F) -> Result<Self, EngineError> {
        let name = flow.name();
        if self.flows.contains_key(name) {
            return Err(EngineError::Config(format!("flow '{name}' registered twice")));
        }
        self.flows.insert(name, Arc::new(Erased(flow)));
        Ok(self)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.flows.keys().copied()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.flows.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// # Errors
    /// [`EngineError::UnknownFlow`] for an unregistered name.
    pub fn input_schema(&self, name: &str) -> Result<Schema, EngineError> {
        self.get(name).map(|flow| flow.input_schema())
    }

    /// # Errors
    /// [`EngineError::UnknownFlow`] for an unregistered name.
    pub fn output_schema(&self, name: &str) -> Result<Schema, EngineError> {
        self.get(name).map(|flow| flow.output_schema())
    }

    /// Decode `input`, run the named flow and encode its output
    ///
    /// # Errors
    /// [`EngineError::UnknownFlow`], [`EngineError::InputContract`] when the
    /// input does not match the flow's input schema, or whatever the flow
    /// itself reports.
    pub async fn run(&self, name: &str, input: Value) -> Result<Value, EngineError> {
        let flow = self.get(name)?;
        debug!(flow = name, "running registered flow");
        flow.run(input).await
    }

    fn get(&self, name: &str) -> Result<&Arc<dyn ErasedFlow>, EngineError> {
        self.flows
            .get(name)
            .ok_or_else(|| EngineError::UnknownFlow(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use brandscope_test_utils::ScriptedBackend;
    use serde_json::json;

    fn registry(backend: &Arc<ScriptedBackend>) -> FlowRegistry {
        FlowRegistry::with_defaults(FlowExecutor::new(backend.clone(), EngineConfig::new())).unwrap()
    }

    #[test]
    fn defaults_cover_the_library() {
        let backend = Arc::new(ScriptedBackend::new());
        let registry = registry(&backend);
        assert_eq!(registry.len(), 23);
        assert_eq!(registry.names().next(), Some("generate-4cs-analysis"));
        assert!(registry.contains("generate-personas"));
        assert!(registry.contains("cultural-report"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let backend = Arc::new(ScriptedBackend::new());
        let executor = FlowExecutor::new(backend, EngineConfig::new());
        let err = FlowRegistry::new()
            .with_flow(SwotFlow::new(executor.clone()).unwrap())
            .unwrap()
            .with_flow(SwotFlow::new(executor).unwrap())
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn schemas_by_name() {
        let backend = Arc::new(ScriptedBackend::new());
        let registry = registry(&backend);
        assert_eq!(registry.input_schema("generate-demographics").unwrap().name(), "BrandIndustry");
        assert_eq!(registry.output_schema("competitive-report").unwrap().name(), "CompetitiveReport");
        assert!(matches!(
            registry.output_schema("generate-horoscope"),
            Err(EngineError::UnknownFlow(name)) if name == "generate-horoscope"
        ));
    }

    #[tokio::test]
    async fn undecodable_input_is_an_input_violation() {
        let backend = Arc::new(ScriptedBackend::new());
        let err = registry(&backend)
            .run("generate-swot-analysis", json!({ "brandNameToAnalyze": "Acme" }))
            .await
            .unwrap_err();
        let EngineError::InputContract { flow, source } = err else {
            panic!("expected input violation, got {err:?}");
        };
        assert_eq!(flow, "generate-swot-analysis");
        assert!(source.at("competitorName").is_some());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn runs_by_name() {
        let backend = Arc::new(ScriptedBackend::new().respond_json(
            "Acme",
            json!({
                "strengths": ["Brand"],
                "weaknesses": ["Price"],
                "opportunities": ["Online"],
                "threats": ["Imports"]
            }),
        ));
        let output = registry(&backend)
            .run(
                "generate-swot-analysis",
                json!({ "brandNameToAnalyze": "Acme", "competitorName": "Roadrunner Supply" }),
            )
            .await
            .unwrap();
        assert_eq!(output["threats"], json!(["Imports"]));
    }
}
