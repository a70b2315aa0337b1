//! Competition flows: the 4Cs analysis and everything about single competitors

use super::{list_of, BrandBrief};
use crate::flow::{FlowSpec, PromptFlow};
use brandscope_composition::MergeGuard;
use brandscope_schema::{Contract, FieldKind, Schema};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How a competitor relates to the analyzed brand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitorType {
    Direct,
    Indirect,
    Substitute,
}

impl CompetitorType {
    pub const ALL: [CompetitorType; 3] = [Self::Direct, Self::Indirect, Self::Substitute];

    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::Indirect => "Indirect",
            Self::Substitute => "Substitute",
        }
    }

    fn kind() -> FieldKind {
        FieldKind::one_of(Self::ALL.map(Self::as_str))
    }
}

impl Display for CompetitorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    #[serde(rename = "type")]
    pub competitor_type: CompetitorType,
    pub market_share: f64,
    pub rating: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl Contract for Competitor {
    fn schema() -> Schema {
        Schema::object("Competitor")
            .required("name", FieldKind::string())
            .describe("The name of the competitor.")
            .required("type", CompetitorType::kind())
            .describe("The type of competitor.")
            .required("marketShare", FieldKind::number())
            .describe("Estimated market share percentage.")
            .required("rating", FieldKind::number_in(0.0, 5.0))
            .describe("A competitive rating from 1 to 5.")
            .required("strengths", FieldKind::strings())
            .describe("A list of key strengths.")
            .required("weaknesses", FieldKind::strings())
            .describe("A list of key weaknesses.")
    }
}

/// 0 to 10 score with a two-word label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub score: f64,
    pub description: String,
}

impl Contract for Score {
    fn schema() -> Schema {
        Schema::object("Score")
            .required("score", FieldKind::number_in(0.0, 10.0))
            .describe("A score from 0 to 10 for the category.")
            .required("description", FieldKind::string())
            .describe("A short, two-word description summarizing the score.")
    }
}

/// One [`Score`] per C
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportScores {
    pub competition: Score,
    pub consumer: Score,
    pub culture: Score,
    pub category: Score,
}

impl Contract for ReportScores {
    fn schema() -> Schema {
        let score = || FieldKind::object(Score::schema());
        Schema::object("ReportScores")
            .required("competition", score())
            .describe("Score and description for the Competition category.")
            .required("consumer", score())
            .describe("Score and description for the Consumer category.")
            .required("culture", score())
            .describe("Score and description for the Culture category.")
            .required("category", score())
            .describe("Score and description for the Category category.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFindings {
    pub market_opportunities: String,
    pub competitive_positions: String,
    pub cultural_alignment: String,
    pub target_market: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicRecommendations {
    pub high_priority: Vec<String>,
    pub medium_priority: Vec<String>,
    pub low_priority: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub key_findings: KeyFindings,
    pub strategic_recommendations: StrategicRecommendations,
}

impl Contract for ExecutiveSummary {
    fn schema() -> Schema {
        let key_findings = Schema::object("KeyFindings")
            .required("marketOpportunities", FieldKind::string())
            .describe("Growth opportunities found by the analysis, in a single paragraph.")
            .required("competitivePositions", FieldKind::string())
            .describe("The brand's position relative to competitors, in a single paragraph.")
            .required("culturalAlignment", FieldKind::string())
            .describe("Brand-culture fit and opportunities, in a single paragraph.")
            .required("targetMarket", FieldKind::string())
            .describe("Priority customer segments, in a single paragraph.");

        let recommendations = Schema::object("StrategicRecommendations")
            .required("highPriority", FieldKind::strings())
            .describe("2-3 critical, high-impact initiatives or quick wins.")
            .required("mediumPriority", FieldKind::strings())
            .describe("2-3 initiatives for medium-term growth that need planning.")
            .required("lowPriority", FieldKind::strings())
            .describe("1-2 long-term initiatives with uncertain returns.");

        Schema::object("ExecutiveSummary")
            .required("keyFindings", FieldKind::object(key_findings))
            .describe("Key findings from the 4Cs analysis.")
            .required("strategicRecommendations", FieldKind::object(recommendations))
            .describe("Strategic recommendations prioritized into high, medium and low.")
    }
}

/// Competition, culture, consumer and category in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FourCsAnalysis {
    pub competition: Vec<Competitor>,
    pub culture: String,
    pub consumer: String,
    pub category: String,
    pub executive_summary: ExecutiveSummary,
    pub scores: ReportScores,
}

impl Contract for FourCsAnalysis {
    fn schema() -> Schema {
        Schema::object("FourCsAnalysis")
            .required("competition", list_of::<Competitor>().non_empty())
            .describe("A list of competitors with their analysis.")
            .required("culture", FieldKind::string())
            .describe("Analysis of relevant cultural trends and alignment.")
            .required("consumer", FieldKind::string())
            .describe("Analysis of the target consumer segments.")
            .required("category", FieldKind::string())
            .describe("Analysis of the product or service category.")
            .required("executiveSummary", FieldKind::object(ExecutiveSummary::schema()))
            .describe("Key findings and prioritized strategic recommendations.")
            .required("scores", FieldKind::object(ReportScores::schema()))
            .describe("Scores for each of the 4C categories.")
    }
}

pub struct FourCsAnalysisSpec;

impl FlowSpec for FourCsAnalysisSpec {
    const NAME: &'static str = "generate-4cs-analysis";
    const TEMPLATE: &'static str = r"You are a strategic marketing expert who specializes in 4Cs analysis: Competition, Culture, Consumer and Category.

Analyze the brand below. Combine what the user told you with current public information about the brand, its competitors, the industry and its customers.

Brand: {{brandName}}
Business description: {{description}}
Industry: {{industry}}
{{#if location}}
Focus location: {{location}}
{{/if}}

Instructions:
1. Competition: identify at least 10 direct competitors, plus indirect and substitute competitors where they exist. For each give its name, type (Direct, Indirect or Substitute), estimated market share percentage, a rating from 1 to 5, and its key strengths and weaknesses.
2. Culture: describe the cultural trends, social values and lifestyle shifts that affect the brand.
3. Consumer: describe the target segments, their needs, motivations, online behavior and perceptions.
4. Category: define the product or service category, its size, growth and demand drivers.
5. Executive summary: summarize the key findings (market opportunities, competitive position, cultural alignment, target market) and list strategic recommendations split into high, medium and low priority.
6. Scores: rate competition, consumer, culture and category from 0 to 10, each with a two-word description.

Answer with JSON matching the required schema.
";

    type Input = BrandBrief;
    type Output = FourCsAnalysis;
}

pub type FourCsAnalysisFlow = PromptFlow<FourCsAnalysisSpec>;

/// The four 4Cs sections as prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizeInput {
    pub competition_analysis: String,
    pub culture_analysis: String,
    pub consumer_analysis: String,
    pub category_analysis: String,
}

impl Contract for PrioritizeInput {
    fn schema() -> Schema {
        Schema::object("PrioritizeInput")
            .required("competitionAnalysis", FieldKind::string())
            .describe("The analysis of the competitive landscape.")
            .required("cultureAnalysis", FieldKind::string())
            .describe("The analysis of cultural trends and alignment.")
            .required("consumerAnalysis", FieldKind::string())
            .describe("The analysis of the target consumer segments.")
            .required("categoryAnalysis", FieldKind::string())
            .describe("The analysis of the product or service category.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedActions {
    pub high_priority_actions: String,
    pub medium_priority_actions: String,
    pub low_priority_actions: String,
}

impl Contract for PrioritizedActions {
    fn schema() -> Schema {
        Schema::object("PrioritizedActions")
            .required("highPriorityActions", FieldKind::string())
            .describe("Critical initiatives requiring immediate attention and resources.")
            .required("mediumPriorityActions", FieldKind::string())
            .describe("Important initiatives for medium-term growth and strategic investments.")
            .required("lowPriorityActions", FieldKind::string())
            .describe("Long-term strategic initiatives and improvements with uncertain returns.")
    }
}

pub struct PrioritizeSpec;

impl FlowSpec for PrioritizeSpec {
    const NAME: &'static str = "prioritize-actionable-insights";
    const TEMPLATE: &'static str = r"You are a strategy consultant. Read the 4Cs analysis below and turn it into actions split into high, medium and low priority.

Competition analysis:
{{competitionAnalysis}}

Culture analysis: {{cultureAnalysis}}

Consumer analysis: {{consumerAnalysis}}

Category analysis: {{categoryAnalysis}}

Answer with JSON matching the required schema.
";

    type Input = PrioritizeInput;
    type Output = PrioritizedActions;
}

pub type PrioritizeFlow = PromptFlow<PrioritizeSpec>;

/// A competitor the user added by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorInput {
    pub brand_name_to_analyze: String,
    pub competitor_name: String,
    pub competitor_type: CompetitorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_description: Option<String>,
}

impl Contract for CompetitorInput {
    fn schema() -> Schema {
        Schema::object("CompetitorInput")
            .required("brandNameToAnalyze", FieldKind::string())
            .describe("The name of the user's brand for context.")
            .required("competitorName", FieldKind::string())
            .describe("The name of the competitor to analyze.")
            .required("competitorType", CompetitorType::kind())
            .describe("The type of competitor.")
            .optional("competitorDescription", FieldKind::string())
            .describe("An optional description of the competitor.")
    }
}

pub struct AnalyzeCompetitorSpec;

impl FlowSpec for AnalyzeCompetitorSpec {
    const NAME: &'static str = "analyze-competitor";
    const TEMPLATE: &'static str = r"You are a strategic marketing expert helping with a competitive analysis for the brand '{{brandNameToAnalyze}}'.

The user added this competitor by hand and needs it researched.

Competitor: {{competitorName}}
Type: {{competitorType}}
{{#if competitorDescription}}
User description: {{competitorDescription}}
{{/if}}

Provide:
- name: the competitor's official name.
- type: '{{competitorType}}', exactly as given.
- marketShare: estimated market share percentage, from public data where available.
- rating: competitive strength from 1 to 5, where 5 is a very strong competitor.
- strengths: at least 3 key strengths.
- weaknesses: at least 3 key weaknesses.

Answer with JSON matching the required schema.
";

    type Input = CompetitorInput;
    type Output = Competitor;

    fn guard() -> MergeGuard {
        MergeGuard::new().bind_field("type", "competitorType")
    }
}

pub type AnalyzeCompetitorFlow = PromptFlow<AnalyzeCompetitorSpec>;

/// A named competitor of the user's brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorRef {
    pub brand_name_to_analyze: String,
    pub competitor_name: String,
}

impl Contract for CompetitorRef {
    fn schema() -> Schema {
        Schema::object("CompetitorRef")
            .required("brandNameToAnalyze", FieldKind::string())
            .describe("The user's brand name for context.")
            .required("competitorName", FieldKind::string())
            .describe("The name of the competitor to analyze.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl Contract for SwotAnalysis {
    fn schema() -> Schema {
        Schema::object("SwotAnalysis")
            .required("strengths", FieldKind::strings())
            .describe("The competitor's key strengths.")
            .required("weaknesses", FieldKind::strings())
            .describe("The competitor's key weaknesses.")
            .required("opportunities", FieldKind::strings())
            .describe("Opportunities the competitor could pursue.")
            .required("threats", FieldKind::strings())
            .describe("Threats to the competitor.")
    }
}

pub struct SwotSpec;

impl FlowSpec for SwotSpec {
    const NAME: &'static str = "generate-swot-analysis";
    const TEMPLATE: &'static str = r"You are a strategic marketing expert helping with a competitive analysis for the brand '{{brandNameToAnalyze}}'.

Produce a SWOT analysis of the competitor '{{competitorName}}' using current information about it and its market.

- strengths: at least 3 internal advantages.
- weaknesses: at least 3 internal disadvantages.
- opportunities: at least 3 external factors it could exploit.
- threats: at least 3 external factors that could harm it.

Answer with JSON matching the required schema.
";

    type Input = CompetitorRef;
    type Output = SwotAnalysis;
}

pub type SwotFlow = PromptFlow<SwotSpec>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub company_background: String,
    pub products_and_services: String,
    pub target_audience: String,
    pub marketing_strategy: String,
    pub key_differentiators: String,
    pub recent_news: String,
}

impl Contract for DetailedAnalysis {
    fn schema() -> Schema {
        Schema::object("DetailedAnalysis")
            .required("companyBackground", FieldKind::string())
            .describe("A brief history and overview of the competitor.")
            .required("productsAndServices", FieldKind::string())
            .describe("The competitor's main offerings and value proposition.")
            .required("targetAudience", FieldKind::string())
            .describe("The competitor's primary customer base.")
            .required("marketingStrategy", FieldKind::string())
            .describe("The competitor's marketing channels and tactics.")
            .required("keyDifferentiators", FieldKind::string())
            .describe("What makes the competitor unique in the marketplace.")
            .required("recentNews", FieldKind::string())
            .describe("Recent, relevant news or developments.")
    }
}

pub struct DetailedAnalysisSpec;

impl FlowSpec for DetailedAnalysisSpec {
    const NAME: &'static str = "generate-detailed-analysis";
    const TEMPLATE: &'static str = r"You are a strategic marketing expert helping with a competitive analysis for the brand '{{brandNameToAnalyze}}'.

Write a detailed profile of the competitor '{{competitorName}}' from current public information:
- companyBackground: short history and overview.
- productsAndServices: main offerings and value proposition.
- targetAudience: who its primary customers are.
- marketingStrategy: channels, messaging and tactics.
- keyDifferentiators: what sets it apart, including against '{{brandNameToAnalyze}}'.
- recentNews: recent relevant developments.

Answer with JSON matching the required schema.
";

    type Input = CompetitorRef;
    type Output = DetailedAnalysis;
}

pub type DetailedAnalysisFlow = PromptFlow<DetailedAnalysisSpec>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportScoresInput {
    pub executive_summary: String,
}

impl Contract for ReportScoresInput {
    fn schema() -> Schema {
        Schema::object("ReportScoresInput")
            .required("executiveSummary", FieldKind::string())
            .describe("The executive summary of the 4Cs analysis.")
    }
}

pub struct ReportScoresSpec;

impl FlowSpec for ReportScoresSpec {
    const NAME: &'static str = "generate-report-scores";
    const TEMPLATE: &'static str = r"You are a strategic marketing analyst. From the executive summary of a 4Cs analysis below, score Competition, Consumer, Culture and Category out of 10.

A higher score means a stronger position or more favorable conditions. Pair each score with a neutral or positive two-word description, such as 'Strong Position' or 'Growth Market'.

Executive summary:
{{executiveSummary}}

Answer with JSON matching the required schema.
";

    type Input = ReportScoresInput;
    type Output = ReportScores;
}

pub type ReportScoresFlow = PromptFlow<ReportScoresSpec>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn competitor_type_serializes_capitalized() {
        let competitor = Competitor {
            name: "Rival".into(),
            competitor_type: CompetitorType::Substitute,
            market_share: 4.5,
            rating: 3.0,
            strengths: vec![],
            weaknesses: vec![],
        };
        let value = competitor.to_value().unwrap();
        assert_eq!(value["type"], "Substitute");
        assert!(Competitor::schema().is_valid(&value));
    }

    #[test]
    fn rating_is_bounded() {
        let err = Competitor::decode(json!({
            "name": "Rival",
            "type": "Direct",
            "marketShare": 10,
            "rating": 7,
            "strengths": [],
            "weaknesses": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("rating"));
    }

    #[test]
    fn competitor_type_outside_enum_is_rejected() {
        let violations = Competitor::schema()
            .validate(&json!({
                "name": "Rival",
                "type": "Partner",
                "marketShare": 10,
                "rating": 2,
                "strengths": [],
                "weaknesses": []
            }))
            .unwrap_err();
        assert!(violations.at("type").is_some());
    }

    #[test]
    fn report_scores_shape_is_shared_with_4cs() {
        let scores = FourCsAnalysis::schema();
        let nested = scores.field("scores").and_then(|f| f.kind().as_object()).unwrap();
        assert_eq!(nested, &ReportScores::schema());
    }
}
