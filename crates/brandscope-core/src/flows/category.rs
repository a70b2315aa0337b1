//! Category flows: market size, segments, health and demand drivers

use super::{list_of, BusinessProfile};
use crate::flow::{FlowSpec, PromptFlow};
use brandscope_schema::{Contract, FieldKind, Schema};
use serde::{Deserialize, Serialize};

const LEVELS: [&str; 3] = ["High", "Moderate", "Low"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetrics {
    pub market_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_size_change: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_market_size_estimated: Option<bool>,
    pub growth_rate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate_change: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_growth_rate_estimated: Option<bool>,
    pub active_players: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_players_change: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active_players_estimated: Option<bool>,
    pub market_concentration: String,
    pub market_concentration_description: String,
}

impl Contract for CategoryMetrics {
    fn schema() -> Schema {
        Schema::object("CategoryMetrics")
            .required("marketSize", FieldKind::string())
            .describe("The total market size, e.g. \"$12.5B\".")
            .optional("marketSizeChange", FieldKind::string())
            .describe("Recent percentage change in market size, e.g. \"+15%\".")
            .optional("isMarketSizeEstimated", FieldKind::boolean())
            .describe("True if the market size is an estimate or not from the current year.")
            .required("growthRate", FieldKind::string())
            .describe("The overall market growth rate, e.g. \"8.5%\".")
            .optional("growthRateChange", FieldKind::string())
            .describe("Recent change in growth rate, e.g. \"+2.1%\".")
            .optional("isGrowthRateEstimated", FieldKind::boolean())
            .describe("True if the growth rate is an estimate or not from the current year.")
            .required("activePlayers", FieldKind::number())
            .describe("The number of active players in the market.")
            .optional("activePlayersChange", FieldKind::string())
            .describe("Recent change in the number of active players, e.g. \"+12\".")
            .optional("isActivePlayersEstimated", FieldKind::boolean())
            .describe("True if the number of active players is an estimate.")
            .required("marketConcentration", FieldKind::string())
            .describe("The level of market concentration, e.g. \"Moderate\".")
            .required("marketConcentrationDescription", FieldKind::string())
            .describe("One sentence explaining the market concentration.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSegment {
    pub name: String,
    pub revenue: String,
    pub growth_rate: f64,
    pub market_share: f64,
    /// `up`, `down` or `stable`
    pub trend: String,
}

impl Contract for MarketSegment {
    fn schema() -> Schema {
        Schema::object("MarketSegment")
            .required("name", FieldKind::string())
            .describe("Descriptive name of the market segment.")
            .required("revenue", FieldKind::string())
            .describe("Estimated revenue for the segment, e.g. \"$5.6B\".")
            .required("growthRate", FieldKind::number())
            .describe("Growth rate of the segment as a percentage.")
            .required("marketShare", FieldKind::number())
            .describe("Market share of the segment as a percentage.")
            .required("trend", FieldKind::one_of(["up", "down", "stable"]))
            .describe("The recent trend of the segment.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHealth {
    pub overall_assessment: String,
    pub growth_potential: String,
    pub competition_level: String,
    pub barriers_to_entry: String,
}

impl Contract for CategoryHealth {
    fn schema() -> Schema {
        Schema::object("CategoryHealth")
            .required("overallAssessment", FieldKind::string())
            .describe("Overall assessment of the category's health, e.g. \"Healthy\".")
            .required("growthPotential", FieldKind::one_of(LEVELS))
            .required("competitionLevel", FieldKind::one_of(LEVELS))
            .required("barriersToEntry", FieldKind::one_of(LEVELS))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandDriver {
    pub name: String,
    pub description: String,
    pub impact: String,
    pub trend: String,
}

impl Contract for DemandDriver {
    fn schema() -> Schema {
        Schema::object("DemandDriver")
            .required("name", FieldKind::string())
            .required("description", FieldKind::string())
            .required(
                "impact",
                FieldKind::one_of(["High Impact", "Medium Impact", "Low Impact"]),
            )
            .required("trend", FieldKind::one_of(["up", "down"]))
            .describe("The trend of the driver's influence.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub top_level_metrics: CategoryMetrics,
    pub market_segments: Vec<MarketSegment>,
    pub category_health: CategoryHealth,
    pub demand_drivers: Vec<DemandDriver>,
}

impl Contract for CategoryAnalysis {
    fn schema() -> Schema {
        Schema::object("CategoryAnalysis")
            .required("topLevelMetrics", FieldKind::object(CategoryMetrics::schema()))
            .required("marketSegments", list_of::<MarketSegment>())
            .required("categoryHealth", FieldKind::object(CategoryHealth::schema()))
            .required("demandDrivers", list_of::<DemandDriver>())
    }
}

pub struct CategoryAnalysisSpec;

impl FlowSpec for CategoryAnalysisSpec {
    const NAME: &'static str = "generate-category-analysis";
    const TEMPLATE: &'static str = r"You are a market research expert who specializes in category analysis. Analyze the market category of the business below using the most recent data you can find.

Brand: {{brandName}}
Business description: {{description}}
Industry: {{industry}}

Instructions:
1. Top-level metrics: marketSize, growthRate, activePlayers, marketConcentration and a one-sentence marketConcentrationDescription. When a figure is an estimate or not from the current year, set the matching isMarketSizeEstimated, isGrowthRateEstimated or isActivePlayersEstimated flag to true.
2. Market segments: 4-5 key segments, each with name, revenue, growth rate, market share and trend (up, down or stable).
3. Category health: an overall assessment, plus growth potential, competition level and barriers to entry as High, Moderate or Low.
4. Demand drivers: 3-4 drivers with description, impact (High Impact, Medium Impact or Low Impact) and trend (up or down).

Answer with JSON matching the required schema.
";

    type Input = BusinessProfile;
    type Output = CategoryAnalysis;
}

pub type CategoryAnalysisFlow = PromptFlow<CategoryAnalysisSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInsightsInput {
    pub analysis: CategoryAnalysis,
}

impl Contract for CategoryInsightsInput {
    fn schema() -> Schema {
        Schema::object("CategoryInsightsInput")
            .required("analysis", FieldKind::object(CategoryAnalysis::schema()))
            .describe("The full category analysis output.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInsight {
    pub title: String,
    pub description: String,
    pub related_data_point: String,
}

impl Contract for CategoryInsight {
    fn schema() -> Schema {
        Schema::object("CategoryInsight")
            .required("title", FieldKind::string())
            .required("description", FieldKind::string())
            .describe("A short, actionable description of the insight.")
            .required("relatedDataPoint", FieldKind::string())
            .describe("The market segment, demand driver or metric the insight relates to.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInsights {
    pub insights: Vec<CategoryInsight>,
}

impl Contract for CategoryInsights {
    fn schema() -> Schema {
        Schema::object("CategoryInsights")
            .required("insights", list_of::<CategoryInsight>())
            .describe("A list of 3-4 strategic insights.")
    }
}

pub struct CategoryInsightsSpec;

impl FlowSpec for CategoryInsightsSpec {
    const NAME: &'static str = "generate-category-insights";
    const TEMPLATE: &'static str = r"You are a strategic market analyst. From the category analysis below, derive 3-4 concise, actionable insights. Give each a title, a short description and the data point it relates to (a market segment, demand driver or health metric).

Top-level metrics:
- Market size: {{analysis.topLevelMetrics.marketSize}}{{#if analysis.topLevelMetrics.marketSizeChange}} ({{analysis.topLevelMetrics.marketSizeChange}}){{/if}}
- Growth rate: {{analysis.topLevelMetrics.growthRate}}{{#if analysis.topLevelMetrics.growthRateChange}} ({{analysis.topLevelMetrics.growthRateChange}}){{/if}}
Market segments:
{{#each analysis.marketSegments}}
- {{this.name}}: revenue {{this.revenue}}, growth {{this.growthRate}}%
{{/each}}
Category health:
- Overall: {{analysis.categoryHealth.overallAssessment}}
- Growth potential: {{analysis.categoryHealth.growthPotential}}
- Competition: {{analysis.categoryHealth.competitionLevel}}
Demand drivers:
{{#each analysis.demandDrivers}}
- {{this.name}}: impact {{this.impact}}, trend {{this.trend}}
{{/each}}

Answer with JSON matching the required schema.
";

    type Input = CategoryInsightsInput;
    type Output = CategoryInsights;
}

pub type CategoryInsightsFlow = PromptFlow<CategoryInsightsSpec>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketResearch {
    pub summary: String,
}

impl Contract for MarketResearch {
    fn schema() -> Schema {
        Schema::object("MarketResearch")
            .required("summary", FieldKind::string())
            .describe("Market size and trends, consumer behavior and competitive environment in a few paragraphs.")
    }
}

pub struct MarketResearchSpec;

impl FlowSpec for MarketResearchSpec {
    const NAME: &'static str = "generate-market-research";
    const TEMPLATE: &'static str = r"You are a market research analyst. Write a short, high-level summary of the category in which '{{brandName}}' operates, in the '{{industry}}' industry.

Business description: {{description}}

Cover the category's definition and scope, market size and growth, the most significant segments and the main demand drivers. Keep it to a few paragraphs.

Answer with JSON matching the required schema.
";

    type Input = BusinessProfile;
    type Output = MarketResearch;
}

pub type MarketResearchFlow = PromptFlow<MarketResearchSpec>;
