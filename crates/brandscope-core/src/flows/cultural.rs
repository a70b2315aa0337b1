//! Cultural flows: trends, values, opportunities and fit

use super::{list_of, BrandBrief, BrandIndustry};
use crate::flow::{FlowSpec, PromptFlow};
use brandscope_schema::{Contract, FieldKind, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalTrend {
    pub trend: String,
    pub description: String,
    /// `Strong Alignment`, `Moderate Alignment` or `Weak Alignment`
    pub alignment: String,
    /// `High Relevance`, `Medium Relevance` or `Low Relevance`
    pub relevance: String,
    pub impact: f64,
}

impl Contract for CulturalTrend {
    fn schema() -> Schema {
        Schema::object("CulturalTrend")
            .required("trend", FieldKind::string())
            .required("description", FieldKind::string())
            .required(
                "alignment",
                FieldKind::one_of(["Strong Alignment", "Moderate Alignment", "Weak Alignment"]),
            )
            .describe("How well the brand aligns with this trend.")
            .required(
                "relevance",
                FieldKind::one_of(["High Relevance", "Medium Relevance", "Low Relevance"]),
            )
            .required("impact", FieldKind::number_in(0.0, 100.0))
            .describe("Impact score of the trend on the brand.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreValue {
    pub value: String,
    pub description: String,
    pub strength: String,
    pub importance: f64,
}

impl Contract for CoreValue {
    fn schema() -> Schema {
        Schema::object("CoreValue")
            .required("value", FieldKind::string())
            .required("description", FieldKind::string())
            .required("strength", FieldKind::one_of(["Strong", "Moderate", "Weak"]))
            .describe("How strongly the value is held by the culture.")
            .required("importance", FieldKind::number_in(0.0, 100.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalOpportunity {
    pub opportunity: String,
    pub description: String,
    pub potential: String,
    pub difficulty: String,
}

impl Contract for CulturalOpportunity {
    fn schema() -> Schema {
        Schema::object("CulturalOpportunity")
            .required("opportunity", FieldKind::string())
            .required("description", FieldKind::string())
            .required(
                "potential",
                FieldKind::one_of(["High Potential", "Medium Potential", "Low Potential"]),
            )
            .required(
                "difficulty",
                FieldKind::one_of(["High Difficulty", "Medium Difficulty", "Low Difficulty"]),
            )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalFitScore {
    pub overall_score: f64,
    pub brand_alignment: String,
    pub cultural_relevance: String,
    pub trend_adaptation: String,
}

impl Contract for CulturalFitScore {
    fn schema() -> Schema {
        Schema::object("CulturalFitScore")
            .required("overallScore", FieldKind::number_in(0.0, 100.0))
            .describe("Overall cultural fit score.")
            .required("brandAlignment", FieldKind::one_of(["Strong", "Moderate", "Weak"]))
            .required("culturalRelevance", FieldKind::one_of(["High", "Moderate", "Low"]))
            .required("trendAdaptation", FieldKind::one_of(["High", "Moderate", "Low"]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalInsight {
    pub region: String,
    pub score: f64,
}

impl Contract for RegionalInsight {
    fn schema() -> Schema {
        Schema::object("RegionalInsight")
            .required("region", FieldKind::string())
            .required("score", FieldKind::number_in(0.0, 10.0))
            .describe("Cultural alignment score for the region, out of 10.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalAnalysis {
    pub prevailing_trends: Vec<CulturalTrend>,
    pub core_values: Vec<CoreValue>,
    pub cultural_opportunities: Vec<CulturalOpportunity>,
    pub cultural_fit_score: CulturalFitScore,
    pub regional_insights: Vec<RegionalInsight>,
}

impl Contract for CulturalAnalysis {
    fn schema() -> Schema {
        Schema::object("CulturalAnalysis")
            .required("prevailingTrends", list_of::<CulturalTrend>())
            .describe("3-4 cultural trends relevant to the brand.")
            .required("coreValues", list_of::<CoreValue>())
            .describe("3-4 core values of the target culture.")
            .required("culturalOpportunities", list_of::<CulturalOpportunity>())
            .required("culturalFitScore", FieldKind::object(CulturalFitScore::schema()))
            .required("regionalInsights", list_of::<RegionalInsight>())
            .describe("3-4 regions with their cultural alignment scores.")
    }
}

pub struct CulturalAnalysisSpec;

impl FlowSpec for CulturalAnalysisSpec {
    const NAME: &'static str = "generate-cultural-analysis";
    const TEMPLATE: &'static str = r"You are a cultural strategist and anthropologist. Analyze the cultural landscape around the business below, using recent sources.

Brand: {{brandName}}
Business description: {{description}}
Industry: {{industry}}
{{#if location}}
Focus location: {{location}}
{{/if}}

Instructions:
1. prevailingTrends: 3-4 cultural trends relevant to the brand{{#if location}} in {{location}}{{/if}}, each with alignment, relevance and a 0-100 impact score.
2. coreValues: 3-4 core values of the target culture, each with strength and a 0-100 importance score.
3. culturalOpportunities: 2-3 opportunities for the brand, each with potential and difficulty.
4. culturalFitScore: an overall 0-100 fit score with brand alignment, cultural relevance and trend adaptation ratings.
5. regionalInsights: 3-4 regions with a 0-10 cultural alignment score.

Answer with JSON matching the required schema.
";

    type Input = BrandBrief;
    type Output = CulturalAnalysis;
}

pub type CulturalAnalysisFlow = PromptFlow<CulturalAnalysisSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalInsightsInput {
    pub analysis: CulturalAnalysis,
}

impl Contract for CulturalInsightsInput {
    fn schema() -> Schema {
        Schema::object("CulturalInsightsInput")
            .required("analysis", FieldKind::object(CulturalAnalysis::schema()))
            .describe("The full cultural analysis output.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalInsight {
    pub title: String,
    pub description: String,
    pub related_trend_or_value: String,
}

impl Contract for CulturalInsight {
    fn schema() -> Schema {
        Schema::object("CulturalInsight")
            .required("title", FieldKind::string())
            .required("description", FieldKind::string())
            .required("relatedTrendOrValue", FieldKind::string())
            .describe("The trend or core value the insight is based on.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalInsights {
    pub insights: Vec<CulturalInsight>,
}

impl Contract for CulturalInsights {
    fn schema() -> Schema {
        Schema::object("CulturalInsights").required("insights", list_of::<CulturalInsight>())
    }
}

pub struct CulturalInsightsSpec;

impl FlowSpec for CulturalInsightsSpec {
    const NAME: &'static str = "generate-cultural-insights";
    const TEMPLATE: &'static str = r"You are a cultural strategist. From the cultural analysis below, derive 3-4 actionable insights. Give each a title, a short description and the trend or core value it relates to.

Prevailing trends:
{{#each analysis.prevailingTrends}}
- {{this.trend}} ({{this.alignment}}, {{this.relevance}}): {{this.description}}
{{/each}}
Core values:
{{#each analysis.coreValues}}
- {{this.value}} ({{this.strength}}): {{this.description}}
{{/each}}
Opportunities:
{{#each analysis.culturalOpportunities}}
- {{this.opportunity}} ({{this.potential}}, {{this.difficulty}})
{{/each}}
Cultural fit: {{analysis.culturalFitScore.overallScore}}/100

Answer with JSON matching the required schema.
";

    type Input = CulturalInsightsInput;
    type Output = CulturalInsights;
}

pub type CulturalInsightsFlow = PromptFlow<CulturalInsightsSpec>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalVariation {
    pub region: String,
    pub nuance: String,
}

impl Contract for RegionalVariation {
    fn schema() -> Schema {
        Schema::object("RegionalVariation")
            .required("region", FieldKind::string())
            .required("nuance", FieldKind::string())
            .describe("How the trend shows up differently in this region.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalTrend {
    pub name: String,
    pub description: String,
    pub impact_on_industry: String,
    pub regional_variations: Vec<RegionalVariation>,
    pub opportunity_score: f64,
}

impl Contract for GlobalTrend {
    fn schema() -> Schema {
        Schema::object("GlobalTrend")
            .required("name", FieldKind::string())
            .required("description", FieldKind::string())
            .required("impactOnIndustry", FieldKind::string())
            .required("regionalVariations", list_of::<RegionalVariation>())
            .required("opportunityScore", FieldKind::number_in(1.0, 10.0))
            .describe("How much opportunity the trend holds for the brand, 1-10.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalTrends {
    pub trends: Vec<GlobalTrend>,
}

impl Contract for GlobalTrends {
    fn schema() -> Schema {
        Schema::object("GlobalTrends").required("trends", list_of::<GlobalTrend>())
    }
}

pub struct GlobalTrendsSpec;

impl FlowSpec for GlobalTrendsSpec {
    const NAME: &'static str = "generate-global-trends";
    const TEMPLATE: &'static str = r"You are a global trend forecaster. Identify 3-4 global cultural and consumer trends that matter for '{{brandName}}' in the '{{industry}}' industry.

For each trend give a name, a description, its impact on the industry, 2-3 regional variations and a 1-10 opportunity score for the brand.

Answer with JSON matching the required schema.
";

    type Input = BrandIndustry;
    type Output = GlobalTrends;
}

pub type GlobalTrendsFlow = PromptFlow<GlobalTrendsSpec>;

#[cfg(test)]
mod tests {
    use super::*;
    use brandscope_template::Template;
    use serde_json::json;

    fn analysis() -> serde_json::Value {
        json!({
            "prevailingTrends": [{
                "trend": "Slow living",
                "description": "Fewer, better things",
                "alignment": "Strong Alignment",
                "relevance": "High Relevance",
                "impact": 72
            }],
            "coreValues": [{
                "value": "Craft",
                "description": "Respect for handmade goods",
                "strength": "Strong",
                "importance": 80
            }],
            "culturalOpportunities": [{
                "opportunity": "Workshops",
                "description": "Teach the craft",
                "potential": "High Potential",
                "difficulty": "Low Difficulty"
            }],
            "culturalFitScore": {
                "overallScore": 78,
                "brandAlignment": "Strong",
                "culturalRelevance": "High",
                "trendAdaptation": "Moderate"
            },
            "regionalInsights": [{ "region": "Kyoto", "score": 8.5 }]
        })
    }

    #[test]
    fn analysis_fixture_is_valid() {
        assert!(CulturalAnalysis::decode(analysis()).is_ok());
    }

    #[test]
    fn alignment_labels_are_enumerated() {
        let mut value = analysis();
        value["prevailingTrends"][0]["alignment"] = json!("Strong");
        let err = CulturalAnalysis::schema().validate(&value).unwrap_err();
        assert!(err.at("prevailingTrends[0].alignment").is_some());
    }

    #[test]
    fn regional_score_is_out_of_ten() {
        let mut value = analysis();
        value["regionalInsights"][0]["score"] = json!(85);
        assert!(!CulturalAnalysis::schema().is_valid(&value));
    }

    #[test]
    fn insights_prompt_walks_analysis() {
        let template =
            Template::compile(CulturalInsightsSpec::TEMPLATE, &CulturalInsightsInput::schema()).unwrap();
        let prompt = template.render(&json!({ "analysis": analysis() }));
        assert!(prompt.contains("- Slow living (Strong Alignment, High Relevance): Fewer, better things\n"));
        assert!(prompt.contains("- Workshops (High Potential, Low Difficulty)\n"));
        assert!(prompt.contains("Cultural fit: 78/100"));
    }
}
