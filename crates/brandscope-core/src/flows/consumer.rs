//! Consumer flows: segments, journeys and audience distributions

use super::{list_of, BrandBrief, BrandIndustry};
use crate::flow::{FlowSpec, PromptFlow};
use brandscope_composition::MergeGuard;
use brandscope_schema::{Contract, FieldKind, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerMetrics {
    pub demographics: f64,
    pub psychographics: f64,
    pub behavioral_patterns: f64,
    pub customer_journey: f64,
}

impl Contract for ConsumerMetrics {
    fn schema() -> Schema {
        let progress = || FieldKind::number_in(0.0, 100.0);
        Schema::object("ConsumerMetrics")
            .required("demographics", progress())
            .describe("Progress score for Demographics analysis.")
            .required("psychographics", progress())
            .describe("Progress score for Psychographics analysis.")
            .required("behavioralPatterns", progress())
            .describe("Progress score for Behavioral Patterns analysis.")
            .required("customerJourney", progress())
            .describe("Progress score for Customer Journey analysis.")
    }
}

/// A group of customers with shared needs and drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegment {
    pub name: String,
    pub description: String,
    pub market_size: f64,
    pub characteristics: Vec<String>,
    pub key_needs: Vec<String>,
    pub purchase_drivers: Vec<String>,
    pub media_consumption: Vec<String>,
    pub analysis_confidence: f64,
}

impl Contract for CustomerSegment {
    fn schema() -> Schema {
        Schema::object("CustomerSegment")
            .required("name", FieldKind::string())
            .describe("Descriptive name of the customer segment.")
            .required("description", FieldKind::string())
            .describe("A short description of the customer segment.")
            .required("marketSize", FieldKind::number_in(0.0, 100.0))
            .describe("Estimated market size percentage.")
            .required("characteristics", FieldKind::strings())
            .describe("Key characteristics of the segment.")
            .required("keyNeeds", FieldKind::strings())
            .describe("Key needs or motivations of the segment.")
            .required("purchaseDrivers", FieldKind::strings())
            .describe("Factors that influence purchasing decisions, e.g. Price, Quality.")
            .required("mediaConsumption", FieldKind::strings())
            .describe("Channels where the segment consumes media, e.g. Podcasts.")
            .required("analysisConfidence", FieldKind::number_in(0.0, 100.0))
            .describe("Confidence score in the analysis of this segment.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInsight {
    pub title: String,
    #[serde(rename = "type")]
    pub insight_type: String,
    pub description: String,
    pub value: String,
}

impl Contract for KeyInsight {
    fn schema() -> Schema {
        Schema::object("KeyInsight")
            .required("title", FieldKind::string())
            .required("type", FieldKind::string())
            .describe("Type of insight, e.g. 'Primary Pain Point', 'Price Sensitivity'.")
            .required("description", FieldKind::string())
            .required("value", FieldKind::string())
            .describe("A key metric or value, e.g. '67%', 'Moderate'.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerAnalysis {
    pub top_level_metrics: ConsumerMetrics,
    pub customer_segments: Vec<CustomerSegment>,
    pub key_insights: Vec<KeyInsight>,
}

impl Contract for ConsumerAnalysis {
    fn schema() -> Schema {
        Schema::object("ConsumerAnalysis")
            .required("topLevelMetrics", FieldKind::object(ConsumerMetrics::schema()))
            .required("customerSegments", list_of::<CustomerSegment>())
            .required("keyInsights", list_of::<KeyInsight>())
    }
}

pub struct ConsumerAnalysisSpec;

impl FlowSpec for ConsumerAnalysisSpec {
    const NAME: &'static str = "generate-consumer-analysis";
    const TEMPLATE: &'static str = r"You are a market research and customer experience expert. Analyze the consumers of the business below using the most recent data you can find, ideally from the last 12 months.

Brand: {{brandName}}
Business description: {{description}}
Industry: {{industry}}
{{#if location}}
Focus location: {{location}}
{{/if}}

Instructions:
1. Top-level metrics: a 0-100 confidence score for each of demographics, psychographics, behavioral patterns and customer journey.
2. Customer segments: 2-3 distinct segments{{#if location}} within {{location}}{{/if}}. For each give a name, short description, market size percentage, characteristics, key needs, purchase drivers, media consumption channels and a 0-100 analysis confidence.
3. Key insights: 3-4 actionable insights, each with a title, a type such as 'Primary Pain Point' or 'Price Sensitivity', a short description and a supporting value.

Answer with JSON matching the required schema.
";

    type Input = BrandBrief;
    type Output = ConsumerAnalysis;
}

pub type ConsumerAnalysisFlow = PromptFlow<ConsumerAnalysisSpec>;

/// A segment the user added by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInput {
    pub brand_name: String,
    pub industry: String,
    pub segment_name: String,
    pub segment_description: String,
}

impl Contract for SegmentInput {
    fn schema() -> Schema {
        Schema::object("SegmentInput")
            .required("brandName", FieldKind::string())
            .required("industry", FieldKind::string())
            .required("segmentName", FieldKind::string())
            .describe("The name of the customer segment to analyze.")
            .required("segmentDescription", FieldKind::string())
            .describe("A description of the customer segment.")
    }
}

pub struct AnalyzeCustomerSegmentSpec;

impl FlowSpec for AnalyzeCustomerSegmentSpec {
    const NAME: &'static str = "analyze-customer-segment";
    const TEMPLATE: &'static str = r"You are a market research expert. A user analyzing the brand '{{brandName}}' in the '{{industry}}' industry added a customer segment by hand and needs it researched.

Segment:
- Name: {{segmentName}}
- Description: {{segmentDescription}}

Fill in every field:
- name and description: exactly as given above.
- marketSize: the segment's share of the total market, as a percentage.
- characteristics: demographic and psychographic traits.
- keyNeeds: primary needs and pain points.
- purchaseDrivers: what drives their purchasing decisions.
- mediaConsumption: the media channels they use.
- analysisConfidence: 0-100, how well the available data supports this analysis.

Answer with JSON matching the required schema.
";

    type Input = SegmentInput;
    type Output = CustomerSegment;

    fn guard() -> MergeGuard {
        MergeGuard::new()
            .bind_field("name", "segmentName")
            .bind_field("description", "segmentDescription")
    }
}

pub type AnalyzeCustomerSegmentFlow = PromptFlow<AnalyzeCustomerSegmentSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDiveInput {
    pub brand_name: String,
    pub industry: String,
    pub description: String,
    pub segment: CustomerSegment,
}

impl Contract for DeepDiveInput {
    fn schema() -> Schema {
        Schema::object("DeepDiveInput")
            .required("brandName", FieldKind::string())
            .required("industry", FieldKind::string())
            .required("description", FieldKind::string())
            .required("segment", FieldKind::object(CustomerSegment::schema()))
            .describe("The customer segment to analyze in detail.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDiveAnalysis {
    pub detailed_characteristics: String,
    pub in_depth_key_needs: String,
    pub primary_purchase_drivers: String,
    pub preferred_media_consumption: String,
}

impl Contract for DeepDiveAnalysis {
    fn schema() -> Schema {
        Schema::object("DeepDiveAnalysis")
            .required("detailedCharacteristics", FieldKind::string())
            .describe("The segment's demographics, psychographics, lifestyle and values.")
            .required("inDepthKeyNeeds", FieldKind::string())
            .describe("The segment's core needs, pain points and desires.")
            .required("primaryPurchaseDrivers", FieldKind::string())
            .describe("The most influential factors behind purchasing decisions.")
            .required("preferredMediaConsumption", FieldKind::string())
            .describe("Media habits, including specific platforms, websites or influencers.")
    }
}

pub struct DeepDiveSpec;

impl FlowSpec for DeepDiveSpec {
    const NAME: &'static str = "generate-deep-dive-analysis";
    const TEMPLATE: &'static str = r"You are a market research expert. A user analyzing the brand '{{brandName}}' in the '{{industry}}' industry wants a deep dive into one customer segment.

Business description: {{description}}

Segment:
- Name: {{segment.name}}
- Description: {{segment.description}}
- Characteristics: {{#each segment.characteristics}}- {{this}} {{/each}}
- Key needs: {{#each segment.keyNeeds}}- {{this}} {{/each}}
- Purchase drivers: {{#each segment.purchaseDrivers}}- {{this}} {{/each}}
- Media consumption: {{#each segment.mediaConsumption}}- {{this}} {{/each}}

Research how segments like this behave in the '{{industry}}' industry and expand on:
- detailedCharacteristics: demographics, psychographics, lifestyle and values, beyond the list above.
- inDepthKeyNeeds: what they are really looking for.
- primaryPurchaseDrivers: why they choose one brand over another.
- preferredMediaConsumption: specific platforms, sites, shows or influencers.

Answer with JSON matching the required schema.
";

    type Input = DeepDiveInput;
    type Output = DeepDiveAnalysis;
}

pub type DeepDiveFlow = PromptFlow<DeepDiveSpec>;

/// Name and description of a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub name: String,
    pub description: String,
}

impl Contract for SegmentSummary {
    fn schema() -> Schema {
        Schema::object("SegmentSummary")
            .required("name", FieldKind::string())
            .required("description", FieldKind::string())
    }
}

impl From<&CustomerSegment> for SegmentSummary {
    fn from(segment: &CustomerSegment) -> Self {
        Self {
            name: segment.name.clone(),
            description: segment.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyMapInput {
    pub brand_name: String,
    pub industry: String,
    pub description: String,
    pub segment: SegmentSummary,
}

impl Contract for JourneyMapInput {
    fn schema() -> Schema {
        Schema::object("JourneyMapInput")
            .required("brandName", FieldKind::string())
            .required("industry", FieldKind::string())
            .required("description", FieldKind::string())
            .required("segment", FieldKind::object(SegmentSummary::schema()))
            .describe("The customer segment to create a journey map for.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyStage {
    pub stage: String,
    pub actions: String,
    pub touchpoints: String,
    pub feelings: String,
}

impl Contract for JourneyStage {
    fn schema() -> Schema {
        Schema::object("JourneyStage")
            .required("stage", FieldKind::string())
            .describe("The name of the stage, e.g. 'Awareness'.")
            .required("actions", FieldKind::string())
            .required("touchpoints", FieldKind::string())
            .required("feelings", FieldKind::string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyMap {
    pub stages: Vec<JourneyStage>,
}

impl Contract for JourneyMap {
    fn schema() -> Schema {
        Schema::object("JourneyMap")
            .required("stages", list_of::<JourneyStage>())
            .describe("The stages of the customer journey, in order.")
    }
}

pub struct JourneyMapSpec;

impl FlowSpec for JourneyMapSpec {
    const NAME: &'static str = "generate-journey-map";
    const TEMPLATE: &'static str = r"You are a customer experience strategist. A user analyzing the brand '{{brandName}}' in the '{{industry}}' industry needs a customer journey map for one segment.

Segment:
- Name: {{segment.name}}
- Description: {{segment.description}}

Business description: {{description}}

Map five stages: Awareness, Consideration, Purchase, Service and Loyalty. For each give:
- stage: the stage name.
- actions: what the customer does, e.g. 'Comparing prices'.
- touchpoints: where they meet this or similar brands, e.g. 'Company website'.
- feelings: their likely emotions, e.g. 'Overwhelmed by choices'.

Answer with a JSON object whose 'stages' array holds one entry per stage.
";

    type Input = JourneyMapInput;
    type Output = JourneyMap;
}

pub type JourneyMapFlow = PromptFlow<JourneyMapSpec>;

/// Schema of a list of `{label, percentage}` buckets
fn shares(schema: &str, label: &str) -> FieldKind {
    FieldKind::array_of(FieldKind::object(
        Schema::object(schema)
            .required(label, FieldKind::string())
            .required("percentage", FieldKind::number()),
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeShare {
    pub range: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderShare {
    pub gender: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeShare {
    pub level: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShare {
    pub location: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age_distribution: Vec<AgeShare>,
    pub gender_distribution: Vec<GenderShare>,
    pub income_distribution: Vec<IncomeShare>,
    pub location_distribution: Vec<LocationShare>,
}

impl Contract for Demographics {
    fn schema() -> Schema {
        Schema::object("Demographics")
            .required("ageDistribution", shares("AgeShare", "range"))
            .describe("Consumers by age range, e.g. \"18-24\".")
            .required("genderDistribution", shares("GenderShare", "gender"))
            .required("incomeDistribution", shares("IncomeShare", "level"))
            .describe("Consumers by income level, e.g. \"$50K - $100K\".")
            .required("locationDistribution", shares("LocationShare", "location"))
            .describe("Consumers by country or region.")
    }
}

pub struct DemographicsSpec;

impl FlowSpec for DemographicsSpec {
    const NAME: &'static str = "generate-demographics";
    const TEMPLATE: &'static str = r"You are a market research expert. Estimate the customer demographics for the brand '{{brandName}}' in the '{{industry}}' industry, based on current market research, surveys and reports.

Percentages within each distribution must sum to 100.
- ageDistribution: 5-6 age ranges, e.g. 18-24, 25-34.
- genderDistribution: male, female and other.
- incomeDistribution: 4-5 household income levels.
- locationDistribution: the top 4-5 countries or regions.

Answer with JSON matching the required schema.
";

    type Input = BrandIndustry;
    type Output = Demographics;
}

pub type DemographicsFlow = PromptFlow<DemographicsSpec>;

/// Named value with a score or percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScore {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedShare {
    pub name: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitScore {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Psychographics {
    pub value_distribution: Vec<NamedScore>,
    pub interest_distribution: Vec<NamedShare>,
    pub lifestyle_distribution: Vec<NamedShare>,
    pub personality_distribution: Vec<TraitScore>,
}

impl Contract for Psychographics {
    fn schema() -> Schema {
        let named_score = Schema::object("ValueScore")
            .required("name", FieldKind::string())
            .required("score", FieldKind::number())
            .describe("Importance score for this value (0-100).");
        let personality = Schema::object("TraitScore")
            .required("trait", FieldKind::string())
            .describe("A Big Five trait.")
            .required("score", FieldKind::number_in(0.0, 100.0));

        Schema::object("Psychographics")
            .required("valueDistribution", FieldKind::array_of(FieldKind::object(named_score)))
            .describe("5-6 core values.")
            .required("interestDistribution", shares("InterestShare", "name"))
            .describe("5-6 key interests.")
            .required("lifestyleDistribution", shares("LifestyleShare", "name"))
            .describe("4-5 common lifestyles.")
            .required("personalityDistribution", FieldKind::array_of(FieldKind::object(personality)))
            .describe("All five Big Five traits.")
    }
}

pub struct PsychographicsSpec;

impl FlowSpec for PsychographicsSpec {
    const NAME: &'static str = "generate-psychographics";
    const TEMPLATE: &'static str = r"You are a market research expert in consumer psychology. Estimate the psychographics of consumers for the brand '{{brandName}}' in the '{{industry}}' industry, based on current research.

- valueDistribution: 5-6 core values, e.g. Security or Achievement, each with a 0-100 importance score.
- interestDistribution: 5-6 interests with the percentage of consumers sharing each; these need not sum to 100.
- lifestyleDistribution: 4-5 lifestyles with percentages summing to 100.
- personalityDistribution: all five Big Five traits (Openness, Conscientiousness, Extraversion, Agreeableness, Neuroticism), each with an average 0-100 score.

Answer with JSON matching the required schema.
";

    type Input = BrandIndustry;
    type Output = Psychographics;
}

pub type PsychographicsFlow = PromptFlow<PsychographicsSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub name: String,
    pub value: f64,
}

impl Contract for Distribution {
    fn schema() -> Schema {
        Schema::object("Distribution")
            .required("name", FieldKind::string())
            .required("value", FieldKind::number())
            .describe("The value or percentage for this item.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseBehavior {
    pub frequency: Vec<Distribution>,
    pub channels: Vec<Distribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralPatterns {
    pub purchase_behavior: PurchaseBehavior,
    pub brand_interactions: Vec<Distribution>,
    pub usage_patterns: Vec<Distribution>,
}

impl Contract for BehavioralPatterns {
    fn schema() -> Schema {
        let purchase = Schema::object("PurchaseBehavior")
            .required("frequency", list_of::<Distribution>())
            .describe("How often consumers purchase; sums to 100.")
            .required("channels", list_of::<Distribution>())
            .describe("Where consumers purchase; sums to 100.");

        Schema::object("BehavioralPatterns")
            .required("purchaseBehavior", FieldKind::object(purchase))
            .required("brandInteractions", list_of::<Distribution>())
            .required("usagePatterns", list_of::<Distribution>())
    }
}

pub struct BehavioralPatternsSpec;

impl FlowSpec for BehavioralPatternsSpec {
    const NAME: &'static str = "generate-behavioral-patterns";
    const TEMPLATE: &'static str = r"You are a market research expert in consumer behavior. Estimate the behavioral patterns of consumers for the brand '{{brandName}}' in the '{{industry}}' industry, based on current research.

- purchaseBehavior.frequency: 3-4 purchase frequencies, percentages summing to 100.
- purchaseBehavior.channels: 3-4 purchase channels, percentages summing to 100.
- brandInteractions: 4-5 ways customers interact with brands, with percentages that need not sum to 100.
- usagePatterns: 4-5 usage patterns, percentages summing to 100.

Answer with JSON matching the required schema.
";

    type Input = BrandIndustry;
    type Output = BehavioralPatterns;
}

pub type BehavioralPatternsFlow = PromptFlow<BehavioralPatternsSpec>;

#[cfg(test)]
mod tests {
    use super::*;
    use brandscope_template::Template;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn segment() -> CustomerSegment {
        CustomerSegment {
            name: "Urban Parents".into(),
            description: "Busy parents in cities".into(),
            market_size: 35.0,
            characteristics: vec!["Time-poor".into(), "Digital natives".into()],
            key_needs: vec!["Convenience".into()],
            purchase_drivers: vec!["Price".into(), "Speed".into()],
            media_consumption: vec!["Podcasts".into()],
            analysis_confidence: 80.0,
        }
    }

    #[test]
    fn deep_dive_lists_segment_traits_inline() {
        let template = Template::compile(DeepDiveSpec::TEMPLATE, &DeepDiveInput::schema()).unwrap();
        let input = DeepDiveInput {
            brand_name: "Acme".into(),
            industry: "Meal kits".into(),
            description: "Weekly boxes".into(),
            segment: segment(),
        };
        let prompt = template.render(&input.to_value().unwrap());
        assert!(prompt.contains("- Characteristics: - Time-poor - Digital natives \n"));
        assert!(prompt.contains("- Purchase drivers: - Price - Speed \n"));
    }

    #[test]
    fn personality_scores_are_bounded() {
        let err = Psychographics::schema()
            .validate(&json!({
                "valueDistribution": [],
                "interestDistribution": [],
                "lifestyleDistribution": [],
                "personalityDistribution": [{ "trait": "Openness", "score": 130 }]
            }))
            .unwrap_err();
        assert!(err.at("personalityDistribution[0].score").is_some());
    }

    #[test]
    fn segment_summary_from_segment() {
        assert_eq!(
            SegmentSummary::from(&segment()),
            SegmentSummary {
                name: "Urban Parents".into(),
                description: "Busy parents in cities".into()
            }
        );
    }

    #[test]
    fn key_insight_type_field() {
        let insight = KeyInsight::decode(json!({
            "title": "Price matters",
            "type": "Price Sensitivity",
            "description": "Most compare prices",
            "value": "67%"
        }))
        .unwrap();
        assert_eq!(insight.insight_type, "Price Sensitivity");
    }
}
