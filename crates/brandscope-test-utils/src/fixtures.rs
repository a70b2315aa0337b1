//! Schema-valid model outputs for the flow library

use serde_json::{json, Value};

/// Output of `generate-4cs-analysis` with two competitors
pub fn four_cs_analysis() -> Value {
    json!({
        "competition": [
            {
                "name": "Roadrunner Supply",
                "type": "Direct",
                "marketShare": 25,
                "rating": 4,
                "strengths": ["Speed", "Brand recognition"],
                "weaknesses": ["Price"]
            },
            {
                "name": "Coyote Hardware",
                "type": "Indirect",
                "marketShare": 10.5,
                "rating": 3.5,
                "strengths": ["Catalog breadth"],
                "weaknesses": ["Reliability", "Support"]
            }
        ],
        "culture": "Desert communities value durable, self-reliant tools.",
        "consumer": "Hobbyists and small workshops buying online.",
        "category": "Heavy hand tools, growing slowly with steady replacement demand.",
        "executiveSummary": {
            "keyFindings": {
                "marketOpportunities": "Online direct sales are underserved.",
                "competitivePositions": "Second tier behind Roadrunner Supply.",
                "culturalAlignment": "Strong fit with a do-it-yourself culture.",
                "targetMarket": "Small workshops in the Southwest."
            },
            "strategicRecommendations": {
                "highPriority": ["Launch a direct web store"],
                "mediumPriority": ["Partner with maker spaces"],
                "lowPriority": ["Explore export markets"]
            }
        },
        "scores": {
            "competition": { "score": 6, "description": "Crowded Field" },
            "consumer": { "score": 7, "description": "Loyal Buyers" },
            "culture": { "score": 8, "description": "Strong Fit" },
            "category": { "score": 5, "description": "Mature Market" }
        }
    })
}

/// Output of `prioritize-actionable-insights`
pub fn prioritized_actions() -> Value {
    json!({
        "highPriorityActions": "Launch a direct web store within the quarter.",
        "mediumPriorityActions": "Build partnerships with maker spaces.",
        "lowPriorityActions": "Evaluate export markets next year."
    })
}

/// Output of `generate-category-analysis`
pub fn category_analysis() -> Value {
    json!({
        "topLevelMetrics": {
            "marketSize": "$12.5B",
            "marketSizeChange": "+15%",
            "isMarketSizeEstimated": true,
            "growthRate": "8.5%",
            "activePlayers": 120,
            "marketConcentration": "Moderate",
            "marketConcentrationDescription": "A few leaders and a long tail of small makers."
        },
        "marketSegments": [
            { "name": "Professional", "revenue": "$7.1B", "growthRate": 6, "marketShare": 57, "trend": "stable" },
            { "name": "Hobbyist", "revenue": "$5.4B", "growthRate": 12.5, "marketShare": 43, "trend": "up" }
        ],
        "categoryHealth": {
            "overallAssessment": "Healthy",
            "growthPotential": "Moderate",
            "competitionLevel": "High",
            "barriersToEntry": "Low"
        },
        "demandDrivers": [
            { "name": "Home renovation", "description": "More owners doing their own work", "impact": "High Impact", "trend": "up" }
        ]
    })
}

/// Output of `generate-category-insights`
pub fn category_insights() -> Value {
    json!({
        "insights": [
            {
                "title": "Court the hobbyist",
                "description": "Hobbyists grow twice as fast as professionals.",
                "relatedDataPoint": "Hobbyist segment"
            }
        ]
    })
}

/// Output of `generate-cultural-analysis`
pub fn cultural_analysis() -> Value {
    json!({
        "prevailingTrends": [{
            "trend": "Repair culture",
            "description": "Fixing instead of replacing",
            "alignment": "Strong Alignment",
            "relevance": "High Relevance",
            "impact": 74
        }],
        "coreValues": [{
            "value": "Self-reliance",
            "description": "Doing it yourself",
            "strength": "Strong",
            "importance": 82
        }],
        "culturalOpportunities": [{
            "opportunity": "Repair workshops",
            "description": "Teach repairs in store",
            "potential": "High Potential",
            "difficulty": "Low Difficulty"
        }],
        "culturalFitScore": {
            "overallScore": 78,
            "brandAlignment": "Strong",
            "culturalRelevance": "High",
            "trendAdaptation": "Moderate"
        },
        "regionalInsights": [{ "region": "Southwest", "score": 8.5 }]
    })
}

/// Output of `generate-cultural-insights`
pub fn cultural_insights() -> Value {
    json!({
        "insights": [
            {
                "title": "Own the repair moment",
                "description": "Position tools as the way to keep things running.",
                "relatedTrendOrValue": "Repair culture"
            }
        ]
    })
}

/// A customer segment named `name`
pub fn customer_segment(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} buying tools online"),
        "marketSize": 30,
        "characteristics": ["Hands-on", "Budget aware"],
        "keyNeeds": ["Durability"],
        "purchaseDrivers": ["Price", "Reviews"],
        "mediaConsumption": ["Video tutorials"],
        "analysisConfidence": 75
    })
}

/// Output of the persona details step, for a persona named `name`
pub fn persona_details(name: &str) -> Value {
    json!({
        "name": name,
        "story": format!("{name} restores old furniture on weekends."),
        "goals": ["Finish projects faster"],
        "frustrations": ["Tools that break"],
        "segmentName": "unknown"
    })
}
