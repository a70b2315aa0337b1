//! Flow library
//!
//! One module per report family. Each flow is a [`FlowSpec`](crate::FlowSpec)
//! declared next to its records, schemas and prompt template, and exposed as a
//! [`PromptFlow`](crate::PromptFlow) alias.

pub mod category;
pub mod competitive;
pub mod consumer;
pub mod cultural;

use brandscope_schema::{Contract, FieldKind, Schema};
use serde::{Deserialize, Serialize};

/// Brand, business description, industry and an optional focus location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandBrief {
    pub brand_name: String,
    pub description: String,
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl BrandBrief {
    #[must_use]
    pub fn new(
        brand_name: impl Into<String>,
        description: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            brand_name: brand_name.into(),
            description: description.into(),
            industry: industry.into(),
            location: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Same brief without the location
    #[must_use]
    pub fn profile(&self) -> BusinessProfile {
        BusinessProfile {
            brand_name: self.brand_name.clone(),
            description: self.description.clone(),
            industry: self.industry.clone(),
        }
    }
}

impl Contract for BrandBrief {
    fn schema() -> Schema {
        Schema::object("BrandBrief")
            .required("brandName", FieldKind::string())
            .describe("The name of the brand or business to analyze.")
            .required("description", FieldKind::string())
            .describe("A description of the project, business model, and objectives.")
            .required("industry", FieldKind::string())
            .describe("The industry the business operates in.")
            .optional("location", FieldKind::string())
            .describe("Country or city to focus the analysis on.")
    }
}

/// Brand, business description and industry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub brand_name: String,
    pub description: String,
    pub industry: String,
}

impl Contract for BusinessProfile {
    fn schema() -> Schema {
        Schema::object("BusinessProfile")
            .required("brandName", FieldKind::string())
            .describe("The name of the brand or business to analyze.")
            .required("description", FieldKind::string())
            .describe("A description of the project, business model, and objectives.")
            .required("industry", FieldKind::string())
            .describe("The industry the business operates in.")
    }
}

/// Brand and industry only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandIndustry {
    pub brand_name: String,
    pub industry: String,
}

impl BrandIndustry {
    #[must_use]
    pub fn new(brand_name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            brand_name: brand_name.into(),
            industry: industry.into(),
        }
    }
}

impl Contract for BrandIndustry {
    fn schema() -> Schema {
        Schema::object("BrandIndustry")
            .required("brandName", FieldKind::string())
            .describe("The user's brand name for context.")
            .required("industry", FieldKind::string())
            .describe("The industry the business operates in.")
    }
}

/// Schema of a list of `T` records
pub(crate) fn list_of<T: Contract>() -> FieldKind {
    FieldKind::array_of(FieldKind::object(T::schema()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn brief_omits_absent_location() {
        let brief = BrandBrief::new("Acme", "Anvils", "Hardware");
        let value = brief.to_value().unwrap();
        assert_eq!(
            value,
            json!({ "brandName": "Acme", "description": "Anvils", "industry": "Hardware" })
        );
        assert!(BrandBrief::schema().is_valid(&value));
        assert!(BusinessProfile::schema().is_valid(&value));
    }

    #[test]
    fn brief_decodes_with_location() {
        let brief = BrandBrief::decode(json!({
            "brandName": "Acme",
            "description": "Anvils",
            "industry": "Hardware",
            "location": "Arizona"
        }))
        .unwrap();
        assert_eq!(brief.location.as_deref(), Some("Arizona"));
        assert_eq!(brief.profile().brand_name, "Acme");
    }
}
