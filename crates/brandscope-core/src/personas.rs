//! Persona generation
//!
//! One persona per customer segment. Each segment runs its own text and
//! avatar calls; segments run concurrently and are joined in input order.

use crate::error::{EngineError, ResponsePart};
use crate::executor::FlowExecutor;
use crate::flow::{Flow, FlowSpec, PromptFlow};
use crate::flows::consumer::CustomerSegment;
use crate::flows::list_of;
use async_trait::async_trait;
use brandscope_composition::{fan_out, MergeGuard};
use brandscope_schema::{Contract, FieldKind, Schema};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Text part of a persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaDetails {
    pub name: String,
    pub story: String,
    pub goals: Vec<String>,
    pub frustrations: Vec<String>,
    pub segment_name: String,
}

impl Contract for PersonaDetails {
    fn schema() -> Schema {
        Schema::object("PersonaDetails")
            .required("name", FieldKind::string())
            .describe("A realistic full name for the persona.")
            .required("story", FieldKind::string())
            .describe("A short narrative about the persona's life, job and motivations.")
            .required("goals", FieldKind::strings())
            .describe("3-4 goals the persona has.")
            .required("frustrations", FieldKind::strings())
            .describe("3-4 pain points or frustrations.")
            .required("segmentName", FieldKind::string())
            .describe("The name of the segment this persona represents.")
    }
}

pub struct PersonaDetailsSpec;

impl FlowSpec for PersonaDetailsSpec {
    const NAME: &'static str = "generate-persona-details";
    const TEMPLATE: &'static str = r"You are a user research expert. Create a realistic persona for the customer segment below.

Segment: {{name}}
Description: {{description}}
Characteristics:
{{#each characteristics}}
- {{this}}
{{/each}}
Key needs:
{{#each keyNeeds}}
- {{this}}
{{/each}}
Purchase drivers:
{{#each purchaseDrivers}}
- {{this}}
{{/each}}

Give the persona a full name, a short story covering their life, job and motivations, 3-4 goals and 3-4 frustrations. Set segmentName to the segment name above.

Answer with JSON matching the required schema.
";
    const MEDIA_TEMPLATE: Option<&'static str> = Some(
        "Generate a photorealistic, professional headshot of a person matching this description: {{story}}. The person should look friendly and approachable.",
    );

    type Input = CustomerSegment;
    type Output = PersonaDetails;

    fn guard() -> MergeGuard {
        MergeGuard::new().bind_field("segmentName", "name")
    }
}

pub type PersonaDetailsFlow = PromptFlow<PersonaDetailsSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonasInput {
    pub brand_name: String,
    pub industry: String,
    pub customer_segments: Vec<CustomerSegment>,
}

impl Contract for PersonasInput {
    fn schema() -> Schema {
        Schema::object("PersonasInput")
            .required("brandName", FieldKind::string())
            .required("industry", FieldKind::string())
            .required("customerSegments", list_of::<CustomerSegment>())
            .describe("The segments to create personas for, one persona each.")
    }
}

/// A persona with its avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub name: String,
    /// `data:<mime>;base64,<payload>`
    pub avatar_data_uri: String,
    pub story: String,
    pub goals: Vec<String>,
    pub frustrations: Vec<String>,
    pub segment_name: String,
}

impl Persona {
    #[must_use]
    pub fn new(details: PersonaDetails, avatar_data_uri: impl Into<String>) -> Self {
        Self {
            name: details.name,
            avatar_data_uri: avatar_data_uri.into(),
            story: details.story,
            goals: details.goals,
            frustrations: details.frustrations,
            segment_name: details.segment_name,
        }
    }
}

impl Contract for Persona {
    fn schema() -> Schema {
        Schema::object("Persona")
            .required("name", FieldKind::string())
            .required("avatarDataUri", FieldKind::string())
            .describe("Data URI of the generated avatar image.")
            .required("story", FieldKind::string())
            .required("goals", FieldKind::strings())
            .required("frustrations", FieldKind::strings())
            .required("segmentName", FieldKind::string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personas {
    pub personas: Vec<Persona>,
}

impl Contract for Personas {
    fn schema() -> Schema {
        Schema::object("Personas").required("personas", list_of::<Persona>())
    }
}

/// Fans persona details and avatar out across segments
#[derive(Debug)]
pub struct PersonaGenerationFlow {
    details: PersonaDetailsFlow,
}

impl PersonaGenerationFlow {
    pub const NAME: &'static str = "generate-personas";

    /// # Errors
    /// [`EngineError::Template`] if the persona templates fail their check.
    pub fn new(executor: FlowExecutor) -> Result<Self, EngineError> {
        Ok(Self {
            details: PersonaDetailsFlow::new(executor)?,
        })
    }

    async fn persona(&self, index: usize, segment: CustomerSegment) -> Result<Persona, EngineError> {
        let generated = self.details.generate(&segment).await?;
        let avatar = generated.media.ok_or_else(|| EngineError::EmptyResponse {
            flow: PersonaDetailsSpec::NAME.to_string(),
            part: ResponsePart::Media,
        })?;
        debug!(index, segment = %segment.name, "persona ready");
        Ok(Persona::new(generated.output, avatar.url))
    }
}

#[async_trait]
impl Flow for PersonaGenerationFlow {
    type Input = PersonasInput;
    type Output = Personas;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, input: PersonasInput) -> Result<Personas, EngineError> {
        info!(
            flow = Self::NAME,
            brand = %input.brand_name,
            segments = input.customer_segments.len(),
            "generating personas"
        );

        let personas = fan_out(input.customer_segments, |index, segment| {
            self.persona(index, segment)
        })
        .await?;

        info!(flow = Self::NAME, personas = personas.len(), "personas generated");
        Ok(Personas { personas })
    }
}
