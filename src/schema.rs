//! Response schema sent to the provider
//!
//! The field list mirrors `AdviceResult`. It is rendered into the
//! provider's JSON schema dialect and also drives the required-field
//! check in the parser.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    /// Whole number within `min..=max`.
    Integer { min: i64, max: i64 },
    Boolean,
    /// String restricted to the listed values.
    Enum(&'static [&'static str]),
    StringList,
    ObjectList(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind, required: true }
}

pub const RISK_LEVELS: &[&str] = &["Low", "Medium", "High"];
pub const HEALTH_STATUSES: &[&str] = &["Good", "Average", "Risky"];
pub const HEALTH_SCORE_RANGE: (i64, i64) = (0, 100);

const GOAL_FEASIBILITY_FIELDS: &[FieldSpec] = &[
    required("goalName", FieldKind::String),
    required("isFeasible", FieldKind::Boolean),
    required("suggestion", FieldKind::String),
];

const ADVICE_FIELDS: &[FieldSpec] = &[
    required("riskLevel", FieldKind::Enum(RISK_LEVELS)),
    required(
        "healthScore",
        FieldKind::Integer {
            min: HEALTH_SCORE_RANGE.0,
            max: HEALTH_SCORE_RANGE.1,
        },
    ),
    required("healthStatus", FieldKind::Enum(HEALTH_STATUSES)),
    required("explanation", FieldKind::String),
    required("advicePoints", FieldKind::StringList),
    required("smartActions", FieldKind::StringList),
    required("warnings", FieldKind::StringList),
    required("savingsHealthScore", FieldKind::Number),
    required("protectionScore", FieldKind::Number),
];

const GOAL_FEASIBILITY: FieldSpec = FieldSpec {
    name: "goalFeasibility",
    kind: FieldKind::ObjectList(GOAL_FEASIBILITY_FIELDS),
    required: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    #[default]
    Basic,
    /// Adds the optional per-goal feasibility list.
    WithGoals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceSchema {
    variant: SchemaVariant,
    fields: Vec<FieldSpec>,
}

pub fn request_schema(variant: SchemaVariant) -> AdviceSchema {
    let mut fields = ADVICE_FIELDS.to_vec();
    if variant == SchemaVariant::WithGoals {
        fields.push(GOAL_FEASIBILITY);
    }
    AdviceSchema { variant, fields }
}

impl Default for AdviceSchema {
    fn default() -> Self {
        request_schema(SchemaVariant::Basic)
    }
}

impl AdviceSchema {
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Render as the provider's `responseSchema` object.
    pub fn to_json(&self) -> Value {
        object_schema(&self.fields)
    }
}

fn object_schema(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.to_string(), kind_schema(field.kind));
    }

    let required: Vec<&str> = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name)
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

fn kind_schema(kind: FieldKind) -> Value {
    match kind {
        FieldKind::String => json!({ "type": "STRING" }),
        FieldKind::Number => json!({ "type": "NUMBER" }),
        FieldKind::Integer { min, max } => json!({
            "type": "INTEGER",
            "minimum": min,
            "maximum": max,
        }),
        FieldKind::Boolean => json!({ "type": "BOOLEAN" }),
        FieldKind::Enum(values) => json!({
            "type": "STRING",
            "format": "enum",
            "enum": values,
        }),
        FieldKind::StringList => json!({
            "type": "ARRAY",
            "items": { "type": "STRING" },
        }),
        FieldKind::ObjectList(fields) => json!({
            "type": "ARRAY",
            "items": object_schema(fields),
        }),
    }
}
