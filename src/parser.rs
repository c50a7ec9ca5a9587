//! Parse the provider's raw reply into an `AdviceResult`

use crate::error::AdvisorError;
use crate::models::AdviceResult;
use crate::schema::AdviceSchema;
use crate::Result;
use serde_json::Value;
use tracing::warn;

const EXPECTED_SMART_ACTIONS: usize = 3;

/// Parse against the basic schema.
pub fn parse_response(raw: &str) -> Result<AdviceResult> {
    parse_with_schema(raw, &AdviceSchema::default())
}

pub fn parse_with_schema(raw: &str, schema: &AdviceSchema) -> Result<AdviceResult> {
    let cleaned = strip_code_fence(raw);

    let json: Value = serde_json::from_str(cleaned).map_err(|e| {
        AdvisorError::MalformedAdvice(format!("reply is not valid JSON: {}", e))
    })?;

    let object = json.as_object().ok_or_else(|| {
        AdvisorError::MalformedAdvice("reply is not a JSON object".to_string())
    })?;

    for name in schema.required_fields() {
        match object.get(name) {
            None | Some(Value::Null) => {
                return Err(AdvisorError::MalformedAdvice(format!(
                    "missing required field `{}`",
                    name
                )));
            }
            Some(_) => {}
        }
    }

    let advice: AdviceResult = serde_json::from_value(json)
        .map_err(|e| AdvisorError::MalformedAdvice(e.to_string()))?;

    if advice.smart_actions.len() != EXPECTED_SMART_ACTIONS {
        warn!(
            count = advice.smart_actions.len(),
            "Provider returned an unexpected number of smart actions"
        );
    }

    Ok(advice)
}

/// Drop a surrounding ```json ... ``` fence if the model added one.
/// The language tag is matched without regard to case.
fn strip_code_fence(raw: &str) -> &str {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    body.strip_suffix("```").unwrap_or(body).trim()
}
