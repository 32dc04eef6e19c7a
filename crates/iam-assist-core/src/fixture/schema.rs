//! JSON Schema validation for fixtures.
//!
//! Fixtures are validated against schema/fixture.schema.json before they are
//! deserialized, so malformed documents are reported with every offending path
//! instead of the first serde error.

use std::sync::OnceLock;

/// Embedded fixture schema (loaded at compile time).
const FIXTURE_SCHEMA_JSON: &str = include_str!("../../../../schema/fixture.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(FIXTURE_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result.as_ref().map_err(Clone::clone)
}

/// Validate a fixture JSON value against the schema.
///
/// Returns every validation error message, each suffixed with the instance
/// path it applies to.
pub fn validate_fixture_schema(fixture_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(fixture_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
