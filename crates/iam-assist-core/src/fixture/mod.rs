//! Account fixtures.
//!
//! A fixture holds one service-account record and, optionally, the summary
//! the validator produced for it. Fixtures are YAML or JSON documents that
//! must validate against schema/fixture.schema.json before they are parsed.

mod parser;
mod schema;

pub use parser::{AccountMetadata, Fixture, FixtureError, ServiceAccount, ValidationSummary};
pub use schema::validate_fixture_schema;
