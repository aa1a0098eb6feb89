//! JSON writers for example outcomes and declared example groups.
//!
//! Outcome reports keep status labels in lowercase so downstream tools can
//! rely on consistent casing. [`dump_world`] serializes what discovery would
//! currently produce for every class of a world, without running anything.

use std::io::Write;

use serde::Serialize;

use super::{ExampleRecord, snapshot};
use crate::discovery::ExampleKind;
use crate::location::Location;
use crate::metadata::Metadata;
use crate::world::World;

#[derive(Serialize)]
struct JsonReport<'a> {
    examples: Vec<JsonExample<'a>>,
}

#[derive(Serialize)]
struct JsonExample<'a> {
    group: &'a str,
    description: &'a str,
    full_description: &'a str,
    status: &'static str,
    file: &'static str,
    line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl<'a> From<&'a [ExampleRecord]> for JsonReport<'a> {
    fn from(records: &'a [ExampleRecord]) -> Self {
        let examples = records.iter().map(JsonExample::from).collect();
        Self { examples }
    }
}

impl<'a> From<&'a ExampleRecord> for JsonExample<'a> {
    fn from(record: &'a ExampleRecord) -> Self {
        Self {
            group: record.group(),
            description: record.description(),
            full_description: record.full_description(),
            status: record.outcome().label(),
            file: record.location().file(),
            line: record.location().line(),
            message: record.outcome().message(),
        }
    }
}

/// Serialize the provided records into the supplied writer.
///
/// # Examples
/// ```rust
/// use xunit_bdd::{Location, Outcome};
/// use xunit_bdd::reporting::{ExampleRecord, json};
///
/// let records = vec![ExampleRecord::new(
///     "Calculator",
///     "test_add",
///     Location::new("tests/calculator.rs", 4),
///     Outcome::Passed,
/// )];
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &records).unwrap();
/// let output = String::from_utf8(buffer).unwrap();
/// assert!(output.contains("\"status\":\"passed\""));
/// ```
///
/// # Errors
/// Returns an error when serialization of the provided records fails.
pub fn write<W: Write>(writer: &mut W, records: &[ExampleRecord]) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(records))
}

/// Serialize the current collector snapshot into the supplied writer.
///
/// # Errors
/// Returns an error when serializing the snapshot fails.
pub fn write_snapshot<W: Write>(writer: &mut W) -> serde_json::Result<()> {
    let snapshot = snapshot();
    write(writer, &snapshot)
}

/// Produce a JSON string representation of the provided records.
///
/// # Errors
/// Returns an error when serializing the provided records fails.
pub fn to_string(records: &[ExampleRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(records))
}

#[derive(Serialize)]
struct WorldDump {
    groups: Vec<GroupDump>,
}

#[derive(Serialize)]
struct GroupDump {
    description: String,
    location: Location,
    ancestors: Vec<String>,
    metadata: Metadata,
    examples: Vec<ExampleDump>,
}

#[derive(Serialize)]
struct ExampleDump {
    description: String,
    full_description: String,
    kind: ExampleKind,
    location: Location,
    metadata: Metadata,
}

/// Serialize every example group of `world` with its examples and metadata.
///
/// # Examples
/// ```rust
/// use xunit_bdd::World;
/// use xunit_bdd::reporting::json;
///
/// let world = World::new();
/// let foo = world.test_case().subclass("Foo").unwrap();
/// foo.define("test_bar", |_| Ok(()));
/// let dump = json::dump_world(&world).unwrap();
/// assert!(dump.contains("\"full_description\":\"Foo#test_bar\""));
/// ```
///
/// # Errors
/// Returns an error when serializing the dump fails.
pub fn dump_world(world: &World) -> serde_json::Result<String> {
    let groups = world
        .example_groups()
        .iter()
        .map(|class| GroupDump {
            description: class.description(),
            location: class.location(),
            ancestors: class
                .ancestors()
                .iter()
                .map(crate::class::TestClass::description)
                .collect(),
            metadata: class.metadata(),
            examples: class
                .examples()
                .iter()
                .map(|example| ExampleDump {
                    description: example.description().to_owned(),
                    full_description: example.full_description().to_owned(),
                    kind: example.kind(),
                    location: example.location(),
                    metadata: example.metadata().clone(),
                })
                .collect(),
        })
        .collect();
    serde_json::to_string(&WorldDump { groups })
}
