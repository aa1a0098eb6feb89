//! JUnit XML writer for example outcome records.
//!
//! Each class becomes the `classname` of its examples. Failed examples carry
//! a `<failure>` child and errored ones an `<error>` child, both with the
//! failure message.

use std::fmt::{self, Write};

use super::{ExampleRecord, snapshot};
use crate::execution::Outcome;

/// Render the supplied records as a `JUnit` XML document.
///
/// # Examples
/// ```
/// use xunit_bdd::{Location, Outcome};
/// use xunit_bdd::reporting::{ExampleRecord, junit};
///
/// let records = vec![ExampleRecord::new(
///     "Calculator",
///     "test_add",
///     Location::new("tests/calculator.rs", 4),
///     Outcome::Passed,
/// )];
/// let mut output = String::new();
/// junit::write(&mut output, &records).unwrap();
/// assert!(output.contains("<testsuite"));
/// ```
///
/// # Errors
/// Returns an error if writing to the provided formatter fails.
pub fn write<W: Write>(writer: &mut W, records: &[ExampleRecord]) -> fmt::Result {
    let tests = records.len();
    let failures = records
        .iter()
        .filter(|record| matches!(record.outcome(), Outcome::Failed { .. }))
        .count();
    let errors = records
        .iter()
        .filter(|record| matches!(record.outcome(), Outcome::Errored { .. }))
        .count();
    writer.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    writeln!(
        writer,
        "<testsuite name=\"xunit-bdd\" tests=\"{tests}\" \
         failures=\"{failures}\" errors=\"{errors}\">",
    )?;
    for record in records {
        writer.write_str("  <testcase name=\"")?;
        write_escaped(writer, record.description())?;
        writer.write_str("\" classname=\"")?;
        write_escaped(writer, record.group())?;
        writer.write_str("\" file=\"")?;
        write_escaped(writer, record.location().file())?;
        write!(writer, "\" line=\"{}\"", record.location().line())?;
        match record.outcome() {
            Outcome::Passed => writer.write_str(" />\n")?,
            Outcome::Failed { message } => write_failure(writer, "failure", message)?,
            Outcome::Errored { message } => write_failure(writer, "error", message)?,
        }
    }
    writer.write_str("</testsuite>\n")
}

/// Render the collector snapshot as a `JUnit` XML document.
///
/// # Errors
/// Returns an error if writing to the provided formatter fails.
pub fn write_snapshot<W: Write>(writer: &mut W) -> fmt::Result {
    let snapshot = snapshot();
    write(writer, &snapshot)
}

fn write_failure<W: Write>(writer: &mut W, element: &str, message: &str) -> fmt::Result {
    writer.write_str(">\n")?;
    write!(writer, "    <{element} message=\"")?;
    write_escaped(writer, message)?;
    writer.write_str("\" />\n")?;
    writer.write_str("  </testcase>\n")
}

fn write_escaped<W: Write>(writer: &mut W, value: &str) -> fmt::Result {
    const INVALID_REPLACEMENT: &str = "&#xFFFD;";
    for character in value.chars() {
        if !is_valid_xml_character(character) {
            writer.write_str(INVALID_REPLACEMENT)?;
            continue;
        }
        match character {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            '"' => writer.write_str("&quot;")?,
            '\'' => writer.write_str("&apos;")?,
            '\n' => writer.write_str("&#10;")?,
            other => writer.write_char(other)?,
        }
    }
    Ok(())
}

fn is_valid_xml_character(character: char) -> bool {
    matches!(
        u32::from(character),
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
    )
}
