//! Owned outcome records detached from the classes that produced them.

use crate::discovery::Example;
use crate::execution::Outcome;
use crate::location::Location;

/// Outcome recorded for a single example execution.
///
/// Records hold only owned strings and the declaration location, so they can
/// cross threads into the process-wide collector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExampleRecord {
    group: String,
    description: String,
    full_description: String,
    location: Location,
    outcome: Outcome,
}

impl ExampleRecord {
    /// Construct a record from its parts.
    ///
    /// # Examples
    /// ```
    /// use xunit_bdd::{Location, Outcome};
    /// use xunit_bdd::reporting::ExampleRecord;
    ///
    /// let record = ExampleRecord::new(
    ///     "Calculator",
    ///     "test_add",
    ///     Location::new("tests/calculator.rs", 4),
    ///     Outcome::Passed,
    /// );
    /// assert_eq!(record.full_description(), "Calculator#test_add");
    /// ```
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        description: impl Into<String>,
        location: Location,
        outcome: Outcome,
    ) -> Self {
        let group = group.into();
        let description = description.into();
        Self {
            full_description: format!("{group}#{description}"),
            group,
            description,
            location,
            outcome,
        }
    }

    /// Record the outcome of a discovered example.
    #[must_use]
    pub fn from_example(example: &Example, outcome: Outcome) -> Self {
        Self {
            group: example.class().description(),
            description: example.description().to_owned(),
            full_description: example.full_description().to_owned(),
            location: example.location(),
            outcome,
        }
    }

    /// Description of the class the example belongs to.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The example's own description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `"{group}#{description}"`.
    #[must_use]
    pub fn full_description(&self) -> &str {
        &self.full_description
    }

    /// Where the example was declared.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// How the example ended.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}
