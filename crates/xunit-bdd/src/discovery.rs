//! Method discovery: turning a class's declarations into examples.
//!
//! Discovery walks the method-resolution order of a class on every call. Names
//! are collected ancestor-most level first (modules before the class that
//! includes them, each in declaration order) and each name is then bound to
//! its most-derived definition, so a subclass override keeps the position of
//! the inherited method but runs the subclass body. Fluent examples follow the
//! method examples using the same ordering and shadowing by description.

use std::fmt;

use hashbrown::HashSet;

use crate::class::{DeclaredExample, TestClass};
use crate::location::Location;
use crate::metadata::{MetaValue, Metadata, keys};
use crate::method::{MethodBody, MethodDef};

/// How an example was declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
#[cfg_attr(feature = "diagnostics", serde(rename_all = "snake_case"))]
pub enum ExampleKind {
    /// A public, test-prefixed method callable without arguments.
    TestMethod,
    /// A fluent `example`/`test`/alias declaration.
    Declared,
}

/// One runnable example of a test class.
#[derive(Clone)]
pub struct Example {
    description: String,
    full_description: String,
    class: TestClass,
    location: Location,
    metadata: Metadata,
    kind: ExampleKind,
    body: MethodBody,
}

impl Example {
    /// The method name or the explicit fluent description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `"{class description}#{description}"`.
    #[must_use]
    pub fn full_description(&self) -> &str {
        &self.full_description
    }

    /// The class whose examples produced this one.
    #[must_use]
    pub const fn class(&self) -> &TestClass {
        &self.class
    }

    /// Where the bound definition was first declared.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// The example's metadata record.
    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// How the example was declared.
    #[must_use]
    pub const fn kind(&self) -> ExampleKind {
        self.kind
    }

    pub(crate) fn body(&self) -> MethodBody {
        MethodBody::clone(&self.body)
    }
}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example")
            .field("full_description", &self.full_description)
            .field("location", &self.location)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

struct ExampleSeed<'a> {
    description: &'a str,
    location: Location,
    info: &'a Metadata,
    body: MethodBody,
    kind: ExampleKind,
}

struct Group {
    class: TestClass,
    description: String,
    record: Metadata,
}

impl Group {
    fn of(class: &TestClass) -> Self {
        let record = class.metadata();
        let description = record
            .get(keys::DESCRIPTION)
            .and_then(MetaValue::as_str)
            .map_or_else(|| class.description(), str::to_owned);
        Self {
            class: class.clone(),
            description,
            record,
        }
    }

    fn example(&self, seed: ExampleSeed<'_>) -> Example {
        let full_description = format!("{}#{}", self.description, seed.description);
        let metadata = self.example_metadata(&seed, &full_description);
        Example {
            description: seed.description.to_owned(),
            full_description,
            class: self.class.clone(),
            location: seed.location,
            metadata,
            kind: seed.kind,
            body: seed.body,
        }
    }

    fn example_metadata(&self, seed: &ExampleSeed<'_>, full_description: &str) -> Metadata {
        let mut record = Metadata::new();
        record.insert(keys::DESCRIPTION, seed.description);
        record.insert(keys::FULL_DESCRIPTION, full_description);
        record.insert(keys::FILE_PATH, seed.location.file());
        record.insert(keys::LINE_NUMBER, seed.location.line());
        record.insert(keys::LOCATION, seed.location.to_string());
        record.insert(keys::EXAMPLE_GROUP, self.record.clone());
        record.insert(keys::BEHAVIOUR, self.record.clone());
        record.insert(keys::TEST_UNIT, true);
        for (key, value) in self.record.iter() {
            if !keys::CLASS_RESERVED.contains(&key) && !record.contains_key(key) {
                record.insert(key, value.clone());
            }
        }
        for (key, value) in seed.info.iter() {
            if keys::EXAMPLE_RESERVED.contains(&key) {
                log::debug!("{full_description}: test_info cannot override `{key}`");
                continue;
            }
            record.insert(key, value.clone());
        }
        record
    }
}

/// Compute the examples of `class` from its current declarations.
pub(crate) fn examples(class: &TestClass) -> Vec<Example> {
    let group = Group::of(class);
    let mut found = method_examples(class, &group);
    found.extend(declared_examples(class, &group));
    found
}

fn method_examples(class: &TestClass, group: &Group) -> Vec<Example> {
    let order = class.method_resolution_order();
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for source in order.iter().rev() {
        for def in source.definitions() {
            if seen.insert(def.name().to_owned()) {
                names.push(def.name().to_owned());
            }
        }
    }
    names
        .iter()
        .filter_map(|name| order.iter().find_map(|source| source.method(name)))
        .filter(qualifies)
        .map(|def| {
            group.example(ExampleSeed {
                description: def.name(),
                location: def.location(),
                info: def.info(),
                body: def.body(),
                kind: ExampleKind::TestMethod,
            })
        })
        .collect()
}

fn qualifies(def: &MethodDef) -> bool {
    if !def.has_test_name() {
        return false;
    }
    let qualifies = def.qualifies_as_test();
    if !qualifies {
        log::trace!(
            "skipping {}: visibility {:?}, {} required parameter(s)",
            def.name(),
            def.visibility(),
            def.arity().required()
        );
    }
    qualifies
}

fn declared_examples(class: &TestClass, group: &Group) -> Vec<Example> {
    let chain = class.ancestry();
    let mut seen = HashSet::new();
    let mut descriptions = Vec::new();
    for ancestor in chain.iter().rev() {
        for declared in ancestor.declared_examples() {
            if seen.insert(declared.description.clone()) {
                descriptions.push(declared.description);
            }
        }
    }
    descriptions
        .iter()
        .filter_map(|description| nearest_declaration(&chain, description))
        .map(|declared| {
            group.example(ExampleSeed {
                description: &declared.description,
                location: declared.location,
                info: &declared.info,
                body: declared.body.clone(),
                kind: ExampleKind::Declared,
            })
        })
        .collect()
}

fn nearest_declaration(chain: &[TestClass], description: &str) -> Option<DeclaredExample> {
    chain.iter().find_map(|class| {
        class
            .declared_examples()
            .into_iter()
            .find(|declared| declared.description == description)
    })
}
