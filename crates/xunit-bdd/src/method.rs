//! Method definitions and the ordered tables that hold them.

use std::fmt;
use std::rc::Rc;

use crate::error::TestResult;
use crate::execution::TestInstance;
use crate::location::Location;
use crate::metadata::Metadata;

/// Callable body shared by methods, fluent examples and hooks.
pub type MethodBody = Rc<dyn Fn(&mut TestInstance) -> TestResult>;

/// Visibility of a declared method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Callable from anywhere; the only visibility discovery accepts.
    #[default]
    Public,
    /// Callable from the class hierarchy.
    Protected,
    /// Callable from the declaring class only.
    Private,
}

/// Parameter shape of a method.
///
/// # Examples
///
/// ```
/// use xunit_bdd::Arity;
///
/// assert!(Arity::NONE.callable_without_arguments());
/// assert!(Arity::new(0, 2, true).callable_without_arguments());
/// assert!(!Arity::new(1, 0, true).callable_without_arguments());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Arity {
    required: usize,
    optional: usize,
    variadic: bool,
}

impl Arity {
    /// A method that takes no parameters.
    pub const NONE: Self = Self::new(0, 0, false);

    /// Describe a parameter list.
    #[must_use]
    pub const fn new(required: usize, optional: usize, variadic: bool) -> Self {
        Self {
            required,
            optional,
            variadic,
        }
    }

    /// Number of required positional parameters.
    #[must_use]
    pub const fn required(self) -> usize {
        self.required
    }

    /// Number of optional parameters.
    #[must_use]
    pub const fn optional(self) -> usize {
        self.optional
    }

    /// Whether a trailing variadic parameter is accepted.
    #[must_use]
    pub const fn variadic(self) -> bool {
        self.variadic
    }

    /// Whether the method can be invoked with no arguments at all.
    #[must_use]
    pub const fn callable_without_arguments(self) -> bool {
        self.required == 0
    }
}

/// A method declared on a test class or module.
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    visibility: Visibility,
    arity: Arity,
    location: Location,
    info: Metadata,
    body: MethodBody,
}

impl MethodDef {
    /// Declare a public method taking no parameters, located at the caller.
    #[must_use]
    #[track_caller]
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&mut TestInstance) -> TestResult + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            arity: Arity::NONE,
            location: Location::caller(),
            info: Metadata::new(),
            body: Rc::new(body),
        }
    }

    /// Set the method visibility.
    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the parameter shape.
    #[must_use]
    pub const fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Override the recorded declaration site.
    #[must_use]
    pub const fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Declared parameter shape.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Where the method was first declared.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Metadata consumed from the pending-info slot when declared.
    #[must_use]
    pub const fn info(&self) -> &Metadata {
        &self.info
    }

    pub(crate) fn set_info(&mut self, info: Metadata) {
        self.info = info;
    }

    pub(crate) fn body(&self) -> MethodBody {
        Rc::clone(&self.body)
    }

    /// Whether the name carries a configured test prefix.
    #[must_use]
    pub fn has_test_name(&self) -> bool {
        crate::config::is_test_method_name(&self.name)
    }

    /// Whether this definition becomes an example: test-prefixed name,
    /// public, and callable without arguments.
    #[must_use]
    pub fn qualifies_as_test(&self) -> bool {
        self.has_test_name()
            && self.visibility == Visibility::Public
            && self.arity.callable_without_arguments()
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("arity", &self.arity)
            .field("location", &self.location)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Methods of one class or module in declaration order.
#[derive(Debug, Default)]
pub(crate) struct MethodTable {
    entries: Vec<MethodDef>,
}

impl MethodTable {
    /// Add a definition. Redefining a name replaces the body in place and
    /// keeps the location of the first declaration.
    pub(crate) fn insert(&mut self, mut def: MethodDef) {
        if let Some(existing) = self.entries.iter_mut().find(|entry| entry.name == def.name) {
            def.location = existing.location;
            *existing = def;
        } else {
            self.entries.push(def);
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&MethodDef> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub(crate) fn definitions(&self) -> Vec<MethodDef> {
        self.entries.clone()
    }
}
