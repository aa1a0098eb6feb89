//! Per-example instances of a test class.

use std::any::Any;

use hashbrown::HashMap;

use crate::class::{MethodSource, TestClass};
use crate::error::{Failure, TestResult};

/// The receiver every method body, hook and fluent example runs against.
///
/// A fresh instance is built for each example, so instance variables and the
/// typed subject never leak between examples.
///
/// # Examples
///
/// ```
/// use xunit_bdd::{TestInstance, World};
///
/// let world = World::new();
/// let foo = world.test_case().anonymous_subclass();
/// let mut instance = TestInstance::new(&foo);
/// instance.set("answer", 42_u32);
/// assert_eq!(instance.get::<u32>("answer"), Some(&42));
/// assert!(instance.passed());
/// ```
pub struct TestInstance {
    class: TestClass,
    subject: Option<Box<dyn Any>>,
    subject_owner: Option<TestClass>,
    variables: HashMap<String, Box<dyn Any>>,
    failure: Option<Failure>,
    example: Option<String>,
}

impl TestInstance {
    /// Create an instance of `class`, building its subject with the nearest
    /// subject factory in the hierarchy.
    #[must_use]
    pub fn new(class: &TestClass) -> Self {
        let (subject_owner, subject) = class
            .build_subject()
            .map_or((None, None), |(owner, subject)| (Some(owner), Some(subject)));
        Self {
            class: class.clone(),
            subject,
            subject_owner,
            variables: HashMap::new(),
            failure: None,
            example: None,
        }
    }

    /// The class this instance was created from.
    #[must_use]
    pub const fn class(&self) -> &TestClass {
        &self.class
    }

    /// Description of the example currently running, if any.
    #[must_use]
    pub fn example_description(&self) -> Option<&str> {
        self.example.as_deref()
    }

    /// Store an instance variable, replacing any previous value.
    pub fn set<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.variables.insert(name.into(), Box::new(value));
    }

    /// Borrow an instance variable of type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.variables.get(name)?.downcast_ref::<T>()
    }

    /// Mutably borrow an instance variable of type `T`.
    #[must_use]
    pub fn get_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.variables.get_mut(name)?.downcast_mut::<T>()
    }

    /// Remove an instance variable of type `T`.
    ///
    /// A value of another type is left in place.
    pub fn take<T: Any>(&mut self, name: &str) -> Option<T> {
        if !self.variables.get(name)?.is::<T>() {
            return None;
        }
        let value = self.variables.remove(name)?;
        value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Borrow the typed subject.
    ///
    /// Ancestor subject types are reached through each class's
    /// [`TestClass::set_upcast_ref`] conversion.
    #[must_use]
    pub fn subject<T: Any>(&self) -> Option<&T> {
        let owner = self.subject_owner.as_ref()?;
        let mut current: &(dyn Any + 'static) = self.subject.as_deref()?;
        for class in owner.ancestry() {
            if current.is::<T>() {
                return current.downcast_ref::<T>();
            }
            if class.has_own_subject() {
                let upcast = class.upcast_ref()?;
                current = upcast(current)?;
            }
        }
        None
    }

    /// Mutably borrow the typed subject.
    ///
    /// When `T` is an ancestor's subject type, the subject is converted
    /// through each class's upcast until the type matches.
    #[must_use]
    pub fn subject_mut<T: Any>(&mut self) -> Option<&mut T> {
        let owner = self.subject_owner.clone()?;
        let mut current: &mut (dyn Any + 'static) = self.subject.as_deref_mut()?;
        for class in owner.ancestry() {
            if current.is::<T>() {
                return current.downcast_mut::<T>();
            }
            if class.has_own_subject() {
                let upcast = class.upcast()?;
                current = upcast(current)?;
            }
        }
        None
    }

    /// Whether the current example has not failed so far.
    ///
    /// Teardown reads this to learn the outcome of the example body.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }

    /// The first failure recorded for the current example.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Call a method through the resolution order of this instance's class.
    ///
    /// # Errors
    ///
    /// Returns the method's failure, or [`Failure::Error`] when no method of
    /// that name exists.
    pub fn invoke(&mut self, name: &str) -> TestResult {
        let def = self.class.resolve_method(name).ok_or_else(|| {
            Failure::error(format!(
                "undefined method `{name}` for {}",
                self.class.description()
            ))
        })?;
        (def.body())(self)
    }

    /// Call the definition of `name` that `owner`'s own definition shadows.
    ///
    /// # Errors
    ///
    /// Returns the method's failure, or [`Failure::Error`] when `owner` is not
    /// in this instance's hierarchy or nothing above it defines `name`.
    pub fn invoke_super(&mut self, owner: &TestClass, name: &str) -> TestResult {
        let order = self.class.method_resolution_order();
        let position = order
            .iter()
            .position(|source| matches!(source, MethodSource::Class(class) if class == owner))
            .ok_or_else(|| {
                Failure::error(format!(
                    "{} is not an ancestor of {}",
                    owner.description(),
                    self.class.description()
                ))
            })?;
        let def = order
            .iter()
            .skip(position + 1)
            .find_map(|source| source.method(name))
            .ok_or_else(|| {
                Failure::error(format!(
                    "super: no superclass method `{name}` for {}",
                    owner.description()
                ))
            })?;
        (def.body())(self)
    }

    pub(crate) fn begin(&mut self, description: &str) {
        self.example = Some(description.to_owned());
        self.failure = None;
    }

    /// Keep the first failure of the example; later ones are logged.
    pub(crate) fn record(&mut self, result: TestResult) {
        let Err(failure) = result else {
            return;
        };
        match &self.failure {
            None => self.failure = Some(failure),
            Some(first) => log::warn!(
                "{}: additional failure after '{first}': {failure}",
                self.example.as_deref().unwrap_or("<no example>")
            ),
        }
    }
}

impl std::fmt::Debug for TestInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestInstance")
            .field("class", &self.class)
            .field("example", &self.example)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}
