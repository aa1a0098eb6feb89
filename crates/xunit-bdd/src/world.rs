//! The world: root adapter class plus the ordered example-group registry.
//!
//! A [`World`] owns the root `TestCase` class and records every subclass in
//! declaration order. Each test thread gets its own default world through
//! [`World::current`], so parallel tests never observe each other's classes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;

use crate::class::TestClass;
use crate::error::DeclarationError;
use crate::execution::RunSummary;
use crate::location::Location;
use crate::registration::{TestCase, TestCaseRegistration};
use crate::reporting::Reporter;

struct WorldInner {
    root: TestClass,
    groups: RefCell<Vec<TestClass>>,
    loaded: RefCell<HashMap<&'static str, TestClass>>,
}

/// Registry of example groups rooted at one adapter class.
///
/// # Examples
///
/// ```
/// use xunit_bdd::World;
///
/// let world = World::new();
/// let a = world.test_case().subclass("A").unwrap();
/// let b = a.subclass("B").unwrap();
/// assert_eq!(world.example_groups(), vec![a, b]);
/// ```
#[derive(Clone)]
pub struct World {
    inner: Rc<WorldInner>,
}

/// Non-owning handle classes keep onto their world.
#[derive(Clone)]
pub(crate) struct WeakWorld(Weak<WorldInner>);

impl WeakWorld {
    pub(crate) fn upgrade(&self) -> Option<World> {
        self.0.upgrade().map(|inner| World { inner })
    }
}

thread_local! {
    static CURRENT: World = World::new();
}

impl World {
    /// Create an empty world with a fresh root adapter class.
    #[must_use]
    pub fn new() -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<WorldInner>| WorldInner {
            root: TestClass::root(WeakWorld(weak.clone())),
            groups: RefCell::new(Vec::new()),
            loaded: RefCell::new(HashMap::new()),
        });
        Self { inner }
    }

    /// The default world of the current thread.
    #[must_use]
    pub fn current() -> Self {
        CURRENT.with(Self::clone)
    }

    /// The root adapter class every test class derives from.
    #[must_use]
    pub fn test_case(&self) -> TestClass {
        self.inner.root.clone()
    }

    /// Every registered class, in declaration order.
    #[must_use]
    pub fn example_groups(&self) -> Vec<TestClass> {
        self.inner.groups.borrow().clone()
    }

    /// Append `class` to the example groups. Registering twice is a no-op.
    pub fn register(&self, class: &TestClass) {
        if class.is_root() {
            log::debug!("the root adapter class is not an example group");
            return;
        }
        let mut groups = self.inner.groups.borrow_mut();
        if groups.contains(class) {
            return;
        }
        log::debug!("registered example group {}", class.description());
        groups.push(class.clone());
    }

    /// The registered class named `name`, if any.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<TestClass> {
        self.inner
            .groups
            .borrow()
            .iter()
            .find(|class| class.name() == Some(name))
            .cloned()
    }

    /// Build the class registered for `T`, loading its parents first.
    ///
    /// # Errors
    ///
    /// See [`World::load_key`].
    pub fn load<T: TestCase>(&self) -> Result<TestClass, DeclarationError> {
        self.load_key(T::KEY)
    }

    /// Build the class registered under `key`, loading its parents first.
    /// Loading the same key twice returns the same class.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::UnknownTestCase`] when nothing is
    /// registered under `key` and [`DeclarationError::MissingParent`] when
    /// its parent is not registered.
    pub fn load_key(&self, key: &str) -> Result<TestClass, DeclarationError> {
        if let Some(class) = self.inner.loaded.borrow().get(key) {
            return Ok(class.clone());
        }
        let registration = TestCaseRegistration::find(key).ok_or_else(|| {
            DeclarationError::UnknownTestCase {
                key: key.to_owned(),
            }
        })?;
        let parent = match registration.parent {
            None => self.test_case(),
            Some(parent) => self.load_key(parent).map_err(|error| match error {
                DeclarationError::UnknownTestCase { .. } => DeclarationError::MissingParent {
                    key: key.to_owned(),
                    parent: parent.to_owned(),
                },
                other => other,
            })?,
        };
        let class = parent.inherit(
            Some(registration.name.to_owned()),
            Location::new(registration.file, registration.line),
        );
        self.inner
            .loaded
            .borrow_mut()
            .insert(registration.key, class.clone());
        (registration.declare)(&class);
        log::debug!("loaded {} from {}", registration.name, registration.key);
        Ok(class)
    }

    /// Load every registered test case, in source order.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by [`World::load_key`].
    pub fn load_registered(&self) -> Result<Vec<TestClass>, DeclarationError> {
        TestCaseRegistration::in_source_order()
            .into_iter()
            .map(|registration| self.load_key(registration.key))
            .collect()
    }

    /// Run every example group in registration order.
    pub fn run_all(&self, mut reporter: Option<&mut dyn Reporter>) -> RunSummary {
        let mut summary = RunSummary::default();
        for class in self.example_groups() {
            let reporter = reporter
                .as_mut()
                .map(|reporter| &mut **reporter as &mut dyn Reporter);
            summary.extend(class.run_all(reporter));
        }
        summary
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("example_groups", &self.inner.groups.borrow())
            .finish_non_exhaustive()
    }
}
