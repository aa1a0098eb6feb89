//! Test classes: the example groups built from xUnit-style declarations.
//!
//! A [`TestClass`] is a shared handle onto one node of a single-inheritance
//! hierarchy rooted at the world's adapter class. Each node owns an ordered
//! method table, mixed-in [`TestModule`]s, fluent examples, before/after
//! hooks, class metadata and the pending-info slot. Nothing derived from these
//! tables is cached: discovery, location lookup and metadata are computed on
//! every query so later declarations anywhere in the hierarchy are visible.

mod module;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub use module::TestModule;

use crate::discovery::{self, Example};
use crate::error::{DeclarationError, TestResult};
use crate::execution::{RunSummary, Runner, TestInstance};
use crate::location::{self, Location};
use crate::metadata::{MetaValue, Metadata, PendingInfo, keys};
use crate::method::{MethodBody, MethodDef, MethodTable};
use crate::reporting::Reporter;
use crate::world::WeakWorld;

/// Description reported for classes declared without a name.
pub const ANONYMOUS_DESCRIPTION: &str = "<Anonymous TestCase>";

/// Description of the root adapter class.
pub const ROOT_DESCRIPTION: &str = "TestCase";

/// Fluent declaration names every class understands.
pub const BUILTIN_EXAMPLE_ALIASES: &[&str] = &["example", "test", "it", "specify"];

/// Name of the per-example setup hook method.
pub const SETUP: &str = "setup";

/// Name of the per-example teardown hook method.
pub const TEARDOWN: &str = "teardown";

/// Builds the subject value a fresh [`TestInstance`] carries.
pub type SubjectFactory = Rc<dyn Fn() -> Box<dyn Any>>;

/// Converts a class's subject into its superclass's subject.
pub type Upcast =
    for<'a> fn(&'a mut (dyn Any + 'static)) -> Option<&'a mut (dyn Any + 'static)>;

/// Shared-borrow counterpart of [`Upcast`].
pub type UpcastRef = for<'a> fn(&'a (dyn Any + 'static)) -> Option<&'a (dyn Any + 'static)>;

/// An example declared through the fluent entry point.
#[derive(Clone)]
pub(crate) struct DeclaredExample {
    pub(crate) description: String,
    pub(crate) location: Location,
    pub(crate) info: Metadata,
    pub(crate) body: MethodBody,
}

#[derive(Default)]
struct ClassState {
    info: Metadata,
    methods: MethodTable,
    modules: Vec<TestModule>,
    declared: Vec<DeclaredExample>,
    aliases: Vec<String>,
    before: Vec<MethodBody>,
    after: Vec<MethodBody>,
    pending: PendingInfo,
    factory: Option<SubjectFactory>,
    upcast: Option<Upcast>,
    upcast_ref: Option<UpcastRef>,
}

struct ClassInner {
    name: Option<String>,
    location: Location,
    superclass: Option<TestClass>,
    world: WeakWorld,
    state: RefCell<ClassState>,
}

/// A shared handle onto a test class.
///
/// Cloning the handle does not copy the class; equality is identity.
///
/// # Examples
///
/// ```
/// use xunit_bdd::World;
///
/// let world = World::new();
/// let foo = world.test_case().anonymous_subclass();
/// foo.define("test_bar", |_| Ok(()));
/// foo.define("helper", |_| Ok(()));
///
/// let examples = foo.examples();
/// assert_eq!(examples.len(), 1);
/// assert_eq!(examples[0].description(), "test_bar");
/// ```
#[derive(Clone)]
pub struct TestClass {
    inner: Rc<ClassInner>,
}

impl TestClass {
    pub(crate) fn root(world: WeakWorld) -> Self {
        Self::create(None, Location::caller(), None, world)
    }

    fn create(
        name: Option<String>,
        location: Location,
        superclass: Option<Self>,
        world: WeakWorld,
    ) -> Self {
        Self {
            inner: Rc::new(ClassInner {
                name,
                location,
                superclass,
                world,
                state: RefCell::new(ClassState::default()),
            }),
        }
    }

    /// Declare (or reopen) a named subclass.
    ///
    /// The new class is registered with the world's example groups. When the
    /// world already holds a class with this name and the same superclass,
    /// that class is returned unchanged, keeping its original location.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::SuperclassMismatch`] when the existing
    /// class of that name has a different superclass.
    #[track_caller]
    pub fn subclass(&self, name: &str) -> Result<Self, DeclarationError> {
        let location = Location::caller();
        if let Some(existing) = self.inner.world.upgrade().and_then(|world| world.find(name)) {
            return if existing.superclass().as_ref() == Some(self) {
                log::debug!("reopening test class {name}");
                Ok(existing)
            } else {
                Err(DeclarationError::SuperclassMismatch {
                    name: name.to_owned(),
                })
            };
        }
        Ok(self.inherit(Some(name.to_owned()), location))
    }

    /// Declare an anonymous subclass located at the caller.
    #[must_use]
    #[track_caller]
    pub fn anonymous_subclass(&self) -> Self {
        self.inherit(None, Location::caller())
    }

    /// Create and register a subclass without reopening by name.
    pub(crate) fn inherit(&self, name: Option<String>, location: Location) -> Self {
        let class = Self::create(name, location, Some(self.clone()), self.inner.world.clone());
        match self.inner.world.upgrade() {
            Some(world) => world.register(&class),
            None => log::warn!(
                "world dropped before {} was declared; class not registered",
                class.description()
            ),
        }
        class
    }

    /// The declared name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// The class name, or a placeholder for anonymous and root classes.
    #[must_use]
    pub fn description(&self) -> String {
        match (&self.inner.name, self.is_root()) {
            (Some(name), _) => name.clone(),
            (None, true) => ROOT_DESCRIPTION.to_owned(),
            (None, false) => ANONYMOUS_DESCRIPTION.to_owned(),
        }
    }

    /// Where the class was first declared.
    #[must_use]
    pub fn location(&self) -> Location {
        self.inner.location
    }

    /// The direct superclass; `None` only for the root adapter class.
    #[must_use]
    pub fn superclass(&self) -> Option<Self> {
        self.inner.superclass.clone()
    }

    /// Whether this is the root adapter class of its world.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.inner.superclass.is_none()
    }

    /// `[self, superclass, ...]` with the root adapter class removed.
    #[must_use]
    pub fn ancestors(&self) -> Vec<Self> {
        let mut chain = Vec::new();
        let mut current = Some(self.clone());
        while let Some(class) = current {
            if class.is_root() {
                break;
            }
            current = class.superclass();
            chain.push(class);
        }
        chain
    }

    /// Sources searched for a method name, most specific first: the class,
    /// its modules (latest inclusion first), then each superclass likewise.
    pub(crate) fn method_resolution_order(&self) -> Vec<MethodSource> {
        let mut order = Vec::new();
        let mut current = Some(self.clone());
        while let Some(class) = current {
            order.push(MethodSource::Class(class.clone()));
            order.extend(class.modules().into_iter().rev().map(MethodSource::Module));
            current = class.superclass();
        }
        order
    }

    /// Resolve `name` to its most-derived definition.
    #[must_use]
    pub fn resolve_method(&self, name: &str) -> Option<MethodDef> {
        self.method_resolution_order()
            .iter()
            .find_map(|source| source.method(name))
    }

    /// Mix a module's methods into this class.
    pub fn include(&self, module: &TestModule) {
        let mut state = self.inner.state.borrow_mut();
        if state.modules.iter().any(|included| included == module) {
            return;
        }
        log::debug!("{} includes {}", self.description(), module.description());
        state.modules.push(module.clone());
    }

    /// Modules included directly into this class, in inclusion order.
    #[must_use]
    pub fn modules(&self) -> Vec<TestModule> {
        self.inner.state.borrow().modules.clone()
    }

    /// Add a method. A qualifying test method consumes the pending-info
    /// batch staged by [`TestClass::test_info`].
    pub fn define_method(&self, mut def: MethodDef) {
        let mut state = self.inner.state.borrow_mut();
        if def.qualifies_as_test() {
            def.set_info(state.pending.take());
        }
        log::debug!("{}: defined {} at {}", self.description(), def.name(), def.location());
        state.methods.insert(def);
    }

    /// Add a public method taking no parameters, located at the caller.
    #[track_caller]
    pub fn define(&self, name: &str, body: impl Fn(&mut TestInstance) -> TestResult + 'static) {
        self.define_method(MethodDef::new(name, body));
    }

    pub(crate) fn own_methods(&self) -> Vec<MethodDef> {
        self.inner.state.borrow().methods.definitions()
    }

    pub(crate) fn own_method(&self, name: &str) -> Option<MethodDef> {
        self.inner.state.borrow().methods.get(name).cloned()
    }

    /// Declare an example with an explicit description, independent of
    /// method naming. Consumes pending info.
    #[track_caller]
    pub fn example(
        &self,
        description: &str,
        body: impl Fn(&mut TestInstance) -> TestResult + 'static,
    ) {
        self.declare_example(description, Location::caller(), Rc::new(body));
    }

    /// Alias of [`TestClass::example`].
    #[track_caller]
    pub fn test(
        &self,
        description: &str,
        body: impl Fn(&mut TestInstance) -> TestResult + 'static,
    ) {
        self.declare_example(description, Location::caller(), Rc::new(body));
    }

    /// Alias of [`TestClass::example`].
    #[track_caller]
    pub fn it(
        &self,
        description: &str,
        body: impl Fn(&mut TestInstance) -> TestResult + 'static,
    ) {
        self.declare_example(description, Location::caller(), Rc::new(body));
    }

    /// Alias of [`TestClass::example`].
    #[track_caller]
    pub fn specify(
        &self,
        description: &str,
        body: impl Fn(&mut TestInstance) -> TestResult + 'static,
    ) {
        self.declare_example(description, Location::caller(), Rc::new(body));
    }

    /// Register an additional name for the fluent entry point. Subclasses
    /// inherit the alias.
    pub fn alias_example_to(&self, alias: &str) {
        let mut state = self.inner.state.borrow_mut();
        if !state.aliases.iter().any(|known| known == alias) {
            state.aliases.push(alias.to_owned());
        }
    }

    /// Whether `alias` names the fluent entry point on this class.
    #[must_use]
    pub fn is_example_alias(&self, alias: &str) -> bool {
        BUILTIN_EXAMPLE_ALIASES.contains(&alias)
            || self.ancestry().iter().any(|class| {
                class
                    .inner
                    .state
                    .borrow()
                    .aliases
                    .iter()
                    .any(|known| known == alias)
            })
    }

    /// Declare an example through a named alias of the fluent entry point.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::UnknownAlias`] when `alias` is neither a
    /// built-in alias nor registered with [`TestClass::alias_example_to`].
    #[track_caller]
    pub fn declare_with(
        &self,
        alias: &str,
        description: &str,
        body: impl Fn(&mut TestInstance) -> TestResult + 'static,
    ) -> Result<(), DeclarationError> {
        if !self.is_example_alias(alias) {
            return Err(DeclarationError::UnknownAlias {
                alias: alias.to_owned(),
                class: self.description(),
            });
        }
        self.declare_example(description, Location::caller(), Rc::new(body));
        Ok(())
    }

    fn declare_example(&self, description: &str, location: Location, body: MethodBody) {
        let mut state = self.inner.state.borrow_mut();
        let info = state.pending.take();
        log::debug!("{}: declared example '{description}' at {location}", self.description());
        let example = DeclaredExample {
            description: description.to_owned(),
            location,
            info,
            body,
        };
        match state
            .declared
            .iter_mut()
            .find(|existing| existing.description == description)
        {
            Some(existing) => *existing = example,
            None => state.declared.push(example),
        }
    }

    pub(crate) fn declared_examples(&self) -> Vec<DeclaredExample> {
        self.inner.state.borrow().declared.clone()
    }

    /// Register a hook run after setup and before each example body.
    pub fn before(&self, hook: impl Fn(&mut TestInstance) -> TestResult + 'static) {
        self.inner.state.borrow_mut().before.push(Rc::new(hook));
    }

    /// Register a hook run after each example body and before teardown.
    pub fn after(&self, hook: impl Fn(&mut TestInstance) -> TestResult + 'static) {
        self.inner.state.borrow_mut().after.push(Rc::new(hook));
    }

    /// Before hooks along the hierarchy, ancestor-most first.
    pub(crate) fn before_hooks(&self) -> Vec<MethodBody> {
        let mut chain = self.ancestry();
        chain.reverse();
        chain
            .iter()
            .flat_map(|class| class.inner.state.borrow().before.clone())
            .collect()
    }

    /// After hooks along the hierarchy, nearest first; within one class the
    /// last registered hook runs first.
    pub(crate) fn after_hooks(&self) -> Vec<MethodBody> {
        self.ancestry()
            .iter()
            .flat_map(|class| {
                let mut hooks = class.inner.state.borrow().after.clone();
                hooks.reverse();
                hooks
            })
            .collect()
    }

    /// Merge key/values into the class record.
    ///
    /// Computed keys (`description`, `file_path`, `line_number`, `location`,
    /// `test_unit`, `block`, `describes`) are ignored with a warning.
    pub fn test_case_info(&self, info: Metadata) {
        let description = self.description();
        let mut state = self.inner.state.borrow_mut();
        for (key, value) in info {
            if keys::CLASS_RESERVED.contains(&key.as_str()) {
                log::warn!("{description}: ignoring reserved class metadata key `{key}`");
                continue;
            }
            state.info.insert(key, value);
        }
    }

    /// Alias of [`TestClass::test_case_info`].
    pub fn set_class_metadata(&self, info: Metadata) {
        self.test_case_info(info);
    }

    /// Stage metadata for the next qualifying declaration on this class.
    pub fn test_info(&self, info: Metadata) {
        let description = self.description();
        self.inner.state.borrow_mut().pending.stage(info, &description);
    }

    /// Alias of [`TestClass::test_info`].
    pub fn declare_pending_info(&self, info: Metadata) {
        self.test_info(info);
    }

    /// The class record: computed keys followed by class metadata inherited
    /// from ancestors and declared on this class.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        let location = self.location();
        let mut record = Metadata::new();
        record.insert(keys::DESCRIPTION, self.description());
        record.insert(keys::FILE_PATH, location.file());
        record.insert(keys::LINE_NUMBER, location.line());
        record.insert(keys::LOCATION, location.to_string());
        record.insert(keys::TEST_UNIT, true);
        record.insert(keys::BLOCK, MetaValue::Nil);
        record.insert(keys::DESCRIBES, MetaValue::Nil);
        let mut chain = self.ancestry();
        chain.reverse();
        for class in chain {
            record.merge(&class.inner.state.borrow().info);
        }
        record
    }

    /// Examples of this class, recomputed from the current declarations.
    #[must_use]
    pub fn examples(&self) -> Vec<Example> {
        discovery::examples(self)
    }

    /// Where `name` was first declared along the resolution order.
    #[must_use]
    pub fn find_definition(&self, name: &str) -> Option<Location> {
        location::find_definition(self, name)
    }

    /// Every declaration site of `name`, nearest first.
    #[must_use]
    pub fn find_caller_lines(&self, name: &str) -> Vec<Location> {
        location::find_caller_lines(self, name)
    }

    /// Build instance subjects with `T::default()`.
    pub fn set_subject<T: Default + Any>(&self) {
        self.set_subject_factory(Rc::new(|| Box::new(T::default()) as Box<dyn Any>));
    }

    /// Build instance subjects with a custom factory.
    pub fn set_subject_factory(&self, factory: SubjectFactory) {
        self.inner.state.borrow_mut().factory = Some(factory);
    }

    /// Convert this class's subject into the superclass's subject type.
    pub fn set_upcast(&self, upcast: Upcast) {
        self.inner.state.borrow_mut().upcast = Some(upcast);
    }

    pub(crate) fn has_own_subject(&self) -> bool {
        self.inner.state.borrow().factory.is_some()
    }

    /// Convert a shared borrow of this class's subject into the
    /// superclass's subject type.
    pub fn set_upcast_ref(&self, upcast: UpcastRef) {
        self.inner.state.borrow_mut().upcast_ref = Some(upcast);
    }

    pub(crate) fn upcast(&self) -> Option<Upcast> {
        self.inner.state.borrow().upcast
    }

    pub(crate) fn upcast_ref(&self) -> Option<UpcastRef> {
        self.inner.state.borrow().upcast_ref
    }

    /// Build a subject with the nearest factory, returning the class that
    /// owns it.
    pub(crate) fn build_subject(&self) -> Option<(Self, Box<dyn Any>)> {
        self.ancestry().into_iter().find_map(|class| {
            let factory = class.inner.state.borrow().factory.clone();
            factory.map(|factory| (class, factory()))
        })
    }

    /// Run every example with setup/teardown bracketing.
    pub fn run_all(&self, reporter: Option<&mut dyn Reporter>) -> RunSummary {
        let runner = Runner::new(self);
        match reporter {
            Some(reporter) => runner.reporter(reporter).run(),
            None => runner.run(),
        }
    }

    /// `[self, superclass, ..., root]`.
    pub(crate) fn ancestry(&self) -> Vec<Self> {
        let mut chain = Vec::new();
        let mut current = Some(self.clone());
        while let Some(class) = current {
            current = class.superclass();
            chain.push(class);
        }
        chain
    }
}

impl PartialEq for TestClass {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TestClass {}

impl fmt::Debug for TestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TestClass").field(&self.description()).finish()
    }
}

/// One entry of a class's method-resolution order.
#[derive(Clone, Debug)]
pub(crate) enum MethodSource {
    Class(TestClass),
    Module(TestModule),
}

impl MethodSource {
    pub(crate) fn method(&self, name: &str) -> Option<MethodDef> {
        match self {
            Self::Class(class) => class.own_method(name),
            Self::Module(module) => module.own_method(name),
        }
    }

    pub(crate) fn definitions(&self) -> Vec<MethodDef> {
        match self {
            Self::Class(class) => class.own_methods(),
            Self::Module(module) => module.own_methods(),
        }
    }
}

#[cfg(test)]
mod tests;
