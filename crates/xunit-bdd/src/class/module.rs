//! Mixin modules contributing methods to the classes that include them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::TestResult;
use crate::execution::TestInstance;
use crate::location::Location;
use crate::metadata::{Metadata, PendingInfo};
use crate::method::{MethodDef, MethodTable};

const ANONYMOUS_MODULE: &str = "<Anonymous Module>";

#[derive(Default)]
struct ModuleState {
    methods: MethodTable,
    pending: PendingInfo,
}

struct ModuleInner {
    name: Option<String>,
    location: Location,
    state: RefCell<ModuleState>,
}

/// A method container mixed into classes with [`TestClass::include`].
///
/// Methods added to a module after it was included are visible to every
/// including class on the next query.
///
/// [`TestClass::include`]: crate::TestClass::include
///
/// # Examples
///
/// ```
/// use xunit_bdd::{TestModule, World};
///
/// let shared = TestModule::new("SharedChecks");
/// shared.define("test_shared", |_| Ok(()));
///
/// let world = World::new();
/// let foo = world.test_case().anonymous_subclass();
/// foo.include(&shared);
/// assert_eq!(foo.examples()[0].description(), "test_shared");
/// ```
#[derive(Clone)]
pub struct TestModule {
    inner: Rc<ModuleInner>,
}

impl TestModule {
    /// Declare a named module located at the caller.
    #[must_use]
    #[track_caller]
    pub fn new(name: &str) -> Self {
        Self::create(Some(name.to_owned()), Location::caller())
    }

    /// Declare an anonymous module located at the caller.
    #[must_use]
    #[track_caller]
    pub fn anonymous() -> Self {
        Self::create(None, Location::caller())
    }

    fn create(name: Option<String>, location: Location) -> Self {
        Self {
            inner: Rc::new(ModuleInner {
                name,
                location,
                state: RefCell::new(ModuleState::default()),
            }),
        }
    }

    /// The module name, or a placeholder when anonymous.
    #[must_use]
    pub fn description(&self) -> String {
        self.inner
            .name
            .clone()
            .unwrap_or_else(|| ANONYMOUS_MODULE.to_owned())
    }

    /// Where the module was declared.
    #[must_use]
    pub fn location(&self) -> Location {
        self.inner.location
    }

    /// Add a method; a qualifying test method consumes pending info.
    pub fn define_method(&self, mut def: MethodDef) {
        let mut state = self.inner.state.borrow_mut();
        if def.qualifies_as_test() {
            def.set_info(state.pending.take());
        }
        state.methods.insert(def);
    }

    /// Add a public method taking no parameters, located at the caller.
    #[track_caller]
    pub fn define(&self, name: &str, body: impl Fn(&mut TestInstance) -> TestResult + 'static) {
        self.define_method(MethodDef::new(name, body));
    }

    /// Stage metadata for the next qualifying method of this module.
    pub fn test_info(&self, info: Metadata) {
        let description = self.description();
        self.inner.state.borrow_mut().pending.stage(info, &description);
    }

    pub(crate) fn own_methods(&self) -> Vec<MethodDef> {
        self.inner.state.borrow().methods.definitions()
    }

    pub(crate) fn own_method(&self, name: &str) -> Option<MethodDef> {
        self.inner.state.borrow().methods.get(name).cloned()
    }
}

impl PartialEq for TestModule {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TestModule {}

impl fmt::Debug for TestModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TestModule").field(&self.description()).finish()
    }
}
