//! Behavioural tests for classes declared with `#[test_case]`.

use std::cell::Cell;

use derive_more::{Deref, DerefMut};
use xunit_bdd::{
    ExampleKind, MetaValue, TestCase, TestClass, TestInstance, TestResult, World, assert_equal,
    assert_some, assert_that,
};
use xunit_bdd_macros::test_case;

#[derive(Default)]
struct Calculator {
    total: i64,
}

#[test_case(info(area = "arithmetic"))]
impl Calculator {
    pub fn setup(&mut self) {
        self.total = 1;
    }

    pub fn test_add(&mut self) -> TestResult {
        self.total += 1;
        assert_equal(2, self.total)
    }

    #[test_info(slow, owner = "maths")]
    pub fn test_double(&mut self) -> TestResult {
        self.total *= 2;
        assert_equal(2, self.total())
    }

    pub fn test_with_defaults(&self, label: Option<&str>, rest: &[u8]) -> TestResult {
        assert_that(label.is_none() && rest.is_empty(), "called with defaults")
    }

    pub fn test_needs_input(&self, input: i64) -> TestResult {
        assert_equal(input, self.total)
    }

    pub(crate) fn test_protected(&self) {}

    fn test_private(&self) {}

    pub fn teardown(instance: &mut TestInstance) -> TestResult {
        assert_that(instance.example_description().is_some(), "teardown runs inside an example")
    }

    fn total(&self) -> i64 {
        self.total
    }
}

#[derive(Default, Deref, DerefMut)]
struct Scientific {
    #[deref]
    #[deref_mut]
    calculator: Calculator,
    memory: i64,
}

fn declare_fluent(class: &TestClass) {
    class.it("remembers the total", |instance| {
        let scientific = instance
            .subject_mut::<Scientific>()
            .ok_or_else(|| xunit_bdd::Failure::error("no scientific calculator"))?;
        scientific.memory = scientific.total;
        assert_equal(1, scientific.memory)
    });
}

#[test_case(extends = Calculator, name = "ScientificCalculator", configure = declare_fluent)]
impl Scientific {
    pub fn test_square(&mut self) -> TestResult {
        let total = self.total;
        self.total = total * total;
        assert_equal(1, self.total)
    }
}

#[derive(Default)]
struct Inventory {
    items: Vec<String>,
}

#[test_case]
impl Inventory {
    pub fn new() -> Self {
        Self {
            items: vec!["bolt".to_owned()],
        }
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    fn first(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    pub fn add(&mut self, item: Option<&str>) -> &mut Self {
        self.items.push(item.unwrap_or("nut").to_owned());
        self
    }

    fn check_empty(&self) -> Result<(), String> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(format!("{} item(s) left", self.items.len()))
        }
    }

    pub fn test_starts_empty(&self) -> TestResult {
        assert_equal(0, self.count())
    }

    pub fn test_added_items_are_counted(instance: &mut TestInstance) -> TestResult {
        instance.invoke("add")?;
        instance.invoke("add")?;
        let inventory = assert_some(instance.subject::<Self>(), "no inventory")?;
        assert_equal(2, inventory.count())?;
        assert_equal(Some("nut"), inventory.first())
    }
}

thread_local! {
    static UNBALANCED: Cell<bool> = const { Cell::new(false) };
}

#[derive(Default)]
struct Ledger {
    balance: i64,
}

#[test_case]
impl Ledger {
    pub fn test_balances(&self) -> TestResult {
        let expected = i64::from(UNBALANCED.get());
        assert_equal(expected, self.balance)
    }
}

fn load<T: TestCase>(world: &World) -> TestClass {
    match world.load::<T>() {
        Ok(class) => class,
        Err(error) => panic!("{} should load: {error}", T::NAME),
    }
}

fn descriptions(class: &TestClass) -> Vec<String> {
    class
        .examples()
        .iter()
        .map(|example| example.description().to_owned())
        .collect()
}

#[test]
fn methods_are_classified_like_class_methods() {
    let world = World::new();
    let calculator = load::<Calculator>(&world);
    assert_eq!(calculator.description(), "Calculator");
    assert_eq!(
        descriptions(&calculator),
        ["test_add", "test_double", "test_with_defaults"]
    );
}

#[test]
fn attribute_metadata_reaches_examples() {
    let world = World::new();
    let calculator = load::<Calculator>(&world);
    let examples = calculator.examples();
    let owners: Vec<_> = examples
        .iter()
        .map(|example| example.metadata().get("owner").cloned())
        .collect();
    assert_eq!(owners, [None, Some(MetaValue::from("maths")), None]);
    assert!(
        examples
            .iter()
            .all(|example| example.metadata().get("area") == Some(&MetaValue::from("arithmetic")))
    );
    assert!(examples.iter().all(|example| example.location().file() == file!()));
}

#[test]
fn subclasses_inherit_methods_through_deref() {
    let world = World::new();
    let scientific = load::<Scientific>(&world);
    assert_eq!(scientific.description(), "ScientificCalculator");
    assert_eq!(
        descriptions(&scientific),
        [
            "test_add",
            "test_double",
            "test_with_defaults",
            "test_square",
            "remembers the total",
        ]
    );
    let kinds: Vec<_> = scientific.examples().iter().map(xunit_bdd::Example::kind).collect();
    assert_eq!(kinds.last(), Some(&ExampleKind::Declared));

    let summary = scientific.run_all(None);
    assert!(summary.is_success(), "{:?}", summary.records());
    assert_eq!(summary.len(), 5);
}

#[test]
fn loading_is_idempotent_and_parents_come_first() {
    let world = World::new();
    let scientific = load::<Scientific>(&world);
    let calculator = load::<Calculator>(&world);
    assert_eq!(scientific.superclass(), Some(calculator.clone()));
    assert_eq!(world.example_groups(), [calculator, scientific]);

    let Ok(all) = world.load_registered() else {
        panic!("every registration should load");
    };
    assert_eq!(all.len(), 4);
}

#[test]
fn uncallable_methods_report_their_arity() {
    let world = World::new();
    let calculator = load::<Calculator>(&world);
    let mut instance = TestInstance::new(&calculator);
    let Err(failure) = instance.invoke("test_needs_input") else {
        panic!("a method with a required parameter cannot be invoked bare");
    };
    assert!(failure.message().contains("requires 1 argument(s)"));
    assert!(instance.invoke("test_protected").is_ok());
}

#[test]
fn helpers_returning_values_are_registered_but_not_examples() {
    let world = World::new();
    let inventory = load::<Inventory>(&world);
    assert_eq!(
        descriptions(&inventory),
        ["test_starts_empty", "test_added_items_are_counted"]
    );
    assert!(inventory.find_definition("count").is_some());

    let mut instance = TestInstance::new(&inventory);
    for helper in ["new", "count", "first", "check_empty", "add"] {
        assert!(instance.invoke(helper).is_ok(), "{helper} should be invocable");
    }
    let Err(failure) = instance.invoke("check_empty") else {
        panic!("a non-empty inventory fails the check");
    };
    assert_eq!(failure.message(), "1 item(s) left");
    assert!(!failure.is_assertion());

    let summary = inventory.run_all(None);
    assert!(summary.is_success(), "{:?}", summary.records());
}

#[test]
fn generated_entry_point_passes_for_passing_classes() {
    xunit_bdd::run_registered::<Scientific>();
}

#[test]
#[should_panic(expected = "1 of 1 example(s) failed")]
fn generated_entry_point_panics_on_failed_examples() {
    UNBALANCED.set(true);
    xunit_bdd::run_registered::<Ledger>();
}
