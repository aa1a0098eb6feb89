//! Unit tests for class declaration, resolution and metadata.

use rstest::{fixture, rstest};

use super::*;
use crate::metadata;
use crate::world::World;

#[fixture]
fn world() -> World {
    World::new()
}

fn names(class: &TestClass) -> Vec<String> {
    class
        .examples()
        .iter()
        .map(|example| example.description().to_owned())
        .collect()
}

#[rstest]
fn ancestors_exclude_the_root(world: World) {
    let a = world.test_case().anonymous_subclass();
    let b = a.anonymous_subclass();
    assert_eq!(b.ancestors(), vec![b.clone(), a]);
    assert!(world.test_case().ancestors().is_empty());
}

#[rstest]
fn descriptions_fall_back_to_placeholders(world: World) {
    assert_eq!(world.test_case().description(), ROOT_DESCRIPTION);
    assert_eq!(world.test_case().anonymous_subclass().description(), ANONYMOUS_DESCRIPTION);
    let Ok(named) = world.test_case().subclass("Named") else {
        panic!("fresh name must declare");
    };
    assert_eq!(named.description(), "Named");
}

#[rstest]
fn reopening_returns_the_same_class(world: World) {
    let Ok(first) = world.test_case().subclass("Foo") else {
        panic!("fresh name must declare");
    };
    let Ok(again) = world.test_case().subclass("Foo") else {
        panic!("reopening must succeed");
    };
    assert_eq!(first, again);
    assert_eq!(first.location(), again.location());
    assert_eq!(world.example_groups().len(), 1);
}

#[rstest]
fn reopening_under_another_superclass_fails(world: World) {
    let Ok(base) = world.test_case().subclass("Base") else {
        panic!("fresh name must declare");
    };
    let Ok(_) = world.test_case().subclass("Foo") else {
        panic!("fresh name must declare");
    };
    assert_eq!(
        base.subclass("Foo"),
        Err(DeclarationError::SuperclassMismatch { name: "Foo".into() })
    );
}

#[rstest]
fn pending_info_is_consumed_by_one_qualifying_method(world: World) {
    let foo = world.test_case().anonymous_subclass();
    foo.test_info(metadata! { "foo" => "bar" });
    foo.define("helper", |_| Ok(()));
    assert!(foo.inner.state.borrow().pending.is_staged());
    foo.define("test_a", |_| Ok(()));
    foo.define("test_b", |_| Ok(()));
    assert!(!foo.inner.state.borrow().pending.is_staged());

    let examples = foo.examples();
    let stamped: Vec<_> = examples
        .iter()
        .map(|example| example.metadata().get("foo").cloned())
        .collect();
    assert_eq!(stamped, vec![Some(MetaValue::from("bar")), None]);
}

#[rstest]
fn pending_info_is_class_local(world: World) {
    let parent = world.test_case().anonymous_subclass();
    let child = parent.anonymous_subclass();
    parent.test_info(metadata! { "tag" => "parent" });
    child.define("test_child", |_| Ok(()));
    assert!(parent.inner.state.borrow().pending.is_staged());
    let examples = child.examples();
    let Some(example) = examples.first() else {
        panic!("test_child must be discovered");
    };
    assert_eq!(example.metadata().get("tag"), None);
}

#[rstest]
fn reserved_class_keys_are_ignored(world: World) {
    let foo = world.test_case().anonymous_subclass();
    foo.test_case_info(metadata! { "description" => "hijack", "team" => "core" });
    let record = foo.metadata();
    assert_eq!(record.get(keys::DESCRIPTION), Some(&MetaValue::from(ANONYMOUS_DESCRIPTION)));
    assert_eq!(record.get("team"), Some(&MetaValue::from("core")));
}

#[rstest]
fn class_metadata_merges_along_the_hierarchy(world: World) {
    let parent = world.test_case().anonymous_subclass();
    parent.test_case_info(metadata! { "team" => "core", "slow" => false });
    let child = parent.anonymous_subclass();
    child.test_case_info(metadata! { "slow" => true });
    let record = child.metadata();
    assert_eq!(record.get("team"), Some(&MetaValue::from("core")));
    assert_eq!(record.get("slow"), Some(&MetaValue::Bool(true)));
    assert_eq!(record.get(keys::TEST_UNIT), Some(&MetaValue::Bool(true)));
}

#[rstest]
fn modules_resolve_before_superclasses(world: World) {
    let parent = world.test_case().anonymous_subclass();
    parent.define("test_shared", |_| Ok(()));
    let first = TestModule::new("First");
    let second = TestModule::new("Second");
    first.define("test_shared", |_| Ok(()));
    second.define("test_shared", |_| Ok(()));
    let child = parent.anonymous_subclass();
    child.include(&first);
    child.include(&second);
    child.include(&first);

    let order: Vec<_> = child
        .method_resolution_order()
        .into_iter()
        .map(|source| match source {
            MethodSource::Class(class) => class.description(),
            MethodSource::Module(module) => module.description(),
        })
        .collect();
    assert_eq!(
        order,
        [ANONYMOUS_DESCRIPTION, "Second", "First", ANONYMOUS_DESCRIPTION, ROOT_DESCRIPTION]
    );
    assert_eq!(child.find_caller_lines("test_shared").len(), 3);
    assert_eq!(
        child.find_definition("test_shared"),
        second.own_method("test_shared").map(|def| def.location())
    );
}

#[rstest]
fn overrides_keep_the_inherited_position(world: World) {
    let parent = world.test_case().anonymous_subclass();
    parent.define("test_a", |_| Ok(()));
    parent.define("test_b", |_| Ok(()));
    let child = parent.anonymous_subclass();
    child.define("test_c", |_| Ok(()));
    child.define("test_a", |_| crate::flunk("overridden"));

    assert_eq!(names(&child), ["test_a", "test_b", "test_c"]);
    let summary = child.run_all(None);
    assert_eq!(summary.failed().count(), 1);
    assert_eq!(
        child.find_definition("test_a"),
        child.own_method("test_a").map(|def| def.location())
    );
}

#[rstest]
fn late_superclass_methods_are_discovered(world: World) {
    let parent = world.test_case().anonymous_subclass();
    let child = parent.anonymous_subclass();
    assert!(child.examples().is_empty());
    parent.define("test_late", |_| Ok(()));
    assert_eq!(names(&child), ["test_late"]);
}

#[rstest]
fn fluent_examples_follow_method_examples(world: World) {
    let foo = world.test_case().anonymous_subclass();
    foo.it("adds numbers", |_| Ok(()));
    foo.define("test_method", |_| Ok(()));
    foo.specify("adds numbers", |_| crate::flunk("replaced"));
    assert_eq!(names(&foo), ["test_method", "adds numbers"]);
    let kinds: Vec<_> = foo.examples().iter().map(crate::Example::kind).collect();
    assert_eq!(kinds, [crate::ExampleKind::TestMethod, crate::ExampleKind::Declared]);
}

#[rstest]
fn custom_aliases_are_inherited(world: World) {
    let parent = world.test_case().anonymous_subclass();
    parent.alias_example_to("scenario");
    let child = parent.anonymous_subclass();
    assert!(child.is_example_alias("scenario"));
    assert!(child.is_example_alias("it"));
    assert!(child.declare_with("scenario", "checks out", |_| Ok(())).is_ok());
    assert_eq!(
        child.declare_with("make_test", "nope", |_| Ok(())),
        Err(DeclarationError::UnknownAlias {
            alias: "make_test".into(),
            class: ANONYMOUS_DESCRIPTION.into(),
        })
    );
    assert_eq!(names(&child), ["checks out"]);
}

#[rstest]
fn hooks_order_along_the_hierarchy(world: World) {
    let parent = world.test_case().anonymous_subclass();
    let child = parent.anonymous_subclass();
    parent.before(|instance| {
        instance.set("order", vec!["parent before"]);
        Ok(())
    });
    child.before(|instance| {
        if let Some(order) = instance.get_mut::<Vec<&str>>("order") {
            order.push("child before");
        }
        Ok(())
    });
    assert_eq!(child.before_hooks().len(), 2);
    child.after(|_| Ok(()));
    parent.after(|_| Ok(()));
    assert_eq!(child.after_hooks().len(), 2);
}
