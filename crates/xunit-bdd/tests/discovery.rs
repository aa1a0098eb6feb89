//! Behavioural tests for example discovery, metadata and location lookup.

use rstest::{fixture, rstest};
use xunit_bdd::{
    ANONYMOUS_DESCRIPTION, Arity, MetaValue, MethodDef, TestClass, TestModule, Visibility, World,
    keys, metadata,
};

#[fixture]
fn world() -> World {
    World::new()
}

fn descriptions(class: &TestClass) -> Vec<String> {
    class
        .examples()
        .iter()
        .map(|example| example.description().to_owned())
        .collect()
}

#[rstest]
fn only_prefixed_methods_become_examples(world: World) {
    let foo = world.test_case().anonymous_subclass();
    foo.define("test_bar", |_| Ok(()));
    foo.define("bar", |_| Ok(()));
    foo.define("testing_is_not_a_prefix", |_| Ok(()));
    assert_eq!(descriptions(&foo), ["test_bar"]);
}

#[rstest]
#[case(Arity::new(1, 0, false), false)]
#[case(Arity::new(2, 1, true), false)]
#[case(Arity::new(0, 2, false), true)]
#[case(Arity::new(0, 0, true), true)]
#[case(Arity::new(0, 1, true), true)]
fn required_parameters_exclude_methods(world: World, #[case] arity: Arity, #[case] included: bool) {
    let foo = world.test_case().anonymous_subclass();
    foo.define_method(MethodDef::new("test_params", |_| Ok(())).with_arity(arity));
    assert_eq!(!foo.examples().is_empty(), included);
}

#[rstest]
#[case(Visibility::Public, true)]
#[case(Visibility::Protected, false)]
#[case(Visibility::Private, false)]
fn only_public_methods_are_examples(
    world: World,
    #[case] visibility: Visibility,
    #[case] included: bool,
) {
    let foo = world.test_case().anonymous_subclass();
    foo.define_method(MethodDef::new("test_vis", |_| Ok(())).with_visibility(visibility));
    assert_eq!(!foo.examples().is_empty(), included);
}

#[rstest]
fn subclass_sees_each_source_exactly_once(world: World) {
    let shared = TestModule::new("Shared");
    shared.define("test_from_module", |_| Ok(()));
    let parent = world.test_case().anonymous_subclass();
    parent.define("test_from_parent", |_| Ok(()));
    parent.include(&shared);
    let child = parent.anonymous_subclass();
    child.include(&shared);
    child.define("test_from_child", |_| Ok(()));

    let mut found = descriptions(&child);
    found.sort();
    assert_eq!(found, ["test_from_child", "test_from_module", "test_from_parent"]);
}

#[rstest]
fn methods_added_later_are_visible(world: World) {
    let parent = world.test_case().anonymous_subclass();
    let child = parent.anonymous_subclass();
    let shared = TestModule::anonymous();
    child.include(&shared);
    assert!(child.examples().is_empty());

    parent.define("test_late_parent", |_| Ok(()));
    shared.define("test_late_module", |_| Ok(()));
    assert_eq!(descriptions(&child), ["test_late_parent", "test_late_module"]);
}

#[rstest]
fn full_description_joins_class_and_method(world: World) {
    let Ok(foo) = world.test_case().subclass("Foo") else {
        panic!("Foo should declare");
    };
    foo.define("test_bar", |_| Ok(()));
    let examples = foo.examples();
    let Some(example) = examples.first() else {
        panic!("test_bar should be discovered");
    };
    assert_eq!(example.full_description(), "Foo#test_bar");
    assert_eq!(
        example.metadata().get(keys::FULL_DESCRIPTION),
        Some(&MetaValue::from("Foo#test_bar"))
    );
    let group = example.metadata().get(keys::EXAMPLE_GROUP).and_then(MetaValue::as_map);
    assert_eq!(
        group.and_then(|group| group.get(keys::DESCRIPTION)),
        Some(&MetaValue::from("Foo"))
    );
}

#[rstest]
fn pending_info_stamps_only_the_next_method(world: World) {
    let foo = world.test_case().anonymous_subclass();
    foo.declare_pending_info(metadata! { "k" => "v" });
    foo.define("test_first", |_| Ok(()));
    foo.define("test_second", |_| Ok(()));
    let stamped: Vec<bool> = foo
        .examples()
        .iter()
        .map(|example| example.metadata().contains_key("k"))
        .collect();
    assert_eq!(stamped, [true, false]);
}

#[rstest]
fn pending_info_cannot_override_identity_fields(world: World) {
    let foo = world.test_case().anonymous_subclass();
    foo.test_info(metadata! { "description" => "spoofed", "slow" => true });
    foo.define("test_real", |_| Ok(()));
    let examples = foo.examples();
    let Some(example) = examples.first() else {
        panic!("test_real should be discovered");
    };
    assert_eq!(example.description(), "test_real");
    assert_eq!(example.metadata().get(keys::DESCRIPTION), Some(&MetaValue::from("test_real")));
    assert_eq!(example.metadata().get("slow"), Some(&MetaValue::Bool(true)));
}

#[rstest]
fn anonymous_classes_have_a_placeholder_description(world: World) {
    let anonymous = world.test_case().anonymous_subclass();
    assert_eq!(
        anonymous.metadata().get(keys::DESCRIPTION),
        Some(&MetaValue::from(ANONYMOUS_DESCRIPTION))
    );
}

#[rstest]
fn ancestors_exclude_the_adapter_root(world: World) {
    let Ok(a) = world.test_case().subclass("A") else {
        panic!("A should declare");
    };
    let Ok(b) = a.subclass("B") else {
        panic!("B should declare");
    };
    assert_eq!(b.ancestors(), [b.clone(), a.clone()]);
    assert_eq!(world.example_groups(), [a, b]);
}

#[rstest]
fn location_lookup_walks_ancestors(world: World) {
    let parent = world.test_case().anonymous_subclass();
    let line = line!() + 1;
    parent.define("test_inherited", |_| Ok(()));
    let child = parent.anonymous_subclass();

    let Some(location) = child.find_definition("test_inherited") else {
        panic!("inherited method should have a location");
    };
    assert_eq!(location.file(), file!());
    assert_eq!(location.line(), line);
    assert_eq!(child.find_definition("test_nowhere"), None);
    assert!(child.find_caller_lines("test_nowhere").is_empty());
}

#[rstest]
fn example_metadata_is_a_snapshot(world: World) {
    let foo = world.test_case().anonymous_subclass();
    foo.define("test_a", |_| Ok(()));
    let before = foo.examples();
    foo.test_case_info(metadata! { "team" => "core" });
    let after = foo.examples();
    let team = |examples: &[xunit_bdd::Example]| {
        examples
            .first()
            .and_then(|example| example.metadata().get("team").cloned())
    };
    assert_eq!(team(&before), None);
    assert_eq!(team(&after), Some(MetaValue::from("core")));
}
