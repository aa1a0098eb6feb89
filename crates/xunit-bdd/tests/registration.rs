//! Behavioural tests for loading hand-written registrations.

use xunit_bdd::{DeclarationError, TestCaseRegistration, TestClass, World};

fn declare_orphan(class: &TestClass) {
    class.define("test_orphaned", |_| Ok(()));
}

fn declare_standalone(class: &TestClass) {
    class.define("test_alone", |_| Ok(()));
}

xunit_bdd::submit! {
    TestCaseRegistration::new(
        "registration::Orphan",
        "Orphan",
        Some("registration::Nowhere"),
        file!(),
        line!(),
        declare_orphan,
    )
}

xunit_bdd::submit! {
    TestCaseRegistration::new(
        "registration::Standalone",
        "Standalone",
        None,
        file!(),
        line!(),
        declare_standalone,
    )
}

#[test]
fn missing_parents_are_reported() {
    let world = World::new();
    assert_eq!(
        world.load_key("registration::Orphan"),
        Err(DeclarationError::MissingParent {
            key: "registration::Orphan".into(),
            parent: "registration::Nowhere".into(),
        })
    );
    assert!(world.example_groups().is_empty());
}

#[test]
fn standalone_registrations_load_under_the_root() {
    let world = World::new();
    let Ok(class) = world.load_key("registration::Standalone") else {
        panic!("Standalone should load");
    };
    assert_eq!(class.superclass(), Some(world.test_case()));
    assert_eq!(class.location().file(), file!());
    assert!(class.run_all(None).is_success());
}

#[test]
fn load_registered_stops_at_the_first_error() {
    let world = World::new();
    assert!(matches!(
        world.load_registered(),
        Err(DeclarationError::MissingParent { .. })
    ));
}

#[test]
fn the_current_world_is_per_thread() {
    let here = World::current();
    let _ = here.test_case().anonymous_subclass();
    let elsewhere = std::thread::spawn(|| World::current().example_groups().len());
    assert_eq!(elsewhere.join().ok(), Some(0));
    assert_eq!(here.example_groups().len(), 1);
}
