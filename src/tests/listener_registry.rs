use super::*;

fn named(name: &str) -> ScriptFunction {
    ScriptFunction::native(name, |_call| Ok(Value::Undefined))
}

fn names(listeners: &[ScriptFunction]) -> Vec<&str> {
    listeners.iter().map(ScriptFunction::name).collect()
}

#[test]
fn add_listener_rejects_duplicates_per_capture_list() {
    let mut registry = ListenerRegistry::new();
    let f = named("f");

    assert!(registry.add_listener("click", Some(f.clone()), false));
    assert!(!registry.add_listener("click", Some(f.clone()), false));
    assert!(registry.add_listener("click", Some(f.clone()), true));
    assert!(!registry.add_listener("CLICK", Some(f.clone()), true));

    assert_eq!(registry.get_listeners("click", false).len(), 1);
    assert_eq!(registry.get_listeners("click", true).len(), 1);
}

#[test]
fn identity_is_by_function_object_not_by_name() {
    let mut registry = ListenerRegistry::new();
    assert!(registry.add_listener("click", Some(named("same")), false));
    assert!(registry.add_listener("click", Some(named("same")), false));
    assert_eq!(registry.get_listeners("click", false).len(), 2);
}

#[test]
fn absent_callable_is_reported_added_without_registering() {
    let mut registry = ListenerRegistry::new();
    assert!(registry.add_listener("click", None, false));
    assert!(!registry.has_any_registration("click"));
    assert!(registry.event_types().is_empty());

    let mut targets = EventTargets::new();
    assert!(targets.add_listener(TargetId(4), "click", None, true));
    assert!(!targets.has_any_registration(TargetId(4), "click"));
    assert!(targets.get_listeners(TargetId(4), "click", true).is_empty());
}

#[test]
fn listeners_keep_insertion_order_and_removal_is_exact() {
    let mut registry = ListenerRegistry::new();
    let a = named("a");
    let b = named("b");
    let c = named("c");
    for f in [&a, &b, &c] {
        registry.add_listener("input", Some(f.clone()), false);
    }
    registry.add_listener("input", Some(b.clone()), true);

    registry.remove_listener("input", &b, false);
    assert_eq!(names(&registry.get_listeners("input", false)), ["a", "c"]);
    assert_eq!(names(&registry.get_listeners("input", true)), ["b"]);

    registry.remove_listener("input", &b, false);
    registry.remove_listener("unknown", &a, false);
    assert_eq!(names(&registry.get_listeners("input", false)), ["a", "c"]);
}

#[test]
fn get_listeners_returns_a_snapshot() {
    let mut registry = ListenerRegistry::new();
    registry.add_listener("click", Some(named("a")), false);
    let snapshot = registry.get_listeners("click", false);
    registry.add_listener("click", Some(named("b")), false);
    assert_eq!(names(&snapshot), ["a"]);
    assert!(registry.get_listeners("keyup", false).is_empty());
}

#[test]
fn handler_slot_replaces_and_counts_as_registration() {
    let mut registry = ListenerRegistry::new();
    let first = named("first");
    let second = named("second");

    registry.set_handler("click", Some(EventHandler::Attribute(first.clone())));
    assert!(registry.has_any_registration("Click"));
    registry.set_handler("click", Some(EventHandler::Property(second.clone())));
    assert_eq!(
        registry.get_handler("click"),
        Some(EventHandler::Property(second))
    );

    registry.set_handler("click", None);
    assert_eq!(registry.get_handler("click"), None);
    assert!(!registry.has_any_registration("click"));
}

#[test]
fn handler_value_assignment_clears_on_non_functions() {
    let mut registry = ListenerRegistry::new();
    let f = named("f");
    registry.set_handler_value("submit", Value::from(f.clone()));
    assert_eq!(registry.get_handler("submit"), Some(EventHandler::Property(f)));

    registry.set_handler_value("submit", Value::from("alert(1)"));
    assert_eq!(registry.get_handler("submit"), None);
}

#[test]
fn merge_appends_missing_listeners_and_fills_empty_handler() {
    let shared = named("shared");
    let extra = named("extra");
    let source_handler = named("source-handler");
    let own_handler = named("own-handler");

    let mut source = ListenerRegistry::new();
    source.add_listener("click", Some(shared.clone()), false);
    source.add_listener("click", Some(extra.clone()), false);
    source.add_listener("focus", Some(extra.clone()), true);
    source.set_handler("click", Some(EventHandler::Property(source_handler.clone())));
    source.set_handler("blur", Some(EventHandler::Property(source_handler.clone())));

    let mut destination = ListenerRegistry::new();
    destination.add_listener("click", Some(shared.clone()), false);
    destination.set_handler("click", Some(EventHandler::Attribute(own_handler.clone())));

    source.merge_into(&mut destination);

    assert_eq!(
        names(&destination.get_listeners("click", false)),
        ["shared", "extra"]
    );
    assert_eq!(names(&destination.get_listeners("focus", true)), ["extra"]);
    assert_eq!(
        destination.get_handler("click"),
        Some(EventHandler::Attribute(own_handler))
    );
    assert_eq!(
        destination.get_handler("blur"),
        Some(EventHandler::Property(source_handler))
    );
    assert_eq!(destination.event_types(), ["blur", "click", "focus"]);
}

#[test]
fn copied_registry_is_independent_of_its_source() -> Result<()> {
    let mut page = Page::new();
    let tree = page.tree();
    let original = tree.append_element(page.document(), "div")?;
    let clone = tree.create_element("div");
    let log = call_log();
    let listener = recorder(&log, "listener");

    page.add_event_listener(original, "click", Some(listener.clone()), false)?;
    page.copy_listeners(original, clone)?;
    page.remove_event_listener(original, "click", &listener, false)?;

    assert!(!page.has_any_registration(original, "click"));
    assert!(page.has_any_registration(clone, "click"));

    page.fire(clone, "click")?;
    page.fire(original, "click")?;
    assert_eq!(entries(&log), ["listener"]);
    Ok(())
}

#[test]
fn copying_an_empty_registry_clears_the_destination() -> Result<()> {
    let mut page = Page::new();
    let tree = page.tree();
    let empty = tree.create_element("p");
    let busy = tree.create_element("p");
    page.add_event_listener(busy, "click", Some(named("f")), true)?;

    page.copy_listeners(empty, busy)?;

    assert!(!page.has_any_registration(busy, "click"));
    assert!(page.targets().registry(busy).is_none());
    Ok(())
}

#[test]
fn merging_into_itself_changes_nothing() -> Result<()> {
    let mut page = Page::new();
    let node = page.tree().create_element("div");
    page.add_event_listener(node, "click", Some(named("f")), false)?;
    page.merge_listeners(node, node)?;
    assert_eq!(page.targets().get_listeners(node, "click", false).len(), 1);
    Ok(())
}

#[test]
fn page_rejects_registration_on_unknown_targets() {
    let mut page = Page::new();
    assert_eq!(
        page.add_event_listener(TargetId(77), "click", Some(named("f")), false),
        Err(Error::UnknownTarget("target-77".into()))
    );
    assert!(page.copy_listeners(page.window(), TargetId(78)).is_err());
}

#[test]
fn forget_drops_a_targets_registry() {
    let mut targets = EventTargets::new();
    targets.add_listener(TargetId(2), "click", Some(named("f")), false);
    assert!(targets.has_any_registration(TargetId(2), "click"));
    targets.forget(TargetId(2));
    assert!(!targets.has_any_registration(TargetId(2), "click"));
}
