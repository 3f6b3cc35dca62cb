use super::*;

#[test]
fn type_defaults_follow_event_type() {
    let modern = QuirkPolicy::modern();
    let click = EventRecord::new("click", &modern, 5);
    assert!(click.bubbles());
    assert!(click.cancelable());
    assert_eq!(click.time_stamp_ms(), 5);
    assert_eq!(click.phase(), EventPhase::None);
    assert_eq!(click.target(), None);

    let change = EventRecord::new("Change", &modern, 0);
    assert!(change.bubbles());
    assert!(!change.cancelable());

    let load = EventRecord::new("load", &modern, 0);
    assert!(!load.bubbles());
    assert!(load.cancelable());

    let legacy_load = EventRecord::new(
        "load",
        &QuirkPolicy::modern().with(QuirkFlag::EventOnloadCancelableFalse),
        0,
    );
    assert!(!legacy_load.cancelable());
}

#[test]
fn explicit_init_overrides_type_defaults() {
    let quirks = QuirkPolicy::modern();
    let event = EventRecord::with_init(
        "load",
        EventInit {
            bubbles: Some(true),
            cancelable: None,
        },
        &quirks,
        0,
    );
    assert!(event.bubbles());
    assert!(event.cancelable());

    let event = EventRecord::with_init("click", EventInit::new(false, false), &quirks, 0);
    assert!(!event.bubbles());
    assert!(!event.cancelable());
}

#[test]
fn prevent_default_only_applies_to_cancelable_events() {
    let quirks = QuirkPolicy::modern();
    let mut change = EventRecord::new("change", &quirks, 0);
    change.prevent_default();
    assert!(!change.default_prevented());
    assert!(change.return_value());

    let mut click = EventRecord::new("click", &quirks, 0);
    click.prevent_default();
    assert!(click.default_prevented());
    assert!(!click.return_value());
}

#[test]
fn return_value_true_never_uncancels() {
    let mut event = EventRecord::new("submit", &QuirkPolicy::modern(), 0);
    event.set_return_value(true);
    assert!(!event.default_prevented());
    event.set_return_value(false);
    assert!(event.default_prevented());
    event.set_return_value(true);
    assert!(event.default_prevented());
    assert!(!event.return_value());
}

#[test]
fn stop_flags_and_cancel_bubble_alias() {
    let quirks = QuirkPolicy::modern();
    let mut event = EventRecord::new("click", &quirks, 0);
    assert!(!event.cancel_bubble());
    event.set_cancel_bubble(false);
    assert!(!event.propagation_stopped());
    event.set_cancel_bubble(true);
    assert!(event.propagation_stopped());
    assert!(!event.immediate_propagation_stopped());

    let mut event = EventRecord::new("click", &quirks, 0);
    event.stop_immediate_propagation();
    assert!(event.propagation_stopped());
    assert!(event.immediate_propagation_stopped());
    assert!(event.cancel_bubble());
}

#[test]
fn type_key_is_lowercase_but_type_keeps_its_spelling() {
    let event = EventRecord::new("DOMContentLoaded", &QuirkPolicy::modern(), 0);
    assert_eq!(event.event_type(), "DOMContentLoaded");
    assert_eq!(event.type_key(), "domcontentloaded");
}

#[test]
fn reinitialize_clears_flags_outside_dispatch() {
    let mut event = EventRecord::new("click", &QuirkPolicy::modern(), 0).with_data(Value::from(7i64));
    event.stop_immediate_propagation();
    event.prevent_default();
    event.target = Some(TargetId(3));

    assert!(event.reinitialize("keydown", false, false));
    assert_eq!(event.event_type(), "keydown");
    assert!(!event.bubbles());
    assert!(!event.cancelable());
    assert!(!event.propagation_stopped());
    assert!(!event.immediate_propagation_stopped());
    assert!(!event.default_prevented());
    assert_eq!(event.target(), None);
    assert_eq!(event.data(), &Value::Number(7.0));
}

#[test]
fn reinitialize_is_ignored_while_dispatching() -> Result<()> {
    let Chain { mut page, leaf, .. } = attached_chain(Page::new())?;
    let results = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&results);
    page.add_event_listener(
        leaf,
        "click",
        Some(ScriptFunction::native("reinit", move |call| {
            let event = call
                .event_mut()
                .ok_or_else(|| Error::ScriptRuntime("no event".into()))?;
            sink.borrow_mut().push(event.reinitialize("other", false, false));
            Ok(Value::Undefined)
        })),
        false,
    )?;

    let mut event = page.create_event("click");
    page.dispatch_event(leaf, &mut event)?;

    assert_eq!(results.borrow().as_slice(), [false]);
    assert_eq!(event.event_type(), "click");
    assert!(event.bubbles());
    assert!(event.reinitialize("other", false, true));
    Ok(())
}

#[test]
fn created_events_carry_page_time() -> Result<()> {
    let mut page = Page::new();
    page.advance_time(250)?;
    assert_eq!(page.create_event("click").time_stamp_ms(), 250);
    assert_eq!(
        page.advance_time(-1),
        Err(Error::Config(
            "advance_time requires non-negative milliseconds".into()
        ))
    );
    assert_eq!(page.now_ms(), 250);
    Ok(())
}

#[test]
fn value_truthiness_and_string_form() {
    assert!(!Value::Undefined.truthy());
    assert!(!Value::Null.truthy());
    assert!(!Value::from(0.0).truthy());
    assert!(!Value::Number(f64::NAN).truthy());
    assert!(!Value::from("").truthy());
    assert!(!Value::from(BigInt::from(0)).truthy());
    assert!(Value::from(BigInt::from(12)).truthy());
    assert!(Value::from("x").truthy());

    assert!(Value::Bool(false).is_false());
    assert!(!Value::from(0i64).is_false());

    assert_eq!(Value::from(3i64).as_string(), "3");
    assert_eq!(Value::from(1.5).as_string(), "1.5");
    assert_eq!(Value::Number(f64::NEG_INFINITY).as_string(), "-Infinity");
    assert_eq!(Value::from(BigInt::from(-42)).as_string(), "-42");
    let function = ScriptFunction::native("go", |_call| Ok(Value::Undefined));
    assert_eq!(
        Value::from(function).as_string(),
        "function go() { [native code] }"
    );
}
