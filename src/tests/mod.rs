use super::*;

mod event_record;
mod listener_registry;

type CallLog = Rc<RefCell<Vec<String>>>;

fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

/// A callable that appends `label` to `log` and returns `value`.
fn returning(log: &CallLog, label: &str, value: Value) -> ScriptFunction {
    let log = Rc::clone(log);
    let entry = label.to_string();
    ScriptFunction::native(label, move |_call| {
        log.borrow_mut().push(entry.clone());
        Ok(value.clone())
    })
}

fn recorder(log: &CallLog, label: &str) -> ScriptFunction {
    returning(log, label, Value::Undefined)
}

/// Records `label:phase` so ordering and phase reporting can be asserted
/// together.
fn phase_recorder(log: &CallLog, label: &str) -> ScriptFunction {
    let log = Rc::clone(log);
    let entry = label.to_string();
    ScriptFunction::native(label, move |call| {
        let phase = call
            .event()
            .map(|event| event.phase().as_u16().to_string())
            .unwrap_or_else(|| "-".to_string());
        log.borrow_mut().push(format!("{entry}:{phase}"));
        Ok(Value::Undefined)
    })
}

struct Chain {
    page: Page,
    root: TargetId,
    mid: TargetId,
    leaf: TargetId,
}

/// `document > html#root > div#mid > button#leaf`
fn attached_chain(page: Page) -> Result<Chain> {
    let tree = page.tree();
    let root = tree.append_element(page.document(), "html")?;
    let mid = tree.append_element(root, "div")?;
    let leaf = tree.append_element(mid, "button")?;
    tree.set_id(root, "root")?;
    tree.set_id(mid, "mid")?;
    tree.set_id(leaf, "leaf")?;
    Ok(Chain {
        page,
        root,
        mid,
        leaf,
    })
}
