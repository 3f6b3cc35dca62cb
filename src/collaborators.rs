use super::*;

/// Read-only view of the node tree the dispatcher walks. Parent links are
/// looked up on demand and never owned by the event core.
pub trait EventTree {
    fn parent_of(&self, node: TargetId) -> Option<TargetId>;

    fn is_document_root(&self, node: TargetId) -> bool;

    /// Whether `node` takes part in dispatch of `event_type` at all
    /// (e.g. `blur` on something that cannot hold focus).
    fn handles(&self, _node: TargetId, _event_type: &str) -> bool {
        true
    }

    /// The body-equivalent node, whose handler slot belongs to the window.
    fn is_body(&self, _node: TargetId) -> bool {
        false
    }

    fn describe(&self, node: TargetId) -> String {
        node.to_string()
    }
}

/// One call the dispatcher asks the script host to perform. `event` is `None`
/// when the callable must be invoked without arguments.
#[derive(Debug)]
pub struct Invocation<'i> {
    pub function: &'i ScriptFunction,
    pub this: TargetId,
    pub event: Option<&'i mut EventRecord>,
}

pub trait ScriptHost {
    /// Runs `invocation.function`. An `Err` aborts the running dispatch and is
    /// handed back to the dispatch caller untouched.
    fn invoke(&mut self, ctx: &mut DispatchContext<'_>, invocation: Invocation<'_>) -> Result<Value>;
}

/// Deferred cross-target delivery (postMessage, MessagePort, BroadcastChannel).
pub trait TaskQueue {
    fn enqueue(&mut self, task: QueuedTask);

    fn next_task(&mut self) -> Option<QueuedTask>;

    fn pending(&self) -> usize;
}
