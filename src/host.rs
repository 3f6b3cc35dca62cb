use super::*;

/// Script host that runs the Rust closure behind each [`ScriptFunction`].
#[derive(Debug, Default)]
pub struct NativeHost {
    call_count: usize,
}

impl NativeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.call_count
    }
}

impl ScriptHost for NativeHost {
    fn invoke(&mut self, ctx: &mut DispatchContext<'_>, invocation: Invocation<'_>) -> Result<Value> {
        self.call_count += 1;
        let Invocation {
            function,
            this,
            event,
        } = invocation;
        let mut call = NativeCall {
            ctx,
            host: self,
            this,
            event,
        };
        (function.body())(&mut call)
    }
}

/// What a native callable sees while it runs: its `this` target, the event
/// (unless invoked without arguments), and the page it can re-enter.
pub struct NativeCall<'c, 'd> {
    ctx: &'c mut DispatchContext<'d>,
    host: &'c mut dyn ScriptHost,
    this: TargetId,
    event: Option<&'c mut EventRecord>,
}

impl<'c, 'd> NativeCall<'c, 'd> {
    pub fn this(&self) -> TargetId {
        self.this
    }

    pub fn event(&self) -> Option<&EventRecord> {
        self.event.as_deref()
    }

    pub fn event_mut(&mut self) -> Option<&mut EventRecord> {
        self.event.as_deref_mut()
    }

    pub fn has_event(&self) -> bool {
        self.event.is_some()
    }

    pub fn stop_propagation(&mut self) {
        if let Some(event) = self.event_mut() {
            event.stop_propagation();
        }
    }

    pub fn stop_immediate_propagation(&mut self) {
        if let Some(event) = self.event_mut() {
            event.stop_immediate_propagation();
        }
    }

    pub fn prevent_default(&mut self) {
        if let Some(event) = self.event_mut() {
            event.prevent_default();
        }
    }

    pub fn set_return_value(&mut self, value: bool) {
        if let Some(event) = self.event_mut() {
            event.set_return_value(value);
        }
    }

    pub fn context(&self) -> &DispatchContext<'d> {
        &*self.ctx
    }

    pub fn now_ms(&self) -> i64 {
        self.ctx.now_ms()
    }

    pub fn window(&self) -> TargetId {
        self.ctx.window()
    }

    pub fn add_event_listener(
        &mut self,
        target: TargetId,
        event_type: &str,
        callable: Option<ScriptFunction>,
        use_capture: bool,
    ) -> bool {
        self.ctx
            .targets_mut()
            .add_listener(target, event_type, callable, use_capture)
    }

    pub fn remove_event_listener(
        &mut self,
        target: TargetId,
        event_type: &str,
        callable: &ScriptFunction,
        use_capture: bool,
    ) {
        self.ctx
            .targets_mut()
            .remove_listener(target, event_type, callable, use_capture);
    }

    pub fn set_handler(&mut self, target: TargetId, event_type: &str, handler: Option<EventHandler>) {
        self.ctx.set_handler(target, event_type, handler);
    }

    /// Synchronous nested dispatch, e.g. `element.dispatchEvent(...)` or
    /// `element.click()` from inside a listener.
    pub fn dispatch(&mut self, target: TargetId, event: &mut EventRecord) -> Result<DispatchOutcome> {
        self.ctx.dispatch(&mut *self.host, event, target)
    }

    pub fn fire(&mut self, target: TargetId, event_type: &str) -> Result<DispatchOutcome> {
        let mut event = self.ctx.create_event(event_type);
        self.dispatch(target, &mut event)
    }

    /// Queues a `message` event for `target`; it is delivered when the page's
    /// task queue is drained, never during the current dispatch.
    pub fn post_message(&mut self, target: TargetId, data: Value) -> Result<()> {
        self.ctx.schedule(QueuedTask::message(target, data))
    }

    pub fn schedule(&mut self, task: QueuedTask) -> Result<()> {
        self.ctx.schedule(task)
    }

    pub fn throw(&self, message: &str) -> Result<Value> {
        Err(Error::ScriptRuntime(message.to_string()))
    }
}
