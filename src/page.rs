use super::*;

const STACK_GROW_BYTES: usize = 32 * 1024 * 1024;

/// A simulated page: node tree, window, listener registries, quirk table,
/// native script host and message task queue, driven from test code.
#[derive(Debug)]
pub struct Page {
    pub(crate) tree: Rc<NodeTree>,
    pub(crate) targets: EventTargets,
    pub(crate) quirks: QuirkPolicy,
    pub(crate) host: NativeHost,
    pub(crate) tasks: FifoTaskQueue,
    pub(crate) trace_state: TraceState,
    pub(crate) now_ms: i64,
    pub(crate) task_step_limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self::with_quirks(QuirkPolicy::modern())
    }

    pub fn with_profile(profile: BrowserProfile) -> Self {
        Self::with_quirks(QuirkPolicy::for_profile(profile))
    }

    pub fn with_quirks(quirks: QuirkPolicy) -> Self {
        Self {
            tree: Rc::new(NodeTree::new()),
            targets: EventTargets::new(),
            quirks,
            host: NativeHost::new(),
            tasks: FifoTaskQueue::new(),
            trace_state: TraceState::default(),
            now_ms: 0,
            task_step_limit: 10_000,
        }
    }

    /// Shared handle to the tree, for building nodes and for listeners that
    /// mutate it mid-dispatch.
    pub fn tree(&self) -> Rc<NodeTree> {
        Rc::clone(&self.tree)
    }

    pub fn window(&self) -> TargetId {
        self.tree.window()
    }

    pub fn document(&self) -> TargetId {
        self.tree.document()
    }

    pub fn quirks(&self) -> &QuirkPolicy {
        &self.quirks
    }

    pub fn set_quirk(&mut self, flag: QuirkFlag, enabled: bool) {
        self.quirks.set(flag, enabled);
    }

    pub fn targets(&self) -> &EventTargets {
        &self.targets
    }

    pub fn host(&self) -> &NativeHost {
        &self.host
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Config(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        Ok(())
    }

    pub fn create_event(&self, event_type: &str) -> EventRecord {
        EventRecord::new(event_type, &self.quirks, self.now_ms)
    }

    pub fn create_event_with(&self, event_type: &str, init: EventInit) -> EventRecord {
        EventRecord::with_init(event_type, init, &self.quirks, self.now_ms)
    }

    fn ensure_target(&self, target: TargetId) -> Result<()> {
        if self.tree.contains(target) {
            Ok(())
        } else {
            Err(Error::UnknownTarget(target.to_string()))
        }
    }

    pub fn add_event_listener(
        &mut self,
        target: TargetId,
        event_type: &str,
        callable: Option<ScriptFunction>,
        use_capture: bool,
    ) -> Result<bool> {
        self.ensure_target(target)?;
        Ok(self
            .targets
            .add_listener(target, event_type, callable, use_capture))
    }

    pub fn remove_event_listener(
        &mut self,
        target: TargetId,
        event_type: &str,
        callable: &ScriptFunction,
        use_capture: bool,
    ) -> Result<()> {
        self.ensure_target(target)?;
        self.targets
            .remove_listener(target, event_type, callable, use_capture);
        Ok(())
    }

    fn handler_owner(&self, target: TargetId) -> TargetId {
        dispatch::handler_owner(&*self.tree, self.window(), target)
    }

    /// `target.on<type> = ...`; the body's handlers live on the window.
    pub fn set_handler(
        &mut self,
        target: TargetId,
        event_type: &str,
        handler: Option<EventHandler>,
    ) -> Result<()> {
        self.ensure_target(target)?;
        let owner = self.handler_owner(target);
        self.targets.set_handler(owner, event_type, handler);
        Ok(())
    }

    /// Property assignment with a script value; non-functions clear the slot.
    pub fn set_handler_value(&mut self, target: TargetId, event_type: &str, value: Value) -> Result<()> {
        self.ensure_target(target)?;
        let owner = self.handler_owner(target);
        self.targets
            .registry_mut(owner)
            .set_handler_value(event_type, value);
        Ok(())
    }

    pub fn handler(&self, target: TargetId, event_type: &str) -> Option<EventHandler> {
        self.targets
            .get_handler(self.handler_owner(target), event_type)
    }

    pub fn has_any_registration(&self, target: TargetId, event_type: &str) -> bool {
        self.targets.has_any_registration(target, event_type)
    }

    /// Listener side of `importNode`/`cloneNode`: `to` gets its own copy of
    /// `from`'s registry.
    pub fn copy_listeners(&mut self, from: TargetId, to: TargetId) -> Result<()> {
        self.ensure_target(from)?;
        self.ensure_target(to)?;
        self.targets.copy_listeners(from, to);
        Ok(())
    }

    pub fn merge_listeners(&mut self, from: TargetId, to: TargetId) -> Result<()> {
        self.ensure_target(from)?;
        self.ensure_target(to)?;
        self.targets.merge_listeners(from, to);
        Ok(())
    }

    fn with_dispatch_context<R>(
        &mut self,
        f: impl FnOnce(&mut DispatchContext<'_>, &mut NativeHost) -> Result<R>,
    ) -> Result<R> {
        let tree = Rc::clone(&self.tree);
        let mut ctx = DispatchContext::new(&*tree, &mut self.targets, &self.quirks, tree.window())
            .with_trace(&mut self.trace_state)
            .with_tasks(&mut self.tasks)
            .at_time(self.now_ms);
        f(&mut ctx, &mut self.host)
    }

    pub fn dispatch_event(&mut self, target: TargetId, event: &mut EventRecord) -> Result<DispatchOutcome> {
        self.ensure_target(target)?;
        stacker::grow(STACK_GROW_BYTES, || {
            self.with_dispatch_context(|ctx, host| ctx.dispatch(host, event, target))
        })
    }

    /// Creates an event of `event_type` with its type defaults and dispatches it.
    pub fn fire(&mut self, target: TargetId, event_type: &str) -> Result<DispatchOutcome> {
        let mut event = self.create_event(event_type);
        self.dispatch_event(target, &mut event)
    }

    pub fn post_message(&mut self, target: TargetId, data: Value) -> Result<()> {
        self.ensure_target(target)?;
        self.schedule(QueuedTask::message(target, data))
    }

    pub fn schedule(&mut self, task: QueuedTask) -> Result<()> {
        self.with_dispatch_context(|ctx, _| ctx.schedule(task))
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    pub fn pending_task_labels(&self) -> Vec<String> {
        self.tasks.labels()
    }

    pub fn set_task_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Config(
                "set_task_step_limit requires at least 1 step".into(),
            ));
        }
        self.task_step_limit = max_steps;
        Ok(())
    }

    /// Runs queued tasks in FIFO order, including tasks queued by the tasks
    /// themselves. Returns how many ran. A task error stops the drain; the
    /// remaining tasks stay queued.
    pub fn run_pending_tasks(&mut self) -> Result<usize> {
        let mut ran = 0usize;
        while let Some(task) = self.tasks.next_task() {
            if ran >= self.task_step_limit {
                let label = task.label().to_string();
                self.tasks.enqueue(task);
                return Err(Error::TaskQueue(format!(
                    "exceeded task step limit ({}) while running {label}",
                    self.task_step_limit
                )));
            }
            ran += 1;
            self.trace_state.task_line(format!(
                "[task] run {} pending={}",
                task.label(),
                self.tasks.pending()
            ));
            stacker::grow(STACK_GROW_BYTES, || {
                self.with_dispatch_context(|ctx, host| task.run(ctx, host))
            })?;
        }
        Ok(ran)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.set_enabled(enabled);
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.take_logs()
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.set_to_stderr(enabled);
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.set_events(enabled);
    }

    pub fn set_trace_tasks(&mut self, enabled: bool) {
        self.trace_state.set_tasks(enabled);
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace_state.set_log_limit(max_entries)
    }
}
