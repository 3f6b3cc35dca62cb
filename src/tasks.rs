use super::*;

type TaskBody = dyn FnOnce(&mut DispatchContext<'_>, &mut dyn ScriptHost) -> Result<()>;

/// A deferred unit of work. It runs later, once, with the page's dispatch
/// environment.
pub struct QueuedTask {
    label: String,
    run: Box<TaskBody>,
}

impl QueuedTask {
    pub fn new(
        label: &str,
        run: impl FnOnce(&mut DispatchContext<'_>, &mut dyn ScriptHost) -> Result<()> + 'static,
    ) -> Self {
        Self {
            label: label.to_string(),
            run: Box::new(run),
        }
    }

    /// A task that builds a fresh event when it runs and dispatches it once at
    /// `target`.
    pub fn dispatch_event(
        label: &str,
        target: TargetId,
        build: impl FnOnce(&QuirkPolicy, i64) -> EventRecord + 'static,
    ) -> Self {
        Self::new(label, move |ctx, host| {
            let mut event = build(ctx.quirks(), ctx.now_ms());
            ctx.dispatch(host, &mut event, target)?;
            Ok(())
        })
    }

    /// `message` event delivery, as queued by `postMessage`.
    pub fn message(target: TargetId, data: Value) -> Self {
        Self::dispatch_event("message", target, move |quirks, now_ms| {
            EventRecord::with_init("message", EventInit::new(false, false), quirks, now_ms)
                .with_data(data)
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn run(self, ctx: &mut DispatchContext<'_>, host: &mut dyn ScriptHost) -> Result<()> {
        (self.run)(ctx, host)
    }
}

impl fmt::Debug for QueuedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedTask")
            .field("label", &self.label)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct FifoTaskQueue {
    queue: VecDeque<QueuedTask>,
}

impl FifoTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.queue.iter().map(|task| task.label.clone()).collect()
    }
}

impl TaskQueue for FifoTaskQueue {
    fn enqueue(&mut self, task: QueuedTask) {
        self.queue.push_back(task);
    }

    fn next_task(&mut self) -> Option<QueuedTask> {
        self.queue.pop_front()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
