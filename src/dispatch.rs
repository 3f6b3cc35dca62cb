use super::*;

const MAX_DISPATCH_DEPTH: usize = 512;

/// Result of one dispatch, used by the caller to decide whether to run the
/// default action.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// Combined return value of every callable that ran, `None` when nothing ran.
    pub result: Option<Value>,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    pub attached: bool,
    false_result_cancels: bool,
}

impl DispatchOutcome {
    pub fn is_cancelled(&self) -> bool {
        self.default_prevented
            || (self.false_result_cancels && self.result.as_ref().is_some_and(Value::is_false))
    }

    pub fn runs_default_action(&self) -> bool {
        !self.is_cancelled()
    }
}

/// Target whose registry holds `target`'s handler slot: the window for the
/// body, the target itself otherwise.
pub(crate) fn handler_owner(tree: &dyn EventTree, window: TargetId, target: TargetId) -> TargetId {
    if tree.is_body(target) {
        window
    } else {
        target
    }
}

/// Everything a dispatch needs besides the script host: the tree, the
/// listener registries, the quirk table and the page's window target.
pub struct DispatchContext<'a> {
    tree: &'a dyn EventTree,
    targets: &'a mut EventTargets,
    quirks: &'a QuirkPolicy,
    window: TargetId,
    trace: Option<&'a mut TraceState>,
    tasks: Option<&'a mut dyn TaskQueue>,
    now_ms: i64,
    depth: usize,
}

impl<'a> DispatchContext<'a> {
    pub fn new(
        tree: &'a dyn EventTree,
        targets: &'a mut EventTargets,
        quirks: &'a QuirkPolicy,
        window: TargetId,
    ) -> Self {
        Self {
            tree,
            targets,
            quirks,
            window,
            trace: None,
            tasks: None,
            now_ms: 0,
            depth: 0,
        }
    }

    pub fn with_trace(mut self, trace: &'a mut TraceState) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn with_tasks(mut self, tasks: &'a mut dyn TaskQueue) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn at_time(mut self, now_ms: i64) -> Self {
        self.now_ms = now_ms;
        self
    }

    pub fn tree(&self) -> &dyn EventTree {
        self.tree
    }

    pub fn targets(&self) -> &EventTargets {
        &*self.targets
    }

    pub fn targets_mut(&mut self) -> &mut EventTargets {
        &mut *self.targets
    }

    pub fn quirks(&self) -> &QuirkPolicy {
        self.quirks
    }

    pub fn window(&self) -> TargetId {
        self.window
    }

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn create_event(&self, event_type: &str) -> EventRecord {
        EventRecord::new(event_type, self.quirks, self.now_ms)
    }

    /// Stores a handler, routing the body's slot to the window.
    pub fn set_handler(&mut self, target: TargetId, event_type: &str, handler: Option<EventHandler>) {
        let target = self.handler_owner(target);
        self.targets.set_handler(target, event_type, handler);
    }

    pub fn handler(&self, target: TargetId, event_type: &str) -> Option<EventHandler> {
        self.targets
            .get_handler(self.handler_owner(target), event_type)
    }

    fn handler_owner(&self, target: TargetId) -> TargetId {
        handler_owner(self.tree, self.window, target)
    }

    pub fn schedule(&mut self, task: QueuedTask) -> Result<()> {
        let Some(tasks) = self.tasks.as_deref_mut() else {
            return Err(Error::TaskQueue(format!(
                "no task queue attached, cannot schedule {}",
                task.label()
            )));
        };
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.task_line(format!(
                "[task] schedule {} pending={}",
                task.label(),
                tasks.pending() + 1
            ));
        }
        tasks.enqueue(task);
        Ok(())
    }

    /// Dispatches `event` at `target`: window capture, capture down the
    /// attached ancestor chain, handler and bubbling listeners up the chain,
    /// then window bubbling.
    ///
    /// An error from a callable stops the dispatch at that point and is
    /// returned unchanged.
    pub fn dispatch(
        &mut self,
        host: &mut dyn ScriptHost,
        event: &mut EventRecord,
        target: TargetId,
    ) -> Result<DispatchOutcome> {
        if event.dispatching {
            return Err(Error::ScriptRuntime(format!(
                "{} event is already being dispatched",
                event.event_type()
            )));
        }
        if self.depth >= MAX_DISPATCH_DEPTH {
            return Err(Error::ScriptRuntime(format!(
                "maximum event dispatch depth exceeded while dispatching {}",
                event.event_type()
            )));
        }

        event.target = Some(target);
        event.dispatching = true;
        self.depth += 1;
        let result = stacker::maybe_grow(64 * 1024, 2 * 1024 * 1024, || {
            self.run_phases(host, event, target)
        });
        self.depth -= 1;
        event.dispatching = false;
        event.phase = EventPhase::None;
        event.current_target = None;

        match result {
            Ok((result, attached, status)) => {
                self.trace_event_done(event, target, status);
                Ok(DispatchOutcome {
                    result,
                    default_prevented: event.default_prevented(),
                    propagation_stopped: event.propagation_stopped(),
                    attached,
                    false_result_cancels: self.quirks.false_result_cancels(),
                })
            }
            Err(err) => {
                self.trace_event_done(event, target, "error");
                Err(err)
            }
        }
    }

    fn run_phases(
        &mut self,
        host: &mut dyn ScriptHost,
        event: &mut EventRecord,
        target: TargetId,
    ) -> Result<(Option<Value>, bool, &'static str)> {
        let event_type = event.type_key();
        let window = self.window;
        let mut outcome = None;

        if target == window {
            event.phase = EventPhase::Capturing;
            outcome = self.invoke_listeners(host, event, window, &event_type, true, outcome)?;
            if event.propagation_stopped() {
                return Ok((outcome, true, "propagation_stopped"));
            }
            event.phase = EventPhase::AtTarget;
            outcome = self.invoke_handler(host, event, window, &event_type, outcome)?;
            if event.propagation_stopped() {
                return Ok((outcome, true, "propagation_stopped"));
            }
            outcome = self.invoke_listeners(host, event, window, &event_type, false, outcome)?;
            let status = if event.propagation_stopped() {
                "propagation_stopped"
            } else {
                "completed"
            };
            return Ok((outcome, true, status));
        }

        let (path, attached) = self.propagation_path(target)?;
        let window_phases = attached || self.quirks.window_runs_when_detached();

        // Capture: window first, then the attached chain from the root down to
        // the target itself.
        if window_phases {
            event.phase = EventPhase::Capturing;
            outcome = self.invoke_listeners(host, event, window, &event_type, true, outcome)?;
            if event.propagation_stopped() {
                return Ok((outcome, attached, "propagation_stopped"));
            }
        }
        if attached {
            for node in path.iter().rev() {
                event.phase = EventPhase::Capturing;
                outcome = self.invoke_listeners(host, event, *node, &event_type, true, outcome)?;
                if event.propagation_stopped() {
                    return Ok((outcome, attached, "propagation_stopped"));
                }
            }
        }

        // Target, then bubble towards the root. A stop is only checked once
        // the node's handler step is over, so a listener that stops lets the
        // walk continue until the next node's handler step.
        let mut body_reached = false;
        for node in &path {
            let node = *node;
            if self.tree.handles(node, &event_type) {
                event.phase = if node == target {
                    EventPhase::AtTarget
                } else {
                    EventPhase::Bubbling
                };
                if self.tree.is_body(node) {
                    body_reached = true;
                } else {
                    outcome = self.invoke_handler(host, event, node, &event_type, outcome)?;
                }
                if event.propagation_stopped() {
                    return Ok((outcome, attached, "propagation_stopped"));
                }
                outcome = self.invoke_listeners(host, event, node, &event_type, false, outcome)?;
            }
            if !event.bubbles() {
                break;
            }
        }

        // Window bubbling. A stop raised anywhere earlier keeps it from
        // running. The body's handler slot lives on the window, so a
        // non-bubbling event that reached the body still runs that handler.
        if window_phases && !event.propagation_stopped() {
            if event.bubbles() {
                event.phase = EventPhase::Bubbling;
                outcome = self.invoke_handler(host, event, window, &event_type, outcome)?;
                outcome = self.invoke_listeners(host, event, window, &event_type, false, outcome)?;
            } else if body_reached {
                event.phase = EventPhase::AtTarget;
                outcome = self.invoke_handler(host, event, window, &event_type, outcome)?;
            }
        }

        let status = if !attached && !window_phases {
            "detached"
        } else if event.propagation_stopped() {
            "propagation_stopped"
        } else {
            "completed"
        };
        Ok((outcome, attached, status))
    }

    /// `target` followed by each ancestor, and whether the chain ends at a
    /// document root.
    fn propagation_path(&self, target: TargetId) -> Result<(Vec<TargetId>, bool)> {
        let mut path = vec![target];
        let mut seen = HashSet::from([target]);
        let mut cursor = target;
        loop {
            if self.tree.is_document_root(cursor) {
                return Ok((path, true));
            }
            let Some(parent) = self.tree.parent_of(cursor) else {
                return Ok((path, false));
            };
            if !seen.insert(parent) {
                return Err(Error::InvalidTree(format!(
                    "parent chain of {} loops back to {}",
                    self.tree.describe(target),
                    self.tree.describe(parent)
                )));
            }
            path.push(parent);
            cursor = parent;
        }
    }

    fn invoke_listeners(
        &mut self,
        host: &mut dyn ScriptHost,
        event: &mut EventRecord,
        node: TargetId,
        event_type: &str,
        capture: bool,
        mut outcome: Option<Value>,
    ) -> Result<Option<Value>> {
        // Snapshot: listeners added or removed while this list runs only
        // affect later dispatches.
        let listeners = self.targets.get_listeners(node, event_type, capture);
        for listener in listeners {
            event.current_target = Some(node);
            self.trace_invocation(event, node, listener.name());
            let value = host.invoke(
                self,
                Invocation {
                    function: &listener,
                    this: node,
                    event: Some(&mut *event),
                },
            )?;
            outcome = self.fold_outcome(event, outcome, value);
            if event.immediate_propagation_stopped() {
                break;
            }
        }
        Ok(outcome)
    }

    fn invoke_handler(
        &mut self,
        host: &mut dyn ScriptHost,
        event: &mut EventRecord,
        node: TargetId,
        event_type: &str,
        outcome: Option<Value>,
    ) -> Result<Option<Value>> {
        let Some(handler) = self.targets.get_handler(node, event_type) else {
            return Ok(outcome);
        };
        event.current_target = Some(node);
        self.trace_invocation(event, node, handler.function().name());
        let passed_event = if handler.receives_event(self.quirks) {
            Some(&mut *event)
        } else {
            None
        };
        let value = host.invoke(
            self,
            Invocation {
                function: handler.function(),
                this: node,
                event: passed_event,
            },
        )?;
        Ok(self.fold_outcome(event, outcome, value))
    }

    fn fold_outcome(&self, event: &EventRecord, outcome: Option<Value>, value: Value) -> Option<Value> {
        let value = if self.quirks.false_result_cancels() && !event.return_value() {
            Value::Bool(false)
        } else {
            value
        };
        self.quirks.combine(outcome, Some(value))
    }

    fn trace_label(&self, node: TargetId) -> String {
        if node == self.window {
            "window".to_string()
        } else {
            self.tree.describe(node)
        }
    }

    fn trace_invocation(&mut self, event: &EventRecord, node: TargetId, callable: &str) {
        if !self.trace.as_ref().is_some_and(|trace| trace.enabled()) {
            return;
        }
        let target_label = event
            .target()
            .map(|target| self.trace_label(target))
            .unwrap_or_default();
        let current_label = self.trace_label(node);
        let line = format!(
            "[event] {} target={} current={} phase={} callable={} default_prevented={}",
            event.event_type(),
            target_label,
            current_label,
            event.phase().trace_label(),
            callable,
            event.default_prevented()
        );
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.event_line(line);
        }
    }

    fn trace_event_done(&mut self, event: &EventRecord, target: TargetId, status: &str) {
        if !self.trace.as_ref().is_some_and(|trace| trace.enabled()) {
            return;
        }
        let line = format!(
            "[event] done {} target={} outcome={} default_prevented={} propagation_stopped={} immediate_stopped={}",
            event.event_type(),
            self.trace_label(target),
            status,
            event.default_prevented(),
            event.propagation_stopped(),
            event.immediate_propagation_stopped()
        );
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.event_line(line);
        }
    }
}
