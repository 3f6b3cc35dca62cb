use super::*;

pub(crate) const TYPE_CHANGE: &str = "change";
pub(crate) const TYPE_LOAD: &str = "load";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

impl EventPhase {
    /// Numeric `eventPhase` as exposed to scripts.
    pub fn as_u16(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Capturing => 1,
            Self::AtTarget => 2,
            Self::Bubbling => 3,
        }
    }

    pub(crate) fn trace_label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Capturing => "capture",
            Self::AtTarget => "target",
            Self::Bubbling => "bubble",
        }
    }
}

/// Explicit caller overrides applied after the type-based defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventInit {
    pub bubbles: Option<bool>,
    pub cancelable: Option<bool>,
}

impl EventInit {
    pub fn new(bubbles: bool, cancelable: bool) -> Self {
        Self {
            bubbles: Some(bubbles),
            cancelable: Some(cancelable),
        }
    }
}

/// One dispatch instance of an event.
///
/// `event_type`, `bubbles` and `cancelable` only change through
/// [`EventRecord::reinitialize`]. Everything else is written by the dispatch
/// orchestrator or by listeners through the public mutators.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    event_type: String,
    bubbles: bool,
    cancelable: bool,
    pub(crate) phase: EventPhase,
    pub(crate) target: Option<TargetId>,
    pub(crate) current_target: Option<TargetId>,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
    pub(crate) dispatching: bool,
    time_stamp_ms: i64,
    data: Value,
}

impl EventRecord {
    /// Creates an event with `bubbles` and `cancelable` defaulted from its type.
    pub fn new(event_type: &str, quirks: &QuirkPolicy, time_stamp_ms: i64) -> Self {
        Self::with_init(event_type, EventInit::default(), quirks, time_stamp_ms)
    }

    pub fn with_init(
        event_type: &str,
        init: EventInit,
        quirks: &QuirkPolicy,
        time_stamp_ms: i64,
    ) -> Self {
        let mut bubbles = true;
        let mut cancelable = true;
        if event_type.eq_ignore_ascii_case(TYPE_CHANGE) {
            cancelable = false;
        } else if event_type.eq_ignore_ascii_case(TYPE_LOAD) {
            bubbles = false;
            if quirks.is_enabled(QuirkFlag::EventOnloadCancelableFalse) {
                cancelable = false;
            }
        }
        if let Some(value) = init.bubbles {
            bubbles = value;
        }
        if let Some(value) = init.cancelable {
            cancelable = value;
        }

        Self {
            event_type: event_type.to_string(),
            bubbles,
            cancelable,
            phase: EventPhase::None,
            target: None,
            current_target: None,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            default_prevented: false,
            dispatching: false,
            time_stamp_ms,
            data: Value::Undefined,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Lowercase form used for registry lookups.
    pub fn type_key(&self) -> String {
        self.event_type.to_ascii_lowercase()
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    /// Legacy alias of `target`.
    pub fn src_element(&self) -> Option<TargetId> {
        self.target
    }

    pub fn current_target(&self) -> Option<TargetId> {
        self.current_target
    }

    pub fn time_stamp_ms(&self) -> i64 {
        self.time_stamp_ms
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn is_dispatching(&self) -> bool {
        self.dispatching
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// No-op unless the event is cancelable.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Legacy `returnValue`: `false` once the default action has been prevented.
    pub fn return_value(&self) -> bool {
        !self.default_prevented
    }

    /// Setting `false` behaves like `prevent_default`; `true` never un-cancels.
    pub fn set_return_value(&mut self, value: bool) {
        if !value {
            self.prevent_default();
        }
    }

    /// Legacy `cancelBubble`.
    pub fn cancel_bubble(&self) -> bool {
        self.propagation_stopped
    }

    pub fn set_cancel_bubble(&mut self, value: bool) {
        if value {
            self.stop_propagation();
        }
    }

    /// `initEvent`. Ignored while the event is being dispatched; returns
    /// whether the event was reinitialized.
    pub fn reinitialize(&mut self, event_type: &str, bubbles: bool, cancelable: bool) -> bool {
        if self.dispatching {
            return false;
        }
        self.event_type = event_type.to_string();
        self.bubbles = bubbles;
        self.cancelable = cancelable;
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
        self.default_prevented = false;
        self.target = None;
        self.current_target = None;
        self.phase = EventPhase::None;
        true
    }
}
