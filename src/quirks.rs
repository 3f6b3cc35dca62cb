use super::*;

/// Named browser-version switches consulted by event construction, dispatch and
/// result combination. A flag that is not enabled means modern behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuirkFlag {
    EventWindowExecuteIfDetached,
    EventHandlerAsPropertyNoEventArg,
    EventFalseResultCancels,
    EventLastResultWins,
    EventOnloadCancelableFalse,
}

impl QuirkFlag {
    pub const ALL: [QuirkFlag; 5] = [
        Self::EventWindowExecuteIfDetached,
        Self::EventHandlerAsPropertyNoEventArg,
        Self::EventFalseResultCancels,
        Self::EventLastResultWins,
        Self::EventOnloadCancelableFalse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::EventWindowExecuteIfDetached => "EVENT_WINDOW_EXECUTE_IF_DETACHED",
            Self::EventHandlerAsPropertyNoEventArg => "EVENT_HANDLER_AS_PROPERTY_NO_EVENT_ARG",
            Self::EventFalseResultCancels => "EVENT_FALSE_RESULT_CANCELS",
            Self::EventLastResultWins => "EVENT_LAST_RESULT_WINS",
            Self::EventOnloadCancelableFalse => "EVENT_ONLOAD_CANCELABLE_FALSE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = match name {
            // Older profiles spelled this one with a typo.
            "JS_EVENT_WINDOW_EXECUTE_IF_DITACHED" => "EVENT_WINDOW_EXECUTE_IF_DETACHED",
            other => other.strip_prefix("JS_").unwrap_or(other),
        };
        Self::ALL
            .into_iter()
            .find(|flag| flag.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserProfile {
    Modern,
    LegacyIe,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuirkPolicy {
    flags: HashSet<QuirkFlag>,
}

impl QuirkPolicy {
    pub fn modern() -> Self {
        Self::default()
    }

    pub fn for_profile(profile: BrowserProfile) -> Self {
        match profile {
            BrowserProfile::Modern => Self::modern(),
            BrowserProfile::LegacyIe => Self::modern()
                .with(QuirkFlag::EventWindowExecuteIfDetached)
                .with(QuirkFlag::EventHandlerAsPropertyNoEventArg)
                .with(QuirkFlag::EventFalseResultCancels)
                .with(QuirkFlag::EventLastResultWins)
                .with(QuirkFlag::EventOnloadCancelableFalse),
        }
    }

    /// Parses a comma separated flag list. Unknown names are ignored so that
    /// profiles written for newer builds still load.
    pub fn from_flag_names(list: &str) -> Self {
        list.split(',')
            .filter(|name| !name.trim().is_empty())
            .filter_map(QuirkFlag::from_name)
            .fold(Self::modern(), Self::with)
    }

    pub fn with(mut self, flag: QuirkFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn without(mut self, flag: QuirkFlag) -> Self {
        self.flags.remove(&flag);
        self
    }

    pub fn set(&mut self, flag: QuirkFlag, enabled: bool) {
        if enabled {
            self.flags.insert(flag);
        } else {
            self.flags.remove(&flag);
        }
    }

    pub fn is_enabled(&self, flag: QuirkFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn enabled_flags(&self) -> Vec<QuirkFlag> {
        let mut flags = self.flags.iter().copied().collect::<Vec<_>>();
        flags.sort();
        flags
    }

    pub(crate) fn window_runs_when_detached(&self) -> bool {
        self.is_enabled(QuirkFlag::EventWindowExecuteIfDetached)
    }

    pub(crate) fn property_handler_takes_event(&self) -> bool {
        !self.is_enabled(QuirkFlag::EventHandlerAsPropertyNoEventArg)
    }

    pub(crate) fn false_result_cancels(&self) -> bool {
        self.is_enabled(QuirkFlag::EventFalseResultCancels)
    }

    /// Folds one call outcome into the running dispatch outcome.
    ///
    /// Modern rule: the first meaningful (present, not `undefined`) outcome is
    /// kept. `EVENT_LAST_RESULT_WINS` keeps the most recent meaningful outcome
    /// instead. `EVENT_FALSE_RESULT_CANCELS` pins a strict `false` over
    /// everything that follows.
    pub fn combine(&self, accumulated: Option<Value>, next: Option<Value>) -> Option<Value> {
        let Some(next) = next else {
            return accumulated;
        };

        if self.false_result_cancels() {
            if accumulated.as_ref().is_some_and(Value::is_false) {
                return accumulated;
            }
            if next.is_false() {
                return Some(next);
            }
        }

        let accumulated_meaningful = accumulated.as_ref().is_some_and(|value| !value.is_undefined());
        if self.is_enabled(QuirkFlag::EventLastResultWins) {
            if !next.is_undefined() || !accumulated_meaningful {
                return Some(next);
            }
            return accumulated;
        }

        if accumulated_meaningful {
            accumulated
        } else {
            Some(next)
        }
    }
}
