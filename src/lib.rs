use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Zero;

mod collaborators;
mod dispatch;
mod event;
mod host;
mod listeners;
mod page;
mod quirks;
mod tasks;
mod trace;
mod tree;
mod values;

pub use collaborators::{EventTree, Invocation, ScriptHost, TaskQueue};
pub use dispatch::{DispatchContext, DispatchOutcome};
pub use event::{EventInit, EventPhase, EventRecord};
pub use host::{NativeCall, NativeHost};
pub use listeners::{EventHandler, EventTargets, ListenerRegistry, ScriptFunction, TypeBucket};
pub use page::Page;
pub use quirks::{BrowserProfile, QuirkFlag, QuirkPolicy};
pub use tasks::{FifoTaskQueue, QueuedTask};
pub use trace::TraceState;
pub use tree::{NodeKind, NodeTree};
pub use values::Value;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ScriptRuntime(String),
    InvalidTree(String),
    UnknownTarget(String),
    Config(String),
    TaskQueue(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptRuntime(msg) => write!(f, "script runtime error: {msg}"),
            Self::InvalidTree(msg) => write!(f, "invalid tree: {msg}"),
            Self::UnknownTarget(target) => write!(f, "unknown event target: {target}"),
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::TaskQueue(msg) => write!(f, "task queue error: {msg}"),
        }
    }
}

impl StdError for Error {}

/// Non-owning handle to a script-visible event target (a tree node or a window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub usize);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

#[cfg(test)]
mod tests;
