use super::*;

type NativeBody = dyn Fn(&mut NativeCall<'_, '_>) -> Result<Value>;

struct FunctionInner {
    name: String,
    body: Box<NativeBody>,
}

/// A callable handle. Two handles are the same listener only when they point
/// at the same function object, never by comparing bodies or names.
#[derive(Clone)]
pub struct ScriptFunction {
    inner: Rc<FunctionInner>,
}

impl ScriptFunction {
    pub fn native(
        name: &str,
        body: impl Fn(&mut NativeCall<'_, '_>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(FunctionInner {
                name: name.to_string(),
                body: Box::new(body),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn body(&self) -> &NativeBody {
        self.inner.body.as_ref()
    }
}

impl PartialEq for ScriptFunction {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptFunction")
            .field("name", &self.inner.name)
            .finish()
    }
}

/// The single handler slot of a type bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum EventHandler {
    /// Compiled from a markup attribute such as `onclick="..."`; always
    /// receives the event.
    Attribute(ScriptFunction),
    /// Assigned with property syntax (`node.onclick = fn`).
    Property(ScriptFunction),
}

impl EventHandler {
    pub fn function(&self) -> &ScriptFunction {
        match self {
            Self::Attribute(function) | Self::Property(function) => function,
        }
    }

    pub(crate) fn receives_event(&self, quirks: &QuirkPolicy) -> bool {
        match self {
            Self::Attribute(_) => true,
            Self::Property(_) => quirks.property_handler_takes_event(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeBucket {
    pub capturing: Vec<ScriptFunction>,
    pub bubbling: Vec<ScriptFunction>,
    pub handler: Option<EventHandler>,
}

impl TypeBucket {
    fn list(&self, use_capture: bool) -> &Vec<ScriptFunction> {
        if use_capture {
            &self.capturing
        } else {
            &self.bubbling
        }
    }

    fn list_mut(&mut self, use_capture: bool) -> &mut Vec<ScriptFunction> {
        if use_capture {
            &mut self.capturing
        } else {
            &mut self.bubbling
        }
    }

    fn is_registered(&self) -> bool {
        self.handler.is_some() || !self.capturing.is_empty() || !self.bubbling.is_empty()
    }
}

/// Listener storage for one event target, keyed by lowercase event type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListenerRegistry {
    buckets: HashMap<String, TypeBucket>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, event_type: &str) -> Option<&TypeBucket> {
        self.buckets.get(&event_type.to_ascii_lowercase())
    }

    fn bucket_mut(&mut self, event_type: &str) -> &mut TypeBucket {
        self.buckets
            .entry(event_type.to_ascii_lowercase())
            .or_default()
    }

    /// Registers `callable` for `event_type`. Returns `false` when the same
    /// function is already registered with the same capture flag. An absent
    /// callable is reported as added and changes nothing.
    pub fn add_listener(
        &mut self,
        event_type: &str,
        callable: Option<ScriptFunction>,
        use_capture: bool,
    ) -> bool {
        let Some(callable) = callable else {
            return true;
        };
        let listeners = self.bucket_mut(event_type).list_mut(use_capture);
        if listeners.iter().any(|existing| existing.ptr_eq(&callable)) {
            return false;
        }
        listeners.push(callable);
        true
    }

    pub fn remove_listener(&mut self, event_type: &str, callable: &ScriptFunction, use_capture: bool) {
        let Some(bucket) = self.buckets.get_mut(&event_type.to_ascii_lowercase()) else {
            return;
        };
        let listeners = bucket.list_mut(use_capture);
        if let Some(pos) = listeners.iter().position(|existing| existing.ptr_eq(callable)) {
            listeners.remove(pos);
        }
    }

    /// Listeners in invocation order; empty for unknown types.
    pub fn get_listeners(&self, event_type: &str, use_capture: bool) -> Vec<ScriptFunction> {
        self.bucket(event_type)
            .map(|bucket| bucket.list(use_capture).clone())
            .unwrap_or_default()
    }

    pub fn set_handler(&mut self, event_type: &str, handler: Option<EventHandler>) {
        self.bucket_mut(event_type).handler = handler;
    }

    /// Property assignment from script: a function becomes a property handler,
    /// any other value (including `undefined`) clears the slot.
    pub fn set_handler_value(&mut self, event_type: &str, value: Value) {
        let handler = value.as_function().cloned().map(EventHandler::Property);
        self.set_handler(event_type, handler);
    }

    pub fn get_handler(&self, event_type: &str) -> Option<EventHandler> {
        self.bucket(event_type)
            .and_then(|bucket| bucket.handler.clone())
    }

    pub fn has_any_registration(&self, event_type: &str) -> bool {
        self.bucket(event_type)
            .is_some_and(TypeBucket::is_registered)
    }

    pub fn event_types(&self) -> Vec<String> {
        let mut types = self.buckets.keys().cloned().collect::<Vec<_>>();
        types.sort();
        types
    }

    /// Appends every listener of `self` missing from `other`, in order. A
    /// handler is copied only into an empty slot.
    pub fn merge_into(&self, other: &mut ListenerRegistry) {
        let mut types = self.buckets.keys().collect::<Vec<_>>();
        types.sort();
        for event_type in types {
            let source = &self.buckets[event_type];
            for listener in &source.capturing {
                other.add_listener(event_type, Some(listener.clone()), true);
            }
            for listener in &source.bubbling {
                other.add_listener(event_type, Some(listener.clone()), false);
            }
            if let Some(handler) = &source.handler {
                let destination = other.bucket_mut(event_type);
                if destination.handler.is_none() {
                    destination.handler = Some(handler.clone());
                }
            }
        }
    }
}

/// Owns the lazily created registry of every target on a page.
#[derive(Debug, Clone, Default)]
pub struct EventTargets {
    registries: HashMap<TargetId, ListenerRegistry>,
}

impl EventTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self, target: TargetId) -> Option<&ListenerRegistry> {
        self.registries.get(&target)
    }

    pub fn registry_mut(&mut self, target: TargetId) -> &mut ListenerRegistry {
        self.registries.entry(target).or_default()
    }

    pub fn add_listener(
        &mut self,
        target: TargetId,
        event_type: &str,
        callable: Option<ScriptFunction>,
        use_capture: bool,
    ) -> bool {
        self.registry_mut(target)
            .add_listener(event_type, callable, use_capture)
    }

    pub fn remove_listener(
        &mut self,
        target: TargetId,
        event_type: &str,
        callable: &ScriptFunction,
        use_capture: bool,
    ) {
        if let Some(registry) = self.registries.get_mut(&target) {
            registry.remove_listener(event_type, callable, use_capture);
        }
    }

    pub fn get_listeners(&self, target: TargetId, event_type: &str, use_capture: bool) -> Vec<ScriptFunction> {
        self.registry(target)
            .map(|registry| registry.get_listeners(event_type, use_capture))
            .unwrap_or_default()
    }

    pub fn set_handler(&mut self, target: TargetId, event_type: &str, handler: Option<EventHandler>) {
        self.registry_mut(target).set_handler(event_type, handler);
    }

    pub fn get_handler(&self, target: TargetId, event_type: &str) -> Option<EventHandler> {
        self.registry(target)
            .and_then(|registry| registry.get_handler(event_type))
    }

    pub fn has_any_registration(&self, target: TargetId, event_type: &str) -> bool {
        self.registry(target)
            .is_some_and(|registry| registry.has_any_registration(event_type))
    }

    /// Gives `to` an independent copy of `from`'s registry, replacing whatever
    /// `to` had.
    pub fn copy_listeners(&mut self, from: TargetId, to: TargetId) {
        match self.registries.get(&from).cloned() {
            Some(registry) => {
                self.registries.insert(to, registry);
            }
            None => {
                self.registries.remove(&to);
            }
        }
    }

    pub fn merge_listeners(&mut self, from: TargetId, to: TargetId) {
        if from == to {
            return;
        }
        let Some(source) = self.registries.get(&from).cloned() else {
            return;
        };
        source.merge_into(self.registry_mut(to));
    }

    pub fn forget(&mut self, target: TargetId) {
        self.registries.remove(&target);
    }
}
