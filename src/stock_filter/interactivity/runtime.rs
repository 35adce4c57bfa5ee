//! Event dispatch over an element tree.
//!
//! The runtime plays the client interpreter's part: given the hydrated tree,
//! the element an event fired on and the event itself, it walks from the
//! target up to the root and invokes every bound action on the way.
//!
//! Contexts are resolved per element by nearest-ancestor lookup: payloads are
//! merged shallowly from the root down, per namespace, inner keys winning.

use super::dom::Element;
use super::{
    parse_context, parse_interactive, ActionPath, DomEvent, CONTEXT_ATTR, INTERACTIVE_ATTR,
    ON_ATTR_PREFIX,
};
use crate::error::{FilterError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A namespace of named actions.
pub trait ActionStore {
    fn namespace(&self) -> &str;

    /// Runs `action`. Returns false if this store has no such action.
    fn invoke(&mut self, action: &str, scope: &ActionScope<'_>) -> bool;
}

/// Context payloads visible at one element, keyed by namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextStack {
    by_namespace: BTreeMap<String, Map<String, Value>>,
}

impl ContextStack {
    fn merge(&mut self, namespace: &str, payload: Value) {
        let Value::Object(fields) = payload else {
            return;
        };
        let entry = self.by_namespace.entry(namespace.to_string()).or_default();
        for (key, value) in fields {
            entry.insert(key, value);
        }
    }

    pub fn get(&self, namespace: &str) -> Option<&Map<String, Value>> {
        self.by_namespace.get(namespace)
    }
}

/// What an action sees when it runs.
pub struct ActionScope<'a> {
    pub event: &'a DomEvent,
    namespace: &'a str,
    contexts: &'a ContextStack,
}

impl<'a> ActionScope<'a> {
    /// Nearest context of the action's own namespace.
    pub fn context(&self) -> Option<&Map<String, Value>> {
        self.contexts.get(self.namespace)
    }

    /// Nearest context of another namespace (e.g. an enclosing widget).
    pub fn context_for(&self, namespace: &str) -> Option<&Map<String, Value>> {
        self.contexts.get(namespace)
    }
}

/// Dispatches events to the stores registered with it.
#[derive(Default)]
pub struct Runtime<'a> {
    stores: Vec<&'a mut dyn ActionStore>,
}

/// Namespace and context state accumulated from the root to one element.
#[derive(Clone, Default)]
struct Frame {
    namespace: Option<String>,
    contexts: ContextStack,
}

impl<'a> Runtime<'a> {
    pub fn new() -> Self {
        Self { stores: Vec::new() }
    }

    /// Registers a store under its namespace. A later registration for the
    /// same namespace shadows the earlier one.
    pub fn register(&mut self, store: &'a mut dyn ActionStore) {
        self.stores.insert(0, store);
    }

    /// Fires `event` at the element `target` (a path from `root`) and bubbles
    /// it to the root.
    ///
    /// Returns the fully-qualified actions that ran, innermost first. Bindings
    /// that cannot be resolved are logged and skipped.
    pub fn dispatch(
        &mut self,
        root: &Element,
        target: &[usize],
        mut event: DomEvent,
    ) -> Result<Vec<ActionPath>> {
        let chain = root
            .ancestry(target)
            .ok_or_else(|| FilterError::Markup(format!("no element at path {:?}", target)))?;

        if event.target.value.is_none() {
            event.target.value = chain
                .last()
                .and_then(|el| el.attr("value"))
                .map(str::to_string);
        }

        let frames = build_frames(&chain);
        let binding_attr = format!("{}{}", ON_ATTR_PREFIX, event.kind);
        let mut invoked = Vec::new();

        for (element, frame) in chain.iter().zip(frames.iter()).rev() {
            let Some(binding) = element.attr(&binding_attr) else {
                continue;
            };
            let Some(path) = ActionPath::parse(binding) else {
                tracing::warn!(binding, "ignoring malformed action binding");
                continue;
            };
            let Some(resolved) = path.resolve(frame.namespace.as_deref()) else {
                tracing::warn!(binding, "action binding outside any interactive namespace");
                continue;
            };
            let namespace = resolved.namespace.clone().unwrap_or_default();

            let Some(store) = self
                .stores
                .iter_mut()
                .find(|store| store.namespace() == namespace)
            else {
                tracing::warn!(namespace = %namespace, "no store registered for namespace");
                continue;
            };

            let scope = ActionScope {
                event: &event,
                namespace: &namespace,
                contexts: &frame.contexts,
            };
            if store.invoke(&resolved.name, &scope) {
                tracing::debug!(action = %resolved, event = %event.kind, "dispatched");
                invoked.push(resolved);
            } else {
                tracing::warn!(action = %resolved, "unknown action");
            }
        }

        Ok(invoked)
    }
}

fn build_frames(chain: &[&Element]) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(chain.len());
    let mut current = Frame::default();

    for element in chain {
        if let Some(value) = element.attr(INTERACTIVE_ATTR) {
            match parse_interactive(value) {
                Some(ns) => current.namespace = Some(ns),
                None => tracing::warn!(value, "unreadable interactive declaration"),
            }
        }
        if let Some(value) = element.attr(CONTEXT_ATTR) {
            match parse_context(value) {
                Some((ns, payload)) => match ns.or_else(|| current.namespace.clone()) {
                    Some(ns) => current.contexts.merge(&ns, payload),
                    None => tracing::warn!(value, "context outside any interactive namespace"),
                },
                None => tracing::warn!(value, "unreadable context payload"),
            }
        }
        frames.push(current.clone());
    }

    frames
}
