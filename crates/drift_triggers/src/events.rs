//! Trigger events and handler registries

use crate::error::TriggerError;
use crate::id::{HandlerId, ObjectRef, TriggerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Type of trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEventType {
    /// Object started satisfying an area/distance condition
    Enter,
    /// Object still satisfies the condition
    Stay,
    /// Object stopped satisfying the condition
    Leave,
    /// Intermediate timer progress
    TimerUpdate,
    /// Timer reached its interval
    TimerEnd,
}

impl TriggerEventType {
    /// Wire name of the event
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Stay => "stay",
            Self::Leave => "leave",
            Self::TimerUpdate => "timer_update",
            Self::TimerEnd => "timer_end",
        }
    }
}

impl fmt::Display for TriggerEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerEventType {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enter" => Ok(Self::Enter),
            "stay" => Ok(Self::Stay),
            "leave" => Ok(Self::Leave),
            "timer_update" => Ok(Self::TimerUpdate),
            "timer_end" => Ok(Self::TimerEnd),
            other => Err(TriggerError::UnknownEventType(other.to_string())),
        }
    }
}

/// A trigger event
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    /// Type of event
    pub event_type: TriggerEventType,
    /// The trigger that fired
    pub trigger: TriggerId,
    /// The object that caused the event (area/distance events only)
    pub reference: Option<ObjectRef>,
    /// Timer checkpoint for `TimerUpdate` events
    pub time: Option<f32>,
}

impl TriggerEvent {
    /// Create an enter event
    pub fn enter(trigger: TriggerId, reference: ObjectRef) -> Self {
        Self::spatial(TriggerEventType::Enter, trigger, reference)
    }

    /// Create a stay event
    pub fn stay(trigger: TriggerId, reference: ObjectRef) -> Self {
        Self::spatial(TriggerEventType::Stay, trigger, reference)
    }

    /// Create a leave event
    pub fn leave(trigger: TriggerId, reference: ObjectRef) -> Self {
        Self::spatial(TriggerEventType::Leave, trigger, reference)
    }

    /// Create a timer progress event
    pub fn timer_update(trigger: TriggerId, time: f32) -> Self {
        Self {
            event_type: TriggerEventType::TimerUpdate,
            trigger,
            reference: None,
            time: Some(time),
        }
    }

    /// Create a timer end event
    pub fn timer_end(trigger: TriggerId) -> Self {
        Self {
            event_type: TriggerEventType::TimerEnd,
            trigger,
            reference: None,
            time: None,
        }
    }

    fn spatial(event_type: TriggerEventType, trigger: TriggerId, reference: ObjectRef) -> Self {
        Self {
            event_type,
            trigger,
            reference: Some(reference),
            time: None,
        }
    }

    pub fn is_leave(&self) -> bool {
        self.event_type == TriggerEventType::Leave
    }
}

/// Returned by every handler. `StopPropagation` skips all remaining
/// handlers of the current dispatch, persistent and one-shot alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Continue,
    StopPropagation,
}

/// Persistent handler
pub type TriggerCallback = Box<dyn Fn(&TriggerEvent) -> Outcome + Send + Sync>;

/// One-shot handler, consumed by its first invocation
pub type OnceCallback = Box<dyn FnOnce(&TriggerEvent) -> Outcome + Send + Sync>;

/// Per-event-type lists of persistent and one-shot handlers
#[derive(Default)]
pub struct HandlerRegistry {
    persistent: HashMap<TriggerEventType, Vec<(HandlerId, TriggerCallback)>>,
    once: HashMap<TriggerEventType, Vec<(HandlerId, OnceCallback)>>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a persistent handler
    pub fn on<F>(&mut self, event_type: TriggerEventType, f: F) -> HandlerId
    where
        F: Fn(&TriggerEvent) -> Outcome + Send + Sync + 'static,
    {
        let id = HandlerId::next();
        self.persistent
            .entry(event_type)
            .or_default()
            .push((id, Box::new(f)));
        id
    }

    /// Add a handler that is removed after its first invocation
    pub fn once<F>(&mut self, event_type: TriggerEventType, f: F) -> HandlerId
    where
        F: FnOnce(&TriggerEvent) -> Outcome + Send + Sync + 'static,
    {
        let id = HandlerId::next();
        self.once
            .entry(event_type)
            .or_default()
            .push((id, Box::new(f)));
        id
    }

    /// Remove every handler of an event type. Returns how many were removed.
    pub fn off(&mut self, event_type: TriggerEventType) -> usize {
        let persistent = self.persistent.remove(&event_type).map_or(0, |l| l.len());
        let once = self.once.remove(&event_type).map_or(0, |l| l.len());
        persistent + once
    }

    /// Remove one handler. Returns `false` if it was not registered for that type.
    pub fn off_handler(&mut self, event_type: TriggerEventType, handler: HandlerId) -> bool {
        let mut removed = false;

        if let Some(list) = self.persistent.get_mut(&event_type) {
            let before = list.len();
            list.retain(|(id, _)| *id != handler);
            removed |= list.len() != before;
        }

        if let Some(list) = self.once.get_mut(&event_type) {
            let before = list.len();
            list.retain(|(id, _)| *id != handler);
            removed |= list.len() != before;
        }

        removed
    }

    /// Number of handlers (persistent + one-shot) for an event type
    pub fn count(&self, event_type: TriggerEventType) -> usize {
        self.persistent.get(&event_type).map_or(0, Vec::len)
            + self.once.get(&event_type).map_or(0, Vec::len)
    }

    /// Whether any handler is registered for an event type
    pub fn has_listeners(&self, event_type: TriggerEventType) -> bool {
        self.count(event_type) > 0
    }

    /// Dispatch an event: persistent handlers in registration order, then
    /// one-shot handlers in registration order.
    ///
    /// One-shot handlers are dropped once invoked. Handlers not reached
    /// because of `StopPropagation` stay registered.
    pub fn fire(&mut self, event: &TriggerEvent) -> Outcome {
        if let Some(list) = self.persistent.get(&event.event_type) {
            for (_, callback) in list {
                if callback(event) == Outcome::StopPropagation {
                    return Outcome::StopPropagation;
                }
            }
        }

        if let Some(list) = self.once.get_mut(&event.event_type) {
            let mut pending = std::mem::take(list).into_iter();

            while let Some((_, callback)) = pending.next() {
                if callback(event) == Outcome::StopPropagation {
                    *list = pending.collect();
                    return Outcome::StopPropagation;
                }
            }
        }

        Outcome::Continue
    }

    /// Drop every handler
    pub fn clear(&mut self) {
        self.persistent.clear();
        self.once.clear();
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event_type, list) in &self.persistent {
            map.entry(event_type, &list.len());
        }
        for (event_type, list) in &self.once {
            map.entry(&format!("{} (once)", event_type), &list.len());
        }
        map.finish()
    }
}
