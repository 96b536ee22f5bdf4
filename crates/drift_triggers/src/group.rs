//! Trigger groups
//!
//! A group owns its triggers and keeps the union of their bounds, so an
//! object far from every member costs one overlap test per tick. Members
//! with `leave` handlers are also tracked in a shared set, which lets the
//! group deliver `leave` to objects that jumped clear of the group without
//! testing any member's geometry.

use crate::error::{Result, TriggerError};
use crate::id::{GroupId, ObjectRef, TriggerId};
use crate::trigger::Trigger;
use drift_math::{intersect, AABB};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Members of a group that currently have `leave` handlers, in registration order
#[derive(Debug, Default)]
pub(crate) struct LeaveListeners {
    ids: Vec<TriggerId>,
}

impl LeaveListeners {
    fn insert(&mut self, id: TriggerId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    fn remove(&mut self, id: TriggerId) -> bool {
        match self.ids.iter().position(|&t| t == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Non-owning back-link from a trigger to its group
#[derive(Debug, Clone)]
pub(crate) struct GroupLink {
    group: GroupId,
    listeners: Weak<Mutex<LeaveListeners>>,
}

impl GroupLink {
    pub(crate) fn group(&self) -> GroupId {
        self.group
    }

    pub(crate) fn register(&self, trigger: TriggerId) {
        if let Some(listeners) = self.listeners.upgrade() {
            if listeners.lock().insert(trigger) {
                log::debug!("{} registered as leave listener of {}", trigger, self.group);
            }
        }
    }

    pub(crate) fn unregister(&self, trigger: TriggerId) {
        if let Some(listeners) = self.listeners.upgrade() {
            if listeners.lock().remove(trigger) {
                log::debug!("{} unregistered as leave listener of {}", trigger, self.group);
            }
        }
    }
}

/// Broad-phase aggregate of triggers
pub struct TriggerGroup {
    id: GroupId,
    triggers: Vec<Trigger>,
    /// Union of member bounds, `AABB::EMPTY` without spatial members
    bounds: AABB,
    leave_listeners: Arc<Mutex<LeaveListeners>>,
}

impl TriggerGroup {
    pub fn new() -> Self {
        Self {
            id: GroupId::next(),
            triggers: Vec::new(),
            bounds: AABB::EMPTY,
            leave_listeners: Arc::new(Mutex::new(LeaveListeners::default())),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Take ownership of a trigger and extend the group's bounds by it
    pub fn add(&mut self, mut trigger: Trigger) -> TriggerId {
        let id = trigger.id();

        let link = GroupLink {
            group: self.id,
            listeners: Arc::downgrade(&self.leave_listeners),
        };
        if trigger.has_leave_listener() {
            link.register(id);
        }
        trigger.attach(link);

        if let Some(bounds) = trigger.bounds() {
            self.bounds = self.bounds.union(&bounds);
        }

        log::debug!("{} added to {}", id, self.id);
        self.triggers.push(trigger);
        id
    }

    /// Hand a member back, detached. Bounds are recomputed from the remaining members.
    pub fn remove(&mut self, id: TriggerId) -> Option<Trigger> {
        let index = self.triggers.iter().position(|t| t.id() == id)?;
        let mut trigger = self.triggers.remove(index);

        self.leave_listeners.lock().remove(id);
        trigger.detach();
        self.bounds = self.calculate_bounding_box();

        log::debug!("{} removed from {}", id, self.id);
        Some(trigger)
    }

    /// Move a member into another group
    pub fn transfer(&mut self, id: TriggerId, other: &mut TriggerGroup) -> Result<TriggerId> {
        let trigger = self.remove(id).ok_or(TriggerError::TriggerNotFound(id))?;
        Ok(other.add(trigger))
    }

    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: TriggerId) -> Option<&mut Trigger> {
        self.triggers.iter_mut().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: TriggerId) -> bool {
        self.get(id).is_some()
    }

    /// Members in insertion order
    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    /// Union of all spatial member bounds, computed from scratch
    pub fn calculate_bounding_box(&self) -> AABB {
        self.triggers
            .iter()
            .filter_map(Trigger::bounds)
            .fold(AABB::EMPTY, |acc, b| acc.union(&b))
    }

    /// Whether a box overlaps the group's combined bounds
    pub fn overlaps_with(&self, aabb: &AABB) -> bool {
        !self.bounds.is_empty() && intersect::overlap(&self.bounds, aabb)
    }

    /// Check an object against the group.
    ///
    /// Inside the group's bounds every spatial member is checked. Outside,
    /// only members with `leave` handlers are told the object has left.
    ///
    /// # Panics
    ///
    /// Panics if `aabb` contains NaN.
    pub fn check(&mut self, aabb: &AABB, reference: ObjectRef) {
        if self.overlaps_with(aabb) {
            self.check_triggers(aabb, reference);
        } else {
            self.release_listeners(reference);
        }
    }

    /// Check every spatial member, skipping the broad-phase test
    pub fn check_triggers(&mut self, aabb: &AABB, reference: ObjectRef) {
        for trigger in self.triggers.iter_mut().filter(|t| t.is_spatial()) {
            trigger.check(aabb, reference);
        }
    }

    /// Fire `leave` on every leave-listening member the reference is inside
    fn release_listeners(&mut self, reference: ObjectRef) {
        // Members may unregister while firing
        let listeners = self.leave_listeners();

        for id in listeners {
            if let Some(trigger) = self.triggers.iter_mut().find(|t| t.id() == id) {
                trigger.fire_event_if_reference_has_left(reference);
            }
        }
    }

    /// Fire `leave` on every member the reference is inside, listening or not.
    /// For objects that are despawned rather than moved away. Disabled
    /// members keep the reference.
    pub fn release(&mut self, reference: ObjectRef) {
        for trigger in &mut self.triggers {
            trigger.fire_event_if_reference_has_left(reference);
        }
    }

    /// Advance every member's timer
    pub fn update_time(&mut self, dt: f32) {
        for trigger in &mut self.triggers {
            trigger.update_time(dt);
        }
    }

    /// Snapshot of members with `leave` handlers
    pub fn leave_listeners(&self) -> Vec<TriggerId> {
        self.leave_listeners.lock().ids.clone()
    }
}

impl Default for TriggerGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TriggerGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerGroup")
            .field("id", &self.id)
            .field("triggers", &self.triggers.len())
            .field("bounds", &self.bounds)
            .field("leave_listeners", &self.leave_listeners())
            .finish()
    }
}
