//! Trigger system driving groups once per tick

use crate::error::{Result, TriggerError};
use crate::group::TriggerGroup;
use crate::id::{GroupId, ObjectRef};
use drift_math::AABB;

/// The trigger system that advances and checks every registered group
pub struct TriggerSystem {
    /// Groups in registration order
    groups: Vec<TriggerGroup>,
    /// Accumulated simulation time
    elapsed: f32,
}

impl TriggerSystem {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            elapsed: 0.0,
        }
    }

    /// Register a group
    pub fn add_group(&mut self, group: TriggerGroup) -> GroupId {
        let id = group.id();
        log::debug!("Registered {} with {} trigger(s)", id, group.len());
        self.groups.push(group);
        id
    }

    /// Unregister a group and hand it back
    pub fn remove_group(&mut self, id: GroupId) -> Result<TriggerGroup> {
        let index = self
            .groups
            .iter()
            .position(|g| g.id() == id)
            .ok_or(TriggerError::GroupNotFound(id))?;

        log::debug!("Unregistered {}", id);
        Ok(self.groups.remove(index))
    }

    pub fn group(&self, id: GroupId) -> Option<&TriggerGroup> {
        self.groups.iter().find(|g| g.id() == id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut TriggerGroup> {
        self.groups.iter_mut().find(|g| g.id() == id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &TriggerGroup> {
        self.groups.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Run one tick.
    ///
    /// Timers of every group advance first, then each object is checked
    /// against each group, both in registration order.
    ///
    /// # Panics
    ///
    /// Panics if an object box contains NaN.
    pub fn update(&mut self, delta_time: f32, objects: &[(ObjectRef, AABB)]) {
        self.elapsed += delta_time;

        for group in &mut self.groups {
            group.update_time(delta_time);
        }

        for (reference, aabb) in objects {
            self.check_object(aabb, *reference);
        }
    }

    /// Check one object against every group, without advancing time
    pub fn check_object(&mut self, aabb: &AABB, reference: ObjectRef) {
        for group in &mut self.groups {
            group.check(aabb, reference);
        }
    }

    /// Fire `leave` everywhere the reference is inside, e.g. on despawn
    pub fn release(&mut self, reference: ObjectRef) {
        for group in &mut self.groups {
            group.release(reference);
        }
    }

    /// Simulation time accumulated by `update`
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for TriggerSystem {
    fn default() -> Self {
        Self::new()
    }
}
