//! Drift Triggers - Area, Distance and Timer Triggers
//!
//! Declarative conditions evaluated once per tick against object boxes,
//! producing `enter`, `stay` and `leave` events.
//!
//! # Features
//!
//! - Rectangle and circle area triggers, distance triggers
//! - Timer triggers with intermediate updates and looping
//! - Persistent and one-shot handlers with propagation stop
//! - Groups that broad-phase cull their members with one box test
//!
//! # Example
//!
//! ```
//! use drift_triggers::prelude::*;
//! use drift_math::AABB;
//!
//! let mut trigger = Trigger::rectangle(0.0, 0.0, 10.0, 10.0);
//! trigger.on(TriggerEventType::Enter, |event| {
//!     log::info!("{:?} entered", event.reference);
//!     Outcome::Continue
//! });
//!
//! let mut group = TriggerGroup::new();
//! group.add(trigger);
//! group.check(&AABB::new(2.0, 2.0, 1.0, 1.0), ObjectRef(1));
//! ```
//!
//! Handlers never receive the trigger itself, so a handler cannot check or
//! fire the trigger that is dispatching to it.

pub mod error;
pub mod events;
pub mod group;
pub mod id;
pub mod params;
pub mod system;
pub mod timer;
pub mod trigger;
pub mod volume;

pub mod prelude {
    pub use crate::error::{Result, TriggerError};
    pub use crate::events::{Outcome, TriggerEvent, TriggerEventType};
    pub use crate::group::TriggerGroup;
    pub use crate::id::{GroupId, HandlerId, ObjectRef, TriggerId};
    pub use crate::params::TriggerParams;
    pub use crate::system::TriggerSystem;
    pub use crate::trigger::{Trigger, TriggerKind, TriggerType};
    pub use crate::volume::Shape;
}

pub use prelude::*;
