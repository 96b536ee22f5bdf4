//! Trigger component

use crate::error::Result;
use crate::events::{HandlerRegistry, Outcome, TriggerEvent, TriggerEventType};
use crate::group::GroupLink;
use crate::id::{GroupId, HandlerId, ObjectRef, TriggerId};
use crate::params::{self, TriggerKindParams, TriggerParams};
use crate::timer::{TimerState, TimerTick};
use crate::volume::{self, AreaShape, Shape};
use drift_math::{Circle, Vec2, AABB};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Trigger type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    Area,
    Distance,
    Timer,
}

/// What a trigger reacts to. Fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerKind {
    /// Object box overlaps a rectangle or circle
    Area(AreaShape),
    /// Object box is within `distance` of `origin`
    Distance { origin: Vec2, distance: f32 },
    /// Elapsed time
    Timer(TimerState),
}

impl TriggerKind {
    fn from_params(kind: &TriggerKindParams) -> Result<Self> {
        Ok(match kind {
            TriggerKindParams::Area(p) => {
                let x = params::coordinate("x", p.x);
                let y = params::coordinate("y", p.y);
                match p.shape {
                    Shape::Rectangle => {
                        Self::Area(AreaShape::rectangle(x, y, params::extent("w", p.w), params::extent("h", p.h)))
                    }
                    Shape::Circle => Self::Area(AreaShape::circle(x, y, params::extent("r", p.r))),
                }
            }
            TriggerKindParams::Distance(p) => Self::Distance {
                origin: Vec2::new(params::coordinate("x", p.x), params::coordinate("y", p.y)),
                distance: params::extent("distance", p.distance),
            },
            TriggerKindParams::Timer(p) => Self::Timer(TimerState::new(
                params::interval(p.interval)?,
                p.looping,
                params::extent("update_on_each", p.update_on_each),
            )),
        })
    }

    /// Type tag
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            Self::Area(_) => TriggerType::Area,
            Self::Distance { .. } => TriggerType::Distance,
            Self::Timer(_) => TriggerType::Timer,
        }
    }

    /// Area and distance triggers can be checked against boxes, timers cannot
    pub fn is_spatial(&self) -> bool {
        !matches!(self, Self::Timer(_))
    }

    /// Axis-aligned bounds, `None` for timers
    pub fn bounds(&self) -> Option<AABB> {
        match self {
            Self::Area(shape) => Some(shape.bounds()),
            Self::Distance { origin, distance } => Some(volume::distance_bounds(*origin, *distance)),
            Self::Timer(_) => None,
        }
    }
}

/// A declarative area, distance or timer condition with its own event handlers.
///
/// Spatial triggers remember which object references currently satisfy the
/// condition, and turn each [`check`](Self::check) into an enter, stay or
/// leave transition for that reference.
///
/// Handlers receive only the event, never the trigger, so a handler cannot
/// re-enter `check` on the trigger that is dispatching.
pub struct Trigger {
    id: TriggerId,
    kind: TriggerKind,
    /// Reserved, not acted upon
    cooldown: f32,
    enabled: bool,
    /// References whose last check was inside
    inside: HashSet<ObjectRef>,
    handlers: HandlerRegistry,
    /// Non-owning link to the group holding this trigger
    group: Option<GroupLink>,
}

impl Trigger {
    /// Create a trigger from parameters.
    ///
    /// Bad geometry falls back to 0; a timer without a positive interval is rejected.
    pub fn new(params: &TriggerParams) -> Result<Self> {
        let kind = TriggerKind::from_params(&params.kind)?;
        Ok(Self::from_kind(kind).with_cooldown(params.sanitized_cooldown()))
    }

    /// Create a trigger from an already-built kind
    pub fn from_kind(kind: TriggerKind) -> Self {
        Self {
            id: TriggerId::next(),
            kind,
            cooldown: 0.0,
            enabled: true,
            inside: HashSet::new(),
            handlers: HandlerRegistry::new(),
            group: None,
        }
    }

    /// Rectangle area trigger, `x, y` top-left
    pub fn rectangle(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_kind(TriggerKind::Area(AreaShape::Rectangle(AABB::new(
            params::coordinate("x", x),
            params::coordinate("y", y),
            params::extent("w", w),
            params::extent("h", h),
        ))))
    }

    /// Circle area trigger, `x, y` center
    pub fn circle(x: f32, y: f32, r: f32) -> Self {
        Self::from_kind(TriggerKind::Area(AreaShape::Circle(Circle::new(
            params::coordinate("x", x),
            params::coordinate("y", y),
            params::extent("r", r),
        ))))
    }

    /// Distance trigger around a point
    pub fn distance(x: f32, y: f32, distance: f32) -> Self {
        Self::from_kind(TriggerKind::Distance {
            origin: Vec2::new(params::coordinate("x", x), params::coordinate("y", y)),
            distance: params::extent("distance", distance),
        })
    }

    /// Timer trigger. Fails if `interval` is not > 0.
    pub fn timer(interval: f32, looping: bool, update_on_each: f32) -> Result<Self> {
        Self::new(&TriggerParams::timer(interval, looping).with_update_on_each(update_on_each))
    }

    /// Set the cooldown (reserved). Non-positive values become 0.
    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = if cooldown > 0.0 { cooldown } else { 0.0 };
        self
    }

    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub fn kind(&self) -> &TriggerKind {
        &self.kind
    }

    pub fn trigger_type(&self) -> TriggerType {
        self.kind.trigger_type()
    }

    pub fn is_spatial(&self) -> bool {
        self.kind.is_spatial()
    }

    /// Axis-aligned bounds, `None` for timers
    pub fn bounds(&self) -> Option<AABB> {
        self.kind.bounds()
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Timer state, `None` for spatial triggers
    pub fn timer_state(&self) -> Option<&TimerState> {
        match &self.kind {
            TriggerKind::Timer(state) => Some(state),
            _ => None,
        }
    }

    /// Group currently holding this trigger
    pub fn group(&self) -> Option<GroupId> {
        self.group.as_ref().map(GroupLink::group)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// A disabled trigger neither evaluates checks nor advances time
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether the reference's last check was inside
    pub fn is_inside(&self, reference: ObjectRef) -> bool {
        self.inside.contains(&reference)
    }

    /// References currently inside
    pub fn inside_refs(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.inside.iter().copied()
    }

    /// Forget all inside-state and restart a timer. Handlers are kept.
    pub fn reset(&mut self) {
        self.inside.clear();
        if let TriggerKind::Timer(state) = &mut self.kind {
            state.reset();
        }
    }

    /// Test the trigger against an object's box and fire `enter`, `stay` or
    /// `leave` for that reference.
    ///
    /// Returns whether the box satisfies the condition. A disabled trigger
    /// fires nothing and returns the reference's current inside-state.
    ///
    /// # Panics
    ///
    /// Panics if called on a timer trigger or with a box containing NaN.
    pub fn check(&mut self, aabb: &AABB, reference: ObjectRef) -> bool {
        assert!(!aabb.has_nan(), "{}: check() with NaN box {:?}", self.id, aabb);

        let is_inside = match &self.kind {
            TriggerKind::Timer(_) => panic!("{}: check() called on a timer trigger", self.id),
            _ if !self.enabled => return self.is_inside(reference),
            TriggerKind::Area(shape) => shape.overlaps(aabb),
            TriggerKind::Distance { origin, distance } => {
                volume::within_distance(*origin, *distance, aabb)
            }
        };

        let was_inside = self.inside.contains(&reference);

        match (is_inside, was_inside) {
            (true, false) => {
                self.inside.insert(reference);
                log::trace!("{} entered {}", reference, self.id);
                self.fire(TriggerEvent::enter(self.id, reference));
            }
            (true, true) => {
                self.fire(TriggerEvent::stay(self.id, reference));
            }
            (false, true) => {
                self.inside.remove(&reference);
                log::trace!("{} left {}", reference, self.id);
                self.fire(TriggerEvent::leave(self.id, reference));
            }
            (false, false) => {}
        }

        is_inside
    }

    /// Fire `leave` for a reference that was inside, without any geometry test.
    ///
    /// Used by groups for objects outside the group's bounds. Returns whether
    /// a `leave` fired. A disabled trigger fires nothing and keeps the reference.
    pub fn fire_event_if_reference_has_left(&mut self, reference: ObjectRef) -> bool {
        if !self.enabled || !self.inside.remove(&reference) {
            return false;
        }

        log::trace!("{} left {} (outside group bounds)", reference, self.id);
        self.fire(TriggerEvent::leave(self.id, reference));
        true
    }

    /// Advance a timer trigger, firing `timer_update` and `timer_end` as due.
    /// No effect on spatial or disabled triggers.
    pub fn update_time(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }

        let ticks = match &mut self.kind {
            TriggerKind::Timer(state) => state.advance(dt),
            _ => return,
        };

        for tick in ticks {
            match tick {
                TimerTick::Update(time) => {
                    self.fire(TriggerEvent::timer_update(self.id, time));
                }
                TimerTick::End => {
                    log::debug!("{} timer ended", self.id);
                    self.fire(TriggerEvent::timer_end(self.id));
                }
            }
        }
    }

    /// Dispatch an event to this trigger's handlers.
    ///
    /// After a `leave` dispatch that left no `leave` handlers behind, the
    /// trigger drops out of its group's leave-listener set.
    pub fn fire(&mut self, event: TriggerEvent) -> Outcome {
        let outcome = self.handlers.fire(&event);

        if event.event_type == TriggerEventType::Leave && !self.has_leave_listener() {
            self.unregister_leave();
        }

        outcome
    }

    /// Add a persistent handler
    pub fn on<F>(&mut self, event_type: TriggerEventType, f: F) -> HandlerId
    where
        F: Fn(&TriggerEvent) -> Outcome + Send + Sync + 'static,
    {
        let id = self.handlers.on(event_type, f);
        if event_type == TriggerEventType::Leave {
            self.register_leave();
        }
        id
    }

    /// Add a handler removed after its first invocation
    pub fn once<F>(&mut self, event_type: TriggerEventType, f: F) -> HandlerId
    where
        F: FnOnce(&TriggerEvent) -> Outcome + Send + Sync + 'static,
    {
        let id = self.handlers.once(event_type, f);
        if event_type == TriggerEventType::Leave {
            self.register_leave();
        }
        id
    }

    /// Remove every handler of an event type. No-op if there are none.
    pub fn off(&mut self, event_type: TriggerEventType) {
        self.handlers.off(event_type);
        if event_type == TriggerEventType::Leave {
            self.unregister_leave();
        }
    }

    /// Remove one handler. Returns whether it was registered.
    pub fn off_handler(&mut self, event_type: TriggerEventType, handler: HandlerId) -> bool {
        let removed = self.handlers.off_handler(event_type, handler);
        if event_type == TriggerEventType::Leave && !self.has_leave_listener() {
            self.unregister_leave();
        }
        removed
    }

    pub fn has_listeners(&self, event_type: TriggerEventType) -> bool {
        self.handlers.has_listeners(event_type)
    }

    pub fn has_leave_listener(&self) -> bool {
        self.handlers.has_listeners(TriggerEventType::Leave)
    }

    pub(crate) fn attach(&mut self, link: GroupLink) {
        self.group = Some(link);
    }

    pub(crate) fn detach(&mut self) {
        self.group = None;
    }

    fn register_leave(&self) {
        if let Some(link) = &self.group {
            link.register(self.id);
        }
    }

    fn unregister_leave(&self) {
        if let Some(link) = &self.group {
            link.unregister(self.id);
        }
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("inside_count", &self.inside.len())
            .field("handlers", &self.handlers)
            .field("group", &self.group())
            .finish()
    }
}
