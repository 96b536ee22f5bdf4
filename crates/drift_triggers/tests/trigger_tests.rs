//! Integration tests for drift_triggers
//!
//! Objects move through a grid; triggers are checked only for objects in
//! the tiles a group covers.

use drift_grid::prelude::*;
use drift_math::AABB;
use drift_triggers::prelude::*;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type EventLog = Arc<Mutex<Vec<(TriggerEventType, Option<ObjectRef>)>>>;

fn recorder(trigger: &mut Trigger, log: &EventLog) {
    for ty in [
        TriggerEventType::Enter,
        TriggerEventType::Stay,
        TriggerEventType::Leave,
    ] {
        let log = log.clone();
        trigger.on(ty, move |e| {
            log.lock().push((e.event_type, e.reference));
            Outcome::Continue
        });
    }
}

#[test]
fn test_grid_driven_checks() {
    let log: EventLog = Arc::default();

    let mut door = Trigger::rectangle(40.0, 40.0, 10.0, 10.0);
    recorder(&mut door, &log);
    let mut group = TriggerGroup::new();
    group.add(door);

    let mut positions: HashMap<ObjectRef, AABB> = HashMap::new();
    positions.insert(ObjectRef(1), AABB::new(0.0, 0.0, 2.0, 2.0));
    positions.insert(ObjectRef(2), AABB::new(90.0, 90.0, 2.0, 2.0));

    let mut grid: Grid2D<ObjectRef> = Grid2D::new(GridConfig::default()).unwrap();
    let mut refs: Vec<ObjectRef> = positions.keys().copied().collect();
    refs.sort();
    grid.add(refs.iter().copied(), |r| positions[r]);

    // Object 1 walks diagonally through the door and out the other side
    for _ in 0..12 {
        let aabb = positions.get_mut(&ObjectRef(1)).unwrap();
        *aabb = aabb.translate(drift_math::Vec2::new(5.0, 5.0));
        grid.update_tiles_of_object(ObjectRef(1), |r| positions[r]);

        for reference in grid.query(&group.bounds()) {
            group.check(&positions[&reference], reference);
        }
    }

    let log = log.lock();
    let kinds: Vec<_> = log.iter().map(|(ty, _)| *ty).collect();
    assert_eq!(kinds.first(), Some(&TriggerEventType::Enter));
    assert_eq!(kinds.last(), Some(&TriggerEventType::Leave));
    assert_eq!(kinds.iter().filter(|t| **t == TriggerEventType::Enter).count(), 1);
    assert_eq!(kinds.iter().filter(|t| **t == TriggerEventType::Leave).count(), 1);
    assert!(log.iter().all(|(_, r)| *r == Some(ObjectRef(1))));
}

#[test]
fn test_far_jump_through_system() {
    let leaves = Arc::new(Mutex::new(0));

    let mut trigger = Trigger::rectangle(0.0, 0.0, 10.0, 10.0);
    let l = leaves.clone();
    trigger.on(TriggerEventType::Leave, move |_| {
        *l.lock() += 1;
        Outcome::Continue
    });
    let mut group = TriggerGroup::new();
    group.add(trigger);

    let mut system = TriggerSystem::new();
    system.add_group(group);

    let obj = ObjectRef(9);
    system.update(0.1, &[(obj, AABB::new(5.0, 5.0, 1.0, 1.0))]);
    system.update(0.1, &[(obj, AABB::new(1000.0, 1000.0, 1.0, 1.0))]);
    system.update(0.1, &[(obj, AABB::new(1000.0, 1000.0, 1.0, 1.0))]);

    assert_eq!(*leaves.lock(), 1);
}

#[test]
fn test_stop_propagation_across_lists() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut trigger = Trigger::distance(0.0, 0.0, 5.0);

    let c = calls.clone();
    trigger.on(TriggerEventType::Enter, move |_| {
        c.lock().push("first");
        Outcome::StopPropagation
    });
    let c = calls.clone();
    trigger.on(TriggerEventType::Enter, move |_| {
        c.lock().push("second");
        Outcome::Continue
    });
    let c = calls.clone();
    trigger.once(TriggerEventType::Enter, move |_| {
        c.lock().push("once");
        Outcome::Continue
    });

    trigger.check(&AABB::new(1.0, 1.0, 1.0, 1.0), ObjectRef(1));
    assert_eq!(*calls.lock(), vec!["first"]);

    // The one-shot handler never ran, so it is still registered
    assert!(trigger.has_listeners(TriggerEventType::Enter));
}

#[test]
fn test_triggers_from_json() {
    let params = TriggerParams::from_json(
        r#"{ "type": "area", "shape": "circle", "x": 10, "y": 10, "r": 4, "cooldown": 2 }"#,
    )
    .unwrap();
    let circle = Trigger::new(&params).unwrap();
    assert_eq!(circle.trigger_type(), TriggerType::Area);
    assert_eq!(circle.bounds(), Some(AABB::new(6.0, 6.0, 8.0, 8.0)));
    assert_eq!(circle.cooldown(), 2.0);

    let params = TriggerParams::from_json(r#"{ "type": "timer", "interval": 3, "loop": true }"#).unwrap();
    let timer = Trigger::new(&params).unwrap();
    assert!(timer.timer_state().unwrap().is_looping());
    assert_eq!(timer.bounds(), None);

    let params = TriggerParams::from_json(r#"{ "type": "timer" }"#).unwrap();
    assert!(matches!(Trigger::new(&params), Err(TriggerError::InvalidInterval(_))));

    assert!(matches!(
        TriggerParams::from_json(r#"{ "type": "portal" }"#),
        Err(TriggerError::InvalidParams(_))
    ));
}

#[test]
fn test_event_names() {
    for name in ["enter", "stay", "leave", "timer_update", "timer_end"] {
        let ty: TriggerEventType = name.parse().unwrap();
        assert_eq!(ty.to_string(), name);
    }
    assert!("exit".parse::<TriggerEventType>().is_err());
}
