//! Drift demo
//!
//! Moves a handful of objects around a small world, keeps them bucketed in a
//! grid, checks only the objects the grid finds near the triggers and logs
//! every trigger event they cause.
//!
//! Run with: cargo run -p drift_demo
//!       or: cargo run -p drift_demo -- scene.json

use drift_grid::prelude::*;
use drift_math::{Vec2, AABB};
use drift_triggers::prelude::*;
use serde::Deserialize;
use std::error::Error;

/// Scene description, loadable from JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct Scene {
    grid: GridConfig,
    ticks: u32,
    time_step: f32,
    objects: u32,
    triggers: Vec<TriggerParams>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            grid: GridConfig::new(200.0, 120.0, 20.0, 20.0),
            ticks: 120,
            time_step: 1.0 / 30.0,
            objects: 4,
            triggers: vec![
                TriggerParams::rectangle(40.0, 20.0, 30.0, 30.0),
                TriggerParams::circle(140.0, 60.0, 20.0),
                TriggerParams::distance(100.0, 100.0, 15.0),
                TriggerParams::timer(1.0, true).with_update_on_each(0.25),
            ],
        }
    }
}

/// A box moving at constant velocity, bouncing off the world edges
struct Mover {
    aabb: AABB,
    velocity: Vec2,
}

impl Mover {
    fn step(&mut self, dt: f32, world: &GridConfig) {
        self.aabb = self.aabb.translate(self.velocity * dt);

        if self.aabb.x < 0.0 || self.aabb.right() > world.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.aabb.y < 0.0 || self.aabb.bottom() > world.height {
            self.velocity.y = -self.velocity.y;
        }
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> std::result::Result<(), Box<dyn Error>> {
    let scene: Scene = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene from {}", path);
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        }
        None => Scene::default(),
    };

    let mut grid: Grid2D<ObjectRef> = Grid2D::new(scene.grid)?;

    let mut group = TriggerGroup::new();
    for params in &scene.triggers {
        let mut trigger = Trigger::new(params)?;
        log_events(&mut trigger);
        group.add(trigger);
    }

    let mut system = TriggerSystem::new();
    let group_id = system.add_group(group);

    let mut movers: Vec<Mover> = (0..scene.objects)
        .map(|i| {
            let offset = i as f32;
            Mover {
                aabb: AABB::new(5.0 + offset * 30.0, 5.0 + offset * 10.0, 6.0, 6.0),
                velocity: Vec2::new(60.0 - offset * 15.0, 35.0 + offset * 5.0),
            }
        })
        .collect();

    grid.add((0..scene.objects).map(|i| ObjectRef(i as u64)), |r| movers[r.0 as usize].aabb);

    log::info!(
        "Simulating {} object(s) on a {}x{} tile grid for {} tick(s)",
        movers.len(),
        grid.num_tiles_x(),
        grid.num_tiles_y(),
        scene.ticks
    );

    let bounds = system
        .group(group_id)
        .map(TriggerGroup::bounds)
        .unwrap_or(AABB::EMPTY);

    // Objects near the triggers last tick, so those that moved away still get their leave
    let mut previous: Vec<ObjectRef> = Vec::new();

    for tick in 0..scene.ticks {
        for mover in &mut movers {
            mover.step(scene.time_step, grid.config());
        }
        grid.update_population(|r| movers[r.0 as usize].aabb);

        let nearby = grid.query(&bounds);
        let objects: Vec<(ObjectRef, AABB)> = candidates(&nearby, &previous)
            .into_iter()
            .map(|r| (r, movers[r.0 as usize].aabb))
            .collect();
        log::debug!("Tick {}: checking {} of {} object(s)", tick, objects.len(), grid.len());
        system.update(scene.time_step, &objects);
        previous = nearby;
    }

    log::info!("Simulated {:.2}s", system.elapsed());
    Ok(())
}

/// Objects to check this tick: those near the triggers now, then those that
/// were near last tick and may have left
fn candidates(nearby: &[ObjectRef], previous: &[ObjectRef]) -> Vec<ObjectRef> {
    let mut found = nearby.to_vec();
    found.extend(previous.iter().copied().filter(|r| !nearby.contains(r)));
    found
}

/// Log every event the trigger can produce
fn log_events(trigger: &mut Trigger) {
    let events: &[TriggerEventType] = if trigger.is_spatial() {
        &[TriggerEventType::Enter, TriggerEventType::Leave]
    } else {
        &[TriggerEventType::TimerUpdate, TriggerEventType::TimerEnd]
    };

    for &ty in events {
        trigger.on(ty, |event| {
            match (event.reference, event.time) {
                (Some(reference), _) => log::info!("{} {} {}", event.trigger, event.event_type, reference),
                (None, Some(time)) => log::info!("{} {} at {:.2}s", event.trigger, event.event_type, time),
                (None, None) => log::info!("{} {}", event.trigger, event.event_type),
            }
            Outcome::Continue
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_keep_objects_that_moved_away() {
        let nearby = [ObjectRef(1), ObjectRef(2)];
        let previous = [ObjectRef(2), ObjectRef(3)];

        assert_eq!(
            candidates(&nearby, &previous),
            vec![ObjectRef(1), ObjectRef(2), ObjectRef(3)]
        );
        assert!(candidates(&[], &[]).is_empty());
    }

    #[test]
    fn test_far_object_is_culled_after_leaving() {
        let mut grid: Grid2D<ObjectRef> = Grid2D::new(GridConfig::new(100.0, 100.0, 10.0, 10.0)).unwrap();
        let near = AABB::new(2.0, 2.0, 1.0, 1.0);
        let far = AABB::new(80.0, 80.0, 1.0, 1.0);
        grid.add([ObjectRef(1)], |_| near);
        let bounds = AABB::new(0.0, 0.0, 10.0, 10.0);

        let first = grid.query(&bounds);
        assert_eq!(candidates(&first, &[]), vec![ObjectRef(1)]);

        grid.update_tiles_of_object(ObjectRef(1), |_| far);
        let second = grid.query(&bounds);
        assert_eq!(candidates(&second, &first), vec![ObjectRef(1)]);

        let third = grid.query(&bounds);
        assert!(candidates(&third, &second).is_empty());
    }
}
