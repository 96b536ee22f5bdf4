//! Integration tests for drift_grid
//!
//! Objects live in a caller-owned arena; the grid only ever sees their indices.

use drift_grid::prelude::*;
use drift_math::AABB;

struct Body {
    x: f32,
    y: f32,
    size: f32,
}

fn aabb_of(bodies: &[Body], index: usize) -> AABB {
    let b = &bodies[index];
    AABB::new(b.x, b.y, b.size, b.size)
}

#[test]
fn test_membership_matches_tiles_after_every_move() {
    let mut bodies = vec![
        Body { x: 0.0, y: 0.0, size: 5.0 },
        Body { x: 18.0, y: 18.0, size: 4.0 },
        Body { x: 95.0, y: 45.0, size: 10.0 },
    ];

    let mut grid: Grid2D<usize> = Grid2D::new(GridConfig::new(100.0, 50.0, 10.0, 10.0)).unwrap();
    grid.add(0..bodies.len(), |&i| aabb_of(&bodies, i));

    for step in 0..20 {
        for (i, body) in bodies.iter_mut().enumerate() {
            body.x += 3.0 + i as f32;
            body.y -= 1.5;
        }

        for i in 0..bodies.len() {
            grid.update_tiles_of_object(i, |&i| aabb_of(&bodies, i));
        }

        // Every tile that lists an object is one of its recorded tiles and vice versa
        for y in 0..grid.num_tiles_y() {
            for x in 0..grid.num_tiles_x() {
                let coord = TileCoord::new(x, y);
                for &i in grid.objects_in_tile(coord) {
                    assert!(
                        grid.get_containing_tiles(&i).contains(&coord),
                        "step {}: object {} in tile {:?} without back-reference",
                        step,
                        i,
                        coord
                    );
                }
            }
        }

        for i in 0..bodies.len() {
            for coord in grid.get_containing_tiles(&i) {
                let occupants = grid.objects_in_tile(*coord);
                assert_eq!(occupants.iter().filter(|&&o| o == i).count(), 1);
            }
        }
    }

    // Everything drifted off the right edge eventually
    assert!(grid.get_containing_tiles(&2).is_empty());
    assert_eq!(grid.len(), 3);
}

#[test]
fn test_resize_keeps_population_order() {
    let bodies = vec![
        Body { x: 120.0, y: 0.0, size: 1.0 },
        Body { x: 1.0, y: 1.0, size: 1.0 },
    ];

    let mut grid: Grid2D<usize> = Grid2D::new(GridConfig::default()).unwrap();
    grid.add([0, 1], |&i| aabb_of(&bodies, i));
    grid.resize(300.0, 100.0, |&i| aabb_of(&bodies, i)).unwrap();

    assert_eq!(grid.population(), &[0, 1]);
    assert_eq!(grid.get_containing_tiles(&0), &[TileCoord::new(12, 0)]);
    assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(0, 0)]);
}

#[test]
fn test_resize_rejects_invalid_world() {
    let mut grid: Grid2D<usize> = Grid2D::new(GridConfig::default()).unwrap();
    let result = grid.resize(-10.0, 100.0, |_| AABB::new(0.0, 0.0, 1.0, 1.0));
    assert_eq!(
        result,
        Err(GridError::InvalidWorldSize { width: -10.0, height: 100.0 })
    );
}
