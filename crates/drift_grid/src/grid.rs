//! Uniform tile grid with per-object tile membership

use crate::config::GridConfig;
use crate::error::Result;
use drift_math::AABB;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Column/row index of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive tile range covered by a box, already intersected with the grid.
/// `None` when nothing of the box lies on the grid.
struct TileSpan {
    x_min: u32,
    x_max: u32,
    y_min: u32,
    y_max: u32,
}

/// Tile-based 2D spatial index.
///
/// The grid stores object keys `K` (entity ids, arena indices, ...), never
/// the objects themselves. Position and size are supplied by the caller on
/// every insertion through a `pos_size` strategy, so the grid has no
/// knowledge of how objects represent their shape.
///
/// Each tile holds non-owning keys, and a side table maps each key to the
/// tiles it currently occupies. Movement is never detected by the grid:
/// the owner calls [`update_tiles_of_object`](Self::update_tiles_of_object)
/// after moving an object.
#[derive(Debug, Clone)]
pub struct Grid2D<K> {
    config: GridConfig,
    num_tiles_x: u32,
    num_tiles_y: u32,
    /// Row-major tile buckets
    tiles: Vec<Vec<K>>,
    /// Tracked objects in insertion order
    population: Vec<K>,
    /// Reverse index: object -> tiles containing it
    memberships: HashMap<K, Vec<TileCoord>>,
}

impl<K> Grid2D<K>
where
    K: Copy + Eq + Hash,
{
    /// Create an empty grid
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;

        let mut grid = Self {
            config,
            num_tiles_x: 0,
            num_tiles_y: 0,
            tiles: Vec::new(),
            population: Vec::new(),
            memberships: HashMap::new(),
        };
        grid.calculate_tiles();
        Ok(grid)
    }

    /// Replace the configuration, rebuild the tiles and reset the population
    pub fn configure(&mut self, config: GridConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.clear();
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn num_tiles_x(&self) -> u32 {
        self.num_tiles_x
    }

    pub fn num_tiles_y(&self) -> u32 {
        self.num_tiles_y
    }

    /// Tracked objects in insertion order
    pub fn population(&self) -> &[K] {
        &self.population
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Whether the object was added to the grid
    pub fn contains(&self, object: &K) -> bool {
        self.memberships.contains_key(object)
    }

    /// Track objects and insert each into every tile its box overlaps.
    ///
    /// Objects that are already tracked are re-bucketed instead of added twice.
    pub fn add<I, F>(&mut self, objects: I, mut pos_size: F)
    where
        I: IntoIterator<Item = K>,
        F: FnMut(&K) -> AABB,
    {
        for object in objects {
            let aabb = pos_size(&object);

            if self.memberships.contains_key(&object) {
                self.detach(&object);
            } else {
                self.population.push(object);
            }

            self.insert(object, &aabb);
        }
    }

    /// Remove the object from the tiles it occupies and re-insert it at its
    /// current box.
    ///
    /// Returns `false` (and does nothing) if the object was never added.
    pub fn update_tiles_of_object<F>(&mut self, object: K, pos_size: F) -> bool
    where
        F: FnOnce(&K) -> AABB,
    {
        if !self.memberships.contains_key(&object) {
            return false;
        }

        let aabb = pos_size(&object);
        self.detach(&object);
        self.insert(object, &aabb);
        true
    }

    /// Re-bucket every tracked object
    pub fn update_population<F>(&mut self, mut pos_size: F)
    where
        F: FnMut(&K) -> AABB,
    {
        for i in 0..self.population.len() {
            let object = self.population[i];
            let aabb = pos_size(&object);
            self.detach(&object);
            self.insert(object, &aabb);
        }
    }

    /// Tiles currently containing the object. Empty if untracked or off-grid.
    pub fn get_containing_tiles(&self, object: &K) -> &[TileCoord] {
        self.memberships
            .get(object)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Objects registered in a tile. Empty for coordinates outside the grid.
    pub fn objects_in_tile(&self, coord: TileCoord) -> &[K] {
        self.tile_index(coord)
            .map(|index| self.tiles[index].as_slice())
            .unwrap_or(&[])
    }

    /// Distinct objects registered in any tile the box covers, in first-seen order.
    ///
    /// This is a broad-phase candidate list: candidates share a tile with the
    /// box but do not necessarily overlap it.
    pub fn query(&self, aabb: &AABB) -> Vec<K> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        if let Some(span) = self.span(aabb) {
            for y in span.y_min..=span.y_max {
                for x in span.x_min..=span.x_max {
                    for &object in &self.tiles[self.flat_index(x, y)] {
                        if seen.insert(object) {
                            found.push(object);
                        }
                    }
                }
            }
        }

        found
    }

    /// Empty every tile and forget the population
    pub fn clear(&mut self) {
        self.population.clear();
        self.memberships.clear();
        self.calculate_tiles();
    }

    /// Change the world size, rebuild the tiles and re-insert the population
    pub fn resize<F>(&mut self, width: f32, height: f32, mut pos_size: F) -> Result<()>
    where
        F: FnMut(&K) -> AABB,
    {
        let config = GridConfig {
            width,
            height,
            ..self.config
        };
        config.validate()?;

        self.config = config;
        self.calculate_tiles();
        self.memberships.clear();

        for i in 0..self.population.len() {
            let object = self.population[i];
            let aabb = pos_size(&object);
            self.insert(object, &aabb);
        }

        Ok(())
    }

    fn calculate_tiles(&mut self) {
        self.num_tiles_x = self.config.num_tiles_x();
        self.num_tiles_y = self.config.num_tiles_y();

        let count = self.num_tiles_x as usize * self.num_tiles_y as usize;
        self.tiles = vec![Vec::new(); count];

        log::debug!(
            "Grid rebuilt: {}x{} tiles of {}x{} px",
            self.num_tiles_x,
            self.num_tiles_y,
            self.config.tile_width,
            self.config.tile_height
        );
    }

    #[inline]
    fn flat_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.num_tiles_x as usize + x as usize
    }

    fn tile_index(&self, coord: TileCoord) -> Option<usize> {
        (coord.x < self.num_tiles_x && coord.y < self.num_tiles_y)
            .then(|| self.flat_index(coord.x, coord.y))
    }

    /// `floor(edge / tile)` on both axes, restricted to in-bounds tiles.
    fn span(&self, aabb: &AABB) -> Option<TileSpan> {
        if aabb.has_nan() || self.num_tiles_x == 0 || self.num_tiles_y == 0 {
            return None;
        }

        let x_min = (aabb.x / self.config.tile_width).floor() as i64;
        let x_max = (aabb.right() / self.config.tile_width).floor() as i64;
        let y_min = (aabb.y / self.config.tile_height).floor() as i64;
        let y_max = (aabb.bottom() / self.config.tile_height).floor() as i64;

        let last_x = self.num_tiles_x as i64 - 1;
        let last_y = self.num_tiles_y as i64 - 1;

        // Indices outside the grid are skipped, so only the in-bounds part of
        // the range is walked.
        let x_min = x_min.max(0);
        let y_min = y_min.max(0);
        let x_max = x_max.min(last_x);
        let y_max = y_max.min(last_y);

        if x_min > x_max || y_min > y_max {
            return None;
        }

        Some(TileSpan {
            x_min: x_min as u32,
            x_max: x_max as u32,
            y_min: y_min as u32,
            y_max: y_max as u32,
        })
    }

    fn insert(&mut self, object: K, aabb: &AABB) {
        let mut occupied = Vec::new();

        if let Some(span) = self.span(aabb) {
            for y in span.y_min..=span.y_max {
                for x in span.x_min..=span.x_max {
                    let index = self.flat_index(x, y);
                    self.tiles[index].push(object);
                    occupied.push(TileCoord::new(x, y));
                }
            }
        } else if aabb.has_nan() {
            log::warn!("Object box {:?} contains NaN, not placed in any tile", aabb);
        }

        log::trace!("Object placed in {} tile(s)", occupied.len());
        self.memberships.insert(object, occupied);
    }

    /// Scan-and-splice the object out of every tile it occupies
    fn detach(&mut self, object: &K) {
        let Some(occupied) = self.memberships.get_mut(object) else {
            return;
        };

        for coord in occupied.drain(..) {
            let index = coord.y as usize * self.num_tiles_x as usize + coord.x as usize;
            let tile = &mut self.tiles[index];
            if let Some(pos) = tile.iter().position(|o| o == object) {
                tile.remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid2D<u32> {
        Grid2D::new(GridConfig::default()).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = grid();
        assert_eq!(grid.num_tiles_x(), 10);
        assert_eq!(grid.num_tiles_y(), 10);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_rejects_zero_tiles() {
        let result = Grid2D::<u32>::new(GridConfig::default().with_tile_size(0.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_add_single_tile() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(0.0, 0.0, 5.0, 5.0));

        assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(0, 0)]);
        assert_eq!(grid.objects_in_tile(TileCoord::new(0, 0)), &[1]);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_add_spanning_tiles() {
        let mut grid = grid();
        grid.add([7], |_| AABB::new(5.0, 5.0, 10.0, 10.0));

        let tiles = grid.get_containing_tiles(&7);
        assert_eq!(
            tiles,
            &[
                TileCoord::new(0, 0),
                TileCoord::new(1, 0),
                TileCoord::new(0, 1),
                TileCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_update_moves_object() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(0.0, 0.0, 5.0, 5.0));

        assert!(grid.update_tiles_of_object(1, |_| AABB::new(12.0, 0.0, 5.0, 5.0)));

        assert!(grid.objects_in_tile(TileCoord::new(0, 0)).is_empty());
        assert_eq!(grid.objects_in_tile(TileCoord::new(1, 0)), &[1]);
        assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(1, 0)]);
    }

    #[test]
    fn test_update_untracked_is_ignored() {
        let mut grid = grid();
        assert!(!grid.update_tiles_of_object(3, |_| AABB::new(0.0, 0.0, 1.0, 1.0)));
        assert!(grid.get_containing_tiles(&3).is_empty());
    }

    #[test]
    fn test_partially_off_grid() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(-5.0, 95.0, 10.0, 10.0));

        // Only the in-bounds tile (0, 9) is registered
        assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(0, 9)]);
    }

    #[test]
    fn test_fully_off_grid() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(500.0, 500.0, 10.0, 10.0));

        assert!(grid.contains(&1));
        assert!(grid.get_containing_tiles(&1).is_empty());

        // Coming back onto the grid works as usual
        grid.update_tiles_of_object(1, |_| AABB::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(0, 0)]);
    }

    #[test]
    fn test_add_twice_does_not_duplicate() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(0.0, 0.0, 5.0, 5.0));
        grid.add([1], |_| AABB::new(30.0, 30.0, 5.0, 5.0));

        assert_eq!(grid.population(), &[1]);
        assert!(grid.objects_in_tile(TileCoord::new(0, 0)).is_empty());
        assert_eq!(grid.objects_in_tile(TileCoord::new(3, 3)), &[1]);
    }

    #[test]
    fn test_query_dedups() {
        let mut grid = grid();
        grid.add([1, 2, 3], |o| match o {
            1 => AABB::new(5.0, 5.0, 10.0, 10.0),
            2 => AABB::new(12.0, 2.0, 2.0, 2.0),
            _ => AABB::new(80.0, 80.0, 2.0, 2.0),
        });

        let found = grid.query(&AABB::new(0.0, 0.0, 19.0, 19.0));
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn test_update_population() {
        let mut grid = grid();
        grid.add([1, 2], |_| AABB::new(0.0, 0.0, 1.0, 1.0));
        grid.update_population(|o| AABB::new(*o as f32 * 20.0, 0.0, 1.0, 1.0));

        assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(2, 0)]);
        assert_eq!(grid.get_containing_tiles(&2), &[TileCoord::new(4, 0)]);
        assert!(grid.objects_in_tile(TileCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_resize_repopulates() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(150.0, 5.0, 1.0, 1.0));
        assert!(grid.get_containing_tiles(&1).is_empty());

        grid.resize(200.0, 100.0, |_| AABB::new(150.0, 5.0, 1.0, 1.0)).unwrap();

        assert_eq!(grid.num_tiles_x(), 20);
        assert_eq!(grid.get_containing_tiles(&1), &[TileCoord::new(15, 0)]);
        assert_eq!(grid.population(), &[1]);
    }

    #[test]
    fn test_clear() {
        let mut grid = grid();
        grid.add([1, 2], |_| AABB::new(0.0, 0.0, 1.0, 1.0));
        grid.clear();

        assert!(grid.is_empty());
        assert!(!grid.contains(&1));
        assert!(grid.objects_in_tile(TileCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn test_configure_resets() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(0.0, 0.0, 1.0, 1.0));
        grid.configure(GridConfig::new(40.0, 40.0, 20.0, 20.0)).unwrap();

        assert_eq!(grid.num_tiles_x(), 2);
        assert!(grid.is_empty());
        assert!(grid.configure(GridConfig::new(40.0, 40.0, 0.0, 20.0)).is_err());
        // Failed configure leaves the grid untouched
        assert_eq!(grid.num_tiles_x(), 2);
    }

    #[test]
    fn test_nan_box_is_skipped() {
        let mut grid = grid();
        grid.add([1], |_| AABB::new(f32::NAN, 0.0, 1.0, 1.0));
        assert!(grid.contains(&1));
        assert!(grid.get_containing_tiles(&1).is_empty());
    }
}
