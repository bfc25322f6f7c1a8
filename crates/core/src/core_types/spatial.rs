//! Spatial queries for "entities within radius"
//!
//! The fire core never computes collisions itself. It asks a [`SpatialQuery`]
//! for candidate entities around a point and treats the answer as a set.
//! Hosts embedding the core in an engine usually forward the query to their
//! physics scene; [`SpatialIndex`] is the built-in hashed grid used when no
//! such service exists (tests, the headless demo, the C ABI).

use crate::core_types::entity::EntityHandle;
use crate::core_types::vec3::Vec3;
use crate::error::QueryError;
use rustc_hash::FxHashMap;

/// Service answering radius queries over registered entities.
///
/// Results must be finite; order is irrelevant and duplicates are tolerated
/// (callers collapse them). `track`/`untrack` are invoked by the simulation as
/// entities are registered and removed; services that observe the world on
/// their own can keep the default no-ops.
pub trait SpatialQuery: Send + Sync {
    /// Return every entity whose position lies within `radius` of `center`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the service cannot answer right now.
    fn query_radius(&self, center: Vec3, radius: f32) -> Result<Vec<EntityHandle>, QueryError>;

    /// Start tracking an entity at a fixed position
    fn track(&mut self, _handle: EntityHandle, _position: Vec3) {}

    /// Stop tracking an entity
    fn untrack(&mut self, _handle: EntityHandle) {}
}

/// Spatial index using a hashed uniform grid for fast neighbor queries
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cells: FxHashMap<u64, Vec<EntityHandle>>,
    positions: FxHashMap<EntityHandle, Vec3>,
    cell_size: f32,
}

impl SpatialIndex {
    /// Create a new spatial index.
    ///
    /// Cell size should be about the largest spread radius in use so that a
    /// query touches only a handful of cells.
    pub fn new(cell_size: f32) -> Self {
        SpatialIndex {
            cells: FxHashMap::default(),
            positions: FxHashMap::default(),
            cell_size: cell_size.max(f32::EPSILON),
        }
    }

    fn cell_coord(&self, value: f32) -> i32 {
        (value / self.cell_size).floor() as i32
    }

    fn hash_position(&self, pos: Vec3) -> u64 {
        morton_encode(
            self.cell_coord(pos.x),
            self.cell_coord(pos.y),
            self.cell_coord(pos.z),
        )
    }

    /// Insert an entity, replacing any previous position it had
    pub fn insert(&mut self, handle: EntityHandle, position: Vec3) {
        self.remove(handle);
        let hash = self.hash_position(position);
        self.cells.entry(hash).or_default().push(handle);
        self.positions.insert(handle, position);
    }

    /// Remove an entity from the index
    pub fn remove(&mut self, handle: EntityHandle) {
        let Some(position) = self.positions.remove(&handle) else {
            return;
        };
        let hash = self.hash_position(position);
        if let Some(cell) = self.cells.get_mut(&hash) {
            cell.retain(|&h| h != handle);
            if cell.is_empty() {
                self.cells.remove(&hash);
            }
        }
    }

    /// Query all entities within a radius (exact distance test, sorted, no duplicates)
    pub fn within(&self, center: Vec3, radius: f32) -> Vec<EntityHandle> {
        if !radius.is_finite() || radius < 0.0 {
            return Vec::new();
        }

        let min = center.add_scalar(-radius);
        let max = center.add_scalar(radius);
        let radius_sq = radius * radius;
        let (lo, hi) = (
            [self.cell_coord(min.x), self.cell_coord(min.y), self.cell_coord(min.z)],
            [self.cell_coord(max.x), self.cell_coord(max.y), self.cell_coord(max.z)],
        );

        // Large radii would sweep mostly empty cells; scan the entities instead
        let swept: f64 = (0..3)
            .map(|axis| f64::from(hi[axis]) - f64::from(lo[axis]) + 1.0)
            .product();
        if swept > self.positions.len() as f64 {
            let mut results: Vec<EntityHandle> = self
                .positions
                .iter()
                .filter(|(_, p)| (*p - center).norm_squared() <= radius_sq)
                .map(|(&h, _)| h)
                .collect();
            results.sort_unstable();
            return results;
        }

        let mut results = Vec::new();
        for ix in lo[0]..=hi[0] {
            for iy in lo[1]..=hi[1] {
                for iz in lo[2]..=hi[2] {
                    let Some(handles) = self.cells.get(&morton_encode(ix, iy, iz)) else {
                        continue;
                    };
                    results.extend(handles.iter().copied().filter(|h| {
                        self.positions
                            .get(h)
                            .is_some_and(|p| (p - center).norm_squared() <= radius_sq)
                    }));
                }
            }
        }

        // Morton codes wrap for very distant cells, so a bucket can be visited twice
        results.sort_unstable();
        results.dedup();
        results
    }

    /// Position an entity was inserted at
    pub fn position_of(&self, handle: EntityHandle) -> Option<Vec3> {
        self.positions.get(&handle).copied()
    }

    /// Get number of occupied cells in the index
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get number of entities in the index
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the index holds no entities
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl SpatialQuery for SpatialIndex {
    fn query_radius(&self, center: Vec3, radius: f32) -> Result<Vec<EntityHandle>, QueryError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(QueryError::InvalidRadius(radius));
        }
        Ok(self.within(center, radius))
    }

    fn track(&mut self, handle: EntityHandle, position: Vec3) {
        self.insert(handle, position);
    }

    fn untrack(&mut self, handle: EntityHandle) {
        self.remove(handle);
    }
}

/// Morton encode 3D cell coordinates into a single 64-bit integer.
/// Interleaves 21 bits per axis; negative coordinates wrap via two's complement.
fn morton_encode(x: i32, y: i32, z: i32) -> u64 {
    let x = u64::from(x as u32);
    let y = u64::from(y as u32);
    let z = u64::from(z as u32);

    let mut result = 0u64;

    for i in 0..21 {
        result |= ((x & (1 << i)) << (2 * i))
            | ((y & (1 << i)) << (2 * i + 1))
            | ((z & (1 << i)) << (2 * i + 2));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(raw: u32) -> EntityHandle {
        EntityHandle::new(raw)
    }

    #[test]
    fn test_spatial_index_insert_query() {
        let mut index = SpatialIndex::new(10.0);

        index.insert(h(1), Vec3::new(0.0, 0.0, 0.0));
        index.insert(h(2), Vec3::new(5.0, 5.0, 5.0));
        index.insert(h(3), Vec3::new(50.0, 50.0, 50.0));

        let nearby = index.within(Vec3::zeros(), 15.0);
        assert_eq!(nearby, vec![h(1), h(2)]);
    }

    #[test]
    fn test_query_is_exact_distance() {
        let mut index = SpatialIndex::new(10.0);
        index.insert(h(1), Vec3::new(4.9, 0.0, 0.0));
        index.insert(h(2), Vec3::new(5.1, 0.0, 0.0));

        // Both share a cell with the origin, only one is inside the sphere
        assert_eq!(index.within(Vec3::zeros(), 5.0), vec![h(1)]);
    }

    #[test]
    fn test_negative_coordinates_cross_cells() {
        let mut index = SpatialIndex::new(2.0);
        index.insert(h(7), Vec3::new(-3.0, -0.5, 0.0));
        index.insert(h(8), Vec3::new(1.5, 0.0, 0.0));

        let found = index.within(Vec3::new(-1.0, 0.0, 0.0), 2.6);
        assert_eq!(found, vec![h(7), h(8)]);
    }

    #[test]
    fn test_remove_and_reinsert() {
        let mut index = SpatialIndex::new(5.0);
        index.insert(h(1), Vec3::zeros());
        index.insert(h(1), Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(index.len(), 1);
        assert!(index.within(Vec3::zeros(), 1.0).is_empty());

        index.remove(h(1));
        assert!(index.is_empty());
        assert_eq!(index.cell_count(), 0);
    }

    #[test]
    fn test_invalid_radius_is_query_error() {
        let index = SpatialIndex::new(5.0);
        assert_eq!(
            index.query_radius(Vec3::zeros(), -1.0),
            Err(QueryError::InvalidRadius(-1.0))
        );
    }

    #[test]
    fn test_huge_radius_scans_entities() {
        let mut index = SpatialIndex::new(1.0);
        index.insert(h(1), Vec3::new(0.0, 0.0, 0.0));
        index.insert(h(2), Vec3::new(40_000.0, 0.0, 0.0));
        index.insert(h(3), Vec3::new(-60_000.0, 5.0, 0.0));

        // Sweeping every cell here would visit ~10^14 buckets
        let found = index.within(Vec3::zeros(), 50_000.0);
        assert_eq!(found, vec![h(1), h(2)]);
        assert_eq!(index.within(Vec3::zeros(), 1e9), vec![h(1), h(2), h(3)]);
    }

    #[test]
    fn test_both_query_paths_agree() {
        let mut index = SpatialIndex::new(2.0);
        for i in 0..50u32 {
            let t = i as f32;
            index.insert(h(i), Vec3::new((t * 1.7) % 23.0, (t * 3.1) % 7.0, (t * 0.9) % 11.0));
        }
        let center = Vec3::new(10.0, 3.0, 5.0);
        index.insert(h(50), center);
        // Small radius sweeps cells, large radius scans positions
        let small = index.within(center, 1.5);
        let large = index.within(center, 400.0);
        let expected_small: Vec<_> = (0..=50u32)
            .map(h)
            .filter(|&e| (index.position_of(e).unwrap() - center).norm_squared() <= 1.5 * 1.5)
            .collect();
        assert!(small.contains(&h(50)));
        assert_eq!(small, expected_small);
        assert_eq!(large.len(), 51);
    }

    #[test]
    fn test_morton_encoding() {
        let code1 = morton_encode(0, 0, 0);
        let code2 = morton_encode(1, 0, 0);
        let code3 = morton_encode(0, 1, 0);

        assert_eq!(code1, 0);
        assert_eq!(code2, 1);
        assert_eq!(code3, 2);
    }
}
