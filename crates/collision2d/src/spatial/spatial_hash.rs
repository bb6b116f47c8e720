//! Uniform grid broad-phase
//!
//! Space is cut into square cells of `cell_size`. Each occupied cell lists
//! the handles of every collider whose registered bounds touch it, so a
//! collider spanning several cells appears in each of them. Queries only
//! visit the cells their rectangle or ray passes through.

use std::collections::{HashMap, HashSet};

use crate::foundation::collections::{ColliderArena, ColliderHandle};
use crate::foundation::math::{utils, Rect, Vec2};
use crate::physics::collider::Collider;
use crate::physics::collision::{BoxShape, Circle, Ray2D, RaycastHit, Shape};
use crate::physics::collision_layers::CollisionLayers;
use crate::spatial::raycast_parser::{RaycastPolicy, RaycastResultParser};

/// Integer cell coordinate `(floor(x / cell_size), floor(y / cell_size))`
pub type CellCoord = (i32, i32);

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// Minimum cell
    pub min: CellCoord,
    /// Maximum cell, inclusive
    pub max: CellCoord,
}

impl CellRange {
    /// Range holding a single cell
    pub fn single(cell: CellCoord) -> Self {
        Self { min: cell, max: cell }
    }

    /// Whether `cell` lies in the range
    pub fn contains(&self, cell: CellCoord) -> bool {
        (self.min.0..=self.max.0).contains(&cell.0) && (self.min.1..=self.max.1).contains(&cell.1)
    }

    /// Smallest range holding both ranges
    pub fn union(&self, other: &CellRange) -> Self {
        Self {
            min: (self.min.0.min(other.min.0), self.min.1.min(other.min.1)),
            max: (self.max.0.max(other.max.0), self.max.1.max(other.max.1)),
        }
    }

    /// Every cell in the range, column by column
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let (min, max) = (self.min, self.max);
        (min.0..=max.0).flat_map(move |x| (min.1..=max.1).map(move |y| (x, y)))
    }
}

/// Spatial hash over collider handles
#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    inverse_cell_size: f32,
    cells: HashMap<CellCoord, Vec<ColliderHandle>>,
    grid_bounds: Option<CellRange>,
}

impl SpatialHash {
    /// Create an empty hash with square cells of `cell_size`
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inverse_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            grid_bounds: None,
        }
    }

    /// Edge length of one cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing the world point `(x, y)`
    pub fn cell_coords(&self, x: f32, y: f32) -> CellCoord {
        (
            (x * self.inverse_cell_size).floor() as i32,
            (y * self.inverse_cell_size).floor() as i32,
        )
    }

    /// Cells covered by `bounds`
    pub fn cell_range(&self, bounds: &Rect) -> CellRange {
        CellRange {
            min: self.cell_coords(bounds.left(), bounds.top()),
            max: self.cell_coords(bounds.right(), bounds.bottom()),
        }
    }

    /// World rectangle of a cell
    pub fn cell_rect(&self, cell: CellCoord) -> Rect {
        Rect::new(
            cell.0 as f32 * self.cell_size,
            cell.1 as f32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Colliders listed in a cell
    pub fn cell_at(&self, cell: CellCoord) -> Option<&[ColliderHandle]> {
        self.cells.get(&cell).map(Vec::as_slice)
    }

    /// Envelope of every cell ever touched by a registration
    pub fn grid_bounds(&self) -> Option<CellRange> {
        self.grid_bounds
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Occupied cells and their contents
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &[ColliderHandle])> + '_ {
        self.cells.iter().map(|(coord, handles)| (*coord, handles.as_slice()))
    }

    /// Every handle in the hash
    pub fn all_colliders(&self) -> HashSet<ColliderHandle> {
        self.cells.values().flatten().copied().collect()
    }

    /// Insert a collider into every cell its current bounds cover, and
    /// remember those bounds on the collider for removal
    pub fn register(&mut self, handle: ColliderHandle, collider: &mut Collider) {
        let bounds = collider.bounds();
        collider.mark_registered(bounds);

        let range = self.cell_range(&bounds);
        self.grid_bounds = Some(match self.grid_bounds {
            Some(grid) => grid.union(&range),
            None => range,
        });

        for cell in range.cells() {
            self.cells.entry(cell).or_default().push(handle);
        }

        log::trace!("Registered collider {handle:?} in cells {range:?}");
    }

    /// Remove a collider from the cells of its registered bounds.
    ///
    /// Returns false if the collider was missing from a cell it should be
    /// in; the hash is left as is for that cell.
    pub fn remove(&mut self, handle: ColliderHandle, collider: &mut Collider) -> bool {
        let range = self.cell_range(&collider.registered_physics_bounds());
        collider.mark_unregistered();

        let mut found_everywhere = true;
        for cell in range.cells() {
            let removed = match self.cells.get_mut(&cell) {
                Some(handles) => match handles.iter().position(|&h| h == handle) {
                    Some(index) => {
                        handles.swap_remove(index);
                        if handles.is_empty() {
                            self.cells.remove(&cell);
                        }
                        true
                    }
                    None => false,
                },
                None => false,
            };

            if !removed {
                log::error!("Removing collider {handle:?} from cell {cell:?} that it is not present in");
                found_everywhere = false;
            }
        }

        found_everywhere
    }

    /// Remove a handle from every cell, wherever it is. Returns how many
    /// cells listed it.
    pub fn remove_with_brute_force(&mut self, handle: ColliderHandle) -> usize {
        let mut removed = 0;
        self.cells.retain(|_, handles| {
            let before = handles.len();
            handles.retain(|&h| h != handle);
            removed += before - handles.len();
            !handles.is_empty()
        });
        removed
    }

    /// Remove a collider and register it again under its current bounds
    pub fn update(&mut self, handle: ColliderHandle, collider: &mut Collider) -> bool {
        let found = self.remove(handle, collider);
        self.register(handle, collider);
        found
    }

    /// Drop every cell
    pub fn clear(&mut self) {
        self.cells.clear();
        self.grid_bounds = None;
    }

    /// Colliders whose bounds intersect `bounds` and whose layer is in
    /// `layer_mask`, skipping `exclude`
    pub fn aabb_broadphase(
        &self,
        colliders: &ColliderArena<Collider>,
        bounds: &Rect,
        exclude: Option<ColliderHandle>,
        layer_mask: u32,
    ) -> HashSet<ColliderHandle> {
        let mut result = HashSet::new();

        for cell in self.cell_range(bounds).cells() {
            let Some(handles) = self.cells.get(&cell) else {
                continue;
            };

            for &handle in handles {
                if Some(handle) == exclude || result.contains(&handle) {
                    continue;
                }

                let Some(collider) = colliders.get(handle) else {
                    log::warn!("Broadphase skipped stale collider handle {handle:?}");
                    continue;
                };

                if CollisionLayers::is_flag_set(layer_mask, collider.physics_layer)
                    && bounds.intersects(&collider.cached_bounds())
                {
                    result.insert(handle);
                }
            }
        }

        result
    }

    /// Cast a segment through the grid, filling `hits` nearest first.
    ///
    /// Walks the cells the segment crosses in order, stepping along
    /// whichever axis reaches its next cell boundary first. The walk stops
    /// early once `hits` is full and no unvisited cell can hold a closer hit.
    pub fn linecast(
        &self,
        colliders: &ColliderArena<Collider>,
        start: Vec2,
        end: Vec2,
        hits: &mut [RaycastHit],
        layer_mask: u32,
        ignored: Option<&HashSet<ColliderHandle>>,
        policy: RaycastPolicy,
    ) -> usize {
        if hits.is_empty() {
            log::warn!("Linecast called with an empty hits buffer");
            return 0;
        }

        let ray = Ray2D::new(start, end);
        let mut parser = RaycastResultParser::new(ray, hits.len(), layer_mask, ignored, policy);

        let mut current = self.cell_coords(start.x, start.y);
        let last = self.cell_coords(end.x, end.y);

        let step_x = if current.0 == last.0 { 0 } else { step_sign(ray.direction.x) };
        let step_y = if current.1 == last.1 { 0 } else { step_sign(ray.direction.y) };

        let (mut t_max_x, t_delta_x) = self.axis_traversal(current.0, step_x, start.x, ray.direction.x);
        let (mut t_max_y, t_delta_y) = self.axis_traversal(current.1, step_y, start.y, ray.direction.y);

        if let Some(cell) = self.cells.get(&current) {
            parser.check_ray_intersection(cell, colliders);
        }

        while current != last {
            if parser.can_stop(t_max_x.min(t_max_y)) {
                break;
            }

            if t_max_x < t_max_y {
                current.0 = utils::approach(current.0, last.0, step_x.abs());
                t_max_x = if current.0 == last.0 { f32::MAX } else { t_max_x + t_delta_x };
            } else {
                current.1 = utils::approach(current.1, last.1, step_y.abs());
                t_max_y = if current.1 == last.1 { f32::MAX } else { t_max_y + t_delta_y };
            }

            if let Some(cell) = self.cells.get(&current) {
                parser.check_ray_intersection(cell, colliders);
            }
        }

        parser.finish(hits)
    }

    /// Fraction of the ray at the first cell boundary along one axis, and
    /// the fraction covered by crossing one whole cell
    fn axis_traversal(&self, cell: i32, step: i32, origin: f32, direction: f32) -> (f32, f32) {
        if step == 0 {
            return (f32::MAX, f32::MAX);
        }

        let boundary = (cell + step.max(0)) as f32 * self.cell_size;
        let t_max = (boundary - origin) / direction;
        let t_delta = self.cell_size / (direction * step as f32);
        (t_max, t_delta)
    }

    /// Colliders overlapping `rect`, written into `results`
    pub fn overlap_rectangle(
        &self,
        colliders: &ColliderArena<Collider>,
        rect: &Rect,
        results: &mut [ColliderHandle],
        layer_mask: u32,
    ) -> usize {
        if results.is_empty() {
            log::warn!("Overlap rectangle called with an empty results buffer");
            return 0;
        }

        let test_shape = Shape::Box(BoxShape::from_rect(rect));
        self.collect_overlaps(colliders, rect, &test_shape, results, layer_mask)
    }

    /// Colliders overlapping the circle, written into `results`
    pub fn overlap_circle(
        &self,
        colliders: &ColliderArena<Collider>,
        center: Vec2,
        radius: f32,
        results: &mut [ColliderHandle],
        layer_mask: u32,
    ) -> usize {
        if results.is_empty() {
            log::warn!("Overlap circle called with an empty results buffer");
            return 0;
        }

        let test_shape = Shape::Circle(Circle::at(center, radius));
        let bounds = test_shape.bounds();
        self.collect_overlaps(colliders, &bounds, &test_shape, results, layer_mask)
    }

    fn collect_overlaps(
        &self,
        colliders: &ColliderArena<Collider>,
        bounds: &Rect,
        test_shape: &Shape,
        results: &mut [ColliderHandle],
        layer_mask: u32,
    ) -> usize {
        let mut candidates: Vec<ColliderHandle> =
            self.aabb_broadphase(colliders, bounds, None, layer_mask).into_iter().collect();
        candidates.sort_unstable();

        let mut count = 0;
        for handle in candidates {
            let Some(collider) = colliders.get(handle) else {
                continue;
            };

            if collider.shape().overlaps(test_shape) {
                results[count] = handle;
                count += 1;
                if count == results.len() {
                    break;
                }
            }
        }

        count
    }
}

/// Grid step for a ray direction component
fn step_sign(direction: f32) -> i32 {
    if direction > 0.0 {
        1
    } else if direction < 0.0 {
        -1
    } else {
        0
    }
}
