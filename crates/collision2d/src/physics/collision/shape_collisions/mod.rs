//! Stateless narrow-phase routines, one per shape pairing
//!
//! All routines expect shapes whose bounds were already recalculated for
//! the current transform. For a routine `a_to_b(a, b)` the result normal
//! points from `b` toward `a` and `min_translation = -normal * depth`.

mod circle;
mod line;
mod point;
mod polygon;
mod sector;

pub use circle::{circle_overlaps_circle, circle_to_box, circle_to_circle, circle_to_polygon, rect_to_circle};
pub use line::{line_to_circle, line_to_polygon, line_to_sector};
pub use point::{point_to_box, point_to_circle, point_to_polygon, point_to_sector};
pub use polygon::{box_to_box, minkowski_difference, polygon_to_polygon};
pub use sector::{
    sector_overlaps_polygon, sector_overlaps_sector, sector_to_circle, sector_to_polygon,
    sector_to_sector,
};
