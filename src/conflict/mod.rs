//! Resource conflicts between interlocking routes and between route usages

mod intersect;
mod routes;
mod types;

pub use intersect::{intersect, intersects, is_sorted, sort_and_intersect};
pub use routes::RouteConflictTable;
pub use types::{ConflictingUsage, StructuralConflict};
