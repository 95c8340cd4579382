use crate::models::{InterlockingRouteId, ResourceId};
use std::collections::BTreeMap;

use super::intersect::{intersect, is_sorted};

/// Which interlocking routes exclude each other
///
/// Two routes conflict if their resource sets intersect; a route always
/// conflicts with itself. Every route's resource list is sorted once by the
/// infrastructure and reused for all pairwise checks.
#[derive(Debug, Clone, Default)]
pub struct RouteConflictTable {
    /// (lower route, higher route) -> shared resources
    shared: BTreeMap<(InterlockingRouteId, InterlockingRouteId), Vec<ResourceId>>,
}

/// Resource range of one route, for the cheap disjointness pre-check
#[derive(Debug, Clone, Copy)]
struct ResourceBounds {
    min: ResourceId,
    max: ResourceId,
}

impl ResourceBounds {
    fn of(resources: &[ResourceId]) -> Option<Self> {
        Some(Self { min: *resources.first()?, max: *resources.last()? })
    }

    fn disjoint(self, other: Self) -> bool {
        self.max < other.min || other.max < self.min
    }
}

impl RouteConflictTable {
    /// Compute all conflicting pairs among `routes`
    ///
    /// `routes` must be ordered by route id; each resource slice must be sorted.
    ///
    /// # Panics
    ///
    /// Panics if a resource slice is not sorted.
    #[must_use]
    pub fn build(routes: &[(InterlockingRouteId, &[ResourceId])]) -> Self {
        let mut table = Self::default();
        for (route, resources) in routes {
            assert!(is_sorted(resources), "resources of route {route} are not sorted");
        }
        let bounds: Vec<Option<ResourceBounds>> =
            routes.iter().map(|(_, resources)| ResourceBounds::of(resources)).collect();

        for (i, &(route_a, resources_a)) in routes.iter().enumerate() {
            table.record(route_a, route_a, resources_a.to_vec());

            for (j, &(route_b, resources_b)) in routes.iter().enumerate().skip(i + 1) {
                // Routes without resources only conflict with themselves
                let (Some(bounds_a), Some(bounds_b)) = (bounds[i], bounds[j]) else {
                    continue;
                };
                if bounds_a.disjoint(bounds_b) {
                    continue;
                }

                let shared = intersect(resources_a, resources_b);
                if !shared.is_empty() {
                    table.record(route_a, route_b, shared);
                }
            }
        }

        log::debug!(
            "route conflict table: {} routes, {} conflicting pairs",
            routes.len(),
            table.pair_count()
        );
        table
    }

    fn record(&mut self, a: InterlockingRouteId, b: InterlockingRouteId, shared: Vec<ResourceId>) {
        self.shared.insert((a.min(b), a.max(b)), shared);
    }

    #[must_use]
    pub fn conflicts(&self, a: InterlockingRouteId, b: InterlockingRouteId) -> bool {
        self.shared.contains_key(&(a.min(b), a.max(b)))
    }

    /// Resources shared by two conflicting routes; empty if they do not conflict
    #[must_use]
    pub fn shared_resources(&self, a: InterlockingRouteId, b: InterlockingRouteId) -> &[ResourceId] {
        self.shared.get(&(a.min(b), a.max(b))).map_or(&[], Vec::as_slice)
    }

    /// Number of unordered conflicting pairs, self-pairs included
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.shared.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_conflicts_with_itself() {
        let table = RouteConflictTable::build(&[(1, &[4, 5][..]), (2, &[][..])]);
        assert!(table.conflicts(1, 1));
        assert!(table.conflicts(2, 2));
        assert!(!table.conflicts(1, 2));
        assert_eq!(table.shared_resources(1, 1), &[4, 5]);
        assert_eq!(table.pair_count(), 2);
    }

    #[test]
    fn test_shared_resources_are_recorded_symmetrically() {
        let table = RouteConflictTable::build(&[
            (1, &[1, 2, 3][..]),
            (2, &[3, 4][..]),
            (3, &[5, 6][..]),
            (4, &[2, 6][..]),
        ]);

        assert!(table.conflicts(1, 2) && table.conflicts(2, 1));
        assert!(table.conflicts(1, 4) && table.conflicts(3, 4));
        assert!(!table.conflicts(1, 3) && !table.conflicts(2, 4));
        assert_eq!(table.shared_resources(2, 1), &[3]);
        assert_eq!(table.shared_resources(4, 3), &[6]);
        assert!(table.shared_resources(2, 3).is_empty());
        assert_eq!(table.pair_count(), 7);
    }

    #[test]
    fn test_unknown_route_has_no_conflicts() {
        let table = RouteConflictTable::build(&[(1, &[1][..])]);
        assert!(!table.conflicts(99, 99));
        assert!(!table.conflicts(1, 99));
        assert!(table.shared_resources(99, 1).is_empty());
    }

    #[test]
    #[should_panic(expected = "not sorted")]
    fn test_unsorted_resources_are_rejected() {
        let _ = RouteConflictTable::build(&[(1, &[3, 1][..]), (2, &[1, 2][..])]);
    }
}
