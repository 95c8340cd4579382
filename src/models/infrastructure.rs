use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{InterlockingRouteId, ResourceId};

/// Read-only view of the infrastructure as needed for ordering graph construction
///
/// Implementors must hand out each route's resources sorted ascending; the
/// conflict checks rely on it and assert it.
pub trait InfrastructureSource {
    /// Sorted resource ids occupied by `route`, or `None` if the route is unknown
    fn route_resources(&self, route: InterlockingRouteId) -> Option<&[ResourceId]>;
}

/// Interlocking route id -> sorted, deduplicated set of occupied resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResourceMap {
    routes: BTreeMap<InterlockingRouteId, Vec<ResourceId>>,
}

impl RouteResourceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route` with the given resources, replacing any previous entry.
    /// Input order does not matter; the stored set is sorted once here.
    pub fn insert<I>(&mut self, route: InterlockingRouteId, resources: I)
    where
        I: IntoIterator<Item = ResourceId>,
    {
        let mut resources: Vec<ResourceId> = resources.into_iter().collect();
        resources.sort_unstable();
        resources.dedup();
        self.routes.insert(route, resources);
    }

    /// Add a single resource to `route`, creating the route if needed
    pub fn add_resource(&mut self, route: InterlockingRouteId, resource: ResourceId) {
        let resources = self.routes.entry(route).or_default();
        if let Err(pos) = resources.binary_search(&resource) {
            resources.insert(pos, resource);
        }
    }

    #[must_use]
    pub fn contains(&self, route: InterlockingRouteId) -> bool {
        self.routes.contains_key(&route)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route ids in ascending order
    pub fn route_ids(&self) -> impl Iterator<Item = InterlockingRouteId> + '_ {
        self.routes.keys().copied()
    }
}

impl InfrastructureSource for RouteResourceMap {
    fn route_resources(&self, route: InterlockingRouteId) -> Option<&[ResourceId]> {
        self.routes.get(&route).map(Vec::as_slice)
    }
}

impl<I> FromIterator<(InterlockingRouteId, I)> for RouteResourceMap
where
    I: IntoIterator<Item = ResourceId>,
{
    fn from_iter<T: IntoIterator<Item = (InterlockingRouteId, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (route, resources) in iter {
            map.insert(route, resources);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sorts_and_dedups() {
        let mut map = RouteResourceMap::new();
        map.insert(7, vec![5, 1, 3, 1]);
        assert_eq!(map.route_resources(7), Some(&[1, 3, 5][..]));
        assert_eq!(map.route_resources(8), None);
    }

    #[test]
    fn test_add_resource_keeps_order() {
        let mut map = RouteResourceMap::new();
        map.add_resource(2, 9);
        map.add_resource(2, 4);
        map.add_resource(2, 9);
        map.add_resource(2, 6);
        assert_eq!(map.route_resources(2), Some(&[4, 6, 9][..]));
    }

    #[test]
    fn test_from_iter_and_route_ids() {
        let map: RouteResourceMap = vec![(3, vec![1]), (1, vec![2, 1]), (2, vec![])]
            .into_iter()
            .collect();
        assert_eq!(map.len(), 3);
        assert_eq!(map.route_ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(map.contains(2));
        assert_eq!(map.route_resources(2), Some(&[][..]));
    }
}
