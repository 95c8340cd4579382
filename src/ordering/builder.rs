//! Ordering graph construction from infrastructure and timetable.
//!
//! Every itinerary entry becomes one node. Usages of conflicting interlocking
//! routes by different trains are ordered by time: along every resource, a
//! usage is linked from its nearest predecessors of other trains (chain
//! precedence), and an edge is skipped when one of the two trains uses a
//! conflicting route in between. Usages that overlap in time cannot be
//! ordered and are reported as structural conflicts.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::conflict::{ConflictingUsage, RouteConflictTable, StructuralConflict};
use crate::error::{OrderingError, Result};
use crate::logging::PhaseTimer;
use crate::models::{
    InfrastructureSource, InterlockingRouteId, Interval, ItineraryEntry, NodeId, OrderingGraph,
    ResourceId, TemporalOrder, TimetableSource, TrainId, UnixTime,
};

/// Construction settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Also link consecutive itinerary entries of the same train
    pub train_edges: bool,
}

/// A finished ordering graph together with the conflicts found while building it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingBuild {
    pub graph: OrderingGraph,
    /// Overlapping usages of conflicting routes, sorted by node ids
    pub conflicts: Vec<StructuralConflict>,
}

impl OrderingBuild {
    #[must_use]
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    #[must_use]
    pub fn into_graph(self) -> OrderingGraph {
        self.graph
    }
}

/// One itinerary entry, resolved to its node
#[derive(Debug, Clone, Copy)]
struct Usage {
    node: NodeId,
    train: TrainId,
    /// Position of the train in node order; equal slots mean same train
    slot: usize,
    route: InterlockingRouteId,
    interval: Interval,
}

impl Usage {
    /// Temporal precedence with ties between identical instants broken by node id
    fn is_before(&self, other: &Self) -> bool {
        self.interval.order(&other.interval, self.node < other.node) == TemporalOrder::Before
    }

    fn as_conflicting(&self) -> ConflictingUsage {
        ConflictingUsage {
            node: self.node,
            train: self.train,
            route: self.route,
            interval: self.interval,
        }
    }
}

/// Mutually exclusive unit along which usages are chained in time. Routes
/// without any resource still exclude themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ChainKey {
    Resource(ResourceId),
    Route(InterlockingRouteId),
}

/// Result of scanning all chains. Values are usage indices, which equal node ids.
#[derive(Default)]
struct ChainScan {
    /// `(p, x)`: `p` is a nearest predecessor of `x` on some shared chain
    candidates: Vec<(usize, usize)>,
    /// Overlapping pairs of different trains, lower index first
    conflicts: BTreeSet<(usize, usize)>,
}

/// Build the ordering graph for `timetable` on `infrastructure`
///
/// Nodes are numbered train by train in the order reported by the
/// timetable, and within a train in itinerary order. Overlapping usages of
/// conflicting routes are returned in [`OrderingBuild::conflicts`] instead
/// of failing the build.
///
/// # Errors
///
/// - [`OrderingError::UnknownRoute`] if an itinerary references a route the
///   infrastructure does not know
/// - [`OrderingError::InvertedInterval`] if an entry is left before it is entered
/// - [`OrderingError::UnorderedItinerary`] if an entry starts before the
///   previous entry of the same train ends
pub fn build_ordering_graph<I, T>(
    infrastructure: &I,
    timetable: &T,
    options: &BuildOptions,
) -> Result<OrderingBuild>
where
    I: InfrastructureSource + ?Sized,
    T: TimetableSource + ?Sized,
{
    let timer = PhaseTimer::start("collect itineraries");
    let itineraries = collect_itineraries(infrastructure, timetable)?;
    timer.finish();

    let entry_count = itineraries.iter().map(|(_, entries)| entries.len()).sum();
    let mut graph = OrderingGraph::with_capacity(entry_count);
    let mut usages = Vec::with_capacity(entry_count);
    let mut train_ranges = Vec::with_capacity(itineraries.len());
    for (slot, (train, entries)) in itineraries.iter().enumerate() {
        let first = usages.len();
        for entry in *entries {
            let node = graph.add_node(entry.route, *train);
            usages.push(Usage {
                node,
                train: *train,
                slot,
                route: entry.route,
                interval: entry.interval,
            });
        }
        train_ranges.push(first..usages.len());
    }

    let timer = PhaseTimer::start("route conflicts");
    let mut route_resources: BTreeMap<InterlockingRouteId, &[ResourceId]> = BTreeMap::new();
    for usage in &usages {
        if let Some(resources) = infrastructure.route_resources(usage.route) {
            route_resources.entry(usage.route).or_insert(resources);
        }
    }
    let routes: Vec<(InterlockingRouteId, &[ResourceId])> =
        route_resources.iter().map(|(&route, &resources)| (route, resources)).collect();
    let table = RouteConflictTable::build(&routes);
    timer.finish();

    let timer = PhaseTimer::start("scan chains");
    let scan = scan_chains(&usages, &route_resources);
    timer.finish();

    let mut edges: Vec<(usize, usize)> = scan
        .candidates
        .into_iter()
        .filter(|&(p, x)| !separated_within_pair(p, x, &usages, &train_ranges, &table))
        .collect();
    if options.train_edges {
        for range in &train_ranges {
            edges.extend(range.clone().zip(range.clone().skip(1)));
        }
    }
    edges.sort_unstable();
    edges.dedup();
    for &(from, to) in &edges {
        graph.emplace_edge(usages[from].node, usages[to].node);
    }

    let conflicts: Vec<StructuralConflict> = scan
        .conflicts
        .iter()
        .map(|&(a, b)| structural_conflict(&usages[a], &usages[b], &table))
        .collect();
    for conflict in &conflicts {
        log::warn!("{conflict}");
    }

    log::debug!(
        "ordering graph: {} trains, {} nodes, {} edges, {} structural conflicts",
        itineraries.len(),
        graph.len(),
        edges.len(),
        conflicts.len()
    );
    Ok(OrderingBuild { graph, conflicts })
}

/// Resolve and check every itinerary, keeping the timetable's train order
fn collect_itineraries<'t, I, T>(
    infrastructure: &I,
    timetable: &'t T,
) -> Result<Vec<(TrainId, &'t [ItineraryEntry])>>
where
    I: InfrastructureSource + ?Sized,
    T: TimetableSource + ?Sized,
{
    let mut seen = BTreeSet::new();
    let mut itineraries = Vec::new();
    for train in timetable.train_ids() {
        if !seen.insert(train) {
            continue;
        }
        let entries = timetable.itinerary(train).unwrap_or(&[]);
        for (index, entry) in entries.iter().enumerate() {
            if infrastructure.route_resources(entry.route).is_none() {
                return Err(OrderingError::UnknownRoute { train, route: entry.route });
            }
            if entry.interval.is_inverted() {
                return Err(OrderingError::InvertedInterval {
                    train,
                    index,
                    entry: entry.interval.entry,
                    exit: entry.interval.exit,
                });
            }
            if let Some(previous) = index.checked_sub(1).map(|i| &entries[i]) {
                if entry.interval.entry < previous.interval.exit {
                    return Err(OrderingError::UnorderedItinerary {
                        train,
                        index,
                        previous_exit: previous.interval.exit,
                        entry: entry.interval.entry,
                    });
                }
            }
        }
        itineraries.push((train, entries));
    }
    Ok(itineraries)
}

/// Group usages by the resources their routes occupy
fn chains(
    usages: &[Usage],
    route_resources: &BTreeMap<InterlockingRouteId, &[ResourceId]>,
) -> BTreeMap<ChainKey, Vec<usize>> {
    let mut chains: BTreeMap<ChainKey, Vec<usize>> = BTreeMap::new();
    for (idx, usage) in usages.iter().enumerate() {
        match route_resources.get(&usage.route) {
            Some(resources) if !resources.is_empty() => {
                for &resource in *resources {
                    chains.entry(ChainKey::Resource(resource)).or_default().push(idx);
                }
            }
            _ => chains.entry(ChainKey::Route(usage.route)).or_default().push(idx),
        }
    }
    chains
}

fn scan_chains(
    usages: &[Usage],
    route_resources: &BTreeMap<InterlockingRouteId, &[ResourceId]>,
) -> ChainScan {
    let mut scan = ChainScan::default();
    for chain in chains(usages, route_resources).values() {
        if chain.len() < 2 {
            continue;
        }
        nearest_predecessors(chain, usages, &mut scan.candidates);
        overlapping_pairs(chain, usages, &mut scan.conflicts);
    }
    scan
}

/// For every usage of the chain, the latest usages of other trains that are
/// released before it is entered
fn nearest_predecessors(chain: &[usize], usages: &[Usage], out: &mut Vec<(usize, usize)>) {
    let mut by_exit = chain.to_vec();
    by_exit.sort_unstable_by_key(|&i| {
        let u = &usages[i];
        (u.interval.exit, u.interval.entry, u.node)
    });
    let mut latest_entry = Vec::with_capacity(by_exit.len());
    for &i in &by_exit {
        let entry = usages[i].interval.entry;
        latest_entry.push(latest_entry.last().map_or(entry, |&m: &UnixTime| m.max(entry)));
    }

    for &ix in chain {
        let x = &usages[ix];
        // `by_exit[..before]` are exactly the usages ordered before `x`
        let before = by_exit.partition_point(|&iy| usages[iy].is_before(x));
        if before == 0 {
            continue;
        }
        let horizon = latest_entry[before - 1];
        let start = by_exit[..before].partition_point(|&iy| usages[iy].interval.exit < horizon);
        let tail = &by_exit[start..before];
        for &ip in tail {
            let p = &usages[ip];
            if p.slot == x.slot {
                continue;
            }
            let dominated = tail.iter().any(|&iz| iz != ip && p.is_before(&usages[iz]));
            if !dominated {
                out.push((ip, ix));
            }
        }
    }
}

/// Sweep the chain by entry time and pair every usage with the still
/// occupied ones it overlaps
fn overlapping_pairs(chain: &[usize], usages: &[Usage], out: &mut BTreeSet<(usize, usize)>) {
    let mut by_entry = chain.to_vec();
    by_entry.sort_unstable_by_key(|&i| {
        let u = &usages[i];
        (u.interval.entry, u.interval.exit, u.node)
    });

    let mut active: Vec<usize> = Vec::new();
    for &ix in &by_entry {
        let x = &usages[ix];
        active.retain(|&iy| !usages[iy].interval.precedes(&x.interval));
        for &iy in &active {
            let y = &usages[iy];
            if y.slot != x.slot && x.interval.order(&y.interval, true) == TemporalOrder::Overlap {
                out.insert((ix.min(iy), ix.max(iy)));
            }
        }
        active.push(ix);
    }
}

/// Whether one of the two trains uses a route conflicting with the other
/// train's usage strictly between `p` and `x`; the edge is then implied
fn separated_within_pair(
    p: usize,
    x: usize,
    usages: &[Usage],
    train_ranges: &[Range<usize>],
    table: &RouteConflictTable,
) -> bool {
    let (earlier, later) = (&usages[p], &usages[x]);
    for w in usages[train_ranges[later.slot].start..x].iter().rev() {
        if !earlier.is_before(w) {
            break;
        }
        if table.conflicts(w.route, earlier.route) {
            return true;
        }
    }
    for w in &usages[p + 1..train_ranges[earlier.slot].end] {
        if !w.is_before(later) {
            break;
        }
        if table.conflicts(w.route, later.route) {
            return true;
        }
    }
    false
}

fn structural_conflict(a: &Usage, b: &Usage, table: &RouteConflictTable) -> StructuralConflict {
    StructuralConflict {
        first: a.as_conflicting(),
        second: b.as_conflicting(),
        overlap: a.interval.overlap(&b.interval).unwrap_or(Interval {
            entry: a.interval.entry.max(b.interval.entry),
            exit: a.interval.exit.min(b.interval.exit),
        }),
        shared_resources: table.shared_resources(a.route, b.route).to_vec(),
    }
}
