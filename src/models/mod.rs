mod ids;
mod infrastructure;
mod ordering_graph;
mod time;
mod timetable;

pub use ids::{node_id_from_index, InterlockingRouteId, NodeId, ResourceId, TrainId, INVALID_NODE};
pub use infrastructure::{InfrastructureSource, RouteResourceMap};
pub use ordering_graph::{OrderingGraph, OrderingNode};
pub use time::{parse_time_hms, Interval, TemporalOrder, UnixTime};
pub use timetable::{ItineraryEntry, Timetable, TimetableSource};
