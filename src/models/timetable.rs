use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ids::{InterlockingRouteId, TrainId};
use super::time::{Interval, UnixTime};

/// One planned use of an interlocking route by a train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryEntry {
    pub route: InterlockingRouteId,
    pub interval: Interval,
}

impl ItineraryEntry {
    #[must_use]
    pub const fn new(route: InterlockingRouteId, entry: UnixTime, exit: UnixTime) -> Self {
        Self { route, interval: Interval::new(entry, exit) }
    }

    #[must_use]
    pub const fn from_secs(route: InterlockingRouteId, entry: i64, exit: i64) -> Self {
        Self { route, interval: Interval::from_secs(entry, exit) }
    }
}

/// Read-only view of the timetable as needed for ordering graph construction
pub trait TimetableSource {
    /// All train ids in a stable order. Node ids are assigned train-major in this order.
    fn train_ids(&self) -> Vec<TrainId>;

    /// Time-ordered itinerary of `train`, or `None` if the train is unknown
    fn itinerary(&self, train: TrainId) -> Option<&[ItineraryEntry]>;
}

/// Itineraries keyed by train, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    trains: IndexMap<TrainId, Vec<ItineraryEntry>>,
}

impl Timetable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole itinerary of `train`. Re-inserting a train keeps its
    /// original position.
    pub fn insert(&mut self, train: TrainId, itinerary: Vec<ItineraryEntry>) {
        self.trains.insert(train, itinerary);
    }

    /// Append one entry to the end of `train`'s itinerary
    pub fn push(&mut self, train: TrainId, entry: ItineraryEntry) {
        self.trains.entry(train).or_default().push(entry);
    }

    #[must_use]
    pub fn train_count(&self) -> usize {
        self.trains.len()
    }

    /// Total number of itinerary entries over all trains
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.trains.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrainId, &[ItineraryEntry])> + '_ {
        self.trains.iter().map(|(&train, entries)| (train, entries.as_slice()))
    }
}

impl TimetableSource for Timetable {
    fn train_ids(&self) -> Vec<TrainId> {
        self.trains.keys().copied().collect()
    }

    fn itinerary(&self, train: TrainId) -> Option<&[ItineraryEntry]> {
        self.trains.get(&train).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_order_is_insertion_order() {
        let mut timetable = Timetable::new();
        timetable.insert(9, vec![ItineraryEntry::from_secs(1, 0, 10)]);
        timetable.insert(2, vec![ItineraryEntry::from_secs(1, 20, 30)]);
        timetable.push(5, ItineraryEntry::from_secs(2, 0, 5));
        timetable.insert(9, vec![ItineraryEntry::from_secs(3, 0, 10)]);

        assert_eq!(timetable.train_ids(), vec![9, 2, 5]);
        assert_eq!(timetable.train_count(), 3);
        assert_eq!(timetable.entry_count(), 3);
        assert_eq!(timetable.itinerary(9).map(|it| it[0].route), Some(3));
    }

    #[test]
    fn test_push_appends() {
        let mut timetable = Timetable::new();
        timetable.push(1, ItineraryEntry::from_secs(4, 0, 5));
        timetable.push(1, ItineraryEntry::from_secs(6, 5, 9));
        let routes: Vec<_> = timetable
            .itinerary(1)
            .expect("train exists")
            .iter()
            .map(|e| e.route)
            .collect();
        assert_eq!(routes, vec![4, 6]);
        assert!(timetable.itinerary(2).is_none());
    }
}
