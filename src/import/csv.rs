use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::models::{
    InterlockingRouteId, ItineraryEntry, ResourceId, RouteResourceMap, Timetable, TrainId, UnixTime,
};

/// `route,resource`; an empty resource declares a route without resources
#[derive(Debug, Deserialize)]
struct InfrastructureRow {
    route: InterlockingRouteId,
    resource: Option<ResourceId>,
}

/// `train,route,entry,exit` with times as seconds or `HH:MM:SS`
#[derive(Debug, Deserialize)]
struct TimetableRow {
    train: TrainId,
    route: InterlockingRouteId,
    entry: String,
    exit: String,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(input)
}

/// Check if a row looks like a header
fn looks_like_header(row: &csv::StringRecord) -> bool {
    row.get(0).is_some_and(|first| !first.is_empty() && first.parse::<u64>().is_err())
}

fn rows<T, R>(input: R) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut rows = Vec::new();
    for (index, record) in reader(input).records().enumerate() {
        let record = record?;
        if index == 0 && looks_like_header(&record) {
            continue;
        }
        rows.push(record.deserialize(None)?);
    }
    Ok(rows)
}

/// Read interlocking route resources from CSV
///
/// # Errors
///
/// Returns [`crate::OrderingError::Csv`] for unreadable or malformed rows.
pub fn read_infrastructure<R: Read>(input: R) -> Result<RouteResourceMap> {
    let mut infrastructure = RouteResourceMap::new();
    for row in rows::<InfrastructureRow, _>(input)? {
        match row.resource {
            Some(resource) => infrastructure.add_resource(row.route, resource),
            None if !infrastructure.contains(row.route) => infrastructure.insert(row.route, Vec::new()),
            None => {}
        }
    }
    log::debug!("read {} interlocking routes", infrastructure.len());
    Ok(infrastructure)
}

/// Read train itineraries from CSV. Rows of one train must be in itinerary order.
///
/// # Errors
///
/// Returns [`crate::OrderingError::Csv`] for unreadable or malformed rows and
/// [`crate::OrderingError::InvalidTime`] for unparseable times.
pub fn read_timetable<R: Read>(input: R) -> Result<Timetable> {
    let mut timetable = Timetable::new();
    for row in rows::<TimetableRow, _>(input)? {
        let entry = UnixTime::parse(&row.entry)?;
        let exit = UnixTime::parse(&row.exit)?;
        timetable.push(row.train, ItineraryEntry::new(row.route, entry, exit));
    }
    log::debug!(
        "read {} trains with {} itinerary entries",
        timetable.train_count(),
        timetable.entry_count()
    );
    Ok(timetable)
}

/// # Errors
///
/// See [`read_infrastructure`].
pub fn load_infrastructure(path: impl AsRef<Path>) -> Result<RouteResourceMap> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    read_infrastructure(file)
}

/// # Errors
///
/// See [`read_timetable`].
pub fn load_timetable(path: impl AsRef<Path>) -> Result<Timetable> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    read_timetable(file)
}
