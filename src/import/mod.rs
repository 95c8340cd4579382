//! Loading infrastructure and timetables from files

pub mod csv;

pub use self::csv::{load_infrastructure, load_timetable, read_infrastructure, read_timetable};
