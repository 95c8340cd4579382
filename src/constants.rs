/// Seed used by the synthetic generator when the caller does not provide one
pub const DEFAULT_GENERATOR_SEED: u64 = 42;

/// Upper bound (seconds) for one synthetic route occupation, and for the gap
/// between two consecutive occupations of the same train
pub const SYNTHETIC_SLOT_SECS: i64 = 60;
