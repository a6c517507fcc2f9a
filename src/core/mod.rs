
pub mod logging;
pub mod types;

// Game system registry: immutable pack snapshots, swap-on-reload
pub mod registry;

// Compendium query engine: filter + search + pagination over a snapshot
pub mod query;
