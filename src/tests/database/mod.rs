//! Database Tests

mod users;
mod viewports;
