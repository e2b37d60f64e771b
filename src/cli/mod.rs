//! Terminal presentation of conversions

pub mod convert;
pub mod list;
pub mod setup;
pub mod ui;
