//! Read-only projections used by attendance views.
//!
//! Views consume store contents and hold their own UI-only state (focus
//! index, search term). They never mutate records directly.

pub mod focus;
pub mod list;
