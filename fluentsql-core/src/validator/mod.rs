//! Gatekeepers that run before any SQL is emitted: injection pattern
//! rejection (C4) and cross-fragment bracket balance (C5).

pub mod bracket;
pub mod injection;
