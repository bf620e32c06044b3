//! Route tables

pub mod lookups;
