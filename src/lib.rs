//! Linear cutting optimizer for remnants and whole profiles.
//!
//! Pieces are cut from an inventory of leftover stock lengths and whole raw
//! profiles. A [`solver::Solver`] runs one of three [`strategy::Strategy`]
//! variants, each built on the exact single-unit search in [`search`], and
//! returns a reconciled [`scheme::Scheme`] with waste metrics.

pub mod config;
pub mod deadline;
pub mod error;
pub mod pool;
pub mod render;
pub mod request;
pub mod scheme;
pub mod search;
pub mod solver;
pub mod strategy;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;
