//! On-call roster optimization service.
//!
//! Given a calendar period, persons, seat-bearing duty slots and per-person
//! unavailability, the service assigns every seat to exactly one person:
//! hard operational rules are posted as inviolable constraints, everything
//! else (fairness, comfort, preferences) is a weighted penalty minimized by
//! a MILP solve over boolean assignment variables.

pub mod api;
pub mod config;
pub mod constraints;
pub mod demo_data;
pub mod domain;
pub mod solver;
