//! Roster Engine for event staffing
//!
//! This crate validates slot-based staff schedules against workforce rules,
//! aggregates schedules and check-in records into daily work records, and
//! turns work records into payroll lines and tax-aware settlements.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
