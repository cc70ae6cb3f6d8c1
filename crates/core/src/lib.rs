//! Core business logic for EcoTrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Spend totals come in from the reporting layer and allocation plans go back
//! out to the store; nothing here performs I/O.
//!
//! # Modules
//!
//! - `kdv` - Turkish VAT (KDV) arithmetic and rate suggestion
//! - `budget` - Budget auto-allocation, evaluation and spend reporting

pub mod budget;
pub mod kdv;
