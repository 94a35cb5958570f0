//! SDSS object harvesting and spectrum viewing.
//!
//! * [`harvest`] downloads spectra and cutouts for a CSV catalog into
//!   subclass folders (`sdss-harvest` binary).
//! * [`spectrum`] plus the egui front end in [`app`] show one spectrum file
//!   (`view-spectrum` binary).

pub mod app;
pub mod config;
pub mod data;
pub mod fetch;
pub mod harvest;
pub mod spectrum;
pub mod state;
pub mod ui;
