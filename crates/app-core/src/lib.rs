//! Core application logic for MapPath
//!
//! This crate contains the effect layer of the map screen: the session
//! controller that issues mapping platform calls and applies their
//! completions to the session state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controller;

pub use controller::MapSessionController;
