//! Terminal rendering of attempt outcomes.
//!
//! The core components return tagged `Outcome`s; this module only decides
//! which region they land in and prints them.

pub mod panel;

pub use panel::{FlowState, StatusPanel};
