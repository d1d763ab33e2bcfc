//! Per-tab screen state.
//!
//! Each screen owns its transient state. The shell mounts one screen at a
//! time and drops it when the user navigates away.

pub mod assistant;
pub mod auth;
pub mod booking;
pub mod inbox;
pub mod profile;
pub mod reels;
pub mod social;
