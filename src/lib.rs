//! bqlmon - Byte Queue Limits monitor library.
//!
//! This library provides the pieces behind the `bqlmon` dashboard:
//! - `collector` - sysfs access, interface probing and per-queue BQL counters
//! - `tui` - viewport, color tiers, frame planning and the render loop

pub mod collector;
pub mod tui;
