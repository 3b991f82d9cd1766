//! File-level entry points.

pub mod encode;
