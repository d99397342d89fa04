//! Text track diagrams: anchor coordinates and mirroring.

pub mod coordinates;
pub mod mirror;
pub mod orientation;
