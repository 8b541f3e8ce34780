//! Calendar grid layout engine
//!
//! Pure functions from a reference instant and a canvas size to a
//! [`RenderModel`]. Data flows leaves first:
//!
//! `temporal` → `grid` → `geometry` → `classify` → `model`
//!
//! Nothing in here reads the clock, logs, or keeps state between calls, so
//! models can be built concurrently from any thread.

pub mod classify;
pub mod geometry;
pub mod grid;
pub mod model;
pub mod temporal;

pub use classify::DotKind;
pub use geometry::{resolve_geometry, CanvasGeometry};
pub use grid::{GridCell, GridLayout, Slot};
pub use model::{build_render_model, Drawable, Label, RenderModel};
pub use temporal::{compute_temporal, parse_reference_date, Temporal, YearWindow};
