//! `lcr-spatial` — spatial indexes over reference layers.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`lines`]   | `LineIndex` (segment R-tree), `SegmentEntry`, `Crossing`    |
//! | [`polygons`]| `PolygonIndex` (envelope R-tree + exact containment)        |
//! | [`layers`]  | `LayerIndexes` — one index per layer of a `LayerSet`        |
//! | [`segment`] | planar segment helpers (distance, clipping, AOI coverage)   |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! All coordinates are planar metres in the request's
//! [`LocalFrame`](lcr_core::LocalFrame).  Queries return a candidate set from
//! the R-tree and then apply an exact geometric test.  An index built from
//! an empty layer is valid and misses every query.

pub mod error;
pub mod layers;
pub mod lines;
pub mod polygons;
pub mod segment;


pub use error::{SpatialError, SpatialResult};
pub use layers::LayerIndexes;
pub use lines::{Crossing, LineIndex, SegmentEntry};
pub use polygons::PolygonIndex;
