//! `lcr-surface` — the cost surface the path solver searches.
//!
//! # Build order
//!
//! ```text
//! for every cell (row-major, rows optionally in parallel):
//!   ① AOI      — centre outside the AOI polygon → impassable, done.
//!   ② Land     — baseline + Σ general_weight × general_scale over every
//!                land-cover polygon containing the centre.
//!   ③ Corridor — × Π (1 − corridor_weight × decay(distance)) over every
//!                line feature within the buffer; floored at min_cost_floor.
//!   ④ Barrier  — + barrier_weight × barrier_scale for every railroad that
//!                crosses the cell; above the hard-block threshold the cell
//!                becomes impassable.
//! ```
//!
//! Features are visited in `FeatureId` order so identical inputs always give
//! bit-identical grids.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                         |
//! |------------|------------------------------------------------|
//! | `parallel` | Builds rows on Rayon's thread pool.            |

pub mod builder;
pub mod error;
pub mod grid;


pub use builder::CostSurfaceBuilder;
pub use error::{SurfaceError, SurfaceResult};
pub use grid::{Contribution, CostGrid, Effect, GridGeometry, IMPASSABLE};
