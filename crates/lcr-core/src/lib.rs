//! `lcr-core` — foundational types for the `rust_lcr` least-cost corridor
//! routing engine.
//!
//! This crate is a dependency of every other `lcr-*` crate.  It has no
//! `lcr-*` dependencies and only a handful of external ones (`geo` for
//! geometry types, `rustc-hash`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`ids`]      | `CellId`, `FeatureId`                                       |
//! | [`coords`]   | `GeoPoint`, haversine distance, `LocalFrame` projection     |
//! | [`layer`]    | `LayerKind`, `PolygonFeature`, `LineFeature`, `LayerSet`    |
//! | [`weights`]  | `WeightProfile`, `WeightTable`, `ResolvedWeight`            |
//! | [`config`]   | `RouteConfig`, `WeightPolarity`, `CorridorDecay`, `SearchStrategy` |
//! | [`cancel`]   | `CancelToken`, `Cancelled`                                  |
//! | [`point`]    | `AreaOfInterest`, `RoutePoint`, `Endpoint`, `EndpointFault` |
//! | [`error`]    | `CoreError`, `CoreResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and model types.  |

pub mod cancel;
pub mod config;
pub mod error;
pub mod coords;
pub mod ids;
pub mod layer;
pub mod point;
pub mod weights;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cancel::{CancelToken, Cancelled};
pub use config::{CorridorDecay, RouteConfig, SearchStrategy, WeightPolarity};
pub use error::{CoreError, CoreResult};
pub use coords::{GeoPoint, LocalFrame};
pub use ids::{CellId, FeatureId};
pub use layer::{LayerKind, LayerSet, LineFeature, PolygonFeature};
pub use point::{AreaOfInterest, Endpoint, EndpointFault, RoutePoint};
pub use weights::{ResolvedWeight, WeightProfile, WeightTable};
