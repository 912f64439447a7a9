//! `lcr-route` — end-to-end least-cost route generation.
//!
//! # Pipeline
//!
//! ```text
//! AreaOfInterest + LayerSet + WeightProfile[] + origin/destination
//!   │
//!   ├─ LayerIndexes::build          (lcr-spatial)
//!   ├─ CostSurfaceBuilder::build    (lcr-surface, rows in parallel)
//!   ├─ PathSolver::solve            (lcr-solver, A* by default)
//!   ├─ PostProcessor::process       simplify, length, samples, crossings
//!   └─ AnalyticsReport::aggregate   pure
//!        → CandidateRoute
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`engine`]    | `RouteEngine<S>`, `RouteRequest`, `generate_route`        |
//! | [`post`]      | `PostProcessor`, `RouteMetrics`, `RouteCrossing`          |
//! | [`simplify`]  | grid-constrained Douglas–Peucker                          |
//! | [`analytics`] | `AnalyticsReport`, `ElevationStats`, shares and counts    |
//! | [`candidate`] | `CandidateRoute`, `SearchStats`                           |
//! | [`elevation`] | `ElevationSampler` trait, `no_elevation`                  |
//! | [`observer`]  | `RouteObserver` stage callbacks, `NoopObserver`           |
//! | [`project`]   | `Project` lifecycle                                       |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | *(default)* Builds the cost surface on Rayon's pool.    |

pub mod analytics;
pub mod candidate;
pub mod elevation;
pub mod engine;
pub mod error;
pub mod observer;
pub mod post;
pub mod project;
pub mod simplify;

#[cfg(test)]
mod tests;

pub use analytics::{AnalyticsReport, CrossingCount, ElevationStats, LandCoverShare, ProfilePoint};
pub use candidate::{CandidateRoute, SearchStats};
pub use elevation::{ElevationSampler, no_elevation};
pub use engine::{RouteEngine, RouteRequest, generate_route};
pub use error::{RouteError, RouteResult};
pub use observer::{NoopObserver, RouteObserver};
pub use post::{PostProcessor, RouteCrossing, RouteMetrics, UNCLASSIFIED};
pub use project::Project;
