//! `lcr-solver` — least-cost path search over a [`CostGrid`](lcr_surface::CostGrid).
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`solver`] | `PathSolver` trait, `CellPath`, `AStarSolver`, `DijkstraSolver`, `solver_for` |
//! | [`error`]  | `SolverError`, `SolverResult<T>`                            |
//!
//! # Cost model
//!
//! The grid is 8-connected.  Stepping into a cell costs that cell's cost
//! times the step length in cells (1 orthogonally, √2 diagonally).  A
//! diagonal step is only allowed when both orthogonal cells it passes between
//! are passable.

pub mod error;
pub mod solver;


pub use error::{SolverError, SolverResult};
pub use solver::{AStarSolver, CellPath, DijkstraSolver, PathSolver, solver_for};
