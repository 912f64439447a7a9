//! `lcr-output` — export writers for generated routes.
//!
//! | Writer          | Files created                                                      |
//! |-----------------|--------------------------------------------------------------------|
//! | [`CsvWriter`]   | `route_summary.csv`, `route_vertices.csv`, `elevation_profile.csv`, `land_cover.csv`, `crossings.csv` |
//! | [`GeoJsonWriter`] | `routes.geojson` (one `Feature` per route)                       |
//!
//! Both implement [`RouteWriter`].  Every row carries a `route` column: the
//! zero-based index of the route in the order it was written.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lcr_output::{CsvWriter, RouteWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! writer.write_route(&route)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod geojson;
pub mod writer;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use crate::geojson::{GeoJsonWriter, to_feature};
pub use writer::RouteWriter;
