//! CSV export backend.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use lcr_route::CandidateRoute;

use crate::{OutputResult, RouteWriter};

/// Writes routes to five CSV files in a directory.
///
/// # Files
///
/// **`route_summary.csv`**: one row per route.
/// ```text
/// route,length_m,total_cost,average_cost,estimated_cost,elevation_avg_m,elevation_min_m,elevation_max_m,vertices,expanded
/// ```
///
/// **`route_vertices.csv`**: the polyline, origin first.
/// ```text
/// route,seq,lat,lon
/// ```
///
/// **`elevation_profile.csv`**
/// ```text
/// route,distance_m,elevation_m
/// ```
///
/// **`land_cover.csv`**
/// ```text
/// route,subcategory,percent
/// ```
///
/// **`crossings.csv`**: one row per crossing point.
/// ```text
/// route,layer,feature,subcategory,lat,lon
/// ```
///
/// Elevation columns are empty when the route had no elevation data.
pub struct CsvWriter {
    summary:   Writer<File>,
    vertices:  Writer<File>,
    profile:   Writer<File>,
    land:      Writer<File>,
    crossings: Writer<File>,
    next:      usize,
    finished:  bool,
}

impl CsvWriter {
    /// Create (or truncate) the five CSV files in `dir` and write headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summary = Writer::from_path(dir.join("route_summary.csv"))?;
        summary.write_record([
            "route",
            "length_m",
            "total_cost",
            "average_cost",
            "estimated_cost",
            "elevation_avg_m",
            "elevation_min_m",
            "elevation_max_m",
            "vertices",
            "expanded",
        ])?;

        let mut vertices = Writer::from_path(dir.join("route_vertices.csv"))?;
        vertices.write_record(["route", "seq", "lat", "lon"])?;

        let mut profile = Writer::from_path(dir.join("elevation_profile.csv"))?;
        profile.write_record(["route", "distance_m", "elevation_m"])?;

        let mut land = Writer::from_path(dir.join("land_cover.csv"))?;
        land.write_record(["route", "subcategory", "percent"])?;

        let mut crossings = Writer::from_path(dir.join("crossings.csv"))?;
        crossings.write_record(["route", "layer", "feature", "subcategory", "lat", "lon"])?;

        Ok(Self { summary, vertices, profile, land, crossings, next: 0, finished: false })
    }
}

impl RouteWriter for CsvWriter {
    fn write_route(&mut self, route: &CandidateRoute) -> OutputResult<()> {
        let id = self.next.to_string();
        let a = &route.analytics;
        let (avg, min, max) = match a.elevation {
            Some(e) => (e.average_m.to_string(), e.min_m.to_string(), e.max_m.to_string()),
            None    => (String::new(), String::new(), String::new()),
        };
        self.summary.write_record([
            id.clone(),
            route.length_m.to_string(),
            route.total_cost.to_string(),
            a.average_cost.to_string(),
            a.estimated_cost.to_string(),
            avg,
            min,
            max,
            route.vertices.len().to_string(),
            route.stats.expanded.to_string(),
        ])?;

        for (seq, v) in route.vertices.iter().enumerate() {
            self.vertices.write_record([id.clone(), seq.to_string(), v.lat.to_string(), v.lon.to_string()])?;
        }
        for p in &a.elevation_profile {
            self.profile.write_record([id.clone(), p.distance_m.to_string(), p.elevation_m.to_string()])?;
        }
        for share in &a.land_cover {
            self.land.write_record([id.as_str(), share.subcategory.as_str(), share.percent.to_string().as_str()])?;
        }
        for c in &route.crossings {
            self.crossings.write_record([
                id.clone(),
                c.layer.as_str().to_owned(),
                c.feature.index().to_string(),
                c.subcategory.clone(),
                c.location.lat.to_string(),
                c.location.lon.to_string(),
            ])?;
        }

        self.next += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.summary.flush()?;
        self.vertices.flush()?;
        self.profile.flush()?;
        self.land.flush()?;
        self.crossings.flush()?;
        self.finished = true;
        Ok(())
    }
}
