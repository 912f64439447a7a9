//! GeoJSON export backend.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue};
use serde_json::json;

use lcr_route::CandidateRoute;

use crate::{OutputResult, RouteWriter};

/// A route as a GeoJSON `Feature` with a `LineString` geometry.
///
/// Coordinates are `[lon, lat]`.  Analytics go into `properties`;
/// `elevation` is `null` when no elevation data was sampled.
pub fn to_feature(route: &CandidateRoute) -> Feature {
    let a = &route.analytics;
    let line: LineString<f64> = route.vertices.iter().map(|&v| Coord::from(v)).collect();

    let elevation = a.elevation.map(|e| json!({
        "average_m": e.average_m,
        "min_m":     e.min_m,
        "max_m":     e.max_m,
    }));
    let land_cover: JsonObject = a
        .land_cover
        .iter()
        .map(|s| (s.subcategory.clone(), json!(s.percent)))
        .collect();
    let crossings: Vec<JsonValue> = a
        .crossings
        .iter()
        .map(|c| json!({ "layer": c.layer.as_str(), "subcategory": c.subcategory, "count": c.count }))
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("length_m".to_owned(), json!(route.length_m));
    properties.insert("total_cost".to_owned(), json!(route.total_cost));
    properties.insert("average_cost".to_owned(), json!(a.average_cost));
    properties.insert("estimated_cost".to_owned(), json!(a.estimated_cost));
    properties.insert("elevation".to_owned(), elevation.unwrap_or(JsonValue::Null));
    properties.insert("land_cover".to_owned(), JsonValue::Object(land_cover));
    properties.insert("crossings".to_owned(), JsonValue::Array(crossings));

    Feature {
        bbox:            None,
        geometry:        Some(Geometry::from(&line)),
        id:              None,
        properties:      Some(properties),
        foreign_members: None,
    }
}

/// Collects routes and writes them as one `FeatureCollection` on
/// [`finish`](RouteWriter::finish).
pub struct GeoJsonWriter {
    path:     PathBuf,
    features: Vec<Feature>,
    finished: bool,
}

impl GeoJsonWriter {
    /// Writer targeting `dir/routes.geojson`.  The file is created on finish.
    pub fn new(dir: &Path) -> Self {
        Self { path: dir.join("routes.geojson"), features: Vec::new(), finished: false }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RouteWriter for GeoJsonWriter {
    fn write_route(&mut self, route: &CandidateRoute) -> OutputResult<()> {
        let mut feature = to_feature(route);
        feature.set_property("route", self.features.len());
        self.features.push(feature);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        let collection = GeoJson::from(FeatureCollection {
            bbox:            None,
            features:        std::mem::take(&mut self.features),
            foreign_members: None,
        });
        let mut out = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut out, &collection)?;
        out.flush()?;
        self.finished = true;
        Ok(())
    }
}
