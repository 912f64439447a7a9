//! square — end-to-end demo for the rust_lcr routing engine.
//!
//! Routes across a synthetic 20 km × 20 km square near Mobile, Alabama with
//! one forest block, a 100-200kV transmission line and a main-line railroad,
//! then writes CSV and GeoJSON output.
//!
//! ```text
//! cargo run -p square -- [config.json] [output_dir]
//! ```
//!
//! `config.json` is an optional `RouteConfig`; missing fields take their
//! defaults.  Set `RUST_LOG=debug` for per-stage detail.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use geo::{LineString, Polygon};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lcr_core::{
    AreaOfInterest, CancelToken, GeoPoint, LayerSet, LineFeature, LocalFrame, PolygonFeature,
    RouteConfig, RoutePoint, WeightProfile,
};
use lcr_output::{CsvWriter, GeoJsonWriter, RouteWriter};
use lcr_route::{CandidateRoute, Project, RouteEngine, RouteObserver};
use lcr_solver::CellPath;
use lcr_surface::CostGrid;

// ── Constants ─────────────────────────────────────────────────────────────────

const CENTRE:      GeoPoint = GeoPoint { lat: 30.69, lon: -88.04 };
const HALF_SIDE_M: f64      = 10_000.0;
const RESOLUTION:  f64      = 250.0;

// ── Synthetic scene ───────────────────────────────────────────────────────────

fn planar_ring(frame: &LocalFrame, pts: &[(f64, f64)]) -> LineString<f64> {
    frame.unproject_line_string(&LineString::from(pts.to_vec()))
}

fn planar_polygon(frame: &LocalFrame, pts: &[(f64, f64)]) -> Polygon<f64> {
    frame.unproject_polygon(&Polygon::new(LineString::from(pts.to_vec()), vec![]))
}

fn build_scene(frame: &LocalFrame) -> Result<(AreaOfInterest, LayerSet)> {
    let h = HALF_SIDE_M;
    let aoi = AreaOfInterest::new(planar_polygon(frame, &[(-h, -h), (h, -h), (h, h), (-h, h), (-h, -h)]))
        .context("building area of interest")?;

    let mut layers = LayerSet::new();
    layers.land_cover.push(PolygonFeature::new(
        planar_polygon(frame, &[(-4_000.0, -4_000.0), (4_000.0, -4_000.0), (4_000.0, 4_000.0), (-4_000.0, 4_000.0), (-4_000.0, -4_000.0)]),
        "Forest",
    ));
    layers.land_cover.push(PolygonFeature::new(
        planar_polygon(frame, &[(-h, -h), (h, -h), (h, -6_000.0), (-h, -6_000.0), (-h, -h)]),
        "Cropland",
    ));
    layers.transmission_lines.push(LineFeature::from_line(
        planar_ring(frame, &[(-h, -7_000.0), (-2_000.0, -7_000.0), (7_000.0, 2_000.0), (7_000.0, h)]),
        "100-200kV",
    ));
    layers.railroads.push(LineFeature::from_line(
        planar_ring(frame, &[(-h, 5_000.0), (h, -5_000.0)]),
        "Main Line",
    ));
    Ok((aoi, layers))
}

/// A gentle ridge running north-south through the middle of the square.
fn ridge_elevation(frame: LocalFrame) -> impl Fn(GeoPoint) -> f64 {
    move |p| {
        let c = frame.project(p);
        40.0 + 60.0 * (-(c.x / 3_000.0).powi(2)).exp()
    }
}

fn load_config(path: Option<&Path>) -> Result<RouteConfig> {
    let Some(path) = path else {
        return Ok(RouteConfig { resolution_m: RESOLUTION, ..RouteConfig::default() });
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

// ── Progress observer ─────────────────────────────────────────────────────────

#[derive(Default)]
struct ProgressObserver {
    started: Option<Instant>,
}

impl RouteObserver for ProgressObserver {
    fn on_grid_built(&mut self, grid: &CostGrid) {
        self.started = Some(Instant::now());
        println!(
            "  grid:     {} × {} cells, {} passable",
            grid.geometry.rows,
            grid.geometry.cols,
            grid.passable_count()
        );
    }

    fn on_path_found(&mut self, _grid: &CostGrid, path: &CellPath) {
        let ms = self.started.map_or(0, |t| t.elapsed().as_millis());
        println!("  search:   {} cells on path, {} expanded in {ms} ms", path.cells.len(), path.expanded);
    }

    fn on_route_ready(&mut self, route: &CandidateRoute) {
        println!(
            "  route:    {} vertices ({} before simplification)",
            route.vertices.len(),
            route.stats.raw_vertices
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== square — rust_lcr corridor routing ===");

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output_dir = args.next().map_or_else(|| PathBuf::from("output/square"), PathBuf::from);

    let config = load_config(config_path.as_deref())?;
    let frame = LocalFrame::new(CENTRE);
    let (aoi, layers) = build_scene(&frame)?;

    let mut project = Project::new(aoi, layers);
    project.set_weights(WeightProfile::default_table());
    project.set_point(RoutePoint::origin(frame.unproject(geo::Coord { x: -8_500.0, y: -8_500.0 })));
    project.set_point(RoutePoint::destination(frame.unproject(geo::Coord { x: 8_500.0, y: 8_500.0 })));

    let engine = RouteEngine::from_config(config);
    let sampler = ridge_elevation(frame);
    let mut observer = ProgressObserver::default();

    let t0 = Instant::now();
    let route = project
        .generate_observed(&engine, &sampler, &CancelToken::new(), &mut observer)
        .context("generating route")?;
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "done");

    // ── Report ────────────────────────────────────────────────────────────
    let a = &route.analytics;
    println!("\nLength:          {:.1} km", route.length_m / 1_000.0);
    println!("Total cost:      {:.1}", route.total_cost);
    println!("Average cost:    {:.3}", a.average_cost);
    println!("Estimated cost:  {:.0}", a.estimated_cost);
    if let Some(e) = a.elevation {
        println!("Elevation:       avg {:.1} m, min {:.1} m, max {:.1} m", e.average_m, e.min_m, e.max_m);
    }
    println!("Land cover:");
    for share in &a.land_cover {
        println!("  {:<14} {:>5.1} %", share.subcategory, share.percent);
    }
    println!("Crossings:");
    for c in &a.crossings {
        println!("  {:<18} {:<12} {}", c.layer.as_str(), c.subcategory, c.count);
    }

    // ── Output ────────────────────────────────────────────────────────────
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut csv = CsvWriter::new(&output_dir)?;
    csv.write_route(route)?;
    csv.finish()?;

    let mut geojson = GeoJsonWriter::new(&output_dir);
    geojson.write_route(route)?;
    geojson.finish()?;

    println!("\nOutput written to {}/", output_dir.display());
    Ok(())
}
