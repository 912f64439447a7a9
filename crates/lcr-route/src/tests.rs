//! Unit and end-to-end tests for lcr-route.
//!
//! Scenario geometries are written in planar metres around a fixed origin
//! and unprojected to WGS-84.  The standard scenario is a 10 km × 10 km
//! square AOI at the default 720 m resolution (a 14 × 14 grid).

#[cfg(test)]
mod helpers {
    use geo::{LineString, Polygon};

    use lcr_core::{
        AreaOfInterest, CancelToken, GeoPoint, LayerSet, LineFeature, LocalFrame, PolygonFeature,
        RouteConfig, WeightProfile,
    };
    use lcr_solver::{CellPath, PathSolver};
    use lcr_surface::CostGrid;

    use crate::{
        CandidateRoute, ElevationSampler, RouteEngine, RouteObserver, RouteRequest, RouteResult, no_elevation,
    };

    pub const CENTRE: GeoPoint = GeoPoint { lat: 40.0, lon: -100.0 };
    pub const HALF: f64 = 5_000.0;

    pub fn frame() -> LocalFrame {
        LocalFrame::new(CENTRE)
    }

    pub fn at(x: f64, y: f64) -> GeoPoint {
        frame().unproject(geo::Coord { x, y })
    }

    pub fn planar_line(points: &[(f64, f64)]) -> LineString<f64> {
        frame().unproject_line_string(&LineString::from(points.to_vec()))
    }

    pub fn planar_polygon(points: &[(f64, f64)]) -> Polygon<f64> {
        frame().unproject_polygon(&Polygon::new(LineString::from(points.to_vec()), vec![]))
    }

    pub fn square_polygon() -> Polygon<f64> {
        planar_polygon(&[(-HALF, -HALF), (HALF, -HALF), (HALF, HALF), (-HALF, HALF)])
    }

    pub fn square_aoi() -> AreaOfInterest {
        AreaOfInterest::new(square_polygon()).unwrap()
    }

    pub fn area(points: &[(f64, f64)], subcategory: &str) -> PolygonFeature {
        PolygonFeature::new(planar_polygon(points), subcategory)
    }

    pub fn line(points: &[(f64, f64)], subcategory: &str) -> LineFeature {
        LineFeature::from_line(planar_line(points), subcategory)
    }

    pub fn generate(
        layers:  &LayerSet,
        weights: &[WeightProfile],
        from:    GeoPoint,
        to:      GeoPoint,
    ) -> RouteResult<CandidateRoute> {
        generate_with(&square_aoi(), layers, weights, from, to, &RouteConfig::default(), &no_elevation)
    }

    pub fn generate_with(
        aoi:     &AreaOfInterest,
        layers:  &LayerSet,
        weights: &[WeightProfile],
        from:    GeoPoint,
        to:      GeoPoint,
        config:  &RouteConfig,
        sampler: &dyn ElevationSampler,
    ) -> RouteResult<CandidateRoute> {
        let request = RouteRequest::new(aoi, layers, weights, from, to);
        RouteEngine::from_config(config.clone()).generate(&request, sampler, &CancelToken::new())
    }

    /// Keeps the cost surface and raw path of the last generation.
    #[derive(Default)]
    pub struct Capture {
        pub grid: Option<CostGrid>,
        pub path: Option<CellPath>,
    }

    impl RouteObserver for Capture {
        fn on_grid_built(&mut self, grid: &CostGrid) {
            self.grid = Some(grid.clone());
        }

        fn on_path_found(&mut self, _grid: &CostGrid, path: &CellPath) {
            self.path = Some(path.clone());
        }
    }

    pub fn generate_captured<S: PathSolver>(
        engine:  &RouteEngine<S>,
        layers:  &LayerSet,
        weights: &[WeightProfile],
        from:    GeoPoint,
        to:      GeoPoint,
    ) -> (RouteResult<CandidateRoute>, Capture) {
        let aoi = square_aoi();
        let request = RouteRequest::new(&aoi, layers, weights, from, to);
        let mut capture = Capture::default();
        let result = engine.generate_observed(&request, &no_elevation, &CancelToken::new(), &mut capture);
        (result, capture)
    }
}

// ── Simplification ────────────────────────────────────────────────────────────

#[cfg(test)]
mod simplify {
    use geo::Coord;

    use lcr_core::{GeoPoint, LocalFrame};
    use lcr_surface::{CostGrid, IMPASSABLE};

    use crate::simplify::{segment_clear, self_intersects, simplify};

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    /// 10 × 10 grid of 10 m cells anchored at (0, 0).
    fn grid() -> CostGrid {
        CostGrid::uniform(10, 10, 10.0, 1.0, LocalFrame::new(GeoPoint::new(0.0, 0.0)))
    }

    #[test]
    fn clear_on_open_grid() {
        let g = grid();
        assert!(segment_clear(&g, c(5.0, 5.0), c(95.0, 63.0)));
        assert!(!segment_clear(&g, c(5.0, 5.0), c(105.0, 5.0)));
    }

    #[test]
    fn blocked_cell_rejects_segment() {
        let mut g = grid();
        let blocked = g.geometry.cell(0, 5);
        g.set_cost(blocked, IMPASSABLE);
        assert!(!segment_clear(&g, c(5.0, 5.0), c(95.0, 5.0)));
        assert!(segment_clear(&g, c(5.0, 15.0), c(95.0, 15.0)));
    }

    #[test]
    fn shortcut_outside_aoi_outline_rejected() {
        // Every cell centre is inside, but a 4 m gap runs down to y = 20.
        let outline = geo::Polygon::new(
            geo::LineString::from(vec![
                (0.0, 0.0),
                (100.0, 0.0),
                (100.0, 100.0),
                (52.0, 100.0),
                (52.0, 20.0),
                (48.0, 20.0),
                (48.0, 100.0),
                (0.0, 100.0),
            ]),
            vec![],
        );
        let g = grid().with_aoi(outline);
        assert!(!segment_clear(&g, c(5.0, 65.0), c(95.0, 65.0)));
        assert!(segment_clear(&g, c(5.0, 15.0), c(95.0, 15.0)));
        assert!(segment_clear(&g, c(5.0, 65.0), c(48.0, 20.0)));
    }

    #[test]
    fn edge_contact_is_not_entry() {
        let mut g = grid();
        let blocked = g.geometry.cell(0, 5);
        g.set_cost(blocked, IMPASSABLE);
        // Runs along the top edge of the blocked cell.
        assert!(segment_clear(&g, c(5.0, 10.0), c(95.0, 10.0)));
    }

    #[test]
    fn collinear_staircase_collapses() {
        let g = grid();
        let points: Vec<_> = (0..10).map(|i| c(5.0 + 10.0 * i as f64, 5.0 + 10.0 * i as f64)).collect();
        assert_eq!(simplify(&g, &points, 5.0), vec![c(5.0, 5.0), c(95.0, 95.0)]);
    }

    #[test]
    fn shortcut_refused_through_wall() {
        let mut g = grid();
        for row in 0..9 {
            let cell = g.geometry.cell(row, 5);
            g.set_cost(cell, IMPASSABLE);
        }
        // Around the top of the wall.
        let points = vec![c(5.0, 5.0), c(45.0, 95.0), c(65.0, 95.0), c(95.0, 5.0)];
        let out = simplify(&g, &points, 1_000.0);
        assert_eq!(out.first(), Some(&c(5.0, 5.0)));
        assert_eq!(out.last(), Some(&c(95.0, 5.0)));
        assert!(out.len() >= 3);
        assert!(out.windows(2).all(|w| segment_clear(&g, w[0], w[1])));
    }

    #[test]
    fn self_intersection() {
        assert!(!self_intersects(&[c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)]));
        assert!(self_intersects(&[c(0.0, 0.0), c(10.0, 10.0), c(10.0, 0.0), c(0.0, 10.0)]));
        assert!(!self_intersects(&[c(0.0, 0.0), c(0.0, 0.0), c(5.0, 0.0)]));
    }
}

// ── Post-processing helpers ───────────────────────────────────────────────────

#[cfg(test)]
mod post {
    use geo::Coord;

    use lcr_core::{LayerKind, LayerSet, RouteConfig};
    use lcr_solver::CellPath;
    use lcr_spatial::LayerIndexes;
    use lcr_surface::{CostGrid, IMPASSABLE};

    use super::helpers::{frame, line};
    use crate::post::sample_along;
    use crate::{PostProcessor, RouteError};

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    /// Bottom row of a 3 × 3 grid of 100 m cells, west to east.
    fn bottom_row(grid: &CostGrid) -> CellPath {
        let cells = (0..3).map(|col| grid.geometry.cell(0, col)).collect();
        CellPath { cells, total_cost: 2.0, expanded: 3 }
    }

    #[test]
    fn open_row_collapses_to_one_segment() {
        let grid = CostGrid::uniform(3, 3, 100.0, 1.0, frame());
        let (layers, indexes, config) = (LayerSet::new(), LayerIndexes::empty(), RouteConfig::default());
        let post = PostProcessor::new(&grid, &indexes, &layers, &config);

        let (from, to) = (frame().unproject(c(50.0, 50.0)), frame().unproject(c(250.0, 50.0)));
        let (points, raw, simplified) = post.polyline(&bottom_row(&grid), from, to).unwrap();
        assert!(raw >= 3);
        assert!(simplified);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn path_through_blocked_cell_is_rejected() {
        let mut grid = CostGrid::uniform(3, 3, 100.0, 1.0, frame());
        let middle = grid.geometry.cell(0, 1);
        grid.set_cost(middle, IMPASSABLE);
        let (layers, indexes, config) = (LayerSet::new(), LayerIndexes::empty(), RouteConfig::default());
        let post = PostProcessor::new(&grid, &indexes, &layers, &config);

        let (from, to) = (frame().unproject(c(50.0, 50.0)), frame().unproject(c(250.0, 50.0)));
        let err = post.polyline(&bottom_row(&grid), from, to).unwrap_err();
        assert!(matches!(err, RouteError::PostProcess(_)), "{err:?}");
    }

    #[test]
    fn path_across_aoi_gap_is_rejected() {
        // Open grid, but the outline has a notch over the middle cell.
        let aoi = geo::Polygon::new(
            geo::LineString::from(vec![
                (0.0, 0.0),
                (300.0, 0.0),
                (300.0, 300.0),
                (160.0, 300.0),
                (160.0, 20.0),
                (140.0, 20.0),
                (140.0, 300.0),
                (0.0, 300.0),
            ]),
            vec![],
        );
        let grid = CostGrid::uniform(3, 3, 100.0, 1.0, frame()).with_aoi(aoi);
        let (layers, indexes, config) = (LayerSet::new(), LayerIndexes::empty(), RouteConfig::default());
        let post = PostProcessor::new(&grid, &indexes, &layers, &config);

        let (from, to) = (frame().unproject(c(50.0, 50.0)), frame().unproject(c(250.0, 50.0)));
        let err = post.polyline(&bottom_row(&grid), from, to).unwrap_err();
        assert!(matches!(err, RouteError::PostProcess(_)), "{err:?}");
    }

    #[test]
    fn samples_at_interval_plus_end() {
        let samples = sample_along(&[c(0.0, 0.0), c(250.0, 0.0)], 100.0);
        let distances: Vec<f64> = samples.iter().map(|s| s.0).collect();
        assert_eq!(distances, vec![0.0, 100.0, 200.0, 250.0]);
        assert!((samples[2].1.x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn samples_follow_bends() {
        let samples = sample_along(&[c(0.0, 0.0), c(60.0, 0.0), c(60.0, 60.0)], 50.0);
        let distances: Vec<f64> = samples.iter().map(|s| s.0).collect();
        assert_eq!(distances, vec![0.0, 50.0, 100.0, 120.0]);
        assert_eq!(samples[2].1.x, 60.0);
        assert!((samples[2].1.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_single_sample() {
        assert_eq!(sample_along(&[c(3.0, 4.0)], 10.0), vec![(0.0, c(3.0, 4.0))]);
        assert!(sample_along(&[], 10.0).is_empty());
    }

    #[test]
    fn crossing_on_shared_vertex_counted_once() {
        let mut layers = LayerSet::new();
        layers.railroads.push(line(&[(0.0, -50.0), (0.0, 50.0)], "Branch Line"));
        let indexes = LayerIndexes::build(&layers, &frame()).unwrap();
        let grid = CostGrid::uniform(2, 2, 100.0, 1.0, frame());
        let config = RouteConfig::default();
        let post = PostProcessor::new(&grid, &indexes, &layers, &config);

        // The route bends exactly on the railroad.
        let crossings = post.crossings(&[c(-10.0, 0.0), c(0.0, 0.0), c(10.0, 5.0)]);
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].layer, LayerKind::Railroad);
        assert_eq!(crossings[0].subcategory, "Branch Line");
    }

    #[test]
    fn repeated_crossings_of_one_feature_all_count() {
        let mut layers = LayerSet::new();
        layers.transmission_lines.push(line(&[(0.0, -50.0), (0.0, 50.0)], "<100kV"));
        let indexes = LayerIndexes::build(&layers, &frame()).unwrap();
        let grid = CostGrid::uniform(2, 2, 100.0, 1.0, frame());
        let config = RouteConfig::default();
        let post = PostProcessor::new(&grid, &indexes, &layers, &config);

        let crossings = post.crossings(&[c(-10.0, 0.0), c(10.0, 0.0), c(10.0, 20.0), c(-10.0, 20.0)]);
        assert_eq!(crossings.len(), 2);
    }
}

// ── Analytics ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod analytics {
    use lcr_core::{FeatureId, GeoPoint, LayerKind, RouteConfig};

    use crate::{AnalyticsReport, ElevationStats, LandCoverShare, ProfilePoint, RouteCrossing, RouteMetrics};

    fn crossing(layer: LayerKind, subcategory: &str) -> RouteCrossing {
        RouteCrossing {
            layer,
            feature: FeatureId(0),
            subcategory: subcategory.to_owned(),
            location: GeoPoint::new(0.0, 0.0),
        }
    }

    fn metrics() -> RouteMetrics {
        RouteMetrics {
            vertices:     vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01)],
            length_m:     1_000.0,
            profile:      vec![
                ProfilePoint { distance_m: 0.0, elevation_m: 10.0 },
                ProfilePoint { distance_m: 500.0, elevation_m: 30.0 },
                ProfilePoint { distance_m: 1_000.0, elevation_m: 20.0 },
            ],
            land_cover:   vec![LandCoverShare { subcategory: "Forest".to_owned(), percent: 100.0 }],
            crossings:    vec![
                crossing(LayerKind::Railroad, "Main Line"),
                crossing(LayerKind::TransmissionLine, ">200kV"),
                crossing(LayerKind::Railroad, "Main Line"),
            ],
            raw_vertices: 5,
            simplified:   true,
        }
    }

    #[test]
    fn cost_model() {
        let config = RouteConfig { cost_per_meter: 2.0, ..RouteConfig::default() };
        let report = AnalyticsReport::aggregate(&metrics(), 6.0, 4.0, &config);
        assert_eq!(report.average_cost, 1.5);
        assert_eq!(report.estimated_cost, 3_000.0);
        assert_eq!(report.total_cost, 6.0);
        assert_eq!(report.length_m, 1_000.0);
    }

    #[test]
    fn zero_length_path_priced_at_baseline() {
        let report = AnalyticsReport::aggregate(&metrics(), 0.0, 0.0, &RouteConfig::default());
        assert_eq!(report.average_cost, 1.0);
    }

    #[test]
    fn elevation_stats() {
        let report = AnalyticsReport::aggregate(&metrics(), 1.0, 1.0, &RouteConfig::default());
        assert_eq!(report.elevation, Some(ElevationStats { average_m: 20.0, min_m: 10.0, max_m: 30.0 }));
        assert_eq!(ElevationStats::from_profile(&[]), None);
    }

    #[test]
    fn crossings_grouped_and_sorted() {
        let report = AnalyticsReport::aggregate(&metrics(), 1.0, 1.0, &RouteConfig::default());
        assert_eq!(report.crossings.len(), 2);
        assert_eq!(report.crossings[0].layer, LayerKind::TransmissionLine);
        assert_eq!(report.crossings[1].subcategory, "Main Line");
        assert_eq!(report.crossings[1].count, 2);
        assert_eq!(report.crossings_of(LayerKind::Railroad), 2);
        assert_eq!(report.land_cover_percent("Forest"), 100.0);
        assert_eq!(report.land_cover_percent("Water"), 0.0);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use lcr_core::{LayerKind, LayerSet, RouteConfig, WeightProfile};

    use super::helpers::{HALF, area, at, generate, generate_with, line, square_aoi};
    use crate::UNCLASSIFIED;

    #[test]
    fn diagonal_on_uniform_grid() {
        let (sw, ne) = (at(-HALF, -HALF), at(HALF, HALF));
        let route = generate(&LayerSet::new(), &[], sw, ne).unwrap();

        let straight = sw.distance_m(ne);
        assert!((straight - 14_142.0).abs() < 50.0);
        assert!((route.length_m - straight).abs() < 720.0);
        assert_eq!(route.vertices.len(), 2);
        assert_eq!(route.origin(), Some(sw));
        assert_eq!(route.destination(), Some(ne));
        assert_eq!((route.stats.grid_rows, route.stats.grid_cols), (14, 14));
        assert!(route.stats.simplified);
    }

    #[test]
    fn avoided_block_forces_detour() {
        let (sw, ne) = (at(-HALF, -HALF), at(HALF, HALF));
        let direct = generate(&LayerSet::new(), &[], sw, ne).unwrap();

        let mut layers = LayerSet::new();
        layers.land_cover.push(area(&[(-2000.0, -2000.0), (2000.0, -2000.0), (2000.0, 2000.0), (-2000.0, 2000.0)], "Avoid"));
        let weights = [WeightProfile::land_cover("Avoid", 1.0)];
        let detour = generate(&layers, &weights, sw, ne).unwrap();

        assert!(detour.length_m > direct.length_m);
        assert_eq!(detour.origin(), Some(sw));
        assert_eq!(detour.destination(), Some(ne));
        assert!(detour.total_cost > direct.total_cost);
    }

    #[test]
    fn land_cover_composition_by_length() {
        let mut layers = LayerSet::new();
        layers.land_cover.push(area(&[(-HALF, -HALF), (0.0, -HALF), (0.0, HALF), (-HALF, HALF)], "Forest"));
        let route = generate(&layers, &[], at(-4000.0, 0.0), at(4000.0, 0.0)).unwrap();

        let forest = route.analytics.land_cover_percent("Forest");
        let open = route.analytics.land_cover_percent(UNCLASSIFIED);
        assert!((forest - 50.0).abs() < 2.0);
        assert!((forest + open - 100.0).abs() < 1e-9);
    }

    #[test]
    fn crossings_counted_per_layer() {
        let mut layers = LayerSet::new();
        layers.transmission_lines.push(line(&[(100.0, -HALF), (100.0, HALF)], ">200kV"));
        layers.railroads.push(line(&[(-1000.0, -HALF), (-1000.0, HALF)], "Main Line"));
        let route = generate(&layers, &[], at(-4000.0, 0.0), at(4000.0, 0.0)).unwrap();

        assert_eq!(route.analytics.crossings_of(LayerKind::TransmissionLine), 1);
        assert_eq!(route.analytics.crossings_of(LayerKind::Railroad), 1);
        assert_eq!(route.crossings.len(), 2);
    }

    #[test]
    fn elevation_profile_sampled_along_route() {
        let sampler = |p: lcr_core::GeoPoint| (p.lat - 40.0) * 10_000.0;
        let route = generate_with(
            &square_aoi(),
            &LayerSet::new(),
            &[],
            at(-HALF, -HALF),
            at(HALF, HALF),
            &RouteConfig::default(),
            &sampler,
        )
        .unwrap();

        let profile = &route.analytics.elevation_profile;
        assert!(profile.len() > 100);
        assert_eq!(profile[0].distance_m, 0.0);
        assert!(profile.windows(2).all(|w| w[0].distance_m < w[1].distance_m));
        let stats = route.analytics.elevation.unwrap();
        assert!(stats.min_m < stats.average_m && stats.average_m < stats.max_m);
    }

    #[test]
    fn missing_elevation_yields_no_stats() {
        let route = generate(&LayerSet::new(), &[], at(-HALF, -HALF), at(HALF, HALF)).unwrap();
        assert!(route.analytics.elevation.is_none());
        assert!(route.analytics.elevation_profile.is_empty());
    }

    #[test]
    fn same_point_gives_zero_length() {
        let p = at(100.0, 100.0);
        let route = generate(&LayerSet::new(), &[], p, p).unwrap();
        assert_eq!(route.length_m, 0.0);
        assert_eq!(route.total_cost, 0.0);
        assert_eq!(route.cells.len(), 1);
        assert_eq!(route.vertices, vec![p, p]);
    }

    #[test]
    fn dijkstra_and_astar_agree() {
        let mut layers = LayerSet::new();
        layers.land_cover.push(area(&[(-3000.0, -4000.0), (2000.0, -1000.0), (-500.0, 3000.0)], "Forest"));
        layers.transmission_lines.push(line(&[(-HALF, 2000.0), (HALF, -2500.0)], ">200kV"));
        let weights = WeightProfile::default_table();
        let (from, to) = (at(-4500.0, -4500.0), at(4500.0, 4000.0));

        let astar = generate_with(&square_aoi(), &layers, &weights, from, to, &RouteConfig::default(), &crate::no_elevation).unwrap();
        let config = RouteConfig { search: lcr_core::SearchStrategy::Dijkstra, ..RouteConfig::default() };
        let dijkstra = generate_with(&square_aoi(), &layers, &weights, from, to, &config, &crate::no_elevation).unwrap();
        assert!((astar.total_cost - dijkstra.total_cost).abs() < 1e-9);
        assert!(astar.stats.expanded <= dijkstra.stats.expanded);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use geo::{LineString, Polygon};

    use lcr_core::{AreaOfInterest, CancelToken, LayerKind, LayerSet, RouteConfig, WeightProfile};
    use lcr_solver::AStarSolver;
    use lcr_spatial::segment::polygon_covers_segment;

    use super::helpers::{HALF, area, at, frame, generate, generate_captured, generate_with, line, planar_polygon};
    use crate::{RouteEngine, RouteError, no_elevation};

    #[test]
    fn path_never_leaves_aoi() {
        let aoi = lcr_core::AreaOfInterest::new(super::helpers::planar_polygon(&[
            (-HALF, -HALF),
            (HALF, -HALF),
            (HALF, HALF),
            (0.0, 0.0),
            (-HALF, HALF),
        ]))
        .unwrap();
        let engine = RouteEngine::new(AStarSolver, RouteConfig::default());
        let layers = LayerSet::new();
        let request = crate::RouteRequest::new(&aoi, &layers, &[], at(-4500.0, 4000.0), at(4500.0, 4000.0));
        let mut capture = super::helpers::Capture::default();
        engine
            .generate_observed(&request, &crate::no_elevation, &CancelToken::new(), &mut capture)
            .unwrap();

        let grid = capture.grid.unwrap();
        let path = capture.path.unwrap();
        assert!(grid.in_aoi_count() < grid.cell_count());
        assert!(path.cells.iter().all(|&c| grid.in_aoi(c)));
    }

    /// The standard square with a slot cut from the north edge down to
    /// y = -3000 between `x0` and `x1`, in planar metres.
    fn slotted_outline(x0: f64, x1: f64) -> Vec<(f64, f64)> {
        vec![
            (-HALF, -HALF),
            (HALF, -HALF),
            (HALF, HALF),
            (x1, HALF),
            (x1, -3000.0),
            (x0, -3000.0),
            (x0, HALF),
            (-HALF, HALF),
        ]
    }

    fn slotted_aoi(x0: f64, x1: f64) -> AreaOfInterest {
        AreaOfInterest::new(planar_polygon(&slotted_outline(x0, x1))).unwrap()
    }

    #[test]
    fn slot_between_cell_centres_is_not_crossed() {
        // No cell centre falls in the slot, so every cell stays in the AOI.
        let aoi = slotted_aoi(-100.0, 100.0);
        let (from, to) = (at(-4000.0, 4000.0), at(4000.0, 4000.0));
        let route = generate_with(&aoi, &LayerSet::new(), &[], from, to, &RouteConfig::default(), &no_elevation);
        assert!(matches!(route, Err(RouteError::PostProcess(_))), "{route:?}");
    }

    #[test]
    fn slot_wider_than_a_cell_forces_detour() {
        let aoi = slotted_aoi(-100.0, 500.0);
        let (from, to) = (at(-4000.0, 4000.0), at(4000.0, 4000.0));
        let route = generate_with(&aoi, &LayerSet::new(), &[], from, to, &RouteConfig::default(), &no_elevation).unwrap();

        let outline = Polygon::new(LineString::from(slotted_outline(-100.0, 500.0)), vec![]);
        let planar: Vec<_> = route.vertices.iter().map(|&v| frame().project(v)).collect();
        assert!(planar.iter().any(|p| p.y < -3000.0));
        assert!(planar.windows(2).all(|w| polygon_covers_segment(&outline, w[0], w[1], 1.0)));
        assert!(route.length_m > 14_000.0);
    }

    #[test]
    fn identical_inputs_identical_route() {
        let mut layers = LayerSet::new();
        layers.land_cover.push(area(&[(-4000.0, -1000.0), (3000.0, -3000.0), (1000.0, 4000.0)], "Wetland"));
        layers.transmission_lines.push(line(&[(-HALF, -HALF), (HALF, 1000.0)], "100-200kV"));
        layers.railroads.push(line(&[(-2000.0, HALF), (3000.0, -HALF)], "Main Line"));
        let weights = WeightProfile::default_table();
        let (from, to) = (at(-4500.0, 4500.0), at(4500.0, -4000.0));

        let a = generate(&layers, &weights, from, to).unwrap();
        let b = generate(&layers, &weights, from, to).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn raising_avoid_weight_never_lowers_cost() {
        let mut layers = LayerSet::new();
        layers.land_cover.push(area(&[(-3000.0, -3000.0), (3000.0, -3000.0), (3000.0, 3000.0), (-3000.0, 3000.0)], "Forest"));
        let (from, to) = (at(-4500.0, -4500.0), at(4500.0, 4500.0));

        let mut rng = SmallRng::seed_from_u64(0x1c2);
        for _ in 0..5 {
            let a: f64 = rng.gen_range(0.0..=1.0);
            let b: f64 = rng.gen_range(0.0..=1.0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let cheap = generate(&layers, &[WeightProfile::land_cover("Forest", lo)], from, to).unwrap();
            let dear = generate(&layers, &[WeightProfile::land_cover("Forest", hi)], from, to).unwrap();
            assert!(dear.total_cost >= cheap.total_cost - 1e-9, "w {lo} → {hi}");
        }
    }

    #[test]
    fn hard_barrier_moves_route_off_crossed_cells() {
        let mut layers = LayerSet::new();
        layers.railroads.push(line(&[(100.0, -HALF), (100.0, 2000.0)], "High Speed"));
        let (from, to) = (at(-4000.0, -4000.0), at(4000.0, -4000.0));
        let engine = RouteEngine::new(AStarSolver, RouteConfig::default());

        let soft = [WeightProfile::railroad("High Speed", 0.0, 0.5)];
        let (soft_route, soft_capture) = generate_captured(&engine, &layers, &soft, from, to);
        soft_route.unwrap();
        assert_eq!(soft_capture.grid.unwrap().passable_count(), 14 * 14);

        let hard = [WeightProfile::railroad("High Speed", 0.0, 1.0)];
        let (route, capture) = generate_captured(&engine, &layers, &hard, from, to);
        let route = route.unwrap();
        let grid = capture.grid.unwrap();
        assert!(grid.passable_count() < 14 * 14);
        assert!(route.cells.iter().all(|&c| !grid.is_blocked(c)));
        assert_eq!(route.analytics.crossings_of(LayerKind::Railroad), 0);
    }

    #[test]
    fn full_barrier_yields_no_path() {
        let mut layers = LayerSet::new();
        layers.railroads.push(line(&[(100.0, -HALF), (100.0, HALF)], "High Speed"));
        let err = generate(&layers, &WeightProfile::default_table(), at(-4000.0, 0.0), at(4000.0, 0.0)).unwrap_err();
        assert_eq!(err, crate::RouteError::NoPath);
    }

    #[test]
    fn diagonal_split_disconnects() {
        let mut layers = LayerSet::new();
        layers.railroads.push(line(&[(-HALF, HALF), (HALF, -HALF)], "High Speed"));
        let err = generate(&layers, &WeightProfile::default_table(), at(-4000.0, -4000.0), at(4000.0, 4000.0)).unwrap_err();
        assert_eq!(err, crate::RouteError::NoPath);
    }
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use lcr_core::{CancelToken, Endpoint, EndpointFault, GeoPoint, LayerSet, RouteConfig, WeightProfile};

    use super::helpers::{HALF, at, generate, generate_with, line, planar_polygon, square_aoi, square_polygon};
    use crate::{RouteEngine, RouteError, RouteRequest, generate_route, no_elevation};

    #[test]
    fn destination_outside_aoi() {
        let err = generate(&LayerSet::new(), &[], at(0.0, 0.0), at(HALF + 500.0, 0.0)).unwrap_err();
        assert_eq!(err, RouteError::InvalidEndpoint { endpoint: Endpoint::Destination, reason: EndpointFault::OutsideAoi });
    }

    #[test]
    fn nan_origin() {
        let err = generate(&LayerSet::new(), &[], GeoPoint::new(f64::NAN, 0.0), at(0.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            RouteError::InvalidEndpoint { endpoint: Endpoint::Origin, reason: EndpointFault::InvalidCoordinate }
        );
    }

    #[test]
    fn origin_on_blocked_cell() {
        let mut layers = LayerSet::new();
        layers.railroads.push(line(&[(100.0, -HALF), (100.0, HALF)], "High Speed"));
        let err = generate(&layers, &WeightProfile::default_table(), at(300.0, 0.0), at(-4000.0, 0.0)).unwrap_err();
        assert_eq!(err, RouteError::InvalidEndpoint { endpoint: Endpoint::Origin, reason: EndpointFault::Blocked });
    }

    #[test]
    fn sliver_aoi_is_empty() {
        let aoi = lcr_core::AreaOfInterest::new(planar_polygon(&[(0.0, 0.0), (700.0, 0.0), (0.0, 8.0)])).unwrap();
        let err = generate_with(
            &aoi,
            &LayerSet::new(),
            &[],
            at(10.0, 1.0),
            at(100.0, 1.0),
            &RouteConfig::default(),
            &no_elevation,
        )
        .unwrap_err();
        assert_eq!(err, RouteError::EmptyAoi);
    }

    #[test]
    fn bowtie_aoi_rejected() {
        let bowtie = planar_polygon(&[(-HALF, -HALF), (HALF, HALF), (HALF, -HALF), (-HALF, HALF)]);
        let err = generate_route(
            &bowtie,
            &LayerSet::new(),
            &[],
            at(0.0, -1000.0),
            at(0.0, 1000.0),
            &RouteConfig::default(),
            &no_elevation,
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RouteError::Geometry(_)));
    }

    #[test]
    fn generate_route_entry_point() {
        let route = generate_route(
            &square_polygon(),
            &LayerSet::new(),
            &WeightProfile::default_table(),
            at(-HALF, -HALF),
            at(HALF, HALF),
            &RouteConfig::default(),
            &no_elevation,
            &CancelToken::new(),
        )
        .unwrap();
        assert!(route.length_m > 14_000.0);
    }

    #[test]
    fn bad_config_rejected() {
        let config = RouteConfig { resolution_m: -1.0, ..RouteConfig::default() };
        let err = generate_with(&square_aoi(), &LayerSet::new(), &[], at(0.0, 0.0), at(10.0, 10.0), &config, &no_elevation)
            .unwrap_err();
        assert!(matches!(err, RouteError::Config(_)));
    }

    #[test]
    fn bad_weight_rejected() {
        let err = generate(&LayerSet::new(), &[WeightProfile::land_cover("Forest", 1.5)], at(0.0, 0.0), at(10.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, RouteError::Config(_)));
    }

    #[test]
    fn cancelled_is_distinct() {
        let aoi = square_aoi();
        let layers = LayerSet::new();
        let request = RouteRequest::new(&aoi, &layers, &[], at(-HALF, -HALF), at(HALF, HALF));
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = RouteEngine::from_config(RouteConfig::default())
            .generate(&request, &no_elevation, &cancel)
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err, RouteError::Cancelled);
    }
}

// ── Project lifecycle ─────────────────────────────────────────────────────────

#[cfg(test)]
mod project {
    use lcr_core::{CancelToken, Endpoint, EndpointFault, LayerSet, RouteConfig, RoutePoint, WeightProfile};

    use super::helpers::{HALF, at, square_aoi};
    use crate::{Project, RouteEngine, RouteError, no_elevation};

    fn engine() -> RouteEngine<Box<dyn lcr_solver::PathSolver>> {
        RouteEngine::from_config(RouteConfig::default())
    }

    #[test]
    fn needs_both_points() {
        let mut project = Project::new(square_aoi(), LayerSet::new());
        project.set_point(RoutePoint::destination(at(0.0, 0.0)));
        let err = project.generate(&engine(), &no_elevation, &CancelToken::new()).unwrap_err();
        assert_eq!(err, RouteError::InvalidEndpoint { endpoint: Endpoint::Origin, reason: EndpointFault::Missing });
        assert!(project.route().is_none());
    }

    #[test]
    fn new_point_replaces_old_and_discards_route() {
        let mut project = Project::new(square_aoi(), LayerSet::new());
        project.set_point(RoutePoint::origin(at(-HALF, -HALF)));
        project.set_point(RoutePoint::destination(at(HALF, HALF)));
        project.generate(&engine(), &no_elevation, &CancelToken::new()).unwrap();
        assert!(project.route().is_some());

        let moved = at(-HALF, 0.0);
        project.set_point(RoutePoint::origin(moved));
        assert!(project.route().is_none());
        assert_eq!(project.point(Endpoint::Origin).map(|p| p.location), Some(moved));

        let route = project.generate(&engine(), &no_elevation, &CancelToken::new()).unwrap();
        assert_eq!(route.origin(), Some(moved));
    }

    #[test]
    fn weight_edit_discards_route() {
        let mut project = Project::new(square_aoi(), LayerSet::new());
        assert!(!project.weights().is_empty());
        project.set_point(RoutePoint::origin(at(-HALF, -HALF)));
        project.set_point(RoutePoint::destination(at(HALF, HALF)));
        project.generate(&engine(), &no_elevation, &CancelToken::new()).unwrap();

        project.set_weights(vec![WeightProfile::land_cover("Forest", 0.2)]);
        assert!(project.route().is_none());
    }

    #[test]
    fn failed_generation_leaves_no_route() {
        let mut project = Project::new(square_aoi(), LayerSet::new());
        project.set_point(RoutePoint::origin(at(-HALF, -HALF)));
        project.set_point(RoutePoint::destination(at(HALF, HALF)));
        project.generate(&engine(), &no_elevation, &CancelToken::new()).unwrap();

        let cancel = CancelToken::new();
        cancel.cancel();
        let err = project.generate(&engine(), &no_elevation, &cancel).unwrap_err();
        assert!(err.is_cancelled());
        assert!(project.route().is_none());
    }

    #[test]
    fn clearing_a_point() {
        let mut project = Project::new(square_aoi(), LayerSet::new());
        project.set_point(RoutePoint::origin(at(0.0, 0.0)));
        project.clear_point(Endpoint::Origin);
        assert!(project.point(Endpoint::Origin).is_none());
    }
}
