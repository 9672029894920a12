//! Unit tests for wf-spatial.
//!
//! All tests use hand-crafted corridor sets in planar coordinates.

#[cfg(test)]
mod helpers {
    use geo::{LineString, Polygon};
    use wf_core::Coord;

    use crate::{CorridorGraph, GraphConfig};

    pub fn c(x: f64, y: f64) -> Coord {
        Coord { x, y }
    }

    /// Element-wise coordinate comparison within `1e-9`.
    pub fn assert_path_close(actual: &[Coord], expected: &[Coord]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a.x - e.x).abs() < 1e-9 && (a.y - e.y).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    pub fn line(points: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(points.to_vec())
    }

    /// Axis-aligned square obstacle.
    pub fn square(min: (f64, f64), max: (f64, f64)) -> Polygon<f64> {
        Polygon::new(
            line(&[min, (max.0, min.1), max, (min.0, max.1), min]),
            vec![],
        )
    }

    /// Two horizontal corridors joined by three verticals.
    ///
    /// ```text
    /// (0,10)----(10,10)----(20,10)
    ///   |          |          |
    /// (0,0)-----(10,0)-----(20,0)
    /// ```
    pub fn grid() -> CorridorGraph {
        let corridors = vec![
            line(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]),
            line(&[(0.0, 10.0), (10.0, 10.0), (20.0, 10.0)]),
            line(&[(0.0, 0.0), (0.0, 10.0)]),
            line(&[(10.0, 0.0), (10.0, 10.0)]),
            line(&[(20.0, 0.0), (20.0, 10.0)]),
        ];
        CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap()
    }

    /// Irregular network with edges of uneven length.
    ///
    /// ```text
    ///  (0,7)------(12,9)-------(25,12)
    ///    |          |             |
    ///  (0,0)--(10,0)-----------(25,0)
    /// ```
    pub fn campus() -> CorridorGraph {
        let corridors = vec![
            line(&[(0.0, 0.0), (10.0, 0.0), (25.0, 0.0)]),
            line(&[(0.0, 0.0), (0.0, 7.0)]),
            line(&[(0.0, 7.0), (12.0, 9.0), (25.0, 12.0)]),
            line(&[(10.0, 0.0), (12.0, 9.0)]),
            line(&[(25.0, 0.0), (25.0, 12.0)]),
        ];
        CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use wf_core::CoreError;

    use super::helpers::{c, grid, line};
    use crate::{CorridorGraph, CorridorGraphBuilder, EdgeKind, GraphConfig, ProximityConfig, SpatialError};

    #[test]
    fn empty_input_rejected() {
        let err = CorridorGraph::build(&[], &[], &GraphConfig::default()).err();
        assert!(matches!(err, Some(SpatialError::Core(CoreError::InvalidInput(_)))));
    }

    #[test]
    fn short_corridor_rejected() {
        let corridors = vec![line(&[(0.0, 0.0), (1.0, 0.0)]), line(&[(2.0, 2.0)])];
        assert!(CorridorGraph::build(&corridors, &[], &GraphConfig::default()).is_err());
    }

    #[test]
    fn non_finite_corridor_rejected() {
        let corridors = vec![line(&[(0.0, 0.0), (f64::NAN, 0.0)])];
        assert!(CorridorGraph::build(&corridors, &[], &GraphConfig::default()).is_err());
    }

    #[test]
    fn shared_vertices_merge() {
        let g = grid();
        assert_eq!(g.node_count(), 6);
        assert_eq!(g.edge_count(), 14); // 7 links, bidirectional
        assert_eq!(g.segments().len(), 7);
        assert_eq!(g.corridors().len(), 5);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let g = grid();
        for e in 0..g.edge_count() {
            let (a, b) = (g.edge_from[e], g.edge_to[e]);
            let back = g.edge_between(b, a).expect("reverse edge");
            assert_eq!(g.edge_weight[back.index()], g.edge_weight[e]);
        }
    }

    #[test]
    fn out_edges_start_at_node() {
        let g = grid();
        let n = g.node_at(c(10.0, 0.0)).unwrap();
        assert_eq!(g.out_degree(n), 3);
        for e in g.out_edges(n) {
            assert_eq!(g.edge_from[e.index()], n);
        }
    }

    #[test]
    fn near_coincident_points_merge() {
        let corridors = vec![
            line(&[(0.0, 0.0), (5.0, 0.0)]),
            line(&[(5.000_000_01, 0.0), (10.0, 0.0)]),
        ];
        let g = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.node_position(g.node_at(c(5.0, 0.0)).unwrap()), c(5.0, 0.0));
    }

    #[test]
    fn zero_length_segment_skipped() {
        let corridors = vec![line(&[(0.0, 0.0), (0.0, 0.0), (5.0, 0.0)])];
        let g = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.segments().len(), 1);
        assert_eq!(g.segments()[0].index, 1);
    }

    #[test]
    fn proximity_bridges_small_gap() {
        let corridors = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(10.5, 0.0), (20.0, 0.0)]),
        ];
        let plain = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        let a = plain.node_at(c(10.0, 0.0)).unwrap();
        let b = plain.node_at(c(10.5, 0.0)).unwrap();
        assert!(!plain.has_edge(a, b));

        let config = GraphConfig {
            proximity: Some(ProximityConfig { max_distance: 1.0, min_distance: 0.0 }),
            ..GraphConfig::default()
        };
        let bridged = CorridorGraph::build(&corridors, &[], &config).unwrap();
        let e = bridged.edge_between(a, b).expect("proximity edge");
        assert_eq!(bridged.edge_kind[e.index()], EdgeKind::Proximity);
        assert!((bridged.edge_weight[e.index()] - 0.5).abs() < 1e-12);
        assert_eq!(bridged.stats().proximity_links, 1);
    }

    #[test]
    fn proximity_skips_linked_pairs() {
        let corridors = vec![line(&[(0.0, 0.0), (0.5, 0.0)])];
        let config = GraphConfig {
            proximity: Some(ProximityConfig { max_distance: 1.0, min_distance: 0.0 }),
            ..GraphConfig::default()
        };
        let g = CorridorGraph::build(&corridors, &[], &config).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.stats().proximity_links, 0);
    }

    #[test]
    fn incremental_builder() {
        let mut b = CorridorGraphBuilder::new(GraphConfig::default());
        let id = b.add_corridor(&line(&[(0.0, 0.0), (3.0, 4.0)])).unwrap();
        assert_eq!(id.index(), 0);
        assert_eq!(b.node_count(), 2);
        assert!(b.add_corridor(&line(&[(1.0, 1.0)])).is_err());
        let g = b.build();
        let (from, to) = (g.node_at(c(0.0, 0.0)).unwrap(), g.node_at(c(3.0, 4.0)).unwrap());
        let e = g.edge_between(from, to).unwrap();
        assert_eq!(g.edge_weight[e.index()], 5.0);
    }

    #[test]
    fn empty_graph() {
        let g = CorridorGraph::empty();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.nearest_node(c(0.0, 0.0)).is_none());
    }
}

// ── Obstacle filter ───────────────────────────────────────────────────────────

#[cfg(test)]
mod obstacle {
    use super::helpers::{c, line, square};
    use crate::{CorridorGraph, GraphConfig, ObstacleSet, ProximityConfig, segment_blocked};

    #[test]
    fn crossing_segment_blocked() {
        let obstacles = [square((4.0, -1.0), (6.0, 1.0))];
        assert!(segment_blocked(c(0.0, 0.0), c(10.0, 0.0), &obstacles));
    }

    #[test]
    fn endpoint_inside_blocked() {
        let obstacles = [square((4.0, -1.0), (6.0, 1.0))];
        assert!(segment_blocked(c(5.0, 0.0), c(5.0, 5.0), &obstacles));
    }

    #[test]
    fn segment_inside_blocked() {
        let set = ObstacleSet::new([square((0.0, 0.0), (10.0, 10.0))]);
        assert!(set.blocks(c(2.0, 2.0), c(8.0, 8.0)));
    }

    #[test]
    fn clear_segment_passes() {
        let set = ObstacleSet::new([square((4.0, -1.0), (6.0, 1.0))]);
        assert!(!set.blocks(c(0.0, 5.0), c(10.0, 5.0)));
        assert!(!set.blocks(c(0.0, 0.0), c(3.0, 0.0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn build_excludes_crossing_segment() {
        let corridors = vec![line(&[(0.0, 0.0), (10.0, 0.0)])];
        let building = square((4.0, -1.0), (6.0, 1.0));

        let open = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        let (a, b) = (open.node_at(c(0.0, 0.0)).unwrap(), open.node_at(c(10.0, 0.0)).unwrap());
        assert!(open.has_edge(a, b));

        let blocked = CorridorGraph::build(&corridors, &[building], &GraphConfig::default()).unwrap();
        let (a, b) = (blocked.node_at(c(0.0, 0.0)).unwrap(), blocked.node_at(c(10.0, 0.0)).unwrap());
        assert!(!blocked.has_edge(a, b));
        assert!(!blocked.has_edge(b, a));
        assert_eq!(blocked.excluded().len(), 1);
        assert!(blocked.is_segment_excluded(wf_core::CorridorId(0), 0));
        assert!(blocked.obstacle_filtered());
    }

    #[test]
    fn obstacle_aware_off_keeps_segment() {
        let corridors = vec![line(&[(0.0, 0.0), (10.0, 0.0)])];
        let config = GraphConfig { obstacle_aware: false, ..GraphConfig::default() };
        let g = CorridorGraph::build(&corridors, &[square((4.0, -1.0), (6.0, 1.0))], &config).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert!(g.excluded().is_empty());
        assert!(!g.obstacle_filtered());
    }

    #[test]
    fn proximity_link_through_obstacle_rejected() {
        let corridors = vec![
            line(&[(0.0, 0.0), (3.0, 0.0)]),
            line(&[(7.0, 0.0), (10.0, 0.0)]),
        ];
        let config = GraphConfig {
            proximity: Some(ProximityConfig { max_distance: 5.0, min_distance: 0.0 }),
            ..GraphConfig::default()
        };
        let open = CorridorGraph::build(&corridors, &[], &config).unwrap();
        assert_eq!(open.stats().proximity_links, 1);

        let walled = CorridorGraph::build(&corridors, &[square((4.0, -1.0), (6.0, 1.0))], &config).unwrap();
        assert_eq!(walled.stats().proximity_links, 0);
    }
}

// ── Snapping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use wf_core::CorridorId;

    use super::helpers::{c, grid};
    use crate::{CorridorGraph, SnapTarget, SpatialError, snap};

    #[test]
    fn point_on_segment_snaps_exactly() {
        let g = grid();
        let s = snap(&g, c(3.0, 0.0)).unwrap();
        assert!(s.distance < 1e-12);
        assert!((s.coord.x - 3.0).abs() < 1e-12 && s.coord.y.abs() < 1e-12);
        assert!(matches!(s.target, SnapTarget::Projected(_)));
        let seg = s.on_segment.unwrap();
        assert_eq!((seg.corridor, seg.segment), (CorridorId(0), 0));
    }

    #[test]
    fn off_segment_point_projects() {
        let g = grid();
        let s = snap(&g, c(3.0, 2.0)).unwrap();
        assert!((s.distance - 2.0).abs() < 1e-12);
        assert!((s.coord.x - 3.0).abs() < 1e-12 && s.coord.y.abs() < 1e-12);
    }

    #[test]
    fn beyond_corridor_end_snaps_to_node() {
        let g = grid();
        let s = snap(&g, c(-1.0, -1.0)).unwrap();
        assert_eq!(s.target, SnapTarget::Node(g.node_at(c(0.0, 0.0)).unwrap()));
        assert!((s.distance - 2f64.sqrt()).abs() < 1e-12);
        assert!(s.on_segment.is_some());
    }

    #[test]
    fn equidistant_segments_first_wins() {
        let g = grid();
        // (5,5) is 5 units from four segments; corridor 0 is scanned first.
        let s = snap(&g, c(5.0, 5.0)).unwrap();
        assert_eq!(s.on_segment.unwrap().corridor, CorridorId(0));
        assert!((s.coord.x - 5.0).abs() < 1e-12 && s.coord.y.abs() < 1e-12);
    }

    #[test]
    fn empty_graph_fails() {
        let g = CorridorGraph::empty();
        assert!(matches!(snap(&g, c(0.0, 0.0)), Err(SpatialError::NoGraph)));
    }

    #[test]
    fn non_finite_query_fails() {
        let g = grid();
        assert!(matches!(snap(&g, c(f64::NAN, 0.0)), Err(SpatialError::Core(_))));
    }
}

// ── Overlay ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod overlay {
    use super::helpers::{c, grid};
    use crate::{EdgeKind, QueryOverlay, SearchConfig, snap};

    #[test]
    fn temporary_node_links_to_segment_ends() {
        let g = grid();
        let mut overlay = QueryOverlay::new(&g);
        let s = snap(&g, c(4.0, 0.5)).unwrap();
        let id = overlay.materialize(&s, &SearchConfig::default());

        assert_eq!(id.index(), g.node_count());
        assert!(overlay.is_temporary(id));
        let targets: Vec<_> = overlay.links(id).iter().map(|l| l.to).collect();
        assert!(targets.contains(&g.node_at(c(0.0, 0.0)).unwrap()));
        assert!(targets.contains(&g.node_at(c(10.0, 0.0)).unwrap()));
        assert!(overlay.links(id).iter().all(|l| matches!(l.kind, EdgeKind::Corridor(_))));

        // Links are mirrored on the base node side.
        let base = g.node_at(c(0.0, 0.0)).unwrap();
        assert!(overlay.links(base).iter().any(|l| l.to == id && (l.weight - 4.0).abs() < 1e-12));
    }

    #[test]
    fn same_point_reuses_temporary_node() {
        let g = grid();
        let mut overlay = QueryOverlay::new(&g);
        let config = SearchConfig::default();
        let a = overlay.materialize(&snap(&g, c(4.0, 1.0)).unwrap(), &config);
        let b = overlay.materialize(&snap(&g, c(4.0, -1.0)).unwrap(), &config);
        assert_eq!(a, b);
        assert_eq!(overlay.temp_count(), 1);
    }

    #[test]
    fn siblings_on_one_segment_are_linked() {
        let g = grid();
        let mut overlay = QueryOverlay::new(&g);
        let config = SearchConfig::default();
        let a = overlay.materialize(&snap(&g, c(3.0, 1.0)).unwrap(), &config);
        let b = overlay.materialize(&snap(&g, c(6.0, 1.0)).unwrap(), &config);
        let link = overlay.links(a).iter().find(|l| l.to == b).unwrap();
        assert!((link.weight - 3.0).abs() < 1e-12);
    }

    #[test]
    fn node_snap_adds_nothing() {
        let g = grid();
        let mut overlay = QueryOverlay::new(&g);
        let id = overlay.materialize(&snap(&g, c(10.0, 10.0)).unwrap(), &SearchConfig::default());
        assert_eq!(Some(id), g.node_at(c(10.0, 10.0)));
        assert_eq!(overlay.temp_count(), 0);
        assert_eq!(overlay.node_count(), g.node_count());
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::helpers::{assert_path_close, c, grid, line, square};
    use crate::{
        AStarRouter, CorridorGraph, GraphConfig, RouteFailure, Router, SearchConfig, SpatialError, find_path,
    };

    fn l_corridor() -> CorridorGraph {
        let corridors = vec![line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])];
        CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap()
    }

    #[test]
    fn same_corridor_is_sliced() {
        let g = l_corridor();
        let r = find_path(&g, c(2.0, 1.0), c(11.0, 8.0)).unwrap();
        assert!(r.valid);
        assert_path_close(&r.path, &[c(2.0, 0.0), c(10.0, 0.0), c(10.0, 8.0)]);
        assert!((r.distance - 16.0).abs() < 1e-9);
        assert_eq!(r.waypoints, 3);
    }

    #[test]
    fn reverse_slice_runs_backwards() {
        let g = l_corridor();
        let r = find_path(&g, c(11.0, 8.0), c(2.0, 1.0)).unwrap();
        assert_path_close(&r.path, &[c(10.0, 8.0), c(10.0, 0.0), c(2.0, 0.0)]);
        assert!((r.distance - 16.0).abs() < 1e-9);
    }

    #[test]
    fn slice_within_one_segment() {
        let g = l_corridor();
        let r = find_path(&g, c(7.0, -1.0), c(3.0, 1.0)).unwrap();
        assert_path_close(&r.path, &[c(7.0, 0.0), c(3.0, 0.0)]);
        assert!((r.distance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn slice_equals_graph_search() {
        let g = l_corridor();
        let sliced = find_path(&g, c(2.0, 0.0), c(10.0, 8.0)).unwrap();
        let searched = AStarRouter::new(SearchConfig { same_corridor_slicing: false, ..SearchConfig::default() })
            .find_path(&g, c(2.0, 0.0), c(10.0, 8.0))
            .unwrap();
        assert!(searched.valid);
        assert!((sliced.distance - searched.distance).abs() < 1e-9);
        assert_path_close(&sliced.path, &searched.path);
    }

    #[test]
    fn bridged_corridors_route() {
        let corridors = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(10.0, 1.0), (20.0, 1.0)]),
            line(&[(10.0, 0.0), (10.0, 1.0)]),
        ];
        let g = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        let r = find_path(&g, c(0.0, 0.0), c(20.0, 1.0)).unwrap();
        assert!(r.valid);
        assert!((r.distance - 21.0).abs() < 1e-6);
        assert_eq!(r.path, vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 1.0), c(20.0, 1.0)]);
        assert_eq!(r.node_count, Some(4));
    }

    #[test]
    fn disconnected_corridors_fail_softly() {
        let corridors = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(1010.0, 0.0), (1020.0, 0.0)]),
        ];
        let g = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        let r = find_path(&g, c(0.0, 0.0), c(1020.0, 0.0)).unwrap();
        assert!(!r.valid);
        assert_eq!(r.error, Some(RouteFailure::NoPath));
        assert!(r.path.is_empty());
        assert_eq!(r.waypoints, 0);
        assert!((r.distance - 1020.0).abs() < 1e-9);
        assert!(matches!(r.into_result(), Err(SpatialError::NoPath { .. })));
    }

    #[test]
    fn direct_fallback_is_flagged() {
        let corridors = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(1010.0, 0.0), (1020.0, 0.0)]),
        ];
        let g = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        let router = AStarRouter::new(SearchConfig { direct_fallback: true, ..SearchConfig::default() });
        let r = router.find_path(&g, c(0.0, 0.0), c(1020.0, 0.0)).unwrap();
        assert!(!r.valid);
        assert!(r.is_direct);
        assert_eq!(r.path, vec![c(0.0, 0.0), c(1020.0, 0.0)]);
    }

    #[test]
    fn iteration_cap_reports_exhausted() {
        let g = grid();
        let router = AStarRouter::new(SearchConfig { max_iterations: 1, ..SearchConfig::default() });
        let r = router.find_path(&g, c(0.0, 0.0), c(20.0, 10.0)).unwrap();
        assert!(!r.valid);
        assert_eq!(r.error, Some(RouteFailure::SearchExhausted));
        assert_eq!(r.error.unwrap().to_string(), "search exhausted");
    }

    #[test]
    fn empty_graph_reports_no_graph() {
        let g = CorridorGraph::empty();
        let r = find_path(&g, c(0.0, 0.0), c(3.0, 4.0)).unwrap();
        assert!(!r.valid);
        assert_eq!(r.error, Some(RouteFailure::NoGraph));
        assert_eq!(r.distance, 5.0);
    }

    #[test]
    fn malformed_query_is_an_error() {
        let g = grid();
        assert!(find_path(&g, c(f64::INFINITY, 0.0), c(1.0, 1.0)).is_err());
    }

    #[test]
    fn same_location_short_circuits() {
        let g = grid();
        let r = find_path(&g, c(3.0, 0.0), c(3.0, 1e-10)).unwrap();
        assert!(r.valid);
        assert_eq!(r.node_count, Some(1));
        assert_eq!(r.path, vec![c(3.0, 0.0), c(3.0, 1e-10)]);
    }

    #[test]
    fn path_ends_at_query_points() {
        let g = grid();
        let r = find_path(&g, c(1.0, -1.0), c(19.0, 11.0)).unwrap();
        assert!(r.valid);
        assert_eq!(r.path.first(), Some(&c(1.0, -1.0)));
        assert_eq!(r.path.last(), Some(&c(19.0, 11.0)));
        // 1 off-graph + 9 along + 10 up + 9 along + 1 off-graph, some way round.
        assert!((r.distance - 30.0).abs() < 1e-9);
    }

    #[test]
    fn graph_is_unchanged_by_queries() {
        let g = grid();
        let (nodes, edges) = (g.node_count(), g.edge_count());
        find_path(&g, c(4.0, 1.0), c(16.0, 9.0)).unwrap();
        assert_eq!((g.node_count(), g.edge_count()), (nodes, edges));
    }

    #[test]
    fn route_detours_around_excluded_segment() {
        // The bottom corridor runs through a building; the way round is the
        // other three sides.
        let corridors = vec![
            line(&[(0.0, 0.0), (10.0, 0.0)]),
            line(&[(0.0, 0.0), (0.0, 5.0), (10.0, 5.0), (10.0, 0.0)]),
        ];
        let building = square((4.0, -1.0), (6.0, 1.0));
        let g = CorridorGraph::build(&corridors, &[building], &GraphConfig::default()).unwrap();
        assert_eq!(g.excluded().len(), 1);

        let r = find_path(&g, c(0.0, 0.0), c(10.0, 0.0)).unwrap();
        assert!(r.valid);
        assert!((r.distance - 20.0).abs() < 1e-9);
        assert_eq!(r.path, vec![c(0.0, 0.0), c(0.0, 5.0), c(10.0, 5.0), c(10.0, 0.0)]);
    }

    #[test]
    fn geographic_route_uses_proximity_link() {
        // Two east-west corridors near 30.69° N with a ~9.6 m gap between
        // (-88.179, 30.69) and (-88.1789, 30.69).
        let corridors = vec![
            line(&[(-88.180, 30.690), (-88.179, 30.690)]),
            line(&[(-88.1789, 30.690), (-88.1779, 30.690)]),
        ];
        let g = CorridorGraph::build(&corridors, &[], &GraphConfig::geographic()).unwrap();
        assert_eq!(g.stats().proximity_links, 1);

        let near = g.nodes_within(c(-88.179, 30.690), 20.0, 10);
        assert_eq!(near.len(), 2);
        assert_eq!(near[0].1, 0.0);
        assert!((near[1].1 - 9.562).abs() < 0.01, "{near:?}");
        assert_eq!(g.nodes_within(c(-88.179, 30.690), 5.0, 10).len(), 1);

        let end_to_end = find_path(&g, c(-88.180, 30.690), c(-88.1779, 30.690)).unwrap();
        assert!(end_to_end.valid);
        assert!((end_to_end.distance - 200.80).abs() < 0.05, "{}", end_to_end.distance);

        // ~5.6 m north of the first corridor; projects onto it.
        let start = c(-88.1795, 30.69005);
        let router = AStarRouter::new(SearchConfig::geographic());
        let r = router.find_path(&g, start, c(-88.1779, 30.690)).unwrap();
        assert!(r.valid);
        assert_eq!(r.path.first(), Some(&start));
        assert_path_close(&r.path, &[start, c(-88.1795, 30.690), c(-88.1779, 30.690)]);
        assert!((r.distance - 158.55).abs() < 0.05, "{}", r.distance);
    }

    #[test]
    fn walking_time() {
        let corridors = vec![line(&[(0.0, 0.0), (84.0, 0.0)])];
        let g = CorridorGraph::build(&corridors, &[], &GraphConfig::default()).unwrap();
        let r = find_path(&g, c(0.0, 0.0), c(84.0, 0.0)).unwrap();
        assert!((r.walking_minutes(crate::WALKING_SPEED_MPS) - 1.0).abs() < 1e-9);
    }
}

// ── Search properties ─────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use wf_core::NodeId;

    use super::helpers::{c, campus, grid};
    use crate::{AStarRouter, Router, SearchConfig, find_path};

    #[test]
    fn routes_are_symmetric() {
        let g = campus();
        let pairs = [
            (c(1.0, -1.0), c(24.0, 11.0)),
            (c(0.0, 0.0), c(25.0, 12.0)),
            (c(5.0, 0.5), c(12.0, 9.0)),
            (c(0.0, 7.0), c(25.0, 0.0)),
        ];
        for (a, b) in pairs {
            let ab = find_path(&g, a, b).unwrap();
            let ba = find_path(&g, b, a).unwrap();
            assert!(ab.valid && ba.valid);
            assert!((ab.distance - ba.distance).abs() < 1e-9, "{a:?} <-> {b:?}");
            assert_eq!(ab.waypoints, ba.waypoints, "{a:?} <-> {b:?}");
        }
    }

    #[test]
    fn equal_cost_routes_are_symmetric() {
        // The grid has several shortest paths between opposite corners.
        let g = grid();
        let points = [
            c(0.0, 0.0),
            c(20.0, 10.0),
            c(20.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 0.0),
            c(5.0, 10.0),
            c(1.0, -1.0),
            c(19.0, 11.0),
        ];
        for (i, &a) in points.iter().enumerate() {
            for &b in &points[i + 1..] {
                let ab = find_path(&g, a, b).unwrap();
                let ba = find_path(&g, b, a).unwrap();
                assert!(ab.valid && ba.valid);
                assert!((ab.distance - ba.distance).abs() < 1e-9, "{a:?} <-> {b:?}");
                assert_eq!(ab.waypoints, ba.waypoints, "{a:?} <-> {b:?}");
                let mut back = ba.path.clone();
                back.reverse();
                assert_eq!(ab.path, back, "{a:?} <-> {b:?}");
            }
        }

        let r = find_path(&g, c(20.0, 10.0), c(0.0, 0.0)).unwrap();
        assert!((r.distance - 30.0).abs() < 1e-9);
    }

    #[test]
    fn heuristic_never_overestimates() {
        let g = campus();
        let router = AStarRouter::default();
        let metric = g.metric();
        for i in 0..g.node_count() {
            for j in 0..g.node_count() {
                let (a, b) = (NodeId::from_index(i), NodeId::from_index(j));
                let true_cost = router.graph_distance(&g, a, b).unwrap();
                let h = metric.distance(g.node_position(a), g.node_position(b));
                assert!(h <= true_cost + 1e-9, "{a} -> {b}: h={h} cost={true_cost}");
            }
        }
    }

    #[test]
    fn astar_matches_dijkstra() {
        let g = campus();
        let astar = AStarRouter::default();
        let dijkstra = AStarRouter::new(SearchConfig { heuristic_weight: 0.0, ..SearchConfig::default() });
        for i in 0..g.node_count() {
            for j in 0..g.node_count() {
                let (a, b) = (NodeId::from_index(i), NodeId::from_index(j));
                let x = astar.graph_distance(&g, a, b).unwrap();
                let y = dijkstra.graph_distance(&g, a, b).unwrap();
                assert!((x - y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn concurrent_queries_share_one_graph() {
        let g = campus();
        let router = AStarRouter::default();
        let expected = router.find_path(&g, c(1.0, -1.0), c(24.0, 11.0)).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| router.find_path(&g, c(1.0, -1.0), c(24.0, 11.0)).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}

// ── Stats & simplification ────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use super::helpers::{grid, line, square};
    use crate::{CorridorGraph, GraphConfig};

    #[test]
    fn grid_stats() {
        let s = grid().stats();
        assert_eq!(s.nodes, 6);
        assert_eq!(s.links, 7);
        assert_eq!(s.corridor_links, 7);
        assert_eq!((s.min_degree, s.max_degree), (2, 3));
        assert_eq!(s.isolated_nodes, 0);
        assert!(s.to_string().contains("nodes:             6"));
    }

    #[test]
    fn excluded_segments_leave_isolated_nodes() {
        let corridors = vec![line(&[(0.0, 0.0), (10.0, 0.0)])];
        let g = CorridorGraph::build(&corridors, &[square((4.0, -1.0), (6.0, 1.0))], &GraphConfig::default())
            .unwrap();
        let s = g.stats();
        assert_eq!(s.excluded_segments, 1);
        assert_eq!(s.isolated_nodes, 2);
        assert_eq!(s.links, 0);
    }
}

#[cfg(test)]
mod simplify {
    use super::helpers::c;
    use crate::simplify_path;

    #[test]
    fn collinear_points_removed() {
        let path = [c(0.0, 0.0), c(5.0, 0.0), c(10.0, 0.0), c(10.0, 5.0)];
        assert_eq!(simplify_path(&path, 1e-6), vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 5.0)]);
    }

    #[test]
    fn short_paths_and_zero_tolerance_untouched() {
        let path = [c(0.0, 0.0), c(5.0, 0.0), c(10.0, 0.0)];
        assert_eq!(simplify_path(&path[..2], 1.0), path[..2].to_vec());
        assert_eq!(simplify_path(&path, 0.0), path.to_vec());
    }
}

// ── GeoJSON ───────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "geojson"))]
mod layers {
    use super::helpers::c;
    use crate::{CampusLayers, CorridorGraph, GraphConfig, find_path, parse_geojson};

    const CAMPUS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "Type": "Corridor" },
              "geometry": { "type": "LineString", "coordinates": [[0, 0], [10, 0]] } },
            { "type": "Feature", "properties": { "Type": "Room" },
              "geometry": { "type": "LineString", "coordinates": [[0, 5], [10, 5]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "MultiLineString",
                            "coordinates": [[[10, 0], [10, 10]], [[10, 10], [20, 10]]] } },
            { "type": "Feature", "properties": { "type": "corridor" },
              "geometry": { "type": "LineString", "coordinates": [[30, 30]] } },
            { "type": "Feature", "properties": { "Type": "Building" },
              "geometry": { "type": "Polygon",
                            "coordinates": [[[12, 2], [18, 2], [18, 8], [12, 8], [12, 2]]] } }
        ]
    }"#;

    #[test]
    fn loads_corridors_and_obstacles() {
        let gj = parse_geojson(CAMPUS).unwrap();
        let layers = CampusLayers::from_geojson(&gj);
        assert_eq!(layers.corridors.len(), 3);
        assert_eq!(layers.obstacles.len(), 1);
        assert_eq!(layers.skipped, 1);
    }

    #[test]
    fn loaded_layers_route() {
        let layers = CampusLayers::from_geojson(&parse_geojson(CAMPUS).unwrap());
        let g = CorridorGraph::build(&layers.corridors, &layers.obstacles, &GraphConfig::default()).unwrap();
        let r = find_path(&g, c(0.0, 0.0), c(20.0, 10.0)).unwrap();
        assert!(r.valid);
        assert!((r.distance - 30.0).abs() < 1e-9);

        let json = r.to_json();
        assert_eq!(json["valid"], true);
        assert_eq!(json["waypoints"], 4);
        assert_eq!(json["path"][0][0], 0.0);
        assert!(json.get("error").is_none());

        let feature = r.to_feature();
        assert!(feature.geometry.is_some());
        assert_eq!(feature.property("distance").and_then(|d| d.as_f64()), Some(30.0));
    }

    #[test]
    fn bad_document_is_an_error() {
        assert!(parse_geojson("{ not json").is_err());
    }
}
