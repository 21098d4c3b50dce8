use hexnav::{
    nav::smooth::has_line_of_sight, Hex, NavConfig, NavMesh, ObstacleBox,
    PathFollower, Point2, SearchTrace,
};

fn mesh(smooth_paths: bool) -> NavMesh {
    NavMesh::new(NavConfig {
        width: 60.0,
        height: 60.0,
        smooth_paths,
        ..Default::default()
    })
    .unwrap()
}

fn add_obstacles(mesh: &mut NavMesh) {
    for (center, size) in [
        ((8.0, 0.0), (2.0, 20.0)),
        ((-10.0, 12.0), (14.0, 3.0)),
        ((-5.0, -15.0), (6.0, 6.0)),
        ((18.0, 18.0), (4.0, 10.0)),
    ] {
        mesh.add_obstacle(&ObstacleBox::new(
            Point2::new(center.0, center.1),
            Point2::new(size.0, size.1),
        ));
    }
}

/// A spread of points across the mesh, for property-style checks
fn sample_points() -> Vec<Point2> {
    let mut points = Vec::new();
    for x in (-25..=25).step_by(10) {
        for y in (-25..=25).step_by(10) {
            points.push(Point2::new(f64::from(x) + 0.3, f64::from(y) - 0.2));
        }
    }
    points
}

/// With nothing in the way, A* always finds a shortest path
#[test]
fn test_unblocked_path_length() {
    let mesh = mesh(false);
    let layout = *mesh.map().layout();
    let points = sample_points();
    for &start in &points {
        for &destination in points.iter().step_by(3) {
            let path = mesh.find_hex_path(start, destination).unwrap();
            let distance =
                layout.hex_at(start).distance_to(layout.hex_at(destination));
            assert_eq!(path.len(), distance, "{} -> {}", start, destination);
        }
    }
}

#[test]
fn test_aligned_straight_path() {
    let mesh = mesh(false);
    let layout = *mesh.map().layout();
    let start = layout.hex_to_pixel(Hex::ORIGIN);
    let destination = layout.hex_to_pixel(Hex::new_qr(5, 0));

    let path = mesh.find_hex_path(start, destination).unwrap();
    assert_eq!(path.len(), 5);
    assert_eq!(path.last(), Some(&Hex::new_qr(5, 0)));
}

/// Blocking the middle of a straight path forces a detour
#[test]
fn test_midpoint_obstacle_detour() {
    let mut mesh = mesh(false);
    let layout = *mesh.map().layout();
    let start = layout.hex_to_pixel(Hex::ORIGIN);
    let destination = layout.hex_to_pixel(Hex::new_qr(6, 0));
    let midpoint = Hex::new_qr(3, 0);
    mesh.add_obstacle(&ObstacleBox::new(
        layout.hex_to_pixel(midpoint),
        Point2::new(1.0, 1.0),
    ));
    assert!(mesh.is_blocked(midpoint));

    let path = mesh.find_hex_path(start, destination).unwrap();
    assert!(path.len() > 6, "expected a detour, got {:?}", path);
    assert!(!path.contains(&midpoint));
}

/// A box around the destination cuts it off from everywhere outside
#[test]
fn test_enclosed_destination() {
    let mut mesh = mesh(true);
    let destination = Point2::new(15.0, -15.0);
    mesh.add_obstacle(&ObstacleBox::new(destination, Point2::new(6.0, 6.0)));
    assert!(!mesh.is_blocked(mesh.map().hex_at(destination)));

    let outside = sample_points().into_iter().filter(|point| {
        (point.x - destination.x).abs() > 4.0
            || (point.y - destination.y).abs() > 4.0
    });
    for start in outside {
        assert_eq!(
            mesh.find_path(start, destination),
            None,
            "found a path from {} into the enclosure",
            start
        );
    }
}

#[test]
fn test_blocked_destination() {
    let mut mesh = mesh(true);
    let destination = Point2::new(10.0, 10.0);
    // Tiny obstacle, entirely inside the destination hex
    mesh.add_obstacle(&ObstacleBox::new(destination, Point2::new(0.1, 0.1)));
    let mut trace = SearchTrace::default();
    assert_eq!(
        mesh.find_path_traced(Point2::ORIGIN, destination, &mut trace),
        None
    );
    assert!(trace.tested.is_empty());
}

#[test]
fn test_destination_off_map() {
    let mesh = mesh(true);
    assert_eq!(mesh.find_path(Point2::ORIGIN, Point2::new(500.0, 0.0)), None);
}

/// Smoothing only ever removes waypoints, keeps both ends, and leaves every
/// leg of the path walkable
#[test]
fn test_smoothing_properties() {
    let mut raw_mesh = mesh(false);
    let mut smooth_mesh = mesh(true);
    add_obstacles(&mut raw_mesh);
    add_obstacles(&mut smooth_mesh);
    let layout = *smooth_mesh.map().layout();

    let points: Vec<Point2> = sample_points()
        .into_iter()
        .filter(|&point| !smooth_mesh.is_blocked(layout.hex_at(point)))
        .collect();
    for &start in &points {
        for &destination in &points {
            let raw = raw_mesh.find_path(start, destination);
            let smoothed = smooth_mesh.find_path(start, destination);
            let (raw, smoothed) = match (raw, smoothed) {
                (Some(raw), Some(smoothed)) => (raw, smoothed),
                (None, None) => continue,
                (raw, smoothed) => panic!(
                    "smoothing changed reachability: {:?} vs {:?}",
                    raw, smoothed
                ),
            };

            assert!(smoothed.len() <= raw.len());
            assert_eq!(smoothed.first(), Some(&start));
            assert_eq!(smoothed.last(), Some(&destination));
            for pair in smoothed.windows(2) {
                assert!(
                    has_line_of_sight(
                        layout.hex_at(pair[0]),
                        layout.hex_at(pair[1]),
                        smooth_mesh.blocked()
                    ),
                    "no line of sight {} -> {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }
}

#[test]
fn test_trace_matches_path() {
    let mut mesh = mesh(false);
    add_obstacles(&mut mesh);
    let start = Point2::new(0.5, 0.5);
    let destination = Point2::new(20.0, 0.0);

    let mut trace = SearchTrace::default();
    let path = mesh.find_path_traced(start, destination, &mut trace);
    let hex_path = mesh.find_hex_path(start, destination).unwrap();
    assert!(path.is_some());
    assert_eq!(trace.in_path, hex_path);
    assert!(trace.tested.len() >= hex_path.len());
    // Nothing blocked ever gets expanded
    assert!(trace.tested.iter().all(|&hex| !mesh.is_blocked(hex)));
}

#[test]
fn test_follow_path() {
    let mut mesh = mesh(true);
    add_obstacles(&mut mesh);
    let start = Point2::new(0.5, 0.5);
    let destination = Point2::new(20.0, 0.0);
    let path = mesh.find_path(start, destination).unwrap();

    let mut follower = PathFollower::new(start, 5.0);
    follower.set_path(path);
    let mut steps = 0;
    while !follower.is_idle() {
        follower.step(0.1);
        steps += 1;
        assert!(steps < 10_000, "follower never arrived");
    }
    assert_eq!(follower.position(), destination);
}

/// Queries from far away or with garbage input just don't find anything
#[test]
fn test_unusable_query_points() {
    let mut mesh = mesh(true);
    add_obstacles(&mut mesh);
    let reachable = Point2::new(0.5, 0.5);
    for point in [
        Point2::new(-1e10, 0.0),
        Point2::new(0.0, 1e12),
        Point2::new(f64::NAN, 0.0),
        Point2::new(f64::NEG_INFINITY, f64::INFINITY),
    ] {
        assert_eq!(mesh.find_path(point, reachable), None, "from {}", point);
        assert_eq!(mesh.find_path(reachable, point), None, "to {}", point);
    }

    // Off the map, but still on the grid: a valid query with no path
    assert_eq!(mesh.find_path(Point2::new(-1e5, 0.0), reachable), None);
}

#[test]
fn test_unusable_obstacle_ignored() {
    let mut mesh = mesh(true);
    let before = mesh.blocked().clone();
    mesh.add_obstacle(&ObstacleBox::new(
        Point2::new(f64::NAN, 0.0),
        Point2::new(4.0, 4.0),
    ));
    mesh.add_obstacle(&ObstacleBox::new(
        Point2::ORIGIN,
        Point2::new(4.0, f64::NAN),
    ));
    assert_eq!(mesh.blocked(), &before);
    assert!(mesh
        .find_path(Point2::new(10.0, 10.0), Point2::ORIGIN)
        .is_some());
}
