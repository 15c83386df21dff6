//! Delaunay triangulation (Bowyer–Watson with a vertex at infinity).
//!
//! The hull is closed by ghost triangles sharing one vertex at infinity.

use std::collections::BTreeSet;

use crate::game::Point;

/// Stands for the vertex at infinity in a triangle.
const GHOST: usize = usize::MAX;

/// Twice the signed area of `a b c`; positive when counter-clockwise.
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Positive when `d` is strictly inside the circumcircle of the
/// counter-clockwise triangle `a b c`.
#[allow(clippy::similar_names)]
fn in_circle(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);
    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;
    adx * (bdy * c_lift - b_lift * cdy) - ady * (bdx * c_lift - b_lift * cdx)
        + a_lift * (bdx * cdy - bdy * cdx)
}

/// Whether `p` lies strictly inside the segment `u v`, assuming it is on its line.
fn strictly_between(u: Point, v: Point, p: Point) -> bool {
    (p.x - u.x) * (v.x - u.x) + (p.y - u.y) * (v.y - u.y) > 0.0
        && (p.x - v.x) * (u.x - v.x) + (p.y - v.y) * (u.y - v.y) > 0.0
}

/// Counter-clockwise vertex triple. A ghost keeps [`GHOST`] last, so
/// `[u, v, GHOST]` covers the outside of hull edge `v -> u`.
#[derive(Debug, Clone, Copy)]
struct Triangle([usize; 3]);

impl Triangle {
    fn new(a: usize, b: usize, c: usize) -> Self {
        if a == GHOST {
            Self([b, c, a])
        } else if b == GHOST {
            Self([c, a, b])
        } else {
            Self([a, b, c])
        }
    }

    fn is_ghost(self) -> bool {
        self.0[2] == GHOST
    }

    /// Whether `p` is strictly inside the circumcircle. For a ghost that is
    /// the open half-plane beyond its hull edge plus the open edge itself.
    fn conflicts(self, points: &[Point], p: Point) -> bool {
        let [first, second, third] = self.0;
        if third != GHOST {
            return in_circle(points[first], points[second], points[third], p) > 0.0;
        }
        let (from, to) = (points[first], points[second]);
        let side = orient(from, to, p);
        if side > 0.0 {
            return true;
        }
        side >= 0.0 && strictly_between(from, to, p)
    }

    fn directed_edges(self) -> [(usize, usize); 3] {
        let [first, second, third] = self.0;
        [(first, second), (second, third), (third, first)]
    }
}

const fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

fn key(p: Point) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}

/// How the input starts: a counter-clockwise triangle, a line through two
/// distinct points, or a single repeated point.
enum Seed {
    Triangle([usize; 3]),
    Line(usize, usize),
    Single,
}

fn seed(points: &[Point]) -> Seed {
    let origin = points[0];
    let Some(second) = points.iter().position(|&p| key(p) != key(origin)) else {
        return Seed::Single;
    };
    let toward = points[second];
    let Some(third) = points
        .iter()
        .position(|&p| orient(origin, toward, p).abs() > 0.0)
    else {
        return Seed::Line(0, second);
    };

    if orient(origin, toward, points[third]) > 0.0 {
        Seed::Triangle([0, second, third])
    } else {
        Seed::Triangle([0, third, second])
    }
}

/// Path through collinear points in order along the line from `start`
/// towards `next`, skipping duplicates.
fn collinear_edges(points: &[Point], start: usize, next: usize) -> Vec<(usize, usize)> {
    let (origin, toward) = (points[start], points[next]);
    let along = |point: Point| {
        (point.x - origin.x) * (toward.x - origin.x) + (point.y - origin.y) * (toward.y - origin.y)
    };

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&i, &j| {
        along(points[i])
            .total_cmp(&along(points[j]))
            .then(i.cmp(&j))
    });
    order.dedup_by(|later, earlier| key(points[*later]) == key(points[*earlier]));

    let edges: BTreeSet<(usize, usize)> = order
        .windows(2)
        .map(|pair| ordered(pair[0], pair[1]))
        .collect();
    edges.into_iter().collect()
}

/// Unique undirected edges `(low, high)` of the Delaunay triangulation of `points`.
///
/// Fewer than two distinct points give no edges. Duplicate points are left
/// unconnected and collinear input gives the path along the line; callers
/// repair connectivity afterwards.
#[must_use]
pub fn delaunay_edges(points: &[Point]) -> Vec<(usize, usize)> {
    if points.len() < 2 {
        return Vec::new();
    }
    let [a, b, c] = match seed(points) {
        Seed::Triangle(triangle) => triangle,
        Seed::Line(start, next) => return collinear_edges(points, start, next),
        Seed::Single => return Vec::new(),
    };

    let mut triangles = vec![
        Triangle::new(a, b, c),
        Triangle::new(b, a, GHOST),
        Triangle::new(c, b, GHOST),
        Triangle::new(a, c, GHOST),
    ];
    let mut inserted: BTreeSet<(u64, u64)> =
        [a, b, c].into_iter().map(|i| key(points[i])).collect();

    for (index, &point) in points.iter().enumerate() {
        if !inserted.insert(key(point)) {
            continue;
        }

        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|triangle| triangle.conflicts(points, point));
        triangles = good;

        // Cavity boundary: directed edges whose twin is not in the cavity.
        let cavity: BTreeSet<(usize, usize)> =
            bad.iter().flat_map(|triangle| triangle.directed_edges()).collect();
        for &(from, to) in &cavity {
            if !cavity.contains(&(to, from)) {
                triangles.push(Triangle::new(from, to, index));
            }
        }
    }

    let mut edges = BTreeSet::new();
    for triangle in triangles.iter().filter(|triangle| !triangle.is_ghost()) {
        let [first, second, third] = triangle.0;
        edges.extend([ordered(first, second), ordered(second, third), ordered(third, first)]);
    }
    edges.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_inputs() {
        assert!(delaunay_edges(&[]).is_empty());
        assert!(delaunay_edges(&[Point::new(1.0, 1.0)]).is_empty());
        assert_eq!(
            delaunay_edges(&[Point::new(0.0, 0.0), Point::new(5.0, 5.0)]),
            vec![(0, 1)]
        );
    }

    #[test]
    fn test_triangle() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
        ];
        assert_eq!(delaunay_edges(&points), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_square_with_center() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
            Point::new(50.0, 50.0),
        ];
        let edges = delaunay_edges(&points);

        // Four hull edges plus four spokes; no diagonal crosses the centre.
        assert_eq!(edges.len(), 8);
        for corner in 0..4 {
            assert!(edges.contains(&(corner, 4)));
        }
        assert!(!edges.contains(&(0, 2)));
        assert!(!edges.contains(&(1, 3)));
    }

    #[test]
    fn test_delaunay_flips_thin_quad() {
        // The short diagonal (1, 3) is the Delaunay one.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, -20.0),
            Point::new(200.0, 0.0),
            Point::new(100.0, 20.0),
        ];
        let edges = delaunay_edges(&points);
        assert!(edges.contains(&(1, 3)));
        assert!(!edges.contains(&(0, 2)));
    }

    #[test]
    fn test_collinear_input_gives_path() {
        let points = [
            Point::new(30.0, 30.0),
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
        ];
        assert_eq!(delaunay_edges(&points), vec![(0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_hull_edges_survive() {
        // A shallow convex chain closed by one far point: consecutive chain
        // points are hull edges however flat the chain gets.
        let mut points: Vec<Point> = (0..8)
            .map(|i| {
                let x = f64::from(i) * 100.0;
                Point::new(x, 0.0001 * (x - 330.0) * (x - 330.0))
            })
            .collect();
        points.push(Point::new(330.0, 2000.0));
        let edges = delaunay_edges(&points);
        for i in 0..7 {
            assert!(edges.contains(&(i, i + 1)), "missing hull edge ({i}, {})", i + 1);
        }
    }

    #[test]
    fn test_point_outside_on_hull_line() {
        // The fourth point extends edge (0, 1) past vertex 1.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
            Point::new(200.0, 0.0),
        ];
        assert_eq!(delaunay_edges(&points), vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_point_on_hull_edge_splits_it() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
            Point::new(50.0, 0.0),
        ];
        assert_eq!(delaunay_edges(&points), vec![(0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_duplicate_points_do_not_panic() {
        let points = [
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(30.0, 40.0),
        ];
        let edges = delaunay_edges(&points);
        assert!(edges.iter().all(|&(a, b)| a < b && b < points.len()));
    }
}
