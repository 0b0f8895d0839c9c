//! Delaunay triangulation of scattered points.
//!
//! Sweep-hull construction: points are added in order of distance from a
//! seed circumcenter, each new point is connected to the visible part of the
//! convex hull, and edges are flipped until every triangle satisfies the
//! empty-circumcircle condition. Runs in O(n log n) for typical inputs.
//!
//! The triangulation fails (rather than returning nothing) when the input has
//! fewer than three distinct points or when every point lies on one line.

use field_common::{FieldError, FieldResult};

/// Marker for a missing half-edge or removed hull entry.
const EMPTY: usize = usize::MAX;

/// Tolerance for treating two points as the same node.
const EPSILON: f64 = f64::EPSILON * 2.0;

/// Seed triangles with a smaller angle sine at the first vertex count as collinear.
const COLLINEAR_TOLERANCE: f64 = 1e-5;

/// A point in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn dist2(&self, p: &Point) -> f64 {
        let dx = self.x - p.x;
        let dy = self.y - p.y;
        dx * dx + dy * dy
    }

    /// True when `self`, `q`, `r` turn counter-clockwise (in y-up coordinates).
    fn orient(&self, q: &Point, r: &Point) -> bool {
        (q.y - self.y) * (r.x - q.x) - (q.x - self.x) * (r.y - q.y) < 0.0
    }

    fn circumdelta(&self, b: &Point, c: &Point) -> (f64, f64) {
        let dx = b.x - self.x;
        let dy = b.y - self.y;
        let ex = c.x - self.x;
        let ey = c.y - self.y;

        let bl = dx * dx + dy * dy;
        let cl = ex * ex + ey * ey;
        let d = 0.5 / (dx * ey - dy * ex);

        ((ey * bl - dy * cl) * d, (dx * cl - ex * bl) * d)
    }

    fn circumradius2(&self, b: &Point, c: &Point) -> f64 {
        let (x, y) = self.circumdelta(b, c);
        x * x + y * y
    }

    fn circumcenter(&self, b: &Point, c: &Point) -> Point {
        let (x, y) = self.circumdelta(b, c);
        Point::new(self.x + x, self.y + y)
    }

    fn in_circle(&self, b: &Point, c: &Point, p: &Point) -> bool {
        let dx = self.x - p.x;
        let dy = self.y - p.y;
        let ex = b.x - p.x;
        let ey = b.y - p.y;
        let fx = c.x - p.x;
        let fy = c.y - p.y;

        let ap = dx * dx + dy * dy;
        let bp = ex * ex + ey * ey;
        let cp = fx * fx + fy * fy;

        dx * (ey * cp - bp * fy) - dy * (ex * cp - bp * fx) + ap * (ex * fy - ey * fx) < 0.0
    }

    fn nearly_equals(&self, p: &Point) -> bool {
        (self.x - p.x).abs() <= EPSILON && (self.y - p.y).abs() <= EPSILON
    }
}

/// Triangles over a point set, indexed into the caller's coordinate arrays.
#[derive(Debug, Clone)]
pub struct Triangulation {
    triangles: Vec<[usize; 3]>,
    hull: Vec<usize>,
    point_count: usize,
}

impl Triangulation {
    /// Vertex index triples, one per triangle.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Convex hull vertex indices.
    pub fn hull(&self) -> &[usize] {
        &self.hull
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of input points that took part in the triangulation.
    pub fn point_count(&self) -> usize {
        self.point_count
    }
}

/// Triangulate parallel coordinate arrays.
///
/// Points with a non-finite coordinate are left out; indices in the result
/// refer to positions in `x` / `y`.
pub fn triangulate(x: &[f32], y: &[f32]) -> FieldResult<Triangulation> {
    if x.len() != y.len() {
        return Err(FieldError::invalid(
            "coordinates",
            format!("x and y lengths differ: {} vs {}", x.len(), y.len()),
        ));
    }

    let mut index = Vec::with_capacity(x.len());
    let mut points = Vec::with_capacity(x.len());
    for (i, (&px, &py)) in x.iter().zip(y).enumerate() {
        if px.is_finite() && py.is_finite() {
            index.push(i);
            points.push(Point::new(px as f64, py as f64));
        }
    }

    if points.len() < 3 {
        return Err(FieldError::RenderError(format!(
            "triangulation needs at least 3 points, got {}",
            points.len()
        )));
    }

    let mesh = sweep_hull(&points).ok_or_else(|| {
        FieldError::RenderError(format!(
            "cannot triangulate {} points: fewer than 3 distinct points or all collinear",
            points.len()
        ))
    })?;

    let triangles: Vec<[usize; 3]> = mesh
        .triangles
        .chunks_exact(3)
        .map(|t| [index[t[0]], index[t[1]], index[t[2]]])
        .collect();
    if triangles.is_empty() {
        return Err(FieldError::RenderError(
            "triangulation produced no triangles".to_string(),
        ));
    }

    Ok(Triangulation {
        triangles,
        hull: mesh.hull.iter().map(|&i| index[i]).collect(),
        point_count: points.len(),
    })
}

fn next_halfedge(i: usize) -> usize {
    if i % 3 == 2 {
        i - 2
    } else {
        i + 1
    }
}

fn prev_halfedge(i: usize) -> usize {
    if i % 3 == 0 {
        i + 2
    } else {
        i - 1
    }
}

/// Flat triangle/half-edge arrays built during the sweep.
struct Mesh {
    triangles: Vec<usize>,
    halfedges: Vec<usize>,
    hull: Vec<usize>,
}

impl Mesh {
    fn with_capacity(n: usize) -> Self {
        let max_triangles = if n > 2 { 2 * n - 5 } else { 0 };
        Self {
            triangles: Vec::with_capacity(max_triangles * 3),
            halfedges: Vec::with_capacity(max_triangles * 3),
            hull: Vec::new(),
        }
    }

    fn add_triangle(&mut self, i0: usize, i1: usize, i2: usize, a: usize, b: usize, c: usize) -> usize {
        let t = self.triangles.len();

        self.triangles.extend_from_slice(&[i0, i1, i2]);
        self.halfedges.extend_from_slice(&[a, b, c]);

        if a != EMPTY {
            self.halfedges[a] = t;
        }
        if b != EMPTY {
            self.halfedges[b] = t + 1;
        }
        if c != EMPTY {
            self.halfedges[c] = t + 2;
        }

        t
    }

    /// Flip edge `a` while its opposite vertex lies inside the circumcircle.
    ///
    /// Returns the half-edge that now ends at the new point.
    fn legalize(&mut self, a: usize, points: &[Point], hull: &mut Hull) -> usize {
        let b = self.halfedges[a];
        let ar = prev_halfedge(a);

        if b == EMPTY {
            return ar;
        }

        let al = next_halfedge(a);
        let bl = prev_halfedge(b);

        let p0 = self.triangles[ar];
        let pr = self.triangles[a];
        let pl = self.triangles[al];
        let p1 = self.triangles[bl];

        let illegal = points[p0].in_circle(&points[pr], &points[pl], &points[p1]);
        if !illegal {
            return ar;
        }

        self.triangles[a] = p1;
        self.triangles[b] = p0;

        let hbl = self.halfedges[bl];
        let har = self.halfedges[ar];

        // The flipped edge was on the hull; repoint the hull entry that used it.
        if hbl == EMPTY {
            let mut e = hull.start;
            loop {
                if hull.tri[e] == bl {
                    hull.tri[e] = a;
                    break;
                }
                e = hull.prev[e];
                if e == hull.start {
                    break;
                }
            }
        }

        self.halfedges[a] = hbl;
        self.halfedges[b] = har;
        self.halfedges[ar] = bl;

        if hbl != EMPTY {
            self.halfedges[hbl] = a;
        }
        if har != EMPTY {
            self.halfedges[har] = b;
        }
        self.halfedges[bl] = ar;

        let br = next_halfedge(b);

        self.legalize(a, points, hull);
        self.legalize(br, points, hull)
    }
}

/// Advancing convex hull with an angular hash for fast edge lookup.
struct Hull {
    prev: Vec<usize>,
    next: Vec<usize>,
    tri: Vec<usize>,
    hash: Vec<usize>,
    start: usize,
    center: Point,
}

impl Hull {
    fn new(n: usize, center: Point, i0: usize, i1: usize, i2: usize, points: &[Point]) -> Self {
        let hash_len = ((n as f64).sqrt() as usize).max(1);

        let mut hull = Self {
            prev: vec![0; n],
            next: vec![0; n],
            tri: vec![0; n],
            hash: vec![EMPTY; hash_len],
            start: i0,
            center,
        };

        hull.next[i0] = i1;
        hull.prev[i2] = i1;
        hull.next[i1] = i2;
        hull.prev[i0] = i2;
        hull.next[i2] = i0;
        hull.prev[i1] = i0;

        hull.tri[i0] = 0;
        hull.tri[i1] = 1;
        hull.tri[i2] = 2;

        hull.hash_edge(&points[i0], i0);
        hull.hash_edge(&points[i1], i1);
        hull.hash_edge(&points[i2], i2);

        hull
    }

    /// Bucket by pseudo-angle around the seed circumcenter.
    fn hash_key(&self, p: &Point) -> usize {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;

        let p = dx / (dx.abs() + dy.abs());
        let a = (if dy > 0.0 { 3.0 - p } else { 1.0 + p }) / 4.0;

        let len = self.hash.len();
        (((len as f64) * a).floor() as usize) % len
    }

    fn hash_edge(&mut self, p: &Point, i: usize) {
        let key = self.hash_key(p);
        self.hash[key] = i;
    }

    /// Find a hull edge visible from `p`; the flag says whether the walk
    /// started on it, in which case edges behind it may be visible too.
    fn find_visible_edge(&self, p: &Point, points: &[Point]) -> (usize, bool) {
        let mut start = 0;
        let key = self.hash_key(p);
        let len = self.hash.len();
        for j in 0..len {
            start = self.hash[(key + j) % len];
            if start != EMPTY && self.next[start] != EMPTY {
                break;
            }
        }
        start = self.prev[start];

        let mut e = start;
        while !p.orient(&points[e], &points[self.next[e]]) {
            e = self.next[e];
            if e == start {
                return (EMPTY, false);
            }
        }
        (e, e == start)
    }
}

fn bbox_center(points: &[Point]) -> Point {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0)
}

fn find_closest_point(points: &[Point], p0: &Point) -> Option<usize> {
    let mut min_dist = f64::INFINITY;
    let mut k = 0;
    for (i, p) in points.iter().enumerate() {
        let d = p0.dist2(p);
        if d > 0.0 && d < min_dist {
            k = i;
            min_dist = d;
        }
    }
    if min_dist == f64::INFINITY {
        None
    } else {
        Some(k)
    }
}

/// Pick the seed triangle: the point nearest the bbox center, its nearest
/// neighbour, and the third point giving the smallest circumcircle.
fn find_seed_triangle(points: &[Point]) -> Option<(usize, usize, usize)> {
    let center = bbox_center(points);
    let i0 = find_closest_point(points, &center)?;
    let p0 = &points[i0];

    let i1 = find_closest_point(points, p0)?;
    let p1 = &points[i1];

    let mut min_radius = f64::INFINITY;
    let mut i2 = EMPTY;
    for (i, p) in points.iter().enumerate() {
        if i == i0 || i == i1 {
            continue;
        }
        let r = p0.circumradius2(p1, p);
        if r < min_radius {
            i2 = i;
            min_radius = r;
        }
    }

    // Collinear points have an infinite (or NaN) circumradius.
    if min_radius == f64::INFINITY {
        return None;
    }

    // Rounded input (f32 samples) leaves collinear points with a finite
    // radius; reject seeds whose angle at p0 is effectively zero.
    let p2 = &points[i2];
    let (ax, ay) = (p1.x - p0.x, p1.y - p0.y);
    let (bx, by) = (p2.x - p0.x, p2.y - p0.y);
    let cross = (ax * by - ay * bx).abs();
    let lengths = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
    if cross <= COLLINEAR_TOLERANCE * lengths {
        return None;
    }

    if p0.orient(p1, &points[i2]) {
        Some((i0, i2, i1))
    } else {
        Some((i0, i1, i2))
    }
}

fn sweep_hull(points: &[Point]) -> Option<Mesh> {
    let n = points.len();
    let (i0, i1, i2) = find_seed_triangle(points)?;
    let center = points[i0].circumcenter(&points[i1], &points[i2]);

    let mut mesh = Mesh::with_capacity(n);
    mesh.add_triangle(i0, i1, i2, EMPTY, EMPTY, EMPTY);

    let mut order: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, center.dist2(p)))
        .collect();
    order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut hull = Hull::new(n, center, i0, i1, i2, points);

    for (k, &(i, _)) in order.iter().enumerate() {
        let p = &points[i];

        if k > 0 && p.nearly_equals(&points[order[k - 1].0]) {
            continue;
        }
        if i == i0 || i == i1 || i == i2 {
            continue;
        }

        let (mut e, walk_back) = hull.find_visible_edge(p, points);
        if e == EMPTY {
            continue;
        }

        // First triangle from the point, then flip until Delaunay.
        let t = mesh.add_triangle(e, i, hull.next[e], EMPTY, EMPTY, hull.tri[e]);
        hull.tri[i] = mesh.legalize(t + 2, points, &mut hull);
        hull.tri[e] = t;

        // Walk forward along the hull.
        let mut n = hull.next[e];
        loop {
            let q = hull.next[n];
            if !p.orient(&points[n], &points[q]) {
                break;
            }
            let t = mesh.add_triangle(n, i, q, hull.tri[i], EMPTY, hull.tri[n]);
            hull.tri[i] = mesh.legalize(t + 2, points, &mut hull);
            hull.next[n] = EMPTY;
            n = q;
        }

        // Walk backward from the other side.
        if walk_back {
            loop {
                let q = hull.prev[e];
                if !p.orient(&points[q], &points[e]) {
                    break;
                }
                let t = mesh.add_triangle(q, i, e, EMPTY, hull.tri[e], hull.tri[q]);
                mesh.legalize(t + 2, points, &mut hull);
                hull.tri[q] = t;
                hull.next[e] = EMPTY;
                e = q;
            }
        }

        hull.prev[i] = e;
        hull.next[i] = n;
        hull.prev[n] = i;
        hull.next[e] = i;
        hull.start = e;

        hull.hash_edge(p, i);
        hull.hash_edge(&points[e], e);
    }

    let mut e = hull.start;
    loop {
        mesh.hull.push(e);
        e = hull.next[e];
        if e == hull.start {
            break;
        }
    }

    Some(mesh)
}
