//! Planar polygon helpers on the map's (x, z) plane.

/// A map coordinate pair `(x, z)`.
pub type Vertex = (f64, f64);

/// Area of a simple polygon using the shoelace formula.
///
/// The ring is closed implicitly (last vertex wraps to the first) and the
/// winding order does not matter. Callers are expected to treat rings with
/// fewer than three vertices as zero-area instead of calling this.
pub fn polygon_area(vertices: &[Vertex]) -> f64 {
    let n = vertices.len();
    let mut twice = 0.0;
    for i in 0..n {
        let (xi, zi) = vertices[i];
        let (xj, zj) = vertices[(i + 1) % n];
        twice += xi * zj - xj * zi;
    }
    twice.abs() / 2.0
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vertex, b: Vertex) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}
