//! Incremental 3D convex hull.
//!
//! Voronoi cells are convex, so the hull of a cell's vertices is the cell
//! itself. The hull gives the cell's true faces for meshing and its exact
//! volume for porosity cross-checks.

use hashbrown::HashSet;
use nalgebra::{Point3, Vector3};
use scaffold_types::{Aabb, Facet};

use crate::error::{MeshError, MeshResult};

/// Plane and merge tolerance relative to the point cloud's bounding diagonal.
const HULL_TOLERANCE: f64 = 1e-10;

/// A hull face: three vertex indices wound counter-clockwise from outside.
#[derive(Debug, Clone, Copy)]
struct HullFace {
    v: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
}

impl HullFace {
    fn new(v: [usize; 3], points: &[Point3<f64>], interior: &Point3<f64>) -> Self {
        let [a, b, c] = v.map(|i| points[i]);
        let mut v = v;
        let mut normal = (b - a).cross(&(c - a));
        let len = normal.norm();
        if len > 0.0 {
            normal /= len;
        }
        if normal.dot(&(interior - a)) > 0.0 {
            v.swap(1, 2);
            normal = -normal;
        }
        Self {
            v,
            normal,
            offset: normal.dot(&a.coords),
        }
    }

    fn distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.v;
        [(a, b), (b, c), (c, a)]
    }
}

/// Convex hull of a point set, as a closed triangle surface.
///
/// # Example
///
/// ```
/// use scaffold_mesh::ConvexHull;
/// use scaffold_types::Point3;
///
/// let mut corners = Vec::new();
/// for x in [0.0, 2.0] {
///     for y in [0.0, 2.0] {
///         for z in [0.0, 2.0] {
///             corners.push(Point3::new(x, y, z));
///         }
///     }
/// }
/// corners.push(Point3::new(1.0, 1.0, 1.0)); // interior, ignored
///
/// let hull = ConvexHull::new(&corners).unwrap();
/// assert_eq!(hull.face_count(), 12);
/// assert!((hull.volume() - 8.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ConvexHull {
    points: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    interior: Point3<f64>,
}

impl ConvexHull {
    /// Build the hull of `points`.
    ///
    /// Points closer than a small relative tolerance are merged first.
    ///
    /// # Errors
    ///
    /// - [`MeshError::TooFewVertices`] with fewer than four distinct points.
    /// - [`MeshError::DegenerateHull`] when the points are collinear or coplanar.
    pub fn new(points: &[Point3<f64>]) -> MeshResult<Self> {
        let eps = HULL_TOLERANCE * Aabb::from_points(points.iter()).diagonal();

        let mut distinct: Vec<Point3<f64>> = Vec::with_capacity(points.len());
        for p in points {
            if !distinct.iter().any(|q| (q - p).norm() <= eps) {
                distinct.push(*p);
            }
        }
        if distinct.len() < 4 {
            return Err(MeshError::TooFewVertices {
                count: distinct.len(),
            });
        }

        let simplex = initial_simplex(&distinct, eps)?;
        let interior = Point3::from(
            simplex
                .iter()
                .fold(Vector3::zeros(), |acc, &i| acc + distinct[i].coords)
                / 4.0,
        );

        let [i0, i1, i2, i3] = simplex;
        let mut faces: Vec<HullFace> = [[i0, i1, i2], [i0, i3, i1], [i1, i3, i2], [i2, i3, i0]]
            .into_iter()
            .map(|v| HullFace::new(v, &distinct, &interior))
            .collect();

        for (p_index, p) in distinct.iter().enumerate() {
            if simplex.contains(&p_index) {
                continue;
            }
            let visible: Vec<usize> = faces
                .iter()
                .enumerate()
                .filter(|(_, f)| f.distance(p) > eps)
                .map(|(i, _)| i)
                .collect();
            if visible.is_empty() {
                continue;
            }

            let visible_edges: HashSet<(usize, usize)> = visible
                .iter()
                .flat_map(|&i| faces[i].edges())
                .collect();
            // Walk the visible faces in index order so the new faces come
            // out the same way every time; the set is only for lookups.
            let horizon: Vec<(usize, usize)> = visible
                .iter()
                .flat_map(|&i| faces[i].edges())
                .filter(|&(a, b)| !visible_edges.contains(&(b, a)))
                .collect();

            let mut keep = vec![true; faces.len()];
            for &i in &visible {
                keep[i] = false;
            }
            let mut flags = keep.into_iter();
            faces.retain(|_| flags.next().unwrap_or(true));

            faces.extend(
                horizon
                    .into_iter()
                    .map(|(a, b)| HullFace::new([a, b, p_index], &distinct, &interior)),
            );
        }

        Ok(Self {
            points: distinct,
            faces: faces.into_iter().map(|f| f.v).collect(),
            interior,
        })
    }

    /// The distinct input points (hull and interior alike).
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Triangles as indices into [`ConvexHull::points`], wound outward.
    #[must_use]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Number of triangular faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Enclosed volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let c = self.interior;
        self.faces
            .iter()
            .map(|&[a, b, d]| {
                let (a, b, d) = (self.points[a], self.points[b], self.points[d]);
                (a - c).dot(&(b - c).cross(&(d - c)))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Total face area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|&[a, b, d]| {
                let (a, b, d) = (self.points[a], self.points[b], self.points[d]);
                (b - a).cross(&(d - a)).norm() * 0.5
            })
            .sum()
    }

    /// Faces as [`Facet`]s with outward normals. Degenerate faces yield `None`.
    pub fn facets(&self) -> impl Iterator<Item = Option<Facet>> + '_ {
        self.faces
            .iter()
            .map(|&[a, b, d]| Facet::from_vertices(self.points[a], self.points[b], self.points[d]))
    }
}

/// Four indices spanning a tetrahedron of non-trivial volume.
fn initial_simplex(points: &[Point3<f64>], eps: f64) -> MeshResult<[usize; 4]> {
    let (i0, _) = argmax(points, |p| -p.x);
    let a = points[i0];

    let (i1, spread) = argmax(points, |p| (p - a).norm());
    if spread <= eps {
        return Err(MeshError::DegenerateHull("all points coincide".to_string()));
    }
    let axis = (points[i1] - a) / spread;

    let (i2, off_line) = argmax(points, |p| (p - a).cross(&axis).norm());
    if off_line <= eps {
        return Err(MeshError::DegenerateHull("points are collinear".to_string()));
    }
    let normal = (points[i1] - a).cross(&(points[i2] - a)).normalize();

    let (i3, off_plane) = argmax(points, |p| normal.dot(&(p - a)).abs());
    if off_plane <= eps {
        return Err(MeshError::DegenerateHull("points are coplanar".to_string()));
    }

    Ok([i0, i1, i2, i3])
}

fn argmax(points: &[Point3<f64>], score: impl Fn(&Point3<f64>) -> f64) -> (usize, f64) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, score(p)))
        .max_by(|x, y| x.1.total_cmp(&y.1))
        .unwrap_or((0, 0.0))
}
