//! Voronoi cells by half-space clipping.
//!
//! Each cell starts as a large box around all seeds and is cut by the
//! bisector plane of every neighbour that can still reach it. Neighbours
//! come from a KD-tree in order of distance; the search stops once the next
//! neighbour is more than twice the current cell radius away, since its
//! bisector can no longer touch the cell.

// Indices round-trip through u64 KD-tree items and i64 region entries
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

use hashbrown::{HashMap, HashSet};
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::{Point3, Vector3};
use scaffold_types::Aabb;
use tracing::debug;

use crate::backend::{RawTessellation, VoronoiBackend, UNBOUNDED_INDEX};
use crate::error::{VoronoiError, VoronoiResult};
use crate::params::ClipParams;

/// Multiple of the plane tolerance used when merging vertices inside a cell.
const CELL_MERGE_FACTOR: f64 = 10.0;

/// Multiple of the plane tolerance used as the global vertex quantum.
const GLOBAL_QUANTUM_FACTOR: f64 = 100.0;

/// Built-in Voronoi backend using half-space clipping and a `kiddo` KD-tree.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use scaffold_voronoi::{ClippingVoronoi, VoronoiBackend};
///
/// // A point inside a tetrahedron has a bounded cell
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(4.0, 0.0, 0.0),
///     Point3::new(0.0, 4.0, 0.0),
///     Point3::new(0.0, 0.0, 4.0),
///     Point3::new(0.8, 0.9, 1.0),
/// ];
/// let raw = ClippingVoronoi::default().compute(&points).unwrap();
/// assert!(!raw.regions[4].contains(&-1));
/// assert!(raw.regions[0].contains(&-1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClippingVoronoi {
    params: ClipParams,
}

impl ClippingVoronoi {
    /// Create a backend with the given parameters.
    #[must_use]
    pub const fn new(params: ClipParams) -> Self {
        Self { params }
    }

    /// The backend parameters.
    #[must_use]
    pub const fn params(&self) -> &ClipParams {
        &self.params
    }

    /// Clip the far box down to the Voronoi cell of `points[site]`.
    fn build_cell(
        &self,
        site: usize,
        points: &[Point3<f64>],
        tree: &KdTree<f64, 3>,
        far: &Aabb,
        eps: f64,
    ) -> ConvexCell {
        let seed = points[site];
        let query = [seed.x, seed.y, seed.z];
        let mut cell = ConvexCell::from_box(far);
        let mut radius_sq = cell.radius_sq(&seed);
        let mut clipped: HashSet<usize> = HashSet::new();
        let mut k = self.params.initial_neighbors.clamp(1, points.len());

        loop {
            let mut neighbors = tree.nearest_n::<SquaredEuclidean>(&query, k);
            neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));

            let mut secured = false;
            for neighbor in &neighbors {
                let other = neighbor.item as usize;
                if other == site || clipped.contains(&other) {
                    continue;
                }
                if neighbor.distance > 4.0 * radius_sq {
                    secured = true;
                    break;
                }
                clipped.insert(other);

                let delta = points[other] - seed;
                let normal = delta / delta.norm();
                let offset = normal.dot(&nalgebra::center(&seed, &points[other]).coords);
                if cell.clip(&normal, offset, FaceSource::Neighbor(other), eps) {
                    radius_sq = cell.radius_sq(&seed);
                }
            }

            if secured || k >= points.len() {
                break;
            }
            k = (k * 2).min(points.len());
        }

        cell
    }
}

impl VoronoiBackend for ClippingVoronoi {
    fn name(&self) -> &'static str {
        "clipping"
    }

    fn compute(&self, points: &[Point3<f64>]) -> VoronoiResult<RawTessellation> {
        if points.is_empty() {
            return Ok(RawTessellation::default());
        }

        let (unique, owner) = dedup_points(points);
        let seed_bounds = Aabb::from_points(unique.iter());
        let extent = seed_bounds.max_extent();
        if !extent.is_finite() || extent <= 0.0 {
            return Err(VoronoiError::Backend {
                backend: self.name(),
                message: format!("seeds span no volume (extent {extent})"),
            });
        }

        let far = seed_bounds.inflated(self.params.far_factor * extent);
        let eps = self.params.relative_tolerance * far.diagonal();
        let tree = build_tree(&unique);
        let mut merger = VertexMerger::new(eps * GLOBAL_QUANTUM_FACTOR);

        let mut unique_regions = Vec::with_capacity(unique.len());
        let mut unbounded_count = 0usize;
        for site in 0..unique.len() {
            let cell = self.build_cell(site, &unique, &tree, &far, eps);
            let unbounded = cell.touches_bound();

            let mut region: Vec<i64> = cell
                .vertices(eps * CELL_MERGE_FACTOR)
                .into_iter()
                .filter(|v| !(unbounded && far.on_boundary(v, eps)))
                .map(|v| merger.insert(v) as i64)
                .collect();
            if unbounded {
                unbounded_count += 1;
                region.push(UNBOUNDED_INDEX);
            }
            unique_regions.push(region);
        }

        let regions = owner
            .iter()
            .map(|slot| slot.map_or_else(Vec::new, |u| unique_regions[u].clone()))
            .collect();

        debug!(
            points = points.len(),
            unique = unique.len(),
            unbounded = unbounded_count,
            vertices = merger.vertices.len(),
            "Clipped Voronoi cells"
        );

        Ok(RawTessellation {
            vertices: merger.vertices,
            regions,
        })
    }
}

/// Which plane produced a cell face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaceSource {
    /// A side of the far box.
    Bound,
    /// The bisector with another seed.
    Neighbor(usize),
}

#[derive(Debug, Clone)]
struct Face {
    source: FaceSource,
    polygon: Vec<Point3<f64>>,
}

/// A convex polyhedron stored as a list of planar polygons.
#[derive(Debug, Clone)]
struct ConvexCell {
    faces: Vec<Face>,
}

impl ConvexCell {
    fn from_box(bounds: &Aabb) -> Self {
        let (lo, hi) = (bounds.min, bounds.max);
        let corner = |x: bool, y: bool, z: bool| {
            Point3::new(
                if x { hi.x } else { lo.x },
                if y { hi.y } else { lo.y },
                if z { hi.z } else { lo.z },
            )
        };
        let loops = [
            [(false, false, false), (false, false, true), (false, true, true), (false, true, false)],
            [(true, false, false), (true, true, false), (true, true, true), (true, false, true)],
            [(false, false, false), (true, false, false), (true, false, true), (false, false, true)],
            [(false, true, false), (false, true, true), (true, true, true), (true, true, false)],
            [(false, false, false), (false, true, false), (true, true, false), (true, false, false)],
            [(false, false, true), (true, false, true), (true, true, true), (false, true, true)],
        ];
        let faces = loops
            .iter()
            .map(|quad| Face {
                source: FaceSource::Bound,
                polygon: quad.iter().map(|&(x, y, z)| corner(x, y, z)).collect(),
            })
            .collect();
        Self { faces }
    }

    fn touches_bound(&self) -> bool {
        self.faces.iter().any(|f| f.source == FaceSource::Bound)
    }

    fn radius_sq(&self, seed: &Point3<f64>) -> f64 {
        self.faces
            .iter()
            .flat_map(|f| f.polygon.iter())
            .map(|p| (p - seed).norm_squared())
            .fold(0.0, f64::max)
    }

    /// Keep the half-space `normal · p <= offset`. Returns false if nothing was cut.
    fn clip(&mut self, normal: &Vector3<f64>, offset: f64, source: FaceSource, eps: f64) -> bool {
        let signed = |p: &Point3<f64>| normal.dot(&p.coords) - offset;

        let max_d = self
            .faces
            .iter()
            .flat_map(|f| f.polygon.iter())
            .map(signed)
            .fold(f64::NEG_INFINITY, f64::max);
        if max_d <= eps {
            return false;
        }

        let mut faces = Vec::with_capacity(self.faces.len() + 1);
        let mut cap_points = Vec::new();
        for face in self.faces.drain(..) {
            let polygon = clip_polygon(&face.polygon, &signed, eps);
            cap_points.extend(polygon.iter().filter(|p| signed(*p).abs() <= eps).copied());
            if polygon.len() >= 3 {
                faces.push(Face {
                    source: face.source,
                    polygon,
                });
            }
        }

        let cap = order_around(cap_points, normal, eps * CELL_MERGE_FACTOR);
        if cap.len() >= 3 {
            faces.push(Face {
                source,
                polygon: cap,
            });
        }
        self.faces = faces;
        true
    }

    /// Distinct vertices in face traversal order.
    fn vertices(&self, tolerance: f64) -> Vec<Point3<f64>> {
        let mut out = Vec::new();
        for p in self.faces.iter().flat_map(|f| f.polygon.iter()) {
            push_distinct(&mut out, *p, tolerance);
        }
        out
    }
}

/// One Sutherland-Hodgman pass over a planar polygon.
fn clip_polygon(
    polygon: &[Point3<f64>],
    signed: &impl Fn(&Point3<f64>) -> f64,
    eps: f64,
) -> Vec<Point3<f64>> {
    let n = polygon.len();
    let mut out: Vec<Point3<f64>> = Vec::with_capacity(n + 2);
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let (da, db) = (signed(&a), signed(&b));
        let (a_in, b_in) = (da <= eps, db <= eps);

        if a_in {
            out.push(a);
        }
        // Only cross when the endpoints are strictly on opposite sides;
        // an endpoint on the plane is already emitted as a vertex.
        let crosses = (a_in && da < -eps && !b_in) || (!a_in && b_in && db < -eps);
        if crosses {
            let t = da / (da - db);
            out.push(a + (b - a) * t);
        }
    }
    out.dedup_by(|p, q| (*p - *q).norm_squared() <= eps * eps);
    if out.len() > 1 && (out[0] - out[out.len() - 1]).norm_squared() <= eps * eps {
        out.pop();
    }
    out
}

/// Deduplicate planar points and order them counter-clockwise around `normal`.
fn order_around(
    points: Vec<Point3<f64>>,
    normal: &Vector3<f64>,
    tolerance: f64,
) -> Vec<Point3<f64>> {
    let mut distinct = Vec::with_capacity(points.len());
    for p in points {
        push_distinct(&mut distinct, p, tolerance);
    }
    if distinct.len() < 3 {
        return distinct;
    }

    let centroid = distinct
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / distinct.len() as f64;

    let u = normal.cross(&least_aligned_axis(normal)).normalize();
    let v = normal.cross(&u);

    let mut keyed: Vec<(f64, Point3<f64>)> = distinct
        .into_iter()
        .map(|p| {
            let d = p.coords - centroid;
            (d.dot(&v).atan2(d.dot(&u)), p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// The coordinate axis most perpendicular to `n`.
fn least_aligned_axis(n: &Vector3<f64>) -> Vector3<f64> {
    let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
    if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    }
}

fn push_distinct(out: &mut Vec<Point3<f64>>, p: Point3<f64>, tolerance: f64) {
    let tol_sq = tolerance * tolerance;
    if !out.iter().any(|q| (q - p).norm_squared() <= tol_sq) {
        out.push(p);
    }
}

/// Collapse exactly coincident points.
///
/// Returns the distinct points and, per input point, the index of its
/// distinct copy (`None` for later duplicates).
fn dedup_points(points: &[Point3<f64>]) -> (Vec<Point3<f64>>, Vec<Option<usize>>) {
    let mut seen: HashMap<[u64; 3], usize> = HashMap::with_capacity(points.len());
    let mut unique = Vec::with_capacity(points.len());
    let mut owner = Vec::with_capacity(points.len());

    for p in points {
        // Adding +0.0 folds -0.0 into +0.0 so both hash the same
        let key = [
            (p.x + 0.0).to_bits(),
            (p.y + 0.0).to_bits(),
            (p.z + 0.0).to_bits(),
        ];
        if seen.contains_key(&key) {
            owner.push(None);
        } else {
            seen.insert(key, unique.len());
            owner.push(Some(unique.len()));
            unique.push(*p);
        }
    }
    (unique, owner)
}

fn build_tree(points: &[Point3<f64>]) -> KdTree<f64, 3> {
    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (i, p) in points.iter().enumerate() {
        tree.add(&[p.x, p.y, p.z], i as u64);
    }
    tree
}

/// Shares vertices between cells through a quantized position key.
struct VertexMerger {
    quantum: f64,
    index: HashMap<[i64; 3], usize>,
    vertices: Vec<Point3<f64>>,
}

impl VertexMerger {
    fn new(quantum: f64) -> Self {
        Self {
            quantum,
            index: HashMap::new(),
            vertices: Vec::new(),
        }
    }

    fn insert(&mut self, p: Point3<f64>) -> usize {
        let key = [
            (p.x / self.quantum).round() as i64,
            (p.y / self.quantum).round() as i64,
            (p.z / self.quantum).round() as i64,
        ];
        *self.index.entry(key).or_insert_with(|| {
            self.vertices.push(p);
            self.vertices.len() - 1
        })
    }
}
