//! STL (Stereolithography) export and import of facet soups.
//!
//! Scaffold meshes carry an explicit normal per facet, so both writers emit
//! the stored normal rather than recomputing it from the winding.
//!
//! # Format Detection
//!
//! The loader treats a file as binary when its length is exactly
//! `84 + 50 × n` for the facet count `n` stored after the 80-byte header,
//! and as ASCII otherwise if it starts with `solid`. Binary files whose header
//! happens to begin with `solid` are therefore still read correctly.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (0)
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use scaffold_types::{Facet, TriangleMesh};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Solid name used by [`save_stl`].
pub const DEFAULT_SOLID_NAME: &str = "scaffold";

/// STL encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StlFormat {
    /// Human-readable text, six significant decimals in scientific notation.
    #[default]
    Ascii,
    /// Little-endian binary with `f32` coordinates.
    Binary,
}

/// Save a mesh to an STL file with the default solid name.
///
/// Coordinates are written in the mesh's own units; nothing is rescaled.
///
/// # Errors
///
/// Returns an error if the file cannot be written, or if a binary mesh has
/// more than `u32::MAX` facets.
///
/// # Example
///
/// ```no_run
/// use scaffold_io::{save_stl, StlFormat};
/// use scaffold_types::TriangleMesh;
///
/// let mesh = TriangleMesh::new();
/// save_stl(&mesh, "scaffold.stl", StlFormat::Ascii).unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &TriangleMesh, path: P, format: StlFormat) -> IoResult<()> {
    save_stl_named(mesh, path, format, DEFAULT_SOLID_NAME)
}

/// Save a mesh to an STL file with an explicit solid name.
///
/// The binary writer puts the name into the 80-byte header, truncated if
/// needed.
///
/// # Errors
///
/// Same as [`save_stl`].
pub fn save_stl_named<P: AsRef<Path>>(
    mesh: &TriangleMesh,
    path: P,
    format: StlFormat,
    solid_name: &str,
) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_stl(mesh, &mut writer, format, solid_name)?;
    writer.flush()?;
    info!(
        path = %path.display(),
        facets = mesh.len(),
        ?format,
        "Wrote STL"
    );
    Ok(())
}

/// Write a mesh as STL to any writer.
///
/// # Errors
///
/// Returns an error if writing fails, or if a binary mesh has more than
/// `u32::MAX` facets.
pub fn write_stl<W: Write>(
    mesh: &TriangleMesh,
    writer: W,
    format: StlFormat,
    solid_name: &str,
) -> IoResult<()> {
    match format {
        StlFormat::Ascii => write_stl_ascii(mesh, writer, solid_name),
        StlFormat::Binary => write_stl_binary(mesh, writer, solid_name),
    }
}

fn write_stl_ascii<W: Write>(mesh: &TriangleMesh, mut writer: W, solid_name: &str) -> IoResult<()> {
    writeln!(writer, "solid {solid_name}")?;

    for facet in mesh {
        let n = facet.normal;
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &facet.vertices {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {solid_name}")?;
    Ok(())
}

fn write_stl_binary<W: Write>(mesh: &TriangleMesh, mut writer: W, solid_name: &str) -> IoResult<()> {
    let face_count =
        u32::try_from(mesh.len()).map_err(|_| IoError::TooManyFacets { count: mesh.len() })?;

    // Never start the header with "solid"; some readers take that as ASCII
    let mut header = [b' '; HEADER_SIZE];
    let text = format!("binary STL {solid_name}");
    let len = text.len().min(HEADER_SIZE);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    writer.write_all(&header)?;
    writer.write_all(&face_count.to_le_bytes())?;

    for facet in mesh {
        write_vec3(&mut writer, facet.normal.x, facet.normal.y, facet.normal.z)?;
        for v in &facet.vertices {
            write_vec3(&mut writer, v.x, v.y, v.z)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write three f64 values as little-endian f32s.
fn write_vec3<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    // Truncation: STL stores f32
    #[allow(clippy::cast_possible_truncation)]
    {
        writer.write_all(&(x as f32).to_le_bytes())?;
        writer.write_all(&(y as f32).to_le_bytes())?;
        writer.write_all(&(z as f32).to_le_bytes())?;
    }
    Ok(())
}

/// Load an ASCII or binary STL file into a facet soup.
///
/// Stored normals are kept when they are non-zero; a zero normal is
/// recomputed from the winding.
///
/// # Errors
///
/// Returns an error if the file is missing or is not valid STL.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<TriangleMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| IoError::from_open(e, path))?;
    let mesh = parse_stl(&bytes)?;
    debug!(path = %path.display(), facets = mesh.len(), "Loaded STL");
    Ok(mesh)
}

/// Parse STL bytes, detecting the encoding.
///
/// # Errors
///
/// Returns an error if the content is neither valid binary nor ASCII STL.
pub fn parse_stl(bytes: &[u8]) -> IoResult<TriangleMesh> {
    if let Some(declared) = binary_face_count(bytes) {
        if HEADER_SIZE + 4 + declared as usize * TRIANGLE_SIZE == bytes.len() {
            return parse_stl_binary(bytes, declared);
        }
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(HEADER_SIZE)]);
    if head.trim_start().starts_with("solid") {
        return parse_stl_ascii(BufReader::new(bytes));
    }

    match binary_face_count(bytes) {
        Some(declared) => parse_stl_binary(bytes, declared),
        None => Err(IoError::invalid_content("file too small to be valid STL")),
    }
}

fn binary_face_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn parse_stl_binary(bytes: &[u8], declared: u32) -> IoResult<TriangleMesh> {
    let body = &bytes[HEADER_SIZE + 4..];
    let mut mesh = TriangleMesh::with_capacity((declared as usize).min(body.len() / TRIANGLE_SIZE));

    let mut chunks = body.chunks_exact(TRIANGLE_SIZE);
    for read in 0..declared {
        let Some(tri) = chunks.next() else {
            return Err(IoError::InvalidFaceCount {
                expected: declared,
                got: read,
            });
        };
        let normal = read_vec3(&tri[0..12]);
        let vertices = [
            Point3::from(read_vec3(&tri[12..24])),
            Point3::from(read_vec3(&tri[24..36])),
            Point3::from(read_vec3(&tri[36..48])),
        ];
        mesh.push(facet_from_parts(vertices, normal));
    }

    Ok(mesh)
}

/// Read three little-endian f32s.
fn read_vec3(buf: &[u8]) -> Vector3<f64> {
    let f = |i: usize| {
        f64::from(f32::from_le_bytes([
            buf[i],
            buf[i + 1],
            buf[i + 2],
            buf[i + 3],
        ]))
    };
    Vector3::new(f(0), f(4), f(8))
}

fn parse_stl_ascii<R: BufRead>(reader: R) -> IoResult<TriangleMesh> {
    let mut mesh = TriangleMesh::new();
    let mut normal: Vector3<f64> = Vector3::zeros();
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);
    let mut in_facet = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                corners.clear();
                normal = match parts.get(1..5) {
                    Some(["normal", x, y, z]) => {
                        Vector3::new(x.parse()?, y.parse()?, z.parse()?)
                    }
                    _ => Vector3::zeros(),
                };
            }
            "vertex" => {
                let [_, x, y, z] = parts[..] else {
                    return Err(IoError::invalid_content(format!(
                        "line {}: vertex needs three coordinates",
                        line_no + 1
                    )));
                };
                corners.push(Point3::new(x.parse()?, y.parse()?, z.parse()?));
            }
            "endfacet" => {
                if !in_facet {
                    return Err(IoError::invalid_content(format!(
                        "line {}: endfacet without facet",
                        line_no + 1
                    )));
                }
                let [a, b, c] = corners[..] else {
                    return Err(IoError::invalid_content(format!(
                        "line {}: facet has {} vertices, expected 3",
                        line_no + 1,
                        corners.len()
                    )));
                };
                mesh.push(facet_from_parts([a, b, c], normal));
                in_facet = false;
            }
            "endsolid" => break,
            // solid, outer loop, endloop
            _ => {}
        }
    }

    Ok(mesh)
}

fn facet_from_parts(vertices: [Point3<f64>; 3], normal: Vector3<f64>) -> Facet {
    if normal.norm_squared() > 0.0 {
        return Facet::with_normal(vertices, normal);
    }
    let [a, b, c] = vertices;
    Facet::from_vertices(a, b, c).unwrap_or_else(|| Facet::with_normal(vertices, normal))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_facets() -> TriangleMesh {
        [
            Facet::from_vertices(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(120.5, 0.0, 0.0),
                Point3::new(0.0, 80.25, 0.0),
            ),
            Facet::from_vertices(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 33.0),
                Point3::new(0.0, 80.25, 0.0),
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn assert_same(a: &TriangleMesh, b: &TriangleMesh, tol: f64) {
        assert_eq!(a.len(), b.len());
        for (fa, fb) in a.iter().zip(b.iter()) {
            for (va, vb) in fa.vertices.iter().zip(&fb.vertices) {
                assert_relative_eq!(*va, *vb, epsilon = tol);
            }
            assert_relative_eq!(fa.normal, fb.normal, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_ascii_roundtrip_in_memory() {
        let mesh = two_facets();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, StlFormat::Ascii, "graded").unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("solid graded\n"));
        assert!(text.trim_end().ends_with("endsolid graded"));
        assert_eq!(text.matches("endfacet").count(), 2);
        assert!(text.contains("vertex 1.205000e2 0.000000e0 0.000000e0"));

        let back = parse_stl(&buf).unwrap();
        assert_same(&mesh, &back, 1e-4);
    }

    #[test]
    fn test_binary_roundtrip_in_memory() {
        let mesh = two_facets();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, StlFormat::Binary, "graded").unwrap();
        assert_eq!(buf.len(), HEADER_SIZE + 4 + 2 * TRIANGLE_SIZE);
        assert!(!buf.starts_with(b"solid"));

        let back = parse_stl(&buf).unwrap();
        assert_same(&mesh, &back, 1e-4);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = two_facets();
        for (format, name) in [(StlFormat::Ascii, "a.stl"), (StlFormat::Binary, "b.stl")] {
            let path = dir.path().join(name);
            save_stl(&mesh, &path, format).unwrap();
            let back = load_stl(&path).unwrap();
            assert_same(&mesh, &back, 1e-4);
        }
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mesh = two_facets();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, StlFormat::Binary, "x").unwrap();
        buf[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&buf).unwrap().len(), 2);
    }

    #[test]
    fn test_truncated_binary() {
        let mesh = two_facets();
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf, StlFormat::Binary, "x").unwrap();
        buf.truncate(buf.len() - 10);
        assert!(matches!(
            parse_stl(&buf),
            Err(IoError::InvalidFaceCount {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_ascii_missing_normal_is_recomputed() {
        let text = b"solid t
  facet normal 0 0 0
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid t
";
        let mesh = parse_stl(text).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_relative_eq!(mesh.facets[0].normal.z, 1.0);
    }

    #[test]
    fn test_ascii_errors() {
        let two_vertices = b"solid t
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
    endloop
  endfacet
endsolid t
";
        assert!(matches!(
            parse_stl(two_vertices),
            Err(IoError::InvalidContent { .. })
        ));

        let bad_float = b"solid t\n facet normal 0 0 1\n outer loop\n vertex 0 zero 0\n";
        assert!(matches!(parse_stl(bad_float), Err(IoError::ParseFloat(_))));

        assert!(parse_stl(b"tiny").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = load_stl("definitely_missing_scaffold.stl");
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_empty_mesh() {
        let mut buf = Vec::new();
        write_stl(&TriangleMesh::new(), &mut buf, StlFormat::Ascii, "empty").unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "solid empty\nendsolid empty\n");
        assert!(parse_stl(&buf).unwrap().is_empty());
    }
}
