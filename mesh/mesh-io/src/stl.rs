//! Binary STL (Stereolithography) support.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use mesh_types::{Point3, Triangle, TriangleMesh, Vector3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
pub const TRIANGLE_SIZE: usize = 50;

/// Upper bound on triangles reserved up front from a file's header count.
const MAX_PREALLOCATED_TRIANGLES: usize = 1 << 20;

/// Text placed at the start of every header this crate writes.
pub const STL_HEADER_TEXT: &[u8] = b"relief-studio binary STL";

/// Contents of a binary STL file.
#[derive(Debug, Clone)]
pub struct LoadedStl {
    /// The raw 80-byte header.
    pub header: [u8; HEADER_SIZE],
    /// Stored facet normals, one per triangle, as written.
    pub normals: Vec<Vector3<f32>>,
    /// Triangles in file order.
    pub mesh: TriangleMesh,
}

/// Exact size in bytes of a binary STL holding `triangle_count` triangles.
///
/// # Example
///
/// ```
/// assert_eq!(mesh_io::stl_file_size(1), 134);
/// ```
#[must_use]
pub const fn stl_file_size(triangle_count: usize) -> usize {
    HEADER_SIZE + 4 + TRIANGLE_SIZE * triangle_count
}

/// Save a mesh as binary STL.
///
/// The file is written to a temporary sibling and renamed into place, so an
/// existing file at `path` is either fully replaced or left untouched.
///
/// # Errors
///
/// Returns [`IoError::Write`] if the destination cannot be created or
/// written, and [`IoError::TooManyTriangles`] if the count does not fit in
/// the 32-bit header field.
pub fn save_stl<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let staging = staging_path(path);

    let written = File::create(&staging)
        .map_err(IoError::Io)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_stl(mesh, &mut writer)?;
            writer.flush()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&staging, path).map_err(IoError::Io));

    if let Err(err) = written {
        let _ = fs::remove_file(&staging);
        return Err(match err {
            IoError::Io(source) => IoError::Write {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        });
    }

    debug!(path = %path.display(), triangles = mesh.len(), "wrote binary STL");
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("mesh"), OsString::from);
    name.push(".partial");
    path.with_file_name(name)
}

/// Write a mesh as binary STL to any writer.
///
/// Triangle order and vertex winding are preserved exactly.
///
/// # Errors
///
/// Returns an error if the writer fails or the mesh has more than
/// `u32::MAX` triangles.
pub fn write_stl<W: Write>(mesh: &TriangleMesh, mut writer: W) -> IoResult<()> {
    let face_count =
        u32::try_from(mesh.len()).map_err(|_| IoError::TooManyTriangles(mesh.len()))?;

    // Write 80-byte header (padded with spaces)
    let mut header = [b' '; HEADER_SIZE];
    header[..STL_HEADER_TEXT.len()].copy_from_slice(STL_HEADER_TEXT);
    writer.write_all(&header)?;

    writer.write_all(&face_count.to_le_bytes())?;

    let mut record = [0u8; TRIANGLE_SIZE];
    for tri in mesh {
        encode_triangle(tri, &mut record);
        writer.write_all(&record)?;
    }

    Ok(())
}

/// Encode one triangle into its 50-byte record.
#[allow(clippy::cast_possible_truncation)]
// Truncation: f64 to f32 is intentional for STL format which uses f32
fn encode_triangle(tri: &Triangle, record: &mut [u8; TRIANGLE_SIZE]) {
    let n = tri.facet_normal();
    let values = [
        n.x, n.y, n.z, tri.v0.x, tri.v0.y, tri.v0.z, tri.v1.x, tri.v1.y, tri.v1.z, tri.v2.x,
        tri.v2.y, tri.v2.z,
    ];
    for (chunk, value) in record[..48].chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&(value as f32).to_le_bytes());
    }
    record[48..].copy_from_slice(&0u16.to_le_bytes());
}

/// Load a binary STL file.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is
/// truncated.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<LoadedStl> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    read_stl(BufReader::new(file))
}

/// Read a binary STL from any reader.
///
/// # Errors
///
/// Returns [`IoError::InvalidHeader`] if the stream ends inside the header
/// and [`IoError::InvalidFaceCount`] if it ends before all announced
/// triangles were read.
pub fn read_stl<R: Read>(mut reader: R) -> IoResult<LoadedStl> {
    let mut preamble = [0u8; HEADER_SIZE + 4];
    let got = read_fully(&mut reader, &mut preamble)?;
    if got < preamble.len() {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got,
        });
    }

    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(&preamble[..HEADER_SIZE]);
    let face_count = u32::from_le_bytes([
        preamble[HEADER_SIZE],
        preamble[HEADER_SIZE + 1],
        preamble[HEADER_SIZE + 2],
        preamble[HEADER_SIZE + 3],
    ]);

    // The count is untrusted; larger meshes grow as records arrive.
    let reserve = (face_count as usize).min(MAX_PREALLOCATED_TRIANGLES);
    let mut normals = Vec::with_capacity(reserve);
    let mut mesh = TriangleMesh::with_capacity(reserve);
    let mut record = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        if read_fully(&mut reader, &mut record)? < TRIANGLE_SIZE {
            return Err(IoError::InvalidFaceCount {
                expected: face_count,
                got: i,
            });
        }
        normals.push(read_f32_triple(&record[0..12]));
        mesh.push(Triangle::new(
            read_point(&record[12..24]),
            read_point(&record[24..36]),
            read_point(&record[36..48]),
        ));
    }

    Ok(LoadedStl {
        header,
        normals,
        mesh,
    })
}

/// Fill `buf` as far as the stream allows, returning the byte count.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> IoResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

fn read_f32_triple(buf: &[u8]) -> Vector3<f32> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vector3::new(x, y, z)
}

fn read_point(buf: &[u8]) -> Point3<f64> {
    let v = read_f32_triple(buf);
    Point3::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_triangle() -> TriangleMesh {
        TriangleMesh::from_triangles(vec![Triangle::from_arrays(
            [1.5, 2.25, 0.8],
            [10.0, 2.25, 0.8],
            [1.5, 7.125, 3.2],
        )])
    }

    #[test]
    fn single_triangle_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.stl");
        let mesh = single_triangle();
        save_stl(&mesh, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 134);
        assert_eq!(&bytes[..STL_HEADER_TEXT.len()], STL_HEADER_TEXT);
        assert!(bytes[STL_HEADER_TEXT.len()..HEADER_SIZE].iter().all(|&b| b == b' '));
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 1);
        assert_eq!(&bytes[132..134], &[0, 0]);

        let loaded = load_stl(&path).unwrap();
        let expected = mesh.triangles[0];
        let got = loaded.mesh.triangles[0];
        for (a, b) in expected.vertices().iter().zip(got.vertices().iter()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
            assert_relative_eq!(a.z, b.z, epsilon = 1e-6);
        }
        let n = expected.facet_normal();
        let stored = loaded.normals[0];
        assert_relative_eq!(f64::from(stored.x), n.x, epsilon = 1e-6);
        assert_relative_eq!(f64::from(stored.y), n.y, epsilon = 1e-6);
        assert_relative_eq!(f64::from(stored.z), n.z, epsilon = 1e-6);
        assert!(!dir.path().join("one.stl.partial").exists());
    }

    #[test]
    fn preserves_triangle_order() {
        let tris: Vec<Triangle> = (0..5)
            .map(|i| {
                let x = f64::from(i);
                Triangle::from_arrays([x, 0.0, 0.0], [x + 1.0, 0.0, 0.0], [x, 1.0, 0.0])
            })
            .collect();
        let mesh = TriangleMesh::from_triangles(tris);

        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf).unwrap();
        assert_eq!(buf.len(), stl_file_size(5));

        let loaded = read_stl(buf.as_slice()).unwrap();
        let xs: Vec<f64> = loaded.mesh.iter().map(|t| t.v0.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn degenerate_triangle_writes_fallback_normal() {
        let mesh = TriangleMesh::from_triangles(vec![Triangle::from_arrays(
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [2.0, 0.0, 1.0],
        )]);
        let mut buf = Vec::new();
        write_stl(&mesh, &mut buf).unwrap();
        let loaded = read_stl(buf.as_slice()).unwrap();
        assert_eq!(loaded.normals[0], Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let mut buf = Vec::new();
        write_stl(&single_triangle(), &mut buf).unwrap();

        let short = &buf[..100];
        match read_stl(short) {
            Err(IoError::InvalidFaceCount { expected, got }) => {
                assert_eq!(expected, 1);
                assert_eq!(got, 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(matches!(
            read_stl(&buf[..40]),
            Err(IoError::InvalidHeader { got: 40, .. })
        ));
    }

    #[test]
    fn oversized_count_with_short_body_is_rejected() {
        let mut buf = vec![b' '; HEADER_SIZE];
        buf.extend_from_slice(&u32::MAX.to_le_bytes());
        match read_stl(buf.as_slice()) {
            Err(IoError::InvalidFaceCount { expected, got }) => {
                assert_eq!(expected, u32::MAX);
                assert_eq!(got, 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let mut one = Vec::new();
        write_stl(&single_triangle(), &mut one).unwrap();
        one[80..84].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            read_stl(one.as_slice()),
            Err(IoError::InvalidFaceCount { got: 1, .. })
        ));
    }

    #[test]
    fn unwritable_destination_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.stl");
        let err = save_stl(&single_triangle(), &path).unwrap_err();
        assert!(matches!(err, IoError::Write { .. }));
    }

    #[test]
    fn load_nonexistent_file() {
        let result = load_stl("nonexistent_file_12345.stl");
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }
}
