//! Binary STL export

use std::io::Write;
use std::path::Path;

use glam::Vec3;

use super::normals::calculate_triangle_normal;

/// Write indexed triangles as binary STL
pub fn write_stl<W: Write>(
    writer: &mut W,
    vertices: &[Vec3],
    indices: &[u32],
) -> Result<(), StlError> {
    let triangles: Vec<stl_io::Triangle> = indices
        .chunks_exact(3)
        .map(|t| {
            let (v0, v1, v2) = (
                vertices[t[0] as usize],
                vertices[t[1] as usize],
                vertices[t[2] as usize],
            );
            stl_io::Triangle {
                normal: stl_io::Normal::new(calculate_triangle_normal(v0, v1, v2).to_array()),
                vertices: [
                    stl_io::Vertex::new(v0.to_array()),
                    stl_io::Vertex::new(v1.to_array()),
                    stl_io::Vertex::new(v2.to_array()),
                ],
            }
        })
        .collect();

    stl_io::write_stl(writer, triangles.iter()).map_err(|e| StlError::Write(e.to_string()))
}

/// Save indexed triangles as a binary STL file
pub fn save_stl(
    path: impl AsRef<Path>,
    vertices: &[Vec3],
    indices: &[u32],
) -> Result<(), StlError> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path).map_err(|e| StlError::Io(e.to_string()))?;
    write_stl(&mut file, vertices, indices)?;
    tracing::debug!(path = %path.display(), triangles = indices.len() / 3, "Saved STL");
    Ok(())
}

/// STL-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum StlError {
    /// Creating the output file failed
    #[error("IO error: {0}")]
    Io(String),
    /// Encoding the triangles failed
    #[error("Write error: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use super::*;
    use crate::primitive::{BoxDimensions, generate_box_mesh, generate_rounded_box_mesh};

    #[test]
    fn test_write_stl_to_memory() {
        let mesh = generate_box_mesh(BoxDimensions::new(2, 1, 3).unwrap());
        let mut buffer = Vec::new();
        write_stl(&mut buffer, &mesh.vertices, &mesh.indices()).unwrap();

        // 80-byte header, u32 count, 50 bytes per triangle
        assert_eq!(buffer.len(), 84 + 50 * mesh.triangle_count());

        let read = stl_io::read_stl(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(read.faces.len(), mesh.triangle_count());
        assert_eq!(read.vertices.len(), mesh.vertex_count());
    }

    #[test]
    fn test_save_stl_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rounded.stl");
        let mesh = generate_rounded_box_mesh(BoxDimensions::cube(4).unwrap(), 1).unwrap();
        save_stl(&path, &mesh.vertices, &mesh.indices()).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let read = stl_io::read_stl(&mut BufReader::new(file)).unwrap();
        assert_eq!(read.faces.len(), mesh.triangle_count());
    }

    #[test]
    fn test_save_stl_bad_path() {
        let mesh = generate_box_mesh(BoxDimensions::cube(1).unwrap());
        let err = save_stl("/nonexistent-dir/out.stl", &mesh.vertices, &mesh.indices()).unwrap_err();
        assert!(matches!(err, StlError::Io(_)));
    }
}
