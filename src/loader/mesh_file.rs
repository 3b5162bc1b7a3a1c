//! `.face` indexed face meshes:
//!
//! ```text
//! # Surface vertices=<N> faces=<M>
//! <ignored line>
//! Vertex 0 <x> <y> <z>
//! ...
//! Face 0 <i> <j> <k>
//! ...
//! ```
//!
//! Vertex and face ids must count up from zero; face corners are listed
//! counter-clockwise seen from outside.

use std::path::Path;

use glam::Vec3;
use tracing::info;

use super::{parse_token, read_to_string};
use crate::error::{Error, Result};
use crate::geometry::{Face, Mesh};

const HEADER_PREFIX: &str = "# Surface";

/// Load a mesh file.
pub fn read_mesh_file<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading mesh from {:?}", path);

    let mesh = parse_mesh(&read_to_string(path)?, path)?;

    info!(
        "Loaded {} vertices, {} faces",
        mesh.vertices().len(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse mesh text. `path` is only used in error messages.
pub fn parse_mesh(content: &str, path: &Path) -> Result<Mesh> {
    let last_line = content.lines().count();
    let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line));

    let (vertex_count, face_count) = match lines.next() {
        Some((line_no, header)) => parse_header(path, line_no, header)?,
        None => return Err(Error::format(path, 1, "empty mesh file")),
    };

    // The second line carries nothing we need.
    lines.next();

    let mut records = lines.filter(|(_, line)| !line.trim().is_empty());

    // Each record needs its own line, so the line count bounds the allocation.
    let mut vertices = Vec::with_capacity(vertex_count.min(last_line));
    for id in 0..vertex_count {
        let (line_no, line) = records.next().ok_or_else(|| {
            Error::format(
                path,
                last_line,
                format!("file ends after {id} of {vertex_count} vertices"),
            )
        })?;
        let mut tokens = expect_record(path, line_no, line, "Vertex", id)?;
        let x = parse_token(path, line_no, tokens.next(), "x coordinate")?;
        let y = parse_token(path, line_no, tokens.next(), "y coordinate")?;
        let z = parse_token(path, line_no, tokens.next(), "z coordinate")?;
        vertices.push(Vec3::new(x, y, z));
    }

    let mut faces: Vec<Face> = Vec::with_capacity(face_count.min(last_line));
    for id in 0..face_count {
        let (line_no, line) = records.next().ok_or_else(|| {
            Error::format(
                path,
                last_line,
                format!("file ends after {id} of {face_count} faces"),
            )
        })?;
        let mut tokens = expect_record(path, line_no, line, "Face", id)?;
        let mut face = [0u32; 3];
        for corner in &mut face {
            let index: u32 = parse_token(path, line_no, tokens.next(), "vertex index")?;
            if index as usize >= vertex_count {
                return Err(Error::format(
                    path,
                    line_no,
                    format!("vertex index {index} out of range (mesh has {vertex_count})"),
                ));
            }
            *corner = index;
        }
        let [p, q, r] = face.map(|i| vertices[i as usize]);
        if (q - p).cross(r - p).try_normalize().is_none() {
            return Err(Error::format(path, line_no, format!("face {id} has zero area")));
        }
        faces.push(face);
    }

    Mesh::new(vertices, faces).map_err(|err| Error::format(path, 1, err.to_string()))
}

fn parse_header(path: &Path, line_no: usize, header: &str) -> Result<(usize, usize)> {
    let rest = header
        .trim()
        .strip_prefix(HEADER_PREFIX)
        .ok_or_else(|| Error::format(path, line_no, format!("expected `{HEADER_PREFIX}` header")))?;

    let mut vertices = None;
    let mut faces = None;
    for field in rest.split_whitespace() {
        if let Some(value) = field.strip_prefix("vertices=") {
            vertices = Some(parse_token(path, line_no, Some(value), "vertex count")?);
        } else if let Some(value) = field.strip_prefix("faces=") {
            faces = Some(parse_token(path, line_no, Some(value), "face count")?);
        }
    }

    match (vertices, faces) {
        (Some(v), Some(f)) => Ok((v, f)),
        _ => Err(Error::format(
            path,
            line_no,
            "header must declare `vertices=` and `faces=`",
        )),
    }
}

/// Check the record keyword and its running id; returns the remaining tokens.
fn expect_record<'a>(
    path: &Path,
    line_no: usize,
    line: &'a str,
    keyword: &str,
    id: usize,
) -> Result<std::str::SplitWhitespace<'a>> {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some(word) if word == keyword => {}
        Some(word) => {
            return Err(Error::format(
                path,
                line_no,
                format!("expected `{keyword}`, found `{word}`"),
            ))
        }
        None => return Err(Error::format(path, line_no, format!("expected `{keyword}`"))),
    }
    let found: usize = parse_token(path, line_no, tokens.next(), "id")?;
    if found != id {
        return Err(Error::format(
            path,
            line_no,
            format!("{keyword} id {found} out of sequence, expected {id}"),
        ));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: &str = "\
# Surface vertices=4 faces=4
# generated
Vertex 0 0 0 0
Vertex 1 1 0 0
Vertex 2 0 1 0
Vertex 3 0 0 1
Face 0 0 2 1
Face 1 0 1 3
Face 2 0 3 2
Face 3 1 2 3
";

    fn parse(content: &str) -> Result<Mesh> {
        parse_mesh(content, Path::new("test.face"))
    }

    #[test]
    fn test_parse_tetrahedron() {
        let mesh = parse(TETRAHEDRON).unwrap();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.faces()[3], [1, 2, 3]);
        assert!((mesh.normals()[0] + Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_vertex_id_mismatch() {
        let content = TETRAHEDRON.replace("Vertex 2 0 1 0", "Vertex 7 0 1 0");
        match parse(&content).unwrap_err() {
            Error::FileFormat { line, message, .. } => {
                assert_eq!(line, 5);
                assert!(message.contains("out of sequence"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_face_id_mismatch() {
        let content = TETRAHEDRON.replace("Face 1 0 1 3", "Face 0 0 1 3");
        assert!(matches!(parse(&content), Err(Error::FileFormat { line: 8, .. })));
    }

    #[test]
    fn test_wrong_keyword() {
        let content = TETRAHEDRON.replace("Face 3 1 2 3", "Facet 3 1 2 3");
        assert!(matches!(parse(&content), Err(Error::FileFormat { line: 10, .. })));
    }

    #[test]
    fn test_face_index_out_of_range() {
        let content = TETRAHEDRON.replace("Face 3 1 2 3", "Face 3 1 2 4");
        assert!(matches!(parse(&content), Err(Error::FileFormat { line: 10, .. })));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            parse("# Volume vertices=4 faces=4\n"),
            Err(Error::FileFormat { line: 1, .. })
        ));
        assert!(matches!(
            parse("# Surface vertices=4\n"),
            Err(Error::FileFormat { line: 1, .. })
        ));
    }

    #[test]
    fn test_degenerate_face_is_format_error() {
        let content = TETRAHEDRON.replace("Vertex 2 0 1 0", "Vertex 2 2 0 0");
        let err = parse(&content).unwrap_err();
        assert!(!err.is_tick_local());
        match err {
            Error::FileFormat { line, message, .. } => {
                assert_eq!(line, 7);
                assert!(message.contains("zero area"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_oversized_counts_rejected() {
        let huge = format!("# Surface vertices={} faces=0\n#\n", usize::MAX);
        assert!(matches!(parse(&huge), Err(Error::FileFormat { line: 2, .. })));

        let huge_faces = TETRAHEDRON.replace("faces=4", &format!("faces={}", usize::MAX));
        assert!(matches!(parse(&huge_faces), Err(Error::FileFormat { line: 10, .. })));
    }

    #[test]
    fn test_truncated_file() {
        let truncated: String = TETRAHEDRON.lines().take(8).collect::<Vec<_>>().join("\n");
        assert!(matches!(parse(&truncated), Err(Error::FileFormat { .. })));
    }
}
