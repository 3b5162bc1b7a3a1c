//! `.dem` elevation grids: `rows cols` on the first line, then `rows * cols`
//! whitespace-separated elevations in row-major order, row 0 first.

use std::path::Path;

use tracing::info;

use super::{parse_token, read_to_string};
use crate::error::{Error, Result};
use crate::terrain::Heightfield;

/// Load a terrain file and triangulate it with the given horizontal scale.
pub fn read_terrain_file<P: AsRef<Path>>(path: P, scale: f32) -> Result<Heightfield> {
    let path = path.as_ref();
    info!("Loading terrain from {:?}", path);

    let field = parse_terrain(&read_to_string(path)?, path, scale)?;

    info!(
        "Loaded {}x{} terrain ({} triangles)",
        field.rows(),
        field.cols(),
        field.mesh().face_count()
    );
    Ok(field)
}

/// Parse terrain text. `path` is only used in error messages.
pub fn parse_terrain(content: &str, path: &Path, scale: f32) -> Result<Heightfield> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| Error::format(path, 1, "empty terrain file"))?;
    let mut dims = header.split_whitespace();
    let rows: usize = parse_token(path, header_line, dims.next(), "row count")?;
    let cols: usize = parse_token(path, header_line, dims.next(), "column count")?;
    if let Some(extra) = dims.next() {
        return Err(Error::format(
            path,
            header_line,
            format!("unexpected `{extra}` after grid size"),
        ));
    }
    if rows < 2 || cols < 2 {
        return Err(Error::format(
            path,
            header_line,
            format!("grid must be at least 2x2, got {rows}x{cols}"),
        ));
    }

    let expected = rows.checked_mul(cols).ok_or_else(|| {
        Error::format(path, header_line, format!("grid size {rows}x{cols} is too large"))
    })?;
    // Every sample takes at least two bytes of text.
    let mut samples = Vec::with_capacity(expected.min(content.len() / 2));
    let mut last_line = header_line;
    for (line_no, line) in lines {
        last_line = line_no;
        for token in line.split_whitespace() {
            if samples.len() == expected {
                return Err(Error::format(
                    path,
                    line_no,
                    format!("more than {expected} elevations for a {rows}x{cols} grid"),
                ));
            }
            samples.push(parse_token::<f32>(path, line_no, Some(token), "elevation")?);
        }
    }
    if samples.len() != expected {
        return Err(Error::format(
            path,
            last_line,
            format!(
                "expected {expected} elevations for a {rows}x{cols} grid, found {}",
                samples.len()
            ),
        ));
    }

    Heightfield::from_samples(rows, cols, samples, scale)
        .map_err(|err| Error::format(path, header_line, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Heightfield> {
        parse_terrain(content, Path::new("test.dem"), 3.0)
    }

    #[test]
    fn test_parse_grid() {
        let field = parse("3 2\n0 1\n2 3\n4.5 -1\n").unwrap();
        assert_eq!((field.rows(), field.cols()), (3, 2));
        assert_eq!(field.elevation(0, 1), 1.0);
        assert_eq!(field.elevation(2, 0), 4.5);
        assert_eq!(field.scale(), 3.0);
    }

    #[test]
    fn test_tokens_may_span_lines() {
        let field = parse("2 2\n0 1 2\n\n3\n").unwrap();
        assert_eq!(field.elevation(1, 1), 3.0);
    }

    #[test]
    fn test_short_grid_reports_count() {
        let err = parse("2 2\n0 1 2\n").unwrap_err();
        match err {
            Error::FileFormat { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("found 3"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_long_grid_rejected() {
        assert!(matches!(
            parse("2 2\n0 1 2 3\n4\n"),
            Err(Error::FileFormat { line: 3, .. })
        ));
    }

    #[test]
    fn test_bad_tokens_rejected() {
        assert!(matches!(parse(""), Err(Error::FileFormat { .. })));
        assert!(matches!(parse("two 2\n"), Err(Error::FileFormat { line: 1, .. })));
        assert!(matches!(parse("2 2\n0 x 0 0\n"), Err(Error::FileFormat { line: 2, .. })));
        assert!(matches!(parse("1 4\n0 0 0 0\n"), Err(Error::FileFormat { line: 1, .. })));
    }

    #[test]
    fn test_oversized_header_rejected() {
        assert!(matches!(
            parse("4294967296 4294967297\n0 0\n"),
            Err(Error::FileFormat { line: 1, .. })
        ));
        match parse("100000 100000\n0 0 0 0\n").unwrap_err() {
            Error::FileFormat { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("found 4"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_terrain_file("definitely/not/here.dem", 1.0).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
