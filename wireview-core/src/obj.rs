/// Lenient reader for the vertex/face subset of Wavefront OBJ text
use nom::{character::complete::i64 as integer, number::complete::float, IResult};

use crate::geometry::{Face, Mesh};

const COMMENT_MARKER: char = '#';

/// What the parser made of its input, beyond the mesh itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub vertex_records: usize,
    pub face_records: usize,
    /// Lines with a keyword this reader does not interpret (`vn`, `vt`, `o`, ...)
    pub ignored_lines: usize,
    /// 1-based line numbers of `v`/`f` records that were dropped
    pub skipped_lines: Vec<usize>,
}

impl ParseReport {
    /// True when at least one vertex or face record could not be read
    pub fn is_degraded(&self) -> bool {
        !self.skipped_lines.is_empty()
    }
}

/// Parse OBJ text into a mesh, silently dropping anything unreadable
pub fn parse_obj(text: &str) -> Mesh {
    parse_obj_with_report(text).0
}

/// Parse OBJ text, also reporting which lines were skipped
pub fn parse_obj_with_report(text: &str) -> (Mesh, ParseReport) {
    let mut mesh = Mesh::new();
    let mut report = ParseReport::default();

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        let accepted = match keyword {
            "v" => match parse_vertex(&args) {
                Some([x, y, z]) => {
                    mesh.add_vertex(x, y, z);
                    report.vertex_records += 1;
                    true
                }
                None => false,
            },
            "f" => match parse_face(&args) {
                Some(face) => {
                    mesh.add_face(face);
                    report.face_records += 1;
                    true
                }
                None => false,
            },
            _ => {
                report.ignored_lines += 1;
                true
            }
        };

        if !accepted {
            log::debug!("skipping malformed OBJ line {}: {:?}", number + 1, line);
            report.skipped_lines.push(number + 1);
        }
    }

    (mesh, report)
}

/// The first three coordinates of a `v` record; extra tokens are ignored
fn parse_vertex(args: &[&str]) -> Option<[f32; 3]> {
    if args.len() < 3 {
        return None;
    }
    let mut coords = [0.0; 3];
    for (slot, token) in coords.iter_mut().zip(args) {
        *slot = leading_float(token)?;
    }
    Some(coords)
}

/// Indices of an `f` record, converted from 1-based to 0-based
fn parse_face(args: &[&str]) -> Option<Face> {
    if args.len() < 3 {
        return None;
    }
    Some(args.iter().map(|token| face_index(token)).collect())
}

/// Longest numeric prefix, so `1.5abc` reads as 1.5 and `2e` as 2
fn leading_float(token: &str) -> Option<f32> {
    let parsed: IResult<&str, f32> = float(token);
    let value = match parsed {
        Ok((_, value)) => value,
        // An exponent marker without digits ends the number
        Err(_) => {
            let mantissa = &token[..token.find(|c: char| c == 'e' || c == 'E')?];
            let parsed: IResult<&str, f32> = float(mantissa);
            parsed.ok()?.1
        }
    };
    Some(value).filter(|value| value.is_finite())
}

/// `12/5/3` reads as vertex 12; an unreadable token reads as vertex 1.
/// Digits too large for `i64` still name a vertex, one that never exists.
fn face_index(token: &str) -> isize {
    let vertex = token.split('/').next().unwrap_or_default();
    let parsed: IResult<&str, i64> = integer(vertex);
    match parsed {
        Ok((_, one_based)) => isize::try_from(one_based.saturating_sub(1)).unwrap_or(isize::MAX),
        Err(_) if has_leading_digit(vertex) => isize::MAX,
        Err(_) => 0,
    }
}

fn has_leading_digit(text: &str) -> bool {
    let unsigned = text
        .strip_prefix('+')
        .or_else(|| text.strip_prefix('-'))
        .unwrap_or(text);
    unsigned.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_parse_triangle() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.faces, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_face_suffixes_are_discarded() {
        let mesh = parse_obj("f 1/4/7 2//8 3/6\n");
        assert_eq!(mesh.faces, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_unparsable_face_token_defaults_to_first_vertex() {
        let mesh = parse_obj("f 2 x 3\n");
        assert_eq!(mesh.faces, vec![vec![1, 0, 2]]);
    }

    #[test]
    fn test_indices_are_not_range_checked() {
        let mesh = parse_obj("v 0 0 0\nf 1 5 -2\n");
        assert_eq!(mesh.faces, vec![vec![0, 4, -3]]);
    }

    #[test]
    fn test_comments_blanks_and_unknown_keywords() {
        let text = "# a comment\n\n   \nvn 0 0 1\nvt 0.5 0.5\no thing\nv 1 2 3 1.0\n";
        let (mesh, report) = parse_obj_with_report(text);
        assert_eq!(mesh.vertices, vec![Point3::new(1.0, 2.0, 3.0)]);
        assert_eq!(report.ignored_lines, 3);
        assert_eq!(report.vertex_records, 1);
        assert!(!report.is_degraded());
    }

    #[test]
    fn test_malformed_records_are_skipped_and_reported() {
        let text = "v 1 2\nv a b c\nv 0 0 0\nf 1 2\nv 1e3 -2.5 .5\n";
        let (mesh, report) = parse_obj_with_report(text);
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(mesh.vertices[1], Point3::new(1000.0, -2.5, 0.5));
        assert!(mesh.faces.is_empty());
        assert_eq!(report.skipped_lines, vec![1, 2, 4]);
        assert!(report.is_degraded());
    }

    #[test]
    fn test_crlf_and_indentation() {
        let mesh = parse_obj("  v 0 0 0\r\n\tv 1 1 1\r\n f 1 2 1\r\n");
        assert_eq!(mesh.vertices.len(), 2);
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let (mesh, report) = parse_obj_with_report("v nan 0 0\nv 0 inf 0\n");
        assert!(mesh.is_empty());
        assert_eq!(report.skipped_lines, vec![1, 2]);
    }

    #[test]
    fn test_exponent_without_digits_keeps_mantissa() {
        let (mesh, report) = parse_obj_with_report("v 1e 2.5e+ 3E-\n");
        assert_eq!(mesh.vertices, vec![Point3::new(1.0, 2.5, 3.0)]);
        assert!(!report.is_degraded());
    }

    #[test]
    fn test_overflowing_face_index_is_out_of_range() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
                    f 1 2 99999999999999999999\n\
                    f 1 -99999999999999999999 3\n";
        let mesh = parse_obj(text);
        assert_eq!(mesh.faces[0][2], isize::MAX);
        assert_eq!(mesh.faces[1][1], isize::MAX);

        let mut indices = Vec::new();
        assert!(!mesh.resolve_face(&mesh.faces[0], &mut indices));
        assert!(!mesh.resolve_face(&mesh.faces[1], &mut indices));
    }
}
