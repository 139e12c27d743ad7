//! 4D polytope construction: vertex and edge sets for each pattern.

use glam::Vec4;
use std::str::FromStr;
use thiserror::Error;

/// Warp strength for the folded tesseract pattern
const FOLD_FACTOR: f32 = 0.7;

/// Per-axis tolerance when comparing warped coordinates for adjacency
const FOLD_AXIS_TOLERANCE: f32 = 0.1;

/// W-separation beyond which folded vertices are connected regardless of
/// spatial closeness (intentionally produces the dense "folded" edge set)
const FOLD_W_SPAN: f32 = 1.5;

/// Requested pattern id was not recognized
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown polytope pattern '{0}'")]
pub struct UnknownPatternError(pub String);

/// Polytope patterns the builder knows how to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternId {
    Tesseract,
    Hypertetrahedra,
    TesseractFold,
}

impl FromStr for PatternId {
    type Err = UnknownPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tesseract" => Ok(Self::Tesseract),
            "hypertetrahedra" => Ok(Self::Hypertetrahedra),
            "tesseract_fold" => Ok(Self::TesseractFold),
            other => Err(UnknownPatternError(other.to_string())),
        }
    }
}

/// Ordered pair of indices into a polytope's vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

/// Immutable 4D shape: vertices plus the edges connecting them.
///
/// Rebuilt only when the pattern changes; rotation never mutates it.
#[derive(Debug, Clone)]
pub struct Polytope {
    pub vertices: Vec<Vec4>,
    pub edges: Vec<Edge>,
}

impl Polytope {
    /// Build the vertex and edge sets for a pattern
    pub fn build(pattern: PatternId) -> Self {
        match pattern {
            PatternId::Tesseract => build_tesseract(),
            PatternId::Hypertetrahedra => build_hypertetrahedra(),
            PatternId::TesseractFold => build_tesseract_fold(),
        }
    }
}

/// All 16 corners of {-1,1}^4, indexed by the bits of 0..16
fn hypercube_corners() -> Vec<Vec4> {
    (0..16)
        .map(|i| {
            Vec4::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
                if i & 8 == 0 { -1.0 } else { 1.0 },
            )
        })
        .collect()
}

/// Tesseract: 16 corners, edges between corners differing in exactly one
/// coordinate sign (Hamming distance 1), yielding 32 edges.
fn build_tesseract() -> Polytope {
    let vertices = hypercube_corners();
    let mut edges = Vec::with_capacity(32);

    for i in 0..16usize {
        for j in (i + 1)..16usize {
            if (i ^ j).count_ones() == 1 {
                edges.push(Edge { a: i, b: j });
            }
        }
    }

    Polytope { vertices, edges }
}

/// 5-cell (regular 4-simplex): 5 vertices, complete graph of 10 edges
fn build_hypertetrahedra() -> Polytope {
    let s5 = 5.0_f32.sqrt();
    let vertices = vec![
        Vec4::new(1.0, 1.0, 1.0, -1.0 / s5),
        Vec4::new(1.0, -1.0, -1.0, -1.0 / s5),
        Vec4::new(-1.0, 1.0, -1.0, -1.0 / s5),
        Vec4::new(-1.0, -1.0, 1.0, -1.0 / s5),
        Vec4::new(0.0, 0.0, 0.0, 4.0 / s5),
    ];

    let mut edges = Vec::with_capacity(10);
    for i in 0..5usize {
        for j in (i + 1)..5usize {
            edges.push(Edge { a: i, b: j });
        }
    }

    Polytope { vertices, edges }
}

/// Folded tesseract: the 16 corners with x,y,z warped by the vertex's own w.
///
/// Edges use a dual rule: exactly one warped axis differs beyond tolerance,
/// OR the two w coordinates are more than FOLD_W_SPAN apart. The second rule
/// is deliberately not gated on spatial closeness; it is what makes the
/// folded shape read as denser than the plain tesseract.
fn build_tesseract_fold() -> Polytope {
    let vertices: Vec<Vec4> = hypercube_corners()
        .into_iter()
        .map(|v| {
            let warp = 1.0 + FOLD_FACTOR * v.w * 0.2;
            Vec4::new(v.x * warp, v.y * warp, v.z * warp, v.w)
        })
        .collect();

    let mut edges = Vec::new();
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            let a = vertices[i];
            let b = vertices[j];

            let differing = (0..4)
                .filter(|&axis| (a[axis] - b[axis]).abs() > FOLD_AXIS_TOLERANCE)
                .count();

            if differing == 1 || (a.w - b.w).abs() > FOLD_W_SPAN {
                edges.push(Edge { a: i, b: j });
            }
        }
    }

    Polytope { vertices, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tesseract_counts() {
        let polytope = Polytope::build(PatternId::Tesseract);

        assert_eq!(polytope.vertices.len(), 16);
        assert_eq!(polytope.edges.len(), 32);
    }

    #[test]
    fn test_tesseract_edges_flip_one_sign() {
        let polytope = Polytope::build(PatternId::Tesseract);

        for edge in &polytope.edges {
            let a = polytope.vertices[edge.a];
            let b = polytope.vertices[edge.b];

            let differing = (0..4).filter(|&axis| a[axis] != b[axis]).count();
            assert_eq!(differing, 1, "edge {:?} flips {} signs", edge, differing);
        }
    }

    #[test]
    fn test_hypertetrahedra_is_complete_graph() {
        let polytope = Polytope::build(PatternId::Hypertetrahedra);

        assert_eq!(polytope.vertices.len(), 5);
        assert_eq!(polytope.edges.len(), 10); // C(5,2)
    }

    #[test]
    fn test_hypertetrahedra_is_regular() {
        let polytope = Polytope::build(PatternId::Hypertetrahedra);

        // Every pair of vertices is equidistant in a regular simplex
        let reference = (polytope.vertices[0] - polytope.vertices[1]).length();
        for edge in &polytope.edges {
            let len = (polytope.vertices[edge.a] - polytope.vertices[edge.b]).length();
            assert!(
                (len - reference).abs() < 1e-4,
                "edge {:?} has length {} vs {}",
                edge,
                len,
                reference
            );
        }
    }

    #[test]
    fn test_fold_warps_spatial_axes_only() {
        let folded = Polytope::build(PatternId::TesseractFold);
        let plain = hypercube_corners();

        for (warped, original) in folded.vertices.iter().zip(&plain) {
            let warp = 1.0 + FOLD_FACTOR * original.w * 0.2;
            assert!((warped.x - original.x * warp).abs() < 1e-6);
            assert!((warped.w - original.w).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fold_is_denser_than_tesseract() {
        let folded = Polytope::build(PatternId::TesseractFold);
        let plain = Polytope::build(PatternId::Tesseract);

        // The w-span rule connects the two w=-1 / w=+1 cells wholesale
        assert!(folded.edges.len() > plain.edges.len());
    }

    #[test]
    fn test_edge_indices_valid_and_distinct() {
        for pattern in [
            PatternId::Tesseract,
            PatternId::Hypertetrahedra,
            PatternId::TesseractFold,
        ] {
            let polytope = Polytope::build(pattern);
            for edge in &polytope.edges {
                assert!(edge.a < polytope.vertices.len());
                assert!(edge.b < polytope.vertices.len());
                assert_ne!(edge.a, edge.b);
            }
        }
    }

    #[test]
    fn test_unknown_pattern_is_an_error() {
        let err = "hyperdodecahedron".parse::<PatternId>().unwrap_err();
        assert_eq!(err, UnknownPatternError("hyperdodecahedron".to_string()));

        assert_eq!("tesseract".parse::<PatternId>(), Ok(PatternId::Tesseract));
        assert_eq!(
            "tesseract_fold".parse::<PatternId>(),
            Ok(PatternId::TesseractFold)
        );
    }
}
