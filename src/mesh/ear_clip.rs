//! Ear-clipping triangulation of simple 2D outlines.
//!
//! Used to cap prisms extruded from a footprint. Runs in O(n²): every pass
//! scans the remaining loop for the first ear and cuts it off.

use crate::float_types::Real;
use geo::{Coord, LineString, Winding};

/// `true` if the closed outline runs counter-clockwise.
///
/// Collinear or otherwise degenerate outlines have no winding and report `false`.
pub fn is_ccw(outline: &[[Real; 2]]) -> bool {
    let mut ring: LineString<Real> = outline
        .iter()
        .map(|&[x, y]| Coord { x, y })
        .collect::<Vec<_>>()
        .into();
    ring.close();
    ring.is_ccw()
}

fn cross(o: [Real; 2], a: [Real; 2], b: [Real; 2]) -> Real {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Inclusive point-in-triangle test for a counter-clockwise triangle.
fn in_triangle(p: [Real; 2], a: [Real; 2], b: [Real; 2], c: [Real; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Triangulate a simple polygon outline.
///
/// Returns index triples into `outline`, each wound counter-clockwise no matter
/// how the outline itself is wound. A simple outline with `n` vertices yields
/// `n - 2` triangles. When no ear can be found (self-intersecting or degenerate
/// input) a warning is logged and the triangles cut so far are returned.
pub fn ear_clip(outline: &[[Real; 2]]) -> Vec<[usize; 3]> {
    let n = outline.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if !is_ccw(outline) {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let count = remaining.len();
        let ear = (0..count).find(|&i| {
            let (ia, ib, ic) = (
                remaining[(i + count - 1) % count],
                remaining[i],
                remaining[(i + 1) % count],
            );
            let (a, b, c) = (outline[ia], outline[ib], outline[ic]);
            if cross(a, b, c) <= 0.0 {
                return false;
            }
            !remaining.iter().any(|&j| {
                let p = outline[j];
                j != ia
                    && j != ib
                    && j != ic
                    && p != a
                    && p != b
                    && p != c
                    && in_triangle(p, a, b, c)
            })
        });

        let Some(i) = ear else {
            log::warn!(
                "ear clipping stopped with {count} of {n} vertices left; cap is incomplete"
            );
            return triangles;
        };

        triangles.push([
            remaining[(i + count - 1) % count],
            remaining[i],
            remaining[(i + 1) % count],
        ]);
        remaining.remove(i);
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}
