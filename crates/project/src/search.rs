//! Diagnostic point search.
//!
//! Exploratory tooling for chasing projection anomalies: given a bounding
//! coordinate rectangle, reports every polygon vertex inside it together
//! with its ring neighbours, the enclosing graticule cell's corners, and
//! the diagonal chosen for that cell. Output goes to any `io::Write` sink;
//! this is not part of the projection contract.

use std::io::{self, Write};

use cartoflow_core::Point;
use cartoflow_geom::Ring;

use crate::inset::Inset;
use crate::triangle::{cell_corners, cell_index};

/// A coordinate rectangle for the search, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl SearchRect {
    fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }
}

/// Reports every polygon vertex inside `rect`, with its immediate ring
/// neighbours, enclosing graticule cell, and chosen diagonal.
pub fn point_search(inset: &Inset, rect: SearchRect, out: &mut dyn Write) -> io::Result<()> {
    for gd in inset.geo_divs() {
        for pwh in &gd.polygons {
            report_ring(inset, rect, &gd.id, "external", &pwh.exterior, out)?;
            for (h, hole) in pwh.holes.iter().enumerate() {
                let kind = format!("hole {h}");
                report_ring(inset, rect, &gd.id, &kind, hole, out)?;
            }
        }
    }
    Ok(())
}

fn report_ring(
    inset: &Inset,
    rect: SearchRect,
    id: &str,
    kind: &str,
    ring: &Ring,
    out: &mut dyn Write,
) -> io::Result<()> {
    let pts = ring.points();
    let n = pts.len();
    for (k, &p) in pts.iter().enumerate() {
        if !rect.contains(p) {
            continue;
        }
        // The vertex plus its immediate neighbours along the ring.
        for offset in [-1_isize, 0, 1] {
            let idx = (k as isize + offset).rem_euclid(n as isize) as usize;
            let q = pts[idx];
            writeln!(out, "point {idx} of {n} at ({:.17}, {:.17})", q.x, q.y)?;
            writeln!(out, "  on {kind} boundary of {id}")?;
            let corners = cell_corners(q.x, q.y);
            writeln!(out, "  graticule cell corners:")?;
            for (c, corner) in corners.iter().enumerate() {
                writeln!(out, "    v{c}: ({}, {})", corner.x, corner.y)?;
            }
            if let Some(diagonals) = inset.diagonals() {
                let (ci, cj) = cell_index(corners[0], inset.dims());
                writeln!(out, "  diagonal chosen: {:?}", diagonals.choice(ci, cj))?;
            }
        }
    }
    Ok(())
}
