// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Quad to triangle reduction
//!
//! Quads are split with a fixed fan from their first vertex:
//! `(v0, v1, v2)` and `(v0, v2, v3)`. Winding is preserved.

use crate::mesh::{Element, Topology};
use std::iter::FusedIterator;

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// Largest referenced vertex index
    pub fn max_index(&self) -> usize {
        self.indices.into_iter().max().unwrap_or(0)
    }
}

/// Triangles produced by [`reduce`]; at most two
#[derive(Debug, Clone)]
pub struct Reduction {
    triangles: [Triangle; 2],
    len: usize,
    next: usize,
}

impl Reduction {
    fn empty() -> Self {
        Self {
            triangles: [Triangle::new([0; 3]); 2],
            len: 0,
            next: 0,
        }
    }
}

impl Iterator for Reduction {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        if self.next >= self.len {
            return None;
        }
        let triangle = self.triangles[self.next];
        self.next += 1;
        Some(triangle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Reduction {}
impl FusedIterator for Reduction {}

/// Decompose an element into triangles. Elements that are neither
/// triangles nor quads yield nothing.
pub fn reduce(element: Element<'_>) -> Reduction {
    let v = element.indices();
    let mut reduction = Reduction::empty();
    match element.topology() {
        Topology::Triangle => {
            reduction.triangles[0] = Triangle::new([v[0], v[1], v[2]]);
            reduction.len = 1;
        }
        Topology::Quad => {
            reduction.triangles[0] = Triangle::new([v[0], v[1], v[2]]);
            reduction.triangles[1] = Triangle::new([v[0], v[2], v[3]]);
            reduction.len = 2;
        }
        Topology::Other => {}
    }
    reduction
}
