// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Read-only grid model interface consumed by the exporter
//!
//! Everything is indexed so that any traversal can be restarted from the
//! first item and will visit items in the same order every time.

use super::cursor::{Elements, Patches, Vertices};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Dimensionality of the grid model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Surface grid: elements live directly on the model
    #[serde(rename = "2d")]
    Two,
    /// Volume grid: boundary elements live on surface patches
    #[serde(rename = "3d")]
    Three,
}

/// Element topology by vertex count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangle,
    Quad,
    /// Anything else; produces no triangles
    Other,
}

/// A polygon face referencing model vertices by position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    indices: &'a [usize],
}

impl<'a> Element<'a> {
    pub fn new(indices: &'a [usize]) -> Self {
        Self { indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    pub fn topology(&self) -> Topology {
        match self.indices.len() {
            3 => Topology::Triangle,
            4 => Topology::Quad,
            _ => Topology::Other,
        }
    }
}

/// Element tally broken down by topology
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCounts {
    pub triangles: usize,
    pub quads: usize,
    #[serde(default)]
    pub other: usize,
}

impl ElementCounts {
    pub fn new(triangles: usize, quads: usize) -> Self {
        Self {
            triangles,
            quads,
            other: 0,
        }
    }

    /// Tally a sequence of elements
    pub fn tally<'a>(elements: impl IntoIterator<Item = Element<'a>>) -> Self {
        let mut counts = Self::default();
        for element in elements {
            counts.record(element.topology());
        }
        counts
    }

    pub fn record(&mut self, topology: Topology) {
        match topology {
            Topology::Triangle => self.triangles += 1,
            Topology::Quad => self.quads += 1,
            Topology::Other => self.other += 1,
        }
    }

    /// Triangles produced once every quad is split in two
    pub fn triangle_count(&self) -> usize {
        self.triangles + 2 * self.quads
    }

    /// Source elements of every topology
    pub fn total(&self) -> usize {
        self.triangles + self.quads + self.other
    }
}

impl Add for ElementCounts {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for ElementCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.triangles += rhs.triangles;
        self.quads += rhs.quads;
        self.other += rhs.other;
    }
}

/// An ordered, restartable collection of elements
pub trait ElementSource {
    fn element_count(&self) -> usize;

    /// Element at `index`; `index < element_count()`
    fn element(&self, index: usize) -> Element<'_>;

    /// Counts by topology. The default scans every element.
    fn element_counts(&self) -> ElementCounts {
        ElementCounts::tally((0..self.element_count()).map(|index| self.element(index)))
    }

    fn elements(&self) -> Elements<'_, Self>
    where
        Self: Sized,
    {
        Elements::new(self)
    }
}

impl<T: ElementSource + ?Sized> ElementSource for &T {
    fn element_count(&self) -> usize {
        (**self).element_count()
    }

    fn element(&self, index: usize) -> Element<'_> {
        (**self).element(index)
    }

    fn element_counts(&self) -> ElementCounts {
        (**self).element_counts()
    }
}

/// Unstructured grid model. The model's own elements are its surface
/// elements in 2D; in 3D the boundary is exposed through patches.
pub trait GridModel: ElementSource {
    type Patch<'a>: ElementSource
    where
        Self: 'a;

    fn dimension(&self) -> Dimension;

    fn vertex_count(&self) -> usize;

    /// Vertex at `index`; `index < vertex_count()`
    fn vertex(&self, index: usize) -> Point3<f64>;

    fn patch_count(&self) -> usize;

    /// Patch at `index`; `index < patch_count()`
    fn patch(&self, index: usize) -> Self::Patch<'_>;

    fn vertices(&self) -> Vertices<'_, Self>
    where
        Self: Sized,
    {
        Vertices::new(self)
    }

    fn patches(&self) -> Patches<'_, Self>
    where
        Self: Sized,
    {
        Patches::new(self)
    }
}
