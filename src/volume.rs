// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Volume aggregation
//!
//! Flattens either the model's own elements (2D) or the elements of every
//! boundary patch (3D) into one ordered element stream, with the totals
//! known before the first element is visited. The counting pass and the
//! streaming pass walk patches through the same indexed accessors, so both
//! see patches, and elements within a patch, in the same order.

use crate::geometry::{reduce, Triangle};
use crate::mesh::{Dimension, Element, ElementCounts, ElementSource, GridModel};
use tracing::debug;

/// Where the volume's elements come from; decided once per export
pub enum VolumeSource<'m, M> {
    /// Elements live directly on the model
    Flat(&'m M),
    /// Elements live on the model's boundary patches
    Patched(&'m M),
}

impl<'m, M: GridModel> VolumeSource<'m, M> {
    /// Pick the source from the model's dimensionality
    pub fn select(model: &'m M) -> Self {
        match model.dimension() {
            Dimension::Two => VolumeSource::Flat(model),
            Dimension::Three => VolumeSource::Patched(model),
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            VolumeSource::Flat(_) => Dimension::Two,
            VolumeSource::Patched(_) => Dimension::Three,
        }
    }
}

/// Single triangle stream over a [`VolumeSource`] with up-front totals
pub struct VolumeAggregator<'m, M> {
    source: VolumeSource<'m, M>,
    counts: ElementCounts,
}

impl<'m, M: GridModel> VolumeAggregator<'m, M> {
    /// Select the source for `model` and run the counting pass
    pub fn new(model: &'m M) -> Self {
        Self::from_source(VolumeSource::select(model))
    }

    pub fn from_source(source: VolumeSource<'m, M>) -> Self {
        let counts = match &source {
            VolumeSource::Flat(model) => model.element_counts(),
            VolumeSource::Patched(model) => {
                let mut total = ElementCounts::default();
                for index in 0..model.patch_count() {
                    total += model.patch(index).element_counts();
                }
                total
            }
        };
        debug!(
            dimension = ?source.dimension(),
            triangles = counts.triangles,
            quads = counts.quads,
            other = counts.other,
            "tallied volume elements"
        );
        Self { source, counts }
    }

    pub fn source(&self) -> &VolumeSource<'m, M> {
        &self.source
    }

    /// Element tally from the counting pass
    pub fn counts(&self) -> ElementCounts {
        self.counts
    }

    /// Triangles the stream will produce
    pub fn triangle_count(&self) -> usize {
        self.counts.triangle_count()
    }

    /// Source elements the stream will visit
    pub fn element_count(&self) -> usize {
        self.counts.total()
    }

    /// Visit every source element in order. Stops at the first error.
    pub fn try_for_each_element<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(Element<'_>) -> Result<(), E>,
    {
        match &self.source {
            VolumeSource::Flat(model) => visit(*model, &mut f),
            VolumeSource::Patched(model) => {
                for index in 0..model.patch_count() {
                    visit(&model.patch(index), &mut f)?;
                }
                Ok(())
            }
        }
    }

    /// Visit every triangle after decomposition, in order
    pub fn try_for_each_triangle<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(Triangle) -> Result<(), E>,
    {
        self.try_for_each_element(|element| reduce(element).try_for_each(&mut f))
    }

    /// Collect the whole triangle stream
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let _ = self.try_for_each_triangle(|triangle| {
            triangles.push(triangle);
            Ok::<(), std::convert::Infallible>(())
        });
        triangles
    }
}

fn visit<S, E, F>(source: &S, f: &mut F) -> Result<(), E>
where
    S: ElementSource + ?Sized,
    F: FnMut(Element<'_>) -> Result<(), E>,
{
    for index in 0..source.element_count() {
        f(source.element(index))?;
    }
    Ok(())
}
