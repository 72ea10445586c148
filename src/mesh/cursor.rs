// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Forward-only cursors over a grid model
//!
//! Each cursor starts at the first item; calling the constructor again
//! restarts the traversal in the same order.

use super::model::{Element, ElementSource, GridModel};
use nalgebra::Point3;
use std::iter::FusedIterator;

/// Vertices in ordinal order
pub struct Vertices<'a, M: ?Sized> {
    model: &'a M,
    next: usize,
    len: usize,
}

impl<'a, M: GridModel + ?Sized> Vertices<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self {
            model,
            next: 0,
            len: model.vertex_count(),
        }
    }
}

impl<'a, M: GridModel + ?Sized> Iterator for Vertices<'a, M> {
    type Item = Point3<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let vertex = self.model.vertex(self.next);
        self.next += 1;
        Some(vertex)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<M: GridModel + ?Sized> ExactSizeIterator for Vertices<'_, M> {}
impl<M: GridModel + ?Sized> FusedIterator for Vertices<'_, M> {}

/// Elements of a source in traversal order
pub struct Elements<'a, S: ?Sized> {
    source: &'a S,
    next: usize,
    len: usize,
}

impl<'a, S: ElementSource + ?Sized> Elements<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            next: 0,
            len: source.element_count(),
        }
    }
}

impl<'a, S: ElementSource + ?Sized> Iterator for Elements<'a, S> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let element = self.source.element(self.next);
        self.next += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<S: ElementSource + ?Sized> ExactSizeIterator for Elements<'_, S> {}
impl<S: ElementSource + ?Sized> FusedIterator for Elements<'_, S> {}

/// Boundary patches in model order
pub struct Patches<'a, M: ?Sized> {
    model: &'a M,
    next: usize,
    len: usize,
}

impl<'a, M: GridModel + ?Sized> Patches<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self {
            model,
            next: 0,
            len: model.patch_count(),
        }
    }
}

impl<'a, M: GridModel + ?Sized + 'a> Iterator for Patches<'a, M> {
    type Item = M::Patch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let patch = self.model.patch(self.next);
        self.next += 1;
        Some(patch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a, M: GridModel + ?Sized + 'a> ExactSizeIterator for Patches<'a, M> {}
impl<'a, M: GridModel + ?Sized + 'a> FusedIterator for Patches<'a, M> {}

#[cfg(test)]
mod tests {
    use crate::mesh::{ElementSource, GridModel, UnstructuredMesh};
    use nalgebra::Point3;

    fn square() -> UnstructuredMesh {
        let mut mesh = UnstructuredMesh::surface();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_element(&[0, 1, 2]);
        mesh.add_element(&[0, 2, 3]);
        mesh
    }

    #[test]
    fn test_vertices_are_ordinal_and_restartable() {
        let mesh = square();
        let first: Vec<_> = mesh.vertices().collect();
        let second: Vec<_> = mesh.vertices().collect();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
        assert_eq!(first[2], Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_exact_size() {
        let mesh = square();
        let mut vertices = mesh.vertices();
        assert_eq!(vertices.len(), 4);
        vertices.next();
        assert_eq!(vertices.len(), 3);

        let elements = mesh.elements();
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn test_patches_in_model_order() {
        let mut mesh = UnstructuredMesh::volume();
        mesh.add_patch("a").add_element(&[0, 1, 2]);
        mesh.add_patch("b").add_element(&[0, 1, 2, 3]);

        let names: Vec<_> = mesh.patches().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        let sizes: Vec<_> = mesh.patches().map(|p| p.element_count()).collect();
        assert_eq!(sizes, vec![1, 1]);
    }
}
