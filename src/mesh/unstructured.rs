// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory unstructured mesh

use super::model::{Dimension, Element, ElementCounts, ElementSource, GridModel};
use crate::error::{AmfError, AmfResult};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Named boundary patch with its own elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub name: String,
    pub elements: Vec<Vec<usize>>,
}

impl Patch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Add an element and return self for chaining
    pub fn add_element(&mut self, indices: &[usize]) -> &mut Self {
        self.elements.push(indices.to_vec());
        self
    }
}

impl ElementSource for Patch {
    fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn element(&self, index: usize) -> Element<'_> {
        Element::new(&self.elements[index])
    }
}

/// Unstructured mesh: vertices plus surface elements (2D) or boundary
/// patches (3D)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnstructuredMesh {
    pub dimension: Dimension,
    pub vertices: Vec<Point3<f64>>,
    #[serde(default)]
    pub elements: Vec<Vec<usize>>,
    #[serde(default)]
    pub patches: Vec<Patch>,
}

impl UnstructuredMesh {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            vertices: Vec::new(),
            elements: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// Empty 2D surface mesh
    pub fn surface() -> Self {
        Self::new(Dimension::Two)
    }

    /// Empty 3D mesh whose boundary is described by patches
    pub fn volume() -> Self {
        Self::new(Dimension::Three)
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    /// Add a surface element
    pub fn add_element(&mut self, indices: &[usize]) {
        self.elements.push(indices.to_vec());
    }

    /// Append an empty patch and return it for filling
    pub fn add_patch(&mut self, name: impl Into<String>) -> &mut Patch {
        self.patches.push(Patch::new(name));
        let last = self.patches.len() - 1;
        &mut self.patches[last]
    }

    /// Tally of every element the exporter will visit for this dimension
    pub fn boundary_counts(&self) -> ElementCounts {
        match self.dimension {
            Dimension::Two => self.element_counts(),
            Dimension::Three => self
                .patches
                .iter()
                .map(|patch| patch.element_counts())
                .fold(ElementCounts::default(), |acc, c| acc + c),
        }
    }

    /// Check every element index against the vertex count
    pub fn validate(&self) -> AmfResult<()> {
        let vertex_count = self.vertices.len();
        let check = |owner: &str, position: usize, element: &[usize]| -> AmfResult<()> {
            match element.iter().find(|&&index| index >= vertex_count) {
                Some(index) => Err(AmfError::invalid_mesh(format!(
                    "{owner} element {position} references vertex {index}, \
                     but the mesh has {vertex_count} vertices"
                ))),
                None => Ok(()),
            }
        };

        for (position, element) in self.elements.iter().enumerate() {
            check("surface", position, element)?;
        }
        for patch in &self.patches {
            for (position, element) in patch.elements.iter().enumerate() {
                check(&format!("patch '{}'", patch.name), position, element)?;
            }
        }
        Ok(())
    }
}

impl ElementSource for UnstructuredMesh {
    fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn element(&self, index: usize) -> Element<'_> {
        Element::new(&self.elements[index])
    }
}

impl GridModel for UnstructuredMesh {
    type Patch<'a> = &'a Patch;

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: usize) -> Point3<f64> {
        self.vertices[index]
    }

    fn patch_count(&self) -> usize {
        self.patches.len()
    }

    fn patch(&self, index: usize) -> &Patch {
        &self.patches[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_returns_position() {
        let mut mesh = UnstructuredMesh::surface();
        assert_eq!(mesh.add_vertex(Point3::origin()), 0);
        assert_eq!(mesh.add_vertex(Point3::new(1.0, 0.0, 0.0)), 1);
        assert_eq!(mesh.vertex_count(), 2);
    }

    #[test]
    fn test_boundary_counts_by_dimension() {
        let mut flat = UnstructuredMesh::surface();
        flat.add_element(&[0, 1, 2]);
        flat.add_element(&[0, 1, 2, 3]);
        assert_eq!(flat.boundary_counts(), ElementCounts::new(1, 1));

        let mut solid = UnstructuredMesh::volume();
        solid.add_patch("top").add_element(&[0, 1, 2]).add_element(&[1, 2, 3]);
        solid.add_patch("side").add_element(&[0, 1, 2, 3]);
        assert_eq!(solid.boundary_counts(), ElementCounts::new(2, 1));
        // patch elements are not the model's own elements
        assert_eq!(solid.element_count(), 0);
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mut mesh = UnstructuredMesh::volume();
        mesh.add_vertex(Point3::origin());
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_patch("ok").add_element(&[0, 1, 2]);
        assert!(mesh.validate().is_ok());

        mesh.add_patch("bad").add_element(&[0, 1, 3]);
        let err = mesh.validate().unwrap_err();
        assert!(err.to_string().contains("patch 'bad'"));
        assert!(err.to_string().contains("vertex 3"));
    }

    #[test]
    fn test_json_shape() -> anyhow::Result<()> {
        let json = r#"{
            "dimension": "3d",
            "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
            "patches": [{ "name": "wall", "elements": [[0, 1, 2]] }]
        }"#;
        let mesh: UnstructuredMesh = serde_json::from_str(json)?;
        assert_eq!(mesh.dimension, Dimension::Three);
        assert_eq!(mesh.vertex(1), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.patch(0).name, "wall");
        assert!(mesh.elements.is_empty());
        Ok(())
    }
}
