// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh file importer

use crate::error::{AmfError, AmfResult};
use crate::mesh::UnstructuredMesh;
use nalgebra::Point3;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Load a mesh from `.json` (serialized [`UnstructuredMesh`]) or `.stl`.
/// Element indices are validated against the vertex count.
pub fn load_mesh(path: impl AsRef<Path>) -> AmfResult<UnstructuredMesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let mesh = match extension.as_str() {
        "json" => serde_json::from_str(&fs::read_to_string(path)?)?,
        "stl" => {
            let mut reader = BufReader::new(File::open(path)?);
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("surface");
            read_stl(&mut reader, name)?
        }
        _ => return Err(AmfError::UnknownFormat { extension }),
    };

    mesh.validate()?;
    debug!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        patches = mesh.patches.len(),
        "loaded mesh"
    );
    Ok(mesh)
}

/// Read an STL stream as a 3D mesh whose boundary is one patch named `name`
pub fn read_stl<R: Read + Seek>(reader: &mut R, name: &str) -> AmfResult<UnstructuredMesh> {
    let stl = stl_io::read_stl(reader)?;

    let mut mesh = UnstructuredMesh::volume();
    mesh.vertices = stl
        .vertices
        .iter()
        .map(|v| Point3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2])))
        .collect();

    let patch = mesh.add_patch(name);
    for face in &stl.faces {
        patch.add_element(&face.vertices);
    }

    Ok(mesh)
}
