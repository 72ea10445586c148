// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parse exported documents back with a real XML reader

use anyhow::{bail, Result};
use approx::assert_relative_eq;
use nalgebra::Point3;
use polyframe_amf::config::DocumentMetadata;
use polyframe_amf::mesh::GridModel;
use polyframe_amf::{AmfExporter, ExportConfig, Unit, UnstructuredMesh, VolumeAggregator};
use quick_xml::events::Event;
use quick_xml::Reader;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Default)]
struct Document {
    unit: String,
    object_ids: Vec<String>,
    metadata: Vec<(String, String)>,
    comments: Vec<String>,
    vertices: Vec<[f64; 3]>,
    triangles: Vec<[usize; 3]>,
}

fn parse(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = Document::default();
    let mut stack: Vec<String> = Vec::new();
    let mut metadata_kind = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec())?;
                match name.as_str() {
                    "amf" => {
                        if let Some(unit) = e.try_get_attribute("unit")? {
                            doc.unit = unit.unescape_value()?.into_owned();
                        }
                    }
                    "object" => {
                        if let Some(id) = e.try_get_attribute("id")? {
                            doc.object_ids.push(id.unescape_value()?.into_owned());
                        }
                    }
                    "metadata" => {
                        metadata_kind = match e.try_get_attribute("type")? {
                            Some(kind) => kind.unescape_value()?.into_owned(),
                            None => String::new(),
                        };
                    }
                    "vertex" => doc.vertices.push([0.0; 3]),
                    "triangle" => doc.triangles.push([0; 3]),
                    _ => {}
                }
                stack.push(name);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                let Some(tag) = stack.last() else {
                    bail!("text outside of any element: {text}");
                };
                match tag.as_str() {
                    "metadata" => doc
                        .metadata
                        .push((metadata_kind.clone(), text.into_owned())),
                    "x" | "y" | "z" => {
                        let axis = (tag.as_bytes()[0] - b'x') as usize;
                        if let Some(vertex) = doc.vertices.last_mut() {
                            vertex[axis] = text.parse()?;
                        }
                    }
                    "v1" | "v2" | "v3" => {
                        let slot = (tag.as_bytes()[1] - b'1') as usize;
                        if let Some(triangle) = doc.triangles.last_mut() {
                            triangle[slot] = text.parse()?;
                        }
                    }
                    other => bail!("unexpected text in <{other}>: {text}"),
                }
            }
            Event::Comment(c) => {
                doc.comments
                    .push(String::from_utf8(c.to_vec())?.trim().to_string());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        bail!("unclosed elements: {stack:?}");
    }
    Ok(doc)
}

fn random_mesh(rng: &mut StdRng, volume: bool) -> UnstructuredMesh {
    let mut mesh = if volume {
        UnstructuredMesh::volume()
    } else {
        UnstructuredMesh::surface()
    };

    let vertex_count: usize = rng.gen_range(4..40);
    for _ in 0..vertex_count {
        mesh.add_vertex(Point3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
        ));
    }

    let random_element = |rng: &mut StdRng| -> Vec<usize> {
        let size = rng.gen_range(2..=5);
        (0..size).map(|_| rng.gen_range(0..vertex_count)).collect()
    };

    if volume {
        for p in 0..rng.gen_range(0..5) {
            let count = rng.gen_range(0..20);
            let elements: Vec<Vec<usize>> = (0..count).map(|_| random_element(rng)).collect();
            let patch = mesh.add_patch(format!("patch_{p}"));
            for element in &elements {
                patch.add_element(element);
            }
        }
    } else {
        for _ in 0..rng.gen_range(0..60) {
            let element = random_element(rng);
            mesh.add_element(&element);
        }
    }
    mesh
}

#[test]
fn test_document_parses_as_xml() -> Result<()> {
    let mut mesh = UnstructuredMesh::surface();
    mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    mesh.add_vertex(Point3::new(2.0, 0.0, 0.0));
    mesh.add_vertex(Point3::new(2.0, 2.0, 0.0));
    mesh.add_vertex(Point3::new(0.0, 2.0, 0.0));
    mesh.add_element(&[0, 1, 2, 3]);

    let mut config = ExportConfig::default().with_unit(Unit::Millimeter);
    config.object_id = 7;
    config.metadata = DocumentMetadata {
        company: "Fish & Chips <Co>".to_string(),
        author: Some("R&D".to_string()),
        ..DocumentMetadata::default()
    };

    let xml = AmfExporter::with_config(&mesh, config).to_xml_string()?;
    let doc = parse(&xml)?;

    assert_eq!(doc.unit, "mm");
    assert_eq!(doc.object_ids, vec!["7"]);
    assert!(doc
        .metadata
        .contains(&("Company".to_string(), "Fish & Chips <Co>".to_string())));
    assert!(doc
        .metadata
        .contains(&("Author".to_string(), "R&D".to_string())));
    assert!(doc
        .metadata
        .contains(&("Name".to_string(), "Object_00007".to_string())));
    assert!(doc
        .metadata
        .contains(&("Name".to_string(), "Volume_00000".to_string())));
    assert_eq!(
        doc.comments,
        vec!["vertex count: 4".to_string(), "triangle count: 2".to_string()]
    );
    assert_eq!(doc.vertices.len(), 4);
    assert_relative_eq!(doc.vertices[2][0], 2.0);
    assert_relative_eq!(doc.vertices[2][1], 2.0);
    assert_eq!(doc.triangles, vec![[0, 1, 2], [0, 2, 3]]);
    Ok(())
}

#[test]
fn test_unit_attribute_for_every_unit() -> Result<()> {
    let mesh = UnstructuredMesh::surface();
    for unit in Unit::ALL {
        let config = ExportConfig::default().with_unit(unit);
        let doc = parse(&AmfExporter::with_config(&mesh, config).to_xml_string()?)?;
        assert_eq!(doc.unit, unit.as_str());
    }
    Ok(())
}

#[test]
fn test_unrecognized_unit_falls_back_to_inch() -> Result<()> {
    let mesh = UnstructuredMesh::surface();
    let mut config = ExportConfig::default();
    config
        .attributes
        .insert("units".to_string(), "furlongs".to_string());

    let doc = parse(&AmfExporter::with_config(&mesh, config).to_xml_string()?)?;
    assert_eq!(doc.unit, "inch");
    Ok(())
}

#[test]
fn test_random_meshes_keep_counts_consistent() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x00a3_f00d);

    for round in 0..50 {
        let mesh = random_mesh(&mut rng, round % 2 == 1);
        let aggregator = VolumeAggregator::new(&mesh);
        let xml = AmfExporter::new(&mesh).to_xml_string()?;
        let doc = parse(&xml)?;

        assert_eq!(doc.vertices.len(), mesh.vertex_count());
        assert_eq!(doc.triangles.len(), aggregator.triangle_count());
        assert_eq!(
            doc.comments[1],
            format!("triangle count: {}", aggregator.triangle_count())
        );
        assert!(doc
            .triangles
            .iter()
            .flatten()
            .all(|&index| index < mesh.vertex_count()));

        let streamed: Vec<[usize; 3]> = aggregator
            .triangles()
            .iter()
            .map(|triangle| triangle.indices)
            .collect();
        assert_eq!(doc.triangles, streamed);

        for (parsed, original) in doc.vertices.iter().zip(mesh.vertices()) {
            assert_relative_eq!(parsed[0], original.x, epsilon = 1e-9);
            assert_relative_eq!(parsed[1], original.y, epsilon = 1e-9);
            assert_relative_eq!(parsed[2], original.z, epsilon = 1e-9);
        }
    }
    Ok(())
}
