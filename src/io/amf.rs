// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! AMF (Additive Manufacturing File) exporter
//!
//! Streams a grid model into an AMF document:
//!
//! ```text
//! <amf unit='...'>
//!   metadata...
//!   <object id='0'>
//!     <mesh>
//!       <vertices> <vertex><coordinates><x/><y/><z/></coordinates></vertex>... </vertices>
//!       <volume> <triangle><v1/><v2/><v3/></triangle>... </volume>
//!     </mesh>
//!   </object>
//! </amf>
//! ```
//!
//! Vertices are written in model order and referenced by position. The
//! volume holds the model's own elements for 2D grids and the elements of
//! every boundary patch for 3D grids, with quads split into two triangles.
//! Nothing is buffered: every line goes to the sink as soon as it is built,
//! so a cancelled or failed export leaves a truncated document behind.

use super::indent::IndentWriter;
use crate::config::{resolve_unit, ExportConfig, MetadataKind, Unit};
use crate::error::AmfResult;
use crate::geometry::{reduce, Triangle};
use crate::mesh::{Dimension, GridModel};
use crate::progress::{NullProgress, Phase, ProgressBridge, ProgressReporter};
use crate::volume::VolumeAggregator;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Volume index; a single volume is emitted per mesh
const VOLUME_ID: u32 = 0;

/// Export progress through the document, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Opened,
    HeaderWritten,
    ObjectOpen,
    VertexBlockDone,
    VolumeBlockDone,
    ObjectClosed,
    Closed,
}

impl ExportState {
    /// The only state reachable from this one
    pub fn successor(&self) -> Option<ExportState> {
        match self {
            ExportState::Opened => Some(ExportState::HeaderWritten),
            ExportState::HeaderWritten => Some(ExportState::ObjectOpen),
            ExportState::ObjectOpen => Some(ExportState::VertexBlockDone),
            ExportState::VertexBlockDone => Some(ExportState::VolumeBlockDone),
            ExportState::VolumeBlockDone => Some(ExportState::ObjectClosed),
            ExportState::ObjectClosed => Some(ExportState::Closed),
            ExportState::Closed => None,
        }
    }
}

/// What a completed export wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub unit: Unit,
    pub dimension: Dimension,
    pub object_id: u32,
    pub vertex_count: usize,
    /// Source elements visited, including skipped ones
    pub element_count: usize,
    pub triangle_count: usize,
}

/// Display name of an object
pub fn object_name(id: u32) -> String {
    format!("Object_{id:05}")
}

/// Display name of a volume
pub fn volume_name(id: u32) -> String {
    format!("Volume_{id:05}")
}

/// Exports one grid model as a single AMF object
pub struct AmfExporter<'m, M> {
    model: &'m M,
    config: ExportConfig,
}

impl<'m, M: GridModel> AmfExporter<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self::with_config(model, ExportConfig::default())
    }

    pub fn with_config(model: &'m M, config: ExportConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Stream the document into `sink`, reporting to `progress`
    pub fn write<W: Write, P: ProgressReporter>(
        &self,
        sink: W,
        progress: P,
    ) -> AmfResult<ExportSummary> {
        Session::open(self.model, &self.config, sink, progress).run()
    }

    /// Export to a file through a buffered writer
    pub fn write_file<P: ProgressReporter>(
        &self,
        path: impl AsRef<Path>,
        progress: P,
    ) -> AmfResult<ExportSummary> {
        let file = File::create(path.as_ref())?;
        self.write(BufWriter::new(file), progress)
    }

    /// Render the whole document in memory
    pub fn to_bytes(&self) -> AmfResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, NullProgress)?;
        Ok(buffer)
    }

    /// Render the whole document in memory as text
    pub fn to_xml_string(&self) -> AmfResult<String> {
        let bytes = self.to_bytes()?;
        let text = String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Ok(text)
    }
}

/// Export a grid model to an AMF file using the default configuration
pub fn export<M: GridModel>(model: &M, path: &str) -> AmfResult<ExportSummary> {
    AmfExporter::new(model).write_file(path, NullProgress)
}

/// One export run; owns the writer and the progress bridge
struct Session<'m, 'c, M, W, P> {
    model: &'m M,
    config: &'c ExportConfig,
    out: IndentWriter<W>,
    progress: ProgressBridge<P>,
    state: ExportState,
    summary: ExportSummary,
}

impl<'m, 'c, M: GridModel, W: Write, P: ProgressReporter> Session<'m, 'c, M, W, P> {
    fn open(model: &'m M, config: &'c ExportConfig, sink: W, progress: P) -> Self {
        let unit = resolve_unit(config);
        info!(
            %unit,
            dimension = ?model.dimension(),
            vertices = model.vertex_count(),
            "starting AMF export"
        );
        Self {
            model,
            config,
            out: IndentWriter::new(sink),
            progress: ProgressBridge::new(progress),
            state: ExportState::Opened,
            summary: ExportSummary {
                unit,
                dimension: model.dimension(),
                object_id: config.object_id,
                vertex_count: 0,
                element_count: 0,
                triangle_count: 0,
            },
        }
    }

    fn run(mut self) -> AmfResult<ExportSummary> {
        self.write_header()?;
        self.write_object()?;
        self.close()?;
        info!(
            vertices = self.summary.vertex_count,
            triangles = self.summary.triangle_count,
            "finished AMF export"
        );
        Ok(self.summary)
    }

    fn advance(&mut self, next: ExportState) {
        debug_assert_eq!(
            self.state.successor(),
            Some(next),
            "export state cannot move from {:?} to {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "export state");
        self.state = next;
    }

    /// Run `body` one nesting level deeper, restoring the depth afterwards
    fn nested<F>(&mut self, body: F) -> AmfResult<()>
    where
        F: FnOnce(&mut Self) -> AmfResult<()>,
    {
        self.out.enter_scope();
        let result = body(self);
        self.out.exit_scope();
        result
    }

    fn write_header(&mut self) -> AmfResult<()> {
        let config = self.config;
        self.out.raw("<?xml version='1.0' encoding='UTF-8'?>")?;
        self.out
            .raw(format_args!("<amf unit='{}'>", self.summary.unit))?;
        self.nested(|s| {
            for (kind, value) in config.metadata.entries() {
                s.out.metadata(0, kind.as_str(), value)?;
            }
            Ok(())
        })?;
        self.advance(ExportState::HeaderWritten);
        Ok(())
    }

    fn write_object(&mut self) -> AmfResult<()> {
        let id = self.summary.object_id;
        self.nested(|s| {
            s.out.line(format_args!("<object id='{id}'>"))?;
            s.out
                .metadata(1, MetadataKind::Name.as_str(), &object_name(id))?;
            s.advance(ExportState::ObjectOpen);
            s.write_mesh()?;
            s.out.line("</object>")?;
            Ok(())
        })?;
        self.advance(ExportState::ObjectClosed);
        Ok(())
    }

    fn write_mesh(&mut self) -> AmfResult<()> {
        self.nested(|s| {
            s.out.line("<mesh>")?;
            s.write_vertices()?;
            s.write_volume()?;
            s.out.line("</mesh>")?;
            Ok(())
        })
    }

    fn write_vertices(&mut self) -> AmfResult<()> {
        let model = self.model;
        let total = model.vertex_count();
        self.progress.begin(Phase::Vertices, total as u64)?;
        self.nested(|s| {
            s.out.comment(format_args!("vertex count: {total}"))?;
            s.out.line("<vertices>")?;
            for position in model.vertices() {
                s.progress.step()?;
                write_vertex(&mut s.out, &position)?;
                s.summary.vertex_count += 1;
            }
            s.out.line("</vertices>")?;
            Ok(())
        })?;
        self.progress.end();
        self.advance(ExportState::VertexBlockDone);
        Ok(())
    }

    fn write_volume(&mut self) -> AmfResult<()> {
        let aggregator = VolumeAggregator::new(self.model);
        let vertex_count = self.model.vertex_count();
        let triangle_total = aggregator.triangle_count();
        self.progress
            .begin(Phase::Volume, aggregator.element_count() as u64)?;
        self.nested(|s| {
            s.out.comment(format_args!("triangle count: {triangle_total}"))?;
            s.out.line("<volume>")?;
            s.out
                .metadata(1, MetadataKind::Name.as_str(), &volume_name(VOLUME_ID))?;
            let Session {
                out,
                progress,
                summary,
                ..
            } = s;
            aggregator.try_for_each_element(|element| -> AmfResult<()> {
                progress.step()?;
                summary.element_count += 1;
                for triangle in reduce(element) {
                    debug_assert!(
                        triangle.max_index() < vertex_count,
                        "triangle {:?} references a vertex beyond {}",
                        triangle.indices,
                        vertex_count
                    );
                    write_triangle(out, &triangle)?;
                    summary.triangle_count += 1;
                }
                Ok(())
            })?;
            s.out.line("</volume>")?;
            Ok(())
        })?;
        debug_assert_eq!(self.summary.triangle_count, triangle_total);
        self.progress.end();
        self.advance(ExportState::VolumeBlockDone);
        Ok(())
    }

    fn close(&mut self) -> AmfResult<()> {
        self.out.raw("</amf>")?;
        self.out.flush()?;
        self.advance(ExportState::Closed);
        Ok(())
    }
}

fn write_vertex<W: Write>(out: &mut IndentWriter<W>, position: &Point3<f64>) -> io::Result<()> {
    out.scoped(|out| {
        out.line("<vertex>")?;
        out.scoped(|out| {
            out.line("<coordinates>")?;
            out.element(1, "x", format_args!("{:.12}", position.x))?;
            out.element(1, "y", format_args!("{:.12}", position.y))?;
            out.element(1, "z", format_args!("{:.12}", position.z))?;
            out.line("</coordinates>")
        })?;
        out.line("</vertex>")
    })
}

fn write_triangle<W: Write>(out: &mut IndentWriter<W>, triangle: &Triangle) -> io::Result<()> {
    let [v1, v2, v3] = triangle.indices;
    out.scoped(|out| {
        out.line("<triangle>")?;
        out.element(1, "v1", v1)?;
        out.element(1, "v2", v2)?;
        out.element(1, "v3", v3)?;
        out.line("</triangle>")
    })
}
