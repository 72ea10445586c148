// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe AMF Exporter
//!
//! Streams an unstructured mesh (vertices plus surface elements, or boundary
//! patches of a volume mesh) into an Additive Manufacturing File document.
//! Quads are fan-split into triangles, progress is reported in two phases
//! and the host may cancel between any two items.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod progress;
pub mod volume;

pub use config::{ExportConfig, Unit};
pub use error::{AmfError, AmfResult};
pub use geometry::{reduce, Triangle};
pub use io::{export, load_mesh, AmfExporter, ExportSummary};
pub use mesh::{Dimension, GridModel, UnstructuredMesh};
pub use progress::{NullProgress, Phase, ProgressReporter};
pub use volume::VolumeAggregator;

/// Load a mesh file and write it to `output` as AMF
pub fn convert_file(input: &str, output: &str, config: ExportConfig) -> AmfResult<ExportSummary> {
    let mesh = load_mesh(input)?;
    AmfExporter::with_config(&mesh, config).write_file(output, NullProgress)
}
