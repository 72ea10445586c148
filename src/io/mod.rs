// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - AMF export, indentation writer, and mesh import

mod amf;
mod importer;
mod indent;

pub use amf::{export, object_name, volume_name, AmfExporter, ExportState, ExportSummary};
pub use importer::{load_mesh, read_stl};
pub use indent::IndentWriter;
