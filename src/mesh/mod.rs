// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh module - grid model access and the in-memory reference mesh

mod cursor;
mod model;
mod unstructured;

pub use cursor::{Elements, Patches, Vertices};
pub use model::{Dimension, Element, ElementCounts, ElementSource, GridModel, Topology};
pub use unstructured::{Patch, UnstructuredMesh};
