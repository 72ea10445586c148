// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - element decomposition

mod reduce;

pub use reduce::{reduce, Reduction, Triangle};
