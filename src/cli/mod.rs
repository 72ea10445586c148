// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the AMF exporter

pub mod progress;
pub mod reporter;

pub use progress::ConsoleProgress;
pub use reporter::Reporter;
