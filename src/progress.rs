// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Two-phase progress reporting with cooperative cancellation
//!
//! An export runs exactly two phases, vertices then volume. Each phase
//! announces its total and then advances once per source item. The host may
//! answer any call with [`ControlFlow::Break`], at which point the export
//! stops before touching the next item.

use crate::error::{AmfError, AmfResult};
use std::fmt;
use std::ops::ControlFlow;
use tracing::debug;

/// Export phase, in the fixed order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Vertices,
    Volume,
}

impl Phase {
    /// Number of phases every export announces
    pub const COUNT: usize = 2;

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Vertices => "vertex",
            Phase::Volume => "volume",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-side progress channel
pub trait ProgressReporter {
    /// Called once before the first phase
    fn begin_export(&mut self, _phase_count: usize) {}

    /// Announce a phase and its step total
    fn begin_phase(&mut self, phase: Phase, total: u64) -> ControlFlow<()>;

    /// Advance the current phase by one step
    fn increment(&mut self) -> ControlFlow<()>;

    /// Called when a phase has visited all of its items
    fn end_phase(&mut self, _phase: Phase) {}
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &mut P {
    fn begin_export(&mut self, phase_count: usize) {
        (**self).begin_export(phase_count)
    }

    fn begin_phase(&mut self, phase: Phase, total: u64) -> ControlFlow<()> {
        (**self).begin_phase(phase, total)
    }

    fn increment(&mut self) -> ControlFlow<()> {
        (**self).increment()
    }

    fn end_phase(&mut self, phase: Phase) {
        (**self).end_phase(phase)
    }
}

/// Reporter that never cancels and shows nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn begin_phase(&mut self, _phase: Phase, _total: u64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn increment(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Maps traversal steps onto a [`ProgressReporter`] and turns a host
/// cancellation into [`AmfError::Cancelled`].
pub struct ProgressBridge<P> {
    reporter: P,
    phase: Option<Phase>,
    completed: u64,
    total: u64,
}

impl<P: ProgressReporter> ProgressBridge<P> {
    pub fn new(mut reporter: P) -> Self {
        reporter.begin_export(Phase::COUNT);
        Self {
            reporter,
            phase: None,
            completed: 0,
            total: 0,
        }
    }

    /// Start a phase sized by `total` steps
    pub fn begin(&mut self, phase: Phase, total: u64) -> AmfResult<()> {
        debug_assert!(
            self.phase.is_none(),
            "phase {:?} still open",
            self.phase
        );
        debug!(%phase, total, "begin progress phase");
        self.phase = Some(phase);
        self.completed = 0;
        self.total = total;
        match self.reporter.begin_phase(phase, total) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(self.cancelled()),
        }
    }

    /// Advance by one source item. Must be called before the item is written.
    pub fn step(&mut self) -> AmfResult<()> {
        match self.reporter.increment() {
            ControlFlow::Continue(()) => {
                self.completed += 1;
                Ok(())
            }
            ControlFlow::Break(()) => Err(self.cancelled()),
        }
    }

    /// Close the current phase
    pub fn end(&mut self) {
        if let Some(phase) = self.phase.take() {
            debug!(%phase, completed = self.completed, "end progress phase");
            self.reporter.end_phase(phase);
        }
    }

    /// Steps completed in the current (or last) phase
    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn into_inner(self) -> P {
        self.reporter
    }

    fn cancelled(&self) -> AmfError {
        let phase = self.phase.unwrap_or(Phase::Vertices);
        debug!(%phase, completed = self.completed, "export cancelled by host");
        AmfError::Cancelled {
            phase,
            completed: self.completed,
            total: self.total,
        }
    }
}
