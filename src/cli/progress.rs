// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Terminal progress bars for exports

use crate::progress::{Phase, ProgressReporter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const TEMPLATE: &str =
    "{spinner:.green} {msg:>8} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// One indicatif bar per phase, cancellable through a shared flag
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
    cancel: Arc<AtomicBool>,
    hidden: bool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            bar: None,
            cancel: Arc::new(AtomicBool::new(false)),
            hidden: false,
        }
    }

    /// Reporter that tracks progress without drawing
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::new()
        }
    }

    /// Flag that cancels the export at the next step once set
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Position of the current bar
    pub fn position(&self) -> u64 {
        self.bar.as_ref().map(ProgressBar::position).unwrap_or(0)
    }

    fn flow(&self) -> ControlFlow<()> {
        if self.cancel.load(Ordering::Relaxed) {
            if let Some(bar) = &self.bar {
                bar.abandon_with_message("cancelled");
            }
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn begin_phase(&mut self, phase: Phase, total: u64) -> ControlFlow<()> {
        let bar = ProgressBar::new(total);
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(phase.as_str());
        self.bar = Some(bar);
        self.flow()
    }

    fn increment(&mut self) -> ControlFlow<()> {
        let flow = self.flow();
        if flow.is_continue() {
            if let Some(bar) = &self.bar {
                bar.inc(1);
            }
        }
        flow
    }

    fn end_phase(&mut self, _phase: Phase) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }
}
