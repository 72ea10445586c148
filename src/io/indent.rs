// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Nesting-aware line writer
//!
//! Every line is prefixed with one tab per nesting level. Output goes
//! straight to the sink; nothing is buffered here beyond what the sink does.

use quick_xml::escape::escape;
use std::fmt::Display;
use std::io::{self, Write};

const TABS: &[u8] = b"\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t";

/// Line writer with a nesting depth
pub struct IndentWriter<W> {
    sink: W,
    depth: usize,
}

impl<W: Write> IndentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, depth: 0 }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_scope(&mut self) {
        self.depth += 1;
    }

    pub fn exit_scope(&mut self) {
        debug_assert!(self.depth > 0, "exit_scope without matching enter_scope");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `body` one level deeper. The depth is restored whether or not
    /// `body` succeeds.
    pub fn scoped<T, E, F>(&mut self, body: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        self.enter_scope();
        let result = body(self);
        self.exit_scope();
        result
    }

    /// Write `text` at the current depth
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        self.line_at(0, text)
    }

    /// Write `text` at `extra` levels below the current depth
    pub fn line_at(&mut self, extra: usize, text: impl Display) -> io::Result<()> {
        self.indent(self.depth + extra)?;
        writeln!(self.sink, "{text}")
    }

    /// `<!-- text -->` annotation line
    pub fn comment(&mut self, text: impl Display) -> io::Result<()> {
        self.indent(self.depth)?;
        writeln!(self.sink, "<!-- {text} -->")
    }

    /// `<name>value</name>` on one line, `extra` levels deep
    pub fn element(&mut self, extra: usize, name: &str, value: impl Display) -> io::Result<()> {
        self.indent(self.depth + extra)?;
        writeln!(self.sink, "<{name}>{value}</{name}>")
    }

    /// `<metadata type='kind'>value</metadata>`, `extra` levels deep. The
    /// value is XML-escaped.
    pub fn metadata(&mut self, extra: usize, kind: &str, value: &str) -> io::Result<()> {
        self.indent(self.depth + extra)?;
        writeln!(self.sink, "<metadata type='{kind}'>{}</metadata>", escape(value))
    }

    /// Write `text` with no indentation
    pub fn raw(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.sink, "{text}")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn indent(&mut self, mut width: usize) -> io::Result<()> {
        while width > 0 {
            let chunk = width.min(TABS.len());
            self.sink.write_all(&TABS[..chunk])?;
            width -= chunk;
        }
        Ok(())
    }
}
