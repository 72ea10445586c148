// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::io::ExportSummary;
use crate::mesh::{Dimension, ElementCounts};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished export
    pub fn report_export(input: &str, output: &str, summary: &ExportSummary, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {} → {}", "Exported:".bold(), input.cyan(), output.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_field("Mode", Self::mode(summary.dimension));
        Self::print_field("Unit", summary.unit.as_str());
        Self::print_field("Object", &summary.object_id.to_string());
        Self::print_field("Vertices", &summary.vertex_count.to_string());
        Self::print_field("Elements", &summary.element_count.to_string());
        Self::print_field("Triangles", &summary.triangle_count.to_string());
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report mesh statistics without exporting
    pub fn report_inspect(
        input: &str,
        dimension: Dimension,
        vertices: usize,
        patches: usize,
        counts: ElementCounts,
    ) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Mesh:".bold(), input.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_field("Mode", Self::mode(dimension));
        Self::print_field("Vertices", &vertices.to_string());
        if dimension == Dimension::Three {
            Self::print_field("Patches", &patches.to_string());
        }
        Self::print_field("Triangles", &counts.triangles.to_string());
        Self::print_field("Quads", &counts.quads.to_string());
        if counts.other > 0 {
            println!(
                "  {} {} {}",
                "Skipped:".bright_black(),
                counts.other.to_string().yellow(),
                "(not triangles or quads)".bright_black()
            );
        }
        Self::print_field("AMF triangles", &counts.triangle_count().to_string());
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn mode(dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Two => "2D surface",
            Dimension::Three => "3D boundary patches",
        }
    }

    fn print_field(name: &str, value: &str) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.cyan()
        );
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
