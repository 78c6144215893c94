use std::fmt::Write;

use crate::items::ItemSet;
use crate::layout::{Container, Layout};

const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Glyph used for the placement at `index`.
pub fn glyph_for(index: usize) -> char {
    GLYPHS[index % GLYPHS.len()] as char
}

/// Rasterize a layout into a character grid `columns` wide, followed by a
/// legend line per placement.
///
/// Each cell takes the glyph of the last placement covering its center;
/// uncovered cells are `.`.
pub fn render_ascii(items: &ItemSet, layout: &Layout, container: &Container, columns: usize) -> String {
    let columns = columns.max(1);
    let width = container.width().max(1) as f64;
    let height = container.height().max(1) as f64;
    let cell_w = width / columns as f64;
    let cell_h = cell_w * CELL_ASPECT;
    let rows = ((height / cell_h).ceil() as usize).max(1);

    let mut grid = vec![b'.'; columns * rows];
    for (index, p) in layout.placements.iter().enumerate() {
        let glyph = GLYPHS[index % GLYPHS.len()];
        let (x0, x1) = (p.left as f64, p.left as f64 + p.width as f64);
        let (y0, y1) = (p.top as f64, p.top as f64 + p.height as f64);
        for row in 0..rows {
            let cy = (row as f64 + 0.5) * cell_h;
            if cy < y0 || cy >= y1 {
                continue;
            }
            for col in 0..columns {
                let cx = (col as f64 + 0.5) * cell_w;
                if cx >= x0 && cx < x1 {
                    grid[row * columns + col] = glyph;
                }
            }
        }
    }

    let mut out = String::with_capacity((columns + 1) * rows + layout.len() * 48);
    for line in grid.chunks_exact(columns) {
        out.extend(line.iter().map(|&b| b as char));
        out.push('\n');
    }

    for (index, p) in layout.placements.iter().enumerate() {
        let name = items.get(p.item).map(|i| i.name.as_str()).unwrap_or("?");
        let _ = writeln!(
            out,
            "{} {:<24} {}x{} at ({}, {})",
            glyph_for(index),
            truncate_label(name, 24),
            p.width,
            p.height,
            p.left,
            p.top
        );
    }
    out
}

fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    if max_chars <= 3 {
        return "...".to_string();
    }
    let truncated: String = name.chars().take(max_chars - 3).collect();
    format!("{}...", truncated)
}
