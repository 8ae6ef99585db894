use buddhabrust_core::{Complex, ExportSize, FractalKind, Symmetry, ViewWindow};

use crate::histogram::Histogram;

/// Weight deposited on the center cell of a splat; the four grid-adjacent
/// neighbors get 1 each, approximating an anti-aliased density kernel.
const CENTER_WEIGHT: u32 = 2;
const NEIGHBOR_WEIGHT: u32 = 1;

/// Collect the splat for one mapped grid position: the center cell and its
/// in-bounds up/down/left/right neighbors. Neighbors falling off the grid are
/// skipped, never wrapped onto an adjacent row.
fn splat_at(cells: &mut Vec<(usize, u32)>, px: f64, py: f64, export: ExportSize) {
    if !export.contains(px, py) {
        return;
    }
    let (x, y) = (px as i64, py as i64);
    let offsets: [(i64, i64, u32); 5] = [
        (0, 0, CENTER_WEIGHT),
        (-1, 0, NEIGHBOR_WEIGHT),
        (1, 0, NEIGHBOR_WEIGHT),
        (0, -1, NEIGHBOR_WEIGHT),
        (0, 1, NEIGHBOR_WEIGHT),
    ];
    for (dx, dy, weight) in offsets {
        let (nx, ny) = (x + dx, y + dy);
        if 0 <= nx && nx < export.width as i64 && 0 <= ny && ny < export.height as i64 {
            cells.push((export.index(nx as u32, ny as u32), weight));
        }
    }
}

/// Compute every `(cell index, weight)` pair one trajectory point deposits.
///
/// Points outside the view window are discarded up front. Surviving points
/// are folded onto the variant's symmetric half, expanded with their mirror
/// image where the variant has one, mapped into the export grid (with the
/// variant's plot offset), and splatted. Mapped positions that land outside
/// the grid contribute nothing.
pub fn splat_cells(
    point: Complex,
    window: &ViewWindow,
    export: ExportSize,
    kind: FractalKind,
) -> Vec<(usize, u32)> {
    if !window.contains(point) {
        return Vec::new();
    }

    let point = kind.fold_point(point);
    let origin = kind.plot_offset();
    let mut cells = Vec::with_capacity(10);

    let (px, py) = window.to_pixel(point, export, origin);
    splat_at(&mut cells, px, py, export);

    match kind.symmetry() {
        Symmetry::None => {}
        Symmetry::Vertical => {
            let mirror = Complex::new(point.re, -point.im);
            let (mx, my) = window.to_pixel(mirror, export, origin);
            splat_at(&mut cells, mx, my, export);
        }
        Symmetry::Horizontal => {
            let mirror = Complex::new(-point.re, point.im);
            let (mx, my) = window.to_pixel(mirror, export, origin);
            splat_at(&mut cells, mx, my, export);
        }
    }

    cells
}

/// Plot one trajectory point: compute its splat and deposit it as a single
/// critical section.
pub fn plot(histogram: &Histogram, point: Complex, window: &ViewWindow, export: ExportSize, kind: FractalKind) {
    let cells = splat_cells(point, window, export, kind);
    if !cells.is_empty() {
        histogram.deposit(&cells);
    }
}
