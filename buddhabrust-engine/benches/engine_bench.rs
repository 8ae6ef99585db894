use criterion::{black_box, criterion_group, criterion_main, Criterion};

use buddhabrust_core::{Complex, ExportSize, FractalKind, IterParams, ScreenSize, ViewParams, ViewWindow};
use buddhabrust_engine::{splat_cells, ColorWeights, Histogram, RenderFrame};

fn default_window() -> (ViewWindow, ExportSize) {
    let screen = ScreenSize::new(1728, 972).unwrap();
    let view = ViewParams::new(Complex::ZERO, 0.0, 0.5).unwrap();
    (ViewWindow::from_view(&view, screen), view.export_size())
}

fn bench_orbit_throughput(c: &mut Criterion) {
    let params = IterParams::default();
    let escape_sq = params.escape_radius_sq();

    c.bench_function("mandelbrot_orbit_grid_64x64", |b| {
        b.iter(|| {
            let mut total = 0u32;
            for yi in 0..64 {
                for xi in 0..64 {
                    let point = Complex::new(
                        -2.0 + 3.0 * xi as f64 / 64.0,
                        -1.2 + 2.4 * yi as f64 / 64.0,
                    );
                    let mut z = Complex::ZERO;
                    let mut z_sq = Complex::ZERO;
                    for i in 0..params.max_iterations {
                        if !FractalKind::Mandelbrot.step(
                            i,
                            &mut z,
                            &mut z_sq,
                            black_box(point),
                            escape_sq,
                            0.0,
                        ) {
                            break;
                        }
                        total += 1;
                    }
                }
            }
            black_box(total)
        });
    });
}

fn bench_splat(c: &mut Criterion) {
    let (window, export) = default_window();

    c.bench_function("splat_cells_1000_points", |b| {
        b.iter(|| {
            for i in 0..1_000 {
                let point = Complex::new(
                    -1.5 + (i % 100) as f64 * 0.03,
                    -0.9 + (i / 100) as f64 * 0.18,
                );
                black_box(splat_cells(
                    point,
                    &window,
                    export,
                    FractalKind::Mandelbrot,
                ));
            }
        });
    });
}

fn bench_deposit(c: &mut Criterion) {
    let (window, export) = default_window();
    let histogram = Histogram::new(export).unwrap();
    let cells = splat_cells(
        Complex::new(-0.3, 0.4),
        &window,
        export,
        FractalKind::Mandelbrot,
    );

    c.bench_function("histogram_deposit", |b| {
        b.iter(|| histogram.deposit(black_box(&cells)));
    });
}

fn bench_materialize(c: &mut Criterion) {
    let (_, export) = default_window();
    let counts: Vec<u32> = (0..export.len() as u32).map(|i| i % 97).collect();
    let mut frame = RenderFrame::new(export).unwrap();

    c.bench_function("materialize_960x540", |b| {
        b.iter(|| frame.materialize(black_box(&counts), 96, ColorWeights::default()));
    });
}

criterion_group!(
    benches,
    bench_orbit_throughput,
    bench_splat,
    bench_deposit,
    bench_materialize
);
criterion_main!(benches);
