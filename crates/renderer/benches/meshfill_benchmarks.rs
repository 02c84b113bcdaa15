//! Benchmarks for mesh-fill rendering and PNG export.
//!
//! Run with: cargo bench --package renderer --bench meshfill_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use netcdf_parser::{CurvilinearGrid, GridVariable};
use plot_common::CoordinateRange;
use projection::{Projection, ProjectionType};
use renderer::{Canvas, Meshfill};
use test_utils::{
    create_curvilinear_centers, create_curvilinear_corners, create_sample_values, CurveGridSpec,
};

fn southern_variable(nj: usize, ni: usize) -> GridVariable {
    let spec = CurveGridSpec {
        nj,
        ni,
        ..CurveGridSpec::sample()
    };
    let (lat, lon) = create_curvilinear_centers(&spec);
    let (corner_lat, corner_lon) = create_curvilinear_corners(&spec);
    let values = create_sample_values(&lat, &lon);
    let grid = CurvilinearGrid::with_corners(nj, ni, lat, lon, 4, corner_lat, corner_lon)
        .expect("valid synthetic grid");
    let southern = CoordinateRange::latitude(-90.0, 0.0).expect("valid range");
    GridVariable::new("sample", values, grid)
        .and_then(|v| v.select(&[southern]))
        .expect("non-empty selection")
}

fn method(kind: ProjectionType, mesh: bool) -> Meshfill {
    let mut method = Meshfill::new("bench");
    method.set_projection(Projection::new(kind));
    method.set_mesh(mesh);
    method
}

// =============================================================================
// GRID SIZE
// =============================================================================

fn bench_grid_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("meshfill_grid_size");

    for (nj, ni) in [(32, 48), (90, 180), (180, 360)] {
        let data = southern_variable(nj, ni);
        let polar = method(ProjectionType::Polar, true);
        group.throughput(Throughput::Elements(data.values.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", nj, ni)),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut canvas =
                        Canvas::with_dimensions(1200, 1091, "rainbow").expect("canvas");
                    black_box(canvas.plot(data, &polar, true).expect("render"))
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// PROJECTIONS
// =============================================================================

fn bench_projections(c: &mut Criterion) {
    let mut group = c.benchmark_group("meshfill_projection");
    let data = southern_variable(90, 180);

    for kind in ProjectionType::ALL {
        let m = method(kind, true);
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                let mut canvas = Canvas::new("rainbow").expect("canvas");
                black_box(canvas.plot(&data, &m, true).expect("render"))
            });
        });
    }

    group.finish();
}

// =============================================================================
// MESH LINES AND EXPORT
// =============================================================================

fn bench_mesh_and_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("meshfill_output");
    let data = southern_variable(32, 48);

    for mesh in [false, true] {
        let m = method(ProjectionType::Polar, mesh);
        group.bench_function(if mesh { "mesh_on" } else { "mesh_off" }, |b| {
            b.iter(|| {
                let mut canvas = Canvas::new("rainbow").expect("canvas");
                black_box(canvas.plot(&data, &m, true).expect("render"))
            });
        });
    }

    let mut canvas = Canvas::with_dimensions(1200, 1091, "rainbow").expect("canvas");
    canvas
        .plot(&data, &method(ProjectionType::Polar, true), true)
        .expect("render");
    group.bench_function("encode_png_1200x1091", |b| {
        b.iter(|| black_box(canvas.encode_png().expect("encode")))
    });

    group.finish();
}

criterion_group!(benches, bench_grid_sizes, bench_projections, bench_mesh_and_export);
criterion_main!(benches);
