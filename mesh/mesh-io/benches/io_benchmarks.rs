//! Benchmarks for binary STL export.
//!
//! Run with: cargo bench -p mesh-io
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-io -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-io -- --baseline main

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_io::{read_stl, save_stl, write_stl};
use mesh_types::{Triangle, TriangleMesh};
use tempfile::tempdir;

/// Wavy surface sheet with `n x n` quads, two triangles each.
fn create_sheet(n: u32) -> TriangleMesh {
    let z = |x: f64, y: f64| 1.0 + (x * 0.3).sin() * (y * 0.2).cos();
    let mut mesh = TriangleMesh::with_capacity((n * n * 2) as usize);
    for j in 0..n {
        for i in 0..n {
            let (x0, y0) = (f64::from(i), f64::from(j));
            let (x1, y1) = (x0 + 1.0, y0 + 1.0);
            let p00 = [x0, y0, z(x0, y0)];
            let p10 = [x1, y0, z(x1, y0)];
            let p01 = [x0, y1, z(x0, y1)];
            let p11 = [x1, y1, z(x1, y1)];
            mesh.push(Triangle::from_arrays(p00, p10, p11));
            mesh.push(Triangle::from_arrays(p00, p11, p01));
        }
    }
    mesh
}

fn bench_write_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("stl_write_memory");
    for n in [64u32, 256] {
        let mesh = create_sheet(n);
        group.throughput(Throughput::Elements(mesh.len() as u64));
        group.bench_function(format!("sheet_{n}"), |b| {
            b.iter(|| {
                let mut buf = Vec::with_capacity(mesh_io::stl_file_size(mesh.len()));
                write_stl(black_box(&mesh), &mut buf).ok();
                buf
            });
        });
    }
    group.finish();
}

fn bench_save_file(c: &mut Criterion) {
    let dir = tempdir().ok();
    let Some(dir) = dir.as_ref() else {
        return;
    };
    let mesh = create_sheet(256);
    let path = dir.path().join("bench.stl");
    c.bench_function("stl_save_file_sheet_256", |b| {
        b.iter(|| save_stl(black_box(&mesh), &path).ok());
    });
}

fn bench_read(c: &mut Criterion) {
    let mesh = create_sheet(256);
    let mut buf = Vec::new();
    write_stl(&mesh, &mut buf).ok();
    c.bench_function("stl_read_sheet_256", |b| {
        b.iter(|| read_stl(black_box(buf.as_slice())).ok());
    });
}

criterion_group!(benches, bench_write_memory, bench_save_file, bench_read);
criterion_main!(benches);
