use criterion::{criterion_group, criterion_main, Criterion};
use edgefirst_edges::{run, MemoryBitmap, MemoryHost, Operator};

fn noise(x: u32, y: u32) -> [u8; 4] {
    let v = (x.wrapping_mul(2654435761) ^ y.wrapping_mul(40503)) as u8;
    [v, v.wrapping_add(40), v.wrapping_mul(3), 255]
}

pub fn benchmark_transform(c: &mut Criterion) {
    let ops = [Operator::Grayscale, Operator::edge()];
    let dims = [(320, 240), (640, 480), (1280, 720), (1920, 1080)];
    let host = MemoryHost::new();

    for op in ops.iter() {
        let mut group = c.benchmark_group(format!("transform/{}", op.name()));
        for dim in dims.iter() {
            let src = MemoryBitmap::from_fn(dim.0, dim.1, 0, noise);
            let dst = MemoryBitmap::new(dim.0, dim.1);
            group.bench_with_input(
                format!("{}x{}", dim.0, dim.1),
                &(src, dst),
                |b, bitmaps| b.iter(|| run(&host, &bitmaps.0, &bitmaps.1, *op)),
            );
        }
        group.finish();
    }
}

criterion_group!(benches, benchmark_transform);
criterion_main!(benches);
