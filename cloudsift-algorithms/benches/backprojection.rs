use cloudsift_algorithms::{project_to_raster, synthetic, PixelIndexKind};
use cloudsift_core::PixelIndex;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CLOUD_SIZES: [usize; 3] = [1_000, 10_000, 50_000];
const QUERIES: usize = 500;

fn backprojection(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let queries: Vec<[i64; 2]> = (0..QUERIES)
        .map(|_| [rng.gen_range(0..512), rng.gen_range(0..512)])
        .collect();

    let mut g = c.benchmark_group("backprojection");
    g.sample_size(10);

    for size in CLOUD_SIZES {
        let cloud = synthetic::cylinder(0.8, 2.0, size, &mut rng);
        let projection = project_to_raster(&cloud, 512).unwrap();

        for kind in [PixelIndexKind::BruteForce, PixelIndexKind::RTree] {
            let id = BenchmarkId::new(format!("{:?}", kind), size);
            g.bench_with_input(id, &(&projection.pixels, &queries), |b, &(pixels, queries)| {
                b.iter(|| {
                    let index = kind.build(std::hint::black_box(pixels));
                    queries
                        .iter()
                        .filter_map(|&q| index.nearest(q))
                        .sum::<usize>()
                });
            });
        }
    }

    g.finish();
}

criterion_group!(benches, backprojection);
criterion_main!(benches);
