use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ring_arith::dft::{Convolution, NttEngine};
use ring_arith::modulus::WordOps;
use ring_arith::TransformCache;
use sampling::source::Source;

fn ntt(c: &mut Criterion) {
    fn runner<'a, const INPLACE: bool>(
        engine: NttEngine<'a>,
        n: usize,
        q: u64,
    ) -> Box<dyn FnMut() + 'a> {
        let mut a: Vec<u64> = vec![0; n];
        Source::new([0u8; 32]).fill_residues(q, &mut a);
        if INPLACE {
            Box::new(move || {
                engine.forward_inplace(&mut a, n, q, 1).unwrap();
                engine.inverse_inplace(&mut a, n, q, 1).unwrap();
            })
        } else {
            let mut b: Vec<u64> = vec![0; n];
            Box::new(move || {
                engine.forward(&mut b, &a, n, q, 1, 1).unwrap();
                engine.inverse(&mut a, &b, n, q, 1, 1).unwrap();
            })
        }
    }

    let q: u64 = 0x1fffffffffe00001u64;
    let cache: TransformCache = TransformCache::default();

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("ntt_round_trip");

    for log_n in 10..17 {
        let n: usize = 1 << log_n;
        cache.get_or_create(n, q).unwrap();

        let cyclic: NttEngine = NttEngine::new(&cache);
        let negacyclic: NttEngine = NttEngine::new(&cache).with_convolution(Convolution::Negacyclic);

        let runners: [(String, Box<dyn FnMut() + '_>); 3] = [
            (format!("cyclic/inplace=true/q={}", q.log2()), { runner::<true>(cyclic, n, q) }),
            (format!("cyclic/inplace=false/q={}", q.log2()), { runner::<false>(cyclic, n, q) }),
            (format!("negacyclic/inplace=true/q={}", q.log2()), {
                runner::<true>(negacyclic, n, q)
            }),
        ];

        for (name, mut runner) in runners {
            let id: BenchmarkId = BenchmarkId::new(name, format!("n={}", n));
            b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| b.iter(&mut runner));
        }
    }
}

fn ntt_strided(c: &mut Criterion) {
    let q: u64 = 0x1fffffffffe00001u64;
    let n: usize = 1 << 12;
    let cache: TransformCache = TransformCache::default();
    let engine: NttEngine = NttEngine::new(&cache);

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("ntt_strided");

    for stride in [1, 2, 4, 8] {
        let mut a: Vec<u64> = vec![0; n * stride];
        Source::new([0u8; 32]).fill_residues(q, &mut a);
        let id: BenchmarkId = BenchmarkId::new(format!("stride={}", stride), format!("n={}", n));
        b.bench_with_input(id, &(), |b: &mut criterion::Bencher<'_>, _| {
            b.iter(|| {
                engine.forward_inplace(&mut a, n, q, stride).unwrap();
                engine.inverse_inplace(&mut a, n, q, stride).unwrap();
            })
        });
    }
}

criterion_group!(benches, ntt, ntt_strided);
criterion_main!(benches);
