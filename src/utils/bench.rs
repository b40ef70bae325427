/// Defines `BenchTrait` for the criterion type `$name` and for a plain
/// iteration range, so one bench body serves both criterion runs and
/// profiler-friendly loops.
#[macro_export]
macro_rules! _impl_bench_trait_for_criterion {
    ($name:ident) => {
        pub trait BenchTrait {
            fn bench<F>(&mut self, name: &str, bytes: usize, f: F) where F: FnMut();
        }

        impl BenchTrait for std::ops::Range<usize> {
            #[inline(always)]
            fn bench<F>(&mut self, _name: &str, _bytes: usize, mut f: F) where F: FnMut() {
                for _ in self {
                    f();
                }
            }
        }

        impl BenchTrait for $name {
            #[inline(always)]
            fn bench<F>(&mut self, name: &str, bytes: usize, mut f: F) where F: FnMut() {
                let mut group = self.benchmark_group("md5");
                group.throughput(Throughput::Bytes(bytes as u64));
                group.bench_function(name, |b| b.iter(|| {
                    f();
                }));
                group.finish();
            }
        }
    };
}

/// Generates `main` for a bench target.
///
/// With `--bench` (what `cargo bench` passes) the criterion group `$name`
/// runs. Otherwise `$fn` is driven in a plain loop over a 64 KiB input, or
/// over the size given as the first argument, which is convenient under a
/// profiler.
#[macro_export]
macro_rules! _bench_main {
    ($name:ident, $fn:ident$(,)?) => {
        fn main() {
            if std::env::args().any(|arg| arg == "--bench") {
                $name();
                Criterion::default().configure_from_args().final_summary();
                return;
            }
            let size = std::env::args()
                .nth(1)
                .and_then(|arg| arg.parse::<usize>().ok())
                .unwrap_or(65536);
            let mut range = 0..100000;

            $fn(&mut range, size);
        }
    };
}
