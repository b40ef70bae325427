use criterion::*;
use tachyon_md5::crypto::hash::md5::{self, Md5};
use tachyon_md5::utils::human_readable_size;
use tachyon_md5::{_bench_main, _impl_bench_trait_for_criterion};

_impl_bench_trait_for_criterion!(Criterion);

fn bench_md5_bytes(c: &mut impl BenchTrait, size: usize) {
    let data = vec![0u8; size];

    let mut md5 = Md5::new();
    let test_name = format!("md5 bytes {}", human_readable_size(size));
    c.bench(&test_name, size, #[inline(always)] || {
        md5.start().append_bytes(&data);
        std::hint::black_box(md5.finalize());
    });
}

fn bench_md5_text(c: &mut impl BenchTrait, size: usize) {
    // mixed 1/2/3/4-byte code points
    let text: String = "aé☕😋".chars().cycle().take(size / 10 * 4).collect();
    let units: Vec<u16> = text.encode_utf16().collect();

    let test_name = format!("md5 utf-16 {}", human_readable_size(text.len()));
    c.bench(&test_name, text.len(), #[inline(always)] || {
        std::hint::black_box(md5::hash_utf16(&units).ok());
    });

    let test_name = format!("md5 utf-8 {}", human_readable_size(text.len()));
    c.bench(&test_name, text.len(), #[inline(always)] || {
        std::hint::black_box(md5::hash_text(&text));
    });
}

fn bench_md5_ascii(c: &mut impl BenchTrait, size: usize) {
    let text: String = ('a'..='z').cycle().take(size).collect();

    let test_name = format!("md5 ascii {}", human_readable_size(size));
    c.bench(&test_name, size, #[inline(always)] || {
        std::hint::black_box(md5::hash_ascii_text(&text));
    });
}

fn bench_md5(c: &mut Criterion) {

    fn bench_crate_md5_hash(c: &mut Criterion, size: usize) {
        let data = vec![0u8; size];

        let test_name = format!("crate md5 hash {}", human_readable_size(size));
        c.bench_function(&test_name, |b| b.iter(|| {
            black_box(::md5::compute(&data));
        }));
    }

    for size in [16, 64, 256, 1024, 8192, 65536] {
        bench_md5_bytes(c, size);
        bench_crate_md5_hash(c, size);
        bench_md5_ascii(c, size);
    }
    bench_md5_text(c, 1024);
    bench_md5_text(c, 65536);
}

criterion_group!(benches, bench_md5);
// criterion_main!(benches);
_bench_main!(benches, bench_md5_bytes);
