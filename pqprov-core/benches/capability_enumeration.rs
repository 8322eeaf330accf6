use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pqprov_core::{get_capabilities, RegistryBuilder};

fn bench_enumeration(c: &mut Criterion) {
    let Ok(registry) = RegistryBuilder::from_catalog().freeze() else {
        return;
    };

    for class in ["TLS-GROUP", "TLS-SIGALG"] {
        c.bench_function(&format!("enumerate_{}", class.to_ascii_lowercase()), |bencher| {
            bencher.iter(|| {
                let mut n = 0usize;
                let ok = get_capabilities(&registry, black_box(class), |p| {
                    n += p.len();
                    true
                });
                black_box((ok, n))
            })
        });
    }

    c.bench_function("freeze_default_catalog", |bencher| {
        bencher.iter(|| black_box(RegistryBuilder::from_catalog().freeze().is_ok()))
    });
}

criterion_group!(benches, bench_enumeration);
criterion_main!(benches);
