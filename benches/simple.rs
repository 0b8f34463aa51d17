use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

fn long_short_map(n: i64) {
    let mut map = long_short_map::FxLongShortMap::default();
    for i in 0..n {
        map.put(i, i as i16);
    }
    for i in 0..n {
        black_box(map.get(i));
    }
}

fn long_short_map_churn(n: i64) {
    let mut map = long_short_map::FxLongShortMap::default();
    for i in 0..n {
        map.adjust_or_put_value(i % 64, 1, 1);
        map.remove_key((i + 32) % 64);
    }
    black_box(map.len());
}

fn hashbrown(n: i64) {
    let mut map = hashbrown::HashMap::<i64, i16, ahash::RandomState>::with_capacity_and_hasher(
        n as usize,
        ahash::RandomState::default(),
    );
    for i in 0..n {
        map.insert(i, i as i16);
    }
    for i in 0..n {
        black_box(map.get(&i));
    }
}

fn std_hashmap(n: i64) {
    let mut map = std::collections::HashMap::<i64, i16>::with_capacity(n as usize);
    for i in 0..n {
        map.insert(i, i as i16);
    }
    for i in 0..n {
        black_box(map.get(&i));
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    for n in [16, 256, 4096] {
        c.bench_function(&format!("longshortmap-simple-{n}"), |b| {
            b.iter(|| long_short_map(n))
        });
        c.bench_function(&format!("hashbrown-simple-{n}"), |b| b.iter(|| hashbrown(n)));
        c.bench_function(&format!("stdhashmap-simple-{n}"), |b| {
            b.iter(|| std_hashmap(n))
        });
    }
    c.bench_function("longshortmap-churn-4096", |b| {
        b.iter(|| long_short_map_churn(4096))
    });
}

#[cfg(unix)]
mod profile {
    use std::{fs::File, path::Path};

    use criterion::profiler::Profiler;
    use pprof::ProfilerGuard;

    pub struct FlamegraphProfiler<'a> {
        frequency: core::ffi::c_int,
        active_profiler: Option<ProfilerGuard<'a>>,
    }

    impl<'a> FlamegraphProfiler<'a> {
        #[allow(dead_code)]
        pub fn new(frequency: core::ffi::c_int) -> Self {
            FlamegraphProfiler {
                frequency,
                active_profiler: None,
            }
        }
    }

    impl<'a> Profiler for FlamegraphProfiler<'a> {
        fn start_profiling(&mut self, _benchmark_id: &str, _benchmark_dir: &Path) {
            self.active_profiler = Some(ProfilerGuard::new(self.frequency).unwrap());
        }

        fn stop_profiling(&mut self, _benchmark_id: &str, benchmark_dir: &Path) {
            std::fs::create_dir_all(benchmark_dir).unwrap();
            let flamegraph_path = benchmark_dir.join("flamegraph.svg");
            let flamegraph_file = File::create(flamegraph_path)
                .expect("File system error while creating flamegraph.svg");
            if let Some(profiler) = self.active_profiler.take() {
                profiler
                    .report()
                    .build()
                    .unwrap()
                    .flamegraph(flamegraph_file)
                    .expect("Error writing flamegraph");
            }
        }
    }
}

#[cfg(unix)]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(profile::FlamegraphProfiler::new(100));
    targets = criterion_benchmark
}
#[cfg(not(unix))]
criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
