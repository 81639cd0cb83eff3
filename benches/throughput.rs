use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use msgdict::{
    core::table::Table,
    persist::json_file::JsonFile,
    record::{Message, Record},
};

fn record(i: u64) -> Record {
    let mut message = Message::localized("en", format!("message {i}"));
    message.set_locale("id", format!("pesan {i}"));
    Record::new(format!("E{i:06}"), message)
}

fn filled(n: u64) -> Table {
    (0..n).map(record).collect::<Vec<_>>().into()
}

fn bench_table_ops(c: &mut Criterion) {
    c.bench_function("table_insert_10k", |b| {
        b.iter(|| {
            let mut table = Table::new();
            for i in 0..10_000u64 {
                table.insert(record(i));
            }
            table
        });
    });

    let mut group = c.benchmark_group("table_find");
    for size in [100u64, 1_000, 10_000] {
        let table = filled(size);
        let last = format!("E{:06}", size - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| table.find(&last).len());
        });
    }
    group.finish();
}

fn bench_persist(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let tmp = tempfile::TempDir::new().expect("tmp");
    let file = JsonFile::new(tmp.path().join("bench.json"));
    let table = filled(2_000);

    c.bench_function("json_write_2k", |b| {
        b.iter(|| rt.block_on(file.write(&table)).expect("write"));
    });

    rt.block_on(file.write(&table)).expect("seed");
    c.bench_function("json_read_2k", |b| {
        b.iter(|| rt.block_on(file.read_table()).expect("read"));
    });
}

criterion_group!(benches, bench_table_ops, bench_persist);
criterion_main!(benches);
