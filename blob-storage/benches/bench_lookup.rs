use blob_store::{BlobStore, IndexedBlobStore, LocalFileBlobStore};
use criterion::{criterion_group, criterion_main, Criterion};


fn fill(store: &dyn BlobStore, count: usize) -> Vec<blob_store::Uuid> {
    (0..count)
        .map(|i| store.save(format!("blob {i}").as_bytes(), Some("entry.bin")).unwrap())
        .collect()
}

fn lookup_benchmark(c: &mut Criterion) {
    let scan_dir = tempfile::tempdir().unwrap();
    let scan = LocalFileBlobStore::open(scan_dir.path()).unwrap();
    let scan_ids = fill(&scan, 1000);

    let indexed_dir = tempfile::tempdir().unwrap();
    let indexed = IndexedBlobStore::open(indexed_dir.path()).unwrap();
    let indexed_ids = fill(&indexed, 1000);

    c.bench_function("exists scan 1000", |b| b.iter(|| {
        for id in scan_ids.iter().step_by(100) {
            assert!(scan.exists(id));
        }
    }));
    c.bench_function("exists indexed 1000", |b| b.iter(|| {
        for id in indexed_ids.iter().step_by(100) {
            assert!(indexed.exists(id));
        }
    }));
    c.bench_function("load scan 1000", |b| b.iter(|| scan.load(&scan_ids[500]).unwrap()));
    c.bench_function("load indexed 1000", |b| b.iter(|| indexed.load(&indexed_ids[500]).unwrap()));
}

criterion_group!(benches, lookup_benchmark);
criterion_main!(benches);
