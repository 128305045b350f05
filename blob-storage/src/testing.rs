//! Shared helpers for the store tests.

use std::io::Read;
use std::thread;
use uuid::Uuid;
use crate::store::{BlobHandle, BlobStore};

const WORKERS: usize = 8;
const ROUNDS: usize = 12;

/// Blobs left on disk by [`concurrent_round_trips`]: every odd round of every worker.
pub const KEPT_PER_RUN: usize = WORKERS * ROUNDS / 2;

pub fn read_all(handle: BlobHandle) -> Vec<u8> {
    let mut data = Vec::new();
    let mut file = handle.file;
    file.read_to_end(&mut data).unwrap();
    data
}

/// Non-text payloads: control bytes, every byte value, and one large enough
/// to span many write and read buffers.
pub fn binary_payloads() -> Vec<Vec<u8>> {
    vec![
        vec![0u8],
        (0..=255u8).collect(),
        vec![0x00, 0xff, 0x00, b'\r', b'\n', 0x1a, 0x00],
        (0..3 * 1024 * 1024).map(|i: usize| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect(),
    ]
}

fn worker_payload(worker: usize, round: usize) -> Vec<u8> {
    (0..64 * 1024 + round * 997)
        .map(|i| (i * 31 + worker * 7 + round) as u8)
        .collect()
}

/// Runs save/load/delete/exists from several threads at once, each on its own
/// ids, then checks that what every thread kept is intact and what it deleted
/// is gone.
pub fn concurrent_round_trips(store: &dyn BlobStore) {
    let (kept, deleted): (Vec<_>, Vec<_>) = thread::scope(|scope| {
        let workers: Vec<_> = (0..WORKERS)
            .map(|worker| {
                scope.spawn(move || {
                    let mut kept = Vec::new();
                    let mut deleted = Vec::new();
                    for round in 0..ROUNDS {
                        let payload = worker_payload(worker, round);
                        let id = store.save(&payload, Some("chunk.bin")).unwrap();
                        assert!(store.exists(&id));
                        assert_eq!(read_all(store.load(&id).unwrap()), payload);

                        if round % 2 == 0 {
                            let outcome = store.delete(&id).unwrap();
                            assert_eq!(outcome.removed, 1);
                            assert!(outcome.is_complete());
                            assert!(!store.exists(&id));
                            deleted.push(id);
                        } else {
                            kept.push((id, payload));
                        }
                    }
                    (kept, deleted)
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .fold((Vec::new(), Vec::new()), |(mut kept, mut deleted), (k, d)| {
                kept.extend(k);
                deleted.extend(d);
                (kept, deleted)
            })
    });

    assert_eq!(kept.len(), KEPT_PER_RUN);
    for (id, payload) in &kept {
        assert!(store.exists(id));
        assert_eq!(&read_all(store.load(id).unwrap()), payload);
    }
    for id in &deleted {
        assert!(!store.exists(id));
    }

    let mut ids: Vec<Uuid> = kept.iter().map(|(id, _)| *id).chain(deleted.iter().copied()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), WORKERS * ROUNDS);
}
