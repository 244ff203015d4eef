//! Concurrency and thread safety tests for Docflow
//!
//! The ledger promises gap-free numbering per identity and at most one
//! decision per version no matter how many threads race.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use docflow::{
    ApprovalStatus, Decision, FileDescriptor, IngestionService, LedgerError, VersionLedger,
};

fn shared_service() -> Arc<IngestionService> {
    Arc::new(IngestionService::builder().build().expect("default service"))
}

#[test]
fn concurrent_uploads_of_one_identity_are_numbered_one_to_n() {
    let service = shared_service();
    let num_threads = 16;

    let handles: Vec<_> = (0..num_threads)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                // Every name resolves to the same identity.
                let name = format!("planta_baixa_v{i}.dwg");
                let outcomes = service.ingest(
                    "Projeto Alpha",
                    &format!("user-{i}"),
                    &[FileDescriptor::new(name, 1_000, "")],
                );
                outcomes[0].version().expect("accepted").version_number
            })
        })
        .collect();

    let mut numbers: Vec<u64> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=num_threads as u64).collect::<Vec<_>>());

    let identity = service.resolve("Projeto Alpha", "planta_baixa.dwg");
    let history = service.history(&identity);
    assert_eq!(history.len(), num_threads);
    for (idx, version) in history.iter().enumerate() {
        assert_eq!(version.version_number, idx as u64 + 1);
    }
}

#[test]
fn concurrent_uploads_continue_from_prior_length() {
    let service = shared_service();
    for _ in 0..3 {
        service.ingest("P1", "seed", &[FileDescriptor::new("memorial.pdf", 1, "")]);
    }

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                service.ingest("P1", "racer", &[FileDescriptor::new("Memorial_v9.PDF", 1, "")])
            })
        })
        .collect();

    let mut numbers: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("thread panicked"))
        .map(|o| o.version().expect("accepted").version_number)
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (4..=13).collect::<Vec<u64>>());
}

#[test]
fn no_data_races_on_independent_documents() {
    let service = shared_service();
    let num_threads = 20;
    let docs_per_thread = 10;

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let files: Vec<FileDescriptor> = (0..docs_per_thread)
                    .map(|d| FileDescriptor::new(format!("doc_{t}_{d}.pdf"), 10, ""))
                    .collect();
                service.ingest(&format!("project-{}", t % 4), "bulk", &files)
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for outcome in handle.join().expect("thread panicked") {
            let version = outcome.version().expect("accepted");
            assert_eq!(version.version_number, 1);
            assert!(ids.insert(version.version_id));
        }
    }
    assert_eq!(ids.len(), num_threads * docs_per_thread);
    assert_eq!(
        service.summary(None).documents as usize,
        num_threads * docs_per_thread
    );
}

#[test]
fn racing_reviewers_yield_exactly_one_decision() {
    let service = shared_service();
    let outcomes = service.ingest("P1", "maria", &[FileDescriptor::new("corte_aa.dwg", 1, "")]);
    let identity = outcomes[0].version().expect("accepted").identity.clone();

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let service = Arc::clone(&service);
            let identity = identity.clone();
            thread::spawn(move || {
                let decision = if i % 2 == 0 {
                    Decision::Approve
                } else {
                    Decision::Reject
                };
                service.decide(&identity, 1, decision, &format!("reviewer-{i}"), None)
            })
        })
        .collect();

    let results: Vec<Result<_, LedgerError>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();
    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LedgerError::Approval(_))));

    let stored = service.get(&identity, 1).expect("stored");
    assert_eq!(&stored, winners[0]);
    assert_ne!(stored.status, ApprovalStatus::Pending);
}

#[test]
fn readers_never_observe_gaps() {
    let ledger = Arc::new(VersionLedger::default());
    let writer_service = Arc::new(
        IngestionService::builder()
            .ledger(Arc::clone(&ledger))
            .build()
            .expect("service"),
    );
    let identity = writer_service.resolve("P1", "plan.dwg");

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&writer_service);
            thread::spawn(move || {
                for _ in 0..50 {
                    service.ingest("P1", "w", &[FileDescriptor::new("plan.dwg", 1, "")]);
                }
            })
        })
        .collect();

    let reader = {
        let ledger = Arc::clone(&ledger);
        let identity = identity.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                let history = ledger.history(&identity);
                for (idx, version) in history.iter().enumerate() {
                    assert_eq!(version.version_number, idx as u64 + 1);
                }
                if let Some(latest) = ledger.latest(&identity) {
                    assert!(latest.version_number as usize >= history.len());
                }
            }
        })
    };

    for w in writers {
        w.join().expect("writer panicked");
    }
    reader.join().expect("reader panicked");
    assert_eq!(ledger.history(&identity).len(), 200);
}
