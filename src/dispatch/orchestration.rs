//! Module focusing on the way the declared cases are orchestrated between worker threads

use std::{
    path::Path,
    sync::mpsc::{SyncSender, sync_channel},
    thread::{Scope, ScopedJoinHandle},
};

use crate::dispatch::{CaseReport, Executor, run_case};
use crate::domain::DeclaredCase;

///
/// Runs every declared case once, in declared order, and returns one report per case.
/// Uses a single thread.
///
pub fn dispatch(cases: &[DeclaredCase], root: &Path, executor: &impl Executor) -> Vec<CaseReport> {
    cases
        .iter()
        .map(|case| run_case(case, root, executor))
        .collect()
}

///
/// Runs every declared case once and returns one report per case, in declared order.
/// Uses a number of worker threads provided by the `num_workers` argument, sharding the cases between the worker
/// threads based on their position in `cases`.
///
pub fn dispatch_parallel(
    cases: &[DeclaredCase],
    root: &Path,
    executor: &impl Executor,
    num_workers: usize,
    channel_capacity: usize,
) -> Vec<CaseReport> {
    let num_workers = num_workers.max(1);

    std::thread::scope(|s| {
        let (worker_senders, worker_handles) =
            spawn_worker_threads(s, root, executor, num_workers, channel_capacity);

        // --- Main thread: dispatch ---
        for (idx, case) in cases.iter().enumerate() {
            // Send fails only if the receiver was dropped (worker panicked);
            // the join() below will surface that panic.
            let _ = worker_senders[idx % num_workers].send((idx, case));
        }

        // Signal EOF: workers drain their queue and exit
        drop(worker_senders);

        // --- Collect worker results ---
        let mut reports: Vec<(usize, CaseReport)> = Vec::with_capacity(cases.len());
        for handle in worker_handles {
            let partition = handle.join().expect("worker thread does not panic");
            reports.extend(partition);
        }

        reports.sort_by_key(|(idx, _)| *idx);
        reports.into_iter().map(|(_, report)| report).collect()
    })
}

type WorkerQueue<'c> = SyncSender<(usize, &'c DeclaredCase)>;

fn spawn_worker_threads<'s, 'e: 's, 'c: 's>(
    s: &'s Scope<'s, 'e>,
    root: &'e Path,
    executor: &'e (impl Executor + 'e),
    num_workers: usize,
    channel_capacity: usize,
) -> (
    Vec<WorkerQueue<'c>>,
    Vec<ScopedJoinHandle<'s, Vec<(usize, CaseReport)>>>,
) {
    let mut worker_senders = Vec::with_capacity(num_workers);
    let mut worker_handles = Vec::with_capacity(num_workers);

    for _ in 0..num_workers {
        let (case_in, case_out) = sync_channel::<(usize, &'c DeclaredCase)>(channel_capacity);

        // run_case catches executor panics, so a worker only ever ends when its queue closes
        let handle = s.spawn(move || {
            case_out
                .into_iter()
                .map(|(idx, case)| (idx, run_case(case, root, executor)))
                .collect::<Vec<_>>()
        });

        worker_senders.push(case_in);
        worker_handles.push(handle);
    }

    (worker_senders, worker_handles)
}
