//! Fixed-size worker pool (ยง4.G): one task queue guarded by a mutex and a
//! condition variable, workers dequeue and run independent episode
//! simulations. No task stealing or rebalancing.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    queue: Mutex<VecDeque<Job>>,
    has_tasks: Condvar,
    stop: Mutex<bool>,
}

pub struct WorkerPool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `threads` workers (default: `std::thread::available_parallelism`).
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            has_tasks: Condvar::new(),
            stop: Mutex::new(false),
        });

        let handles = (0..threads)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || worker_loop(shared))
            })
            .collect();

        Self {
            shared,
            threads: handles,
        }
    }

    /// Spawns a pool sized to the machine's hardware parallelism.
    pub fn with_default_size() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(threads)
    }

    /// Submits an independent task. Returns a receiver that yields the
    /// task's result once a worker has run it. A task that panics does not
    /// take the worker thread down with it -- the panic is caught and
    /// delivered through the channel instead, so the caller decides what a
    /// failed simulation means for the rest of the generation (ยง7 "worker
    /// task panic").
    pub fn submit<T, F>(&self, work: F) -> Receiver<std::thread::Result<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx): (Sender<std::thread::Result<T>>, Receiver<std::thread::Result<T>>) = channel();
        let job: Job = Box::new(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(work));
            let _ = tx.send(result);
        });

        let mut queue = self.shared.queue.lock();
        queue.push_back(job);
        self.shared.has_tasks.notify_one();
        rx
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let mut queue = shared.queue.lock();
        loop {
            if let Some(job) = queue.pop_front() {
                drop(queue);
                job();
                break;
            }
            if *shared.stop.lock() {
                return;
            }
            shared.has_tasks.wait(&mut queue);
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        *self.shared.stop.lock() = true;
        self.shared.has_tasks.notify_all();
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}
