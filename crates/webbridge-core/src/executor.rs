//! The UI-affine dispatch context.
//!
//! A single execution context owns all render-surface mutation. Callers on
//! any thread submit closures through a [`DispatchContext`]; the context's
//! owner (the host's UI loop) pumps the paired [`DispatchQueue`], executing
//! queued work strictly in submission order. Submission never blocks.

use std::sync::mpsc;

use tracing::warn;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Cheap, cloneable submission handle to the dispatch context.
#[derive(Clone)]
pub struct DispatchContext {
    tx: mpsc::Sender<Task>,
}

impl DispatchContext {
    /// Enqueue work and return immediately. Work submitted after the queue
    /// was dropped is discarded with a diagnostic.
    pub fn submit<F: FnOnce() + Send + 'static>(&self, task: F) {
        if self.tx.send(Box::new(task)).is_err() {
            warn!("dispatch context is gone; task dropped");
        }
    }
}

/// Receiving end of the dispatch context, pumped by the UI loop.
pub struct DispatchQueue {
    rx: mpsc::Receiver<Task>,
}

impl DispatchQueue {
    /// Create a context/queue pair.
    pub fn channel() -> (DispatchContext, DispatchQueue) {
        let (tx, rx) = mpsc::channel();
        (DispatchContext { tx }, DispatchQueue { rx })
    }

    /// Run every task queued so far. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Block for the next task and run it. Returns false once all
    /// submission handles are gone.
    pub fn run_next_blocking(&self) -> bool {
        match self.rx.recv() {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn runs_tasks_in_submission_order() {
        let (ctx, queue) = DispatchQueue::channel();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = order.clone();
            ctx.submit(move || order.lock().unwrap().push(i));
        }

        assert_eq!(queue.run_pending(), 5);
        assert_eq!(*order.lock().unwrap(), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn submit_does_not_block_the_caller() {
        let (ctx, queue) = DispatchQueue::channel();
        let hits = Arc::new(Mutex::new(0));

        let hits_clone = hits.clone();
        ctx.submit(move || *hits_clone.lock().unwrap() += 1);

        // Nothing runs until the queue is pumped.
        assert_eq!(*hits.lock().unwrap(), 0);
        queue.run_pending();
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn cross_thread_submissions_preserve_per_thread_order() {
        let (ctx, queue) = DispatchQueue::channel();
        let order = Arc::new(Mutex::new(Vec::new()));

        let ctx2 = ctx.clone();
        let order2 = order.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..10 {
                let order = order2.clone();
                ctx2.submit(move || order.lock().unwrap().push(i));
            }
        });
        handle.join().unwrap();

        queue.run_pending();
        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn submit_after_queue_drop_is_a_quiet_no_op() {
        let (ctx, queue) = DispatchQueue::channel();
        drop(queue);
        ctx.submit(|| panic!("must never run"));
    }

    #[test]
    fn run_next_blocking_returns_false_when_senders_are_gone() {
        let (ctx, queue) = DispatchQueue::channel();
        ctx.submit(|| {});
        drop(ctx);

        assert!(queue.run_next_blocking());
        assert!(!queue.run_next_blocking());
    }
}
