use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{self, Receiver};

use super::FileFinder;

/// How many paths the producer may run ahead of the reader.
const STREAM_CAPACITY: usize = 256;

/// Paths from one traversal, produced lazily on a background thread.
///
/// The sequence is finite. Dropping the stream stops the traversal.
pub struct FileStream {
    rx: Option<Receiver<String>>,
    cancel: Arc<AtomicBool>,
    producer: Option<JoinHandle<()>>,
}

impl FileStream {
    pub(super) fn spawn(finder: FileFinder) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<String>(STREAM_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));
        let producer_cancel = Arc::clone(&cancel);
        let producer = thread::spawn(move || {
            let _ = finder.start_cancellable(&producer_cancel, |path| {
                match tx.send(path.to_string()) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(_) => ControlFlow::Break(()),
                }
            });
        });

        Self {
            rx: Some(rx),
            cancel,
            producer: Some(producer),
        }
    }
}

impl Iterator for FileStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.rx.as_ref()?.recv().ok()
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        // The flag stops a walk that is between hits; disconnecting wakes a
        // producer blocked on a full channel.
        self.cancel.store(true, Ordering::Relaxed);
        drop(self.rx.take());
        if let Some(producer) = self.producer.take() {
            let _ = producer.join();
        }
    }
}
