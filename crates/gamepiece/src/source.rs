//! Frame acquisition: the backend capability trait plus bounded waiting.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gamepiece_core::{FrameError, FramePair};
use log::{debug, warn};

/// Failure to deliver a frame for the current cycle. Callers decide whether
/// to try again next cycle; nothing here retries.
#[derive(thiserror::Error, Debug)]
pub enum AcquisitionError {
    #[error("frame source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Malformed(#[from] FrameError),
    #[error("{}: {reason}", path.display())]
    InvalidFile { path: PathBuf, reason: String },
    #[error("no frame within {0:?}")]
    Timeout(Duration),
    #[error("acquisition cancelled")]
    Cancelled,
    #[error("frame source disconnected")]
    Disconnected,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Anything that can hand out aligned color + depth frames.
pub trait FrameSource {
    /// Block until the next frame pair is available.
    fn acquire(&mut self) -> Result<FramePair, AcquisitionError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn acquire(&mut self) -> Result<FramePair, AcquisitionError> {
        (**self).acquire()
    }
}

/// Replays a fixed set of frames in a loop.
#[derive(Clone, Debug, Default)]
pub struct StaticFrameSource {
    frames: Vec<FramePair>,
    next: usize,
}

impl StaticFrameSource {
    pub fn new(frames: Vec<FramePair>) -> Self {
        Self { frames, next: 0 }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for StaticFrameSource {
    fn acquire(&mut self) -> Result<FramePair, AcquisitionError> {
        if self.frames.is_empty() {
            return Err(AcquisitionError::Unavailable("no frames loaded".to_string()));
        }
        let frame = self.frames[self.next % self.frames.len()].clone();
        self.next = self.next.wrapping_add(1);
        Ok(frame)
    }
}

/// Shared stop flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Longest single wait before the cancel flag is checked again.
const CANCEL_POLL: Duration = Duration::from_millis(10);

type Reply = (u64, Result<FramePair, AcquisitionError>);

/// Runs a blocking source on a worker thread and bounds each
/// [`FrameSource::acquire`] by a timeout.
///
/// At most one backend call is in flight. When a wait times out the request
/// stays outstanding, and later calls wait on it instead of queueing another,
/// so a stalled backend is asked once no matter how often the caller polls.
/// A frame that lands after its wait timed out answers the next call.
/// Dropping the wrapper closes the request channel; the worker exits once its
/// current backend call returns.
pub struct TimedFrameSource {
    requests: Option<mpsc::Sender<u64>>,
    replies: mpsc::Receiver<Reply>,
    worker: Option<JoinHandle<()>>,
    timeout: Duration,
    cancel: CancelToken,
    next_seq: u64,
    pending: Option<u64>,
}

impl TimedFrameSource {
    pub fn spawn<S>(
        mut source: S,
        timeout: Duration,
        cancel: CancelToken,
    ) -> Result<Self, AcquisitionError>
    where
        S: FrameSource + Send + 'static,
    {
        let (req_tx, req_rx) = mpsc::channel::<u64>();
        let (reply_tx, reply_rx) = mpsc::channel::<Reply>();
        let worker_cancel = cancel.clone();

        let worker = thread::Builder::new()
            .name("frame-source".to_string())
            .spawn(move || {
                while let Ok(seq) = req_rx.recv() {
                    if worker_cancel.is_cancelled() {
                        break;
                    }
                    let res = source.acquire();
                    if reply_tx.send((seq, res)).is_err() {
                        break;
                    }
                }
                debug!("frame-source worker exiting");
            })?;

        Ok(Self {
            requests: Some(req_tx),
            replies: reply_rx,
            worker: Some(worker),
            timeout,
            cancel,
            next_seq: 0,
            pending: None,
        })
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Close the request channel and wait for the worker to finish its
    /// current backend call.
    pub fn shutdown(mut self) {
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("frame-source worker panicked");
            }
        }
    }
}

impl FrameSource for TimedFrameSource {
    fn acquire(&mut self) -> Result<FramePair, AcquisitionError> {
        if self.cancel.is_cancelled() {
            return Err(AcquisitionError::Cancelled);
        }

        let seq = match self.pending {
            Some(seq) => seq,
            None => {
                let seq = self.next_seq;
                let requests = self.requests.as_ref().ok_or(AcquisitionError::Disconnected)?;
                requests.send(seq).map_err(|_| AcquisitionError::Disconnected)?;
                self.next_seq += 1;
                self.pending = Some(seq);
                seq
            }
        };

        let deadline = Instant::now() + self.timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                debug!("request {seq} still outstanding after {:?}", self.timeout);
                return Err(AcquisitionError::Timeout(self.timeout));
            }
            match self.replies.recv_timeout((deadline - now).min(CANCEL_POLL)) {
                Ok((got, res)) if got == seq => {
                    self.pending = None;
                    return res;
                }
                Ok((got, _)) => debug!("ignoring reply {got} (waiting for {seq})"),
                Err(RecvTimeoutError::Timeout) => {
                    if self.cancel.is_cancelled() {
                        return Err(AcquisitionError::Cancelled);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Err(AcquisitionError::Disconnected),
            }
        }
    }
}

impl Drop for TimedFrameSource {
    fn drop(&mut self) {
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            if worker.is_finished() {
                let _ = worker.join();
            }
        }
    }
}
