//! Offloading encode calls from an async executor
//!
//! Native encode and flush calls are CPU-bound and give no chance to
//! yield. [`AsyncSession`] moves each call onto tokio's blocking pool and
//! keeps a per-session lock, so the executor threads stay free and calls
//! into one session never overlap.

use crate::error::{LameError, Result};
use crate::session::Session;
use std::sync::{Arc, Mutex};

/// A [`Session`] shared across tasks
#[derive(Clone)]
pub struct AsyncSession {
    inner: Arc<Mutex<Session>>,
}

impl AsyncSession {
    /// Wrap a session; configure and initialize it before or through
    /// [`AsyncSession::run`].
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` against the session on the blocking pool
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || {
            let mut session = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&mut *session)
        });
        match task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(LameError::WorkerUnavailable),
        }
    }

    pub async fn init_params(&self) -> Result<()> {
        self.run(|session| session.init_params()).await
    }

    pub async fn encode_interleaved(&self, pcm: Vec<u8>, sample_count: usize) -> Result<Vec<u8>> {
        self.run(move |session| session.encode_interleaved(&pcm, sample_count))
            .await
    }

    pub async fn encode_samples(&self, pcm: Vec<i16>) -> Result<Vec<u8>> {
        self.run(move |session| session.encode_samples(&pcm)).await
    }

    pub async fn encode_float(
        &self,
        left: Vec<f64>,
        right: Vec<f64>,
        offset: usize,
        sample_count: usize,
    ) -> Result<Vec<u8>> {
        self.run(move |session| session.encode_float(&left, &right, offset, sample_count))
            .await
    }

    pub async fn encode_float_mono(
        &self,
        samples: Vec<f64>,
        offset: usize,
        sample_count: usize,
    ) -> Result<Vec<u8>> {
        self.run(move |session| session.encode_float_mono(&samples, offset, sample_count))
            .await
    }

    pub async fn flush(&self) -> Result<Vec<u8>> {
        self.run(|session| session.flush()).await
    }

    pub async fn flush_nogap(&self) -> Result<Vec<u8>> {
        self.run(|session| session.flush_nogap()).await
    }

    pub async fn lametag_frame(&self) -> Result<Vec<u8>> {
        self.run(|session| session.lametag_frame()).await
    }

    /// Close the native handle now instead of when the last clone drops
    pub async fn close(&self) -> Result<()> {
        self.run(|session| {
            session.close();
            Ok(())
        })
        .await
    }
}
