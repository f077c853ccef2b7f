//! Encoder session: ownership of one native `lame_global_flags`
//!
//! A [`Session`] owns its handle exclusively. The handle is released exactly
//! once, by [`Session::close`] or on drop, and the pointer is nulled
//! afterwards so that every later call fails with [`LameError::Closed`].
//!
//! # Threading
//!
//! A session is `Send` but not `Sync`. Every entry point that reaches the
//! encoder takes `&mut self`, so one session never runs two native calls at
//! once. Distinct sessions share no state apart from the library-global
//! tables that libmp3lame fills in `lame_init` and `lame_init_params`;
//! those two calls are serialized process-wide.
//!
//! Encode and flush calls block the calling thread for as long as the
//! native encoder works. Code running on an async executor should move them
//! to a blocking pool (see `AsyncSession` behind the `tokio` feature).

use crate::error::{LameError, Result};
use crate::ffi;
use crate::tags::TagLayout;
use lazy_static::lazy_static;
use log::{debug, warn};
use std::ptr;
use std::sync::{Mutex, MutexGuard};

lazy_static! {
    /// Serializes libmp3lame calls that write library-global tables
    static ref LIBRARY_LOCK: Mutex<()> = Mutex::new(());
}

fn library_lock() -> MutexGuard<'static, ()> {
    LIBRARY_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// Parameters may be set; encoding is not possible yet
    Configuring,
    /// `init_params` succeeded; configuration is locked
    Encoding,
    /// `flush` has drained the stream
    Finished,
}

/// One LAME encoder instance
pub struct Session {
    gfp: *mut ffi::LameGlobalFlags,
    state: SessionState,
    /// Input channels fixed by `init_params`; 0 until then
    channels: usize,
    /// `flush_nogap` has been used at least once
    pub(crate) gapless: bool,
    pub(crate) tags_initialized: bool,
    pub(crate) tag_layout: TagLayout,
    pub(crate) track_set: bool,
}

// SAFETY: the handle is owned exclusively by this value and every call that
// touches it goes through `&self`/`&mut self`; libmp3lame keeps no
// thread-local state for a handle.
unsafe impl Send for Session {}

impl Session {
    /// Allocate a new native encoder context
    pub fn open() -> Result<Self> {
        let gfp = {
            let _guard = library_lock();
            unsafe { ffi::lame_init() }
        };
        if gfp.is_null() {
            return Err(LameError::Allocation);
        }
        debug!("opened LAME session {:p}", gfp);
        Ok(Self {
            gfp,
            state: SessionState::Configuring,
            channels: 0,
            gapless: false,
            tags_initialized: false,
            tag_layout: TagLayout::Automatic,
            track_set: false,
        })
    }

    /// Release the native context. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.gfp.is_null() {
            return;
        }
        debug!("closing LAME session {:p}", self.gfp);
        unsafe { ffi::lame_close(self.gfp) };
        self.gfp = ptr::null_mut();
    }

    pub fn is_closed(&self) -> bool {
        self.gfp.is_null()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether `init_params` has locked the configuration.
    ///
    /// Parameter setters still reach libmp3lame on a locked session, but
    /// the encoder keeps using the tables derived at `init_params`.
    pub fn is_locked(&self) -> bool {
        self.state != SessionState::Configuring
    }

    /// Lock the configuration and derive the encoder tables.
    ///
    /// A second call fails with [`LameError::AlreadyInitialized`] without
    /// reaching libmp3lame.
    pub fn init_params(&mut self) -> Result<()> {
        let gfp = self.handle()?;
        if self.is_locked() {
            return Err(LameError::AlreadyInitialized);
        }
        let code = {
            let _guard = library_lock();
            unsafe { ffi::lame_init_params(gfp) }
        };
        if code < 0 {
            warn!("lame_init_params failed with code {}", code);
            return Err(LameError::from_init_code(code));
        }
        // lame_init_params refuses anything but one or two channels
        self.channels = match unsafe { ffi::lame_get_num_channels(gfp) } {
            1 => 1,
            _ => 2,
        };
        debug!("LAME session {:p} initialized with {} channel(s)", gfp, self.channels);
        self.state = SessionState::Encoding;
        Ok(())
    }

    /// Reset the bitstream framing. Idempotent; after `flush_nogap` this
    /// starts the next gapless track.
    pub fn init_bitstream(&mut self) -> Result<()> {
        let gfp = self.handle()?;
        if !self.is_locked() {
            return Err(LameError::NotInitialized);
        }
        unsafe { ffi::lame_init_bitstream(gfp) };
        Ok(())
    }

    /// Live handle or `Closed`
    pub(crate) fn handle(&self) -> Result<*mut ffi::LameGlobalFlags> {
        if self.gfp.is_null() {
            Err(LameError::Closed)
        } else {
            Ok(self.gfp)
        }
    }

    /// Handle for an encode call: open, initialized and not finished
    pub(crate) fn encodable(&self) -> Result<*mut ffi::LameGlobalFlags> {
        let gfp = self.handle()?;
        match self.state {
            SessionState::Configuring => Err(LameError::NotInitialized),
            SessionState::Encoding => Ok(gfp),
            SessionState::Finished => Err(LameError::EndOfStream),
        }
    }

    /// Channel layout the encoder was initialized with.
    ///
    /// Later `set_num_channels` calls do not change it.
    pub(crate) fn channels(&self) -> usize {
        self.channels
    }

    pub(crate) fn mark_finished(&mut self) {
        self.state = SessionState::Finished;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("handle", &self.gfp)
            .field("state", &self.state)
            .field("channels", &self.channels)
            .field("gapless", &self.gapless)
            .finish()
    }
}
