//! Live-sync write pipeline.
//!
//! Slider drags produce parameter snapshots at arbitrary, possibly
//! sub-millisecond rates. Writing on every change would flood the
//! filesystem and risk interleaved partial writes, so the pipeline keeps a
//! single-slot coalescing queue: at most one write is in flight per target
//! file, at most one snapshot waits behind it (last-write-wins), and the
//! final submitted state is always eventually written. Superseded
//! intermediate snapshots are dropped on purpose, as backpressure
//! mechanism, not a bug.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::error::Error;
use crate::generator::generate_config;
use crate::types::{AudioSnapshot, SyncStatus};

// =============================================================================
// Collaborator Seams
// =============================================================================

/// Receives status transitions from the pipeline.
///
/// Implemented by the UI layer, typically forwarding to its status
/// indicator widget.
pub trait StatusSink: Send + Sync {
    fn emit(&self, status: SyncStatus);
}

impl<S: StatusSink> StatusSink for Arc<S> {
    fn emit(&self, status: SyncStatus) {
        (**self).emit(status)
    }
}

/// Supplies the current target config path on demand.
///
/// The pipeline queries this at write-dispatch time rather than caching a
/// path at submission time, so a target changed by the settings layer while
/// a write was in flight redirects the *next* dispatched write.
pub trait TargetPathProvider: Send + Sync {
    /// Returns the currently selected config path, or `None` when unset.
    fn config_path(&self) -> Option<PathBuf>;
}

impl TargetPathProvider for Mutex<Option<PathBuf>> {
    fn config_path(&self) -> Option<PathBuf> {
        self.lock().clone()
    }
}

impl<P: TargetPathProvider> TargetPathProvider for Arc<P> {
    fn config_path(&self) -> Option<PathBuf> {
        (**self).config_path()
    }
}

/// Performs the physical config write.
///
/// A seam so the pipeline state machine can be exercised in tests without a
/// filesystem; production code uses [`FsWriter`].
pub trait ConfigWriter: Send + Sync {
    fn write_config(&self, path: &Path, contents: &str) -> io::Result<()>;
}

impl<W: ConfigWriter> ConfigWriter for Arc<W> {
    fn write_config(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write_config(path, contents)
    }
}

// =============================================================================
// Filesystem Writer
// =============================================================================

/// Default writer backed by `std::fs`.
///
/// On Windows the write path matches what Equalizer APO installations need:
/// a stale read-only attribute is cleared first, a failed write is retried
/// once after granting the current user full access via `icacls`, and the
/// Windows audio service (`NT SERVICE\AudioSrv`) is granted read access so
/// the APO engine can pick up the file it watches.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWriter;

impl ConfigWriter for FsWriter {
    #[allow(clippy::permissions_set_readonly_false)] // Windows-only concern, Unix warning N/A
    fn write_config(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(path) {
            let mut perms = metadata.permissions();
            if perms.readonly() {
                perms.set_readonly(false);
                let _ = fs::set_permissions(path, perms);
            }
        }

        if let Err(first) = fs::write(path, contents) {
            #[cfg(windows)]
            if path.exists() {
                if let Ok(user) = std::env::var("USERNAME") {
                    let _ = run_icacls(path, &format!("{}:F", user));
                }
            }

            // Retry once after the permission fix attempt
            fs::write(path, contents).map_err(|retry| {
                io::Error::new(
                    retry.kind(),
                    format!("{} (first attempt: {})", retry, first),
                )
            })?;
        }

        #[cfg(windows)]
        if let Err(e) = run_icacls(path, "NT SERVICE\\AudioSrv:R") {
            log::warn!("could not grant AudioSrv read access: {}", e);
        }

        Ok(())
    }
}

/// Grants file permissions using the Windows `icacls` command.
#[cfg(windows)]
fn run_icacls(path: &Path, grant: &str) -> io::Result<()> {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x08000000;

    let output = std::process::Command::new("icacls")
        .arg(path)
        .arg("/grant")
        .arg(grant)
        .creation_flags(CREATE_NO_WINDOW)
        .output()?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("icacls failed: {}", stderr.trim()),
        ))
    }
}

// =============================================================================
// Sync Pipeline
// =============================================================================

/// Internal pipeline state behind one mutex.
struct PipelineState {
    /// True while a write is physically in progress
    is_writing: bool,
    /// At most one superseding snapshot submitted during an in-flight write
    pending: Option<AudioSnapshot>,
}

/// Throttled, ordered writer keeping one config file in sync with UI state.
///
/// An explicit state object rather than module-level globals, so it is
/// testable in isolation and instantiable per target file. Created once at
/// process start and shared (e.g. in an `Arc`) with every submission site.
pub struct SyncPipeline<P, S, W = FsWriter> {
    state: Mutex<PipelineState>,
    paths: P,
    sink: S,
    writer: W,
}

impl<P, S> SyncPipeline<P, S, FsWriter>
where
    P: TargetPathProvider,
    S: StatusSink,
{
    /// Creates a pipeline writing through the filesystem.
    pub fn new(paths: P, sink: S) -> Self {
        Self::with_writer(paths, sink, FsWriter)
    }
}

impl<P, S, W> SyncPipeline<P, S, W>
where
    P: TargetPathProvider,
    S: StatusSink,
    W: ConfigWriter,
{
    /// Creates a pipeline with a custom write backend.
    pub fn with_writer(paths: P, sink: S, writer: W) -> Self {
        Self {
            state: Mutex::new(PipelineState {
                is_writing: false,
                pending: None,
            }),
            paths,
            sink,
            writer,
        }
    }

    /// Submits a snapshot for synchronization.
    ///
    /// With no target configured this reports an error and leaves the
    /// pipeline untouched. While a write is in flight the snapshot parks in
    /// the single pending slot (overwriting any earlier pending one) and the
    /// call returns immediately. Otherwise the write cycle runs on the
    /// calling thread, draining the pending slot until it is empty.
    ///
    /// Write failures are reported through the status sink and never
    /// propagate; the pipeline always returns to a servable state.
    pub fn submit(&self, snapshot: AudioSnapshot) {
        let Some(path) = self.current_path() else {
            self.emit_missing_configuration();
            return;
        };

        {
            let mut state = self.state.lock();
            if state.is_writing {
                state.pending = Some(snapshot);
                return;
            }
            state.is_writing = true;
        }

        // Explicit dispatch loop: while a pending snapshot exists after a
        // completed write, dispatch it. No deferred callbacks involved.
        let mut next = Some((snapshot, path));
        while let Some((current, target)) = next.take() {
            self.write_once(&current, &target);
            next = self.next_dispatch();
        }
    }

    /// True while a write is physically in progress.
    pub fn is_writing(&self) -> bool {
        self.state.lock().is_writing
    }

    /// Renders and writes one snapshot, reporting the outcome.
    fn write_once(&self, snapshot: &AudioSnapshot, path: &Path) {
        self.sink.emit(SyncStatus::Saving {
            filepath: path.to_path_buf(),
        });

        let contents = generate_config(snapshot);
        match self.writer.write_config(path, &contents) {
            Ok(()) => {
                log::debug!("config synced to {:?}", path);
                self.sink.emit(SyncStatus::Synced {
                    timestamp: unix_millis(),
                    filepath: path.to_path_buf(),
                });
            }
            Err(source) => {
                let error = Error::WriteFailed {
                    path: path.to_path_buf(),
                    source,
                };
                log::error!("{}", error);
                self.sink.emit(SyncStatus::Error {
                    error: error.to_string(),
                });
            }
        }
    }

    /// Decides what happens after a completed write.
    ///
    /// Returns the coalesced pending snapshot together with the target path
    /// re-read at dispatch time, or `None` after moving the pipeline back to
    /// idle. A pending snapshot whose target was cleared mid-flight is
    /// dropped with a reported configuration error.
    fn next_dispatch(&self) -> Option<(AudioSnapshot, PathBuf)> {
        loop {
            let pending = {
                let mut state = self.state.lock();
                match state.pending.take() {
                    Some(snapshot) => snapshot,
                    None => {
                        state.is_writing = false;
                        return None;
                    }
                }
            };

            // Provider is queried outside our own lock; it may lock its own.
            match self.current_path() {
                Some(path) => return Some((pending, path)),
                None => {
                    log::warn!("target path cleared mid-flight, dropping pending snapshot");
                    self.emit_missing_configuration();
                    // Re-check the slot: a newer submission may have landed
                    // while the provider was being queried.
                }
            }
        }
    }

    /// Returns the current non-empty target path, if any.
    fn current_path(&self) -> Option<PathBuf> {
        self.paths
            .config_path()
            .filter(|path| !path.as_os_str().is_empty())
    }

    fn emit_missing_configuration(&self) {
        self.sink.emit(SyncStatus::Error {
            error: Error::ConfigurationMissing.to_string(),
        });
    }
}

/// Current wall-clock time in unix milliseconds.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =============================================================================
// Unit Tests
// =============================================================================
