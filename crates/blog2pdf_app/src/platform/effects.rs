use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use blog2pdf_core::{AccessibilityResult, BackendStatus, ConversionStage, Effect, Msg, ResultHandle};
use blog2pdf_engine::{
    deterministic_filename, AtomicFileWriter, BackendSettings, BlobStore, EngineError, EngineEvent,
    EngineHandle, StoredBlob,
};
use engine_logging::{engine_debug, engine_info, engine_warn};

/// Executes core effects: network work goes to the engine, blob bookkeeping
/// and saving happen inline.
pub struct EffectRunner {
    engine: EngineHandle,
    blobs: Arc<Mutex<BlobStore>>,
    writer: AtomicFileWriter,
}

impl EffectRunner {
    pub fn new(
        settings: BackendSettings,
        output_dir: PathBuf,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::spawn(settings, event_tx)?;
        let blobs = Arc::new(Mutex::new(BlobStore::new()));
        spawn_event_loop(event_rx, msg_tx, blobs.clone());
        Ok(Self {
            engine,
            blobs,
            writer: AtomicFileWriter::new(output_dir),
        })
    }

    /// Runs `effects` and returns follow-up messages produced synchronously.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::ProbeBackend => self.engine.probe(),
                Effect::CheckAccessibility { submission, url } => {
                    engine_info!("CheckAccessibility submission={} url={}", submission, url);
                    self.engine.check(submission, url);
                }
                Effect::Convert { submission, url } => {
                    engine_info!("Convert submission={} url={}", submission, url);
                    self.engine.convert(submission, url);
                }
                Effect::ReleaseResult { blob_id } => {
                    if let Err(err) = self.blobs().release(blob_id) {
                        engine_warn!("release failed: {}", err);
                    }
                }
                Effect::SaveResult { handle } => follow_ups.push(self.save(&handle)),
            }
        }
        follow_ups
    }

    /// Number of payloads currently held.
    pub fn held_blobs(&self) -> usize {
        self.blobs().len()
    }

    /// Frees every payload that is still held.
    pub fn release_all(&self) -> usize {
        self.blobs().release_all()
    }

    fn save(&self, handle: &ResultHandle) -> Msg {
        let blob_id = handle.blob_id;
        let blob = match self.blobs().get(blob_id).cloned() {
            Some(blob) => blob,
            None => {
                return Msg::SaveFailed {
                    blob_id,
                    message: "the converted PDF is no longer available".to_string(),
                }
            }
        };
        let filename = deterministic_filename(&blob.filename, &blob.source_url);
        match self.writer.write(&filename, &blob.bytes) {
            Ok(path) => {
                engine_info!("saved blob {} to {:?}", blob_id, path);
                Msg::ResultSaved { blob_id, path }
            }
            Err(err) => {
                engine_warn!("saving blob {} failed: {}", blob_id, err);
                Msg::SaveFailed {
                    blob_id,
                    message: err.to_string(),
                }
            }
        }
    }

    fn blobs(&self) -> MutexGuard<'_, BlobStore> {
        lock_blobs(&self.blobs)
    }
}

fn lock_blobs(blobs: &Mutex<BlobStore>) -> MutexGuard<'_, BlobStore> {
    blobs.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_event_loop(
    event_rx: mpsc::Receiver<EngineEvent>,
    msg_tx: mpsc::Sender<Msg>,
    blobs: Arc<Mutex<BlobStore>>,
) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = map_event(event, &blobs);
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
        engine_debug!("engine event loop finished");
    });
}

fn map_event(event: EngineEvent, blobs: &Mutex<BlobStore>) -> Msg {
    match event {
        EngineEvent::BackendProbed(Ok(info)) => {
            engine_info!("backend online: {} (v{})", info.message, info.version);
            Msg::BackendProbed(BackendStatus::Online {
                version: info.version,
            })
        }
        EngineEvent::BackendProbed(Err(err)) => {
            engine_warn!("backend probe failed: {}", err);
            Msg::BackendProbed(BackendStatus::Offline {
                reason: err.to_string(),
            })
        }
        EngineEvent::AccessibilityChecked { submission, result } => Msg::AccessibilityChecked {
            submission,
            result: AccessibilityResult {
                accessible: result.accessible,
                error: result.error,
            },
        },
        EngineEvent::Progress { submission, stage } => Msg::ConversionProgress {
            submission,
            stage: map_stage(stage),
        },
        EngineEvent::ConversionCompleted { submission, result } => {
            let result = match result {
                Ok(output) => {
                    if let Some(token) = &output.download_token {
                        engine_debug!(
                            "submission {} download token {} expires in {}",
                            submission,
                            token,
                            output.expires_in.as_deref().unwrap_or("unknown")
                        );
                    }
                    let filename = output.filename.clone();
                    let byte_len = output.bytes.len() as u64;
                    let blob_id = lock_blobs(blobs).insert(StoredBlob::from(output));
                    Ok(ResultHandle {
                        blob_id,
                        filename,
                        byte_len,
                    })
                }
                Err(err) => {
                    engine_warn!("submission {} conversion failed: {}", submission, err);
                    Err(err.conversion_message())
                }
            };
            Msg::ConversionFinished { submission, result }
        }
    }
}

fn map_stage(stage: blog2pdf_engine::Stage) -> ConversionStage {
    match stage {
        blog2pdf_engine::Stage::Fetching => ConversionStage::Fetching,
        blog2pdf_engine::Stage::Processing => ConversionStage::Processing,
        blog2pdf_engine::Stage::Generating => ConversionStage::Generating,
    }
}
