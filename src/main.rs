//! Application entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (path from the optional CLI argument, else the
//!    platform config dir; missing file means defaults).
//! 3. Fail-fast validation: load the Whisper model, open the capture device
//!    and start its stream.  Any failure exits non-zero before the event
//!    loop starts.
//! 4. Wire the recorder feeder thread, formatter, inserter and media
//!    coordinator; spawn the hotkey listener thread.
//! 5. Run the pipeline orchestrator on a tokio runtime until Ctrl-C.
//!
//! Exit code 0 on clean shutdown, non-zero on startup failure or when the
//! shutdown timeout expires with a session still in flight.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::sync::mpsc;

use whisperkey::audio::{AudioCapture, CaptureSource, MicRecorder};
use whisperkey::config::{AppConfig, AppPaths};
use whisperkey::hotkey::{parse_key, HotkeyListener};
use whisperkey::insert::{ClipboardInserter, TextInserter};
use whisperkey::llm::{ApiFormatter, TextFormatter};
use whisperkey::media::{MediaCoordinator, MediaKeys};
use whisperkey::pipeline::{PipelineEvent, PipelineOrchestrator};
use whisperkey::stt::{SttEngine, WhisperStt};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("whisperkey starting");

    // --- Configuration -----------------------------------------------------
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from(std::path::Path::new(&path))
            .with_context(|| format!("could not load config from {path}"))?,
        None => AppConfig::load().context("could not load config")?,
    };

    let trigger = parse_key(&config.hotkey.trigger_key).ok_or_else(|| {
        anyhow!(
            "unknown trigger key {:?} in [hotkey] trigger_key",
            config.hotkey.trigger_key
        )
    })?;

    // --- Fail-fast startup validation --------------------------------------
    let model_path = AppPaths::new().model_file(&config.stt.model);
    let stt: Arc<dyn SttEngine> = Arc::new(
        WhisperStt::load(&model_path, config.stt.clone())
            .with_context(|| format!("could not load model {}", model_path.display()))?,
    );
    log::info!("whisper model loaded: {}", model_path.display());

    let capture = AudioCapture::new().context("no usable audio input device")?;
    log::info!(
        "audio input ready ({} Hz, {} ch)",
        capture.sample_rate(),
        capture.channels()
    );

    // --- Capture plumbing ---------------------------------------------------
    let recorder = Arc::new(MicRecorder::new(config.audio.max_samples()));
    let (chunk_tx, chunk_rx) = std::sync::mpsc::channel();
    let _feeder = recorder.spawn_feeder(
        chunk_rx,
        capture.sample_rate(),
        capture.channels(),
        config.audio.sample_rate,
    );
    let _stream = capture
        .start(chunk_tx)
        .context("could not start the audio stream")?;

    // --- Remaining collaborators -------------------------------------------
    let formatter: Arc<dyn TextFormatter> = Arc::new(ApiFormatter::from_config(&config.llm));
    let inserter: Arc<dyn TextInserter> = Arc::new(ClipboardInserter::from_config(
        &config.insertion,
    ));
    let media: Arc<dyn MediaCoordinator> = Arc::new(MediaKeys::from_config(&config.media));

    // --- Orchestrator + listener -------------------------------------------
    let (event_tx, event_rx) = mpsc::channel::<PipelineEvent>(16);

    let orchestrator = PipelineOrchestrator::new(
        config.clone(),
        recorder.clone() as Arc<dyn CaptureSource>,
        stt,
        formatter,
        inserter,
        media,
        &event_tx,
    );

    let _listener = HotkeyListener::start(trigger, event_tx.clone());
    log::info!(
        "ready — hold {} to speak",
        config.hotkey.trigger_key
    );

    // --- Event loop ---------------------------------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("could not create tokio runtime")?;

    runtime.block_on(async move {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("interrupt received");
                let _ = event_tx.send(PipelineEvent::Shutdown).await;
            }
        });

        orchestrator.run(event_rx).await
    })?;

    log::info!("whisperkey stopped");
    Ok(())
}
