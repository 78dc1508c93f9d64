// src/audio/player.rs
//! Playback engine using rodio, tapping played samples for the waterfall.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use ringbuf::{HeapCons, HeapProd, HeapRb, traits::*};
use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::{debug, warn};

use super::sample_capture::SampleCapture;

/// What to feed through the capture tap.
#[derive(Debug, Clone)]
pub enum PlaybackSource {
    /// Decode and play an audio file.
    File(PathBuf),
    /// Play a sine tone at the given frequency in Hz.
    Tone(f32),
}

/// Commands sent to the audio playback thread.
enum PlayerCommand {
    Play(PlaybackSource),
    Stop,
}

/// Player that owns the output stream on a background thread and exposes the
/// consumer half of the capture ring.
pub struct Player {
    /// Sender to the audio thread for commands
    cmd_tx: Sender<PlayerCommand>,
    /// Mirrored from the audio thread for quick UI access
    is_playing_flag: Arc<AtomicBool>,
    /// Sample rate of the source currently playing, 0 when idle
    sample_rate: Arc<AtomicU32>,
    /// Mono samples tapped from playback
    consumer: HeapCons<f32>,
}

impl Player {
    /// Spawn the audio thread. `ring_capacity` bounds how many samples may
    /// queue between two drains.
    pub fn new(ring_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel::<PlayerCommand>();
        let (producer, consumer) = HeapRb::<f32>::new(ring_capacity.max(1)).split();

        let is_playing_flag = Arc::new(AtomicBool::new(false));
        let sample_rate = Arc::new(AtomicU32::new(0));
        let playing = is_playing_flag.clone();
        let rate = sample_rate.clone();

        thread::spawn(move || {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(err) => {
                    warn!(%err, "no audio output available; playback disabled");
                    while rx.recv().is_ok() {}
                    return;
                }
            };

            // The producer moves into the first capture; there is one tap per player.
            let mut producer: Option<HeapProd<f32>> = Some(producer);
            let mut sink: Option<Sink> = None;

            while let Ok(cmd) = rx.recv() {
                match cmd {
                    PlayerCommand::Play(source) => {
                        let Some(prod) = producer.take() else {
                            warn!("capture tap already in use; ignoring play request");
                            continue;
                        };
                        match start(&handle, source, prod) {
                            Ok((new_sink, source_rate)) => {
                                rate.store(source_rate, Ordering::SeqCst);
                                playing.store(true, Ordering::SeqCst);
                                sink = Some(new_sink);
                            }
                            Err(err) => {
                                warn!("playback failed: {err:#}");
                            }
                        }
                    }
                    PlayerCommand::Stop => {
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        playing.store(false, Ordering::SeqCst);
                    }
                }
            }
            if let Some(s) = sink.take() {
                s.stop();
            }
            // Keep stream alive until thread exits
            drop(stream);
        });

        Self {
            cmd_tx: tx,
            is_playing_flag,
            sample_rate,
            consumer,
        }
    }

    /// Start playing `source`.
    ///
    /// The capture tap feeds a single source for the player's lifetime;
    /// later requests are refused on the audio thread with a warning.
    pub fn play(&mut self, source: PlaybackSource) -> Result<()> {
        debug!(?source, "play requested");
        self.cmd_tx
            .send(PlayerCommand::Play(source))
            .context("audio thread has exited")
    }

    /// Immediately halt playback (if any).
    pub fn stop(&mut self) {
        let _ = self.cmd_tx.send(PlayerCommand::Stop);
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing_flag.load(Ordering::SeqCst)
    }

    /// Sample rate of the current source in Hz, or `None` when idle.
    pub fn sample_rate(&self) -> Option<u32> {
        match self.sample_rate.load(Ordering::SeqCst) {
            0 => None,
            rate => Some(rate),
        }
    }

    /// Consumer half of the capture ring, drained once per tick.
    pub fn consumer_mut(&mut self) -> &mut HeapCons<f32> {
        &mut self.consumer
    }
}

/// Build a sink playing `source` through a capture tap.
fn start(
    handle: &rodio::OutputStreamHandle,
    source: PlaybackSource,
    producer: HeapProd<f32>,
) -> Result<(Sink, u32)> {
    let sink = Sink::try_new(handle).context("creating output sink")?;
    let rate = match source {
        PlaybackSource::File(path) => {
            let file =
                File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            let decoded = Decoder::new(BufReader::new(file))
                .with_context(|| format!("decoding {}", path.display()))?;
            let capturing = SampleCapture::new(decoded.convert_samples::<f32>(), producer);
            let rate = capturing.sample_rate();
            sink.append(capturing);
            rate
        }
        PlaybackSource::Tone(freq) => {
            let tone = SineWave::new(freq).amplify(0.2);
            let capturing = SampleCapture::new(tone, producer);
            let rate = capturing.sample_rate();
            sink.append(capturing);
            rate
        }
    };
    sink.play();
    Ok((sink, rate))
}
