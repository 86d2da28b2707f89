//! rodio-backed `AudioSink`.
//!
//! Sound files are read into memory once at startup; a missing file is a
//! startup error. Playback problems after that (no device, undecodable data)
//! are logged and skipped.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::capabilities::{AudioSink, SilentAudio};

const SOUND_DIR: &str = "sounds";
const MUSIC_EXTENSION: &str = "mp3";

/// Encoded sound effects keyed by file name (`"jump.wav"`).
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    sounds: HashMap<String, Arc<[u8]>>,
}

impl SoundBank {
    pub fn load(asset_root: &Path, names: &[&str]) -> Result<Self, String> {
        let mut sounds = HashMap::with_capacity(names.len());
        for name in names {
            let path = asset_root.join(SOUND_DIR).join(name);
            let bytes = std::fs::read(&path)
                .map_err(|e| format!("Failed to read sound {}: {e}", path.display()))?;
            log::debug!("Loaded sound {} ({} bytes)", name, bytes.len());
            sounds.insert((*name).to_string(), Arc::from(bytes));
        }
        Ok(Self { sounds })
    }

    pub fn get(&self, name: &str) -> Option<Arc<[u8]>> {
        self.sounds.get(name).cloned()
    }
}

pub fn music_path(asset_root: &Path, name: &str) -> std::path::PathBuf {
    asset_root
        .join(SOUND_DIR)
        .join(format!("{name}.{MUSIC_EXTENSION}"))
}

pub struct RodioAudio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    bank: SoundBank,
    asset_root: std::path::PathBuf,
}

impl RodioAudio {
    pub fn new(bank: SoundBank, asset_root: &Path) -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to open audio output: {e}"))?;
        Ok(Self {
            _stream: stream,
            handle,
            music: None,
            bank,
            asset_root: asset_root.to_path_buf(),
        })
    }

    fn start_music(&self, name: &str, loops: i32, volume: f32) -> Result<Sink, String> {
        let path = music_path(&self.asset_root, name);
        let bytes = std::fs::read(&path)
            .map_err(|e| format!("Failed to read music {}: {e}", path.display()))?;
        let sink = Sink::try_new(&self.handle).map_err(|e| format!("{e}"))?;
        sink.set_volume(volume);

        let decode = || {
            Decoder::new(Cursor::new(bytes.clone()))
                .map_err(|e| format!("Failed to decode music {}: {e}", path.display()))
        };
        if loops < 0 {
            sink.append(decode()?.repeat_infinite());
        } else {
            for _ in 0..=loops {
                sink.append(decode()?);
            }
        }
        Ok(sink)
    }
}

impl AudioSink for RodioAudio {
    fn play_sound(&mut self, name: &str) {
        let Some(bytes) = self.bank.get(name) else {
            log::warn!("Sound '{}' was not preloaded", name);
            return;
        };
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Failed to play sound {}: {e}", name);
                return;
            }
        };
        match Decoder::new(Cursor::new(bytes)) {
            Ok(source) => {
                sink.append(source);
                sink.detach();
            }
            Err(e) => log::warn!("Failed to decode sound {}: {e}", name),
        }
    }

    fn play_music(&mut self, name: &str, loops: i32, volume: f32) {
        self.stop_music();
        match self.start_music(name, loops, volume) {
            Ok(sink) => {
                log::info!("Playing music '{}' (loops {}, volume {})", name, loops, volume);
                self.music = Some(sink);
            }
            Err(e) => log::warn!("{e}"),
        }
    }

    fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
            log::debug!("Music stopped");
        }
    }
}

/// Open the default device, or fall back to `SilentAudio`.
pub fn open_audio(bank: SoundBank, asset_root: &Path) -> Box<dyn AudioSink> {
    match RodioAudio::new(bank, asset_root) {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            log::warn!("{e}; continuing without sound");
            Box::new(SilentAudio)
        }
    }
}
