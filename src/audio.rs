//! Sound effect playback
//!
//! The engine only emits `SoundEvent`s; this module decides which file each
//! one plays. Missing assets or a missing output device just mean silence.

use crate::game::SoundEvent;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    SelectMove,
    SelectConfirm,
    SelectBack,
    Place,
    Reject,
    Clear,
    ClearMulti,
    Combo,
    GameOver,
}

impl Sfx {
    fn filename(&self) -> &'static str {
        match self {
            Sfx::SelectMove => "select_move.wav",
            Sfx::SelectConfirm => "select_confirm.wav",
            Sfx::SelectBack => "select_back.wav",
            Sfx::Place => "place.wav",
            Sfx::Reject => "reject.wav",
            Sfx::Clear => "clear.wav",
            Sfx::ClearMulti => "clear_multi.wav",
            Sfx::Combo => "combo.wav",
            Sfx::GameOver => "game_over.wav",
        }
    }
}

impl From<SoundEvent> for Sfx {
    fn from(event: SoundEvent) -> Self {
        match event {
            SoundEvent::Place => Sfx::Place,
            SoundEvent::Reject => Sfx::Reject,
            SoundEvent::Clear { lines: 1 } => Sfx::Clear,
            SoundEvent::Clear { .. } => Sfx::ClearMulti,
            SoundEvent::Combo { .. } => Sfx::Combo,
            SoundEvent::GameOver => Sfx::GameOver,
        }
    }
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    assets_path: PathBuf,
    sfx_volume: f32,
}

impl AudioManager {
    /// Create a new audio manager
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = OutputStream::try_default().ok()?;
        let assets_path = Self::find_assets_path()?;
        tracing::info!("Audio assets at {}", assets_path.display());

        Some(Self {
            _stream: stream,
            stream_handle,
            assets_path,
            sfx_volume: 0.5,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("assets"),
            std::env::current_exe().ok()?.parent()?.join("assets"),
        ];

        paths.iter().find(|p| p.join("sfx").exists()).cloned()
    }

    /// Set SFX volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Play every cue the engine emitted this frame
    pub fn play_events(&mut self, events: &[SoundEvent]) {
        for &event in events {
            self.play_sfx(event.into());
        }
    }

    /// Play a sound effect
    pub fn play_sfx(&mut self, sfx: Sfx) {
        if self.sfx_volume <= 0.0 {
            return;
        }

        let path = self.assets_path.join("sfx").join(sfx.filename());
        let Ok(file) = File::open(&path) else {
            tracing::debug!("Missing sound {}", path.display());
            return;
        };
        let Ok(decoder) = Decoder::new(BufReader::new(file)) else { return };
        let Ok(sink) = Sink::try_new(&self.stream_handle) else { return };

        sink.set_volume(self.sfx_volume);
        sink.append(decoder);
        sink.detach(); // Let it play and clean up automatically
    }
}
