/// Playback state machine driving frame selection and palette choice.
use bevy::prelude::*;
use trajectory_format::ColorMap;
use trajectory_format::error::DatasetError;
use trajectory_format::render_settings::PLAYBACK_INTERVAL_SECS;

use crate::engine::assets::dataset_loader::SceneDataset;
use crate::engine::point_cloud::RebuildPointCloud;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Stopped,
    Playing,
}

/// Transport and palette commands. Every input surface (keyboard, transport
/// buttons, seek bar, playback timer) emits these; the dispatcher below is
/// the sole mutator of the viewer context.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    First,
    Last,
    Next,
    Prev,
    Seek(usize),
    TogglePlay,
    SetPalette(ColorMap),
}

/// What an applied command asks of the rest of the tick.
#[derive(Debug, PartialEq, Eq)]
pub enum Transition {
    /// Geometry for the current frame must be rebuilt and swapped in.
    Rebuild,
    /// Play state flipped; the playback timer must restart from zero.
    PlayStateChanged,
    /// Nothing to do.
    None,
}

/// Transient per-session viewer state: current frame, palette and play
/// flag. The dataset itself stays immutable beside it.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewerContext {
    pub current_frame: usize,
    pub palette: ColorMap,
    pub mode: PlaybackMode,
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self {
            current_frame: 0,
            palette: ColorMap::Viridis,
            mode: PlaybackMode::Stopped,
        }
    }
}

impl ViewerContext {
    /// Apply one command against the dataset's frame count. Stepping wraps
    /// modulo the frame count; an out-of-bounds seek is rejected and leaves
    /// the context untouched.
    pub fn apply(
        &mut self,
        command: PlaybackCommand,
        frame_count: usize,
    ) -> Result<Transition, DatasetError> {
        match command {
            PlaybackCommand::First => {
                self.current_frame = 0;
                Ok(Transition::Rebuild)
            }
            PlaybackCommand::Last => {
                self.current_frame = frame_count - 1;
                Ok(Transition::Rebuild)
            }
            PlaybackCommand::Next => {
                self.current_frame = (self.current_frame + 1) % frame_count;
                Ok(Transition::Rebuild)
            }
            PlaybackCommand::Prev => {
                self.current_frame = (self.current_frame + frame_count - 1) % frame_count;
                Ok(Transition::Rebuild)
            }
            PlaybackCommand::Seek(index) => {
                if index >= frame_count {
                    return Err(DatasetError::IndexOutOfRange { index, frame_count });
                }
                self.current_frame = index;
                Ok(Transition::Rebuild)
            }
            PlaybackCommand::TogglePlay => {
                self.mode = match self.mode {
                    PlaybackMode::Stopped => PlaybackMode::Playing,
                    PlaybackMode::Playing => PlaybackMode::Stopped,
                };
                Ok(Transition::PlayStateChanged)
            }
            PlaybackCommand::SetPalette(palette) => {
                if palette == self.palette {
                    return Ok(Transition::None);
                }
                self.palette = palette;
                Ok(Transition::Rebuild)
            }
        }
    }
}

/// Fixed-cadence playback clock. Reset on every play state change so no
/// stale tick fires after a stop.
#[derive(Resource)]
pub struct PlaybackTimer(pub Timer);

impl Default for PlaybackTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(
            PLAYBACK_INTERVAL_SECS,
            TimerMode::Repeating,
        ))
    }
}

/// Fire `Next` at the playback cadence while playing.
pub fn advance_playback(
    time: Res<Time>,
    mut timer: ResMut<PlaybackTimer>,
    context: Res<ViewerContext>,
    mut commands_out: EventWriter<PlaybackCommand>,
) {
    if context.mode != PlaybackMode::Playing {
        return;
    }
    if timer.0.tick(time.delta()).just_finished() {
        commands_out.send(PlaybackCommand::Next);
    }
}

/// Sole mutator of the viewer context: drains the command queue, applies
/// transitions and requests geometry rebuilds and timer restarts.
pub fn apply_playback_commands(
    mut events: EventReader<PlaybackCommand>,
    mut context: ResMut<ViewerContext>,
    mut timer: ResMut<PlaybackTimer>,
    dataset: Option<Res<SceneDataset>>,
    mut rebuild: EventWriter<RebuildPointCloud>,
) {
    let Some(dataset) = dataset else {
        events.clear();
        return;
    };
    let frame_count = dataset.0.frame_count();

    for &command in events.read() {
        match context.apply(command, frame_count) {
            Ok(Transition::Rebuild) => {
                rebuild.send(RebuildPointCloud);
            }
            Ok(Transition::PlayStateChanged) => {
                timer.0.reset();
            }
            Ok(Transition::None) => {}
            Err(err) => warn!("playback command rejected: {err}"),
        }
    }
}

/// Keyboard transport: arrows step, space toggles playback, C cycles the
/// palette. Mirrors the on-screen transport buttons.
pub fn playback_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    context: Res<ViewerContext>,
    mut commands_out: EventWriter<PlaybackCommand>,
) {
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        commands_out.send(PlaybackCommand::Prev);
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        commands_out.send(PlaybackCommand::Next);
    }
    if keyboard.just_pressed(KeyCode::Space) {
        commands_out.send(PlaybackCommand::TogglePlay);
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        commands_out.send(PlaybackCommand::SetPalette(context.palette.next()));
    }
}
