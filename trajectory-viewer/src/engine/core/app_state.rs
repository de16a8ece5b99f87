use bevy::prelude::*;

/// Top-level application lifecycle. The viewer stays in `Loading` until the
/// dataset payload is resident and validated; everything interactive runs in
/// `Running`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}
