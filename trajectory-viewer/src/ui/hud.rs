/// On-screen shell: info panel, colormap legend and transport controls.
use bevy::prelude::*;
use bevy::ui::RelativeCursorPosition;
use trajectory_format::render_settings::LEGEND_SAMPLES;

use crate::engine::assets::dataset_loader::SceneDataset;
use crate::engine::point_cloud::RebuildPointCloud;
use crate::playback::controller::{PlaybackCommand, PlaybackMode, ViewerContext};

const NORMAL_BUTTON: Color = Color::srgb(0.0, 0.4, 1.0);
const HOVERED_BUTTON: Color = Color::srgb(0.0, 0.32, 0.8);
const PRESSED_BUTTON: Color = Color::srgb(0.0, 0.24, 0.6);
const PANEL_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.85);

#[derive(Component)]
pub struct InfoText;

#[derive(Component)]
pub struct FrameIndicatorText;

#[derive(Component)]
pub struct PlayButtonText;

#[derive(Component)]
pub struct PaletteNameText;

#[derive(Component)]
pub struct LegendMaxText;

#[derive(Component)]
pub struct LegendMinText;

#[derive(Component)]
pub struct SeekBar;

#[derive(Component)]
pub struct SeekBarFill;

/// One slice of the colorbar legend, indexed top to bottom.
#[derive(Component)]
pub struct ColorbarStrip(pub usize);

/// Transport actions wired to the on-screen buttons.
#[derive(Component, Clone, Copy)]
pub enum TransportButton {
    First,
    Prev,
    Play,
    Next,
    Last,
}

pub fn spawn_ui(commands: &mut Commands) {
    spawn_info_panel(commands);
    spawn_colormap_panel(commands);
    spawn_transport_panel(commands);
}

fn spawn_info_panel(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(20.0),
                left: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(14.0)),
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Particle Trajectory Viewer"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Loading..."),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                InfoText,
            ));
        });
}

fn spawn_colormap_panel(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(20.0),
                right: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(14.0)),
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Viridis"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                PaletteNameText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.67, 0.67, 0.67)),
                LegendMaxText,
            ));
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    ..default()
                })
                .with_children(|bar| {
                    for index in 0..LEGEND_SAMPLES {
                        bar.spawn((
                            Node {
                                width: Val::Px(26.0),
                                height: Val::Px(2.0),
                                ..default()
                            },
                            BackgroundColor(Color::BLACK),
                            ColorbarStrip(index),
                        ));
                    }
                });
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.67, 0.67, 0.67)),
                LegendMinText,
            ));
        });
}

fn spawn_transport_panel(commands: &mut Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(30.0),
            width: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(16.0)),
                        row_gap: Val::Px(8.0),
                        ..default()
                    },
                    BackgroundColor(PANEL_BACKGROUND),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new("Frame - / -"),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        FrameIndicatorText,
                    ));

                    panel
                        .spawn(Node {
                            flex_direction: FlexDirection::Row,
                            ..default()
                        })
                        .with_children(|row| {
                            for (label, action) in [
                                ("First", TransportButton::First),
                                ("Previous", TransportButton::Prev),
                                ("Play", TransportButton::Play),
                                ("Next", TransportButton::Next),
                                ("Last", TransportButton::Last),
                            ] {
                                row.spawn((
                                    Button,
                                    action,
                                    Node {
                                        padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                                        margin: UiRect::all(Val::Px(4.0)),
                                        ..default()
                                    },
                                    BackgroundColor(NORMAL_BUTTON),
                                ))
                                .with_children(|button| {
                                    let text = (
                                        Text::new(label),
                                        TextFont {
                                            font_size: 14.0,
                                            ..default()
                                        },
                                        TextColor(Color::WHITE),
                                    );
                                    if matches!(action, TransportButton::Play) {
                                        button.spawn((text, PlayButtonText));
                                    } else {
                                        button.spawn(text);
                                    }
                                });
                            }
                        });

                    panel
                        .spawn((
                            Node {
                                width: Val::Px(400.0),
                                height: Val::Px(14.0),
                                margin: UiRect::top(Val::Px(6.0)),
                                ..default()
                            },
                            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
                            Interaction::default(),
                            RelativeCursorPosition::default(),
                            SeekBar,
                        ))
                        .with_children(|bar| {
                            bar.spawn((
                                Node {
                                    width: Val::Percent(0.0),
                                    height: Val::Percent(100.0),
                                    ..default()
                                },
                                BackgroundColor(NORMAL_BUTTON),
                                SeekBarFill,
                            ));
                        });

                    panel.spawn((
                        Text::new("Drag to rotate - Scroll to zoom - Right-drag to pan"),
                        TextFont {
                            font_size: 11.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.67, 0.67, 0.67)),
                    ));
                });
        });
}

/// Translate button presses into playback commands and keep hover/pressed
/// colours responsive.
pub fn transport_buttons(
    mut interactions: Query<
        (&Interaction, &TransportButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut commands_out: EventWriter<PlaybackCommand>,
) {
    for (interaction, button, mut background) in &mut interactions {
        match *interaction {
            Interaction::Pressed => {
                *background = BackgroundColor(PRESSED_BUTTON);
                commands_out.send(match button {
                    TransportButton::First => PlaybackCommand::First,
                    TransportButton::Prev => PlaybackCommand::Prev,
                    TransportButton::Play => PlaybackCommand::TogglePlay,
                    TransportButton::Next => PlaybackCommand::Next,
                    TransportButton::Last => PlaybackCommand::Last,
                });
            }
            Interaction::Hovered => {
                *background = BackgroundColor(HOVERED_BUTTON);
            }
            Interaction::None => {
                *background = BackgroundColor(NORMAL_BUTTON);
            }
        }
    }
}

/// Map presses on the seek bar to a bounded frame index. Dragging keeps
/// emitting seeks, like scrubbing a slider.
pub fn seek_bar_interaction(
    bars: Query<(&Interaction, &RelativeCursorPosition), With<SeekBar>>,
    dataset: Option<Res<SceneDataset>>,
    mut commands_out: EventWriter<PlaybackCommand>,
) {
    let Some(dataset) = dataset else {
        return;
    };
    let frame_count = dataset.0.frame_count();

    for (interaction, cursor) in &bars {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let Some(position) = cursor.normalized else {
            continue;
        };
        let fraction = position.x.clamp(0.0, 1.0);
        let index = (fraction * frame_count.saturating_sub(1) as f32).round() as usize;
        commands_out.send(PlaybackCommand::Seek(index));
    }
}

/// Refresh every readout after a geometry swap or play state change:
/// particle count, scalar range, frame position, play label, seek fill and
/// the legend strip.
pub fn refresh_hud(
    mut events: EventReader<RebuildPointCloud>,
    context: Res<ViewerContext>,
    dataset: Option<Res<SceneDataset>>,
    mut texts: ParamSet<(
        Query<&mut Text, With<InfoText>>,
        Query<&mut Text, With<FrameIndicatorText>>,
        Query<&mut Text, With<PlayButtonText>>,
        Query<&mut Text, With<PaletteNameText>>,
        Query<&mut Text, With<LegendMaxText>>,
        Query<&mut Text, With<LegendMinText>>,
    )>,
    mut fill: Query<&mut Node, With<SeekBarFill>>,
    mut strips: Query<(&ColorbarStrip, &mut BackgroundColor)>,
) {
    let triggered = !events.is_empty() || context.is_changed();
    events.clear();
    if !triggered {
        return;
    }
    let Some(dataset) = dataset else {
        return;
    };
    let Ok(frame) = dataset.0.frame(context.current_frame) else {
        return;
    };
    let frame_count = dataset.0.frame_count();

    if let Ok(mut text) = texts.p0().single_mut() {
        text.0 = format!(
            "Particles: {}\nRange: {:.2} - {:.2}",
            frame.count(),
            frame.raw_min(),
            frame.raw_max()
        );
    }
    if let Ok(mut text) = texts.p1().single_mut() {
        text.0 = format!(
            "Frame {} / {} (Step {})",
            context.current_frame + 1,
            frame_count,
            frame.frame_index()
        );
    }
    if let Ok(mut text) = texts.p2().single_mut() {
        text.0 = match context.mode {
            PlaybackMode::Playing => "Pause".to_string(),
            PlaybackMode::Stopped => "Play".to_string(),
        };
    }
    if let Ok(mut text) = texts.p3().single_mut() {
        text.0 = context.palette.name().to_string();
    }
    // Legend labels carry the global extrema; particle colours stay
    // normalised within each frame.
    if let Ok(mut text) = texts.p4().single_mut() {
        text.0 = format!("{:.2}", dataset.0.global_max());
    }
    if let Ok(mut text) = texts.p5().single_mut() {
        text.0 = format!("{:.2}", dataset.0.global_min());
    }

    if let Ok(mut node) = fill.single_mut() {
        let fraction = if frame_count > 1 {
            context.current_frame as f32 / (frame_count - 1) as f32
        } else {
            1.0
        };
        node.width = Val::Percent(fraction * 100.0);
    }

    let gradient = context.palette.gradient(LEGEND_SAMPLES);
    for (strip, mut background) in &mut strips {
        let [r, g, b] = gradient[strip.0.min(gradient.len() - 1)];
        *background = BackgroundColor(Color::srgb(r, g, b));
    }
}
