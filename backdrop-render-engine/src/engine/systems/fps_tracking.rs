use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::FpsText;
use crate::engine::core::lifecycle::SceneEntity;
use crate::rpc::web_rpc::WebRpcInterface;

/// Seconds between two `fps_update` notifications.
const FPS_NOTIFICATION_INTERVAL: f32 = 0.5;

/// Smoothed frame rate, if the diagnostic has samples yet.
pub fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    if current_time - *last_send_time >= FPS_NOTIFICATION_INTERVAL {
        if let Some(value) = smoothed_fps(&diagnostics) {
            rpc_interface.send_notification(
                "fps_update",
                serde_json::json!({
                    "fps": value as f32
                }),
            );
            *last_send_time = current_time;
        }
    }
}

pub fn spawn_fps_overlay(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            SceneEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 1., 1.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {value:.1}");
    }
}
