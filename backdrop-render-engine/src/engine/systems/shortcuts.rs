use bevy::prelude::*;

use crate::engine::assets::section_manifest::SectionDirectory;
use crate::engine::background::systems::TransitionRequest;
use crate::engine::core::lifecycle::DisposeRequest;

const SECTION_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

/// Digits 1-5 show the matching section's background; Escape disposes.
pub fn handle_native_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    sections: Res<SectionDirectory>,
    mut transitions: EventWriter<TransitionRequest>,
    mut dispose: EventWriter<DisposeRequest>,
) {
    for (index, key) in SECTION_KEYS.iter().enumerate() {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        if let Some(asset) = sections.asset_at(index) {
            transitions.write(TransitionRequest {
                asset: asset.to_string(),
            });
        }
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        dispose.write(DisposeRequest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_key_requests_section_background() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<SectionDirectory>()
            .add_event::<TransitionRequest>()
            .add_event::<DisposeRequest>()
            .add_systems(Update, handle_native_shortcuts);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit3);
        app.update();

        let requests: Vec<TransitionRequest> = app
            .world_mut()
            .resource_mut::<Events<TransitionRequest>>()
            .drain()
            .collect();
        assert_eq!(
            requests,
            vec![TransitionRequest {
                asset: "3-min.jpg".to_string()
            }]
        );
        assert!(app.world().resource::<Events<DisposeRequest>>().is_empty());
    }
}
