use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Engine modules
use crate::engine::animation::frame::{FrameSignals, capture_frame_signals};
use crate::engine::animation::model_motion::update_model_motion;
use crate::engine::assets::section_manifest::{
    SectionDirectory, SectionManifest, apply_section_manifest, start_section_manifest_load,
};
use crate::engine::background::systems::{
    TransitionRequest, advance_crossfade, complete_texture_loads, handle_transition_requests,
    setup_background,
};
use crate::engine::core::capability::FidelityTier;
use crate::engine::core::error::BackdropError;
use crate::engine::core::lifecycle::{DisposeRequest, SceneLifetime, handle_dispose_requests};
use crate::engine::core::settings::BackdropSettings;
use crate::engine::core::window_config::create_window_config;
use crate::engine::input::pointer::setup_pointer_tracker;
use crate::engine::input::scroll::ScrollTarget;
use crate::engine::loading::model_loader::{ModelLoader, spawn_loaded_model, start_model_load};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::materials::BackdropMaterialsPlugin;
use crate::engine::materials::swirl::{SwirlLiteMaterial, SwirlMaterial, update_swirl_uniforms};
use crate::engine::scene::camera::{RenderBudget, apply_render_budget, spawn_camera};
use crate::engine::scene::environment::{EnvironmentReflection, update_environment_map};
use crate::engine::scene::lighting::{spawn_lights, update_lighting};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::teardown::teardown_scene;
// Web RPC modules
use crate::rpc::handlers::{
    ContextFailure, finish_fail_closed, handle_fail_closed_commands, handle_scene_commands,
};
use crate::rpc::web_rpc::{RpcSet, WebRpcPlugin};
// Transitions
use crate::engine::core::app_state::{
    BackdropState, announce_running, scene_is_live, transition_to_loading, transition_to_running,
};

#[cfg(target_arch = "wasm32")]
use crate::engine::core::dom::DomListeners;
#[cfg(target_arch = "wasm32")]
use crate::engine::input::pointer::{drain_pointer_samples, setup_pointer_listener};
#[cfg(target_arch = "wasm32")]
use crate::engine::systems::teardown::release_dom;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::input::pointer::track_cursor;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::input::scroll::scroll_with_mouse_wheel;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::shortcuts::handle_native_shortcuts;

/// Per-frame work in the order one tick needs it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum TickSet {
    /// Pointer and scroll sources write their signals.
    Input,
    /// Signals are captured and the scene advances.
    Advance,
}

pub fn create_app(tier: FidelityTier) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<BackdropState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SectionManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SectionManifest>::new(&["sections.json"]))
        .add_plugins(BackdropMaterialsPlugin)
        .add_plugins(WebRpcPlugin);

    #[cfg(target_arch = "wasm32")]
    app.insert_non_send_resource(DomListeners::default());

    // Initialise resources early
    app.insert_resource(tier)
        .init_resource::<BackdropSettings>()
        .init_resource::<SceneLifetime>()
        .init_resource::<LoadingProgress>()
        .init_resource::<ModelLoader>()
        .init_resource::<SectionDirectory>()
        .init_resource::<ScrollTarget>()
        .init_resource::<FrameSignals>()
        .init_resource::<RenderBudget>()
        .init_resource::<EnvironmentReflection>()
        .add_event::<TransitionRequest>()
        .add_event::<DisposeRequest>();

    info!("Backdrop fidelity tier: {:?}", tier);

    app.add_systems(
        Startup,
        (
            spawn_camera,
            spawn_lights,
            setup_background,
            start_model_load,
            start_section_manifest_load,
            setup_pointer_tracker,
            transition_to_loading,
        )
            .chain(),
    );

    #[cfg(target_arch = "wasm32")]
    app.add_systems(Startup, setup_pointer_listener);

    #[cfg(not(target_arch = "wasm32"))]
    app.add_systems(Startup, spawn_fps_overlay);

    // Host commands are executed before the scene reacts to them.
    app.configure_sets(
        Update,
        (TickSet::Input, TickSet::Advance)
            .chain()
            .after(RpcSet::Handle)
            .before(RpcSet::Send),
    )
    .add_systems(Update, handle_scene_commands.in_set(RpcSet::Handle))
    .add_systems(
        Update,
        handle_dispose_requests
            .after(RpcSet::Handle)
            .before(TickSet::Input),
    );

    // Loads, requests and resize handling, ahead of the tick.
    app.add_systems(
        Update,
        (
            handle_transition_requests,
            complete_texture_loads,
            spawn_loaded_model,
            apply_section_manifest,
            apply_render_budget,
        )
            .in_set(TickSet::Input)
            .run_if(scene_is_live),
    );

    #[cfg(target_arch = "wasm32")]
    app.add_systems(
        Update,
        drain_pointer_samples
            .in_set(TickSet::Input)
            .run_if(scene_is_live),
    );

    #[cfg(not(target_arch = "wasm32"))]
    app.add_systems(
        Update,
        (track_cursor, scroll_with_mouse_wheel, handle_native_shortcuts)
            .in_set(TickSet::Input)
            .run_if(scene_is_live),
    )
    .add_systems(Update, fps_text_update_system.run_if(scene_is_live));

    // The frame tick: one signal snapshot, then every consumer reads it.
    app.add_systems(
        Update,
        (
            capture_frame_signals,
            (
                update_swirl_uniforms::<SwirlMaterial>,
                update_swirl_uniforms::<SwirlLiteMaterial>,
                advance_crossfade,
                update_environment_map.after(advance_crossfade),
                update_lighting,
                update_model_motion,
            ),
        )
            .chain()
            .in_set(TickSet::Advance)
            .run_if(scene_is_live),
    )
    .add_systems(
        Update,
        fps_notification_system
            .in_set(TickSet::Advance)
            .run_if(scene_is_live),
    );

    // State transitions
    app.add_systems(
        Update,
        transition_to_running
            .after(TickSet::Input)
            .run_if(in_state(BackdropState::Loading)),
    )
    .add_systems(OnEnter(BackdropState::Running), announce_running)
    .add_systems(OnEnter(BackdropState::Disposed), teardown_scene);

    #[cfg(target_arch = "wasm32")]
    app.add_systems(OnEnter(BackdropState::Disposed), release_dom.after(teardown_scene));

    app
}

/// App used when no rendering context could be created. It never builds a
/// scene but still answers the host and honours `dispose`.
pub fn create_fail_closed_app(error: BackdropError) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin {
            filter: log_filter(),
            ..default()
        })
        .add_plugins(WebRpcPlugin)
        .insert_resource(ContextFailure(error))
        .add_event::<DisposeRequest>();

    #[cfg(target_arch = "wasm32")]
    app.insert_non_send_resource(DomListeners::default());

    app.add_systems(
        Update,
        (handle_fail_closed_commands, finish_fail_closed)
            .chain()
            .in_set(RpcSet::Handle),
    );

    #[cfg(target_arch = "wasm32")]
    app.add_systems(
        Update,
        release_dom
            .after(finish_fail_closed)
            .in_set(RpcSet::Handle)
            .run_if(on_event::<DisposeRequest>),
    );

    app
}

fn log_filter() -> String {
    "wgpu=error,naga=warn,backdrop_render_engine=info".to_string()
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: log_filter(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
