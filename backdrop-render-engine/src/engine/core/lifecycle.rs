use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;

use crate::engine::core::app_state::BackdropState;

/// Shared flag checked by asynchronous completions before they touch scene state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Owns the token handed to every load issued during this controller's lifetime.
#[derive(Resource, Debug, Clone, Default)]
pub struct SceneLifetime {
    token: CancellationToken,
}

impl SceneLifetime {
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Marks every entity torn down on disposal.
#[derive(Component, Default)]
pub struct SceneEntity;

/// Host asked for teardown.
#[derive(Event, Debug, Clone, Copy)]
pub struct DisposeRequest;

/// Move to `Disposed` exactly once, cancelling outstanding loads first so
/// completions that land afterwards are discarded.
pub fn handle_dispose_requests(
    mut requests: EventReader<DisposeRequest>,
    lifetime: Res<SceneLifetime>,
    state: Res<State<BackdropState>>,
    mut next_state: ResMut<NextState<BackdropState>>,
) {
    if requests.read().count() == 0 {
        return;
    }

    if *state.get() == BackdropState::Disposed || lifetime.is_disposed() {
        debug!("Dispose requested on an already disposed controller");
        return;
    }

    lifetime.token.cancel();
    info!("→ Dispose requested, entering Disposed state");
    next_state.set(BackdropState::Disposed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn cloned_tokens_observe_cancellation() {
        let lifetime = SceneLifetime::default();
        let in_flight = lifetime.token();
        assert!(!in_flight.is_cancelled());
        lifetime.token.cancel();
        assert!(in_flight.is_cancelled());
        assert!(lifetime.is_disposed());
    }

    #[test]
    fn dispose_request_reaches_disposed_once() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<BackdropState>()
            .init_resource::<SceneLifetime>()
            .add_event::<DisposeRequest>()
            .add_systems(Update, handle_dispose_requests);

        app.world_mut()
            .resource_mut::<NextState<BackdropState>>()
            .set(BackdropState::Running);
        app.update();

        let token = app.world().resource::<SceneLifetime>().token();
        app.world_mut().send_event(DisposeRequest);
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<BackdropState>>().get(),
            BackdropState::Disposed
        );
        assert!(token.is_cancelled());

        app.world_mut().send_event(DisposeRequest);
        app.update();
        assert_eq!(
            *app.world().resource::<State<BackdropState>>().get(),
            BackdropState::Disposed
        );
    }
}
