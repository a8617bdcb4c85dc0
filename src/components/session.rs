use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::Collaborators;
use crate::funnel::identity::{resolve, SessionState};

#[hook]
pub fn use_collaborators() -> Collaborators {
    use_context::<Collaborators>().expect("Collaborators are provided by App")
}

/// Resolves the browser session once on mount. Starts out `Pending`.
#[hook]
pub fn use_session() -> SessionState {
    use_session_with(())
}

/// Resolves the browser session on mount and again whenever `deps` changes.
/// The previous state is kept until the new resolution lands.
#[hook]
pub fn use_session_with<D>(deps: D) -> SessionState
where
    D: PartialEq + 'static,
{
    let collaborators = use_collaborators();
    let state = use_state(|| SessionState::Pending);

    {
        let state = state.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let resolved = resolve(collaborators.identity.as_ref()).await;
                    state.set(resolved);
                });
                || ()
            },
            deps,
        );
    }

    (*state).clone()
}
