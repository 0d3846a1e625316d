use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::games;
use crate::middleware::require_auth;

/// Full application router: public auth endpoints plus the session-gated
/// game resource. Trailing slashes are part of the public paths.
pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/login/", post(auth::login))
        .route("/register/", post(auth::register))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/games/", get(games::list_games).post(games::create_game))
        .route(
            "/games/{id}/",
            get(games::get_game)
                .put(games::update_game)
                .patch(games::update_game)
                .delete(games::delete_game),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
