use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use mixology_core::health::{database_ready, healthz};
use mixology_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    bookmark::{get_bookmark, get_bookmarks, toggle_bookmark},
    catalog::search_catalog,
    drink::{
        create_drink, delete_drink, get_drink, get_drinks, get_my_drinks, refresh_drink,
        update_drink,
    },
    reference::{get_categories, get_glasses, get_ingredients, get_languages},
    session::{get_session, login, logout},
    user::{check_username, create_user, delete_me, get_me, update_me},
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_ready(&state.db).await
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", post(create_user))
        .route("/users/available", get(check_username))
        .route("/users/@me", get(get_me).patch(update_me).delete(delete_me))
        .route("/users/@me/drinks", get(get_my_drinks))
        // Session
        .route("/session", get(get_session).post(login).delete(logout))
        // Reference tables
        .route("/languages", get(get_languages))
        .route("/categories", get(get_categories))
        .route("/glasses", get(get_glasses))
        .route("/ingredients", get(get_ingredients))
        // Upstream catalog
        .route("/search", get(search_catalog))
        // Drinks
        .route("/drinks", get(get_drinks).post(create_drink))
        .route(
            "/drinks/{id}",
            get(get_drink)
                .put(refresh_drink)
                .patch(update_drink)
                .delete(delete_drink),
        )
        // Bookmarks
        .route("/bookmarks", get(get_bookmarks))
        .route(
            "/bookmarks/{drink_id}",
            get(get_bookmark).post(toggle_bookmark),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
