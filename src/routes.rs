// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Tudo daqui para baixo exige Bearer. Verificação e dono/doador ficam nos
    // extratores e no DonationService.
    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/organizations", get(handlers::organizations::list_organizations))
        .route("/organizations/{id}", get(handlers::organizations::get_organization))
        .route("/catalog", get(handlers::catalog::get_catalog))
        .route(
            "/resources/{kind}",
            get(handlers::resources::list_resources).post(handlers::resources::create_resource),
        )
        .route(
            "/resources/{kind}/{id}",
            get(handlers::resources::get_resource).put(handlers::resources::update_resource),
        )
        .route("/inventory", get(handlers::resources::get_inventory))
        .route("/donations", get(handlers::donations::get_donation_board))
        .route("/stats", get(handlers::dashboard::get_stats))
        .route("/requests", post(handlers::requests::create_request))
        .route("/requests/received", get(handlers::requests::list_received))
        .route("/requests/sent", get(handlers::requests::list_sent))
        .route("/requests/{id}", patch(handlers::requests::decide_request))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", session_routes)
        .with_state(app_state)
}
