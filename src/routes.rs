// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, category, game, profile, quiz},
    state::AppState,
    utils::jwt::{auth_middleware, superuser_middleware},
};

/// Assembles the main application router.
///
/// * Auth routes are public; everything else requires a bearer token.
/// * Category writes additionally require a superuser.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().expect("static origin"),
            "http://127.0.0.1:3000".parse().expect("static origin"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let category_routes = Router::new()
        .route("/", get(category::overview))
        .route("/leaves", get(category::list_leaves))
        .route("/middle", get(category::list_middle))
        .route("/{id}", get(category::get_category))
        .route("/{id}/children", get(category::list_children))
        .route("/{id}/descendants", get(category::list_descendants))
        .route("/{id}/questions", get(category::list_questions))
        .merge(
            Router::new()
                .route("/", post(category::create_category))
                .route("/{id}", axum::routing::delete(category::delete_category))
                .route_layer(middleware::from_fn(superuser_middleware)),
        );

    let quiz_routes = Router::new()
        .route("/", post(quiz::create_quiz))
        .route("/mine", get(quiz::list_my_quizzes))
        .route("/{id}/questions", post(quiz::add_question));

    let game_routes = Router::new()
        .route("/", get(game::list_open_games).post(game::create_game))
        .route("/{id}", get(game::get_game).delete(game::delete_game))
        .route("/{id}/start", post(game::start_game))
        .route("/{id}/stop", post(game::stop_game))
        .route("/{id}/join", post(game::join_game))
        .route("/{id}/leave", post(game::leave_game))
        .route("/{id}/answers", post(game::submit_answer))
        .route("/{id}/members", get(game::list_members))
        .route("/{id}/report", get(game::get_report))
        .route("/{id}/questions", get(game::get_question_details))
        .route("/{id}/session", get(game::get_session_data));

    let profile_routes = Router::new()
        .route("/games", get(profile::my_games))
        .route("/achievements", get(profile::my_achievements));

    let protected = Router::new()
        .nest("/api/categories", category_routes)
        .route("/api/questions", post(quiz::create_question))
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/games", game_routes)
        .nest("/api/profile", profile_routes)
        // route_layer: unmatched paths still reach the 404 fallback without a token.
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .merge(protected)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
