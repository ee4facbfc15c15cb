//! Route definitions for the Courtside HTTP API.
//!
//! Routes are grouped by domain and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(user_routes())
        .merge(pista_routes())
        .merge(booking_routes())
        .merge(class_routes())
        .merge(club_routes())
        .merge(payment_routes())
        .merge(health_routes());

    let cors = middleware::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::request_logging))
        .with_state(state)
}

/// Registration, login, refresh rotation, logout, sessions
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/sessions", get(handlers::auth::sessions))
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile/me",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route(
            "/profile/change-password",
            post(handlers::profile::change_password),
        )
}

/// Admin user management
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users/{id}/role", put(handlers::users::change_role))
        .route("/users/{id}/active", put(handlers::users::set_active))
        .route("/roles", get(handlers::users::list_roles))
}

fn pista_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pistas",
            get(handlers::pistas::list_pistas).post(handlers::pistas::create_pista),
        )
        .route(
            "/pistas/{id}",
            get(handlers::pistas::get_pista)
                .patch(handlers::pistas::update_pista)
                .delete(handlers::pistas::deactivate_pista),
        )
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route("/bookings/mine", get(handlers::bookings::list_my_bookings))
        .route(
            "/bookings/{id}",
            get(handlers::bookings::get_booking)
                .put(handlers::bookings::update_booking)
                .delete(handlers::bookings::delete_booking),
        )
        .route("/bookings/{id}/cancel", post(handlers::bookings::cancel_booking))
        .route("/bookings/{id}/confirm", post(handlers::bookings::confirm_booking))
        .route("/bookings/{id}/pay", post(handlers::bookings::pay_booking))
}

/// Classes, enrollment, and enrollment payment
fn class_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/classes",
            get(handlers::classes::list_classes).post(handlers::classes::create_class),
        )
        .route(
            "/classes/{id}",
            get(handlers::classes::get_class).put(handlers::classes::update_class),
        )
        .route("/classes/{id}/cancel", post(handlers::classes::cancel_class))
        .route("/classes/{id}/start", post(handlers::classes::start_class))
        .route(
            "/classes/{id}/enrollments",
            get(handlers::classes::list_enrollments)
                .post(handlers::classes::enroll)
                .delete(handlers::classes::unenroll),
        )
        .route("/enrollments/{id}", get(handlers::classes::get_enrollment))
        .route("/enrollments/{id}/pay", post(handlers::classes::pay_enrollment))
}

/// Clubs, memberships, and renewals
fn club_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/clubs",
            get(handlers::clubs::list_clubs).post(handlers::clubs::create_club),
        )
        .route(
            "/clubs/{id}",
            get(handlers::clubs::get_club)
                .patch(handlers::clubs::update_club)
                .delete(handlers::clubs::delete_club),
        )
        .route(
            "/clubs/{id}/members",
            get(handlers::clubs::list_members).post(handlers::clubs::add_member),
        )
        .route("/memberships/{id}", get(handlers::clubs::get_membership))
        .route("/memberships/{id}/suspend", post(handlers::clubs::suspend_membership))
        .route("/memberships/{id}/activate", post(handlers::clubs::activate_membership))
        .route("/memberships/{id}/cancel", post(handlers::clubs::cancel_membership))
        .route("/memberships/{id}/billing", put(handlers::clubs::update_billing))
        .route("/memberships/{id}/renew", post(handlers::clubs::renew_membership))
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(handlers::payments::list_payments))
        .route("/payments/mine", get(handlers::payments::list_my_payments))
        .route("/payments/{id}", get(handlers::payments::get_payment))
        .route("/payments/{id}/refund", post(handlers::payments::refund_payment))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
