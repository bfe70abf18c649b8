//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod state;
pub mod sweets;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api` scope with envelope-shaped extractor errors.
///
/// Callers supply [`state::HttpState`] as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use sweetshop::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
            .service(accounts::register)
            .service(accounts::login)
            .service(sweets::list_sweets)
            .service(sweets::search_sweets)
            .service(sweets::create_sweet)
            .service(sweets::update_sweet)
            .service(sweets::delete_sweet)
            .service(sweets::purchase_sweet)
            .service(sweets::restock_sweet),
    );
}
