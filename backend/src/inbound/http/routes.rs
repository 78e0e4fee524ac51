//! Route table for the account API.

use actix_web::web;

use super::error::{form_error_handler, json_error_handler};
use super::users;

/// Mount the `/api/v1/user` scope.
///
/// Expects [`super::state::HttpState`] to be registered as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use accounts::inbound::http::routes;
///
/// let _app = App::new().configure(routes::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/user")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::FormConfig::default().error_handler(form_error_handler))
            .service(users::register)
            .service(users::login)
            .service(users::me)
            .service(users::logout),
    );
}
