//! Request body extractor accepting JSON or URL-encoded forms.
//!
//! The body format is chosen from the `Content-Type` header:
//! `application/x-www-form-urlencoded` binds through [`web::Form`], anything
//! else through [`web::Json`]. Both paths report failures through the
//! envelope handlers registered in [`super::routes`].

use actix_web::dev::Payload;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

const FORM_MIME: &str = "application/x-www-form-urlencoded";

/// Deserialised request body.
#[derive(Debug)]
pub struct RequestBody<T>(pub T);

impl<T> RequestBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

fn is_form(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_MIME))
}

impl<T> FromRequest for RequestBody<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_form(req) {
            let form = web::Form::<T>::from_request(req, payload);
            Box::pin(async move { form.await.map(|body| Self(body.into_inner())) })
        } else {
            let json = web::Json::<T>::from_request(req, payload);
            Box::pin(async move { json.await.map(|body| Self(body.into_inner())) })
        }
    }
}
