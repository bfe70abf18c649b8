//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take an [`Authenticated`] argument; extraction runs the access
//! gate against the `Authorization` header, so a handler body only ever sees
//! a resolved identity.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Identity};

use super::state::HttpState;

/// Identity of the caller, resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl Authenticated {
    /// Borrow the resolved identity.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        // Non-ASCII header values cannot carry a token; treat them as absent.
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let identity = state.access.authenticate(authorization.as_deref()).await?;
            Ok(Self(identity))
        })
    }
}
