//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, sweets, health)
//! - **Schemas**: request bodies and response envelopes defined by the HTTP
//!   adapter, so domain types stay free of utoipa derives
//! - **Security**: bearer token authentication scheme

use crate::inbound::http::accounts::{LoginBody, RegisterBody, SessionResponse, UserResponse};
use crate::inbound::http::envelope::{Acknowledgement, ErrorEnvelope};
use crate::inbound::http::sweets::{
    PurchaseResponse, QuantityBody, RestockResponse, SweetBody, SweetResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/auth/register or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Sweet shop inventory API",
        description = "Catalogue, stock, and account endpoints for the sweet shop."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::sweets::list_sweets,
        crate::inbound::http::sweets::search_sweets,
        crate::inbound::http::sweets::create_sweet,
        crate::inbound::http::sweets::update_sweet,
        crate::inbound::http::sweets::delete_sweet,
        crate::inbound::http::sweets::purchase_sweet,
        crate::inbound::http::sweets::restock_sweet,
        crate::inbound::http::health::banner,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        Acknowledgement,
        RegisterBody,
        LoginBody,
        UserResponse,
        SessionResponse,
        SweetBody,
        QuantityBody,
        SweetResponse,
        PurchaseResponse,
        RestockResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "sweets", description = "Catalogue and stock operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
