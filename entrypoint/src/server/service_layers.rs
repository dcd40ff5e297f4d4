use axum::http::{
    HeaderName, HeaderValue, Method,
    header::{ACCEPT, CONTENT_TYPE},
};
use tower::{
    ServiceBuilder,
    layer::util::{Identity, Stack},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

pub const EDIT_PASSWORD_HEADER: &str = "x-edit-password";

fn allow_origin(cors_origin: Option<&str>) -> AllowOrigin {
    let Some(origin) = cors_origin else {
        return AllowOrigin::from(Any);
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!("Ignoring unusable CORS origin {origin:?}, allowing any origin");
            AllowOrigin::from(Any)
        }
    }
}

pub(crate) fn build_service_layers(
    cors_origin: Option<&str>,
) -> ServiceBuilder<Stack<CorsLayer, Identity>> {
    let cors_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static(EDIT_PASSWORD_HEADER),
        ])
        .allow_origin(allow_origin(cors_origin));

    ServiceBuilder::new().layer(cors_layer)
}
