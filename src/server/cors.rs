use actix_web::{http::header, HttpResponse, HttpResponseBuilder};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Adds the permissive cross-origin headers (and the JSON content type)
/// carried by every response of the endpoint.
pub fn with_cors(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .insert_header((header::CONTENT_TYPE, "application/json"));
    builder
}

pub fn preflight() -> HttpResponse {
    with_cors(HttpResponse::Ok()).finish()
}
