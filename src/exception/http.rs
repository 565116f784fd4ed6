use crate::exception::{DomainError, Fault};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Returning a fault from an axum handler produces a bare 500 response that
/// carries the fault in its extensions.
///
/// [`ExceptionHandlingLayer`](crate::layer::ExceptionHandlingLayer) takes the
/// fault back out and replaces the response with the classified one. Without
/// the layer the client still sees an empty 500.
impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        Fault::from(self).into_response()
    }
}
