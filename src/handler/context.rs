use crate::error::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// The response of the request being handled
#[async_trait]
pub trait ResponseContext: Send {
    fn status(&self) -> StatusCode;

    fn set_status(&mut self, status: StatusCode);

    async fn write_body(&mut self, body: String, content_type: &'static str) -> Result<()>;
}

/// An in-memory response that records every write.
///
/// Aggregate faults write once per member; converting into an axum
/// [`Response`] keeps the last body, matching the final status.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    content_type: Option<&'static str>,
    writes: Vec<String>,
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferedResponse {
    /// A response that nothing has been written to yet (200 OK)
    pub fn new() -> Self {
        Self::with_status(StatusCode::OK)
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            writes: Vec::new(),
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    /// Every body written, in order
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// The last body written
    pub fn body(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }
}

#[async_trait]
impl ResponseContext for BufferedResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    async fn write_body(&mut self, body: String, content_type: &'static str) -> Result<()> {
        self.content_type = Some(content_type);
        self.writes.push(body);
        Ok(())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(mut self) -> Response {
        let body = self.writes.pop().map(Body::from).unwrap_or_else(Body::empty);
        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static(content_type),
            );
        }
        response
    }
}
