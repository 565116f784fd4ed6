use crate::exception::{BoxError, Fault};
use crate::handler::{BufferedResponse, ExceptionHandler};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer running the [`ExceptionHandler`] over failed requests
///
/// Handlers report failures by returning a [`Fault`] (or anything converting
/// into one). Errors of the inner service, including readiness errors, are
/// recovered with [`Fault::from_boxed`] and handled like any other fault.
///
/// # Example
/// ```
/// use faultline::prelude::*;
///
/// async fn show_user() -> std::result::Result<Json<&'static str>, Fault> {
///     Err(DomainError::resource_not_found([DetailItem::new("User", "id 7")]).into())
/// }
///
/// let handler = ExceptionHandler::new(Arc::new(HandlerConfiguration::default()));
/// let app: Router = Router::new()
///     .route("/users/7", axum::routing::get(show_user))
///     .layer(ExceptionHandlingLayer::new(Arc::new(handler)));
/// ```
#[derive(Clone)]
pub struct ExceptionHandlingLayer {
    handler: Arc<ExceptionHandler>,
}

impl ExceptionHandlingLayer {
    pub fn new(handler: Arc<ExceptionHandler>) -> Self {
        Self { handler }
    }
}

impl<S> Layer<S> for ExceptionHandlingLayer {
    type Service = ExceptionHandlingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionHandlingMiddleware {
            inner,
            handler: self.handler.clone(),
            not_ready: None,
        }
    }
}

pub struct ExceptionHandlingMiddleware<S> {
    inner: S,
    handler: Arc<ExceptionHandler>,
    // Readiness error of `inner`, answered by the next `call`.
    not_ready: Option<BoxError>,
}

impl<S: Clone> Clone for ExceptionHandlingMiddleware<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            handler: self.handler.clone(),
            not_ready: None,
        }
    }
}

async fn respond(handler: Arc<ExceptionHandler>, fault: Fault) -> Response {
    let mut context = BufferedResponse::new();
    match handler.handle(fault, &mut context).await {
        Ok(_) => context.into_response(),
        Err(e) => e.into_response(),
    }
}

impl<S> Service<Request<Body>> for ExceptionHandlingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.inner.poll_ready(cx) {
            Poll::Ready(Err(error)) => {
                self.not_ready = Some(error.into());
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Pending => Poll::Pending,
        }
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let handler = self.handler.clone();

        // The inner service never became ready and must not be called.
        if let Some(error) = self.not_ready.take() {
            return Box::pin(async move { Ok(respond(handler, Fault::from_boxed(error)).await) });
        }

        // Take the service that was driven to readiness, leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let fault = match inner.call(request).await {
                Ok(mut response) => match response.extensions_mut().remove::<Fault>() {
                    Some(fault) => fault,
                    None => return Ok(response),
                },
                Err(error) => Fault::from_boxed(error.into()),
            };

            Ok(respond(handler, fault).await)
        })
    }
}
