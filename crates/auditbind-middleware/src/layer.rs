//! Tower layer binding each request to the log entries it creates.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::{ConnectInfo, Request};
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};
use tracing::error;

use crate::binding::AuditBinding;
use crate::correlation::RequestCorrelation;
use crate::principal::RequestUser;
use crate::remote_addr::client_address;

/// Layer wrapping services in [`AuditlogMiddleware`].
///
/// Must sit inside whatever layer inserts [`RequestUser`], so the user is
/// known when the request reaches it.
#[derive(Debug, Clone)]
pub struct AuditlogLayer {
    binding: Arc<AuditBinding>,
}

impl AuditlogLayer {
    /// Creates the layer.
    pub fn new(binding: Arc<AuditBinding>) -> Self {
        Self { binding }
    }
}

impl<S> Layer<S> for AuditlogLayer {
    type Service = AuditlogMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditlogMiddleware {
            inner,
            binding: Arc::clone(&self.binding),
        }
    }
}

/// Per-request correlation and receiver lifecycle.
#[derive(Debug, Clone)]
pub struct AuditlogMiddleware<S> {
    inner: S,
    binding: Arc<AuditBinding>,
}

impl<S> Service<Request> for AuditlogMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // Keep the service that was polled ready.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let binding = Arc::clone(&self.binding);

        Box::pin(async move {
            let peer = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip());
            let remote_addr = client_address(
                request.headers(),
                &binding.config.forwarded_for_header,
                peer,
            );
            let user = request
                .extensions()
                .get::<RequestUser>()
                .cloned()
                .unwrap_or_default();

            let correlation = RequestCorrelation::new(user, remote_addr);
            let registration = match binding.connect(&correlation) {
                Ok(registration) => registration,
                Err(e) => {
                    error!(
                        dispatch_uid = %correlation.dispatch_uid,
                        error = %e,
                        "Failed to connect request receiver"
                    );
                    return Ok(e.into_response());
                }
            };

            let response = correlation.scope(inner.call(request)).await;

            // Dropped here on completion, or with this future on panic or
            // cancellation.
            drop(registration);
            response
        })
    }
}
