use axum::http::Request;
use axum::response::{IntoResponse, Response};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use super::{authenticate, TokenVerifier};
use crate::utils::error::ApiError;

/// Gate requiring a verified bearer token before the wrapped route runs.
#[derive(Clone)]
pub struct AuthLayer {
    verifier: Arc<dyn TokenVerifier>,
}

impl AuthLayer {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            verifier: Arc::clone(&self.verifier),
        }
    }
}

#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    verifier: Arc<dyn TokenVerifier>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AuthService<S>
where
    S: Service<Request<ReqBody>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = AuthFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        match authenticate(request.headers(), self.verifier.as_ref()) {
            Ok(claims) => {
                tracing::debug!(user = %claims.sub, "Request authenticated");
                request.extensions_mut().insert(claims);
                AuthFuture::Authorized {
                    future: self.inner.call(request),
                }
            }
            Err(failure) => AuthFuture::Rejected {
                response: Some(ApiError::Unauthorized(failure).into_response()),
            },
        }
    }
}

#[pin_project::pin_project(project = AuthFutureProj)]
pub enum AuthFuture<F> {
    Authorized {
        #[pin]
        future: F,
    },
    Rejected {
        response: Option<Response>,
    },
}

impl<F, E> Future for AuthFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            AuthFutureProj::Authorized { future } => future.poll(cx),
            AuthFutureProj::Rejected { response } => Poll::Ready(Ok(response
                .take()
                .expect("AuthFuture polled after completion"))),
        }
    }
}
