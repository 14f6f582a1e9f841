//! Rate limiting middleware.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderName, HeaderValue},
};
use folio_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use folio_core::ports::{RateLimitCategory, RateLimitDecision, RateLimiter};

const FORWARDED_FOR: &str = "X-Forwarded-For";

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<dyn RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(category) = RateLimitCategory::for_path(req.path()) else {
            return self.forward(req, None);
        };

        let key = client_key(&req);

        match self.limiter.consume(&key, category) {
            RateLimitDecision::Allowed { remaining } => {
                self.forward(req, Some((remaining_header(category), remaining)))
            }
            RateLimitDecision::Denied { retry_after } => {
                tracing::warn!(
                    client = %key,
                    path = %req.path(),
                    category = %category,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Rate limit exceeded"
                );

                let response = HttpResponse::TooManyRequests()
                    .insert_header((
                        retry_after_header(category),
                        retry_after.as_millis().to_string(),
                    ))
                    .insert_header((header::RETRY_AFTER, retry_after_secs(retry_after).to_string()))
                    .json(ErrorResponse::too_many_requests());

                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                Box::pin(async move { Ok(srv_response.map_into_right_body()) })
            }
        }
    }
}

impl<S, B> RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn forward(
        &self,
        req: ServiceRequest,
        remaining: Option<(HeaderName, u32)>,
    ) -> Pin<Box<dyn Future<Output = Result<ServiceResponse<EitherBody<B>>, Error>>>> {
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if let Some((name, remaining)) = remaining {
                res.headers_mut().insert(name, HeaderValue::from(remaining));
            }
            Ok(res.map_into_left_body())
        })
    }
}

/// First `X-Forwarded-For` entry, else the peer address.
pub fn client_key(req: &ServiceRequest) -> String {
    req.headers()
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn remaining_header(category: RateLimitCategory) -> HeaderName {
    match category {
        RateLimitCategory::Upload => HeaderName::from_static("x-rate-limit-remaining-upload"),
        RateLimitCategory::General => HeaderName::from_static("x-rate-limit-remaining-general"),
    }
}

fn retry_after_header(category: RateLimitCategory) -> HeaderName {
    match category {
        RateLimitCategory::Upload => {
            HeaderName::from_static("x-rate-limit-retry-after-milliseconds-upload")
        }
        RateLimitCategory::General => {
            HeaderName::from_static("x-rate-limit-retry-after-milliseconds-general")
        }
    }
}

/// Whole seconds for `Retry-After`, rounded up, at least 1.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}
