use std::{future::Future, pin::Pin, sync::Arc, time::Instant};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use colored::Colorize;
use futures::future::{Ready, ok};

/// Logs one line per request: method, path, response status and latency.
pub struct RequestLogger {}

impl RequestLogger {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggerService {
            service: Arc::new(service),
        })
    }
}

pub struct RequestLoggerService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let started = Instant::now();
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let res = srv.call(req).await?;

            let status = res.status();
            let elapsed_ms = started.elapsed().as_millis();
            let status_str = if status.is_success() {
                status.as_str().green()
            } else if status.is_client_error() {
                status.as_str().yellow()
            } else {
                status.as_str().red()
            };
            log::info!("{} {} {} {}ms", method, path, status_str, elapsed_ms);

            Ok(res)
        })
    }
}
