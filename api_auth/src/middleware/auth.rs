use std::{future::Future, pin::Pin, sync::Arc};

use actix_web::{
    HttpMessage, web,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    Error,
};
use common::{
    env_config::Config,
    error::AppError,
    jwt,
};
use futures::future::{Ready, ok};

/// Validates the `Authorization: Bearer` token and inserts the decoded
/// claims into request extensions for the handlers behind it. Requests
/// without a valid token never reach those handlers.
pub struct AuthMiddleware {}

impl AuthMiddleware {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for AuthMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let secret = match req.app_data::<web::Data<Arc<Config>>>() {
                Some(config) => config.jwt_config.secret.clone(),
                None => {
                    return Ok(req.error_response(AppError::Internal(
                        "Server configuration not available".to_string(),
                    )));
                }
            };

            let token = req
                .headers()
                .get("Authorization")
                .and_then(|header| header.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "))
                .map(str::to_string);

            match token {
                Some(token) => match jwt::validate_jwt(&token, &secret) {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims);
                        srv.call(req).await.map(|res| res.map_into_boxed_body())
                    }
                    Err(_) => Ok(req.error_response(AppError::Unauthorized(
                        "Invalid token".to_string(),
                    ))),
                },
                None => Ok(req.error_response(AppError::Unauthorized(
                    "No authorization token provided".to_string(),
                ))),
            }
        })
    }
}
