use actix_web::web::{self};
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}

pub mod routes {
    pub mod auth;
    pub mod user;
}

mod services {
    pub(crate) mod auth;
    pub(crate) mod user;
}

mod dtos {
    pub(crate) mod auth;
}

pub fn mount_auth() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_register)
        .service(routes::auth::post_login)
}

pub fn mount_user() -> actix_web::Scope {
    web::scope("/user").service(routes::user::get_status)
}

pub fn auth_middleware() -> AuthMiddleware {
    AuthMiddleware::new()
}
