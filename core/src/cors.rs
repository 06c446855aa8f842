use actix_cors::Cors;
use actix_web::http::header;

pub fn middleware(origin: &str) -> Cors {
    Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .allowed_origin(origin)
        .max_age(3600)
}
