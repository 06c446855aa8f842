use actix_web::web::{self};

pub mod routes {
    pub mod thumbnail;
}

mod services {
    pub(crate) mod entitlement;
    pub(crate) mod generate;
}

mod gateway {
    pub(crate) mod enhance;
    pub(crate) mod image_api;
}

mod misc {
    pub(crate) mod data_uri;
    pub(crate) mod prompt;
    pub(crate) mod retry;
}

mod dtos {
    pub(crate) mod thumbnail;
}

pub fn mount_thumbnails() -> actix_web::Scope {
    web::scope("/thumbnails")
        .service(routes::thumbnail::post_generate)
        .service(routes::thumbnail::post_enhance)
        .service(routes::thumbnail::post_export)
        .service(routes::thumbnail::get_history)
        .service(routes::thumbnail::delete_thumbnail)
}
