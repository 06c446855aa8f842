use actix_web::web::{self};

pub mod routes {
    pub mod pay;
}

mod services {
    pub(crate) mod pay;
}

mod misc {
    pub(crate) mod razorpay;
}

mod models {
    pub(crate) mod plan;
}

mod dtos {
    pub(crate) mod pay;
}

pub fn mount_pay() -> actix_web::Scope {
    web::scope("/pay")
        .service(routes::pay::post_create_order)
        .service(routes::pay::post_verify)
        .service(routes::pay::get_history)
}
