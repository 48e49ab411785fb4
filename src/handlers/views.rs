use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::HttpResponse;

const HOW_TO_REVIEW_HTML: &str = include_str!("../../assets/how_to_review.html");
const PAYMENT_SUCCESS_HTML: &str = include_str!("../../assets/payment_success.html");
const NOT_FOUND_HTML: &str = include_str!("../../assets/not_found.html");

/// Keys the submission flow leaves in the browser's local storage.
pub const PAYMENT_STORAGE_KEYS: [&str; 2] = ["serviceId", "busId"];

const HTML: &str = "text/html; charset=utf-8";

pub async fn how_to_review() -> HttpResponse {
    HttpResponse::Ok()
        .append_header((CONTENT_TYPE, HTML))
        .body(HOW_TO_REVIEW_HTML)
}

// The page clears the storage keys on load whatever their state; the server
// does not check that a payment happened.
pub async fn payment_success() -> HttpResponse {
    HttpResponse::Ok()
        .append_header((CONTENT_TYPE, HTML))
        .append_header((CACHE_CONTROL, "no-store"))
        .body(PAYMENT_SUCCESS_HTML)
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .append_header((CONTENT_TYPE, HTML))
        .body(NOT_FOUND_HTML)
}
