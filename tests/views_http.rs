mod common;

use actix_web::http::{header::CONTENT_TYPE, StatusCode};
use actix_web::{test, web, App};
use serde_json::Value;

use common::offline_state;
use directory_backend::handlers::views::PAYMENT_STORAGE_KEYS;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(directory_backend::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn payment_success_page_clears_storage_keys() {
    let state = offline_state().await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/payment-success").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    for key in PAYMENT_STORAGE_KEYS {
        assert!(body.contains(&format!("localStorage.removeItem(\"{key}\")")));
    }
}

#[actix_web::test]
async fn how_to_review_is_html() {
    let state = offline_state().await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/how-to-review").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap().starts_with("text/html"));
}

#[actix_web::test]
async fn unknown_route_renders_not_found_page() {
    let state = offline_state().await;
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/no/such/page").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("404"));
}

#[actix_web::test]
async fn health_reports_ok() {
    let state = offline_state().await;
    let app = app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "OK");
}
