#![allow(dead_code)]

use actix_web::cookie::Cookie;
use directory_backend::{config::Config, db, state::AppState};
use serde_json::{json, Value};

pub const APP_ID: &str = "app-test";
pub const APP_SECRET: &str = "secret-test";
pub const CALLBACK_URL: &str = "http://localhost:8080/auth/facebook/callback";
pub const CLIENT_URL: &str = "http://localhost:3000/dashboard";

pub async fn test_state(graph_url: &str) -> AppState {
    let graph_url = graph_url.to_string();
    let config = Config::from_lookup(move |key: &str| match key {
        "FACEBOOK_APP_ID" => Some(APP_ID.to_string()),
        "FACEBOOK_APP_SECRET" => Some(APP_SECRET.to_string()),
        "FACEBOOK_CALLBACK_URL" => Some(CALLBACK_URL.to_string()),
        "FACEBOOK_GRAPH_URL" => Some(graph_url.clone()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "CLIENT_URL" => Some(CLIENT_URL.to_string()),
        _ => None,
    })
    .expect("test configuration should load");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("in-memory database should initialize");

    AppState::new(pool, config)
}

pub async fn offline_state() -> AppState {
    test_state("http://127.0.0.1:9").await
}

pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::new("sid", token.to_string())
}

pub fn valid_submission() -> Value {
    json!({
        "first_name": "Maria",
        "last_name": "Okafor",
        "address": "12 Harbour Road",
        "phone_number1": "5551234",
        "category": "restaurant",
        "images": ["https://img.example.com/front.jpg"],
        "description": "Family-run grill near the pier"
    })
}

pub fn graph_profile() -> Value {
    json!({
        "id": "10224917",
        "email": "maria@example.com",
        "first_name": "Maria",
        "last_name": "Okafor",
        "picture": {
            "data": {
                "height": 200,
                "is_silhouette": false,
                "url": "https://platform-lookaside.example.com/pic.jpg",
                "width": 200
            }
        }
    })
}
