#![allow(dead_code)]

use kirada::{ApiClient, Config, MemoryTokenStore, Session};
use serde_json::{json, Value};
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Config::default().with_backend_url(&server.uri())).unwrap()
}

pub fn token_for(role: &str) -> String {
    format!("tok-{role}")
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": format!("u-{role}"),
        "email": format!("{role}@example.com"),
        "full_name": format!("Test {role}"),
        "role": role,
        "is_active": true,
        "profile": {"phone": "+90 555 000 0000"},
        "created_at": "2025-01-01T09:00:00",
    })
}

pub fn property_json(id: &str, status: &str, price: f64) -> Value {
    json!({
        "id": id,
        "owner_id": "u-owner",
        "title": format!("Listing {id}"),
        "description": "Merkezi konumda",
        "property_type": "apartment",
        "address": "Bağdat Caddesi 1",
        "district": "Kadıköy",
        "city": "İstanbul",
        "price": price,
        "deposit": price * 2.0,
        "area": 90,
        "rooms": "2+1",
        "images": ["/uploads/images/cover.jpg"],
        "status": status,
    })
}

pub fn application_json(id: &str, property_id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "property_id": property_id,
        "tenant_id": "u-tenant",
        "owner_id": "u-owner",
        "status": status,
        "message": "Hello",
        "move_in_date": "2025-06-01T00:00:00",
    })
}

/// Session restored from a stored token that `/auth/me` accepts for `role`
pub async fn signed_in(server: &MockServer, role: &str) -> (ApiClient, Session) {
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(bearer_token(token_for(role)))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(role)))
        .mount(server)
        .await;

    let api = api_for(server);
    let session = Session::restore(MemoryTokenStore::with_token(token_for(role)), &api).await;
    assert!(session.is_signed_in(), "session for {role} should restore");
    (api, session)
}

pub async fn mount_json(server: &MockServer, verb: &str, route: &str, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
