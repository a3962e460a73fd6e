mod common;

use common::{mount_json, property_json, signed_in, token_for};
use kirada::lifecycle::PropertyTransition;
use kirada::models::{PropertyDraft, PropertyFilter, PropertyStatus};
use kirada::upload::{ImageFile, ImageUploader};
use kirada::views::{self, DashboardPage, Listings, Loadable, PropertyForm};
use kirada::{ClientError, Config, Session};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn publishing_a_draft_requests_active() {
    let server = MockServer::start().await;
    let (api, mut session) = signed_in(&server, "owner").await;

    mount_json(&server, "GET", "/api/my-properties", json!([property_json("p1", "draft", 25000.0)])).await;
    mount_json(&server, "GET", "/api/applications", json!([])).await;
    mount_json(&server, "GET", "/api/payments", json!([])).await;
    mount_json(&server, "GET", "/api/commission-stats", json!({"commission_rate": "40%"})).await;
    Mock::given(method("PUT"))
        .and(path("/api/properties/p1/status"))
        .and(query_param("status", "active"))
        .and(bearer_token(token_for("owner")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Status updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = DashboardPage::for_session(&session).unwrap();
    page.refresh(&api, &mut session).await.unwrap();
    let target = page
        .transition_property(&api, &mut session, "p1", PropertyTransition::Publish)
        .await
        .unwrap();
    assert_eq!(target, PropertyStatus::Active);
}

#[tokio::test]
async fn suspending_a_rented_listing_makes_no_call() {
    let server = MockServer::start().await;
    let (api, session) = signed_in(&server, "owner").await;
    Mock::given(method("PUT"))
        .and(path("/api/properties/p1/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let property = serde_json::from_value(property_json("p1", "rented", 25000.0)).unwrap();
    let err = api
        .properties()
        .transition(&session, &property, PropertyTransition::Suspend)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidTransition { .. }));
}

#[tokio::test]
async fn listing_search_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/properties"))
        .and(query_param("city", "İstanbul"))
        .and(query_param("max_price", "30000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            property_json("p1", "active", 25000.0),
            property_json("p2", "archived", 18000.0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = common::api_for(&server);
    let mut session = Session::anonymous();
    let view = Listings::new(PropertyFilter {
        city: Some("İstanbul".into()),
        district: Some("  ".into()),
        max_price: Some(30000.0),
        ..PropertyFilter::default()
    });
    let mut state = Loadable::default();

    views::refresh(&view, &mut state, &api, &mut session).await.unwrap();
    let listings = state.snapshot().unwrap();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[1].status, PropertyStatus::Unknown("archived".into()));

    let shown = views::show(&view, &state, &session, api.config());
    assert!(shown.contains("archived"));
}

#[tokio::test]
async fn oversized_image_is_rejected_before_upload() {
    let server = MockServer::start().await;
    let (api, session) = signed_in(&server, "owner").await;
    Mock::given(method("POST"))
        .and(path("/api/upload/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .expect(0)
        .mount(&server)
        .await;

    let mut uploader = ImageUploader::default();
    let files = vec![
        ImageFile::new("small.jpg", vec![0; 1024]),
        ImageFile::new("huge.jpg", vec![0; 6 * 1024 * 1024]),
    ];

    match uploader.upload(&api, &session, &files).await {
        Err(ClientError::FileTooLarge { name, .. }) => assert_eq!(name, "huge.jpg"),
        other => panic!("expected FileTooLarge, got {other:?}"),
    }
    assert!(uploader.images().is_empty());
}

#[tokio::test]
async fn new_listing_keeps_photos_the_owner_did_not_remove() {
    let server = MockServer::start().await;
    let (api, mut session) = signed_in(&server, "owner").await;

    Mock::given(method("POST"))
        .and(path("/api/upload/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                {"url": "/uploads/images/a.jpg", "filename": "a.jpg"},
                {"url": "/uploads/images/b.jpg", "filename": "b.jpg"},
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(property_json("new1", "draft", 30000.0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/properties/new1/images"))
        .and(body_json(json!(["/uploads/images/b.jpg"])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "GET", "/api/properties/new1", property_json("new1", "draft", 30000.0)).await;

    let config = Config::default().with_backend_url(&server.uri());
    let draft = PropertyDraft {
        title: "Cihangir 1+1".into(),
        description: "Boğaz manzaralı".into(),
        address: "Akarsu Yokuşu 12".into(),
        district: "Beyoğlu".into(),
        price: 30000.0,
        deposit: 60000.0,
        area: 65,
        rooms: "1+1".into(),
        ..PropertyDraft::default()
    };
    let mut form = PropertyForm::new(draft, &config);

    let files = vec![ImageFile::new("a.jpg", vec![1; 10]), ImageFile::new("b.jpg", vec![2; 10])];
    form.attach(&api, &mut session, &files).await.unwrap();
    assert_eq!(form.images(), ["/uploads/images/a.jpg", "/uploads/images/b.jpg"]);

    assert!(form.remove_image("/uploads/images/a.jpg"));
    let created = form.submit(&api, &mut session).await.unwrap();
    assert_eq!(created.id, "new1");
}

#[tokio::test]
async fn tenant_cannot_create_listings() {
    let server = MockServer::start().await;
    let (api, mut session) = signed_in(&server, "tenant").await;

    let mut form = PropertyForm::new(PropertyDraft::default(), api.config());
    assert!(matches!(form.submit(&api, &mut session).await, Err(ClientError::Forbidden(_))));
}

#[tokio::test]
async fn retry_after_failed_photo_attach_reuses_created_listing() {
    let server = MockServer::start().await;
    let (api, mut session) = signed_in(&server, "owner").await;

    Mock::given(method("POST"))
        .and(path("/api/upload/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": [{"url": "/uploads/images/a.jpg"}]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(property_json("new1", "draft", 30000.0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/properties/new1/images"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "Storage unavailable"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/properties/new1/images"))
        .and(body_json(json!(["/uploads/images/a.jpg"])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "GET", "/api/properties/new1", property_json("new1", "draft", 30000.0)).await;

    let draft = PropertyDraft {
        title: "Moda 2+1".into(),
        description: "Denize yakın".into(),
        address: "Moda Caddesi 5".into(),
        district: "Kadıköy".into(),
        price: 28000.0,
        deposit: 56000.0,
        area: 85,
        rooms: "2+1".into(),
        ..PropertyDraft::default()
    };
    let mut form = PropertyForm::new(draft, api.config());
    form.attach(&api, &mut session, &[ImageFile::new("a.jpg", vec![1; 10])]).await.unwrap();

    match form.submit(&api, &mut session).await {
        Err(ClientError::Api { status: 500, detail }) => assert_eq!(detail, "Storage unavailable"),
        other => panic!("expected 500, got {other:?}"),
    }
    assert_eq!(form.created_id(), Some("new1"));

    let created = form.submit(&api, &mut session).await.unwrap();
    assert_eq!(created.id, "new1");
}
