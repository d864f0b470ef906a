use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Store, StoredCard, AJAX_PATH};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn form_request(fields: &[(&str, &str)]) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(AJAX_PATH)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(serde_urlencoded::to_string(fields).unwrap())
        .unwrap()
}

fn ids(page: &Value) -> Vec<&str> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|info| info["id"].as_str().unwrap())
        .collect()
}

// --- getCardData ---

#[tokio::test]
async fn card_data_wraps_payload_in_a_string() {
    let resp = app()
        .oneshot(form_request(&[("method", "getCardData"), ("id", "101")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let inner: Value = serde_json::from_str(body["data"].as_str().unwrap()).unwrap();
    assert_eq!(inner["text"]["title"]["text"], "Shivan Dragon");
    assert_eq!(inner["width"], 2010);
}

#[tokio::test]
async fn card_data_unknown_id_returns_404() {
    let resp = app()
        .oneshot(form_request(&[("method", "getCardData"), ("id", "999")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- get_gallery_cards ---

#[tokio::test]
async fn gallery_first_page_is_newest_first() {
    let resp = app()
        .oneshot(form_request(&[("method", "get_gallery_cards")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["current"], 1);
    assert_eq!(page["total"], 3);
    assert_eq!(ids(&page), vec!["107", "106", "105"]);
    assert_eq!(page["is"], "0");
    assert_eq!(page["liked"], serde_json::json!([]));
}

#[tokio::test]
async fn gallery_filters_category_case_insensitively() {
    let resp = app()
        .oneshot(form_request(&[
            ("method", "get_gallery_cards"),
            ("category", "creature"),
            ("nsfw", "0"),
        ]))
        .await
        .unwrap();

    let page = body_json(resp).await;
    assert_eq!(ids(&page), vec!["106", "104", "101"]);
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn gallery_dashboard_and_top_order() {
    let resp = app()
        .oneshot(form_request(&[
            ("method", "get_gallery_cards"),
            ("showIsDashboard", "17"),
            ("order", "top"),
        ]))
        .await
        .unwrap();

    let page = body_json(resp).await;
    assert_eq!(ids(&page), vec!["102", "101", "103"]);
}

#[tokio::test]
async fn gallery_second_page() {
    let resp = app()
        .oneshot(form_request(&[("method", "get_gallery_cards"), ("cpage", "2")]))
        .await
        .unwrap();

    let page = body_json(resp).await;
    assert_eq!(page["current"], 2);
    assert_eq!(ids(&page), vec!["104", "103", "102"]);
}

#[tokio::test]
async fn gallery_empty_store_reports_one_page() {
    let resp = app_with(Store::new(Vec::new()))
        .oneshot(form_request(&[("method", "get_gallery_cards")]))
        .await
        .unwrap();

    let page = body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert!(page["data"].as_array().unwrap().is_empty());
}

// --- routing ---

#[tokio::test]
async fn unknown_method_returns_bare_zero() {
    let resp = app()
        .oneshot(form_request(&[("method", "delete_everything")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(&body_bytes(resp).await[..], b"0");
}

#[tokio::test]
async fn json_body_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(AJAX_PATH)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"method":"getCardData","id":101}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn get_is_not_routed() {
    let resp = app()
        .oneshot(Request::builder().uri(AJAX_PATH).body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn forced_failure_applies_to_every_method() {
    let mut store = Store::new(vec![StoredCard::new(1, "Forest", "Land", "1")]);
    store.fail_with = Some(500);

    let resp = app_with(store.clone())
        .oneshot(form_request(&[("method", "getCardData"), ("id", "1")]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = app_with(store)
        .oneshot(form_request(&[("method", "get_gallery_cards")]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- shared state ---

#[tokio::test]
async fn one_router_answers_concurrent_calls() {
    let router = app();
    let (card, page) = tokio::join!(
        router
            .clone()
            .oneshot(form_request(&[("method", "getCardData"), ("id", "104")])),
        router.oneshot(form_request(&[("method", "get_gallery_cards"), ("cpage", "1")])),
    );

    let card = card.unwrap();
    let page = page.unwrap();
    assert_eq!(card.status(), StatusCode::OK);
    assert_eq!(page.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(page).await), vec!["107", "106", "105"]);
}
