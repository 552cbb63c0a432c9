//! Cursor pagination against a mock server.

mod common;

use futures::TryStreamExt;
use orb_client::{AlertListParams, CursorParams};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{alert_json, client_for, page_json};

async fn mount_two_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/alerts"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                alert_json("a", "usage_exceeded"),
                alert_json("b", "cost_exceeded"),
            ],
            Some("X"),
        )))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/alerts"))
        .and(query_param("cursor", "X"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![alert_json("c", "usage_exceeded")], None)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_returns_one_page_with_cursor() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let page = client_for(&server)
        .alerts()
        .list(AlertListParams::default())
        .await
        .unwrap();

    let ids: Vec<_> = page.data.iter().map(|alert| alert.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(page.next_cursor(), Some("X"));
    assert!(page.has_more());
}

#[tokio::test]
async fn test_next_cursor_is_passed_back_verbatim() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let params = AlertListParams {
        page: CursorParams {
            cursor: Some("X".into()),
            limit: None,
        },
        ..AlertListParams::default()
    };
    let page = client_for(&server).alerts().list(params).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.next_cursor(), None);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_paginate_walks_every_page() {
    let server = MockServer::start().await;
    mount_two_pages(&server).await;

    let client = client_for(&server);
    let alerts: Vec<_> = client
        .paginate(AlertListParams::default())
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<_> = alerts.iter().map(|alert| alert.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
