// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::time::Duration;
use suburb_app::{SearchId, SearchOutcome, SearchRequest};
use suburb_client::Client;
use suburb_testkit::{MockReply, MockSearchServer, SampleResult, UNREACHABLE_BASE_URL};

fn request(id: u64, text: &str) -> SearchRequest {
    SearchRequest {
        id: SearchId::new(id),
        query_text: text.to_owned(),
    }
}

#[test]
fn search_posts_json_body_to_search_endpoint() -> Result<()> {
    let server = MockSearchServer::start(vec![MockReply::Success(SampleResult::bondi_beach())])?;
    let client = Client::new(server.base_url(), Duration::from_secs(2))?;

    let result = client.search(&request(1, "bondi beach"))?;
    assert_eq!(result.request_id, SearchId::new(1));
    assert_eq!(result.site_count, 3);
    assert_eq!(result.page_count, 12);
    assert_eq!(result.price_count, 5);
    assert_eq!(result.average_price, 750_000.0);
    assert_eq!(result.suburb.as_deref(), Some("bondi beach"));

    let recorded = server.finish()?;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, "POST");
    assert_eq!(recorded[0].url, "/search");
    assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(&recorded[0].body)?;
    assert_eq!(
        body,
        serde_json::json!({ "searchId": 1, "searchText": "bondi beach" })
    );
    Ok(())
}

#[test]
fn non_200_status_is_a_failed_outcome_with_status() -> Result<()> {
    let server = MockSearchServer::start(vec![MockReply::Raw {
        status: 418,
        body: "Bad Request".to_owned(),
    }])?;
    let client = Client::new(server.base_url(), Duration::from_secs(2))?;

    match client.run(&request(2, "nowhere")) {
        SearchOutcome::Failed(failure) => {
            assert_eq!(failure.status, Some(418));
            assert!(failure.message.contains("Bad Request"));
        }
        SearchOutcome::Resolved(result) => panic!("expected failure, got {result:?}"),
    }
    server.finish()?;
    Ok(())
}

#[test]
fn other_success_statuses_are_still_failures() -> Result<()> {
    let server = MockSearchServer::start(vec![MockReply::Raw {
        status: 204,
        body: String::new(),
    }])?;
    let client = Client::new(server.base_url(), Duration::from_secs(2))?;

    let error = client
        .search(&request(3, "manly"))
        .expect_err("204 should not count as success");
    assert_eq!(error.status(), Some(204));
    server.finish()?;
    Ok(())
}

#[test]
fn undecodable_body_is_a_failure() -> Result<()> {
    let server = MockSearchServer::start(vec![MockReply::Raw {
        status: 200,
        body: "{\"unexpected\": true}".to_owned(),
    }])?;
    let client = Client::new(server.base_url(), Duration::from_secs(2))?;

    let error = client
        .search(&request(4, "coogee"))
        .expect_err("missing request echo should fail to decode");
    assert!(error.to_string().contains("decode search response"));
    server.finish()?;
    Ok(())
}

#[test]
fn unreachable_server_is_a_transport_failure() -> Result<()> {
    let client = Client::new(UNREACHABLE_BASE_URL, Duration::from_millis(200))?;

    match client.run(&request(5, "bondi")) {
        SearchOutcome::Failed(failure) => {
            assert_eq!(failure.status, None);
            assert!(failure.message.contains("cannot reach"));
        }
        SearchOutcome::Resolved(result) => panic!("expected failure, got {result:?}"),
    }
    Ok(())
}
