// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::io::Read;
use std::thread::{self, JoinHandle};
use suburb_app::{SearchId, SearchRequest};
use tiny_http::{Header, Response, Server};

/// Address nothing listens on, for transport failure tests.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:1";

#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    pub site_count: i64,
    pub page_count: i64,
    pub price_count: i64,
    pub avg_price: f64,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub post_code: Option<String>,
}

impl SampleResult {
    pub fn bondi_beach() -> Self {
        Self {
            site_count: 3,
            page_count: 12,
            price_count: 5,
            avg_price: 750_000.0,
            suburb: Some("bondi beach".to_owned()),
            state: Some("nsw".to_owned()),
            post_code: Some("2026".to_owned()),
        }
    }

    pub fn without_location() -> Self {
        Self {
            suburb: None,
            state: None,
            post_code: None,
            ..Self::bondi_beach()
        }
    }

    pub fn body(&self, request_id: SearchId, search_text: &str) -> String {
        let mut body = json!({
            "request": { "searchId": request_id, "searchText": search_text },
            "siteCount": self.site_count,
            "pageCount": self.page_count,
            "priceCount": self.price_count,
            "listingCount": self.price_count,
            "avgPrice": self.avg_price,
            "elapsedTime": 0.5,
        });
        if let Value::Object(map) = &mut body {
            for (key, value) in [
                ("suburb", &self.suburb),
                ("state", &self.state),
                ("postCode", &self.post_code),
            ] {
                if let Some(value) = value {
                    map.insert(key.to_owned(), Value::String(value.clone()));
                }
            }
        }
        body.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// 200 with a body that echoes the request's own id and text.
    Success(SampleResult),
    /// Fixed status and raw body.
    Raw { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn search_request(&self) -> Result<SearchRequest> {
        serde_json::from_str(&self.body).context("decode recorded search request")
    }
}

/// Serves one reply per request, in order, then stops.
pub struct MockSearchServer {
    base_url: String,
    handle: JoinHandle<Result<Vec<RecordedRequest>>>,
}

impl MockSearchServer {
    pub fn start(replies: Vec<MockReply>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let base_url = format!("http://{}", server.server_addr());

        let handle = thread::spawn(move || {
            let mut recorded = Vec::with_capacity(replies.len());
            for reply in replies {
                let mut request = server.recv().context("receive mock request")?;
                let mut body = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut body)
                    .context("read mock request body")?;
                let content_type = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Content-Type"))
                    .map(|header| header.value.as_str().to_owned());
                let entry = RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_owned(),
                    content_type,
                    body,
                };

                let response = match reply {
                    MockReply::Success(sample) => {
                        let echoed = entry.search_request()?;
                        json_response(200, sample.body(echoed.id, &echoed.query_text))?
                    }
                    MockReply::Raw { status, body } => json_response(status, body)?,
                };
                request.respond(response).context("send mock response")?;
                recorded.push(entry);
            }
            Ok(recorded)
        });

        Ok(Self { base_url, handle })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits until every reply was served and returns what the server saw.
    pub fn finish(self) -> Result<Vec<RecordedRequest>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))?
    }
}

fn json_response(status: u16, body: String) -> Result<Response<std::io::Cursor<Vec<u8>>>> {
    let header = Header::from_bytes("Content-Type", "application/json")
        .map_err(|()| anyhow!("invalid content type header"))?;
    Ok(Response::from_string(body)
        .with_status_code(status)
        .with_header(header))
}
