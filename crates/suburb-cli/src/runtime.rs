// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use std::thread;
use suburb_app::{SearchOutcome, SearchRequest};
use suburb_client::Client;
use suburb_tui::{InternalEvent, SearchRuntime};
use tracing::debug;

/// Runs each search on its own worker thread against the HTTP endpoint.
pub struct HttpRuntime {
    client: Client,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl SearchRuntime for HttpRuntime {
    fn run_search(&mut self, request: &SearchRequest) -> SearchOutcome {
        self.client.run(request)
    }

    fn spawn_search(&mut self, request: SearchRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        let id = request.id;
        thread::Builder::new()
            .name(format!("search-{id}"))
            .spawn(move || {
                let outcome = client.run(&request);
                if tx
                    .send(InternalEvent::SearchFinished { id, outcome })
                    .is_err()
                {
                    debug!(search_id = %id, "ui closed before search finished");
                }
            })
            .with_context(|| format!("spawn worker for search {id}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::HttpRuntime;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::sync::mpsc;
    use std::time::Duration;
    use suburb_app::{SearchId, SearchOutcome, SearchRequest};
    use suburb_client::Client;
    use suburb_testkit::{MockReply, MockSearchServer, SampleResult, UNREACHABLE_BASE_URL};
    use suburb_tui::{InternalEvent, SearchRuntime};

    fn request(id: u64, text: &str) -> SearchRequest {
        SearchRequest {
            id: SearchId::new(id),
            query_text: text.to_owned(),
        }
    }

    fn recv_finished(
        rx: &mpsc::Receiver<InternalEvent>,
    ) -> Result<(SearchId, SearchOutcome)> {
        match rx.recv_timeout(Duration::from_secs(5))? {
            InternalEvent::SearchFinished { id, outcome } => Ok((id, outcome)),
            other => Err(anyhow::anyhow!("unexpected event {other:?}")),
        }
    }

    #[test]
    fn spawned_searches_report_back_by_id() -> Result<()> {
        let server = MockSearchServer::start(vec![
            MockReply::Success(SampleResult::bondi_beach()),
            MockReply::Success(SampleResult::without_location()),
        ])?;
        let mut runtime = HttpRuntime::new(Client::new(server.base_url(), Duration::from_secs(2))?);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_search(request(1, "bondi"), tx.clone())?;
        runtime.spawn_search(request(2, "manly"), tx)?;

        let mut finished = BTreeMap::new();
        for _ in 0..2 {
            let (id, outcome) = recv_finished(&rx)?;
            finished.insert(id, outcome);
        }
        server.finish()?;

        for id in [SearchId::new(1), SearchId::new(2)] {
            match finished.get(&id) {
                Some(SearchOutcome::Resolved(result)) => assert_eq!(result.request_id, id),
                other => panic!("search {id} did not resolve: {other:?}"),
            }
        }
        Ok(())
    }

    #[test]
    fn server_error_reports_failed_outcome() -> Result<()> {
        let server = MockSearchServer::start(vec![MockReply::Raw {
            status: 500,
            body: String::new(),
        }])?;
        let mut runtime = HttpRuntime::new(Client::new(server.base_url(), Duration::from_secs(2))?);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_search(request(9, "nowhere"), tx)?;
        let (id, outcome) = recv_finished(&rx)?;
        server.finish()?;

        assert_eq!(id, SearchId::new(9));
        match outcome {
            SearchOutcome::Failed(failure) => assert_eq!(failure.status, Some(500)),
            SearchOutcome::Resolved(result) => panic!("expected failure, got {result:?}"),
        }
        Ok(())
    }

    #[test]
    fn inline_run_search_maps_transport_errors() -> Result<()> {
        let mut runtime =
            HttpRuntime::new(Client::new(UNREACHABLE_BASE_URL, Duration::from_millis(200))?);
        match runtime.run_search(&request(1, "bondi")) {
            SearchOutcome::Failed(failure) => assert_eq!(failure.status, None),
            SearchOutcome::Resolved(result) => panic!("expected failure, got {result:?}"),
        }
        Ok(())
    }
}
