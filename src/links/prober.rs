//! Link liveness probing
//!
//! Every distinct target gets one HEAD request on its own task. Failed targets
//! are collected in a set behind a mutex shared by all probe tasks, and the
//! batch only returns once every task has finished.

use crate::config::ProberConfig;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

/// Result of probing a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Responded with a status in `[200, 400)`
    Alive(u16),
    /// Responded with a status outside `[200, 400)`
    BadStatus(u16),
    /// Timed out, failed DNS, refused the connection or was not requestable
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Alive(_))
    }
}

/// Issues HEAD probes for a batch of links
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    max_concurrent: Option<usize>,
}

impl Prober {
    /// Builds a prober whose client enforces the configured per-probe timeout
    ///
    /// # Returns
    ///
    /// * `Ok(Prober)` - Successfully built prober
    /// * `Err(reqwest::Error)` - Failed to build the HTTP client
    pub fn new(config: &ProberConfig, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = build_probe_client(config.timeout(), user_agent)?;
        Ok(Self::from_client(client, config.concurrency_limit()))
    }

    /// Wraps an existing client; `max_concurrent` caps probes in flight
    pub fn from_client(client: Client, max_concurrent: Option<usize>) -> Self {
        Self {
            client,
            max_concurrent,
        }
    }

    /// Probes every URL concurrently and returns the ones that failed
    ///
    /// One task is spawned per URL. Unless a concurrency limit is configured
    /// all of them are in flight at once; with a limit, a per-batch semaphore
    /// holds back the rest. Dropping the returned future aborts any probe that
    /// is still running.
    pub async fn probe_all(&self, urls: Vec<String>) -> HashSet<String> {
        let client = self.client.clone();
        self.probe_with(urls, move |url| {
            let client = client.clone();
            async move { probe_link(&client, &url).await }
        })
        .await
    }

    /// Runs `probe` once per URL on its own task and collects the failures
    ///
    /// A task that panics or is cancelled before reporting counts as a
    /// failure for its URL.
    async fn probe_with<F, Fut>(&self, urls: Vec<String>, probe: F) -> HashSet<String>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = ProbeOutcome> + Send + 'static,
    {
        if urls.is_empty() {
            return HashSet::new();
        }

        let started = Instant::now();
        let total = urls.len();
        let failures: Arc<Mutex<HashSet<String>>> = Arc::default();
        let semaphore = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<task::Id, String> = HashMap::with_capacity(total);

        for url in urls {
            let failures = Arc::clone(&failures);
            let semaphore = semaphore.clone();
            let outcome = probe(url.clone());
            let task_url = url.clone();

            let handle = tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                let outcome = outcome.await;
                if outcome.is_failure() {
                    tracing::debug!("Link probe failed for {}: {:?}", task_url, outcome);
                    failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(task_url);
                }
            });
            pending.insert(handle.id(), url);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, ())) => {
                    pending.remove(&id);
                }
                Err(e) => {
                    let Some(url) = pending.remove(&e.id()) else {
                        continue;
                    };
                    tracing::warn!("Probe task for {} did not complete: {}", url, e);
                    failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(url);
                }
            }
        }

        let failed = {
            let mut guard = failures.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };

        tracing::info!(
            "Probed {} links in {:?}, {} inaccessible",
            total,
            started.elapsed(),
            failed.len()
        );

        failed
    }
}

/// Builds the HTTP client used for probes
fn build_probe_client(timeout: Duration, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Sends a HEAD request and classifies the response
///
/// Redirects are followed and the final status decides the outcome.
pub async fn probe_link(client: &Client, url: &str) -> ProbeOutcome {
    match client.head(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            if (200..400).contains(&status) {
                ProbeOutcome::Alive(status)
            } else {
                ProbeOutcome::BadStatus(status)
            }
        }
        Err(e) => {
            if e.is_timeout() {
                ProbeOutcome::Unreachable("Request timeout".to_string())
            } else if e.is_connect() {
                ProbeOutcome::Unreachable("Connection failed".to_string())
            } else {
                ProbeOutcome::Unreachable(e.to_string())
            }
        }
    }
}
