use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::{DashError, Result};
use crate::fetcher::{FetchRequest, Fetcher};

pub const DEFAULT_WORKERS: usize = 4;

/// Runs batches of independent requests with a cap on how many are in
/// flight at once.
#[derive(Clone)]
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Fetch every request; results come back in request order. A failed
    /// request does not affect the others.
    pub async fn fetch_all(&self, requests: Vec<FetchRequest>) -> Vec<Result<Vec<u8>>> {
        let mut handles = Vec::with_capacity(requests.len());

        for request in requests {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| DashError::Other(e.to_string()))?;
                fetcher.fetch(&request).await
            });

            handles.push(handle);
        }

        futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                    Err(DashError::Other(e.to_string()))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use url::Url;

    /// Echoes the request path back, fails for paths containing "fail", and
    /// records the highest number of concurrent calls.
    struct EchoFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for EchoFetcher {
        async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let path = request.url.path().to_string();
            if path.contains("fail") {
                return Err(DashError::Upstream {
                    status: 500,
                    url: request.url.to_string(),
                });
            }
            Ok(path.into_bytes())
        }
    }

    fn request(path: &str) -> FetchRequest {
        FetchRequest::get(Url::parse(&format!("https://api.example.com{}", path)).unwrap())
    }

    #[tokio::test]
    async fn test_results_in_request_order_with_partial_failure() {
        let fetcher = Arc::new(EchoFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let parallel = ParallelFetcher::with_workers(fetcher, 2);

        let results = parallel
            .fetch_all(vec![request("/a"), request("/fail"), request("/c")])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), b"/a");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap(), b"/c");
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let fetcher = Arc::new(EchoFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), 3);

        let requests = (0..12).map(|i| request(&format!("/r{}", i))).collect();
        let results = parallel.fetch_all(requests).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 3);
    }
}
