use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::debug;

use crate::catalog::{CatalogClient, CatalogError, Product};

pub type LoadResult = Result<Vec<Product>, CatalogError>;

/// One-shot background fetch of the catalog.
///
/// The fetch runs on a tokio task; the UI loop calls [`CatalogLoader::poll`]
/// once per tick and gets the result exactly once.
pub struct CatalogLoader {
    rx: Option<oneshot::Receiver<LoadResult>>,
}

impl CatalogLoader {
    pub fn spawn(client: CatalogClient) -> Self {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = client.fetch().await;
            if tx.send(result).is_err() {
                debug!("catalog receiver dropped before load finished");
            }
        });
        Self { rx: Some(rx) }
    }

    /// Non-blocking check for the fetch result.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let rx = self.rx.as_mut()?;
        match rx.try_recv() {
            Ok(result) => {
                self.rx = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.rx = None;
                Some(Err(CatalogError::Interrupted))
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    #[test]
    fn test_poll_reports_result_once() {
        let (tx, rx) = oneshot::channel();
        let mut loader = CatalogLoader { rx: Some(rx) };

        assert!(loader.poll().is_none());
        assert!(loader.is_pending());

        tx.send(Ok(Vec::new())).unwrap();
        assert!(matches!(loader.poll(), Some(Ok(products)) if products.is_empty()));
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_dropped_sender_is_interrupted() {
        let (tx, rx) = oneshot::channel::<LoadResult>();
        let mut loader = CatalogLoader { rx: Some(rx) };
        drop(tx);

        assert!(matches!(loader.poll(), Some(Err(CatalogError::Interrupted))));
        assert!(loader.poll().is_none());
    }

    #[tokio::test]
    async fn test_spawn_reports_unreachable_endpoint() {
        // Reserve a free port, then release it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = Config {
            endpoint: format!("http://{addr}/products"),
            request_timeout_secs: Some(5),
            ..Config::default()
        };
        let client = CatalogClient::new(&config).unwrap();
        let mut loader = CatalogLoader::spawn(client);

        let result = loop {
            if let Some(result) = loader.poll() {
                break result;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        };
        assert!(matches!(result, Err(CatalogError::Http(_))));
    }
}
