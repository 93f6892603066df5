//! Connectivity tracking.
//!
//! A HEAD request against the catalog endpoint decides whether the device
//! counts as online. Listeners are told about every check.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, warn};

use pokequiz_core::config::CatalogConfig;

use crate::error::CatalogError;

/// Reachability of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
    Checking,
}

impl NetworkStatus {
    /// Short label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            NetworkStatus::Online => "🟢 Online",
            NetworkStatus::Offline => "🔴 Offline",
            NetworkStatus::Checking => "Checking...",
        }
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type Listener = Box<dyn Fn(NetworkStatus) + Send + Sync>;

/// Tracks whether the catalog endpoint is reachable.
pub struct NetworkMonitor {
    client: reqwest::Client,
    probe_url: String,
    online: bool,
    listeners: Vec<Listener>,
}

impl NetworkMonitor {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .build()
            .map_err(|e| CatalogError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            probe_url: config.base_url.clone(),
            online: !config.offline,
            listeners: Vec::new(),
        })
    }

    pub fn add_listener(&mut self, listener: impl Fn(NetworkStatus) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn status(&self) -> NetworkStatus {
        if self.online {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        }
    }

    /// Force the status, e.g. when the player asks for offline play.
    pub fn set_online(&mut self, online: bool) {
        if self.online != online {
            self.online = online;
            self.notify(self.status());
        }
    }

    /// Probe the endpoint and notify listeners of the result.
    pub async fn check_connection(&mut self) -> bool {
        self.notify(NetworkStatus::Checking);

        self.online = match self.client.head(&self.probe_url).send().await {
            Ok(response) => {
                debug!(status = %response.status(), "connectivity probe answered");
                response.status().is_success()
            }
            Err(e) => {
                debug!("connectivity probe failed: {e}");
                false
            }
        };

        self.notify(self.status());
        self.online
    }

    fn notify(&self, status: NetworkStatus) {
        for listener in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(status))).is_err() {
                warn!("network listener panicked on {status:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> CatalogConfig {
        CatalogConfig {
            base_url: base_url.to_string(),
            probe_timeout_secs: 2,
            ..Default::default()
        }
    }

    fn recorder(monitor: &mut NetworkMonitor) -> Arc<Mutex<Vec<NetworkStatus>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        monitor.add_listener(move |status| sink.lock().unwrap().push(status));
        seen
    }

    #[tokio::test]
    async fn head_success_is_online() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut monitor = NetworkMonitor::new(&config(&format!("{}/pokemon", server.uri()))).unwrap();
        let seen = recorder(&mut monitor);

        assert!(monitor.check_connection().await);
        assert_eq!(monitor.status(), NetworkStatus::Online);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![NetworkStatus::Checking, NetworkStatus::Online]
        );
    }

    #[tokio::test]
    async fn head_error_status_is_offline() {
        let server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut monitor = NetworkMonitor::new(&config(&server.uri())).unwrap();
        assert!(!monitor.check_connection().await);
        assert_eq!(monitor.status().label(), "🔴 Offline");
    }

    #[tokio::test]
    async fn unreachable_is_offline() {
        let mut monitor = NetworkMonitor::new(&config("http://127.0.0.1:9")).unwrap();
        assert!(!monitor.check_connection().await);
    }

    #[test]
    fn panicking_listener_does_not_stop_others() {
        let mut monitor = NetworkMonitor::new(&config("http://127.0.0.1:9")).unwrap();
        monitor.add_listener(|_| panic!("listener bug"));
        let seen = recorder(&mut monitor);

        monitor.set_online(false);
        assert_eq!(*seen.lock().unwrap(), vec![NetworkStatus::Offline]);

        // Unchanged status is not re-announced.
        monitor.set_online(false);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn offline_config_starts_offline() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.offline = true;
        let monitor = NetworkMonitor::new(&cfg).unwrap();
        assert!(!monitor.is_online());
        assert_eq!(NetworkStatus::Checking.to_string(), "Checking...");
    }
}
