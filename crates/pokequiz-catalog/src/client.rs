//! Tyradex-backed catalog implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use pokequiz_core::config::CatalogConfig;
use pokequiz_core::model::CatalogEntry;
use pokequiz_core::traits::Catalog;

use crate::error::CatalogError;
use crate::fallback::fallback_entries;

/// Where the loaded list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    NotLoaded,
    Remote,
    Fallback,
}

/// Catalog backed by the remote API.
///
/// Once the list is loaded (remotely or from the fallback) it is kept for
/// the lifetime of the value; a failed load is not retried.
pub struct RemoteCatalog {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
    offline: bool,
    list: Vec<CatalogEntry>,
    source: ListSource,
    cache: HashMap<u32, CatalogEntry>,
    fallback: Vec<CatalogEntry>,
    rng: StdRng,
}

impl RemoteCatalog {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("pokequiz/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: config.request_timeout_secs,
            offline: config.offline,
            list: Vec::new(),
            source: ListSource::NotLoaded,
            cache: HashMap::new(),
            fallback: fallback_entries(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Replace the built-in fallback list.
    pub fn with_fallback(mut self, entries: Vec<CatalogEntry>) -> Self {
        self.fallback = entries;
        self
    }

    /// Use a deterministic random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Mark the device as offline (or back online).
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn source(&self) -> ListSource {
        self.source
    }

    /// A cached entry, without touching the network.
    pub fn cached(&self, id: u32) -> Option<&CatalogEntry> {
        self.cache.get(&id)
    }

    fn map_request_error(&self, e: reqwest::Error) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            CatalogError::NetworkError(format!("catalog not reachable at {}", self.base_url))
        } else {
            CatalogError::NetworkError(e.to_string())
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        if self.offline {
            return Err(CatalogError::Offline);
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::InvalidResponse(format!("failed to parse response: {e}")))
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.get_json(&self.base_url).await
    }

    #[instrument(skip(self))]
    async fn fetch_one(&self, id: u32) -> Result<CatalogEntry, CatalogError> {
        self.get_json(&format!("{}/{}", self.base_url, id)).await
    }

    fn random_fallback(&mut self) -> Option<CatalogEntry> {
        self.fallback.choose(&mut self.rng).cloned()
    }

    fn fallback_for(&mut self, id: u32) -> Option<CatalogEntry> {
        if let Some(entry) = self.fallback.iter().find(|e| e.id == id) {
            return Some(entry.clone());
        }
        self.random_fallback()
    }
}

#[async_trait]
impl Catalog for RemoteCatalog {
    async fn load_all(&mut self) -> Vec<CatalogEntry> {
        if self.source != ListSource::NotLoaded {
            return self.list.clone();
        }

        match self.fetch_all().await {
            Ok(list) => {
                info!(entries = list.len(), "catalog loaded from {}", self.base_url);
                self.list = list;
                self.source = ListSource::Remote;
            }
            Err(e) => {
                warn!("catalog unavailable, using built-in list: {e}");
                self.list = self.fallback.clone();
                self.source = ListSource::Fallback;
            }
        }
        self.list.clone()
    }

    async fn get_by_id(&mut self, id: u32) -> Option<CatalogEntry> {
        if let Some(entry) = self.cache.get(&id) {
            return Some(entry.clone());
        }

        match self.fetch_one(id).await {
            Ok(entry) => {
                self.cache.insert(id, entry.clone());
                Some(entry)
            }
            Err(e) => {
                debug!("entry {id} unavailable, using built-in list: {e}");
                self.fallback_for(id)
            }
        }
    }

    fn pick_random(&mut self) -> Option<CatalogEntry> {
        if self.list.is_empty() {
            return self.random_fallback();
        }
        let entry = self.list.choose(&mut self.rng)?.clone();
        self.cache.insert(entry.id, entry.clone());
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokequiz_core::model::Language;
    use pokequiz_core::session::build_round;
    use std::collections::HashSet;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> CatalogConfig {
        CatalogConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        }
    }

    fn remote_list() -> serde_json::Value {
        serde_json::json!([
            {
                "pokedex_id": 0,
                "generation": 0,
                "name": {"fr": "MissingNo.", "en": "MissingNo.", "jp": "けつばん"},
                "sprites": {"regular": "https://img/0.png", "shiny": null, "gmax": null}
            },
            {
                "pokedex_id": 25,
                "generation": 1,
                "category": "Pokémon Souris",
                "name": {"fr": "Pikachu", "en": "Pikachu", "jp": "ピカチュウ"},
                "sprites": {"regular": "https://img/25.png", "shiny": "https://img/25s.png", "gmax": {"regular": "a", "shiny": "b"}},
                "types": [{"name": "Électrik", "image": "https://img/elec.png"}]
            },
            {
                "pokedex_id": 133,
                "generation": 1,
                "name": {"fr": "Évoli", "en": "Eevee", "jp": "イーブイ"},
                "sprites": {"regular": "https://img/133.png", "shiny": null, "gmax": null}
            }
        ])
    }

    #[tokio::test]
    async fn loads_remote_list_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/pokemon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(remote_list()))
            .expect(1)
            .mount(&server)
            .await;

        let mut catalog =
            RemoteCatalog::new(&config(&format!("{}/api/v1/pokemon", server.uri()))).unwrap();
        let list = catalog.load_all().await;
        assert_eq!(list.len(), 3);
        assert_eq!(catalog.source(), ListSource::Remote);

        let again = catalog.load_all().await;
        assert_eq!(again, list);
    }

    #[tokio::test]
    async fn server_error_falls_back_permanently() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/pokemon"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .expect(1)
            .mount(&server)
            .await;

        let mut catalog =
            RemoteCatalog::new(&config(&format!("{}/api/v1/pokemon", server.uri()))).unwrap();
        let list = catalog.load_all().await;
        assert_eq!(list, fallback_entries());
        assert_eq!(catalog.source(), ListSource::Fallback);

        // No retry for the rest of the process.
        catalog.load_all().await;
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let mut catalog = RemoteCatalog::new(&config(&format!("{}/pokemon", server.uri()))).unwrap();
        catalog.load_all().await;
        assert_eq!(catalog.source(), ListSource::Fallback);
    }

    #[tokio::test]
    async fn unreachable_host_falls_back() {
        // Nothing listens on port 9 of localhost.
        let mut catalog = RemoteCatalog::new(&config("http://127.0.0.1:9/pokemon")).unwrap();
        let list = catalog.load_all().await;
        assert_eq!(list.len(), fallback_entries().len());
    }

    #[tokio::test]
    async fn offline_never_hits_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(remote_list()))
            .expect(0)
            .mount(&server)
            .await;

        let mut catalog = RemoteCatalog::new(&config(&server.uri())).unwrap();
        catalog.set_offline(true);
        assert!(catalog.is_offline());

        catalog.load_all().await;
        assert_eq!(catalog.source(), ListSource::Fallback);

        let entry = catalog.get_by_id(25).await.unwrap();
        assert_eq!(entry.display_name(Language::En), Some("Pikachu"));
    }

    #[tokio::test]
    async fn get_by_id_fetches_and_caches() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "pokedex_id": 150,
            "name": {"fr": "Mewtwo", "en": "Mewtwo", "jp": "ミュウツー"},
            "sprites": {"regular": "https://img/150.png"}
        });

        Mock::given(method("GET"))
            .and(path("/pokemon/150"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let mut catalog = RemoteCatalog::new(&config(&format!("{}/pokemon", server.uri()))).unwrap();
        let first = catalog.get_by_id(150).await.unwrap();
        assert_eq!(first.id, 150);
        assert!(catalog.cached(150).is_some());

        let second = catalog.get_by_id(150).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_by_id_failure_uses_matching_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let mut catalog = RemoteCatalog::new(&config(&server.uri())).unwrap();
        let entry = catalog.get_by_id(133).await.unwrap();
        assert_eq!(entry.display_name(Language::Fr), Some("Évoli"));
        assert!(catalog.cached(133).is_none());

        let any = catalog.get_by_id(9999).await.unwrap();
        assert!(fallback_entries().contains(&any));
    }

    #[tokio::test]
    async fn pick_random_caches_selection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(remote_list()))
            .mount(&server)
            .await;

        let mut catalog = RemoteCatalog::new(&config(&format!("{}/pokemon", server.uri())))
            .unwrap()
            .with_seed(7);
        catalog.load_all().await;

        let picked = catalog.pick_random().unwrap();
        assert_eq!(catalog.cached(picked.id), Some(&picked));
    }

    #[tokio::test]
    async fn pick_random_before_load_uses_fallback() {
        let mut catalog = RemoteCatalog::new(&config("http://127.0.0.1:9"))
            .unwrap()
            .with_seed(1);
        let picked = catalog.pick_random().unwrap();
        assert!(fallback_entries().contains(&picked));
    }

    #[tokio::test]
    async fn empty_remote_list_draws_from_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let mut catalog = RemoteCatalog::new(&config(&server.uri())).unwrap();
        assert!(catalog.load_all().await.is_empty());
        assert_eq!(catalog.source(), ListSource::Remote);
        assert!(catalog.pick_random().is_some());
    }

    #[tokio::test]
    async fn offline_round_is_full_and_distinct() {
        let mut catalog = RemoteCatalog::new(&config("http://127.0.0.1:9"))
            .unwrap()
            .with_seed(42);
        catalog.set_offline(true);

        let round = build_round(&mut catalog, 10, Language::Fr).await;
        assert_eq!(round.len(), 10);
        let ids: HashSet<u32> = round.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn custom_fallback_list() {
        let tiny = fallback_entries().into_iter().take(3).collect::<Vec<_>>();
        let mut catalog = RemoteCatalog::new(&config("http://127.0.0.1:9"))
            .unwrap()
            .with_fallback(tiny.clone())
            .with_seed(3);
        catalog.set_offline(true);

        let round = build_round(&mut catalog, 10, Language::Fr).await;
        assert_eq!(round.len(), 3);
    }
}
