use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

use super::deserializer::NewsItemDeserializer;
use super::types::NewsItem;
use crate::dispatch::Dispatcher;
use crate::error::TransportError;
use crate::search::{news_query, JsonClient};
use crate::urls::UrlProvider;
use crate::TARGET_WEB_REQUEST;

pub type NewsCompletion = Box<dyn FnOnce(Vec<NewsItem>) + Send + 'static>;
pub type NewsErrorCompletion = Box<dyn FnOnce(TransportError) + Send + 'static>;

pub trait NewsItemRepository: Send + Sync {
    /// Fetches the latest news. Exactly one callback fires, always on the dispatcher.
    fn fetch_news(&self, completion: NewsCompletion, error: NewsErrorCompletion) -> JoinHandle<()>;
}

#[derive(Clone)]
pub struct ConcreteNewsItemRepository {
    url_provider: Arc<dyn UrlProvider>,
    json_client: Arc<dyn JsonClient>,
    news_item_deserializer: Arc<dyn NewsItemDeserializer>,
    operation_queue: Arc<dyn Dispatcher>,
    page_size: usize,
    runtime: Handle,
}

impl ConcreteNewsItemRepository {
    /// Fetches are spawned on the Tokio runtime this is called from.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(
        url_provider: Arc<dyn UrlProvider>,
        json_client: Arc<dyn JsonClient>,
        news_item_deserializer: Arc<dyn NewsItemDeserializer>,
        operation_queue: Arc<dyn Dispatcher>,
        page_size: usize,
    ) -> Self {
        Self {
            url_provider,
            json_client,
            news_item_deserializer,
            operation_queue,
            page_size,
            runtime: Handle::current(),
        }
    }

    /// Spawns fetches on `runtime` instead.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = runtime;
        self
    }

    #[instrument(target = "web_request", level = "info", skip(self))]
    pub async fn news_items(&self) -> Result<Vec<NewsItem>, TransportError> {
        let url = self.url_provider.news_feed_url();
        let json = self
            .json_client
            .post_json(&url, &news_query(self.page_size))
            .await?;
        let items = self.news_item_deserializer.deserialize_news_items(&json);

        info!(target: TARGET_WEB_REQUEST, "Fetched {} news items from {}", items.len(), url);
        Ok(items)
    }
}

impl NewsItemRepository for ConcreteNewsItemRepository {
    fn fetch_news(&self, completion: NewsCompletion, error: NewsErrorCompletion) -> JoinHandle<()> {
        let repository = self.clone();

        self.runtime.spawn(async move {
            let operation: crate::dispatch::Operation = match repository.news_items().await {
                Ok(items) => Box::new(move || completion(items)),
                Err(err) => Box::new(move || error(err)),
            };
            repository.operation_queue.add_operation(operation);
        })
    }
}
