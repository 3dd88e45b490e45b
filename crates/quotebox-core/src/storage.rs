// Persistent key-value seam between the core and whatever stores its state
use async_trait::async_trait;
use quotebox_store::KvStore;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::Result;

/// Key holding the rate limiter's timestamp list
pub const GENERATION_TIMES_KEY: &str = "quoteGenerationTimes";
/// Key holding the favorites list
pub const FAVORITES_KEY: &str = "favoriteQuotes";

/// Async get/set over JSON values
///
/// Reads and writes are independent: callers doing read-modify-write get
/// last-write-wins if someone else writes in between.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

#[async_trait]
impl KeyValueStore for KvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(KvStore::get::<Value>(self, key)?)
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        Ok(KvStore::set(self, key, &value)?)
    }
}

/// Read a JSON array, unset keys read as empty
pub async fn load_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>> {
    match store.get(key).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

pub async fn save_list<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<()> {
    let value = serde_json::to_value(items)?;
    store.set(key, value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unset_key_is_empty_list() {
        let store = KvStore::in_memory().unwrap();
        let items: Vec<String> = load_list(&store, FAVORITES_KEY).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_list_round_trip_through_sqlite() {
        let store = KvStore::in_memory().unwrap();
        save_list(&store, GENERATION_TIMES_KEY, &[5_i64, 7]).await.unwrap();

        assert_eq!(
            KeyValueStore::get(&store, GENERATION_TIMES_KEY).await.unwrap(),
            Some(json!([5, 7]))
        );
    }

    #[tokio::test]
    async fn test_wrong_shape_is_serialization_error() {
        let store = KvStore::in_memory().unwrap();
        KeyValueStore::set(&store, FAVORITES_KEY, json!({"not": "a list"}))
            .await
            .unwrap();

        let result: Result<Vec<String>> = load_list(&store, FAVORITES_KEY).await;
        assert!(matches!(result, Err(crate::Error::SerializationError(_))));
    }
}
