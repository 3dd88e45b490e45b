use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    storage::{load_list, save_list, KeyValueStore, FAVORITES_KEY},
    Result,
};

/// Persistent, deduplicated list of favorite quotes
///
/// Entries are the rendered `"text - author"` strings, kept in the order
/// they were added. A failed write is returned to the caller as-is: no
/// retry, and nothing is rolled back.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        load_list(self.store.as_ref(), FAVORITES_KEY).await
    }

    /// Add a favorite. Returns false when it was empty or already saved.
    pub async fn add(&self, quote: &str) -> Result<bool> {
        if quote.is_empty() {
            return Ok(false);
        }

        let mut favorites = self.list().await?;
        if favorites.iter().any(|f| f == quote) {
            debug!("Already a favorite: {}", quote);
            return Ok(false);
        }

        favorites.push(quote.to_string());
        save_list(self.store.as_ref(), FAVORITES_KEY, &favorites).await?;
        info!("Saved favorite ({} total)", favorites.len());
        Ok(true)
    }

    /// Remove every entry equal to `quote`, returns the resulting list
    pub async fn remove(&self, quote: &str) -> Result<Vec<String>> {
        let mut favorites = self.list().await?;
        favorites.retain(|f| f != quote);
        save_list(self.store.as_ref(), FAVORITES_KEY, &favorites).await?;
        Ok(favorites)
    }

    pub async fn clear(&self) -> Result<()> {
        save_list::<String>(self.store.as_ref(), FAVORITES_KEY, &[]).await?;
        info!("Cleared all favorites");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockKeyValueStore;
    use crate::Error;
    use quotebox_store::KvStore;
    use serde_json::json;

    fn favorites() -> FavoritesStore {
        FavoritesStore::new(Arc::new(KvStore::in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_unset_is_empty() {
        assert!(favorites().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_keeps_insertion_order() {
        let favs = favorites();
        assert!(favs.add("B - 2").await.unwrap());
        assert!(favs.add("A - 1").await.unwrap());
        assert!(favs.add("C - 3").await.unwrap());

        assert_eq!(favs.list().await.unwrap(), vec!["B - 2", "A - 1", "C - 3"]);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let favs = favorites();
        assert!(favs.add("X - Y").await.unwrap());
        assert!(!favs.add("X - Y").await.unwrap());

        assert_eq!(favs.list().await.unwrap(), vec!["X - Y"]);
    }

    #[tokio::test]
    async fn test_add_empty_is_noop() {
        let favs = favorites();
        assert!(!favs.add("").await.unwrap());
        assert!(favs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_is_exact() {
        let favs = favorites();
        favs.add("X - Y").await.unwrap();
        assert!(favs.add("x - y").await.unwrap());
        assert!(favs.add("X - Y ").await.unwrap());
        assert_eq!(favs.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_remove() {
        let favs = favorites();
        favs.add("A - 1").await.unwrap();
        favs.add("B - 2").await.unwrap();

        let remaining = favs.remove("A - 1").await.unwrap();
        assert_eq!(remaining, vec!["B - 2"]);
        assert!(!favs.list().await.unwrap().contains(&"A - 1".to_string()));
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_list_unchanged() {
        let favs = favorites();
        favs.add("A - 1").await.unwrap();

        assert_eq!(favs.remove("nope").await.unwrap(), vec!["A - 1"]);
        assert_eq!(favs.list().await.unwrap(), vec!["A - 1"]);
    }

    #[tokio::test]
    async fn test_remove_drops_all_copies() {
        // Duplicates can only come from an outside writer
        let store = Arc::new(KvStore::in_memory().unwrap());
        store
            .set(FAVORITES_KEY, &vec!["A - 1", "B - 2", "A - 1"])
            .unwrap();

        let favs = FavoritesStore::new(store);
        assert_eq!(favs.remove("A - 1").await.unwrap(), vec!["B - 2"]);
    }

    #[tokio::test]
    async fn test_clear() {
        let favs = favorites();
        favs.add("A - 1").await.unwrap();
        favs.add("B - 2").await.unwrap();

        favs.clear().await.unwrap();
        assert!(favs.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_is_reported() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some(json!(["A - 1"]))));
        store
            .expect_set()
            .returning(|_, _| Err(Error::StorageError("quota exceeded".into())));

        let favs = FavoritesStore::new(Arc::new(store));
        assert!(matches!(
            favs.add("B - 2").await,
            Err(Error::StorageError(_))
        ));
        assert!(favs.remove("A - 1").await.is_err());
        assert!(favs.clear().await.is_err());

        // Reads still see what was there before
        assert_eq!(favs.list().await.unwrap(), vec!["A - 1"]);
    }
}
