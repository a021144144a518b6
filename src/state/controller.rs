use std::sync::{Arc, RwLock};

use anyhow::Context;
use log::{error, info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    error::{Collection, PersistenceError, Result},
    models::{ColorScheme, MoodCategory, MoodEntry, Snack},
    store::{KeyValueStore, DARK_MODE_KEY, MOODS_KEY, SNACKS_KEY},
};

use super::seed::default_snacks;

/// One persisted value plus the gate that serializes writers to it.
///
/// Readers take the `current` lock only long enough to clone; writers hold
/// `writer` across the store call so each mutation starts from the value the
/// previous one left behind.
struct Slot<T> {
    current: RwLock<T>,
    writer: Mutex<()>,
}

impl<T: Clone> Slot<T> {
    fn new(value: T) -> Self {
        Self {
            current: RwLock::new(value),
            writer: Mutex::new(()),
        }
    }

    fn snapshot(&self) -> T {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn swap(&self, next: T) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }
}

/// Owns the mood list, the snack list and the dark-mode flag for the life of
/// the process.
///
/// A controller only exists once [`StateController::load`] has finished, so
/// holding one means the state is ready to render.
#[derive(Clone)]
pub struct StateController {
    store: Arc<dyn KeyValueStore>,
    moods: Arc<Slot<Vec<MoodEntry>>>,
    snacks: Arc<Slot<Vec<Snack>>>,
    dark_mode: Arc<Slot<bool>>,
}

impl StateController {
    /// Read everything the app needs from `store`.
    ///
    /// Never fails: a store error or malformed value is logged and the state
    /// falls back to no moods, the seed snacks and the system theme.
    pub async fn load(store: Arc<dyn KeyValueStore>, system_scheme: ColorScheme) -> Self {
        let default_dark = system_scheme.is_dark();

        let (moods, snacks, dark_mode) =
            match read_persisted(store.as_ref(), default_dark).await {
                Ok(loaded) => loaded,
                Err(err) => {
                    error!("Error loading data: {err:#}");
                    (Vec::new(), default_snacks(), default_dark)
                }
            };

        info!(
            "State loaded: {} moods, {} snacks, dark mode {}",
            moods.len(),
            snacks.len(),
            if dark_mode { "on" } else { "off" }
        );

        Self {
            store,
            moods: Arc::new(Slot::new(moods)),
            snacks: Arc::new(Slot::new(snacks)),
            dark_mode: Arc::new(Slot::new(dark_mode)),
        }
    }

    pub fn moods(&self) -> Vec<MoodEntry> {
        self.moods.snapshot()
    }

    pub fn mood(&self, id: &str) -> Option<MoodEntry> {
        self.moods.snapshot().into_iter().find(|mood| mood.id == id)
    }

    pub fn snacks(&self) -> Vec<Snack> {
        self.snacks.snapshot()
    }

    pub fn snack(&self, id: &str) -> Option<Snack> {
        self.snacks.snapshot().into_iter().find(|snack| snack.id == id)
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode.snapshot()
    }

    /// Every snack tagged with `category`, in collection order.
    pub fn recommended_snacks_for(&self, category: MoodCategory) -> Vec<Snack> {
        self.snacks
            .snapshot()
            .into_iter()
            .filter(|snack| snack.is_recommended_for(category))
            .collect()
    }

    pub async fn create_mood(&self, mood: MoodEntry) -> Result<Vec<MoodEntry>> {
        self.commit(&self.moods, Collection::Moods, move |current| {
            let mut next = current.to_vec();
            next.push(mood);
            next
        })
        .await
    }

    /// Substitute the entry sharing `mood.id`. An unknown id leaves the list
    /// unchanged; it is still written back and reported only in the log.
    pub async fn replace_mood(&self, mood: MoodEntry) -> Result<Vec<MoodEntry>> {
        let id = mood.id.clone();
        let mut matched = false;
        let result = self
            .commit(&self.moods, Collection::Moods, |current| {
                substitute(current, mood, |entry| entry.id == id, &mut matched)
            })
            .await;
        if result.is_ok() && !matched {
            warn!("replace_mood: no mood with id {id}; list left unchanged");
        }
        result
    }

    pub async fn remove_mood(&self, id: &str) -> Result<Vec<MoodEntry>> {
        self.commit(&self.moods, Collection::Moods, |current| {
            current.iter().filter(|entry| entry.id != id).cloned().collect()
        })
        .await
    }

    pub async fn create_snack(&self, snack: Snack) -> Result<Vec<Snack>> {
        self.commit(&self.snacks, Collection::Snacks, move |current| {
            let mut next = current.to_vec();
            next.push(snack);
            next
        })
        .await
    }

    /// Same contract as [`StateController::replace_mood`].
    pub async fn replace_snack(&self, snack: Snack) -> Result<Vec<Snack>> {
        let id = snack.id.clone();
        let mut matched = false;
        let result = self
            .commit(&self.snacks, Collection::Snacks, |current| {
                substitute(current, snack, |entry| entry.id == id, &mut matched)
            })
            .await;
        if result.is_ok() && !matched {
            warn!("replace_snack: no snack with id {id}; list left unchanged");
        }
        result
    }

    pub async fn remove_snack(&self, id: &str) -> Result<Vec<Snack>> {
        self.commit(&self.snacks, Collection::Snacks, |current| {
            current.iter().filter(|snack| snack.id != id).cloned().collect()
        })
        .await
    }

    /// Adopt `enabled` immediately, then persist it.
    ///
    /// Unlike the collections, a failed write is only logged: the flag keeps
    /// its new value so the UI does not flip back mid-toggle.
    pub async fn set_theme_enabled(&self, enabled: bool) {
        let _writer = self.dark_mode.writer.lock().await;
        self.dark_mode.swap(enabled);
        if let Err(err) = self.persist(Collection::Theme, &enabled).await {
            error!("Error toggling dark mode: {err}");
        }
    }

    pub async fn toggle_theme(&self) -> bool {
        let _writer = self.dark_mode.writer.lock().await;
        let enabled = !self.dark_mode.snapshot();
        self.dark_mode.swap(enabled);
        if let Err(err) = self.persist(Collection::Theme, &enabled).await {
            error!("Error toggling dark mode: {err}");
        }
        enabled
    }

    /// Two-phase write: build the next list from the current one, persist
    /// it, and only then make it visible. On failure memory is untouched.
    async fn commit<T, F>(
        &self,
        slot: &Slot<Vec<T>>,
        collection: Collection,
        next_from: F,
    ) -> Result<Vec<T>>
    where
        T: Clone + Serialize,
        F: FnOnce(&[T]) -> Vec<T>,
    {
        let _writer = slot.writer.lock().await;
        let base = slot.snapshot();
        let next = next_from(base.as_slice());

        if let Err(err) = self.persist(collection, &next).await {
            error!("{err}");
            return Err(err);
        }

        slot.swap(next.clone());
        Ok(next)
    }

    async fn persist<T: Serialize + ?Sized>(
        &self,
        collection: Collection,
        value: &T,
    ) -> Result<()> {
        let serialized =
            serde_json::to_string(value).map_err(|err| PersistenceError::new(collection, err))?;
        self.store
            .set(collection.key(), serialized)
            .await
            .map_err(|err| PersistenceError::new(collection, err))
    }
}

fn substitute<T, P>(current: &[T], replacement: T, is_target: P, matched: &mut bool) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
{
    let mut replacement = Some(replacement);
    current
        .iter()
        .map(|entry| {
            if is_target(entry) {
                if let Some(next) = replacement.take() {
                    *matched = true;
                    return next;
                }
            }
            entry.clone()
        })
        .collect()
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.is_empty())
}

async fn read_persisted(
    store: &dyn KeyValueStore,
    default_dark: bool,
) -> anyhow::Result<(Vec<MoodEntry>, Vec<Snack>, bool)> {
    let (moods_raw, snacks_raw, dark_raw) = tokio::join!(
        store.get(MOODS_KEY),
        store.get(SNACKS_KEY),
        store.get(DARK_MODE_KEY),
    );

    let moods = match non_empty(moods_raw.context("failed to read moods")?) {
        Some(raw) => serde_json::from_str(&raw).context("stored moods are malformed")?,
        None => Vec::new(),
    };

    let snacks = match non_empty(snacks_raw.context("failed to read snacks")?) {
        Some(raw) => serde_json::from_str(&raw).context("stored snacks are malformed")?,
        None => {
            let seed = default_snacks();
            store
                .set(SNACKS_KEY, serde_json::to_string(&seed)?)
                .await
                .context("failed to persist seed snacks")?;
            info!("Seeded {} default snacks", seed.len());
            seed
        }
    };

    let dark_mode = match non_empty(dark_raw.context("failed to read theme")?) {
        Some(raw) => serde_json::from_str(&raw).context("stored theme flag is malformed")?,
        None => default_dark,
    };

    Ok((moods, snacks, dark_mode))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;

    use anyhow::{anyhow, Result as AnyResult};
    use async_trait::async_trait;

    use super::*;
    use crate::store::MemoryStore;

    /// Memory store that yields to the scheduler before every write, so a
    /// second caller gets polled while the first is mid-save.
    #[derive(Default)]
    struct YieldingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl KeyValueStore for YieldingStore {
        async fn get(&self, key: &str) -> AnyResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> AnyResult<()> {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> AnyResult<()> {
            self.inner.remove(key).await
        }
    }

    /// Memory store whose writes to selected keys always fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing_sets: StdMutex<HashSet<String>>,
        fail_reads: bool,
    }

    impl FlakyStore {
        fn failing_set(key: &str) -> Self {
            let store = Self::default();
            store.fail_set(key);
            store
        }

        fn fail_set(&self, key: &str) {
            self.failing_sets.lock().unwrap().insert(key.to_string());
        }

        fn heal(&self) {
            self.failing_sets.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> AnyResult<Option<String>> {
            if self.fail_reads {
                return Err(anyhow!("read of {key} rejected"));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> AnyResult<()> {
            if self.failing_sets.lock().unwrap().contains(key) {
                return Err(anyhow!("write of {key} rejected"));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> AnyResult<()> {
            self.inner.remove(key).await
        }
    }

    fn mood(id: &str, category: MoodCategory, intensity: u8) -> MoodEntry {
        MoodEntry::new(id, category, intensity, None)
    }

    async fn fresh() -> (Arc<MemoryStore>, StateController) {
        let store = Arc::new(MemoryStore::new());
        let controller = StateController::load(store.clone(), ColorScheme::Light).await;
        (store, controller)
    }

    #[tokio::test]
    async fn test_first_run_seeds_and_persists_snacks() {
        let (store, controller) = fresh().await;

        let snacks = controller.snacks();
        let names: Vec<_> = snacks.iter().map(|snack| snack.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Dark Chocolate",
                "Mixed Nuts",
                "Fresh Fruit",
                "Green Tea",
                "Yogurt with Berries"
            ]
        );
        let ids: Vec<_> = snacks.iter().map(|snack| snack.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);

        let persisted: Vec<Snack> =
            serde_json::from_str(&store.get(SNACKS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted, snacks);
        assert!(controller.moods().is_empty());
        assert!(!controller.is_dark_mode());
    }

    #[tokio::test]
    async fn test_theme_defaults_to_system_scheme() {
        let store = Arc::new(MemoryStore::new());
        let controller = StateController::load(store.clone(), ColorScheme::Dark).await;
        assert!(controller.is_dark_mode());
        assert_eq!(store.get(DARK_MODE_KEY).await.unwrap(), None);

        store.set(DARK_MODE_KEY, "false".to_string()).await.unwrap();
        let reloaded = StateController::load(store, ColorScheme::Dark).await;
        assert!(!reloaded.is_dark_mode());
    }

    #[tokio::test]
    async fn test_create_mood_appends_single_entry() {
        let (_, controller) = fresh().await;
        let entry = MoodEntry::new("m1", MoodCategory::Happy, 4, Some("lunch".into()));

        let moods = controller.create_mood(entry.clone()).await.unwrap();

        assert_eq!(moods, controller.moods());
        let matching: Vec<_> = moods.iter().filter(|m| m.id == "m1").collect();
        assert_eq!(matching, vec![&entry]);
    }

    #[tokio::test]
    async fn test_replace_mood_keeps_length_and_order() {
        let (_, controller) = fresh().await;
        for (id, category) in [
            ("a", MoodCategory::Sad),
            ("b", MoodCategory::Tired),
            ("c", MoodCategory::Angry),
        ] {
            controller.create_mood(mood(id, category, 2)).await.unwrap();
        }

        let replacement = MoodEntry::new("b", MoodCategory::Energetic, 5, Some("coffee".into()));
        let moods = controller.replace_mood(replacement.clone()).await.unwrap();

        assert_eq!(moods.len(), 3);
        let ids: Vec<_> = moods.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(moods[1], replacement);
        assert_eq!(controller.mood("b"), Some(replacement));
    }

    #[tokio::test]
    async fn test_replace_unknown_id_is_silent_noop() {
        let (store, controller) = fresh().await;
        controller
            .create_mood(mood("a", MoodCategory::Sad, 1))
            .await
            .unwrap();
        let before = controller.moods();

        let moods = controller
            .replace_mood(mood("ghost", MoodCategory::Happy, 3))
            .await
            .unwrap();

        assert_eq!(moods, before);
        let persisted: Vec<MoodEntry> =
            serde_json::from_str(&store.get(MOODS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted, before);
    }

    #[tokio::test]
    async fn test_remove_mood_present_and_absent() {
        let (_, controller) = fresh().await;
        controller
            .create_mood(mood("a", MoodCategory::Sad, 1))
            .await
            .unwrap();
        controller
            .create_mood(mood("b", MoodCategory::Happy, 5))
            .await
            .unwrap();

        let moods = controller.remove_mood("a").await.unwrap();
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].id, "b");

        let moods = controller.remove_mood("a").await.unwrap();
        assert_eq!(moods.len(), 1);
    }

    #[tokio::test]
    async fn test_recommendations_follow_collection_order() {
        let (_, controller) = fresh().await;

        let stressed: Vec<_> = controller
            .recommended_snacks_for(MoodCategory::Stressed)
            .into_iter()
            .map(|snack| snack.id)
            .collect();
        assert_eq!(stressed, vec!["1", "2", "4"]);

        controller.remove_snack("5").await.unwrap();
        assert!(controller
            .recommended_snacks_for(MoodCategory::Happy)
            .is_empty());

        controller
            .create_snack(Snack::new(
                "6",
                "Popcorn",
                "Light and crunchy",
                vec![MoodCategory::Happy, MoodCategory::Stressed],
            ))
            .await
            .unwrap();
        let stressed: Vec<_> = controller
            .recommended_snacks_for(MoodCategory::Stressed)
            .into_iter()
            .map(|snack| snack.id)
            .collect();
        assert_eq!(stressed, vec!["1", "2", "4", "6"]);
    }

    #[tokio::test]
    async fn test_replace_snack_substitutes_fields() {
        let (_, controller) = fresh().await;
        let mut tea = controller.snack("4").unwrap();
        tea.description = "Decaf".to_string();
        tea.mood_tags = vec![MoodCategory::Tired];

        let snacks = controller.replace_snack(tea.clone()).await.unwrap();

        assert_eq!(snacks.len(), 5);
        assert_eq!(snacks[3], tea);
        assert!(controller
            .recommended_snacks_for(MoodCategory::Angry)
            .is_empty());
    }

    #[tokio::test]
    async fn test_restart_round_trip() {
        let (store, controller) = fresh().await;
        controller
            .create_mood(mood("a", MoodCategory::Sad, 2))
            .await
            .unwrap();
        controller
            .create_mood(mood("b", MoodCategory::Happy, 4))
            .await
            .unwrap();
        controller.remove_snack("3").await.unwrap();
        controller.set_theme_enabled(true).await;

        let reloaded = StateController::load(store, ColorScheme::Light).await;

        assert_eq!(reloaded.moods(), controller.moods());
        assert_eq!(reloaded.snacks(), controller.snacks());
        assert!(reloaded.is_dark_mode());
    }

    #[tokio::test]
    async fn test_failed_mood_write_leaves_memory_unchanged() {
        let store = Arc::new(FlakyStore::default());
        let controller = StateController::load(store.clone(), ColorScheme::Light).await;
        controller
            .create_mood(mood("a", MoodCategory::Sad, 2))
            .await
            .unwrap();
        let before = controller.moods();

        store.fail_set(MOODS_KEY);
        let err = controller
            .create_mood(mood("b", MoodCategory::Happy, 4))
            .await
            .unwrap_err();

        assert_eq!(err.collection, Collection::Moods);
        assert_eq!(controller.moods(), before);

        assert!(controller.remove_mood("a").await.is_err());
        assert_eq!(controller.moods(), before);

        store.heal();
        controller
            .create_mood(mood("b", MoodCategory::Happy, 4))
            .await
            .unwrap();
        assert_eq!(controller.moods().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_snack_write_names_snacks() {
        // The seed write fails too, so startup falls back to the in-memory seed.
        let store = Arc::new(FlakyStore::failing_set(SNACKS_KEY));
        let controller = StateController::load(store.clone(), ColorScheme::Light).await;
        assert_eq!(controller.snacks(), default_snacks());

        let err = controller.remove_snack("1").await.unwrap_err();
        assert_eq!(err.collection, Collection::Snacks);
        assert_eq!(controller.snacks().len(), 5);
        assert_eq!(store.get(SNACKS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_theme_failure_keeps_new_value() {
        let store = Arc::new(FlakyStore::failing_set(DARK_MODE_KEY));
        let controller = StateController::load(store.clone(), ColorScheme::Light).await;

        controller.set_theme_enabled(true).await;

        assert!(controller.is_dark_mode());
        assert_eq!(store.get(DARK_MODE_KEY).await.unwrap(), None);

        assert!(!controller.toggle_theme().await);
        assert!(!controller.is_dark_mode());
    }

    #[tokio::test]
    async fn test_corrupt_store_falls_back_to_defaults() {
        let store = Arc::new(MemoryStore::with_entries([
            (MOODS_KEY, "{not json"),
            (SNACKS_KEY, "[]"),
            (DARK_MODE_KEY, "true"),
        ]));

        let controller = StateController::load(store.clone(), ColorScheme::Dark).await;

        assert!(controller.moods().is_empty());
        assert_eq!(controller.snacks(), default_snacks());
        assert!(controller.is_dark_mode());
        // Fallback does not rewrite the stored snacks.
        assert_eq!(store.get(SNACKS_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_unreadable_store_still_loads() {
        let store = Arc::new(FlakyStore {
            fail_reads: true,
            ..FlakyStore::default()
        });

        let controller = StateController::load(store, ColorScheme::Light).await;

        assert!(controller.moods().is_empty());
        assert_eq!(controller.snacks().len(), 5);
        assert!(!controller.is_dark_mode());
    }

    #[tokio::test]
    async fn test_back_to_back_creates_both_land() {
        let store = Arc::new(YieldingStore::default());
        let controller = StateController::load(store.clone(), ColorScheme::Light).await;
        let first = controller.clone();
        let second = controller.clone();
        let third = controller.clone();

        let (a, b, c) = tokio::join!(
            first.create_mood(mood("a", MoodCategory::Sad, 1)),
            second.create_mood(mood("b", MoodCategory::Happy, 5)),
            third.remove_snack("2"),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let ids: Vec<_> = controller.moods().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        let persisted: Vec<MoodEntry> =
            serde_json::from_str(&store.get(MOODS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted, controller.moods());
        assert_eq!(controller.snacks().len(), 4);
    }

    #[tokio::test]
    async fn test_interleaved_replace_and_remove_keep_both_changes() {
        let store = Arc::new(YieldingStore::default());
        let controller = StateController::load(store.clone(), ColorScheme::Light).await;
        let mut tea = controller.snack("4").unwrap();
        tea.name = "Jasmine Tea".to_string();

        let (replaced, removed) = tokio::join!(
            controller.replace_snack(tea.clone()),
            controller.remove_snack("1"),
        );
        replaced.unwrap();
        removed.unwrap();

        let snacks = controller.snacks();
        assert_eq!(snacks.len(), 4);
        assert!(controller.snack("1").is_none());
        assert_eq!(controller.snack("4"), Some(tea));
        let persisted: Vec<Snack> =
            serde_json::from_str(&store.get(SNACKS_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted, snacks);
    }
}
