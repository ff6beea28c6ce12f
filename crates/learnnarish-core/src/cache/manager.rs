use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::reader::{ReadKey, Reader};
use super::result::DbResult;
use super::CacheError;
use crate::config::Config;
use crate::models::{
    Collection, Definition, Example, Lesson, Page, Pattern, Record, Root, Word, WordData,
    BY_NUMBER,
};
use crate::routes::{self, Route};
use crate::store::Store;
use crate::sync::{RemoteSource, SyncEngine, SyncError, SyncReport};
use crate::utils::format_age;
use crate::views::{self, DictionaryPage, DictionaryQuery};

type Shared<T> = DbResult<Arc<T>>;

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    InMemory,
    File(PathBuf),
}

/// Memoised views. Each is computed on first access and reused until the
/// manager is invalidated or closed.
#[derive(Default)]
struct Views {
    lessons: OnceCell<Shared<Vec<Lesson>>>,
    patterns: OnceCell<Shared<Vec<Pattern>>>,
    pages: OnceCell<Shared<Vec<Page>>>,
    words: OnceCell<Shared<Vec<Word>>>,
    roots: OnceCell<Shared<Vec<Root>>>,
    examples: OnceCell<Shared<Vec<Example>>>,
    definitions: OnceCell<Shared<Vec<Definition>>>,
    ordered_pages: OnceCell<Shared<Vec<Page>>>,
    pages_link_map: OnceCell<Shared<HashMap<String, Page>>>,
    word_data: OnceCell<Shared<Vec<WordData>>>,
    sorted_words: OnceCell<Shared<Vec<WordData>>>,
    word_data_id_map: OnceCell<Shared<HashMap<i64, WordData>>>,
}

/// Sync state of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStatus {
    pub collection: Collection,
    pub records: usize,
    pub watermark: Option<DateTime<Utc>>,
}

impl CollectionStatus {
    pub fn age_display(&self) -> String {
        match self.watermark {
            Some(at) => format_age(at, Utc::now()),
            None => "never".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatus {
    pub store_path: Option<PathBuf>,
    pub collections: Vec<CollectionStatus>,
}

/// Entry point for applications: owns the store, the sync engine and the
/// memoised views built on top of them.
///
/// Nothing touches disk or network until the first read, which opens the
/// store. Every view returns a [`DbResult`]: `local` straight from the
/// store, `remote` once the collections it depends on have synced.
pub struct CacheManager {
    location: StoreLocation,
    source: Arc<dyn RemoteSource>,
    reader: OnceCell<Reader>,
    views: Views,
}

impl CacheManager {
    pub fn new(location: StoreLocation, source: Arc<dyn RemoteSource>) -> Self {
        Self {
            location,
            source,
            reader: OnceCell::new(),
            views: Views::default(),
        }
    }

    /// A manager backed by the store file named in `config`.
    pub fn from_config(config: &Config, source: Arc<dyn RemoteSource>) -> anyhow::Result<Self> {
        Ok(Self::new(StoreLocation::File(config.store_path()?), source))
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.reader.initialized()
    }

    /// Open the store. Later calls return the same reader.
    pub async fn open(&self) -> Result<&Reader, CacheError> {
        self.reader
            .get_or_try_init(|| async {
                let store = match &self.location {
                    StoreLocation::InMemory => Store::in_memory(),
                    StoreLocation::File(path) => {
                        Store::open(path).map_err(CacheError::SchemaOpen)?
                    }
                };
                info!(location = ?self.location, "Opened store");
                let engine = SyncEngine::new(Arc::new(store), Arc::clone(&self.source));
                Ok::<_, CacheError>(Reader::new(Arc::new(engine)))
            })
            .await
    }

    /// Drop the store handle and every memoised view. Syncs already in
    /// flight still run to completion.
    pub fn close(&mut self) {
        self.invalidate();
        if self.reader.take().is_some() {
            debug!("Closed store");
        }
    }

    /// Forget memoised views so the next access re-reads the store and
    /// starts fresh syncs.
    pub fn invalidate(&mut self) {
        self.views = Views::default();
    }

    async fn read_all<T: Record>(
        &self,
        index: Option<&'static str>,
    ) -> Result<Shared<Vec<T>>, CacheError> {
        self.open().await?.read_all::<T>(index)
    }

    // ===== Collections =====

    /// Lessons in lesson-number order; unnumbered lessons are left out.
    pub async fn lessons(&self) -> Result<Shared<Vec<Lesson>>, CacheError> {
        self.views
            .lessons
            .get_or_try_init(|| self.read_all(Some(BY_NUMBER)))
            .await
            .cloned()
    }

    /// Patterns in pattern-number order; unnumbered patterns are left out.
    pub async fn patterns(&self) -> Result<Shared<Vec<Pattern>>, CacheError> {
        self.views
            .patterns
            .get_or_try_init(|| self.read_all(Some(BY_NUMBER)))
            .await
            .cloned()
    }

    pub async fn pages(&self) -> Result<Shared<Vec<Page>>, CacheError> {
        self.views
            .pages
            .get_or_try_init(|| self.read_all(None))
            .await
            .cloned()
    }

    pub async fn words(&self) -> Result<Shared<Vec<Word>>, CacheError> {
        self.views
            .words
            .get_or_try_init(|| self.read_all(None))
            .await
            .cloned()
    }

    pub async fn roots(&self) -> Result<Shared<Vec<Root>>, CacheError> {
        self.views
            .roots
            .get_or_try_init(|| self.read_all(None))
            .await
            .cloned()
    }

    pub async fn examples(&self) -> Result<Shared<Vec<Example>>, CacheError> {
        self.views
            .examples
            .get_or_try_init(|| self.read_all(None))
            .await
            .cloned()
    }

    pub async fn definitions(&self) -> Result<Shared<Vec<Definition>>, CacheError> {
        self.views
            .definitions
            .get_or_try_init(|| self.read_all(None))
            .await
            .cloned()
    }

    // ===== Derived views =====

    pub async fn ordered_pages(&self) -> Result<Shared<Vec<Page>>, CacheError> {
        self.views
            .ordered_pages
            .get_or_try_init(|| async {
                let pages = self.pages().await?;
                Ok::<_, CacheError>(pages.map(|pages| Arc::new(views::ordered_pages(pages))))
            })
            .await
            .cloned()
    }

    pub async fn pages_link_map(&self) -> Result<Shared<HashMap<String, Page>>, CacheError> {
        self.views
            .pages_link_map
            .get_or_try_init(|| async {
                let pages = self.pages().await?;
                Ok::<_, CacheError>(pages.map(|pages| Arc::new(views::link_map(pages))))
            })
            .await
            .cloned()
    }

    /// Every word joined with its references. The remote half settles once
    /// all five collections involved have synced.
    pub async fn word_data(&self) -> Result<Shared<Vec<WordData>>, CacheError> {
        self.views
            .word_data
            .get_or_try_init(|| async {
                let words = self.words().await?;
                let patterns = self.patterns().await?;
                let roots = self.roots().await?;
                let definitions = self.definitions().await?;
                let examples = self.examples().await?;

                let joined = words
                    .zip(&patterns)
                    .zip(&roots)
                    .zip(&definitions)
                    .zip(&examples)
                    .map(|((((words, patterns), roots), definitions), examples)| {
                        Arc::new(views::join_word_data(
                            words,
                            patterns,
                            roots,
                            definitions,
                            examples,
                        ))
                    });
                Ok::<_, CacheError>(joined)
            })
            .await
            .cloned()
    }

    /// Word data in dictionary order.
    pub async fn sorted_words(&self) -> Result<Shared<Vec<WordData>>, CacheError> {
        self.views
            .sorted_words
            .get_or_try_init(|| async {
                let words = self.word_data().await?;
                Ok::<_, CacheError>(words.map(|words| Arc::new(views::sorted_words(words))))
            })
            .await
            .cloned()
    }

    pub async fn word_data_id_map(&self) -> Result<Shared<HashMap<i64, WordData>>, CacheError> {
        self.views
            .word_data_id_map
            .get_or_try_init(|| async {
                let words = self.word_data().await?;
                Ok::<_, CacheError>(words.map(|words| Arc::new(views::word_data_id_map(words))))
            })
            .await
            .cloned()
    }

    // ===== Lookups =====

    pub async fn lesson(&self, number: i64) -> Result<DbResult<Option<Lesson>>, CacheError> {
        self.open().await?.read::<Lesson>(ReadKey::Index {
            index: BY_NUMBER,
            key: number,
        })
    }

    pub async fn page(&self, id: i64) -> Result<DbResult<Option<Page>>, CacheError> {
        self.open().await?.read::<Page>(ReadKey::Primary(id))
    }

    pub async fn word(&self, id: i64) -> Result<DbResult<Option<WordData>>, CacheError> {
        Ok(self
            .word_data_id_map()
            .await?
            .map(move |words| words.get(&id).cloned()))
    }

    pub async fn search_dictionary(
        &self,
        query: DictionaryQuery,
    ) -> Result<DbResult<DictionaryPage>, CacheError> {
        Ok(self
            .sorted_words()
            .await?
            .map(move |words| views::search_dictionary(words, &query)))
    }

    pub async fn resolve_route(&self, path: &str) -> Result<DbResult<Route>, CacheError> {
        let path = path.to_string();
        Ok(self
            .pages_link_map()
            .await?
            .map(move |links| routes::resolve(&path, links)))
    }

    // ===== Maintenance =====

    /// Run one sync pass per collection, outside of any view.
    pub async fn sync_all(
        &self,
    ) -> Result<Vec<(Collection, Result<SyncReport, SyncError>)>, CacheError> {
        Ok(self.open().await?.engine().sync_all().await)
    }

    pub async fn status(&self) -> Result<CacheStatus, CacheError> {
        let store = self.open().await?.store();
        Ok(CacheStatus {
            store_path: store.path().map(|p| p.to_path_buf()),
            collections: Collection::ALL
                .iter()
                .map(|&collection| CollectionStatus {
                    collection,
                    records: store.count(collection),
                    watermark: store.get_watermark(collection),
                })
                .collect(),
        })
    }
}
