use crate::source::cache::{DiskCache, fetch_url};
use crate::source::{CategoryId, Item, ItemSource, SourceError, parse_items};

/// Downloads `<base_url>/<category>.json`, keeping the last good copy on disk.
/// Falls back to the cached copy, then to `fallback`.
pub struct RemoteSource<F: ItemSource> {
    base_url: String,
    cache: Option<DiskCache>,
    fallback: F,
}

impl<F: ItemSource> RemoteSource<F> {
    pub fn new(base_url: &str, cache: Option<DiskCache>, fallback: F) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            fallback,
        }
    }

    fn url_for(&self, id: &CategoryId) -> String {
        format!("{}/{id}.json", self.base_url)
    }

    fn download(&self, id: &CategoryId) -> Result<Vec<Item>, SourceError> {
        let body = fetch_url(&self.url_for(id)).map_err(SourceError::Download)?;
        let items = parse_items(&body)?;
        if let Some(ref cache) = self.cache {
            let key = format!("{id}.json");
            if cache.differs(&key, &body) {
                log::info!("item list for {id} changed since the last download");
                if !cache.put(&key, &body) {
                    log::warn!("could not cache item list for {id}");
                }
            }
        }
        Ok(items)
    }

    fn cached(&self, id: &CategoryId) -> Option<Vec<Item>> {
        let body = self.cache.as_ref()?.get(&format!("{id}.json"))?;
        parse_items(&body).ok()
    }
}

impl<F: ItemSource> ItemSource for RemoteSource<F> {
    fn fetch(&self, id: &CategoryId) -> Result<Vec<Item>, SourceError> {
        match self.download(id) {
            Ok(items) => Ok(items),
            Err(err) => {
                log::warn!("download of {} failed: {err}", self.url_for(id));
                match self.cached(id) {
                    Some(items) => Ok(items),
                    None => self.fallback.fetch(id),
                }
            }
        }
    }
}
