use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::event::AppEvent;
use crate::source::{CategoryId, ItemSource, load_or_empty};

/// Load a category off the UI thread and post the result as
/// [`AppEvent::ItemsLoaded`]. Failures arrive as an empty category.
pub fn spawn_load(
    source: Arc<dyn ItemSource>,
    id: CategoryId,
    generation: u64,
    tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let category = load_or_empty(source.as_ref(), &id);
        if tx
            .send(AppEvent::ItemsLoaded {
                generation,
                category,
            })
            .is_err()
        {
            log::debug!("event loop gone before {id} finished loading");
        }
    });
}
