//! Request coalescing for comment point lookups.
//!
//! The first [`CommentLoader::load`] of a window opens a batch and schedules
//! a flush after the configured delay. Every lookup that arrives before the
//! flush joins that batch, so the whole window costs a single bulk query.
//! Returned rows are matched back to the requested ids by id; ids without a
//! row resolve to `None`. Nothing is cached past the flush.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::{Mutex, oneshot};

use crate::error::AppError;

use super::{Comment, store::CommentStore};

type Slot = oneshot::Sender<Result<Option<Comment>, AppError>>;

#[derive(Default)]
struct Batch {
    slots: HashMap<i32, Vec<Slot>>,
}

pub struct CommentLoader {
    store: Arc<dyn CommentStore>,
    delay: Duration,
    pending: Arc<Mutex<Option<Batch>>>,
}

impl CommentLoader {
    pub fn new(store: Arc<dyn CommentStore>, delay: Duration) -> Self {
        CommentLoader {
            store,
            delay,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn load(&self, id: i32) -> Result<Option<Comment>, AppError> {
        let (tx, rx) = oneshot::channel();

        {
            let mut pending = self.pending.lock().await;
            let batch = pending.get_or_insert_with(|| {
                self.schedule_flush();
                Batch::default()
            });
            batch.slots.entry(id).or_default().push(tx);
        }

        rx.await
            .map_err(|_| AppError::from("Comment batch was dropped before it was dispatched"))?
    }

    fn schedule_flush(&self) {
        let store = self.store.clone();
        let pending = self.pending.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let batch = pending.lock().await.take();
            if let Some(batch) = batch {
                dispatch(store.as_ref(), batch).await;
            }
        });
    }
}

async fn dispatch(store: &dyn CommentStore, batch: Batch) {
    let mut ids: Vec<i32> = batch.slots.keys().copied().collect();
    ids.sort_unstable();

    match store.find_by_ids(&ids).await {
        Ok(rows) => {
            let mut found: HashMap<i32, Comment> = rows.into_iter().map(|c| (c.id, c)).collect();
            tracing::debug!(
                batch_size = ids.len(),
                hits = found.len(),
                "Dispatched comment batch"
            );

            for (id, slots) in batch.slots {
                let comment = found.remove(&id);
                for slot in slots {
                    // the requester may have gone away, that's fine
                    let _ = slot.send(Ok(comment.clone()));
                }
            }
        }
        Err(e) => {
            let err = AppError::from(e);
            for slot in batch.slots.into_values().flatten() {
                let _ = slot.send(Err(err.clone()));
            }
        }
    }
}
