use futures::TryStreamExt;
use mongodb::bson::doc;

use crate::database::MongoDB;
use crate::models::{Candidate, StoredUser};

const USERS_COLLECTION: &str = "users";

#[derive(Debug, Default, PartialEq)]
pub struct UpsertStats {
    pub stored: usize,
    pub failed: usize,
}

/// Upserts candidates one at a time, keyed by username (last write wins). A
/// failed write is logged and skipped; the rest of the batch keeps going.
pub async fn upsert_all(db: &MongoDB, candidates: &[Candidate]) -> UpsertStats {
    let collection = db.collection::<StoredUser>(USERS_COLLECTION);
    let mut stats = UpsertStats::default();

    for candidate in candidates {
        let filter = doc! { "username": &candidate.login };
        let update = doc! {
            "$set": {
                "avatar_url": &candidate.avatar_url,
                "html_url": &candidate.html_url,
                "repositories_count": candidate.repositories_count,
            }
        };

        match collection.update_one(filter, update).upsert(true).await {
            Ok(_) => stats.stored += 1,
            Err(e) => {
                log::error!("❌ Failed to store user {}: {}", candidate.login, e);
                stats.failed += 1;
            }
        }
    }

    log::info!(
        "💾 Users stored in the database: {} ok, {} failed",
        stats.stored,
        stats.failed
    );

    stats
}

/// Returns every stored user, unfiltered and unpaginated.
pub async fn list_all(db: &MongoDB) -> Result<Vec<StoredUser>, String> {
    let collection = db.collection::<StoredUser>(USERS_COLLECTION);

    let cursor = collection
        .find(doc! {})
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    cursor
        .try_collect()
        .await
        .map_err(|e| format!("Database error: {}", e))
}
