//! JSON document read/write shared by both store shapes.

use super::{MalformedPolicy, StoreError, StoreResult};
use crate::repo::kv_repo::{KeyValueRepository, RepoResult};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

const QUARANTINE_SUFFIX: &str = ".malformed";

/// Key of quarantine slot `slot` for `key`: `<key>.malformed`, then
/// `<key>.malformed.1`, `<key>.malformed.2`, ...
fn quarantine_key(key: &str, slot: u32) -> String {
    if slot == 0 {
        format!("{key}{QUARANTINE_SUFFIX}")
    } else {
        format!("{key}{QUARANTINE_SUFFIX}.{slot}")
    }
}

/// Preserves `raw` in the first free quarantine slot of `key`.
///
/// A value already held by some slot is not written again. Returns the slot
/// key holding `raw` and whether this call wrote it.
fn quarantine<R: KeyValueRepository>(
    repo: &R,
    key: &str,
    raw: &str,
) -> RepoResult<(String, bool)> {
    let mut slot = 0;
    loop {
        let backup_key = quarantine_key(key, slot);
        match repo.get_value(&backup_key)? {
            None => {
                repo.put_value(&backup_key, raw)?;
                return Ok((backup_key, true));
            }
            Some(existing) if existing == raw => return Ok((backup_key, false)),
            Some(_) => slot += 1,
        }
    }
}

/// Reads and decodes the document stored under `key`.
///
/// `validate` runs on a decoded document and may reject it as malformed.
/// Returns `Ok(None)` when nothing is stored, or when the document is
/// malformed under `MalformedPolicy::FailSafe`.
pub(crate) fn read_document<T, R>(
    repo: &R,
    key: &'static str,
    policy: MalformedPolicy,
    validate: impl FnOnce(&T) -> Result<(), String>,
) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    R: KeyValueRepository,
{
    let started_at = Instant::now();
    let Some(raw) = repo.get_value(key)? else {
        info!("event=store_load module=store status=ok key={key} state=absent");
        return Ok(None);
    };

    let decoded = serde_json::from_str::<T>(&raw)
        .map_err(|err| err.to_string())
        .and_then(|document| validate(&document).map(|()| document));

    match decoded {
        Ok(document) => {
            info!(
                "event=store_load module=store status=ok key={} state=present bytes={} duration_ms={}",
                key,
                raw.len(),
                started_at.elapsed().as_millis()
            );
            Ok(Some(document))
        }
        Err(_) if policy == MalformedPolicy::FailSafe => {
            let (backup_key, written) = quarantine(repo, key, &raw)?;
            // Decoder messages can quote stored text, so only metadata is logged.
            error!(
                "event=store_load module=store status=error key={} error_code=malformed_stored_data bytes={} quarantined_to={} written={}",
                key,
                raw.len(),
                backup_key,
                written
            );
            Ok(None)
        }
        Err(message) => Err(StoreError::MalformedStoredData { key, message }),
    }
}

/// Encodes `document` as JSON and overwrites the value under `key`.
pub(crate) fn write_document<T, R>(repo: &R, key: &'static str, document: &T) -> StoreResult<()>
where
    T: Serialize,
    R: KeyValueRepository,
{
    let encoded = serde_json::to_string(document).map_err(StoreError::Serialize)?;
    repo.put_value(key, &encoded)?;
    Ok(())
}
