//! In-process key-value backend.
//!
//! Mirrors the Redis semantics the store relies on (list index rules, empty
//! lists disappearing, lazy key expiry) so tests and single-process setups
//! behave like production.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use super::{KvBackend, KvOp};
use crate::error::{Result, StoreError};

/// Value held under a key.
#[derive(Debug, Clone)]
enum Value {
    List(VecDeque<String>),
    Hash(HashMap<String, String>),
}

impl Value {
    fn is_empty(&self) -> bool {
        match self {
            Value::List(list) => list.is_empty(),
            Value::Hash(hash) => hash.is_empty(),
        }
    }
}

/// A stored value plus its expiry deadline.
#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Key-value backend kept in process memory.
///
/// Every command takes the same lock, so an atomic batch is simply a batch
/// applied while holding it.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots
            .lock()
            .values()
            .filter(|slot| !slot.is_expired(now))
            .count()
    }

    /// Whether no live keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` exists and has not expired.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.slots
            .lock()
            .get(key)
            .is_some_and(|slot| !slot.is_expired(now))
    }

    /// Remaining time before `key` expires, if it has a TTL.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let slots = self.slots.lock();
        let slot = slots.get(key).filter(|slot| !slot.is_expired(now))?;
        slot.expires_at.map(|deadline| deadline.saturating_duration_since(now))
    }

    fn apply(slots: &mut HashMap<String, Slot>, op: &KvOp) -> Result<u64> {
        purge_if_expired(slots, op.key());

        match op {
            KvOp::ListRemoveValue { key, value } => {
                let Some(list) = list_mut(slots, key)? else {
                    return Ok(0);
                };
                let before = list.len();
                list.retain(|item| item != value);
                let removed = (before - list.len()) as u64;
                drop_if_empty(slots, key);
                Ok(removed)
            }
            KvOp::ListPushFront { key, value } => {
                let slot = slots.entry(key.clone()).or_insert_with(|| Slot {
                    value: Value::List(VecDeque::new()),
                    expires_at: None,
                });
                match &mut slot.value {
                    Value::List(list) => {
                        list.push_front(value.clone());
                        Ok(list.len() as u64)
                    }
                    Value::Hash(_) => Err(wrong_type(key)),
                }
            }
            KvOp::ListTrim { key, start, stop } => {
                let Some(list) = list_mut(slots, key)? else {
                    return Ok(0);
                };
                match resolve_range(list.len(), *start, *stop) {
                    Some((from, to)) => {
                        list.truncate(to + 1);
                        list.drain(..from);
                    }
                    None => list.clear(),
                }
                drop_if_empty(slots, key);
                Ok(0)
            }
            KvOp::KeyExpire { key, ttl } => match slots.get_mut(key) {
                Some(slot) => {
                    slot.expires_at = Some(Instant::now() + *ttl);
                    Ok(1)
                }
                None => Ok(0),
            },
            KvOp::KeyDelete { key } => Ok(slots.remove(key).map_or(0, |_| 1)),
            KvOp::HashSetFields { key, fields } => {
                if fields.is_empty() {
                    return Ok(0);
                }
                let slot = slots.entry(key.clone()).or_insert_with(|| Slot {
                    value: Value::Hash(HashMap::new()),
                    expires_at: None,
                });
                match &mut slot.value {
                    Value::Hash(hash) => {
                        for (field, value) in fields {
                            hash.insert(field.clone(), value.clone());
                        }
                        Ok(0)
                    }
                    Value::List(_) => Err(wrong_type(key)),
                }
            }
        }
    }

    fn run(&self, op: KvOp) -> Result<u64> {
        trace!(key = %op.key(), "memory backend command");
        let mut slots = self.slots.lock();
        Self::apply(&mut slots, &op)
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_remove_value(&self, key: &str, value: &str) -> Result<u64> {
        self.run(KvOp::ListRemoveValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    async fn list_push_front(&self, key: &str, value: &str) -> Result<u64> {
        self.run(KvOp::ListPushFront {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> Result<()> {
        self.run(KvOp::ListTrim {
            key: key.to_string(),
            start,
            stop,
        })
        .map(|_| ())
    }

    async fn key_expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        self.run(KvOp::KeyExpire {
            key: key.to_string(),
            ttl,
        })
        .map(|n| n == 1)
    }

    async fn execute_atomically(&self, ops: Vec<KvOp>) -> Result<()> {
        let mut slots = self.slots.lock();
        // Apply to a scratch copy of the touched keys so a failing command
        // leaves nothing half-written, like a rejected MULTI/EXEC.
        let mut scratch: HashMap<String, Slot> = ops
            .iter()
            .filter_map(|op| {
                slots
                    .get(op.key())
                    .map(|slot| (op.key().to_string(), slot.clone()))
            })
            .collect();
        for op in &ops {
            Self::apply(&mut scratch, op)?;
        }
        let touched: BTreeSet<&str> = ops.iter().map(KvOp::key).collect();
        for key in touched {
            match scratch.remove(key) {
                Some(slot) => {
                    slots.insert(key.to_string(), slot);
                }
                None => {
                    slots.remove(key);
                }
            }
        }
        Ok(())
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let mut slots = self.slots.lock();
        purge_if_expired(&mut slots, key);
        let Some(list) = list_mut(&mut slots, key)? else {
            return Ok(Vec::new());
        };
        Ok(match resolve_range(list.len(), start, stop) {
            Some((from, to)) => list.range(from..=to).cloned().collect(),
            None => Vec::new(),
        })
    }

    async fn key_delete(&self, key: &str) -> Result<u64> {
        self.run(KvOp::KeyDelete {
            key: key.to_string(),
        })
    }

    async fn hash_set_fields(&self, key: &str, fields: &[(String, String)]) -> Result<()> {
        self.run(KvOp::HashSetFields {
            key: key.to_string(),
            fields: fields.to_vec(),
        })
        .map(|_| ())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut slots = self.slots.lock();
        purge_if_expired(&mut slots, key);
        match slots.get(key).map(|slot| &slot.value) {
            None => Ok(HashMap::new()),
            Some(Value::Hash(hash)) => Ok(hash.clone()),
            Some(Value::List(_)) => Err(wrong_type(key)),
        }
    }
}

fn purge_if_expired(slots: &mut HashMap<String, Slot>, key: &str) {
    let now = Instant::now();
    if slots.get(key).is_some_and(|slot| slot.is_expired(now)) {
        slots.remove(key);
    }
}

fn drop_if_empty(slots: &mut HashMap<String, Slot>, key: &str) {
    if slots.get(key).is_some_and(|slot| slot.value.is_empty()) {
        slots.remove(key);
    }
}

fn list_mut<'a>(
    slots: &'a mut HashMap<String, Slot>,
    key: &str,
) -> Result<Option<&'a mut VecDeque<String>>> {
    match slots.get_mut(key).map(|slot| &mut slot.value) {
        None => Ok(None),
        Some(Value::List(list)) => Ok(Some(list)),
        Some(Value::Hash(_)) => Err(wrong_type(key)),
    }
}

fn wrong_type(key: &str) -> StoreError {
    StoreError::backend(format!(
        "WRONGTYPE operation against key '{}' holding the wrong kind of value",
        key
    ))
}

/// Resolve Redis-style inclusive list bounds to concrete indexes.
///
/// Returns `None` when the range selects nothing.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    if len == 0 {
        return None;
    }
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}
