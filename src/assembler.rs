use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

use crate::bits::BitString;
use crate::error::{Error, Result};
use crate::sentence::Channel;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_GROUPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FragmentKey {
    group_id: u8,
    channel: Channel,
}

struct Slot {
    payload: String,
    fill_bits: u8,
}

struct FragmentGroup {
    slots: Vec<Option<Slot>>,
    last_updated: Instant,
    received: usize,
}

/// Reassembles multi-sentence AIS message groups.
///
/// Groups are keyed by `(group id, channel)`. Slots accept fragments in any
/// order; duplicates are ignored without refreshing the group's age. The
/// table is bounded by `max_groups`, evicting the group with the oldest
/// update first, and `sweep_expired` drops stale groups on demand — there
/// is no background timer.
pub struct FragmentAssembler {
    groups: HashMap<FragmentKey, FragmentGroup>,
    timeout: Duration,
    max_groups: usize,
}

impl Default for FragmentAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_MAX_GROUPS)
    }
}

impl FragmentAssembler {
    pub fn new(timeout: Duration, max_groups: usize) -> Self {
        Self {
            groups: HashMap::new(),
            timeout,
            max_groups,
        }
    }

    /// Record one fragment. Returns the reassembled bit stream once every
    /// slot of the group is filled, removing the group in the same call.
    pub fn offer(
        &mut self,
        fragment_index: u8,
        fragment_count: u8,
        group_id: Option<u8>,
        channel: Channel,
        payload: &str,
        fill_bits: u8,
    ) -> Result<Option<BitString>> {
        if fragment_count < 1 {
            return Err(Error::BadFragment("fragment count of 0".to_owned()));
        }
        if fragment_index < 1 || fragment_index > fragment_count {
            return Err(Error::BadFragment(format!(
                "fragment index {fragment_index} outside 1..={fragment_count}"
            )));
        }
        if fill_bits > 5 {
            return Err(Error::BadFragment(format!(
                "fill bits {fill_bits} outside 0..=5"
            )));
        }
        let Some(group_id) = group_id else {
            if fragment_count == 1 {
                // Single-fragment sentences carry no group id and need no
                // table entry.
                let mut bits = BitString::from_armored(payload)?;
                bits.truncate(bits.len().saturating_sub(usize::from(fill_bits)));
                return Ok(Some(bits));
            }
            return Err(Error::BadFragment(
                "multipart fragment without group id".to_owned(),
            ));
        };

        let key = FragmentKey { group_id, channel };
        if !self.groups.contains_key(&key) {
            self.groups.insert(
                key,
                FragmentGroup {
                    slots: (0..fragment_count).map(|_| None).collect(),
                    last_updated: Instant::now(),
                    received: 0,
                },
            );
            if self.groups.len() > self.max_groups {
                self.evict_oldest();
            }
        }

        // With a zero-capacity table the group we just inserted is already
        // gone again.
        let Some(group) = self.groups.get_mut(&key) else {
            return Ok(None);
        };
        if group.slots.len() != usize::from(fragment_count) {
            return Err(Error::BadFragment(format!(
                "fragment count {fragment_count} disagrees with group of {}",
                group.slots.len()
            )));
        }
        let slot = &mut group.slots[usize::from(fragment_index) - 1];
        if slot.is_none() {
            *slot = Some(Slot {
                payload: payload.to_owned(),
                fill_bits,
            });
            group.received += 1;
            group.last_updated = Instant::now();
        }

        if group.received == group.slots.len() {
            let group = self
                .groups
                .remove(&key)
                .expect("complete group still present");
            return Ok(Some(combine(&group.slots)?));
        }
        Ok(None)
    }

    /// Drop every group whose last update is older than the timeout.
    pub fn sweep_expired(&mut self) {
        let now = Instant::now();
        let before = self.groups.len();
        self.groups
            .retain(|_, group| now.duration_since(group.last_updated) <= self.timeout);
        if self.groups.len() < before {
            debug!("swept {} expired fragment groups", before - self.groups.len());
        }
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Lowering the bound below the current group count evicts the oldest
    /// groups immediately.
    pub fn set_max_groups(&mut self, max_groups: usize) {
        self.max_groups = max_groups;
        while self.groups.len() > self.max_groups {
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .groups
            .iter()
            .min_by_key(|(_, group)| group.last_updated)
            .map(|(key, _)| *key);
        if let Some(key) = oldest {
            self.groups.remove(&key);
            debug!(
                "evicted fragment group {}/{} to stay within {} groups",
                key.group_id, key.channel, self.max_groups
            );
        }
    }
}

// Concatenate slots in ascending order, trimming the final slot's fill
// bits. Callers guarantee every slot is filled.
fn combine(slots: &[Option<Slot>]) -> Result<BitString> {
    let mut combined = BitString::new();
    for (i, slot) in slots.iter().enumerate() {
        let slot = slot.as_ref().expect("all slots filled on completion");
        let mut fragment = BitString::from_armored(&slot.payload)?;
        if i == slots.len() - 1 {
            fragment.truncate(fragment.len().saturating_sub(usize::from(slot.fill_bits)));
        }
        combined.append_bits(&fragment);
    }
    Ok(combined)
}
