//! Order-preserving key encodings for the feature trees.

use crate::types::{FeatureId, Priority};

pub(crate) const SCHEDULE_KEY_LEN: usize = 16;

/// Big-endian id key; lexicographic order matches numeric order.
pub(crate) fn id_key(id: FeatureId) -> [u8; 8] {
    id.to_be_bytes()
}

pub(crate) fn decode_id(bytes: &[u8]) -> Option<FeatureId> {
    let raw: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
    Some(FeatureId::from_be_bytes(raw))
}

/// `(priority, id)` key. The sign bit of the priority is flipped so that
/// negative priorities sort before positive ones byte-wise.
pub(crate) fn schedule_key(priority: Priority, id: FeatureId) -> [u8; SCHEDULE_KEY_LEN] {
    let mut key = [0u8; SCHEDULE_KEY_LEN];
    key[..8].copy_from_slice(&((priority as u64) ^ (1 << 63)).to_be_bytes());
    key[8..].copy_from_slice(&id.to_be_bytes());
    key
}

pub(crate) fn decode_schedule_key(bytes: &[u8]) -> Option<(Priority, FeatureId)> {
    if bytes.len() != SCHEDULE_KEY_LEN {
        return None;
    }
    let raw: [u8; 8] = bytes[..8].try_into().ok()?;
    let priority = (u64::from_be_bytes(raw) ^ (1 << 63)) as Priority;
    let id = decode_id(&bytes[8..])?;
    Some((priority, id))
}
