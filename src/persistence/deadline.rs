//! Persisted run deadline
//!
//! The deadline is the only source of truth for remaining time. Nothing
//! counts down locally; remaining is always `end_time - now`.

use super::Storage;

/// Storage key for the deadline
pub const DEADLINE_KEY: &str = "hatch_endTime";

/// Read the persisted deadline, if a run is in progress
///
/// Accepts the same shapes a decimal integer prefix parse would: leading
/// whitespace, optional sign, then digits. Anything else reads as absent.
pub fn load_deadline(storage: &dyn Storage) -> Option<f64> {
    let raw = storage.get_item(DEADLINE_KEY)?;
    match parse_epoch_ms(&raw) {
        Some(ms) => Some(ms),
        None => {
            log::warn!("Ignoring unreadable deadline {:?}", raw);
            None
        }
    }
}

/// Persist a new deadline (epoch ms)
pub fn save_deadline(storage: &dyn Storage, end_time: f64) {
    let value = format!("{}", end_time.round() as i64);
    if !storage.set_item(DEADLINE_KEY, &value) {
        log::warn!("Failed to persist deadline {}", value);
    }
}

/// Erase the deadline (run succeeded or was reset)
pub fn clear_deadline(storage: &dyn Storage) {
    storage.remove_item(DEADLINE_KEY);
}

fn parse_epoch_ms(raw: &str) -> Option<f64> {
    super::parse_int_prefix(raw).map(|ms| ms as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_deadline_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(load_deadline(&storage), None);

        save_deadline(&storage, 1_700_000_123_456.0);
        assert_eq!(storage.get_item(DEADLINE_KEY).as_deref(), Some("1700000123456"));
        assert_eq!(load_deadline(&storage), Some(1_700_000_123_456.0));

        clear_deadline(&storage);
        assert_eq!(load_deadline(&storage), None);
    }

    #[test]
    fn test_deadline_parses_integer_prefix() {
        assert_eq!(parse_epoch_ms("  42abc"), Some(42.0));
        assert_eq!(parse_epoch_ms("1700000000000.5"), Some(1_700_000_000_000.0));
        assert_eq!(parse_epoch_ms("-7"), Some(-7.0));
    }

    #[test]
    fn test_garbage_deadline_reads_as_absent() {
        let storage = MemoryStorage::new();
        storage.set_item(DEADLINE_KEY, "soon");
        assert_eq!(load_deadline(&storage), None);
        storage.set_item(DEADLINE_KEY, "");
        assert_eq!(load_deadline(&storage), None);
    }
}
