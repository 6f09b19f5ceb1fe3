//! Credential pool parsing and per-request key selection.
//!
//! The credential header may carry several keys separated by ASCII or
//! full-width commas. One key is drawn uniformly at random for each request
//! and written back so the upstream only ever sees a single credential.
//! Nothing here outlives the request: there is no counter, seed or cache.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use rand::Rng;

/// Characters accepted between keys.
pub const KEY_DELIMITERS: [char; 2] = [',', '\u{FF0C}'];

/// The keys extracted from one credential header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPool<'a> {
    keys: Vec<&'a str>,
}

impl<'a> KeyPool<'a> {
    /// Split on either delimiter, trim each segment and drop empty ones.
    /// Duplicates are kept.
    pub fn parse(raw: &'a str) -> Self {
        let keys = raw
            .split(KEY_DELIMITERS)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[&'a str] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Pick one key with a uniform index over `[0, len)`.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'a str> {
        if self.keys.is_empty() {
            return None;
        }
        Some(self.keys[rng.gen_range(0..self.keys.len())])
    }
}

/// Outcome of a key rotation, safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySelection {
    pub pool_size: usize,
    pub key_suffix: String,
}

/// Last four characters of a key, or `****` when the key is too short to
/// reveal any part of it.
pub fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count > 4 {
        key.chars().skip(count - 4).collect()
    } else {
        "****".to_string()
    }
}

/// Replace the key pool in `header` with a single randomly chosen key.
pub fn rotate_key(headers: &mut HeaderMap, header: &HeaderName) -> Option<KeySelection> {
    rotate_key_with(headers, header, &mut rand::thread_rng())
}

/// [`rotate_key`] with an explicit random source.
///
/// Returns `None` and leaves the headers untouched when the header is
/// absent, not UTF-8, or parses to an empty pool.
pub fn rotate_key_with<R: Rng + ?Sized>(
    headers: &mut HeaderMap,
    header: &HeaderName,
    rng: &mut R,
) -> Option<KeySelection> {
    // Parsed from raw bytes: the full-width comma is not visible ASCII,
    // so `HeaderValue::to_str` would reject it.
    let raw = std::str::from_utf8(headers.get(header)?.as_bytes()).ok()?;
    let pool = KeyPool::parse(raw);
    let selected = pool.choose(rng)?;

    let value = HeaderValue::from_str(selected).ok()?;
    let selection = KeySelection {
        pool_size: pool.len(),
        key_suffix: mask_key(selected),
    };
    headers.insert(header.clone(), value);

    tracing::info!(
        pool_size = selection.pool_size,
        key_suffix = %selection.key_suffix,
        "Selected upstream key"
    );

    Some(selection)
}
