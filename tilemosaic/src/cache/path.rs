//! Cache path construction and filename handling.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Extension appended to every cache file name.
const CACHE_EXTENSION: &str = ".png";

/// File name of a cached tile: the URL-safe base64 of the URL plus `.png`.
pub fn cache_file_name(url: &str) -> String {
    let mut name = URL_SAFE_NO_PAD.encode(url.as_bytes());
    name.push_str(CACHE_EXTENSION);
    name
}

/// Lowercased URL-safe base64 SHA-256 of the cache file name.
///
/// Only the first two characters are used, as shard directory names.
fn shard_digest(file_name: &str) -> String {
    let digest = Sha256::digest(file_name.as_bytes());
    URL_SAFE_NO_PAD.encode(digest).to_lowercase()
}

fn shard_components(file_name: &str) -> (String, String) {
    let digest = shard_digest(file_name);
    let mut chars = digest.chars();
    // A SHA-256 digest always encodes to 43 characters
    let first = chars.next().map(String::from).unwrap_or_default();
    let second = chars.next().map(String::from).unwrap_or_default();
    (first, second)
}

/// Get the two-level shard directory holding the entry for a URL.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use tilemosaic::cache::shard_directory;
///
/// let dir = shard_directory(
///     &PathBuf::from(".cache"),
///     "https://tile.openstreetmap.org/0/0/0.png",
/// );
/// assert_eq!(dir, PathBuf::from(".cache/z/b"));
/// ```
pub fn shard_directory(cache_dir: &Path, url: &str) -> PathBuf {
    let (first, second) = shard_components(&cache_file_name(url));
    cache_dir.join(first).join(second)
}

/// Construct the full path for a cached tile.
///
/// Creates a sharded path structure:
/// ```text
/// <cache_dir>/<hash[0]>/<hash[1]>/<base64url(url)>.png
/// ```
/// where `hash = lowercase(base64url(sha256(base64url(url) + ".png")))`.
/// The layout is stable across runs, so re-running against the same cache
/// directory hits previously downloaded tiles.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use tilemosaic::cache::cache_path;
///
/// let path = cache_path(
///     &PathBuf::from("/cache"),
///     "https://tile.openstreetmap.org/0/0/0.png",
/// );
/// assert_eq!(
///     path,
///     PathBuf::from("/cache/z/b/aHR0cHM6Ly90aWxlLm9wZW5zdHJlZXRtYXAub3JnLzAvMC8wLnBuZw.png")
/// );
/// ```
pub fn cache_path(cache_dir: &Path, url: &str) -> PathBuf {
    let file_name = cache_file_name(url);
    let (first, second) = shard_components(&file_name);
    cache_dir.join(first).join(second).join(file_name)
}
