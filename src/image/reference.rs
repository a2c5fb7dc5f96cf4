// Image reference classifier.
//
// Pass-through for anything already mentioning `ipfs` or `base64`.
// Otherwise the first `<word>.jpg` token is treated as an IPFS hash and
// resolved against the gateway. Only `.jpg` is recognized; `.jpeg`,
// `.png` and friends fall through to an empty URL.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Public gateway used to resolve IPFS hashes extracted from image names.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// One or more ASCII word characters directly followed by a literal `.jpg`.
/// regex-lite's `\w` is ASCII-only, so `[A-Za-z0-9_]`.
static JPG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\.jpg").expect("static pattern compiles"));

/// How an image should be resolved by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Http,
    Ipfs,
    Base64,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Http => "http",
            ImageKind::Ipfs => "ipfs",
            ImageKind::Base64 => "base64",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified image: its kind plus the URL the client should load.
///
/// `url` is empty only when the input was absent or no `.jpg` token
/// could be found in a plain URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    #[serde(rename = "type")]
    pub kind: ImageKind,
    pub url: String,
}

impl ImageReference {
    fn empty() -> Self {
        Self {
            kind: ImageKind::Http,
            url: String::new(),
        }
    }

    /// True when there is nothing for the client to load.
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// Classify an image URL against the default public gateway.
pub fn classify(image_url: Option<&str>) -> ImageReference {
    classify_with_gateway(image_url, DEFAULT_IPFS_GATEWAY)
}

/// Classify an image URL, resolving extracted hashes against `gateway`.
///
/// Never fails: absent, empty or unrecognizable input yields an `http`
/// reference with an empty URL.
pub fn classify_with_gateway(image_url: Option<&str>, gateway: &str) -> ImageReference {
    let url = match image_url {
        Some(url) if !url.is_empty() => url,
        _ => return ImageReference::empty(),
    };

    if url.contains("ipfs") {
        return ImageReference {
            kind: ImageKind::Ipfs,
            url: url.to_string(),
        };
    }
    if url.contains("base64") {
        return ImageReference {
            kind: ImageKind::Base64,
            url: url.to_string(),
        };
    }

    match extract_jpg_hash(url) {
        Some(hash) => ImageReference {
            kind: ImageKind::Http,
            url: gateway_url(gateway, hash),
        },
        None => ImageReference::empty(),
    }
}

/// The word token in front of the first `.jpg` in `url`, if any.
pub fn extract_jpg_hash(url: &str) -> Option<&str> {
    JPG_NAME
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn gateway_url(gateway: &str, hash: &str) -> String {
    format!("{}/{}", gateway.trim_end_matches('/'), hash)
}
