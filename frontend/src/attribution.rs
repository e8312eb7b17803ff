//! Marketing attribution carried from the funnel entry to the checkout link.
//!
//! The record is captured once when a visitor lands with campaign parameters
//! and is only ever bulk-read afterwards. Every operation here is best
//! effort: a broken record or checkout URL degrades to "no attribution",
//! never to a blocked purchase.

use std::collections::BTreeMap;

use log::{error, info, warn};
use thiserror::Error;
use url::Url;
use web_sys::window;

use crate::storage::{KeyValueStore, ATTRIBUTION_KEY};

/// Parameter name to value, as captured at funnel entry.
pub type AttributionSet = BTreeMap<String, String>;

const TRACKED_PARAMS: [&str; 5] = ["fbclid", "gclid", "src", "sck", "xcod"];

#[derive(Debug, Error)]
pub enum AttributionError {
    #[error("invalid checkout url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("stored attribution record is not a string map: {0}")]
    Corrupt(#[from] serde_json::Error),
}

fn is_tracked(key: &str) -> bool {
    key.starts_with("utm_") || TRACKED_PARAMS.contains(&key)
}

fn parse_record(raw: &str) -> Result<AttributionSet, AttributionError> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads the stored record. Absent or corrupt records read as empty.
pub fn load_attribution(store: &dyn KeyValueStore) -> AttributionSet {
    let Some(raw) = store.get(ATTRIBUTION_KEY) else {
        return AttributionSet::new();
    };
    parse_record(&raw).unwrap_or_else(|e| {
        error!("Failed to read attribution: {}", e);
        AttributionSet::new()
    })
}

/// Picks the attribution parameters out of a landing page query string.
pub fn attribution_from_query(query: &str) -> AttributionSet {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .filter(|(key, value)| is_tracked(key) && !value.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Persists the landing page's attribution unless a record already exists.
/// Returns whether anything was written.
pub fn capture_attribution(store: &dyn KeyValueStore, query: &str) -> bool {
    let captured = attribution_from_query(query);
    if captured.is_empty() {
        return false;
    }
    if !load_attribution(store).is_empty() {
        info!("Attribution already captured, ignoring {} new params", captured.len());
        return false;
    }
    match serde_json::to_string(&captured) {
        Ok(json) => {
            store.set(ATTRIBUTION_KEY, &json);
            info!("Captured attribution: {:?}", captured);
            true
        }
        Err(e) => {
            error!("Failed to serialize attribution: {}", e);
            false
        }
    }
}

/// The `path?query` the current page should show, or `None` when the URL
/// must stay as it is: the page already has a query string or there is
/// nothing to add.
pub fn reapplied_path(path: &str, current_search: &str, attribution: &AttributionSet) -> Option<String> {
    if !current_search.is_empty() || attribution.is_empty() {
        return None;
    }
    let query = attribution
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    Some(format!("{}?{}", path, query))
}

/// Rewrites the address bar (no navigation) to carry the attribution when
/// the page was reached without a query string.
pub fn reapply_to_current_url(attribution: &AttributionSet) {
    let Some(window) = window() else {
        return;
    };
    let location = window.location();
    let (Ok(path), Ok(search)) = (location.pathname(), location.search()) else {
        warn!("Could not read current location, leaving URL untouched");
        return;
    };
    let Some(target) = reapplied_path(&path, &search, attribution) else {
        return;
    };
    let replaced = window
        .history()
        .and_then(|history| history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(target.as_str())));
    match replaced {
        Ok(()) => info!("Attribution re-applied to page URL"),
        Err(e) => error!("Failed to re-apply attribution to URL: {:?}", e),
    }
}

/// Sets every attribution pair on `base`'s query, overwriting parameters
/// with the same name in place and appending the rest. Other parameters
/// keep their position and value.
pub fn merge_into_outbound_url(base: &str, attribution: &AttributionSet) -> Result<String, AttributionError> {
    if attribution.is_empty() {
        return Ok(base.to_string());
    }
    let mut url = Url::parse(base).map_err(|source| AttributionError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;

    let mut merged: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs() {
        match attribution.get(key.as_ref()) {
            Some(_) if merged.iter().any(|(k, _)| *k == key) => {}
            Some(replacement) => merged.push((key.into_owned(), replacement.clone())),
            None => merged.push((key.into_owned(), value.into_owned())),
        }
    }
    for (key, value) in attribution {
        if !merged.iter().any(|(k, _)| k == key) {
            merged.push((key.clone(), value.clone()));
        }
    }

    url.query_pairs_mut().clear().extend_pairs(merged.iter());
    Ok(url.to_string())
}

/// The checkout link to open. Falls back to `base` untouched when the merge
/// fails.
pub fn outbound_url(base: &str, attribution: &AttributionSet) -> String {
    match merge_into_outbound_url(base, attribution) {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to attach attribution to checkout link: {}", e);
            base.to_string()
        }
    }
}
