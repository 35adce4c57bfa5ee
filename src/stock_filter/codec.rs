//! # URL Filter Codec
//!
//! The selection lives in a single query parameter, `filter_stock_status`,
//! holding a comma-separated list of status keys. This module converts between
//! that parameter and a [`SelectionSet`].
//!
//! ## Bit-exact preservation
//!
//! Only the stock parameter is ever rewritten. The URL is split into its base
//! (everything before `?`), the raw `&`-separated query segments and the
//! fragment; untouched segments are written back exactly as they were read,
//! including their original percent-encoding.
//!
//! ## Canonical form
//!
//! An empty selection is represented by the *absence* of the parameter, never
//! by `filter_stock_status=`. Removing the last parameter also drops the `?`.
//!
//! ```rust
//! use stock_filter::codec::{decode, encode};
//! use stock_filter::model::SelectionSet;
//!
//! let url = "/shop/?filter_stock_status=instock&orderby=price";
//! let mut selection = decode(url);
//! selection.insert("outofstock");
//!
//! assert_eq!(
//!     encode(&selection, url),
//!     "/shop/?filter_stock_status=instock%2Coutofstock&orderby=price"
//! );
//! assert_eq!(encode(&SelectionSet::new(), "/shop/?filter_stock_status=instock"), "/shop/");
//! ```

use crate::model::SelectionSet;
use std::fmt;

/// Query parameter carrying the selected stock statuses.
pub const STOCK_STATUS_QUERY_VAR: &str = "filter_stock_status";

/// A URL split into the parts the codec rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    base: String,
    segments: Vec<String>,
    fragment: Option<String>,
}

impl PageUrl {
    /// Splits `href` into base, query segments and fragment.
    ///
    /// Never fails: anything before the first `?` is the base. Segments are
    /// kept verbatim, empty ones (`a=1&&b=2`, a bare trailing `?`) included;
    /// they carry no parameter and are skipped by every lookup.
    pub fn parse(href: &str) -> Self {
        let (rest, fragment) = match href.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (href, None),
        };

        let (base, segments) = match rest.split_once('?') {
            Some((base, query)) => (
                base,
                query.split('&').map(str::to_string).collect(),
            ),
            None => (rest, Vec::new()),
        };

        Self {
            base: base.to_string(),
            segments,
            fragment,
        }
    }

    /// Decoded value of the first occurrence of `name`.
    ///
    /// Returns `None` when the parameter is absent or its value is not valid
    /// percent-encoded UTF-8.
    pub fn param(&self, name: &str) -> Option<String> {
        self.segments
            .iter()
            .find(|segment| segment_has_key(segment, name))
            .and_then(|segment| decode_component(segment_value(segment)))
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.segments.iter().any(|s| segment_has_key(s, name))
    }

    /// Sets `name` to an already-encoded value.
    ///
    /// The first occurrence is replaced in place and later duplicates are
    /// dropped. If the parameter is absent it is appended, taking the place of
    /// a trailing empty segment when there is one.
    pub fn set_param_raw(&mut self, name: &str, encoded_value: &str) {
        let replacement = format!("{}={}", urlencoding::encode(name), encoded_value);
        let mut replaced = false;
        self.segments.retain_mut(|segment| {
            if !segment_has_key(segment, name) {
                return true;
            }
            if replaced {
                return false;
            }
            *segment = replacement.clone();
            replaced = true;
            true
        });
        if replaced {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.is_empty() => *last = replacement,
            _ => self.segments.push(replacement),
        }
    }

    /// Removes every occurrence of `name`.
    ///
    /// When that leaves no parameter at all, the `?` goes too.
    pub fn remove_param(&mut self, name: &str) {
        let before = self.segments.len();
        self.segments.retain(|segment| !segment_has_key(segment, name));
        if self.segments.len() != before && self.segments.iter().all(|s| s.is_empty()) {
            self.segments.clear();
        }
    }

    /// All query parameters, decoded, in URL order.
    ///
    /// Segments that fail to decode are skipped.
    pub fn query_params(&self) -> QueryParams {
        let pairs = self
            .segments
            .iter()
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| {
                let (key, value) = segment.split_once('=').unwrap_or((segment.as_str(), ""));
                Some((decode_component(key)?, decode_component(value)?))
            })
            .collect();
        QueryParams { pairs }
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if !self.segments.is_empty() {
            write!(f, "?{}", self.segments.join("&"))?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

/// Decoded query parameters in URL order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Value of the first occurrence of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parameter names in URL order, without duplicates.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for (k, _) in &self.pairs {
            if !keys.contains(k) {
                keys.push(k.clone());
            }
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Returns `current_url` with the stock parameter set to `selection`, or
/// without it when the selection is empty.
pub fn encode(selection: &SelectionSet, current_url: &str) -> String {
    let mut url = PageUrl::parse(current_url);
    if selection.is_empty() {
        url.remove_param(STOCK_STATUS_QUERY_VAR);
    } else {
        url.set_param_raw(STOCK_STATUS_QUERY_VAR, &urlencoding::encode(&selection.join()));
    }
    url.to_string()
}

/// Reads the selection from the stock parameter of `current_url`.
///
/// A missing, blank or undecodable parameter is the empty selection.
pub fn decode(current_url: &str) -> SelectionSet {
    let url = PageUrl::parse(current_url);
    if url.has_param(STOCK_STATUS_QUERY_VAR) && url.param(STOCK_STATUS_QUERY_VAR).is_none() {
        tracing::debug!(url = current_url, "ignoring undecodable stock filter value");
    }
    url.param(STOCK_STATUS_QUERY_VAR)
        .map(|value| parse_selection(&value))
        .unwrap_or_default()
}

/// Splits an already-decoded parameter value into a selection.
///
/// Tokens are trimmed; empty tokens are dropped; repeats keep their first
/// position.
pub fn parse_selection(value: &str) -> SelectionSet {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

fn segment_key(segment: &str) -> &str {
    segment.split_once('=').map(|(k, _)| k).unwrap_or(segment)
}

fn segment_value(segment: &str) -> &str {
    segment.split_once('=').map(|(_, v)| v).unwrap_or("")
}

fn segment_has_key(segment: &str, name: &str) -> bool {
    let key = segment_key(segment);
    key == name || decode_component(key).as_deref() == Some(name)
}

/// Decodes one `application/x-www-form-urlencoded` component.
fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> SelectionSet {
        keys.iter().copied().collect()
    }

    #[test]
    fn test_encode_adds_param_to_bare_url() {
        assert_eq!(
            encode(&set(&["outofstock"]), "/shop/"),
            "/shop/?filter_stock_status=outofstock"
        );
    }

    #[test]
    fn test_encode_replaces_in_place_and_encodes_commas() {
        assert_eq!(
            encode(
                &set(&["instock", "outofstock"]),
                "/shop/?filter_stock_status=instock&orderby=price"
            ),
            "/shop/?filter_stock_status=instock%2Coutofstock&orderby=price"
        );
    }

    #[test]
    fn test_encode_appends_after_other_params() {
        assert_eq!(
            encode(&set(&["instock"]), "/shop/?orderby=price"),
            "/shop/?orderby=price&filter_stock_status=instock"
        );
    }

    #[test]
    fn test_encode_empty_removes_param_and_question_mark() {
        assert_eq!(
            encode(&SelectionSet::new(), "/shop/?filter_stock_status=outofstock"),
            "/shop/"
        );
    }

    #[test]
    fn test_encode_empty_keeps_other_params() {
        assert_eq!(
            encode(
                &SelectionSet::new(),
                "/shop/?orderby=price&filter_stock_status=outofstock&paged=2"
            ),
            "/shop/?orderby=price&paged=2"
        );
    }

    #[test]
    fn test_encode_drops_duplicate_params() {
        assert_eq!(
            encode(
                &set(&["onbackorder"]),
                "/shop/?filter_stock_status=instock&a=1&filter_stock_status=outofstock"
            ),
            "/shop/?filter_stock_status=onbackorder&a=1"
        );
    }

    #[test]
    fn test_encode_preserves_fragment_and_foreign_encoding() {
        let url = "https://store.test/shop/?q=blue+shirt%21&tag=a%2Cb#results";
        assert_eq!(
            encode(&set(&["instock"]), url),
            "https://store.test/shop/?q=blue+shirt%21&tag=a%2Cb&filter_stock_status=instock#results"
        );
    }

    #[test]
    fn test_encode_keeps_empty_segments() {
        assert_eq!(
            encode(&set(&["instock"]), "/shop/?a=1&&b=2"),
            "/shop/?a=1&&b=2&filter_stock_status=instock"
        );
        assert_eq!(
            encode(&SelectionSet::new(), "/shop/?a=1&&filter_stock_status=x&b=2"),
            "/shop/?a=1&&b=2"
        );
        assert_eq!(encode(&SelectionSet::new(), "/shop/?"), "/shop/?");
    }

    #[test]
    fn test_encode_fills_bare_question_mark() {
        assert_eq!(
            encode(&set(&["instock"]), "/shop/?"),
            "/shop/?filter_stock_status=instock"
        );
        assert_eq!(
            encode(&set(&["instock"]), "/shop/?a=1&#top"),
            "/shop/?a=1&filter_stock_status=instock#top"
        );
    }

    #[test]
    fn test_encode_never_leaves_blank_param() {
        let mut selection = SelectionSet::new();
        selection.insert("");
        selection.insert("  ");
        assert_eq!(encode(&selection, "/shop/"), "/shop/");
        assert_eq!(encode(&selection, "/shop/?filter_stock_status=instock"), "/shop/");
    }

    #[test]
    fn test_round_trip_comma_key() {
        let selection = set(&["a,b", "c"]);
        let encoded = encode(&selection, "/shop/");
        assert_eq!(encoded, "/shop/?filter_stock_status=a%2Cb%2Cc");
        assert_eq!(decode(&encoded), selection);
    }

    #[test]
    fn test_encode_is_idempotent() {
        let urls = [
            "/shop/",
            "/shop/?filter_stock_status=instock,outofstock",
            "/shop/?orderby=price&filter_stock_status=x#top",
        ];
        for url in urls {
            for selection in [set(&[]), set(&["instock"]), set(&["onbackorder", "instock"])] {
                let once = encode(&selection, url);
                assert_eq!(encode(&selection, &once), once, "url {url}");
            }
        }
    }

    #[test]
    fn test_round_trip() {
        let urls = ["/shop/", "/shop/?orderby=price", "/?filter_stock_status=zzz#f"];
        for url in urls {
            for selection in [set(&[]), set(&["instock"]), set(&["outofstock", "instock"])] {
                let decoded = decode(&encode(&selection, url));
                assert!(decoded.same_members(&selection), "url {url}");
            }
        }
    }

    #[test]
    fn test_decode_missing_param_is_empty() {
        assert!(decode("/shop/?orderby=price").is_empty());
        assert!(decode("/shop/").is_empty());
    }

    #[test]
    fn test_decode_keeps_order() {
        let selection = decode("/shop/?filter_stock_status=outofstock%2Cinstock");
        assert_eq!(selection.join(), "outofstock,instock");
    }

    #[test]
    fn test_decode_unencoded_commas() {
        let selection = decode("/shop/?filter_stock_status=instock,outofstock");
        assert_eq!(selection.join(), "instock,outofstock");
    }

    #[test]
    fn test_decode_trailing_comma() {
        assert_eq!(decode("/?filter_stock_status=instock,").join(), "instock");
    }

    #[test]
    fn test_decode_whitespace_only_is_empty() {
        assert!(decode("/?filter_stock_status=%20%20").is_empty());
        assert!(decode("/?filter_stock_status=+").is_empty());
        assert!(decode("/?filter_stock_status=").is_empty());
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        assert!(decode("/?filter_stock_status=%FF%FE").is_empty());
    }

    #[test]
    fn test_decode_ignores_fragment() {
        assert_eq!(
            decode("/?filter_stock_status=instock#filter_stock_status=outofstock").join(),
            "instock"
        );
    }

    #[test]
    fn test_decode_preserves_unknown_keys() {
        assert_eq!(
            decode("/?filter_stock_status=unknownkey,instock").join(),
            "unknownkey,instock"
        );
    }

    #[test]
    fn test_page_url_display_round_trip() {
        let href = "https://store.test/shop/?a=1&b=%20#frag";
        assert_eq!(PageUrl::parse(href).to_string(), href);
    }

    #[test]
    fn test_query_params() {
        let params =
            PageUrl::parse("/?a=1&filter_stock_status=instock%2Conbackorder&a=2").query_params();
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get(STOCK_STATUS_QUERY_VAR), Some("instock,onbackorder"));
        assert_eq!(params.keys(), vec!["a", STOCK_STATUS_QUERY_VAR]);
    }

    #[test]
    fn test_parse_selection_trims_tokens() {
        assert_eq!(
            parse_selection(" instock , outofstock,,").join(),
            "instock,outofstock"
        );
    }
}
