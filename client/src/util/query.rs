//! Query-string encoding helpers.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

/// Encode `pairs` as `k=v&k2=v2`, percent-encoding keys and values.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append encoded `pairs` to `url`, respecting an existing `?`.
pub fn append_query(url: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url.to_owned();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{}", encode_query(pairs))
}

/// Parse `?a=1&b=x%20y` into decoded pairs. `+` decodes to a space; pairs
/// that fail to decode keep their raw text.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), |decoded| decoded.into_owned())
}
