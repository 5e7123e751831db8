//! Filter state ↔ query string
//!
//! Facet values are component-encoded individually and joined with a literal
//! comma, so a value containing a comma (`Science, Health & Environment`)
//! survives the round trip as `%2C`.

use atlas_types::{Facet, FilterState};

const SEARCH_PARAM: &str = "search";

/// Serialize filter state as `group=..&platform=..&geography=..&topic=..&search=..`.
///
/// Empty facets are omitted; the empty state encodes to `""`.
pub fn encode(state: &FilterState) -> String {
    let mut params = Vec::new();

    for facet in Facet::ALL {
        let values = state.facet(facet);
        if values.is_empty() {
            continue;
        }
        let joined = values
            .iter()
            .map(|v| urlencoding::encode(v).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        params.push(format!("{}={}", facet.param(), joined));
    }

    if !state.search.is_empty() {
        params.push(format!(
            "{}={}",
            SEARCH_PARAM,
            urlencoding::encode(&state.search)
        ));
    }

    params.join("&")
}

/// Parse a query string back into filter state.
///
/// Tolerates a leading `?` and `+` for spaces. Unknown parameters, empty
/// pieces and repeated values are ignored.
pub fn decode(query: &str) -> FilterState {
    let mut state = FilterState::default();
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));

        if key == SEARCH_PARAM {
            state.search = decode_component(raw);
            continue;
        }

        let Ok(facet) = key.parse::<Facet>() else {
            continue;
        };
        // Only the exact parameter names are recognized, not the parse aliases
        if facet.param() != key {
            continue;
        }

        let values = state.facet_mut(facet);
        for piece in raw.split(',') {
            let value = decode_component(piece);
            if !value.is_empty() {
                values.insert(value);
            }
        }
    }

    state
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Address for the current state: `?{query}`, or the bare path when empty.
pub fn permalink_url(path: &str, state: &FilterState) -> String {
    let query = encode(state);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}
