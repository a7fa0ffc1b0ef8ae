//! Client address resolution.

use std::net::IpAddr;

use axum::http::HeaderMap;

/// Resolves the originating client address.
///
/// Prefers the first entry of the forwarded-for chain in `header`, trimmed,
/// falling back to the direct peer address.
pub fn client_address(headers: &HeaderMap, header: &str, peer: Option<IpAddr>) -> Option<String> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|ip| ip.to_string()))
}
