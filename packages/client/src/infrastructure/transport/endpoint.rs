//! Room endpoint URL construction.

use crate::domain::RoomName;

/// Split a page origin such as `https://chat.example.com` into host and security.
///
/// The socket scheme mirrors the page scheme: an `https` origin yields a secure
/// socket. An origin without a scheme is treated as plain `http`.
pub fn split_origin(origin: &str) -> (String, bool) {
    let origin = origin.trim().trim_end_matches('/');
    if let Some(host) = origin.strip_prefix("https://") {
        (host.to_string(), true)
    } else if let Some(host) = origin.strip_prefix("http://") {
        (host.to_string(), false)
    } else {
        (origin.to_string(), false)
    }
}

/// WebSocket URL of a room: `{ws|wss}://{host}/ws/chat/{encoded room}/`.
pub fn room_endpoint(host: &str, secure: bool, room: &RoomName) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!(
        "{}://{}/ws/chat/{}/",
        scheme,
        host,
        encode_component(room.as_str())
    )
}

/// Marks left unescaped by browsers' `encodeURIComponent`.
const UNESCAPED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode a path component the way a browser client does.
fn encode_component(raw: &str) -> String {
    UNESCAPED_MARKS
        .iter()
        .fold(urlencoding::encode(raw).into_owned(), |encoded, (escaped, mark)| {
            encoded.replace(escaped, mark)
        })
}
