//! Query string and body decoding.
//!
//! Decoding never fails: input that cannot be turned into a mapping becomes
//! an empty mapping. Form values are JSON strings. A bracketed key builds
//! nested values: `tags[]=a&tags[]=b` gives `{"tags": ["a", "b"]}` and
//! `user[name]=x` gives `{"user": {"name": "x"}}`.

use std::io;

use bytes::Bytes;
use futures::executor::block_on;
use futures::stream;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Decodes a URL-encoded query string. Repeated plain keys keep the last
/// value; repeated `key[]` entries are collected into an array.
#[must_use]
pub fn decode_query(query: Option<&str>) -> Map<String, Value> {
    match query {
        Some(query) if !query.is_empty() => decode_urlencoded(query.as_bytes()),
        _ => Map::new(),
    }
}

/// Decodes a request body according to its `Content-Type` header.
///
/// - `application/x-www-form-urlencoded` is decoded as form pairs
/// - `multipart/form-data` contributes its text fields; file parts are skipped
/// - `application/json` (and `+json` media types) must hold a JSON object
/// - anything else yields an empty mapping
#[must_use]
pub fn decode_body(headers: &HeaderMap, body: &[u8]) -> Map<String, Value> {
    if body.is_empty() {
        return Map::new();
    }

    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        debug!("request body without a usable content type ignored");
        return Map::new();
    };
    let Ok(media_type) = content_type.parse::<mime::Mime>() else {
        debug!(content_type, "unparseable content type ignored");
        return Map::new();
    };

    let (kind, subtype) = (media_type.type_(), media_type.subtype());
    if kind == mime::APPLICATION && subtype == mime::WWW_FORM_URLENCODED {
        decode_urlencoded(body)
    } else if kind == mime::MULTIPART && subtype == mime::FORM_DATA {
        decode_multipart(content_type, body)
    } else if kind == mime::APPLICATION
        && (subtype == mime::JSON || media_type.suffix() == Some(mime::JSON))
    {
        decode_json_object(body)
    } else {
        debug!(content_type = %media_type, "unsupported body media type ignored");
        Map::new()
    }
}

fn decode_urlencoded(input: &[u8]) -> Map<String, Value> {
    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(input) {
        Ok(pairs) => {
            let mut fields = Map::new();
            for (key, value) in pairs {
                insert_field(&mut fields, &key, value);
            }
            fields
        }
        Err(err) => {
            debug!(error = %err, "malformed url-encoded input ignored");
            Map::new()
        }
    }
}

fn decode_multipart(content_type: &str, body: &[u8]) -> Map<String, Value> {
    let boundary = match multer::parse_boundary(content_type) {
        Ok(boundary) => boundary,
        Err(err) => {
            debug!(error = %err, "multipart body without a boundary ignored");
            return Map::new();
        }
    };

    let chunk = Bytes::copy_from_slice(body);
    let mut multipart = multer::Multipart::new(
        stream::iter(std::iter::once(Ok::<_, io::Error>(chunk))),
        boundary,
    );

    // The whole body is already buffered, so every future is ready at once.
    block_on(async move {
        let mut fields = Map::new();
        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => return fields,
                Err(err) => {
                    debug!(error = %err, "malformed multipart body ignored");
                    return Map::new();
                }
            };
            if field.file_name().is_some() {
                debug!(field = ?field.name(), "multipart file part skipped");
                continue;
            }
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.text().await {
                Ok(text) => insert_field(&mut fields, &name, text),
                Err(err) => {
                    debug!(error = %err, "malformed multipart body ignored");
                    return Map::new();
                }
            }
        }
    })
}

/// Inserts one form pair, expanding bracketed key segments.
fn insert_field(fields: &mut Map<String, Value>, key: &str, value: String) {
    let (base, segments) = split_key(key);
    let slot = fields.entry(base.to_string()).or_insert(Value::Null);
    insert_at(slot, &segments, Value::String(value));
}

/// Splits `a[b][]` into `("a", ["b", ""])`. Keys without a well-formed
/// bracket suffix are kept whole.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[').filter(|&open| open > 0) else {
        return (key, Vec::new());
    };

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return (key, Vec::new());
        };
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }

    if rest.is_empty() {
        (&key[..open], segments)
    } else {
        (key, Vec::new())
    }
}

fn insert_at(slot: &mut Value, segments: &[&str], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *slot = value;
        return;
    };

    if segment.is_empty() {
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            items.push(Value::Null);
            if let Some(last) = items.last_mut() {
                insert_at(last, rest, value);
            }
        }
    } else {
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            let child = map.entry((*segment).to_string()).or_insert(Value::Null);
            insert_at(child, rest, value);
        }
    }
}

fn decode_json_object(body: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            debug!("json body is not an object, ignored");
            Map::new()
        }
        Err(err) => {
            debug!(error = %err, "malformed json body ignored");
            Map::new()
        }
    }
}
