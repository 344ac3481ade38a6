//! JSON and canonical JSON renderings of frozen trees.

use base64::Engine;
use canonical_json::to_string;
use serde_json::{json, Value as Json};

use crate::errors::FreezeError;
use crate::frozen::Frozen;
use crate::value::Leaf;

impl Frozen {
    /// JSON rendering of the frozen tree.
    ///
    /// Tuples become arrays and item sequences become `{"items": [...]}`.
    /// Bytes and floats are wrapped (`{"bytes": b64}`, `{"f64": hex bits}`)
    /// so that rendering never loses information or produces non-finite
    /// numbers. Opaque references render as `{"opaque": text}`.
    pub fn to_json(&self) -> Json {
        match self {
            Frozen::Leaf(leaf) => leaf_json(leaf),
            Frozen::Opaque(reference) => json!({ "opaque": reference.text() }),
            Frozen::Tuple(children) => Json::Array(children.iter().map(Frozen::to_json).collect()),
            Frozen::Items(entries) => {
                json!({ "items": entries.iter().map(Frozen::to_json).collect::<Vec<_>>() })
            }
        }
    }

    /// RFC 8785 canonical JSON text of [`Frozen::to_json`].
    pub fn to_canonical_json(&self) -> Result<String, FreezeError> {
        to_string(&self.to_json()).map_err(|err| FreezeError::CanonicalJson(err.to_string()))
    }
}

fn leaf_json(leaf: &Leaf) -> Json {
    match leaf {
        Leaf::None => Json::Null,
        Leaf::Bool(b) => Json::Bool(*b),
        Leaf::Int(i) => Json::from(*i),
        Leaf::Float(f) => json!({ "f64": format!("{:016x}", f.0.to_bits()) }),
        Leaf::Str(s) => Json::String(s.clone()),
        Leaf::Bytes(bytes) => {
            json!({ "bytes": base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes) })
        }
    }
}
