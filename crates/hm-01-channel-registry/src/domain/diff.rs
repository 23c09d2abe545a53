//! Field-level diff between two channel states
//!
//! Produces an ordered list of JSON-pointer operations. Bookkeeping fields
//! (`updatedBy`, `createdAt`, `updatedAt`) are stripped before comparing:
//! the patch already records who and when.

use serde_json::{Map, Value};
use shared_types::entities::{Channel, PatchOp};

const IGNORED: [&str; 3] = ["updatedBy", "createdAt", "updatedAt"];

fn comparable(channel: Option<&Channel>) -> Value {
    let Some(channel) = channel else {
        return Value::Object(Map::new());
    };
    let mut value = serde_json::to_value(channel).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        for key in IGNORED {
            map.remove(key);
        }
    }
    value
}

/// Diff two channel states. `None` on the left means creation; every field
/// of the new state appears as an `add`.
#[must_use]
pub fn channel_diff(before: Option<&Channel>, after: &Channel) -> Vec<PatchOp> {
    let mut ops = Vec::new();
    diff_values("", &comparable(before), &comparable(Some(after)), &mut ops);
    ops
}

/// The single op recorded for a hard delete.
#[must_use]
pub fn removal() -> Vec<PatchOp> {
    vec![PatchOp::remove("")]
}

fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn diff_values(path: &str, before: &Value, after: &Value, ops: &mut Vec<PatchOp>) {
    match (before, after) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, old) in a {
                let child = format!("{path}/{}", escape(key));
                match b.get(key) {
                    Some(new) => diff_values(&child, old, new, ops),
                    None => ops.push(PatchOp::remove(child)),
                }
            }
            for (key, new) in b {
                if !a.contains_key(key) {
                    ops.push(PatchOp::add(format!("{path}/{}", escape(key)), new.clone()));
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            let shared = a.len().min(b.len());
            for i in 0..shared {
                diff_values(&format!("{path}/{i}"), &a[i], &b[i], ops);
            }
            for (i, new) in b.iter().enumerate().skip(shared) {
                ops.push(PatchOp::add(format!("{path}/{i}"), new.clone()));
            }
            // Remove from the tail so earlier indices stay valid.
            for i in (shared..a.len()).rev() {
                ops.push(PatchOp::remove(format!("{path}/{i}")));
            }
        }
        (a, b) if a != b => ops.push(PatchOp::replace(path, b.clone())),
        _ => {}
    }
}
