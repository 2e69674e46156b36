//! The `{status, data, meta, errors}` envelope every route in §6 returns.

use serde::Serialize;
use serde_json::{json, Value};

pub fn success<T: Serialize>(data: T) -> Value {
    json!({ "status": "success", "data": data })
}

pub fn success_with_meta<T: Serialize, M: Serialize>(data: T, meta: M) -> Value {
    json!({ "status": "success", "data": data, "meta": meta })
}
