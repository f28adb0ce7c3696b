//! 空值裁剪
//!
//! 服务端会拒绝部分字段的默认值（空字符串、空列表等），提交前需要递归移除。
//! 以下取值视为"空"：`null`、`false`、数值 0、空字符串、空数组、空对象。
//! 嵌套结构先裁剪，裁剪后变空的同样被移除。

use serde_json::{Map, Value};

/// 判断取值是否为空
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// 递归移除对象和数组中的空值
///
/// 标量原样返回；空值只会在其父节点中被移除。
pub fn strip_empty(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, v) in map {
                let stripped = strip_empty(v);
                if !is_falsy(&stripped) {
                    out.insert(key.clone(), stripped);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(strip_empty)
                .filter(|v| !is_falsy(v))
                .collect(),
        ),
        other => other.clone(),
    }
}
