use serde_json::Value;

/// Encodes one indexed field value as its stored lookup key.
///
/// Keys are type-tagged (`s:` string, `n:` number, `j:` other JSON) so `"1"`
/// and `1` never share a key. Integral floats collapse to integers so `4000`
/// and `4000.0` address the same key.
pub fn encode_index_key(value: &Value) -> String {
    match value {
        Value::String(text) => format!("s:{text}"),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return format!("n:{int}");
            }
            if let Some(uint) = number.as_u64() {
                return format!("n:{uint}");
            }
            match number.as_f64() {
                Some(float) if float.fract() == 0.0 && float.abs() < 9.0e15 => {
                    format!("n:{}", float as i64)
                }
                Some(float) => format!("n:{float}"),
                None => format!("n:{number}"),
            }
        }
        other => format!("j:{other}"),
    }
}
