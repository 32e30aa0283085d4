//! Deep reads and writes addressed by a list of segments.
//!
//! A segment is a map key, a list index, or `*` for every item of a
//! container.

use crate::value::{Map, Value};

/// The segment matching every item of a container.
pub const WILDCARD: &str = "*";

/// Reads the value at `path`.
///
/// `None` means "absent", which is different from a present
/// [`Value::Null`]. A wildcard collects the remaining path of every item into
/// a list (missing items read as null); nested wildcards flatten one level.
///
/// # Examples
///
/// ```
/// use vc_mapper::normalizer::data_path;
/// use vc_mapper::value::Value;
///
/// let data: Value = serde_json::from_str(r#"{"a": {"b": [{"c": 1}, {"c": 2}]}}"#).unwrap();
///
/// assert_eq!(data_path::get(&data, &["a", "b", "1", "c"]), Some(Value::from(2)));
/// assert_eq!(
///     data_path::get(&data, &["a", "b", "*", "c"]),
///     Some(Value::List(vec![Value::from(1), Value::from(2)])),
/// );
/// assert_eq!(data_path::get(&data, &["a", "x"]), None);
/// ```
pub fn get<S: AsRef<str>>(target: &Value, path: &[S]) -> Option<Value> {
    let Some((head, rest)) = path.split_first() else {
        return Some(target.clone());
    };
    let head = head.as_ref();

    if head == WILDCARD {
        let items: Vec<Value> = match target {
            Value::List(items) => items.iter().map(|item| get(item, rest).unwrap_or_default()).collect(),
            Value::Map(map) => map.values().map(|item| get(item, rest).unwrap_or_default()).collect(),
            Value::Object(object) => object
                .fields()
                .values()
                .map(|item| get(item, rest).unwrap_or_default())
                .collect(),
            _ => return None,
        };
        if rest.iter().any(|segment| segment.as_ref() == WILDCARD) {
            return Some(Value::List(collapse(items)));
        }
        return Some(Value::List(items));
    }

    match target {
        Value::Map(map) => get(map.get(head)?, rest),
        Value::List(items) => get(items.get(head.parse::<usize>().ok()?)?, rest),
        Value::Object(object) => get(&object.get(head)?, rest),
        _ => None,
    }
}

fn collapse(items: Vec<Value>) -> Vec<Value> {
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::List(inner) => flat.extend(inner),
            Value::Map(inner) => flat.extend(inner.into_values()),
            _ => {}
        }
    }
    flat
}

/// Writes `value` at `path`, creating intermediate maps as needed.
///
/// Scalars met on the way are replaced by maps. A wildcard writes into every
/// item of an existing container and leaves any other value unchanged.
///
/// # Examples
///
/// ```
/// use vc_mapper::normalizer::data_path;
/// use vc_mapper::value::Value;
///
/// let mut data = Value::Null;
/// data_path::set(&mut data, &["a", "b"], Value::from(1));
/// data_path::set(&mut data, &["a", "c"], Value::from(2));
///
/// let expected: Value = serde_json::from_str(r#"{"a": {"b": 1, "c": 2}}"#).unwrap();
/// assert_eq!(data, expected);
/// ```
pub fn set<S: AsRef<str>>(target: &mut Value, path: &[S], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *target = value;
        return;
    };
    let head = head.as_ref();

    if head == WILDCARD {
        match target {
            Value::List(items) => {
                for item in items {
                    set(item, rest, value.clone());
                }
            }
            Value::Map(map) => {
                for item in map.values_mut() {
                    set(item, rest, value.clone());
                }
            }
            Value::Object(object) => {
                for (name, mut field) in object.fields() {
                    set(&mut field, rest, value.clone());
                    object.set(name, field);
                }
            }
            _ => {}
        }
        return;
    }

    match target {
        Value::List(items) => {
            if let Some(item) = head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                set(item, rest, value);
                return;
            }
        }
        Value::Object(object) => {
            let mut field = object.get(head).unwrap_or_default();
            set(&mut field, rest, value);
            object.set(head, field);
            return;
        }
        _ => {}
    }

    let map = ensure_map(target);
    let slot = map.entry(head.to_owned()).or_default();
    set(slot, rest, value);
}

fn ensure_map(target: &mut Value) -> &mut Map {
    if !matches!(target, Value::Map(_)) {
        *target = Value::Map(Map::new());
    }
    match target {
        Value::Map(map) => map,
        _ => unreachable!("target was just replaced by a map"),
    }
}
