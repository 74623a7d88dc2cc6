//! Structural helpers over `serde_json::Value`.
//!
//! Packs are untyped JSON. Every checker and overlay step addresses them
//! through these helpers instead of ad hoc `match` chains, so the rules for
//! "absent", "empty" and "not an object" live in one place.

use serde_json::{Map, Value};

/// Why a [`set_path`] call refused to write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetPathError {
    #[error("empty key path")]
    EmptyPath,

    /// An existing value on the way to the leaf is not an object.
    #[error("`{at}` exists and is not an object")]
    NotAnObject { at: String },
}

/// Split a dotted key path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}

/// Follow `segments` through nested objects.
///
/// Returns `None` as soon as a segment is missing or an intermediate value
/// is not an object. An empty path yields the root itself.
pub fn get_path<'a, S: AsRef<str>>(value: &'a Value, segments: &[S]) -> Option<&'a Value> {
    let mut current = value;
    for segment in segments {
        current = current.as_object()?.get(segment.as_ref())?;
    }
    Some(current)
}

/// Set the leaf at `segments`, creating missing intermediate objects.
///
/// Never descends into or replaces an existing non-object value. Because
/// intermediates are only created after the last existing segment, a
/// refused write leaves `root` untouched. Returns the previous leaf value.
pub fn set_path<S: AsRef<str>>(
    root: &mut Value,
    segments: &[S],
    value: Value,
) -> Result<Option<Value>, SetPathError> {
    let (leaf, parents) = segments.split_last().ok_or(SetPathError::EmptyPath)?;
    let mut current = root
        .as_object_mut()
        .ok_or_else(|| SetPathError::NotAnObject { at: String::new() })?;

    for (index, segment) in parents.iter().enumerate() {
        let entry = current
            .entry(segment.as_ref().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry.as_object_mut() {
            Some(map) => map,
            None => {
                return Err(SetPathError::NotAnObject {
                    at: join_path(&segments[..=index]),
                });
            }
        };
    }

    Ok(current.insert(leaf.as_ref().to_string(), value))
}

/// Additive deep merge of `patch` into `target`.
///
/// Keys present in both whose values are both objects recurse; otherwise
/// the patch value wins. Keys only present in `target` are left untouched.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    if !(target.is_object() && patch.is_object()) {
        *target = patch.clone();
        return;
    }
    let (Some(target_map), Some(patch_map)) = (target.as_object_mut(), patch.as_object()) else {
        return;
    };
    for (key, patch_value) in patch_map {
        match target_map.get_mut(key) {
            Some(existing) if existing.is_object() && patch_value.is_object() => {
                deep_merge(existing, patch_value);
            }
            _ => {
                target_map.insert(key.clone(), patch_value.clone());
            }
        }
    }
}

/// `null`, blank strings, and empty arrays or objects count as empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
