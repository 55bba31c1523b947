//! PropertyMap: the key-value store on nodes and relationships.

use super::Value;

/// Property name → value.
pub type PropertyMap = hashbrown::HashMap<String, Value>;

/// Build a map from `(key, value)` pairs.
pub fn props<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> PropertyMap
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
