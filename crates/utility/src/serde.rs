use ::serde::{de::DeserializeOwned, Serialize};

/// Parses an optional JSON document, falling back to `T::default()` when the
/// value is absent, blank or can not be parsed. Parse failures are logged,
/// missing values are not.
pub fn from_str_or_default<T>(raw: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return T::default();
    };

    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(why) => {
            log::warn!("Ignoring unparseable value {raw:?}: {why}");
            T::default()
        }
    }
}

/// Serializes a value to compact JSON. Values that can not be represented as
/// JSON (maps with non-string keys, failing `Serialize` impls) become `null`.
pub fn to_string_lossy<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|why| {
        log::warn!("Could not serialize value: {why}");
        "null".to_owned()
    })
}
