//! Convenience macros for plugin development.

/// Builds an [`Attributes`](reaper_core::models::Attributes) map.
///
/// Values are any expressions accepted by `serde_json::json!`.
///
/// # Example
/// ```rust
/// use reaper_plugin::attributes;
///
/// let payload = attributes! {
///     "title" => "Login page broken",
///     "votes" => 12,
/// };
/// assert_eq!(payload.len(), 2);
/// ```
#[macro_export]
macro_rules! attributes {
    () => {
        $crate::prelude::Attributes::new()
    };
    ($($key:expr => $value:tt),+ $(,)?) => {{
        let mut map = $crate::prelude::Attributes::new();
        $(
            map.insert(($key).to_string(), $crate::serde_json::json!($value));
        )+
        map
    }};
}
