//! `slog` values for planning events.
//!
//! Status codes log by their gRPC name. With the `json` feature, whole
//! decision records can be attached to a record as nested structured values.

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::service::StatusCode;

impl SlogValue for StatusCode {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.name())
    }
}

#[cfg(feature = "json")]
pub(crate) use self::json::DecisionJson;

#[cfg(feature = "json")]
mod json {
    use serde::Serialize;
    use serde_json::Value as JsonValue;
    use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

    /// A decision record emitted as nested JSON.
    ///
    /// Serialization failures are logged as a placeholder string rather than
    /// failing the log call.
    pub(crate) struct DecisionJson {
        pub(crate) value: JsonValue,
    }

    impl DecisionJson {
        pub(crate) fn of<T: Serialize>(decision: &T) -> Self {
            let value = serde_json::to_value(decision).unwrap_or_else(|_| {
                JsonValue::String("Failed to serialize decision".to_string())
            });
            Self { value }
        }
    }

    impl SlogValue for DecisionJson {
        fn serialize(
            &self,
            record: &Record<'_>,
            key: Key,
            serializer: &mut dyn Serializer,
        ) -> SlogResult {
            let nested = slog::Serde(self.value.clone());
            SlogValue::serialize(&nested, record, key, serializer)
        }
    }
}
