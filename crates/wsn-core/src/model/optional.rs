//! Tri-state optionality for evolvable feature attributes
//!
//! Every leaf of the canonical feature model needs to distinguish three
//! states: the field is missing from the source blob entirely, the field is
//! present but explicitly null, and the field is present with a value. A
//! plain `Option<T>` only has two states, which is not enough to implement
//! the quiet-rollout rule (see [`crate::diff::comparator`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A present-bit plus value, distinguishing "absent" from "present(null)"
/// from "present(value)".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Optional<T> {
    /// The field was not present in the source at all.
    #[default]
    Absent,
    /// The field was present; `None` means an explicit null.
    Present(Option<T>),
}

impl<T> Optional<T> {
    pub fn absent() -> Self {
        Optional::Absent
    }

    pub fn present(value: T) -> Self {
        Optional::Present(Some(value))
    }

    pub fn present_null() -> Self {
        Optional::Present(None)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Optional::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Optional::Absent)
    }

    /// Value if present and non-null, `None` otherwise (including absent).
    pub fn value(&self) -> Option<&T> {
        match self {
            Optional::Present(Some(v)) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Optional::Present(v) => v,
            Optional::Absent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
        match self {
            Optional::Absent => Optional::Absent,
            Optional::Present(v) => Optional::Present(v.map(f)),
        }
    }
}

impl<T: Clone> Optional<&T> {
    pub fn cloned(self) -> Optional<T> {
        match self {
            Optional::Absent => Optional::Absent,
            Optional::Present(v) => Optional::Present(v.cloned()),
        }
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Optional::Present(Some(v)) => v.serialize(serializer),
            Optional::Present(None) => serializer.serialize_none(),
            Optional::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Optional::Present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_roundtrips_as_omitted_field() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Wrapper {
            #[serde(default, skip_serializing_if = "Optional::is_absent")]
            name: Optional<String>,
        }

        let w = Wrapper {
            name: Optional::absent(),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "{}");
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn present_null_roundtrips_as_explicit_null() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Wrapper {
            #[serde(default, skip_serializing_if = "Optional::is_absent")]
            name: Optional<String>,
        }

        let w = Wrapper {
            name: Optional::present_null(),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"name":null}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
        assert!(back.name.is_present());
        assert_eq!(back.name.value(), None);
    }

    #[test]
    fn present_value_roundtrips() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Wrapper {
            #[serde(default, skip_serializing_if = "Optional::is_absent")]
            name: Optional<String>,
        }

        let w = Wrapper {
            name: Optional::present("Grid".to_string()),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"name":"Grid"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name.value().map(String::as_str), Some("Grid"));
    }
}
