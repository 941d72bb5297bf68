// ============================================================================
// Codec Module
// Text formatting and parsing for SimTime
// ============================================================================
//
// This module provides:
// - SimTime::ustr / ustr_in: compact "1.5ms" style output
// - SimTime::format + FormatOptions: grouped digits, unit annotations
// - SimTime::parse / parse_prefix / FromStr: quantity text to ticks
//
// Output never invents digits beyond the resolution, and ustr output parses
// back to the identical tick count.

mod format;
mod parse;

pub use format::FormatOptions;

pub(crate) use format::ttoa;

#[cfg(feature = "serde")]
mod serde_impl {
    use crate::numeric::SimTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialized as the compact unit string, which is lossless.
    impl Serialize for SimTime {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.ustr())
        }
    }

    impl<'de> Deserialize<'de> for SimTime {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let text = String::deserialize(deserializer)?;
            SimTime::parse(&text).map_err(serde::de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use crate::numeric::{init_test_resolution, SimTime, TimeUnit};

        #[test]
        fn test_json_round_trip() {
            init_test_resolution();
            let t = SimTime::new(1_500, TimeUnit::Us).unwrap();
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, "\"1.5ms\"");
            assert_eq!(serde_json::from_str::<SimTime>(&json).unwrap(), t);
            assert!(serde_json::from_str::<SimTime>("\"soon\"").is_err());
        }
    }
}
