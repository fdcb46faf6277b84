use core::fmt;
use core::str::FromStr;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ParseIdError, RandSource, ThreadRandom};

/// Prefix carried by every request ID.
pub const REQUEST_ID_PREFIX: &str = "r_";

/// Number of hex characters following the prefix.
pub const REQUEST_RANDOM_LEN: usize = 8;

/// Total encoded length of a request ID in bytes.
pub const REQUEST_ID_LEN: usize = REQUEST_ID_PREFIX.len() + REQUEST_RANDOM_LEN;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// An opaque identifier for one individual request within a session.
///
/// Correlates log and metric entries for detailed debugging and error
/// tracking. The value is `r_` followed by the first 8 characters of the
/// canonical hyphenated rendering of a random 128-bit value; the first
/// hyphen in that rendering falls at position 9, so the tail is always 8
/// lowercase hex digits. Created once per request and discarded when request
/// handling ends.
///
/// # Example
/// ```
/// use corrid::{REQUEST_ID_PREFIX, RequestId};
///
/// let id = RequestId::new();
/// assert!(id.as_str().starts_with(REQUEST_ID_PREFIX));
/// assert_eq!(id.as_str().len(), 10);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId {
    bytes: [u8; REQUEST_ID_LEN],
}

impl RequestId {
    /// Generates a new request ID from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::from_source(&ThreadRandom)
    }

    /// Generates a new request ID from the provided random source.
    ///
    /// # Example
    /// ```
    /// use corrid::{RandSource, RequestId};
    ///
    /// struct FixedRand;
    /// impl RandSource<u128> for FixedRand {
    ///     fn rand(&self) -> u128 {
    ///         0xa3f7_b2c1 << 96
    ///     }
    /// }
    ///
    /// let id = RequestId::from_source(&FixedRand);
    /// assert_eq!(id.as_str(), "r_a3f7b2c1");
    /// ```
    #[must_use]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(rng)))]
    pub fn from_source<R: RandSource<u128>>(rng: &R) -> Self {
        // The canonical hyphenated form of a 128-bit value opens with its
        // top 32 bits as 8 hex digits; only those survive truncation.
        let hi = (rng.rand() >> 96) as u32;

        let mut bytes = [0u8; REQUEST_ID_LEN];
        bytes[..REQUEST_ID_PREFIX.len()].copy_from_slice(REQUEST_ID_PREFIX.as_bytes());
        for (i, slot) in bytes[REQUEST_ID_PREFIX.len()..].iter_mut().enumerate() {
            let nibble = (hi >> (28 - 4 * i)) & 0xf;
            *slot = HEX[nibble as usize];
        }
        Self { bytes }
    }

    /// Returns the full identifier, e.g. `r_a3f7b2c1`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Constructors only ever write ASCII from the prefix and hex table.
        core::str::from_utf8(&self.bytes).unwrap_or(REQUEST_ID_PREFIX)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("RequestId").field(&self.as_str()).finish()
    }
}

impl FromStr for RequestId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != REQUEST_ID_LEN {
            return Err(ParseIdError::Length {
                expected: REQUEST_ID_LEN,
                found: s.len(),
            });
        }
        if !s.starts_with(REQUEST_ID_PREFIX) {
            return Err(ParseIdError::Prefix {
                expected: REQUEST_ID_PREFIX,
            });
        }
        for (index, found) in s.char_indices().skip(REQUEST_ID_PREFIX.len()) {
            if !matches!(found, '0'..='9' | 'a'..='f') {
                return Err(ParseIdError::Character { found, index });
            }
        }
        let mut bytes = [0u8; REQUEST_ID_LEN];
        bytes.copy_from_slice(s.as_bytes());
        Ok(Self { bytes })
    }
}

/// Generates a new request ID of the form `r_YYYYYYYY`, where the tail is 8
/// lowercase hex digits taken from a fresh random 128-bit value.
///
/// Stateless and safe to call from any thread; entropy comes from the
/// thread-local RNG. Cannot fail.
///
/// # Example
/// ```
/// use corrid::generate_request_id;
///
/// let id = generate_request_id();
/// assert!(id.as_str().starts_with("r_"));
/// ```
#[must_use]
pub fn generate_request_id() -> RequestId {
    RequestId::new()
}

/// Alias of [`generate_request_id`], kept for call-site compatibility.
///
/// Identical contract; the logic lives in one place.
#[must_use]
pub fn new_req_id() -> RequestId {
    generate_request_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRand {
        rand: u128,
    }

    impl RandSource<u128> for FixedRand {
        fn rand(&self) -> u128 {
            self.rand
        }
    }

    fn assert_well_formed(id: RequestId) {
        let s = id.as_str();
        assert_eq!(s.len(), REQUEST_ID_LEN);
        assert!(s.starts_with(REQUEST_ID_PREFIX));
        assert!(
            s[REQUEST_ID_PREFIX.len()..]
                .chars()
                .all(|c| matches!(c, '0'..='9' | 'a'..='f'))
        );
    }

    #[test]
    fn generated_ids_match_documented_format() {
        for _ in 0..100 {
            assert_well_formed(generate_request_id());
        }
    }

    #[test]
    fn alias_meets_the_same_contract() {
        for _ in 0..100 {
            assert_well_formed(new_req_id());
        }
    }

    #[test]
    fn fixed_source_is_deterministic() {
        let id = RequestId::from_source(&FixedRand {
            rand: 0xa3f7_b2c1 << 96,
        });
        assert_eq!(id.as_str(), "r_a3f7b2c1");

        // Low 96 bits never reach the encoded form.
        let id = RequestId::from_source(&FixedRand {
            rand: (0xa3f7_b2c1 << 96) | 0xffff_ffff_ffff_ffff,
        });
        assert_eq!(id.as_str(), "r_a3f7b2c1");

        let id = RequestId::from_source(&FixedRand { rand: 0 });
        assert_eq!(id.as_str(), "r_00000000");

        let id = RequestId::from_source(&FixedRand { rand: u128::MAX });
        assert_eq!(id.as_str(), "r_ffffffff");
    }

    #[test]
    fn ids_are_never_empty_or_unprefixed() {
        for _ in 0..1000 {
            let id = generate_request_id();
            assert!(!id.as_str().is_empty());
            assert!(id.as_str().starts_with(REQUEST_ID_PREFIX));
        }
    }

    #[test]
    fn consecutive_ids_almost_always_differ() {
        // 2^32 possible values; a single-pair collision is ~2e-10.
        assert_ne!(generate_request_id(), generate_request_id());
    }

    #[test]
    fn display_and_debug_render_the_string() {
        let id = RequestId::from_source(&FixedRand { rand: 0 });
        assert_eq!(id.to_string(), "r_00000000");
        assert_eq!(format!("{id:?}"), "RequestId(\"r_00000000\")");
    }

    #[test]
    fn parses_generated_ids() {
        let id = generate_request_id();
        let parsed: RequestId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            "r_a3f7".parse::<RequestId>(),
            Err(ParseIdError::Length {
                expected: REQUEST_ID_LEN,
                found: 6
            })
        );
        assert_eq!(
            "R_a3f7b2c1".parse::<RequestId>(),
            Err(ParseIdError::Prefix {
                expected: REQUEST_ID_PREFIX
            })
        );
        // Uppercase hex is outside the canonical form.
        assert_eq!(
            "r_A3f7b2c1".parse::<RequestId>(),
            Err(ParseIdError::Character {
                found: 'A',
                index: 2
            })
        );
    }
}
