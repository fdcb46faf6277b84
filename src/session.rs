use core::fmt;
use core::str::FromStr;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ParseIdError, RandSource, ThreadRandom};

/// The 62-character alphabet session IDs draw from: `[A-Za-z0-9]`.
pub const ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Prefix carried by every session ID.
pub const SESSION_ID_PREFIX: &str = "P1_";

/// Number of random characters following the prefix.
pub const SESSION_RANDOM_LEN: usize = 4;

/// Total encoded length of a session ID in bytes.
pub const SESSION_ID_LEN: usize = SESSION_ID_PREFIX.len() + SESSION_RANDOM_LEN;

/// Number of characters [`short_session_id`] keeps.
///
/// This is a fixed display constant, not derived from [`SESSION_ID_LEN`] —
/// the two being equal is coincidence. The system this crate descends from
/// documented the truncation as "first 6 chars" while its implementation took
/// 7; this crate standardizes on 7, the implemented behavior.
pub const SHORT_SESSION_ID_LEN: usize = 7;

/// An opaque, privacy-safe session identifier.
///
/// Correlates log and metric entries belonging to one browsing session. The
/// value is `P1_` followed by 4 characters drawn independently and uniformly
/// from [`ALPHABET`], carries no personal data, and cannot be linked back to
/// an individual. Created once per session and never mutated.
///
/// The encoding is fixed-length ASCII, so the ID is a small `Copy` value
/// rather than a heap string.
///
/// # Example
/// ```
/// use corrid::{SESSION_ID_PREFIX, SessionId};
///
/// let id = SessionId::new();
/// assert!(id.as_str().starts_with(SESSION_ID_PREFIX));
/// assert_eq!(id.as_str().len(), 7);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId {
    bytes: [u8; SESSION_ID_LEN],
}

impl SessionId {
    /// Generates a new session ID from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::from_source(&ThreadRandom)
    }

    /// Generates a new session ID from the provided random source.
    ///
    /// Threading the source explicitly keeps generation deterministic under
    /// a mocked [`RandSource`] in tests.
    ///
    /// # Example
    /// ```
    /// use corrid::{RandSource, SessionId};
    ///
    /// struct FixedRand;
    /// impl RandSource<u64> for FixedRand {
    ///     fn rand(&self) -> u64 {
    ///         0
    ///     }
    /// }
    ///
    /// let id = SessionId::from_source(&FixedRand);
    /// assert_eq!(id.as_str(), "P1_AAAA");
    /// ```
    #[must_use]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(rng)))]
    pub fn from_source<R: RandSource<u64>>(rng: &R) -> Self {
        let mut bytes = [0u8; SESSION_ID_LEN];
        bytes[..SESSION_ID_PREFIX.len()].copy_from_slice(SESSION_ID_PREFIX.as_bytes());
        for slot in &mut bytes[SESSION_ID_PREFIX.len()..] {
            // Modulo bias over a u64 draw is ~2^-58 per character, well
            // below anything observable.
            let idx = (rng.rand() % ALPHABET.len() as u64) as usize;
            *slot = ALPHABET[idx];
        }
        Self { bytes }
    }

    /// Returns the full identifier, e.g. `P1_Ab3x`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Constructors only ever write ASCII from the prefix and alphabet.
        core::str::from_utf8(&self.bytes).unwrap_or(SESSION_ID_PREFIX)
    }

    /// Returns the display-only short form, per [`short_session_id`].
    #[must_use]
    pub fn short(&self) -> &str {
        short_session_id(self.as_str())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("SessionId").field(&self.as_str()).finish()
    }
}

impl FromStr for SessionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != SESSION_ID_LEN {
            return Err(ParseIdError::Length {
                expected: SESSION_ID_LEN,
                found: s.len(),
            });
        }
        if !s.starts_with(SESSION_ID_PREFIX) {
            return Err(ParseIdError::Prefix {
                expected: SESSION_ID_PREFIX,
            });
        }
        for (index, found) in s.char_indices().skip(SESSION_ID_PREFIX.len()) {
            if !found.is_ascii_alphanumeric() {
                return Err(ParseIdError::Character { found, index });
            }
        }
        let mut bytes = [0u8; SESSION_ID_LEN];
        bytes.copy_from_slice(s.as_bytes());
        Ok(Self { bytes })
    }
}

/// Generates a new session ID of the form `P1_XXXX`, where each `X` is drawn
/// independently and uniformly from [`ALPHABET`].
///
/// Stateless and safe to call from any thread; entropy comes from the
/// thread-local RNG. Cannot fail.
///
/// # Example
/// ```
/// use corrid::create_session_id;
///
/// let a = create_session_id();
/// let b = create_session_id();
/// assert!(a.as_str().starts_with("P1_"));
/// // Not guaranteed unique, only overwhelmingly likely to differ.
/// ```
#[must_use]
pub fn create_session_id() -> SessionId {
    SessionId::new()
}

/// Returns the first [`SHORT_SESSION_ID_LEN`] characters of `full_id`, or
/// the whole string if it is shorter.
///
/// Display-only brevity helper for console logs and CSV output. This is
/// naive truncation, not a digest: distinct full IDs may share a short form,
/// which is accepted because these IDs are never used for security
/// decisions. Total over all strings, including the empty string, and never
/// splits a multi-byte character.
///
/// # Example
/// ```
/// use corrid::short_session_id;
///
/// assert_eq!(short_session_id("P1_Ab3x"), "P1_Ab3x");
/// assert_eq!(short_session_id("7a9f2c3d-8b1e-4f5a"), "7a9f2c3");
/// assert_eq!(short_session_id(""), "");
/// ```
#[must_use]
pub fn short_session_id(full_id: &str) -> &str {
    match full_id.char_indices().nth(SHORT_SESSION_ID_LEN) {
        Some((idx, _)) => &full_id[..idx],
        None => full_id,
    }
}
