//! Entropy sources for die rolls.
//!
//! The primary source is the ANU quantum random number service, reached
//! over HTTP with a short timeout. Every failure of that source is an
//! ordinary [`EntropyError`] value; the roll engine branches on it and
//! falls back to [`local_roll`], which cannot fail.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

/// Default quantum RNG endpoint: one unsigned byte per request.
pub const DEFAULT_QRNG_URL: &str = "https://qrng.anu.edu.au/API/jsonI.php?length=1&type=uint8";

/// Number of distinct values one external byte can take. Dice with more
/// faces than this are always rolled locally.
pub const BYTE_SPAN: u32 = 256;

/// Why an external entropy draw could not be used.
#[derive(Debug, thiserror::Error)]
pub enum EntropyError {
    /// The external source is switched off by configuration.
    #[error("external entropy source disabled")]
    Disabled,

    /// Transport failure, including the request timeout.
    #[error("entropy request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("entropy service returned status {0}")]
    Status(u16),

    /// The body was not QRNG JSON or did not contain a usable byte.
    #[error("malformed entropy response: {0}")]
    Malformed(String),

    /// The byte cannot be mapped onto the die without bias.
    #[error("byte {byte} unusable for a d{sides}")]
    Unusable {
        /// Byte drawn from the source.
        byte: u8,
        /// Sides of the die being rolled.
        sides: u32,
    },
}

/// A source of random bytes that may fail.
pub trait EntropySource: Send + Sync {
    /// Draws one random byte.
    fn next_byte(&self) -> impl Future<Output = Result<u8, EntropyError>> + Send;
}

/// Body returned by the ANU QRNG JSON API.
#[derive(Debug, Deserialize)]
struct QrngResponse {
    #[serde(default)]
    data: Vec<u8>,
    success: Option<bool>,
}

/// HTTP client for the quantum random number service.
#[derive(Debug, Clone)]
pub struct QuantumEntropy {
    client: reqwest::Client,
    url: String,
    enabled: bool,
}

impl QuantumEntropy {
    /// Builds a client whose every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError::Http`] if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(url: impl Into<String>, timeout: Duration, enabled: bool) -> Result<Self, EntropyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            enabled,
        })
    }

    /// Endpoint queried for each draw.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether draws go to the network at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn fetch(&self) -> Result<u8, EntropyError> {
        if !self.enabled {
            return Err(EntropyError::Disabled);
        }

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EntropyError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let body: QrngResponse =
            serde_json::from_slice(&bytes).map_err(|e| EntropyError::Malformed(e.to_string()))?;
        if body.success == Some(false) {
            return Err(EntropyError::Malformed("service reported failure".to_string()));
        }
        body.data
            .first()
            .copied()
            .ok_or_else(|| EntropyError::Malformed("empty data array".to_string()))
    }
}

impl EntropySource for QuantumEntropy {
    fn next_byte(&self) -> impl Future<Output = Result<u8, EntropyError>> + Send {
        self.fetch()
    }
}

/// Maps a byte uniformly onto `[1, sides]`.
///
/// Bytes in the biased tail above the largest multiple of `sides` are
/// rejected, as is every byte for dice with more than 256 faces.
///
/// # Errors
///
/// Returns [`EntropyError::Unusable`] when the byte must be rejected.
pub fn byte_to_face(byte: u8, sides: u32) -> Result<u32, EntropyError> {
    let value = u32::from(byte);
    if sides == 0 || sides > BYTE_SPAN || value >= BYTE_SPAN - BYTE_SPAN % sides {
        return Err(EntropyError::Unusable { byte, sides });
    }
    Ok(value % sides + 1)
}

/// Rolls one die with the thread-local CSPRNG.
#[must_use]
pub fn local_roll(sides: u32) -> u32 {
    rand::rng().random_range(1..=sides.max(1))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted entropy sources for engine and service tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{EntropyError, EntropySource};

    /// Always fails, as if the network were down.
    #[derive(Debug, Default)]
    pub(crate) struct Unreachable {
        pub(crate) calls: AtomicUsize,
    }

    impl EntropySource for Unreachable {
        async fn next_byte(&self) -> Result<u8, EntropyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(EntropyError::Status(503))
        }
    }

    /// Replays a fixed script; `None` entries fail. Fails once exhausted.
    #[derive(Debug, Default)]
    pub(crate) struct Scripted {
        script: Mutex<VecDeque<Option<u8>>>,
    }

    impl Scripted {
        pub(crate) fn new(script: impl IntoIterator<Item = Option<u8>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
            }
        }
    }

    impl EntropySource for Scripted {
        async fn next_byte(&self) -> Result<u8, EntropyError> {
            let next = self
                .script
                .lock()
                .ok()
                .and_then(|mut script| script.pop_front())
                .flatten();
            next.ok_or_else(|| EntropyError::Malformed("script exhausted".to_string()))
        }
    }
}
