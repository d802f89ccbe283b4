use tracing::instrument;

use crate::backend::PairingBackend;
use crate::config::SheConfig;
use crate::errors::{BackendError, Error};

/// Explicit scheme context: the deterministic generators plus the DLP tuning
/// knobs, built once from a validated [`SheConfig`] and passed by reference
/// to every constructor that needs it.
///
/// Both generators are derived by hashing the fixed string `"0"` to the
/// respective group, so two processes configured for the same curve agree on
/// them without any exchanged state. Immutable after construction and safe
/// to share across threads.
#[derive(Clone, Copy, Debug)]
pub struct Params<B: PairingBackend> {
    pub(crate) p: B::G1,
    pub(crate) q: B::G2,
    /// Number of baby steps per decryption table.
    pub hash_size: u32,
    /// Number of giant-step retries during decryption.
    pub try_num: u32,
}

impl<B: PairingBackend> Params<B> {
    /// Validates the configuration and derives the generators.
    ///
    /// Fails with [`Error::RangeZero`] for an empty decode range and with a
    /// backend error when the configured curve does not match `B`.
    #[instrument(level = "info", skip_all, fields(curve = ?config.curve, hash_size = config.hash_size))]
    pub fn setup(config: &SheConfig) -> Result<Self, Error> {
        config.validate()?;
        if B::CURVE != config.curve {
            return Err(Error::Backend(BackendError::UnsupportedCurve(
                "configured curve does not match this backend",
            )));
        }
        Ok(Self {
            p: B::hash_to_g1(b"0"),
            q: B::hash_to_g2(b"0"),
            hash_size: config.hash_size,
            try_num: config.try_num,
        })
    }

    /// The G1 generator `P`.
    pub fn p(&self) -> &B::G1 {
        &self.p
    }

    /// The G2 generator `Q`.
    pub fn q(&self) -> &B::G2 {
        &self.q
    }
}
