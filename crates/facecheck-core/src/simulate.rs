//! Stand-in verifier for hosts without a face embedding backend.
//!
//! It keeps the input checks and the blocklist scan so callers exercise the
//! same contract, but the signature is random and the document is never
//! compared.

use std::sync::Mutex;
use std::thread::sleep;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::{info, warn};

use crate::faces::{check_blocklist, FaceSignature, SIGNATURE_LEN};
use crate::verify::{check_inputs, Verdict, VerificationRequest, VerificationStatus, Verify};

pub const SIMULATED_BLOCKLIST_THRESHOLD: f64 = 0.3;
pub const SIMULATED_STD_DEV: f64 = 0.1;
pub const DEFAULT_SIMULATION_DELAY: Duration = Duration::from_millis(300);
pub const SIMULATED_BLOCKED_MESSAGE: &str = "Account suspended";
pub const SIMULATED_VERIFIED_MESSAGE: &str = "Verification successful (simulation)";

pub struct SimulatedVerifier {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedVerifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn generate_signature(&self) -> FaceSignature {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let values = (0..SIGNATURE_LEN)
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                z * SIMULATED_STD_DEV
            })
            .collect();
        FaceSignature::new(values)
    }
}

impl Default for SimulatedVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATION_DELAY)
    }
}

impl Verify for SimulatedVerifier {
    fn verify(&self, request: &VerificationRequest<'_>) -> Verdict {
        if !self.delay.is_zero() {
            sleep(self.delay);
        }

        if let Some(verdict) = check_inputs(request) {
            return verdict;
        }

        let signature = self.generate_signature();
        let blocklist_match = check_blocklist(
            Some(signature.values()),
            request.blocklist,
            SIMULATED_BLOCKLIST_THRESHOLD,
        );
        if blocklist_match.is_match {
            warn!(
                evidence = blocklist_match.evidence.as_deref().unwrap_or_default(),
                "simulated signature matched a blocklisted signature"
            );
            return Verdict::new(
                VerificationStatus::Blocked,
                SIMULATED_BLOCKED_MESSAGE,
                Some(signature),
            );
        }

        info!("simulated verification succeeded");
        Verdict::new(
            VerificationStatus::Verified,
            SIMULATED_VERIFIED_MESSAGE,
            Some(signature),
        )
    }
}
