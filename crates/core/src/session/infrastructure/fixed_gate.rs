use crate::session::domain::microphone::{MicAccess, MicrophoneGate};

/// Gate that answers every request with a fixed decision.
///
/// For hosts that resolve microphone permissions out-of-band, and for
/// exercising the denial path without a real permission service.
pub struct FixedGate {
    decision: MicAccess,
}

impl FixedGate {
    pub fn new(decision: MicAccess) -> Self {
        Self { decision }
    }

    pub fn granted() -> Self {
        Self::new(MicAccess::Granted)
    }

    pub fn denied() -> Self {
        Self::new(MicAccess::Denied)
    }
}

impl MicrophoneGate for FixedGate {
    fn request_access(&mut self) -> Result<MicAccess, Box<dyn std::error::Error>> {
        Ok(self.decision)
    }
}
