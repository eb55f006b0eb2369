/// Outcome of a microphone permission request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MicAccess {
    Granted,
    Denied,
}

/// Permission boundary for microphone capture.
///
/// The request blocks until the host resolves it; the controller issues at
/// most one request at a time, so implementations need no re-entrancy
/// handling.
pub trait MicrophoneGate: Send {
    /// Ask the host for microphone access.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot resolve the request at all;
    /// callers treat this the same as a denial.
    fn request_access(&mut self) -> Result<MicAccess, Box<dyn std::error::Error>>;
}
