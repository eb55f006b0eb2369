/// Write-only clipboard boundary.
///
/// Writes may fail (no clipboard service, denied access); callers surface
/// the failure as a transient status and leave the transcript untouched.
pub trait ClipboardSink: Send {
    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>>;
}
