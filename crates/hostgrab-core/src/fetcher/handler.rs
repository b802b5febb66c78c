//! Easy2 handler that buffers one response body in memory.

/// Collects the body of a single transfer.
#[derive(Debug, Default)]
pub(super) struct BodyCollector {
    pub(super) body: Vec<u8>,
}

impl curl::easy::Handler for BodyCollector {
    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        self.body.extend_from_slice(data);
        Ok(data.len())
    }
}
