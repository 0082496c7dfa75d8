/// Progress indicator for long-running loops over events
pub trait Progress {
    /// Advance by `i` steps
    fn inc(&self, i: u64);

    /// Mark as done
    fn finish(&self);
}
