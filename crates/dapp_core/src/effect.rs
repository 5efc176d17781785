#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Point the session's surface at `url`.
    Navigate { url: String },
    /// Dispose the surface and close the signal stream.
    Teardown,
}
