/// Errors from parsing or validating foundation types.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// A `name:value` hash rendering could not be parsed.
    #[error("invalid hash info: {0:?}")]
    InvalidHashInfo(String),
}
