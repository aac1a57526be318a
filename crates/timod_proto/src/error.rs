use thiserror::Error;

/// Errors raised while framing or unpacking module protocol packages.
///
/// Everything except [`ProtoError::Decode`] describes a broken channel to the
/// host and is treated as fatal by the module event loop.
#[derive(Error, Debug)]
pub enum ProtoError {
    /// Reading from or writing to the host pipe failed
    #[error("I/O error on module channel: {0}")]
    Io(#[from] std::io::Error),

    /// The header check bit does not match the package type
    #[error("invalid package check bit (tp: {tp}, ntp: {ntp})")]
    InvalidCheckBit { tp: u8, ntp: u8 },

    /// The header announces more data than we accept
    #[error("package data size {size} exceeds limit of {limit} bytes")]
    TooLarge { size: u32, limit: u32 },

    /// The msgpack payload could not be decoded into the expected shape
    #[error("{0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// A value could not be packed as msgpack
    #[error("failed to pack data: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// The host closed the channel
    #[error("module channel closed by host")]
    Closed,
}

impl ProtoError {
    /// Returns `true` when the error leaves the host channel unusable.
    pub fn is_transport(&self) -> bool {
        !matches!(self, ProtoError::Decode(_) | ProtoError::Encode(_))
    }
}
