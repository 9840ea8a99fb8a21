//! Error type shared by the decoders and the economy model.

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("Not a {kind} account (discriminator {found:?})")]
    DiscriminatorMismatch { kind: &'static str, found: Vec<u8> },
    #[error("Unknown account discriminator {0:?}")]
    UnknownDiscriminator(Vec<u8>),
    #[error("Buffer underrun: need {needed} bytes at offset {offset}, buffer is {len} bytes")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        len: usize,
    },
    #[error("Invalid rod level {0} (levels start at 1)")]
    InvalidLevel(u32),
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;
