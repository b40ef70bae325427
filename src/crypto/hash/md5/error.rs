/// UTF-16 input that does not decode to Unicode scalar values.
///
/// Bytes absorbed before the offending code unit stay in the hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unpaired surrogate {unit:#06x} at code unit {index}")]
pub struct EncodingError {
    /// Position of the surrogate within the slice passed to the failing call.
    pub index: usize,
    pub unit: u16,
}
