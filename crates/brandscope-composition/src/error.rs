//! Fan-out failure

/// One item of a fan-out failed; the whole fan-out is discarded
#[derive(Debug, thiserror::Error)]
#[error("fan-out item {index} failed: {source}")]
pub struct FanOutError<E>
where
    E: std::error::Error + 'static,
{
    /// Position of the failing item in the input sequence
    pub index: usize,
    pub source: E,
}

impl<E> FanOutError<E>
where
    E: std::error::Error + 'static,
{
    #[inline]
    #[must_use]
    pub fn new(index: usize, source: E) -> Self {
        Self { index, source }
    }

    #[inline]
    #[must_use]
    pub fn into_source(self) -> E {
        self.source
    }
}
