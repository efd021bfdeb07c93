//! Aggregated outcome of a batch run.

/// Failure of one batch item, keyed by its position in the input.
#[derive(Debug)]
pub struct BatchItemError {
    pub index: usize,
    pub error: anyhow::Error,
}

/// `results[i]` holds the output for input `i` when it succeeded and `None`
/// otherwise; every `None` has a matching entry in `errors`.
#[derive(Debug)]
pub struct BatchResult<R> {
    pub results: Vec<Option<R>>,
    pub errors: Vec<BatchItemError>,
}

impl<R> BatchResult<R> {
    pub(crate) fn with_len(len: usize) -> Self {
        let mut results = Vec::with_capacity(len);
        results.resize_with(len, || None);
        Self {
            results,
            errors: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, index: usize, outcome: anyhow::Result<R>) {
        match outcome {
            Ok(value) => self.results[index] = Some(value),
            Err(error) => self.errors.push(BatchItemError { index, error }),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// True when every item succeeded.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error for input `index`, if that item failed.
    pub fn error_for(&self, index: usize) -> Option<&anyhow::Error> {
        self.errors
            .iter()
            .find(|e| e.index == index)
            .map(|e| &e.error)
    }

    pub fn into_parts(self) -> (Vec<Option<R>>, Vec<BatchItemError>) {
        (self.results, self.errors)
    }
}
