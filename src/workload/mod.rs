//! Synthetic workload types.
//!
//! A workload is an ordered, immutable list of requests. Order is the
//! arrival order and is preserved by every downstream stage.

mod sampler;

pub use sampler::{LengthBounds, RequestSampler, FILLER_CHAR};

/// A single synthetic generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Filler prompt text.
    pub prompt: String,
    /// Prompt length in tokens, as reported by the tokenizer.
    pub prompt_len: usize,
    /// Number of tokens to generate.
    pub output_len: usize,
}

impl Request {
    pub fn new(prompt: String, prompt_len: usize, output_len: usize) -> Self {
        Self { prompt, prompt_len, output_len }
    }

    /// Prompt plus output tokens.
    pub fn total_tokens(&self) -> usize {
        self.prompt_len + self.output_len
    }
}

/// Ordered set of requests for one benchmark run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadSet {
    requests: Vec<Request>,
}

impl WorkloadSet {
    pub fn new(requests: Vec<Request>) -> Self {
        Self { requests }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Request> {
        self.requests.iter()
    }

    pub fn as_slice(&self) -> &[Request] {
        &self.requests
    }

    /// Sum of prompt and output tokens over every request.
    pub fn total_tokens(&self) -> usize {
        self.requests.iter().map(Request::total_tokens).sum()
    }
}

impl<'a> IntoIterator for &'a WorkloadSet {
    type Item = &'a Request;
    type IntoIter = std::slice::Iter<'a, Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

impl FromIterator<Request> for WorkloadSet {
    fn from_iter<T: IntoIterator<Item = Request>>(iter: T) -> Self {
        Self { requests: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_tokens_sums_prompt_and_output() {
        let workload: WorkloadSet = vec![
            Request::new("!!!".into(), 3, 4),
            Request::new("!!".into(), 2, 5),
        ]
        .into_iter()
        .collect();

        assert_eq!(workload.len(), 2);
        assert_eq!(workload.total_tokens(), 14);
    }

    #[test]
    fn empty_workload_has_no_tokens() {
        let workload = WorkloadSet::default();
        assert!(workload.is_empty());
        assert_eq!(workload.total_tokens(), 0);
    }
}
