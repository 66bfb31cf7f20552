//! Continuous batching for the simulated engine.
//!
//! Sequences join and leave the running set between generation steps,
//! bounded by a slot count and a token budget.

use std::collections::VecDeque;

/// Unique identifier for an engine request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

/// Request phase in the continuous batch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// Prompt not yet processed.
    Prefill,
    /// Generating output tokens.
    Decode,
    Complete,
}

/// Running request occupying one slot.
#[derive(Debug, Clone)]
pub struct BatchSlot {
    pub request_id: RequestId,
    pub phase: RequestPhase,
    pub prompt_len: usize,
    pub fan_out: usize,
    pub tokens_generated: usize,
    pub max_tokens: usize,
}

impl BatchSlot {
    fn new(request: &PendingRequest) -> Self {
        Self {
            request_id: request.request_id,
            phase: RequestPhase::Prefill,
            prompt_len: request.prompt_len,
            fan_out: request.fan_out,
            tokens_generated: 0,
            max_tokens: request.max_tokens,
        }
    }

    /// Tokens this request may occupy once fully generated.
    pub fn reserved_tokens(&self) -> usize {
        self.prompt_len + self.max_tokens
    }

    /// Advance one step: prefill on the first call, one token afterwards.
    pub fn step(&mut self) {
        match self.phase {
            RequestPhase::Prefill => self.phase = RequestPhase::Decode,
            RequestPhase::Decode => {
                self.tokens_generated += 1;
                if self.tokens_generated >= self.max_tokens {
                    self.phase = RequestPhase::Complete;
                }
            }
            RequestPhase::Complete => {}
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RequestPhase::Complete
    }
}

/// Request waiting to join the running set.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub prompt_len: usize,
    pub fan_out: usize,
    pub max_tokens: usize,
}

impl PendingRequest {
    fn reserved_tokens(&self) -> usize {
        self.prompt_len + self.max_tokens
    }
}

/// Slot- and token-bounded continuous batcher.
#[derive(Debug)]
pub struct ContinuousBatcher {
    slots: Vec<Option<BatchSlot>>,
    max_batched_tokens: usize,
    pending: VecDeque<PendingRequest>,
}

impl ContinuousBatcher {
    pub fn new(max_slots: usize, max_batched_tokens: usize) -> Self {
        Self {
            slots: vec![None; max_slots.max(1)],
            max_batched_tokens,
            pending: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, request: PendingRequest) {
        self.pending.push_back(request);
    }

    /// Tokens reserved by running requests.
    pub fn reserved_tokens(&self) -> usize {
        self.active_slots().map(|(_, s)| s.reserved_tokens()).sum()
    }

    /// Admit pending requests in FIFO order while slots and budget allow.
    ///
    /// An idle batcher always admits the head request so oversize requests
    /// cannot stall the queue.
    pub fn admit_pending(&mut self) -> Vec<RequestId> {
        let mut admitted = Vec::new();
        let mut reserved = self.reserved_tokens();

        for idx in 0..self.slots.len() {
            if self.slots[idx].is_some() {
                continue;
            }
            let Some(next) = self.pending.front() else {
                break;
            };
            let idle = reserved == 0;
            if !idle && reserved + next.reserved_tokens() > self.max_batched_tokens {
                break;
            }
            if let Some(request) = self.pending.pop_front() {
                reserved += request.reserved_tokens();
                admitted.push(request.request_id);
                self.slots[idx] = Some(BatchSlot::new(&request));
            }
        }
        admitted
    }

    /// Run one generation step over every active slot.
    ///
    /// Returns the number of tokens emitted, counting fan-out.
    pub fn step(&mut self) -> usize {
        let mut emitted = 0;
        for slot in self.slots.iter_mut().flatten() {
            let before = slot.tokens_generated;
            slot.step();
            emitted += (slot.tokens_generated - before) * slot.fan_out;
        }
        emitted
    }

    /// Evict completed requests, freeing slots.
    pub fn evict_completed(&mut self) -> Vec<RequestId> {
        let mut evicted = Vec::new();
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(BatchSlot::is_complete) {
                if let Some(s) = slot.take() {
                    evicted.push(s.request_id);
                }
            }
        }
        evicted
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn active_slots(&self) -> impl Iterator<Item = (usize, &BatchSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|slot| (i, slot)))
    }

    /// No active or pending requests.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0 && self.pending.is_empty()
    }
}
