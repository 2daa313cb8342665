use std::time::{Duration, Instant};

/// Staged reveal of a card: word, then reading, then meaning, then example.
/// `start`, `cancel` and `finish` bump the generation and leave any scheduled
/// step in place; a step tagged with an older generation is dropped when
/// polled.
#[derive(Debug)]
pub struct RevealStepper {
    generation: u64,
    stage: usize,
    max_stage: usize,
    delay: Duration,
    pending: Option<PendingStep>,
}

#[derive(Clone, Copy, Debug)]
struct PendingStep {
    generation: u64,
    due: Instant,
}

impl RevealStepper {
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: 0,
            stage: 0,
            max_stage: 0,
            delay,
            pending: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn is_running(&self) -> bool {
        self.pending
            .is_some_and(|step| step.generation == self.generation)
    }

    pub fn is_complete(&self) -> bool {
        self.stage >= self.max_stage
    }

    /// Restart from stage 0, stepping up to `max_stage`.
    pub fn start(&mut self, max_stage: usize, now: Instant) {
        self.generation += 1;
        self.stage = 0;
        self.max_stage = max_stage;
        self.pending = (max_stage > 0).then(|| PendingStep {
            generation: self.generation,
            due: now + self.delay,
        });
    }

    /// Show nothing beyond stage 0 and stop stepping.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.stage = 0;
    }

    /// Jump straight to the last stage.
    pub fn finish(&mut self) {
        self.generation += 1;
        self.stage = self.max_stage;
    }

    /// Advance if a step is due. Returns true when the stage changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(step) = self.pending else {
            return false;
        };
        if step.generation != self.generation {
            self.pending = None;
            return false;
        }
        if now < step.due {
            return false;
        }

        self.stage += 1;
        self.pending = (self.stage < self.max_stage).then(|| PendingStep {
            generation: self.generation,
            due: now + self.delay,
        });
        true
    }
}
