use std::time::{Duration, Instant};

/// Token bucket guarding one socket's inbound frames
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: u32,
    max_tokens: u32,
    refill_rate: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        // 30 frame burst, one token back every 500ms
        Self::new_with_limits(30, Duration::from_millis(500))
    }

    pub fn new_with_limits(max_tokens: u32, refill_rate: Duration) -> Self {
        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    pub fn check_rate_limit(&mut self) -> bool {
        self.refill_tokens();

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill_tokens(&mut self) {
        let time_passed = self.last_refill.elapsed();
        let refill_ms = self.refill_rate.as_millis().max(1);
        let tokens_to_add = (time_passed.as_millis() / refill_ms) as u32;

        if tokens_to_add > 0 {
            self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.max_tokens);
            self.last_refill += self.refill_rate * tokens_to_add;
        }
    }

    pub fn remaining_tokens(&mut self) -> u32 {
        self.refill_tokens();
        self.tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
