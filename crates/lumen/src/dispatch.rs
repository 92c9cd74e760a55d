//! The dispatcher: executes replies and retries the ones that weren't
//! ready.
//!
//! ```text
//!   decoded reply ──► dispatch ──► execute ──┬── Success ──► done
//!                                            ├── Failed ───► warn, drop
//!                                            └── Reschedule ─► queue
//!                                                               │
//!   next frame ────► retry_pending ◄─────────────────────────────┘
//! ```
//!
//! Queued replies keep their decoded value, so a retry never re-reads the
//! wire. Each frame retries the queue before dispatching anything new,
//! which gives older replies the first chance once the world catches up.

use std::collections::VecDeque;
use std::time::Duration;

use lumen_protocol::ServerReply;
use lumen_world::World;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::config::duration_ms;
use crate::execute::{ExecContext, Execute, ExecutionResult};

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Limits on how long a rescheduled reply may keep waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Executions allowed per reply, the first one included.
    pub max_attempts: u32,
    /// Time since the reply was first dispatched after which it's dropped.
    #[serde(with = "duration_ms")]
    pub max_age: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 600,
            max_age: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    fn exhausted(&self, attempts: u32, age: Duration) -> bool {
        attempts >= self.max_attempts || age >= self.max_age
    }
}

// ---------------------------------------------------------------------------
// Outcomes and counters
// ---------------------------------------------------------------------------

/// What [`Dispatcher::dispatch`] did with a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Succeeded,
    Failed,
    /// Queued for a retry.
    Rescheduled,
    /// Rescheduled but out of attempts on the first try.
    Abandoned,
    /// The dispatcher is disconnected and took no action.
    Rejected,
}

/// Running totals since the dispatcher was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub succeeded: u64,
    pub failed: u64,
    /// Times a reply went (back) into the queue.
    pub rescheduled: u64,
    pub abandoned: u64,
    pub rejected: u64,
}

/// Result of one [`Dispatcher::retry_pending`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub abandoned: usize,
    /// Still queued after the pass.
    pub pending: usize,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Pending {
    reply: ServerReply,
    attempts: u32,
    first_seen: Instant,
}

#[derive(Debug)]
pub struct Dispatcher {
    queue: VecDeque<Pending>,
    policy: RetryPolicy,
    stats: DispatchStats,
    accepting: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl Dispatcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            queue: VecDeque::new(),
            policy,
            stats: DispatchStats::default(),
            accepting: true,
        }
    }

    /// Executes a freshly decoded reply once.
    pub fn dispatch<W: World>(&mut self, reply: ServerReply, cx: &mut ExecContext<'_, W>) -> DispatchOutcome {
        if !self.accepting {
            self.stats.rejected += 1;
            debug!(message = reply.name(), "dispatcher disconnected, rejecting reply");
            return DispatchOutcome::Rejected;
        }

        trace!(message = reply.name(), "dispatching");
        match reply.execute(cx) {
            ExecutionResult::Success => {
                self.stats.succeeded += 1;
                DispatchOutcome::Succeeded
            }
            ExecutionResult::Failed => {
                self.record_failure(&reply, 1);
                DispatchOutcome::Failed
            }
            ExecutionResult::Reschedule => {
                let entry = Pending {
                    reply,
                    attempts: 1,
                    first_seen: Instant::now(),
                };
                if self.requeue(entry) {
                    DispatchOutcome::Rescheduled
                } else {
                    DispatchOutcome::Abandoned
                }
            }
        }
    }

    /// Executes every reply that was queued when the call started, once
    /// each, oldest first.
    pub fn retry_pending<W: World>(&mut self, cx: &mut ExecContext<'_, W>) -> RetryReport {
        let mut report = RetryReport::default();
        if !self.accepting {
            return report;
        }

        // Replies re-queued by this pass land behind this boundary.
        for _ in 0..self.queue.len() {
            let Some(mut entry) = self.queue.pop_front() else {
                break;
            };
            entry.attempts += 1;
            report.attempted += 1;

            match entry.reply.execute(cx) {
                ExecutionResult::Success => {
                    self.stats.succeeded += 1;
                    report.succeeded += 1;
                    trace!(
                        message = entry.reply.name(),
                        attempts = entry.attempts,
                        "rescheduled reply applied"
                    );
                }
                ExecutionResult::Failed => {
                    self.record_failure(&entry.reply, entry.attempts);
                    report.failed += 1;
                }
                ExecutionResult::Reschedule => {
                    if !self.requeue(entry) {
                        report.abandoned += 1;
                    }
                }
            }
        }

        report.pending = self.queue.len();
        report
    }

    /// Puts a rescheduled reply at the back of the queue, or drops it if
    /// the policy is used up. Returns `true` if queued.
    fn requeue(&mut self, entry: Pending) -> bool {
        let age = entry.first_seen.elapsed();
        if self.policy.exhausted(entry.attempts, age) {
            self.stats.abandoned += 1;
            warn!(
                opcode = format!("0x{:02X}", entry.reply.opcode()),
                message = entry.reply.name(),
                attempts = entry.attempts,
                age_ms = age.as_millis() as u64,
                "giving up on rescheduled reply"
            );
            return false;
        }
        self.stats.rescheduled += 1;
        self.queue.push_back(entry);
        true
    }

    fn record_failure(&mut self, reply: &ServerReply, attempts: u32) {
        self.stats.failed += 1;
        warn!(
            opcode = format!("0x{:02X}", reply.opcode()),
            message = reply.name(),
            attempts,
            "reply failed to execute"
        );
    }

    /// Stops taking work and discards everything queued.
    pub fn on_disconnect(&mut self) {
        self.accepting = false;
        let discarded = self.queue.len();
        self.queue.clear();
        info!(discarded, "dispatcher disconnected");
    }

    /// Accepts work again after a reconnect.
    pub fn reset(&mut self) {
        self.accepting = true;
        self.queue.clear();
        debug!("dispatcher reset");
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Replies waiting for a retry.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Names of queued replies, oldest first.
    pub fn pending_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.queue.iter().map(|p| p.reply.name())
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}
