//! Attempt bookkeeping for the reconnect loop.

/// What the reconnect loop does after a connection ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Wait the configured delay, then run reconnect attempt `n` (1-based).
    Attempt(u32),
    /// The limit is spent; `attempts` reconnects were made since the last join.
    GiveUp { attempts: u32 },
}

/// Counts reconnect attempts since the last connection that joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectBudget {
    limit: Option<u32>,
    attempts: u32,
}

impl ReconnectBudget {
    /// `None` retries forever.
    pub fn new(limit: Option<u32>) -> Self {
        Self { limit, attempts: 0 }
    }

    /// Reconnects made since the last join.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// A connection reached `connect`; the next loss starts a fresh count.
    pub fn joined(&mut self) {
        self.attempts = 0;
    }

    /// A connection ended or failed to open.
    pub fn next(&mut self) -> Retry {
        let attempt = self.attempts.saturating_add(1);
        if self.limit.is_some_and(|max| attempt > max) {
            return Retry::GiveUp {
                attempts: self.attempts,
            };
        }
        self.attempts = attempt;
        Retry::Attempt(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_budget_never_gives_up() {
        let mut budget = ReconnectBudget::new(None);
        for n in 1..=100 {
            assert_eq!(budget.next(), Retry::Attempt(n));
        }
    }

    #[test]
    fn limit_counts_reconnects_not_the_first_connection() {
        let mut budget = ReconnectBudget::new(Some(2));
        assert_eq!(budget.next(), Retry::Attempt(1));
        assert_eq!(budget.next(), Retry::Attempt(2));
        assert_eq!(budget.next(), Retry::GiveUp { attempts: 2 });
        assert_eq!(budget.next(), Retry::GiveUp { attempts: 2 });
    }

    #[test]
    fn zero_limit_gives_up_without_reconnecting() {
        let mut budget = ReconnectBudget::new(Some(0));
        assert_eq!(budget.next(), Retry::GiveUp { attempts: 0 });
    }

    #[test]
    fn join_resets_the_count() {
        let mut budget = ReconnectBudget::new(Some(2));
        budget.next();
        budget.next();
        budget.joined();
        assert_eq!(budget.attempts(), 0);
        assert_eq!(budget.next(), Retry::Attempt(1));
        assert_eq!(budget.next(), Retry::Attempt(2));
        assert_eq!(budget.next(), Retry::GiveUp { attempts: 2 });
    }

    #[test]
    fn failures_without_a_join_keep_counting() {
        let mut budget = ReconnectBudget::new(Some(3));
        assert_eq!(budget.next(), Retry::Attempt(1));
        assert_eq!(budget.next(), Retry::Attempt(2));
        assert_eq!(budget.attempts(), 2);
        assert_eq!(budget.next(), Retry::Attempt(3));
        assert_eq!(budget.next(), Retry::GiveUp { attempts: 3 });
    }
}
