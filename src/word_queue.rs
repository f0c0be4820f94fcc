use rand::Rng;
use std::collections::HashSet;

/// How the next word is drawn from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    Random { no_repeat: bool },
    Sequential,
}

/// Bounded rejection sampling: after this many used-index draws a repeat is
/// accepted rather than looping.
const MAX_DRAW_ATTEMPTS: u32 = 1000;

/// Holds the session word pool and serves the next word under a policy.
#[derive(Debug)]
pub struct WordQueue {
    pool: Vec<String>,
    policy: SelectionPolicy,
    used: HashSet<usize>,
    cursor: usize,
}

impl WordQueue {
    pub fn new(pool: Vec<String>, policy: SelectionPolicy) -> Self {
        Self {
            pool,
            policy,
            used: HashSet::new(),
            cursor: 0,
        }
    }

    /// Forget served words; called when a fresh session starts.
    pub fn reset(&mut self) {
        self.used.clear();
        self.cursor = 0;
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn used_len(&self) -> usize {
        self.used.len()
    }

    /// Next word, or an empty-string sentinel when the pool is empty.
    pub fn next_word(&mut self) -> String {
        if self.pool.is_empty() {
            return String::new();
        }
        match self.policy {
            SelectionPolicy::Sequential => {
                let idx = self.cursor % self.pool.len();
                self.cursor = (self.cursor + 1) % self.pool.len();
                self.pool[idx].clone()
            }
            SelectionPolicy::Random { no_repeat } => {
                if no_repeat && self.used.len() >= self.pool.len() {
                    self.used.clear();
                }
                let mut rng = rand::thread_rng();
                let mut idx;
                let mut attempts = 0;
                loop {
                    idx = rng.gen_range(0..self.pool.len());
                    attempts += 1;
                    if !no_repeat || !self.used.contains(&idx) || attempts > MAX_DRAW_ATTEMPTS {
                        break;
                    }
                }
                self.used.insert(idx);
                self.pool[idx].clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_pool_yields_sentinel() {
        let mut q = WordQueue::new(vec![], SelectionPolicy::Sequential);
        assert_eq!(q.next_word(), "");
        let mut q = WordQueue::new(vec![], SelectionPolicy::Random { no_repeat: true });
        assert_eq!(q.next_word(), "");
    }

    #[test]
    fn test_sequential_cycles_in_order() {
        let mut q = WordQueue::new(pool(&["cat", "dog", "fox"]), SelectionPolicy::Sequential);
        let drawn: Vec<String> = (0..7).map(|_| q.next_word()).collect();
        assert_eq!(drawn, ["cat", "dog", "fox", "cat", "dog", "fox", "cat"]);
    }

    #[test]
    fn test_random_draws_from_pool() {
        let mut q = WordQueue::new(
            pool(&["cat", "dog"]),
            SelectionPolicy::Random { no_repeat: false },
        );
        for _ in 0..20 {
            let w = q.next_word();
            assert!(w == "cat" || w == "dog");
        }
    }

    #[test]
    fn test_no_repeat_is_permutation_per_cycle() {
        let words = ["a", "b", "c", "d", "e"];
        let mut q = WordQueue::new(pool(&words), SelectionPolicy::Random { no_repeat: true });
        for _ in 0..4 {
            let cycle: HashSet<String> = (0..words.len()).map(|_| q.next_word()).collect();
            assert_eq!(cycle.len(), words.len(), "each full cycle is a permutation");
        }
    }

    #[test]
    fn test_no_repeat_used_never_exceeds_pool() {
        let mut q = WordQueue::new(
            pool(&["a", "b", "c"]),
            SelectionPolicy::Random { no_repeat: true },
        );
        for _ in 0..10 {
            q.next_word();
            assert!(q.used_len() <= q.pool_len());
        }
    }

    #[test]
    fn test_reset_clears_session_memory() {
        let mut q = WordQueue::new(pool(&["a", "b"]), SelectionPolicy::Random { no_repeat: true });
        q.next_word();
        q.next_word();
        q.reset();
        assert_eq!(q.used_len(), 0);
    }

    #[test]
    fn test_sequential_ignores_used_set() {
        let mut q = WordQueue::new(pool(&["x", "y"]), SelectionPolicy::Sequential);
        q.next_word();
        q.next_word();
        q.next_word();
        assert_eq!(q.used_len(), 0);
    }
}
