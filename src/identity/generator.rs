use ahash::AHashSet;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Produces session-unique identifiers of the form `{prefix}_{millis}_{count}_{suffix}`.
///
/// The counter is atomic and the randomness source sits behind a mutex, so one
/// generator can be shared across threads. Tests use [`IdGenerator::seeded`] for a
/// reproducible suffix stream.
#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU64,
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            counter: AtomicU64::new(0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The process-wide generator used when a pipeline is built without one.
    pub fn shared() -> Arc<IdGenerator> {
        static SHARED: OnceLock<Arc<IdGenerator>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(IdGenerator::new())).clone()
    }

    pub fn generate(&self, prefix: &str) -> String {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let millis = Utc::now().timestamp_millis();
        format!("{}_{}_{}_{}", prefix, millis, count, self.suffix())
    }

    /// Generates ids until one is absent from `taken`.
    pub fn generate_avoiding(&self, prefix: &str, taken: &AHashSet<String>) -> String {
        loop {
            let id = self.generate(prefix);
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    /// Number of ids handed out since creation or the last reset.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }

    fn suffix(&self) -> String {
        // A poisoned lock still holds a usable rng.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
