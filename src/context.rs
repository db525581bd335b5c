//! Match context: the clock and the toss coin a session runs against

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::traits::CoinSource;
use crate::types::CoinFace;

/// Coin backed by thread-local entropy
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyCoin;

impl CoinSource for EntropyCoin {
    fn flip(&mut self) -> CoinFace {
        if rand::thread_rng().gen_bool(0.5) {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        }
    }
}

/// Seeded coin for reproducible tosses
#[derive(Debug)]
pub struct SeededCoin {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededCoin {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Clone for SeededCoin {
    fn clone(&self) -> Self {
        // Restart from the seed so clones replay the same flips
        Self::new(self.seed)
    }
}

impl CoinSource for SeededCoin {
    fn flip(&mut self) -> CoinFace {
        if self.rng.gen_bool(0.5) {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        }
    }
}

/// Coin that always lands on the same face
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub CoinFace);

impl CoinSource for FixedCoin {
    fn flip(&mut self) -> CoinFace {
        self.0
    }
}

/// Clock used to timestamp log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchClock {
    System,
    /// Frozen time, for reproducible logs
    Fixed(DateTime<Utc>),
}

impl MatchClock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            MatchClock::System => Utc::now(),
            MatchClock::Fixed(time) => *time,
        }
    }
}

/// Collaborators injected into a scoring session
#[derive(Debug)]
pub struct MatchContext {
    clock: MatchClock,
    coin: Box<dyn CoinSource>,
}

impl MatchContext {
    /// Start building a context
    pub fn builder() -> MatchContextBuilder {
        MatchContextBuilder::new()
    }

    /// Current time on the session clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Mutable access to the toss coin
    pub fn coin(&mut self) -> &mut dyn CoinSource {
        self.coin.as_mut()
    }
}

impl Default for MatchContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for match contexts
#[derive(Debug, Default)]
pub struct MatchContextBuilder {
    clock: Option<MatchClock>,
    coin: Option<Box<dyn CoinSource>>,
}

impl MatchContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixed_time(mut self, time: DateTime<Utc>) -> Self {
        self.clock = Some(MatchClock::Fixed(time));
        self
    }

    pub fn with_coin(mut self, coin: impl CoinSource + 'static) -> Self {
        self.coin = Some(Box::new(coin));
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_coin(SeededCoin::new(seed))
    }

    /// Missing pieces default to the system clock and an entropy coin
    pub fn build(self) -> MatchContext {
        MatchContext {
            clock: self.clock.unwrap_or(MatchClock::System),
            coin: self.coin.unwrap_or_else(|| Box::new(EntropyCoin)),
        }
    }
}
