//! Move acceptance strategies for the local search.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Temperature floor preventing the Metropolis ratio from degenerating.
const MIN_TEMPERATURE: f64 = 1e-9;

/// Decides whether an evaluated move is taken. The simulated-annealing
/// variant owns its PRNG so acceptance draws are reproducible per seed and
/// independent of any other randomness in the engine.
#[derive(Debug)]
pub enum Acceptance {
    /// Accept strictly improving moves only.
    Greedy,
    /// Metropolis criterion with geometric cooling.
    SimulatedAnnealing {
        temperature: f64,
        cooling_rate: f64,
        rng: ChaCha8Rng,
    },
}

impl Acceptance {
    pub fn greedy() -> Self {
        Acceptance::Greedy
    }

    pub fn simulated_annealing(initial_temperature: f64, cooling_rate: f64, seed: u64) -> Self {
        Acceptance::SimulatedAnnealing {
            temperature: initial_temperature,
            cooling_rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Accept or reject a move with improvement `delta` (positive = the
    /// objective goes down). Worsening moves draw once from the owned PRNG;
    /// zero-delta moves are always rejected to avoid plateau cycling.
    pub fn accept(&mut self, delta: f64) -> bool {
        match self {
            Acceptance::Greedy => delta > 0.0,
            Acceptance::SimulatedAnnealing {
                temperature, rng, ..
            } => {
                if delta > 0.0 {
                    return true;
                }
                if delta == 0.0 {
                    return false;
                }
                let probability = (delta / *temperature).exp();
                rng.gen::<f64>() < probability
            }
        }
    }

    /// Multiply the temperature by the cooling rate. Called once per outer
    /// local-search iteration, not per move. No-op for greedy acceptance.
    pub fn cool_down(&mut self) {
        if let Acceptance::SimulatedAnnealing {
            temperature,
            cooling_rate,
            ..
        } = self
        {
            *temperature = (*temperature * *cooling_rate).max(MIN_TEMPERATURE);
        }
    }

    /// Current temperature, if annealing.
    pub fn temperature(&self) -> Option<f64> {
        match self {
            Acceptance::Greedy => None,
            Acceptance::SimulatedAnnealing { temperature, .. } => Some(*temperature),
        }
    }

    /// Whether the neighborhood visiting order should be shuffled between
    /// iterations.
    pub fn shuffles_neighborhoods(&self) -> bool {
        matches!(self, Acceptance::SimulatedAnnealing { .. })
    }
}
