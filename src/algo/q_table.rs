use log::{debug, trace, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    env::{CellType, GridWorld, Move, Pos, NUM_ACTIONS},
    exploration::{Choice, EpsilonGreedy},
    util::{argmax_all, ensure_interval},
    Error, Result,
};

use super::{ActionTable, Step};

/// Probability of each action under the uniform policy
pub const UNIFORM_PROBABILITY: f32 = 1.0 / NUM_ACTIONS as f32;

/// Lower bound reported when no countable cell exists, for drivers that compare against
/// fixed bounds instead of handling [`None`]
pub const NO_DATA_MIN: f32 = 10_000_000.0;

/// Upper bound reported when no countable cell exists, see [`NO_DATA_MIN`]
pub const NO_DATA_MAX: f32 = -10_000_000.0;

/// Configuration for the [`LearningAgent`]
///
/// May be replaced between steps with [`LearningAgent::set_config`]; each step uses the
/// configuration current when it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningConfig {
    /// Learning rate, in `[0,1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// Discount factor, in `[0,1]`
    ///
    /// **Default**: `1.0`
    pub gamma: f32,
    /// Chance of taking a uniformly random action, in `[0,1]`
    ///
    /// **Default**: `0.1`
    pub epsilon: f32,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 1.0,
            epsilon: 0.1,
        }
    }
}

impl LearningConfig {
    /// **Errors** with [`Error::InvalidConfig`] naming the first value outside `[0,1]`
    pub fn validate(&self) -> Result<()> {
        let &Self {
            alpha,
            gamma,
            epsilon,
        } = self;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(())
    }
}

/// A Q-learning agent walking a [`GridWorld`] one step at a time
///
/// The agent owns the world it learns in; edit the map between steps through
/// [`LearningAgent::world_mut`] and reset the learned rows of any edited cell with
/// [`LearningAgent::reset_cell`].
///
/// ### Generics
/// - `R` - The source of randomness, seed it for reproducible runs
pub struct LearningAgent<R = StdRng> {
    world: GridWorld,
    config: LearningConfig,
    q_table: ActionTable,
    policy: ActionTable,
    position: Pos,
    rng: R,
}

impl LearningAgent<StdRng> {
    /// Initialize a new agent in the given world with an entropy-seeded random source
    ///
    /// **Errors** if any of `config`'s values is not in the interval `[0,1]`
    pub fn new(world: GridWorld, config: LearningConfig) -> Result<Self> {
        Self::with_rng(world, config, StdRng::from_entropy())
    }
}

impl<R: Rng> LearningAgent<R> {
    /// Initialize a new agent in the given world, drawing randomness from `rng`
    ///
    /// All action values start at 0, the policy starts uniform, and the agent starts at `(0, 0)`.
    ///
    /// **Errors** if any of `config`'s values is not in the interval `[0,1]`
    pub fn with_rng(world: GridWorld, config: LearningConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let (width, height) = (world.width(), world.height());
        Ok(Self {
            world,
            config,
            q_table: ActionTable::filled(width, height, 0.0),
            policy: ActionTable::filled(width, height, UNIFORM_PROBABILITY),
            position: (0, 0),
            rng,
        })
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    /// Mutable access to the map for editing between steps
    pub fn world_mut(&mut self) -> &mut GridWorld {
        &mut self.world
    }

    pub fn into_world(self) -> GridWorld {
        self.world
    }

    /// Swap in a different world, discarding everything learned and returning to `(0, 0)`
    pub fn load_world(&mut self, world: GridWorld) -> GridWorld {
        let (width, height) = (world.width(), world.height());
        self.q_table = ActionTable::filled(width, height, 0.0);
        self.policy = ActionTable::filled(width, height, UNIFORM_PROBABILITY);
        self.position = (0, 0);
        std::mem::replace(&mut self.world, world)
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// **Errors** if any of `config`'s values is not in the interval `[0,1]`, keeping the old one
    pub fn set_config(&mut self, config: LearningConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn position(&self) -> Pos {
        self.position
    }

    /// Teleport the agent, e.g. to place it by hand
    pub fn set_position(&mut self, pos: Pos) -> Result<()> {
        if !self.world.is_in_bounds(pos.0, pos.1) {
            return Err(self.out_of_bounds(pos));
        }
        self.position = pos;
        Ok(())
    }

    /// Action values, `q_table()[(x, y)][a]`
    pub fn q_table(&self) -> &ActionTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut ActionTable {
        &mut self.q_table
    }

    /// Action probabilities of the greedy policy, `policy_table()[(x, y)][a]`
    pub fn policy_table(&self) -> &ActionTable {
        &self.policy
    }

    pub fn policy_table_mut(&mut self) -> &mut ActionTable {
        &mut self.policy
    }

    /// Forget what was learned about one cell: zero values and a uniform policy
    pub fn reset_cell(&mut self, x: i32, y: i32) -> Result<()> {
        self.q_table.fill_row((x, y), 0.0)?;
        self.policy.fill_row((x, y), UNIFORM_PROBABILITY)
    }

    /// Run one learning iteration
    ///
    /// Respawns off a terminal cell if needed, picks an action, updates the value and the
    /// policy of the current cell, then moves.
    ///
    /// **Errors** with [`Error::NoRespawnCell`] if the agent stands on a terminal cell and
    /// every cell of the world is terminal
    pub fn advance(&mut self) -> Result<Step> {
        let respawned = self.respawn()?;
        let state = self.position;
        let action = self.select_action(state)?;
        let next_state = self.world.next_state(state, action);
        let reward = self.world.reward(state.0, state.1)?;

        self.update_value(state, action, reward, next_state)?;
        self.update_policy(state)?;
        self.position = next_state;

        trace!("{state:?} --{action:?}--> {next_state:?}, reward {reward}");
        Ok(Step {
            state,
            action,
            reward,
            next_state,
            respawned,
        })
    }

    /// Choose an action in `pos`: uniformly at random with probability epsilon, otherwise
    /// uniformly among the actions the policy rates most probable
    pub fn select_action(&mut self, pos: Pos) -> Result<Move> {
        let probabilities = *self.policy.row(pos)?;
        let exploration = EpsilonGreedy::new(self.config.epsilon)?;

        let index = match exploration.choose(&mut self.rng) {
            Choice::Explore => self.rng.gen_range(0..NUM_ACTIONS),
            Choice::Exploit => match argmax_all(&probabilities).choose(&mut self.rng) {
                Some(&i) => i,
                // only reachable if the driver wrote NaNs into the policy
                None => self.rng.gen_range(0..NUM_ACTIONS),
            },
        };

        Ok(Move::from_index(index).expect("index is below NUM_ACTIONS"))
    }

    /// One-step off-policy update of `Q(state, action)`, bootstrapping from the best value
    /// of `next_state`
    pub fn update_value(
        &mut self,
        state: Pos,
        action: Move,
        reward: f32,
        next_state: Pos,
    ) -> Result<()> {
        let LearningConfig { alpha, gamma, .. } = self.config;
        let max_next_q = self
            .q_table
            .row(next_state)?
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);

        let q = &mut self.q_table.row_mut(state)?[action.index()];
        *q += alpha * (reward + gamma * max_next_q - *q);
        Ok(())
    }

    /// Make the policy of `pos` greedy over its action values, splitting ties evenly
    pub fn update_policy(&mut self, pos: Pos) -> Result<()> {
        let winners = argmax_all(self.q_table.row(pos)?);
        let share = 1.0 / winners.len() as f32;

        let row = self.policy.row_mut(pos)?;
        for (a, p) in row.iter_mut().enumerate() {
            *p = if winners.contains(&a) { share } else { 0.0 };
        }
        Ok(())
    }

    /// The actions the current policy of `pos` rates most probable
    pub fn greedy_actions(&self, pos: Pos) -> Result<Vec<Move>> {
        Ok(argmax_all(self.policy.row(pos)?)
            .into_iter()
            .filter_map(Move::from_index)
            .collect())
    }

    /// Smallest action value over cells of type `countable`, or `None` if there are none
    pub fn min_value(&self, countable: CellType) -> Option<f32> {
        self.value_range(countable).map(|(min, _)| min)
    }

    /// Largest action value over cells of type `countable`, or `None` if there are none
    pub fn max_value(&self, countable: CellType) -> Option<f32> {
        self.value_range(countable).map(|(_, max)| max)
    }

    /// `(min, max)` action value over cells of type `countable`
    pub fn value_range(&self, countable: CellType) -> Option<(f32, f32)> {
        self.q_table
            .iter()
            .filter(|&((x, y), _)| self.world.cell_type(x, y) == Ok(countable))
            .flat_map(|(_, row)| row.iter().copied())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    fn respawn(&mut self) -> Result<bool> {
        let (x, y) = self.position;
        if !self.world.is_terminal(x, y) {
            return Ok(false);
        }

        let (width, height) = (self.world.width(), self.world.height());
        if self.world.count(CellType::Terminal) == width * height {
            warn!("every cell is terminal, cannot respawn");
            return Err(Error::NoRespawnCell);
        }

        while self.world.is_terminal(self.position.0, self.position.1) {
            self.position = (
                self.rng.gen_range(0..width) as i32,
                self.rng.gen_range(0..height) as i32,
            );
        }

        debug!("respawned from {:?} to {:?}", (x, y), self.position);
        Ok(true)
    }

    fn out_of_bounds(&self, (x, y): Pos) -> Error {
        Error::OutOfBounds {
            x,
            y,
            width: self.world.width(),
            height: self.world.height(),
        }
    }
}
