use log::{debug, info};
use rand::{rngs::StdRng, Rng};

use crate::{
    algo::{ActionRow, LearningAgent, LearningConfig, Step, NO_DATA_MAX, NO_DATA_MIN},
    env::{CellType, GridWorld},
    Result,
};

/// Configuration for the [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Learning iterations run by each [`Session::tick`]
    ///
    /// **Default**: `1`
    pub iterations_per_tick: u32,
    /// Record a point of the learning curve every this many iterations, `0` disables it
    ///
    /// **Default**: `1000`
    pub sample_every: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            iterations_per_tick: 1,
            sample_every: 1000,
        }
    }
}

/// Running totals of a training session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub iterations: u64,
    /// Steps that ended on a terminal cell
    pub episodes: u64,
}

impl Report {
    pub fn average_episode_length(&self) -> Option<f64> {
        (self.episodes > 0).then(|| self.iterations as f64 / self.episodes as f64)
    }
}

/// An edit applied to a single cell between learning steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEdit {
    Wall,
    /// Turn the cell back into open ground
    Clear,
    Terminal,
    Reward(f32),
    /// Teleport the agent onto the cell, leaving the map untouched
    MoveAgent,
}

/// Everything known about one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellReport {
    pub kind: CellType,
    pub reward: f32,
    pub values: ActionRow,
    pub policy: ActionRow,
}

/// Drives a [`LearningAgent`] the way an interactive front end does: a fixed number of
/// iterations per tick, episode bookkeeping, and map edits that forget stale values
pub struct Session<R = StdRng> {
    agent: LearningAgent<R>,
    config: SessionConfig,
    report: Report,
    history: Vec<(u64, f64)>,
}

impl Session<StdRng> {
    pub fn new(world: GridWorld, learning: LearningConfig, config: SessionConfig) -> Result<Self> {
        Ok(Self::with_agent(LearningAgent::new(world, learning)?, config))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_agent(agent: LearningAgent<R>, config: SessionConfig) -> Self {
        Self {
            agent,
            config,
            report: Report::default(),
            history: Vec::new(),
        }
    }

    pub fn agent(&self) -> &LearningAgent<R> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut LearningAgent<R> {
        &mut self.agent
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    /// Replace the learning configuration, effective from the next iteration
    pub fn set_learning_config(&mut self, config: LearningConfig) -> Result<()> {
        self.agent.set_config(config)
    }

    pub fn report(&self) -> Report {
        self.report
    }

    /// Learning curve as `(iterations, average episode length)` points
    pub fn history(&self) -> &[(u64, f64)] {
        &self.history
    }

    /// Run a single learning iteration
    pub fn step(&mut self) -> Result<Step> {
        let step = self.agent.advance()?;
        self.report.iterations += 1;

        let (x, y) = step.next_state;
        if self.agent.world().is_terminal(x, y) {
            self.report.episodes += 1;
            debug!(
                "episode {} finished at {:?} after {} iterations",
                self.report.episodes, step.next_state, self.report.iterations
            );
        }

        let every = self.config.sample_every;
        if every > 0 && self.report.iterations % every == 0 {
            if let Some(avg) = self.report.average_episode_length() {
                self.history.push((self.report.iterations, avg));
            }
        }

        Ok(step)
    }

    /// Run [`SessionConfig::iterations_per_tick`] iterations
    ///
    /// **Returns** the number of episodes finished during the tick
    pub fn tick(&mut self) -> Result<u64> {
        let before = self.report.episodes;
        for _ in 0..self.config.iterations_per_tick {
            self.step()?;
        }
        Ok(self.report.episodes - before)
    }

    /// Apply an edit to cell `(x, y)`
    ///
    /// Edits to the cell's type or reward also reset its learned values and policy.
    pub fn edit(&mut self, x: i32, y: i32, edit: MapEdit) -> Result<()> {
        let world = self.agent.world_mut();
        match edit {
            MapEdit::Wall => world.set_type(x, y, CellType::Wall)?,
            MapEdit::Clear => world.set_type(x, y, CellType::Open)?,
            MapEdit::Terminal => world.set_type(x, y, CellType::Terminal)?,
            MapEdit::Reward(r) => world.set_reward(x, y, r)?,
            MapEdit::MoveAgent => return self.agent.set_position((x, y)),
        }
        self.agent.reset_cell(x, y)?;
        debug!("applied {edit:?} at ({x}, {y})");
        Ok(())
    }

    pub fn inspect(&self, x: i32, y: i32) -> Result<CellReport> {
        let cell = *self.agent.world().cell(x, y)?;
        Ok(CellReport {
            kind: cell.kind,
            reward: cell.reward,
            values: *self.agent.q_table().row((x, y))?,
            policy: *self.agent.policy_table().row((x, y))?,
        })
    }

    /// Start over in a different world, clearing everything learned and the counters
    pub fn load_world(&mut self, world: GridWorld) {
        info!("loading a {}x{} world", world.width(), world.height());
        self.agent.load_world(world);
        self.report = Report::default();
        self.history.clear();
    }

    /// `(min, max)` action value over open cells, or `(NO_DATA_MIN, NO_DATA_MAX)` if there
    /// are none
    pub fn value_bounds(&self) -> (f32, f32) {
        self.agent
            .value_range(CellType::Open)
            .unwrap_or((NO_DATA_MIN, NO_DATA_MAX))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::{env::BuiltinMap, Error};

    fn session(world: GridWorld, config: SessionConfig) -> Session<StdRng> {
        let agent = LearningAgent::with_rng(
            world,
            LearningConfig::default(),
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        Session::with_agent(agent, config)
    }

    #[test]
    fn tick_runs_configured_iterations() {
        let config = SessionConfig {
            iterations_per_tick: 25,
            sample_every: 0,
        };
        let mut session = session(BuiltinMap::Tiny.build().unwrap(), config);
        session.tick().unwrap();
        session.tick().unwrap();
        assert_eq!(session.report().iterations, 50);
        assert!(session.history().is_empty(), "Sampling disabled");
    }

    #[test]
    fn counts_episodes() {
        // Every step from the open cell either bumps or lands on a terminal
        let world: GridWorld = "T C:-1 T".parse().unwrap();
        let mut session = session(world, SessionConfig::default());
        session.agent_mut().set_position((1, 0)).unwrap();

        let mut finished = 0;
        for _ in 0..200 {
            let step = session.step().unwrap();
            if step.next_state != (1, 0) {
                finished += 1;
            }
        }

        let report = session.report();
        assert_eq!(report.episodes, finished);
        assert!(report.episodes > 0);
        assert_eq!(
            report.average_episode_length(),
            Some(200.0 / finished as f64)
        );
    }

    #[test]
    fn records_learning_curve() {
        let config = SessionConfig {
            iterations_per_tick: 500,
            sample_every: 100,
        };
        let mut session = session(BuiltinMap::Tiny.build().unwrap(), config);
        for _ in 0..4 {
            session.tick().unwrap();
        }

        let history = session.history();
        assert!(!history.is_empty());
        assert!(history.len() <= 20);
        assert!(history.iter().all(|&(i, _)| i % 100 == 0));
        assert!(history.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn edits_reset_learned_rows() {
        let mut session = session(BuiltinMap::Tiny.build().unwrap(), SessionConfig::default());
        for _ in 0..1000 {
            session.step().unwrap();
        }
        session.agent_mut().q_table_mut()[(1, 0)] = [-3.0; 4];

        session.edit(1, 0, MapEdit::Reward(-7.0)).unwrap();
        let cell = session.inspect(1, 0).unwrap();
        assert_eq!(cell.reward, -7.0);
        assert_eq!(cell.values, [0.0; 4]);
        assert_eq!(cell.policy, [0.25; 4]);

        session.edit(1, 0, MapEdit::Wall).unwrap();
        assert_eq!(session.inspect(1, 0).unwrap().kind, CellType::Wall);
        session.edit(1, 0, MapEdit::Clear).unwrap();
        assert_eq!(session.inspect(1, 0).unwrap().kind, CellType::Open);
        session.edit(0, 0, MapEdit::Terminal).unwrap();
        assert!(session.agent().world().is_terminal(0, 0));

        session.edit(2, 2, MapEdit::MoveAgent).unwrap();
        assert_eq!(session.agent().position(), (2, 2));

        assert!(matches!(
            session.edit(9, 9, MapEdit::Wall),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(session.inspect(-1, 0).is_err());
    }

    #[test]
    fn load_world_starts_over() {
        let mut session = session(BuiltinMap::Tiny.build().unwrap(), SessionConfig::default());
        for _ in 0..300 {
            session.step().unwrap();
        }
        session.load_world(BuiltinMap::Mini.build().unwrap());

        assert_eq!(session.report(), Report::default());
        assert_eq!(session.agent().position(), (0, 0));
        assert_eq!(session.agent().q_table().width(), 6);
        assert_eq!(session.value_bounds(), (0.0, 0.0));
    }

    #[test]
    fn value_bounds_sentinels() {
        let world: GridWorld = "S:-1 T".parse().unwrap();
        let session = session(world, SessionConfig::default());
        assert_eq!(session.value_bounds(), (NO_DATA_MIN, NO_DATA_MAX));
    }
}
