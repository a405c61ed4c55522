mod q_table;
mod step;
mod table;

pub use q_table::{
    LearningAgent, LearningConfig, NO_DATA_MAX, NO_DATA_MIN, UNIFORM_PROBABILITY,
};
pub use step::Step;
pub use table::{ActionRow, ActionTable};
