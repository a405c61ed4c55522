use rand::Rng;

use crate::{algo::LearningAgent, env::CellType};

/// The greedy policy as a character grid, one line per row
///
/// Walls are `#`, terminals `T`, the agent `@`, cells with a single greedy action show its
/// arrow and cells with tied actions show `+`.
pub fn policy_grid<R: Rng>(agent: &LearningAgent<R>) -> String {
    let world = agent.world();
    let mut out = String::with_capacity((world.width() + 1) * world.height());

    for y in 0..world.height() as i32 {
        for x in 0..world.width() as i32 {
            let symbol = match world.cell_type(x, y) {
                _ if agent.position() == (x, y) => '@',
                Ok(CellType::Wall) => '#',
                Ok(CellType::Terminal) => 'T',
                _ => match agent.greedy_actions((x, y)).as_deref() {
                    Ok([single]) => single.arrow(),
                    _ => '+',
                },
            };
            out.push(symbol);
        }
        out.push('\n');
    }

    out
}

/// The best action value of every cell, walls and terminals blanked out
pub fn value_grid<R: Rng>(agent: &LearningAgent<R>) -> String {
    let world = agent.world();
    let mut out = String::new();

    for y in 0..world.height() as i32 {
        let cells = (0..world.width() as i32)
            .map(|x| match world.cell_type(x, y) {
                Ok(CellType::Wall | CellType::Terminal) => format!("{:>8}", "."),
                _ => {
                    let best = agent.q_table()[(x, y)]
                        .iter()
                        .copied()
                        .fold(f32::NEG_INFINITY, f32::max);
                    format!("{best:>8.2}")
                }
            })
            .collect::<String>();
        out.push_str(&cells);
        out.push('\n');
    }

    out
}
