use std::{error::Error, fs, path::Path};

use gridworld_rl::{
    algo::LearningConfig,
    env::BuiltinMap,
    render,
    session::{Session, SessionConfig},
};

const NUM_TICKS: u32 = 200;

fn main() -> Result<(), Box<dyn Error>> {
    let path = Path::new("demos/out");

    let world = BuiltinMap::Default.build()?;
    let learning = LearningConfig {
        alpha: 0.1,
        gamma: 1.0,
        epsilon: 0.1,
    };
    let mut session = Session::new(
        world,
        learning,
        SessionConfig {
            iterations_per_tick: 1000,
            sample_every: 1000,
        },
    )?;

    fs::create_dir_all(path)?;
    let mut wtr = csv::Writer::from_path(path.join("learning_curve.csv"))?;
    wtr.write_record(["iterations", "average_episode_length"])?;

    for _ in 0..NUM_TICKS {
        session.tick()?;
    }
    for &(iterations, avg) in session.history() {
        wtr.write_record(&[iterations.to_string(), avg.to_string()])?;
    }
    wtr.flush()?;

    let report = session.report();
    let (min, max) = session.value_bounds();
    println!(
        "{} iterations, {} episodes, values in [{min:.2}, {max:.2}]",
        report.iterations, report.episodes
    );
    println!("{}", render::policy_grid(session.agent()));
    println!("{}", render::value_grid(session.agent()));

    Ok(())
}
