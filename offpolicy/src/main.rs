use anyhow::Result;
use clap::Parser;
use offpolicy::RunConfig;
use offpolicy_core::record::{AggregateRecorder, LogRecorder};
use offpolicy_tensorboard::TensorboardRecorder;

/// Train an exploring agent on the point-mass task
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file in YAML; defaults are used if not given
    #[arg(short, long)]
    config: Option<String>,

    /// Directory where the agent and the TensorBoard logs are saved
    #[arg(short, long, default_value = "./model/point_mass")]
    model_dir: String,

    /// Overrides the total number of environment steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Write records to TensorBoard instead of the log
    #[arg(short, long, default_value_t = false)]
    tensorboard: bool,

    /// Write the configuration to this file and exit
    #[arg(long)]
    save_config: Option<String>,
}

fn create_recorder(args: &Args) -> Box<dyn AggregateRecorder> {
    match args.tensorboard {
        true => Box::new(TensorboardRecorder::new(&args.model_dir)),
        false => Box::new(LogRecorder::new()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(max_steps) = args.max_steps {
        config.trainer = config.trainer.max_steps(max_steps);
    }
    config.trainer = config.trainer.model_dir(&args.model_dir);

    if let Some(path) = &args.save_config {
        config.save(path)?;
        return Ok(());
    }

    let mut recorder = create_recorder(&args);
    let (agent, _) = offpolicy::run(&config, recorder.as_mut())?;
    log::info!("Final critic: {}", agent.params().critic);

    Ok(())
}
