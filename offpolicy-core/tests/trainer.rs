mod common;
use anyhow::Result;
use common::{
    AggregatingRecorder, Buffer, Call, CountingEvaluator, LineEnv, LineEnvConfig, RecordingAgent,
    StepProc,
};
use offpolicy_core::{
    error::OffpolicyError,
    record::{BufferedRecorder, NullRecorder},
    replay_buffer::{SimpleReplayBufferConfig, SimpleStepProcessorConfig},
    Agent, Env, ExperienceBufferBase, Phase, ReplayBufferBase, StepProcessor, Trainer,
    TrainerConfig,
};
use std::path::PathBuf;
use tempdir::TempDir;

struct Run {
    trainer: Trainer,
    agent: RecordingAgent,
    buffer: Buffer,
    recorder: BufferedRecorder,
    evaluator: CountingEvaluator,
}

fn run(config: TrainerConfig, env_config: LineEnvConfig) -> Result<Run> {
    let mut trainer = Trainer::build(config);
    let env = LineEnv::build(&env_config, 0)?;
    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut agent = RecordingAgent::default();
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(1000));
    let mut recorder = BufferedRecorder::new();
    let mut evaluator = CountingEvaluator::default();
    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut evaluator,
    )?;

    Ok(Run {
        trainer,
        agent,
        buffer,
        recorder,
        evaluator,
    })
}

fn config() -> TrainerConfig {
    TrainerConfig::default()
        .max_steps(200)
        .seed_steps(100)
        .unsup_steps(50)
        .unsup_gradient_update(2)
        .top_k(3)
        .reset_update(7)
        .eval_interval(1000)
}

#[test]
fn test_phase_boundaries() -> Result<()> {
    let Run { trainer, agent, .. } = run(config(), LineEnvConfig::terminal(1000))?;

    let state_ent = Call::StateEnt {
        gradient_update: 2,
        k: 3,
    };
    let after_reset = Call::UpdateAfterReset {
        gradient_update: 7,
        policy_update: true,
    };

    // Steps 0..100 are seed steps without update
    assert_eq!(agent.calls[0].0, 100);
    assert_eq!(agent.steps_of(&state_ent), (100..150).collect::<Vec<_>>());
    assert_eq!(agent.steps_of(&after_reset), vec![150]);
    assert_eq!(agent.steps_of(&Call::Update), (151..200).collect::<Vec<_>>());

    // The critic is reset right before the update at step 150
    assert_eq!(agent.critic_resets, vec![50]);
    assert_eq!(agent.calls[50], (150, after_reset));

    // The agent acts from step 100 on, always sampling
    assert_eq!(agent.acts.len(), 100);
    assert!(agent.acts.iter().all(|&sample| sample));

    assert!(trainer.reset_event().has_fired());
    assert_eq!(trainer.state().global_step, 200);
    assert_eq!(trainer.state().phase, Phase::Normal);
    Ok(())
}

#[test]
fn test_no_unsupervised_phase() -> Result<()> {
    let config = config().unsup_steps(0);
    let Run { trainer, agent, .. } = run(config, LineEnvConfig::terminal(1000))?;

    // The agent acts from step 100 on, updates start one step later
    assert_eq!(agent.acts.len(), 100);
    assert_eq!(agent.steps_of(&Call::Update), (101..200).collect::<Vec<_>>());
    assert_eq!(agent.count(|c| !matches!(c, Call::Update)), 0);
    assert!(agent.critic_resets.is_empty());
    assert_eq!(trainer.reset_event().at(), None);
    assert!(!trainer.reset_event().has_fired());
    Ok(())
}

#[test]
fn test_time_limit_is_bootstrapped() -> Result<()> {
    let config = config().unsup_steps(0);
    let Run {
        trainer,
        agent,
        buffer,
        ..
    } = run(config, LineEnvConfig::time_limit(50))?;

    assert_eq!(buffer.n_pushed(), 200);
    assert_eq!(buffer.num_done_flags(), 4);
    assert_eq!(buffer.num_truncated_flags(), 4);
    assert_eq!(trainer.state().episode_index, 4);
    assert_eq!(agent.n_resets, 4);
    Ok(())
}

#[test]
fn test_terminal_state_is_not_bootstrapped() -> Result<()> {
    let config = config().unsup_steps(0);
    let Run { buffer, .. } = run(config, LineEnvConfig::terminal(50))?;

    assert_eq!(buffer.num_done_flags(), 4);
    assert_eq!(buffer.num_truncated_flags(), 0);
    Ok(())
}

#[test]
fn test_records_and_checkpoints() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let model_dir = dir.path().to_path_buf();
    let config = TrainerConfig::default()
        .max_steps(120)
        .seed_steps(20)
        .unsup_steps(0)
        .eval_interval(50)
        .save_interval(60)
        .model_dir(model_dir.to_string_lossy());
    let env_config = LineEnvConfig {
        success_at: Some(3),
        ..LineEnvConfig::terminal(10)
    };
    let Run {
        trainer,
        agent,
        recorder,
        evaluator,
        ..
    } = run(config, env_config)?;

    // Every episode is flushed at its own boundary, seed phase included
    let episodes = recorder.scalars("train/episode");
    let expected = (1..=12).map(|i| (10 * i as i64, i as f32)).collect::<Vec<_>>();
    assert_eq!(episodes, expected);

    let rewards = recorder.scalars("train/episode_reward");
    assert_eq!(rewards.len(), 12);
    assert!(rewards.iter().all(|&(_, r)| r == 10.));

    let success = recorder.scalars("train/episode_success");
    assert_eq!(success.len(), 12);
    assert!(success.iter().all(|&(_, s)| s == 1.));

    // Evaluation at episode boundaries on multiples of eval_interval
    assert_eq!(evaluator.n_calls, 2);
    assert_eq!(
        recorder.scalars("eval/episode_reward"),
        vec![(50, 1.), (100, 2.)]
    );
    assert_eq!(recorder.scalars("eval/episode"), vec![(50, 5.), (100, 10.)]);
    assert!(!recorder.scalars("agent/loss").is_empty());
    assert!(recorder.pending().is_empty());

    let saved = agent.saved.borrow().clone();
    assert_eq!(
        saved,
        vec![
            (model_dir.join("best"), 50),
            (model_dir.join("60"), 60),
            (model_dir.join("best"), 100),
            (model_dir.join("120"), 120),
            (PathBuf::from(&model_dir), 120),
        ]
    );

    assert!(agent.is_train());
    assert_eq!(trainer.state().episode_index, 12);
    Ok(())
}

#[test]
fn test_success_not_reported() -> Result<()> {
    let config = config().unsup_steps(0);
    let Run { recorder, .. } = run(config, LineEnvConfig::terminal(10))?;

    assert!(!recorder.scalars("train/episode_reward").is_empty());
    assert!(recorder.scalars("train/episode_success").is_empty());
    Ok(())
}

#[test]
fn test_invalid_config() {
    for config in [
        config().seed_steps(0),
        config().eval_interval(0),
        config().unsup_steps(100),
    ] {
        let err = run(config, LineEnvConfig::terminal(10))
            .err()
            .expect("training should fail");
        assert!(matches!(
            err.downcast_ref::<OffpolicyError>(),
            Some(OffpolicyError::InvalidConfig(_))
        ));
    }
}

#[test]
fn test_train_without_records() -> Result<()> {
    let mut trainer = Trainer::build(config());
    let env = LineEnv::build(&LineEnvConfig::terminal(30), 0)?;
    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut agent = RecordingAgent::default();
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(50));
    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut NullRecorder::new(),
        &mut CountingEvaluator::default(),
    )?;

    // The buffer holds only the most recent transitions
    assert_eq!(buffer.len(), 50);
    assert_eq!(buffer.n_pushed(), 200);
    assert_eq!(agent.calls.len(), 100);
    Ok(())
}

#[test]
fn test_seed_phase_episodes_reported_individually() -> Result<()> {
    let config = TrainerConfig::default()
        .max_steps(60)
        .seed_steps(30)
        .unsup_steps(0)
        .eval_interval(1000);
    let mut trainer = Trainer::build(config);
    let env = LineEnv::build(&LineEnvConfig::terminal(10), 0)?;
    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut agent = RecordingAgent::default();
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(100));
    let mut recorder = AggregatingRecorder::default();
    trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut CountingEvaluator::default(),
    )?;

    let episodes = recorder
        .flushed
        .iter()
        .filter_map(|(step, record)| {
            let reward = record.get_scalar("train/episode_reward").ok()?;
            assert!(record.get("train/episode_reward_mean").is_none());
            Some((*step, record.get_scalar("train/episode").ok()?, reward))
        })
        .collect::<Vec<_>>();
    assert_eq!(
        episodes,
        (1..=6)
            .map(|i| (10 * i as i64, i as f32, 10.))
            .collect::<Vec<_>>()
    );
    Ok(())
}
