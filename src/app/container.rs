//! Dependency injection container for the predictor application.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for creating predictors.

use std::{path::PathBuf, sync::Arc};

use log::info;

use super::config::{MarkovConfig, PredictorConfig, PredictorKind, QLearningConfig};
use crate::{
    Result,
    adapters::MsgPackRepository,
    pipeline::{TrainingPipeline, TrainingResult},
    ports::{Predictor, SnapshotRepository},
    predictors::{MarkovPredictor, RandomPredictor},
    q_learning::{QLearningPredictor, SharedRepository},
};

/// Directory used by the production snapshot store.
pub const DEFAULT_SNAPSHOT_DIR: &str = "snapshots";

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use rps_predictor::app::{App, PredictorConfig, PredictorKind};
///
/// let app = App::new();
/// let mut predictor = app.create_predictor(&PredictorConfig::new(PredictorKind::Markov))?;
/// let ai_move = predictor.predict();
/// # Ok::<(), rps_predictor::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use rps_predictor::app::App;
/// use rps_predictor::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for Q-learning snapshots
    snapshot_repository: SharedRepository,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` rooted at `./snapshots`
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self::with_snapshot_dir(DEFAULT_SNAPSHOT_DIR)
    }

    /// Production app storing snapshots under `dir`.
    pub fn with_snapshot_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            snapshot_repository: Arc::new(MsgPackRepository::new(dir)),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn snapshot_repository(&self) -> SharedRepository {
        Arc::clone(&self.snapshot_repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Create any predictor. An untrained Q-learner is trained first.
    pub fn create_predictor(&self, config: &PredictorConfig) -> Result<Box<dyn Predictor>> {
        config.validate()?;
        let seed = config.seed.or(self.default_seed);

        Ok(match config.kind {
            PredictorKind::Random => {
                let predictor = RandomPredictor::new();
                Box::new(match seed {
                    Some(seed) => predictor.with_seed(seed),
                    None => predictor,
                })
            }
            PredictorKind::Markov => {
                let markov = match seed {
                    Some(seed) => config.markov.with_seed(seed),
                    None => config.markov,
                };
                Box::new(self.create_markov(&markov)?)
            }
            PredictorKind::QLearning => {
                let q_learning = match seed {
                    Some(seed) => config.q_learning.with_seed(seed),
                    None => config.q_learning,
                };
                let (mut learner, _) = self.prepare_q_learner(&q_learning)?;
                learner.reset();
                Box::new(learner)
            }
        })
    }

    pub fn create_markov(&self, config: &MarkovConfig) -> Result<MarkovPredictor> {
        let predictor = MarkovPredictor::new(config.order)?;
        Ok(match config.seed.or(self.default_seed) {
            Some(seed) => predictor.with_seed(seed),
            None => predictor,
        })
    }

    /// Open a Q-learner from the snapshot store without training it.
    pub fn create_q_learner(&self, config: &QLearningConfig) -> Result<QLearningPredictor> {
        let mut params = config.hyperparameters();
        params.seed = params.seed.or(self.default_seed);
        QLearningPredictor::open(params, self.snapshot_repository())
    }

    /// Open a Q-learner and train it against the configured opponent unless
    /// a snapshot already made it trained.
    ///
    /// The training result is `None` when no training happened.
    pub fn prepare_q_learner(
        &self,
        config: &QLearningConfig,
    ) -> Result<(QLearningPredictor, Option<TrainingResult>)> {
        let mut learner = self.create_q_learner(config)?;
        if learner.is_trained() {
            info!(
                "Using stored Q-table ({} episodes, epsilon {:.4})",
                learner.episodes(),
                learner.epsilon()
            );
            return Ok((learner, None));
        }

        let mut training = config.training();
        training.seed = training.seed.or(self.default_seed);
        let mut opponent = config.training_opponent.build(None)?;
        let result = TrainingPipeline::new(training).run(&mut learner, opponent.as_mut())?;
        Ok((learner, result))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    snapshot_repository: Option<SharedRepository>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            snapshot_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom snapshot repository.
    pub fn with_repository<R: SnapshotRepository + Send + Sync + 'static>(
        mut self,
        repo: R,
    ) -> Self {
        self.snapshot_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for every predictor created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` at the
    /// default directory.
    pub fn build(self) -> App {
        App {
            snapshot_repository: self
                .snapshot_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new(DEFAULT_SNAPSHOT_DIR))),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, opponents::OpponentKind};

    fn app(repo: InMemoryRepository) -> App {
        App::for_testing()
            .with_repository(repo)
            .with_default_seed(42)
            .build()
    }

    #[test]
    fn test_app_creates_each_kind() {
        let app = app(InMemoryRepository::new());
        for (kind, name) in [
            (PredictorKind::Random, "Random"),
            (PredictorKind::Markov, "Markov"),
        ] {
            let predictor = app.create_predictor(&PredictorConfig::new(kind)).unwrap();
            assert_eq!(predictor.name(), name);
        }
    }

    #[test]
    fn test_default_seed_makes_predictors_reproducible() {
        let app = app(InMemoryRepository::new());
        let config = PredictorConfig::new(PredictorKind::Random);
        let mut a = app.create_predictor(&config).unwrap();
        let mut b = app.create_predictor(&config).unwrap();
        let moves_a: Vec<_> = (0..20).map(|_| a.predict()).collect();
        let moves_b: Vec<_> = (0..20).map(|_| b.predict()).collect();
        assert_eq!(moves_a, moves_b);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let app = app(InMemoryRepository::new());
        let config =
            PredictorConfig::new(PredictorKind::Markov).with_markov(MarkovConfig::new(0));
        assert!(app.create_predictor(&config).is_err());
    }

    #[test]
    fn test_q_learner_trains_once_then_loads() {
        let repo = InMemoryRepository::new();
        let app = app(repo.clone());
        let config = QLearningConfig::default().with_training(300, OpponentKind::Cycle);

        let (first, result) = app.prepare_q_learner(&config).unwrap();
        assert!(first.is_trained());
        assert_eq!(result.unwrap().episodes, 300);
        assert_eq!(repo.count(), 1);

        let (second, result) = app.prepare_q_learner(&config).unwrap();
        assert!(result.is_none());
        assert_eq!(second.episodes(), 300);
    }

    #[test]
    fn test_created_q_predictor_starts_with_empty_record() {
        let app = app(InMemoryRepository::new());
        let config = PredictorConfig::new(PredictorKind::QLearning)
            .with_q_learning(QLearningConfig::default().with_training(50, OpponentKind::Uniform));
        let predictor = app.create_predictor(&config).unwrap();
        assert_eq!(predictor.name(), "Q-Learning");
        assert!(predictor.record().is_empty());
    }
}
