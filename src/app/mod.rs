//! Application layer with dependency injection container.
//!
//! The container owns the snapshot repository and builds predictors from
//! configuration, following hexagonal architecture principles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │           App (DI Container)         │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ owns                      │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Infrastructure (adapters)           │   │
//! │  │  - MsgPackRepository                 │   │
//! │  │  - InMemoryRepository (testing)      │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Ports (ports)                │   │
//! │  │  - SnapshotRepository trait          │   │
//! │  │  - Predictor / Opponent traits       │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                   │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - Random / Markov predictors        │   │
//! │  │  - QLearningPredictor                │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use rps_predictor::app::{App, PredictorConfig, PredictorKind};
//! use rps_predictor::adapters::InMemoryRepository;
//!
//! let app = App::for_testing()
//!     .with_repository(InMemoryRepository::new())
//!     .with_default_seed(42)
//!     .build();
//! let predictor = app.create_predictor(&PredictorConfig::new(PredictorKind::Random))?;
//! # Ok::<(), rps_predictor::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{MarkovConfig, PredictorConfig, PredictorKind, QLearningConfig};
pub use container::{App, AppBuilder, DEFAULT_SNAPSHOT_DIR};
