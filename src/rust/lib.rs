//! A small multinomial Naive Bayes engine that guesses which social platform a
//! short post was written for.
//!
//! The model (vocabulary, class log-priors and per-class feature
//! log-probabilities) is loaded once, validated, and then shared read-only.
//! Text is lowercased, split on non-word characters, counted against the
//! vocabulary and scored per class; the best-scoring label wins.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use platform_detector::{PlatformDetector, DetectorConfig};
//!
//! let detector = PlatformDetector::new(DetectorConfig::default());
//! detector.load()?;
//!
//! let label = detector.predict("Swipe up on my story for the new reel")?;
//! println!("Predicted platform: {}", label);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Once loaded, the detector can be shared across threads using `Arc`:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use platform_detector::PlatformDetector;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let detector = Arc::new(PlatformDetector::default());
//! detector.load()?;
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let detector = Arc::clone(&detector);
//!     handles.push(thread::spawn(move || {
//!         detector.predict("upvote if you agree").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod detector;
pub mod model_manager;
pub mod models;

pub use classifier::{
    Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, CountVector, ModelBundle,
    NaiveBayesModel, TextVectorizer, Vocabulary,
};
pub use config::{DetectorConfig, ModelSource};
pub use detector::{DetectorState, PlatformDetector};
pub use model_manager::{ModelManager, ModelError};
pub use models::{BuiltinModel, ModelInfo};

/// Installs `env_logger`, filtered by `RUST_LOG`. Call once per process.
pub fn init_logger() {
    env_logger::init();
}
