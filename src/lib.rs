//! # reaper
//!
//! Plugin-hook dispatch runtime for a detect, score, act pipeline over
//! typed signal records.
//!
//! - [`reaper_core`]: data contracts, errors, configuration, logging setup
//! - [`reaper_plugin`]: hook table, handler traits, registry, dispatcher
//! - [`reaper_pipeline`]: reference plugins for every hook
//!
//! ```rust,no_run
//! use reaper::prelude::*;
//!
//! # async fn run() -> ReaperResult<()> {
//! let manager = PluginManager::new();
//! reaper::reaper_pipeline::register_stubs(&manager)?;
//!
//! for signal in manager.detect_sight("camera-1").await.into_result()? {
//!     for scored in manager.score_signal(&signal).await.into_result()? {
//!         let results = manager.execute_action(&scored).await.into_result()?;
//!         println!("{} actions for {}", results.len(), scored.signal().source());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub use reaper_core;
pub use reaper_pipeline;
pub use reaper_plugin;

pub use reaper_core::{ActionResult, ReaperError, ReaperResult, ScoredSignal, Sense, Signal};
pub use reaper_plugin::{HookDispatcher, Plugin, PluginManager, PluginRegistry};

/// Everything needed to write and drive plugins.
pub mod prelude {
    pub use reaper_plugin::prelude::*;
}
