//! Fallback model loader
//!
//! Lazily instantiates the neural engine. Instantiation is attempted with
//! the accelerated execution backend first and retried once with the
//! universal backend; the loading phase is cleared on every path.

use super::{ExecutionBackend, TtsEngine};
use crate::Result;
use log::{info, warn};

/// Loader lifecycle, rendered by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    /// Not loaded (initial state, or every load attempt failed)
    Idle,
    /// Instantiation in progress
    Loading,
    /// Engine instantiated and usable
    Ready,
}

/// Factory producing an engine for a given execution backend.
/// Injected so tests can simulate per-backend failures.
pub type EngineFactory = Box<dyn Fn(ExecutionBackend) -> Result<Box<dyn TtsEngine>> + Send>;

/// Lazy, idempotent engine loader
pub struct EngineLoader {
    factory: EngineFactory,
    engine: Option<Box<dyn TtsEngine>>,
    phase: LoaderPhase,
}

impl EngineLoader {
    pub fn new(factory: EngineFactory) -> Self {
        Self {
            factory,
            engine: None,
            phase: LoaderPhase::Idle,
        }
    }

    /// Instantiate the engine if it is not already instantiated.
    ///
    /// Idempotent: an existing engine reports ready immediately. A failure
    /// with the accelerated backend is swallowed and retried once with the
    /// universal backend; ultimate failure leaves the loader idle (not
    /// ready) and returns the error.
    pub fn ensure_ready(&mut self) -> Result<()> {
        if self.engine.is_some() {
            self.phase = LoaderPhase::Ready;
            return Ok(());
        }

        self.phase = LoaderPhase::Loading;
        info!("Loading fallback engine (accelerated backend)");

        let result = (self.factory)(ExecutionBackend::Accelerated).or_else(|e| {
            warn!("Accelerated backend failed: {}; retrying with universal backend", e);
            (self.factory)(ExecutionBackend::Universal)
        });

        match result {
            Ok(engine) => {
                info!("Fallback engine ready");
                self.engine = Some(engine);
                self.phase = LoaderPhase::Ready;
                Ok(())
            }
            Err(e) => {
                warn!("Fallback engine failed to load: {}", e);
                self.phase = LoaderPhase::Idle;
                Err(e)
            }
        }
    }

    pub fn phase(&self) -> LoaderPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine_mut(&mut self) -> Option<&mut (dyn TtsEngine + 'static)> {
        self.engine.as_deref_mut()
    }
}
