//! Seam to the external neural inference engine.
//!
//! The generation loop only needs the token/logit contract below; the
//! tensor machinery behind it stays opaque. Keeping the seam object-safe
//! lets tests drive the full pipeline with a scripted model.

use std::path::Path;
use std::sync::Once;

pub mod candle;

pub use candle::CandleBackend;

static BACKEND_INIT: Once = Once::new();

/// Fixed parameters applied to every slot load: CPU-only execution with a
/// bounded context window and a thread budget that keeps concurrently
/// loading slots from oversubscribing the machine.
#[derive(Debug, Clone, Copy)]
pub struct LoadParams {
    pub context_size: usize,
    pub n_threads: usize,
}

/// One loaded model plus its execution context.
///
/// `decode` advances the context by the given tokens and returns the
/// logits of the last position; `reset_context` drops any accumulated
/// key/value state so the next decode starts a fresh sequence.
pub trait LanguageModel: Send {
    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<u32>>;
    fn decode(&mut self, tokens: &[u32]) -> anyhow::Result<Vec<f32>>;
    /// Text fragment for a single token; empty when the token has no
    /// printable form.
    fn token_text(&self, token: u32) -> String;
    fn eos_token(&self) -> u32;
    fn reset_context(&mut self) -> anyhow::Result<()>;
    fn description(&self) -> String;
}

/// Factory for loaded models. Loading is all-or-nothing: an `Err` means
/// nothing was retained, so a slot can never observe a model without its
/// context or vice versa.
pub trait ModelBackend: Send + Sync {
    fn load(&self, path: &Path, params: &LoadParams) -> anyhow::Result<Box<dyn LanguageModel>>;

    /// Process-wide backend initialization hook; called at most once per
    /// process through [`ensure_backend_init`].
    fn global_init(&self) {}
}

/// Run the backend's one-time global initialization. Safe to call from
/// every slot load concurrently; only the first call does anything.
pub fn ensure_backend_init(backend: &dyn ModelBackend) {
    BACKEND_INIT.call_once(|| {
        backend.global_init();
        tracing::debug!("inference backend initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        inits: AtomicUsize,
    }

    impl ModelBackend for CountingBackend {
        fn load(&self, _: &Path, _: &LoadParams) -> anyhow::Result<Box<dyn LanguageModel>> {
            anyhow::bail!("not loadable")
        }

        fn global_init(&self) {
            self.inits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_global_init_runs_at_most_once() {
        let backend = CountingBackend {
            inits: AtomicUsize::new(0),
        };
        ensure_backend_init(&backend);
        ensure_backend_init(&backend);
        assert!(backend.inits.load(Ordering::SeqCst) <= 1);
    }
}
