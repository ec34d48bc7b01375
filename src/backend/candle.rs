//! Candle-backed implementation of the inference seam: llama-family
//! weights loaded on CPU from a directory holding `config.json`,
//! `tokenizer.json` and safetensors shards.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::llama::{Cache, Config, Llama, LlamaConfig, LlamaEosToks};
use tokenizers::Tokenizer;

use super::{LanguageModel, LoadParams, ModelBackend};

/// Loads llama-family models through candle, CPU only.
pub struct CandleBackend;

impl CandleBackend {
    pub fn new() -> Self {
        Self
    }

    fn safetensor_shards(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut shards: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("cannot read model directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |ext| ext == "safetensors"))
            .collect();
        shards.sort();
        anyhow::ensure!(
            !shards.is_empty(),
            "no safetensors shards in {}",
            dir.display()
        );
        Ok(shards)
    }
}

impl Default for CandleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBackend for CandleBackend {
    fn load(&self, path: &Path, params: &LoadParams) -> Result<Box<dyn LanguageModel>> {
        let device = Device::Cpu;

        let config_json = fs::read(path.join("config.json"))
            .with_context(|| format!("missing config.json in {}", path.display()))?;
        let config: Config =
            serde_json::from_slice::<LlamaConfig>(&config_json)?.into_config(false);

        let tokenizer = Tokenizer::from_file(path.join("tokenizer.json"))
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("cannot load tokenizer from {}", path.display()))?;

        let shards = Self::safetensor_shards(path)?;
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&shards, DType::F32, &device)? };
        let model = Llama::load(vb, &config).context("failed to load model weights")?;

        // The execution context. A failure here drops the freshly loaded
        // model with it, so the caller never sees a half-loaded pair.
        let cache = Cache::new(true, DType::F32, &config, &device)
            .context("failed to create model context")?;

        let eos_token = match config.eos_token_id.clone() {
            Some(LlamaEosToks::Single(id)) => id,
            Some(LlamaEosToks::Multiple(ids)) => ids.first().copied().unwrap_or(2),
            None => tokenizer.token_to_id("</s>").unwrap_or(2),
        };

        tracing::debug!(
            path = %path.display(),
            context_size = params.context_size,
            n_threads = params.n_threads,
            "loaded candle model"
        );

        Ok(Box::new(CandleModel {
            model,
            cache,
            config,
            tokenizer,
            device,
            eos_token,
            context_size: params.context_size,
            index_pos: 0,
            source: path.to_path_buf(),
        }))
    }
}

struct CandleModel {
    model: Llama,
    cache: Cache,
    config: Config,
    tokenizer: Tokenizer,
    device: Device,
    eos_token: u32,
    context_size: usize,
    // Sequence position of the next decode, reset with the cache.
    index_pos: usize,
    source: PathBuf,
}

impl LanguageModel for CandleModel {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(anyhow::Error::msg)?;
        let mut ids = encoding.get_ids().to_vec();
        // Leave the context window to prompt plus generation.
        ids.truncate(self.context_size);
        Ok(ids)
    }

    fn decode(&mut self, tokens: &[u32]) -> Result<Vec<f32>> {
        let input = Tensor::new(tokens, &self.device)?.unsqueeze(0)?;
        let logits = self.model.forward(&input, self.index_pos, &mut self.cache)?;
        self.index_pos += tokens.len();

        let logits = logits.squeeze(0)?.to_dtype(DType::F32)?;
        Ok(logits.to_vec1::<f32>()?)
    }

    fn token_text(&self, token: u32) -> String {
        self.tokenizer.decode(&[token], false).unwrap_or_default()
    }

    fn eos_token(&self) -> u32 {
        self.eos_token
    }

    fn reset_context(&mut self) -> Result<()> {
        self.cache = Cache::new(true, DType::F32, &self.config, &self.device)?;
        self.index_pos = 0;
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "llama {} layers, vocab {} ({})",
            self.config.num_hidden_layers,
            self.config.vocab_size,
            self.source.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_fails_cleanly_on_empty_directory() {
        let dir = tempdir().unwrap();
        let backend = CandleBackend::new();
        let params = LoadParams {
            context_size: 1024,
            n_threads: 1,
        };
        let result = backend.load(dir.path(), &params);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_fails_cleanly_on_missing_directory() {
        let backend = CandleBackend::new();
        let params = LoadParams {
            context_size: 1024,
            n_threads: 1,
        };
        assert!(backend
            .load(Path::new("/nonexistent/model"), &params)
            .is_err());
    }
}
