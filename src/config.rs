use crate::data::{
    load_tokenizer, read_corpus, CorpusFormat, PaddingConfig, Seq2SeqBatcher, Seq2SeqDataset,
    TokenizerConfig,
};
use crate::error::{DataError, Result};
use burn::prelude::Backend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    pub corpus_path: String,
    #[serde(default)]
    pub corpus: CorpusFormat,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    #[serde(default = "PaddingConfig::new")]
    pub padding: PaddingConfig,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_batch_size() -> usize {
    32
}

fn default_num_workers() -> usize {
    4
}

fn default_seed() -> u64 {
    42
}

impl DataConfig {
    pub fn new(corpus_path: impl Into<String>, tokenizer: TokenizerConfig) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            corpus: CorpusFormat::default(),
            tokenizer,
            padding: PaddingConfig::new(),
            batch_size: default_batch_size(),
            num_workers: default_num_workers(),
            seed: default_seed(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| DataError::io(path, err))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|err| DataError::Config(format!("{}: {}", path.display(), err)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_str = serde_json::to_string_pretty(self)
            .map_err(|err| DataError::Config(err.to_string()))?;
        fs::write(path, config_str).map_err(|err| DataError::io(path, err))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DataError::Config("batch_size must be positive".to_string()));
        }
        if self.corpus.source_key == self.corpus.target_key {
            return Err(DataError::Config(format!(
                "source_key and target_key are both {:?}",
                self.corpus.source_key
            )));
        }
        Ok(())
    }

    /// Reads the corpus and builds the tokenizer. Both are read-only from here on.
    pub fn build_dataset(&self) -> Result<Seq2SeqDataset> {
        let corpus = read_corpus(&self.corpus_path, &self.corpus)?;
        let tokenizer = load_tokenizer(&self.tokenizer)?;
        Ok(Seq2SeqDataset::new(corpus, tokenizer))
    }

    pub fn batcher<B: Backend>(&self, device: B::Device) -> Seq2SeqBatcher<B> {
        Seq2SeqBatcher::new(device, self.padding.clone())
    }
}
