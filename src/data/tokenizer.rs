mod bert;
mod pretrained;
mod vocab;

pub use bert::bert_tokenizer;
pub use pretrained::HfPairTokenizer;
pub use vocab::{Vocabulary, CLS_TOKEN, MASK_TOKEN, PAD_TOKEN, SEP_TOKEN, UNK_TOKEN};

#[cfg(test)]
pub(crate) use pretrained::tests::word_level;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Encodes a (source, target) pair into one sequence for a seq2seq language model.
///
/// Implementations are built once and then shared read-only between data loader
/// workers, hence the `Send + Sync` bound.
pub trait PairTokenizer: Send + Sync {
    /// Returns concatenated token ids (source first, then target, with boundary
    /// markers) and matching segment ids.
    fn encode_pair(&self, source: &str, target: &str) -> Result<(Vec<u32>, Vec<u32>)>;
    fn decode(&self, tokens: &[u32]) -> String;
    fn vocab_size(&self) -> usize;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenizerConfig {
    /// BERT WordPiece pipeline over a `vocab.txt`.
    Bert {
        vocab_path: String,
        #[serde(default = "default_lowercase")]
        lowercase: bool,
        #[serde(default)]
        max_length: Option<usize>,
    },
    /// HuggingFace `tokenizer.json`.
    Pretrained { path: String },
}

fn default_lowercase() -> bool {
    true
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self::Bert {
            vocab_path: "vocab.txt".to_string(),
            lowercase: true,
            max_length: None,
        }
    }
}

pub fn load_tokenizer(config: &TokenizerConfig) -> Result<Arc<dyn PairTokenizer>> {
    let tokenizer: Arc<dyn PairTokenizer> = match config {
        TokenizerConfig::Bert {
            vocab_path,
            lowercase,
            max_length,
        } => {
            let vocab = Vocabulary::load(vocab_path)?;
            Arc::new(bert_tokenizer(&vocab, *lowercase, *max_length)?)
        }
        TokenizerConfig::Pretrained { path } => Arc::new(HfPairTokenizer::from_file(path)?),
    };
    Ok(tokenizer)
}
