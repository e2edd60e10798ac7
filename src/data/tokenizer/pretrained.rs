use super::PairTokenizer;
use crate::error::{DataError, Result};
use std::path::Path;

/// Adapter over a HuggingFace tokenizer whose post-processor handles pairs.
#[derive(new)]
pub struct HfPairTokenizer {
    tokenizer: tokenizers::Tokenizer,
}

impl HfPairTokenizer {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = tokenizers::Tokenizer::from_file(path).map_err(|err| {
            DataError::Tokenization(format!("cannot load {}: {}", path.display(), err))
        })?;

        tracing::info!(
            "Loaded tokenizer from {} ({} tokens)",
            path.display(),
            tokenizer.get_vocab_size(true)
        );
        Ok(Self::new(tokenizer))
    }
}

impl PairTokenizer for HfPairTokenizer {
    fn encode_pair(&self, source: &str, target: &str) -> Result<(Vec<u32>, Vec<u32>)> {
        if source.trim().is_empty() || target.trim().is_empty() {
            return Err(DataError::Tokenization(
                "source and target must both be non-empty".to_string(),
            ));
        }

        let encoding = self
            .tokenizer
            .encode((source, target), true)
            .map_err(|err| DataError::Tokenization(err.to_string()))?;

        if encoding.get_ids().is_empty() {
            return Err(DataError::Tokenization(format!(
                "pair ({:?}, {:?}) produced no tokens",
                source, target
            )));
        }

        Ok((
            encoding.get_ids().to_vec(),
            encoding.get_type_ids().to_vec(),
        ))
    }

    fn decode(&self, tokens: &[u32]) -> String {
        self.tokenizer.decode(tokens, true).unwrap_or_else(|err| {
            tracing::warn!("Failed to decode {} tokens: {}", tokens.len(), err);
            String::new()
        })
    }

    fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }
}
