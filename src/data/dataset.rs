mod utils;

pub use utils::SubDataset;

use super::corpus::{Corpus, CorpusRecord};
use super::tokenizer::PairTokenizer;
use crate::error::{DataError, Result};
use burn::data::dataset::Dataset;
use std::sync::Arc;

/// Token ids and segment ids for one (source, target) pair. Both have the same
/// non-zero length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedExample {
    token_ids: Vec<u32>,
    segment_ids: Vec<u32>,
}

impl EncodedExample {
    pub fn try_new(token_ids: Vec<u32>, segment_ids: Vec<u32>) -> Result<Self> {
        if token_ids.is_empty() {
            return Err(DataError::Tokenization(
                "encoding produced zero tokens".to_string(),
            ));
        }
        if token_ids.len() != segment_ids.len() {
            return Err(DataError::Tokenization(format!(
                "{} token ids but {} segment ids",
                token_ids.len(),
                segment_ids.len()
            )));
        }
        Ok(Self {
            token_ids,
            segment_ids,
        })
    }

    pub fn token_ids(&self) -> &[u32] {
        &self.token_ids
    }

    pub fn segment_ids(&self) -> &[u32] {
        &self.segment_ids
    }

    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }
}

/// Serves encoded examples by index. Encoding happens on every request; nothing is
/// cached, and nothing is mutated after construction.
pub struct Seq2SeqDataset {
    corpus: Corpus,
    tokenizer: Arc<dyn PairTokenizer>,
}

impl Seq2SeqDataset {
    pub fn new(corpus: Corpus, tokenizer: Arc<dyn PairTokenizer>) -> Self {
        Self { corpus, tokenizer }
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&CorpusRecord> {
        self.corpus.get(index)
    }

    pub fn tokenizer(&self) -> &Arc<dyn PairTokenizer> {
        &self.tokenizer
    }

    pub fn encode(&self, index: usize) -> Result<EncodedExample> {
        let record = self.corpus.get(index).ok_or(DataError::IndexOutOfBounds {
            index,
            len: self.corpus.len(),
        })?;

        let (token_ids, segment_ids) = self
            .tokenizer
            .encode_pair(&record.source, &record.target)?;
        EncodedExample::try_new(token_ids, segment_ids)
    }

    /// Encodes every record once and stops at the first failure.
    pub fn check(&self) -> Result<()> {
        for index in 0..self.len() {
            self.encode(index).map_err(|err| match err {
                DataError::Tokenization(reason) => {
                    DataError::Tokenization(format!("record {}: {}", index, reason))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl Dataset<EncodedExample> for Seq2SeqDataset {
    /// # Panics
    ///
    /// When an in-range record fails to encode. Burn's dataset iterators stop at the
    /// first `None`, so returning one would end the epoch early. Run
    /// [`Seq2SeqDataset::check`] before training to get the error as a `Result`.
    fn get(&self, index: usize) -> Option<EncodedExample> {
        match self.encode(index) {
            Ok(example) => Some(example),
            Err(DataError::IndexOutOfBounds { .. }) => None,
            Err(err) => panic!("record {}: {}", index, err),
        }
    }

    fn len(&self) -> usize {
        self.corpus.len()
    }
}
