mod batcher;
mod corpus;
mod dataset;
pub mod tokenizer;

pub use batcher::{pad_examples, PaddedBatch, PaddingConfig, Seq2SeqBatch, Seq2SeqBatcher};
pub use corpus::{read_corpus, Corpus, CorpusFormat, CorpusRecord};
pub use dataset::{EncodedExample, Seq2SeqDataset, SubDataset};
pub use tokenizer::{load_tokenizer, PairTokenizer, TokenizerConfig};
