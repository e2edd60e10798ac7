pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default data config
    InitConfig {
        /// Where to write the config
        #[arg(default_value = "bertseq.json")]
        path: String,

        /// Corpus file the config points at
        #[arg(long, default_value = "data/dream_train.tsv")]
        corpus_path: String,

        /// BERT vocabulary file
        #[arg(long, default_value = "vocab.txt")]
        vocab_path: String,
    },

    /// Encode every record and report sequence length statistics
    Stats {
        /// Data config file
        #[arg(short, long, default_value = "bertseq.json")]
        config: String,
    },

    /// Show one record and its encoding
    Show {
        /// Data config file
        #[arg(short, long, default_value = "bertseq.json")]
        config: String,

        /// Record index
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },

    /// Run the data loader and report the shape of each batch
    Batches {
        /// Data config file
        #[arg(short, long, default_value = "bertseq.json")]
        config: String,

        /// Only use a random subset of this many records
        #[arg(short, long)]
        limit: Option<usize>,

        /// Stop after this many batches
        #[arg(long, default_value_t = 10)]
        max_batches: usize,
    },
}
