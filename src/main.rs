use bertseq::{DataConfig, Seq2SeqBatch, Seq2SeqDataset, SubDataset, TokenizerConfig};
use burn::data::dataloader::{DataLoader, DataLoaderBuilder};
use std::sync::Arc;

mod cli;

use cli::*;

type Backend = burn::backend::NdArray<f32>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bertseq=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitConfig {
            path,
            corpus_path,
            vocab_path,
        } => {
            let config = DataConfig::new(
                corpus_path,
                TokenizerConfig::Bert {
                    vocab_path,
                    lowercase: true,
                    max_length: Some(512),
                },
            );
            config.save(&path)?;
            println!("Wrote default config to {}", path);
        }

        Commands::Stats { config } => {
            let config = DataConfig::load(&config)?;
            let dataset = config.build_dataset()?;
            dataset.check()?;

            let lengths = (0..dataset.len())
                .map(|i| dataset.encode(i).map(|e| e.len()))
                .collect::<Result<Vec<_>, _>>()?;

            println!("\nCorpus: {}", config.corpus_path);
            println!("{}", "-".repeat(60));
            println!("  Records:    {}", dataset.len());
            println!("  Vocab size: {}", dataset.tokenizer().vocab_size());
            if let (Some(min), Some(max)) = (lengths.iter().min(), lengths.iter().max()) {
                let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
                println!("  Min length: {}", min);
                println!("  Mean length: {:.2}", mean);
                println!("  Max length: {}", max);
            }
            println!("{}", "-".repeat(60));
        }

        Commands::Show { config, index } => {
            let config = DataConfig::load(&config)?;
            let dataset = config.build_dataset()?;
            show(&dataset, index)?;
        }

        Commands::Batches {
            config,
            limit,
            max_batches,
        } => {
            let config = DataConfig::load(&config)?;
            let dataset = config.build_dataset()?;
            dataset.check()?;

            let device = burn::backend::ndarray::NdArrayDevice::Cpu;
            let batcher = config.batcher::<Backend>(device);

            let dataloader: Arc<dyn DataLoader<Seq2SeqBatch<Backend>>> = match limit {
                Some(limit) => {
                    let subset = SubDataset::new_with_seed(dataset, limit, Some(config.seed));
                    DataLoaderBuilder::new(batcher)
                        .batch_size(config.batch_size)
                        .shuffle(config.seed)
                        .num_workers(config.num_workers)
                        .build(subset)
                }
                None => DataLoaderBuilder::new(batcher)
                    .batch_size(config.batch_size)
                    .shuffle(config.seed)
                    .num_workers(config.num_workers)
                    .build(dataset),
            };

            for (step, batch) in dataloader.iter().take(max_batches).enumerate() {
                let [batch_size, max_length] = batch.token_ids.dims();
                let padded = batch
                    .mask_pad
                    .to_data()
                    .to_vec::<bool>()
                    .map_err(|err| format!("{:?}", err))?
                    .into_iter()
                    .filter(|&pad| pad)
                    .count();

                println!(
                    "Batch {:>4} | tokens {:?} | segments {:?} | targets {:?} | padding {:.1}%",
                    step,
                    [batch_size, max_length],
                    batch.segment_ids.dims(),
                    batch.target_ids.dims(),
                    padded as f64 / (batch_size * max_length) as f64 * 100.0,
                );
            }
        }
    }
    Ok(())
}

fn show(dataset: &Seq2SeqDataset, index: usize) -> Result<(), Box<dyn std::error::Error>> {
    let example = dataset.encode(index)?;
    let record = dataset
        .record(index)
        .ok_or_else(|| format!("record {} disappeared", index))?;
    let tokenizer = dataset.tokenizer();

    println!("\nRecord {} of {}", index, dataset.len());
    println!("{}", "-".repeat(60));
    println!("  Source:      {}", record.source);
    println!("  Target:      {}", record.target);
    println!("  Token ids:   {:?}", example.token_ids());
    println!("  Segment ids: {:?}", example.segment_ids());
    println!("  Decoded:     {}", tokenizer.decode(example.token_ids()));
    println!("{}", "-".repeat(60));
    Ok(())
}
