use super::dataset::EncodedExample;
use crate::error::{self, DataError};
use burn::{data::dataloader::batcher::Batcher, prelude::*, tensor::TensorData};

/// Values written into the padded tail of each row.
///
/// Segment padding defaults to 1 so the tail reads as part of the target sequence.
/// Check this against the model's masking convention before changing it: a wrong pad
/// value corrupts attention silently.
#[derive(Config, Debug)]
pub struct PaddingConfig {
    #[config(default = 0)]
    pub token_pad: u32,
    #[config(default = 1)]
    pub segment_pad: u32,
}

/// Row-major padded ids for a batch, before any tensor is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedBatch {
    pub batch_size: usize,
    pub max_length: usize,
    pub token_ids: Vec<i64>,
    pub segment_ids: Vec<i64>,
    /// `true` where the position is padding.
    pub mask_pad: Vec<bool>,
}

impl PaddedBatch {
    pub fn token_row(&self, row: usize) -> &[i64] {
        &self.token_ids[row * self.max_length..(row + 1) * self.max_length]
    }

    pub fn segment_row(&self, row: usize) -> &[i64] {
        &self.segment_ids[row * self.max_length..(row + 1) * self.max_length]
    }

    /// Token ids shifted left by one: `[batch_size, max_length - 1]`, row-major.
    pub fn target_ids(&self) -> Vec<i64> {
        self.token_ids
            .chunks(self.max_length)
            .flat_map(|row| row[1..].iter().copied())
            .collect()
    }
}

/// Right-pads every example to the longest one in the batch.
pub fn pad_examples(items: &[EncodedExample], padding: &PaddingConfig) -> error::Result<PaddedBatch> {
    let max_length = items
        .iter()
        .map(EncodedExample::len)
        .max()
        .ok_or(DataError::EmptyBatch)?;

    let batch_size = items.len();
    let mut token_ids = Vec::with_capacity(batch_size * max_length);
    let mut segment_ids = Vec::with_capacity(batch_size * max_length);
    let mut mask_pad = Vec::with_capacity(batch_size * max_length);

    for item in items {
        let pad = max_length - item.len();

        token_ids.extend(item.token_ids().iter().map(|&id| id as i64));
        token_ids.extend(std::iter::repeat(padding.token_pad as i64).take(pad));

        segment_ids.extend(item.segment_ids().iter().map(|&id| id as i64));
        segment_ids.extend(std::iter::repeat(padding.segment_pad as i64).take(pad));

        mask_pad.extend(std::iter::repeat(false).take(item.len()));
        mask_pad.extend(std::iter::repeat(true).take(pad));
    }

    Ok(PaddedBatch {
        batch_size,
        max_length,
        token_ids,
        segment_ids,
        mask_pad,
    })
}

#[derive(Clone, new)]
pub struct Seq2SeqBatcher<B: Backend> {
    device: B::Device,
    padding: PaddingConfig,
}

#[derive(Debug, Clone, new)]
pub struct Seq2SeqBatch<B: Backend> {
    pub token_ids: Tensor<B, 2, Int>,   // [batch_size, max_length]
    pub segment_ids: Tensor<B, 2, Int>, // [batch_size, max_length]
    pub target_ids: Tensor<B, 2, Int>,  // [batch_size, max_length - 1]
    pub mask_pad: Tensor<B, 2, Bool>,   // [batch_size, max_length]
}

impl<B: Backend> Seq2SeqBatcher<B> {
    pub fn collate(&self, items: Vec<EncodedExample>) -> error::Result<Seq2SeqBatch<B>> {
        let padded = pad_examples(&items, &self.padding)?;
        let (batch_size, max_length) = (padded.batch_size, padded.max_length);
        let shape = [batch_size, max_length];

        let token_ids =
            Tensor::<B, 2, Int>::from_data(TensorData::new(padded.token_ids, shape), &self.device);
        let segment_ids = Tensor::<B, 2, Int>::from_data(
            TensorData::new(padded.segment_ids, shape),
            &self.device,
        );
        let mask_pad =
            Tensor::<B, 2, Bool>::from_data(TensorData::new(padded.mask_pad, shape), &self.device);

        // Next-token labels; zero columns when every example is a single token.
        let target_ids = if max_length > 1 {
            token_ids.clone().slice([0..batch_size, 1..max_length])
        } else {
            Tensor::<B, 2, Int>::from_data(
                TensorData::new(Vec::<i64>::new(), [batch_size, 0]),
                &self.device,
            )
        };

        tracing::debug!("Collated batch [{}, {}]", batch_size, max_length);

        Ok(Seq2SeqBatch::new(token_ids, segment_ids, target_ids, mask_pad))
    }
}

impl<B: Backend> Batcher<EncodedExample, Seq2SeqBatch<B>> for Seq2SeqBatcher<B> {
    /// # Panics
    ///
    /// When `items` is empty. Burn's data loader never hands out an empty batch.
    fn batch(&self, items: Vec<EncodedExample>) -> Seq2SeqBatch<B> {
        match self.collate(items) {
            Ok(batch) => batch,
            Err(err) => panic!("{}", err),
        }
    }
}
