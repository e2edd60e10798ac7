use super::pretrained::HfPairTokenizer;
use super::vocab::{Vocabulary, CLS_TOKEN, MASK_TOKEN, PAD_TOKEN, SEP_TOKEN, UNK_TOKEN};
use crate::error::{DataError, Result};
use serde_json::{json, Map, Value};

/// Builds a BERT WordPiece pipeline over `vocab`: BERT normalization (Chinese
/// characters split out, optional lowercasing with accent stripping), BERT
/// pre-tokenization, `[CLS] a [SEP] b [SEP]` post-processing with type ids, and
/// longest-first truncation when `max_length` is set.
pub fn bert_tokenizer(
    vocab: &Vocabulary,
    lowercase: bool,
    max_length: Option<usize>,
) -> Result<HfPairTokenizer> {
    let model_vocab: Map<String, Value> = vocab
        .tokens()
        .map(|(id, token)| (token.to_string(), json!(id)))
        .collect();

    let added_tokens: Vec<Value> = [PAD_TOKEN, UNK_TOKEN, CLS_TOKEN, SEP_TOKEN, MASK_TOKEN]
        .iter()
        .filter_map(|&token| vocab.token_to_id(token).map(|id| (token, id)))
        .map(|(token, id)| {
            json!({
                "id": id,
                "content": token,
                "single_word": false,
                "lstrip": false,
                "rstrip": false,
                "normalized": false,
                "special": true
            })
        })
        .collect();

    let truncation = max_length.map(|max_length| {
        json!({
            "direction": "Right",
            "max_length": max_length,
            "strategy": "LongestFirst",
            "stride": 0
        })
    });

    let tokenizer_json = json!({
        "version": "1.0",
        "truncation": truncation,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": lowercase
        },
        "pre_tokenizer": {
            "type": "BertPreTokenizer"
        },
        "post_processor": {
            "type": "BertProcessing",
            "sep": [SEP_TOKEN, vocab.sep_id()],
            "cls": [CLS_TOKEN, vocab.cls_id()]
        },
        "decoder": {
            "type": "WordPiece",
            "prefix": "##",
            "cleanup": true
        },
        "model": {
            "type": "WordPiece",
            "unk_token": UNK_TOKEN,
            "continuing_subword_prefix": "##",
            "max_input_chars_per_word": 100,
            "vocab": model_vocab
        }
    });

    let tokenizer: tokenizers::Tokenizer = tokenizer_json
        .to_string()
        .parse()
        .map_err(|err| DataError::Tokenization(format!("cannot build BERT tokenizer: {}", err)))?;

    Ok(HfPairTokenizer::new(tokenizer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::PairTokenizer;

    fn vocab() -> Vocabulary {
        Vocabulary::from_tokens([
            "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "见", "蛇", "大", "吉", "un", "##aff",
            "##able", "hello", "!", "cafe",
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_pair_layout() {
        let tokenizer = bert_tokenizer(&vocab(), true, None).unwrap();
        let (token_ids, segment_ids) = tokenizer.encode_pair("见蛇", "大吉").unwrap();

        assert_eq!(token_ids, vec![2, 5, 6, 3, 7, 8, 3]);
        assert_eq!(segment_ids, vec![0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_wordpiece_and_unknown_words() {
        let tokenizer = bert_tokenizer(&vocab(), true, None).unwrap();
        let (token_ids, _) = tokenizer.encode_pair(" UNAFFABLE  Hello!", "unknown 吉").unwrap();

        assert_eq!(token_ids, vec![2, 9, 10, 11, 12, 13, 3, 1, 8, 3]);
    }

    #[test]
    fn test_lowercase_strips_accents() {
        let tokenizer = bert_tokenizer(&vocab(), true, None).unwrap();
        let (token_ids, _) = tokenizer.encode_pair("Café", "吉").unwrap();
        assert_eq!(token_ids, vec![2, 14, 3, 8, 3]);

        let cased = bert_tokenizer(&vocab(), false, None).unwrap();
        let (token_ids, _) = cased.encode_pair("Café", "吉").unwrap();
        assert_eq!(token_ids, vec![2, 1, 3, 8, 3]);
    }

    #[test]
    fn test_truncates_longer_text_first() {
        let tokenizer = bert_tokenizer(&vocab(), true, Some(7)).unwrap();
        let (token_ids, segment_ids) = tokenizer.encode_pair("见蛇见蛇", "大").unwrap();

        assert_eq!(token_ids, vec![2, 5, 6, 5, 3, 7, 3]);
        assert_eq!(segment_ids, vec![0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_rejects_empty_text() {
        let tokenizer = bert_tokenizer(&vocab(), true, None).unwrap();
        assert!(matches!(
            tokenizer.encode_pair("", "大吉"),
            Err(DataError::Tokenization(_))
        ));
        assert!(tokenizer.encode_pair("见蛇", "   ").is_err());
    }

    #[test]
    fn test_decode_skips_special_tokens() {
        let tokenizer = bert_tokenizer(&vocab(), true, None).unwrap();
        let (token_ids, _) = tokenizer.encode_pair("hello", "unaffable!").unwrap();

        assert_eq!(tokenizer.decode(&token_ids), "hello unaffable!");
    }
}
