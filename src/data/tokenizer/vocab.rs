use crate::error::{DataError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const PAD_TOKEN: &str = "[PAD]";
pub const UNK_TOKEN: &str = "[UNK]";
pub const CLS_TOKEN: &str = "[CLS]";
pub const SEP_TOKEN: &str = "[SEP]";
pub const MASK_TOKEN: &str = "[MASK]";

/// Bidirectional token <-> id mapping. Ids are positions in the token list.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    token_to_id: HashMap<String, u32>,
    id_to_token: Vec<String>,
    cls_id: u32,
    sep_id: u32,
}

impl Vocabulary {
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut token_to_id = HashMap::new();
        let mut id_to_token = Vec::new();

        for token in tokens {
            let token = token.into();
            let id = id_to_token.len() as u32;
            if token.is_empty() {
                return Err(DataError::Vocabulary(format!("empty token at id {}", id)));
            }
            if token_to_id.insert(token.clone(), id).is_some() {
                return Err(DataError::Vocabulary(format!(
                    "duplicate token {:?} at id {}",
                    token, id
                )));
            }
            id_to_token.push(token);
        }

        let special = |token: &str| {
            token_to_id
                .get(token)
                .copied()
                .ok_or_else(|| DataError::Vocabulary(format!("missing special token {}", token)))
        };
        special(PAD_TOKEN)?;
        special(UNK_TOKEN)?;
        let cls_id = special(CLS_TOKEN)?;
        let sep_id = special(SEP_TOKEN)?;

        Ok(Self {
            token_to_id,
            id_to_token,
            cls_id,
            sep_id,
        })
    }

    /// Loads a BERT `vocab.txt`: one token per line, id = line index.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| DataError::io(path, err))?;
        let vocab = Self::from_tokens(content.lines().map(|line| line.trim_end()))?;

        tracing::info!("Loaded {} tokens from {}", vocab.len(), path.display());
        Ok(vocab)
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    /// Tokens in id order.
    pub fn tokens(&self) -> impl Iterator<Item = (u32, &str)> {
        self.id_to_token
            .iter()
            .enumerate()
            .map(|(id, token)| (id as u32, token.as_str()))
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    pub fn cls_id(&self) -> u32 {
        self.cls_id
    }

    pub fn sep_id(&self) -> u32 {
        self.sep_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bidirectional_lookup() {
        let vocab = Vocabulary::from_tokens(["[PAD]", "[UNK]", "[CLS]", "[SEP]", "梦"]).unwrap();

        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.cls_id(), 2);
        assert_eq!(vocab.sep_id(), 3);
        assert_eq!(vocab.token_to_id("梦"), Some(4));
        assert_eq!(vocab.id_to_token(4), Some("梦"));
        assert_eq!(vocab.id_to_token(5), None);
        assert_eq!(vocab.tokens().nth(4), Some((4, "梦")));
    }

    #[test]
    fn test_rejects_bad_vocab() {
        let err = Vocabulary::from_tokens(["[PAD]", "[UNK]", "[CLS]"]).unwrap_err();
        assert!(format!("{}", err).contains("[SEP]"));

        let err =
            Vocabulary::from_tokens(["[PAD]", "[UNK]", "[CLS]", "[SEP]", "a", "a"]).unwrap_err();
        assert!(format!("{}", err).contains("duplicate"));
    }

    #[test]
    fn test_load_vocab_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[PAD]\r\n[UNK]\r\n[CLS]\r\n[SEP]\r\n见\r\n").unwrap();

        let vocab = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.token_to_id("见"), Some(4));
    }
}
