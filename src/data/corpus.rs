use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One (source, target) training pair.
#[derive(new, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub source: String,
    pub target: String,
}

/// Layout of a corpus file: which JSON keys hold the pair and how rows are delimited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusFormat {
    pub source_key: String,
    pub target_key: String,
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for CorpusFormat {
    fn default() -> Self {
        Self {
            source_key: "dream".to_string(),
            target_key: "decode".to_string(),
            delimiter: '\t',
            has_header: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Corpus {
    records: Vec<CorpusRecord>,
}

impl Corpus {
    pub fn new(records: Vec<CorpusRecord>) -> Self {
        Self { records }
    }

    /// Parses every non-blank row of `content`. The first malformed row aborts the load.
    pub fn parse(content: &str, format: &CorpusFormat) -> Result<Self> {
        let mut records = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = if index == 0 {
                line.trim_start_matches('\u{feff}')
            } else {
                line
            };
            if index == 0 && format.has_header {
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let field = line.split(format.delimiter).next().unwrap_or_default();
            records.push(parse_record(&unquote(field.trim()), format, line_no)?);
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CorpusRecord> {
        self.records.get(index)
    }

    pub fn sources(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.source.as_str()).collect()
    }

    pub fn targets(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.target.as_str()).collect()
    }

    /// Splits the corpus into index-aligned source and target columns.
    pub fn into_columns(self) -> (Vec<String>, Vec<String>) {
        self.records
            .into_iter()
            .map(|r| (r.source, r.target))
            .unzip()
    }
}

/// Reads a delimited corpus file whose first column holds a JSON object per row.
pub fn read_corpus(path: impl AsRef<Path>, format: &CorpusFormat) -> Result<Corpus> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| DataError::io(path, err))?;
    let corpus = Corpus::parse(&content, format)?;

    tracing::info!(
        "Loaded {} records from {}",
        corpus.len(),
        path.display()
    );
    Ok(corpus)
}

fn parse_record(field: &str, format: &CorpusFormat, line: usize) -> Result<CorpusRecord> {
    let value: Value = serde_json::from_str(field).map_err(|err| DataError::Parse {
        line,
        reason: format!("first column is not valid JSON: {}", err),
    })?;

    let object = value.as_object().ok_or_else(|| DataError::Parse {
        line,
        reason: "first column is not a JSON object".to_string(),
    })?;

    let text = |key: &str| -> Result<String> {
        match object.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(DataError::Parse {
                line,
                reason: format!("key {:?} does not hold a string", key),
            }),
            None => Err(DataError::Parse {
                line,
                reason: format!("missing key {:?}", key),
            }),
        }
    };

    Ok(CorpusRecord::new(
        text(&format.source_key)?,
        text(&format.target_key)?,
    ))
}

// CSV-style quoting: "..." with doubled inner quotes.
fn unquote(field: &str) -> String {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_dream_row() {
        let corpus =
            Corpus::parse("{\"dream\": \"见蛇\", \"decode\": \"大吉\"}\n", &CorpusFormat::default())
                .unwrap();

        let (sources, targets) = corpus.into_columns();
        assert_eq!(sources, vec!["见蛇"]);
        assert_eq!(targets, vec!["大吉"]);
    }

    #[test]
    fn test_rows_stay_aligned() {
        let content = "{\"dream\": \"a\", \"decode\": \"1\"}\textra\n\
                       \n\
                       {\"decode\": \"2\", \"dream\": \"b\"}\n\
                       {\"dream\": \"c\", \"decode\": \"3\", \"note\": 7}\n";
        let corpus = Corpus::parse(content, &CorpusFormat::default()).unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.sources(), vec!["a", "b", "c"]);
        assert_eq!(corpus.targets(), vec!["1", "2", "3"]);
        assert_eq!(corpus.get(1), Some(&CorpusRecord::new("b".into(), "2".into())));
    }

    #[test]
    fn test_header_and_custom_keys() {
        let format = CorpusFormat {
            source_key: "question".into(),
            target_key: "answer".into(),
            has_header: true,
            ..Default::default()
        };
        let content = "data\n{\"question\": \"q\", \"answer\": \"a\"}\n";
        let corpus = Corpus::parse(content, &format).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(0).unwrap().source, "q");
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let content = "\u{feff}{\"dream\": \"见蛇\", \"decode\": \"大吉\"}\n";
        let corpus = Corpus::parse(content, &CorpusFormat::default()).unwrap();
        assert_eq!(corpus.sources(), vec!["见蛇"]);
    }

    #[test]
    fn test_quoted_field() {
        let content = "\"{\"\"dream\"\": \"\"x\"\", \"\"decode\"\": \"\"y\"\"}\"\n";
        let corpus = Corpus::parse(content, &CorpusFormat::default()).unwrap();
        assert_eq!(corpus.sources(), vec!["x"]);
        assert_eq!(corpus.targets(), vec!["y"]);
    }

    #[test]
    fn test_malformed_rows_fail() {
        let format = CorpusFormat::default();

        let err = Corpus::parse("{\"dream\": \"a\", \"decode\": \"b\"}\nnot json\n", &format)
            .unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 2, .. }));

        let err = Corpus::parse("{\"dream\": \"a\"}\n", &format).unwrap_err();
        match err {
            DataError::Parse { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("decode"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Corpus::parse("[\"dream\", \"decode\"]\n", &format).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 1, .. }));

        let err = Corpus::parse("{\"dream\": 1, \"decode\": \"b\"}\n", &format).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_read_corpus_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"dream\": \"梦见下雨\", \"decode\": \"财运\"}}").unwrap();
        writeln!(file, "{{\"dream\": \"梦见飞\", \"decode\": \"升迁\"}}").unwrap();

        let corpus = read_corpus(file.path(), &CorpusFormat::default()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.sources().len(), corpus.targets().len());
        assert_eq!(corpus.targets()[1], "升迁");
    }

    #[test]
    fn test_missing_file() {
        let err = read_corpus("does/not/exist.tsv", &CorpusFormat::default()).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
