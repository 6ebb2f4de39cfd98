//! Reading `content,source` records from a header-less CSV file.

use std::io::Read;

use anyhow::{Context as _, Result, bail};

/// One fact to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
  pub content: String,
  pub source:  String,
}

impl Record {
  fn from_csv(row: &csv::StringRecord) -> Result<Self> {
    match (row.get(0), row.get(1)) {
      (Some(content), Some(source)) => {
        Ok(Self { content: content.to_owned(), source: source.to_owned() })
      }
      _ => bail!("expected 2 fields (content,source), found {}", row.len()),
    }
  }
}

/// Parse every row of `input`. Rows that cannot be read or are too short
/// come back as individual errors so the caller can skip them; fields past
/// the second are ignored.
pub fn read_records<R: Read>(input: R) -> Vec<Result<Record>> {
  csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .from_reader(input)
    .records()
    .enumerate()
    .map(|(i, row)| {
      let row = row.with_context(|| format!("record {}", i + 1))?;
      Record::from_csv(&row).with_context(|| format!("record {}", i + 1))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_pairs_in_order() {
    let input = "water is wet,common knowledge\n\"commas, quoted\",\"a book\"\n";
    let records: Vec<Record> = read_records(input.as_bytes())
      .into_iter()
      .collect::<Result<_>>()
      .unwrap();

    assert_eq!(records, [
      Record { content: "water is wet".into(), source: "common knowledge".into() },
      Record { content: "commas, quoted".into(), source: "a book".into() },
    ]);
  }

  #[test]
  fn short_rows_fail_individually() {
    let input = "only content\nfine,row\n";
    let records = read_records(input.as_bytes());

    assert_eq!(records.len(), 2);
    let err = records[0].as_ref().unwrap_err();
    assert!(format!("{err:#}").contains("record 1"), "{err:#}");
    assert_eq!(records[1].as_ref().unwrap().content, "fine");
  }

  #[test]
  fn extra_fields_are_ignored() {
    let records = read_records("a,b,c\n".as_bytes());
    let only = records[0].as_ref().unwrap();
    assert_eq!((only.content.as_str(), only.source.as_str()), ("a", "b"));
  }

  #[test]
  fn empty_input_has_no_records() {
    assert!(read_records("".as_bytes()).is_empty());
  }
}
