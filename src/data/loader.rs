use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::model::Table;
use crate::lexicon::Lexicon;

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

/// Encoding used when writing tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    #[default]
    Utf8,
    /// Little-endian UTF-16 with a byte-order mark.
    Utf16,
}

/// Decode file contents. A byte-order mark selects UTF-16 (either byte
/// order) or UTF-8; without one the bytes must be UTF-8.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => {
            String::from_utf8(rest.to_vec()).context("invalid UTF-8 text")
        }
        _ => String::from_utf8(bytes.to_vec()).context("invalid UTF-8 text (no byte-order mark)"),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        bail!("UTF-16 text has an odd number of bytes");
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .context("invalid UTF-16 text")
}

fn encode(text: &[u8], encoding: OutputEncoding) -> Result<Vec<u8>> {
    match encoding {
        OutputEncoding::Utf8 => Ok(text.to_vec()),
        OutputEncoding::Utf16 => {
            let text = std::str::from_utf8(text).context("table output is not UTF-8")?;
            let mut out = vec![0xFF, 0xFE];
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            Ok(out)
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_text(&bytes).with_context(|| format!("decoding {}", path.display()))
}

// ---------------------------------------------------------------------------
// Dictionary and term list
// ---------------------------------------------------------------------------

/// Load and parse a dictionary file.
pub fn load_dictionary(path: &Path) -> Result<Lexicon> {
    let text = read_text(path)?;
    let lexicon = Lexicon::parse(&text)
        .with_context(|| format!("parsing dictionary {}", path.display()))?;
    log::info!(
        "Loaded dictionary with {} categories and {} terms",
        lexicon.categories().len(),
        lexicon.term_count()
    );
    Ok(lexicon)
}

/// One term per line. Blank lines are dropped; other lines are kept
/// verbatim apart from the line terminator.
pub fn parse_undesired_terms(text: &str) -> Vec<String> {
    let mut blank = 0;
    let terms: Vec<String> = text
        .lines()
        .filter(|line| {
            let keep = !line.trim().is_empty();
            blank += usize::from(!keep);
            keep
        })
        .map(str::to_string)
        .collect();
    if blank > 0 {
        log::warn!("ignored {blank} blank lines in the undesired-term list");
    }
    terms
}

/// Load the undesired-term list.
pub fn load_undesired_terms(path: &Path) -> Result<Vec<String>> {
    let terms = parse_undesired_terms(&read_text(path)?);
    log::info!("Loaded {} undesired terms", terms.len());
    Ok(terms)
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Tab-separated rows; quoted fields are unquoted as the `csv` crate does.
pub fn parse_table(text: &str, source_has_header: bool) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("TSV row {row_no}"))?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table::from_source(rows, source_has_header))
}

/// Load a tab-separated corpus.
pub fn load_table(path: &Path, source_has_header: bool) -> Result<Table> {
    let table = parse_table(&read_text(path)?, source_has_header)
        .with_context(|| format!("parsing {}", path.display()))?;
    log::info!(
        "Loaded {} rows with {} columns from {}",
        table.data_rows().count(),
        table.width(),
        path.display()
    );
    Ok(table)
}

/// Serialise a table: header row 0, then data rows. Fields are quoted only
/// when needed.
pub fn write_table(table: &Table, encoding: OutputEncoding) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    if let Some(header) = table.rows().first() {
        writer.write_record(header).context("writing header row")?;
    }
    for (row_no, row) in table.data_rows() {
        writer
            .write_record(row)
            .with_context(|| format!("writing row {row_no}"))?;
    }
    let bytes = writer.into_inner().context("flushing table")?;
    encode(&bytes, encoding)
}

/// Write a table to `path`.
pub fn export_table(table: &Table, path: &Path, encoding: OutputEncoding) -> Result<()> {
    let bytes = write_table(table, encoding)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote {} rows to {}", table.data_rows().count(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Label lookup
// ---------------------------------------------------------------------------

/// Two comma-separated columns per line: author identifier, label. No header.
pub fn parse_label_lookup(text: &str) -> Result<HashMap<String, String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut lookup = HashMap::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("label row {row_no}"))?;
        match (record.get(0), record.get(1)) {
            (Some(author), Some(label)) if !author.is_empty() => {
                lookup.insert(author.to_string(), label.to_string());
            }
            _ => log::warn!("label row {row_no}: expected 'author,label', skipped"),
        }
    }
    Ok(lookup)
}

/// Load the author → label mapping.
pub fn load_label_lookup(path: &Path) -> Result<HashMap<String, String>> {
    let lookup = parse_label_lookup(&read_text(path)?)
        .with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Loaded {} label associations", lookup.len());
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utf16le(text: &str) -> Vec<u8> {
        let mut out = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    #[test]
    fn decodes_utf16_both_orders_and_utf8() {
        assert_eq!(decode_text(&utf16le("¡Hola\tmundo!")).unwrap(), "¡Hola\tmundo!");

        let mut be = vec![0xFE, 0xFF];
        for unit in "ok".encode_utf16() {
            be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_text(&be).unwrap(), "ok");

        assert_eq!(decode_text("plain".as_bytes()).unwrap(), "plain");
        assert_eq!(decode_text(b"\xEF\xBB\xBFbom").unwrap(), "bom");
        assert!(decode_text(&[0xFF, 0xFE, 0x41]).is_err());
    }

    #[test]
    fn parses_tsv_with_generated_header() {
        let table = parse_table("User Name\tTweet\nalice\thappy day\n\nbob\t\"quoted\ttab\"\n", true)
            .unwrap();
        assert_eq!(table.column_name(0), "Column 1");
        assert_eq!(table.cell(1, 1), "Tweet");
        assert_eq!(table.cell(2, 1), "happy day");
        assert_eq!(table.cell(3, 1), "quoted\ttab");
        assert_eq!(table.data_rows().count(), 2);
    }

    #[test]
    fn blank_undesired_lines_are_dropped() {
        let terms = parse_undesired_terms("RT\n\n  \n&amp;\r\nhttp\n");
        assert_eq!(terms, vec!["RT", "&amp;", "http"]);
    }

    #[test]
    fn label_lookup_trims_and_skips_short_rows() {
        let lookup = parse_label_lookup("gov_a, R\ngov_b,D\nlonely\n").unwrap();
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup["gov_a"], "R");
        assert_eq!(lookup["gov_b"], "D");
    }

    #[test]
    fn written_table_has_one_header_row_and_round_trips() {
        let table = parse_table("name\ttext\nalice\tsays \"hi\"\n", true).unwrap();
        let bytes = write_table(&table, OutputEncoding::Utf8).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Column 1\tColumn 2\nalice\t\"says \"\"hi\"\"\"\n");

        let again = parse_table(&text, true).unwrap();
        assert_eq!(again.cell(2, 1), "says \"hi\"");
    }

    #[test]
    fn utf16_export_has_bom() {
        let table = parse_table("a\nβ\n", true).unwrap();
        let bytes = write_table(&table, OutputEncoding::Utf16).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        assert_eq!(decode_text(&bytes).unwrap(), "Column 1\nβ\n");
    }

    #[test]
    fn export_and_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let table = parse_table("h\nx\ny\n", true).unwrap();
        export_table(&table, &path, OutputEncoding::Utf16).unwrap();
        let loaded = load_table(&path, true).unwrap();
        assert_eq!(loaded.cell(1, 0), "Column 1");
        assert_eq!(loaded.cell(2, 0), "x");
        assert_eq!(loaded.cell(3, 0), "y");
    }
}
