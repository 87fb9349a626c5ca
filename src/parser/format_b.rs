//! Format B: TPF, the single-base-resolution input assembly and this
//! crate's own output format. Fragment rows look like `?\t{target}:
//! {t_start}-{t_end}\t{scaffold_name}\t{PLUS|MINUS}`; gap rows look like
//! `GAP\t{type}\t{length}`.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::OnceLock;

use regex::Regex;

use crate::assembly::Assembly;
use crate::error::{ParseError, ParseResult};
use crate::fragment::{Fragment, Strand};
use crate::gap::Gap;
use crate::row::Row;
use crate::scaffold::Scaffold;

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+):(\d+)-(\d+)$").unwrap())
}

/// Parses a TPF stream into an [`Assembly`] named `name`.
pub fn parse_tpf<R: Read>(reader: R, name: &str) -> ParseResult<Assembly> {
    let file = name.to_string();
    let mut asm = Assembly::new(name);
    let mut current: Option<Scaffold> = None;
    let mut line_no = 0usize;

    for line in BufReader::new(reader).lines() {
        line_no += 1;
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();

        if fields[0] == "GAP" {
            if current.is_none() {
                return Err(malformed(
                    &file,
                    line_no,
                    "Gap line before first sequence fragment".to_string(),
                ));
            }
            if fields.len() != 3 {
                return Err(malformed(&file, line_no, format!("Wrong field count: {}", fields.len())));
            }
            let length = fields[2]
                .parse()
                .map_err(|_| malformed(&file, line_no, format!("Expected an integer, got '{}'", fields[2])))?;
            current
                .as_mut()
                .expect("checked above")
                .append_row(Row::Gap(Gap::new(length, fields[1])));
            continue;
        }

        if fields.len() != 4 {
            return Err(malformed(&file, line_no, format!("Wrong field count: {}", fields.len())));
        }
        let caps = name_re()
            .captures(fields[1])
            .ok_or_else(|| malformed(&file, line_no, format!("Unexpected name format: '{}'", fields[1])))?;
        let seq_name = caps[1].to_string();
        let start: i64 = caps[2]
            .parse()
            .map_err(|_| malformed(&file, line_no, format!("Unexpected name format: '{}'", fields[1])))?;
        let end: i64 = caps[3]
            .parse()
            .map_err(|_| malformed(&file, line_no, format!("Unexpected name format: '{}'", fields[1])))?;
        let scaffold_name = fields[2];
        let strand = Strand::from_word(fields[3]);

        if current.as_ref().map(|s| s.name.as_str() != scaffold_name).unwrap_or(true) {
            if let Some(finished) = current.take() {
                asm.add_scaffold(finished);
            }
            current = Some(Scaffold::new(scaffold_name));
        }
        let frag = Fragment::new(seq_name, start, end, strand);
        current.as_mut().expect("just assigned").append_row(Row::Fragment(frag));
    }

    if let Some(finished) = current.take() {
        asm.add_scaffold(finished);
    }
    Ok(asm)
}

/// Writes `asm` out as TPF — this crate's output format. Unlike
/// [`crate::assembly::Assembly`]'s pretty `Display`, this is the compact
/// line shape `parse_tpf` reads back in.
pub fn write_tpf<W: Write>(writer: &mut W, asm: &Assembly) -> io::Result<()> {
    for scaffold in &asm.scaffolds {
        for row in &scaffold.rows {
            match row {
                Row::Fragment(f) => {
                    writeln!(
                        writer,
                        "?\t{}:{}-{}\t{}\t{}",
                        f.seq_name,
                        f.start,
                        f.end,
                        scaffold.name,
                        f.strand.to_word()
                    )?;
                }
                Row::Gap(g) => {
                    writeln!(writer, "GAP\t{}\t{}", g.gap_type, g.length)?;
                }
            }
        }
    }
    Ok(())
}

fn malformed(file: &str, line: usize, message: String) -> ParseError {
    ParseError::MalformedInput {
        file: file.to_string(),
        line,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TPF: &str = "?\tscaffold_1:1-93024\tscaffold_1\tPLUS\nGAP\tTYPE-2\t200\n?\tscaffold_1:93225-232397\tscaffold_1\tPLUS\nGAP\tTYPE-2\t200\n?\tscaffold_1:232598-261916\tscaffold_1\tPLUS\nGAP\tTYPE-2\t200\n?\tscaffold_1:262117-906261\tscaffold_1\tPLUS\n?\tscaffold_2:1-166725\tscaffold_2\tPLUS\nGAP\tTYPE-2\t200\n?\tscaffold_2:166926-629099\tscaffold_2\tMINUS\nGAP\tTYPE-2\t200\n?\tscaffold_2:629300-719848\tscaffold_2\tMINUS\nGAP\tTYPE-2\t200\n?\tscaffold_2:720049-3207246\tscaffold_2\tPLUS\nGAP\tTYPE-2\t200\n?\tscaffold_2:3207447-3240707\tscaffold_2\tPLUS\n";

    #[test]
    fn gap_before_first_fragment_is_malformed() {
        let err = parse_tpf("GAP\tTYPE-2\t200\n".as_bytes(), "gap_first").unwrap_err();
        match err {
            ParseError::MalformedInput { message, .. } => {
                assert!(message.contains("Gap line before first sequence fragment"));
            }
            _ => panic!("expected MalformedInput"),
        }
    }

    #[test]
    fn bad_fragment_name_is_malformed() {
        let err = parse_tpf("?\tfrag\tscaffold_1\tPLUS\n".as_bytes(), "bad_fragment_name").unwrap_err();
        match err {
            ParseError::MalformedInput { message, .. } => {
                assert!(message.contains("Unexpected name format"));
            }
            _ => panic!("expected MalformedInput"),
        }
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        let err = parse_tpf("?\tscaffold_2:166926-629099\n".as_bytes(), "too_few_fields").unwrap_err();
        match err {
            ParseError::MalformedInput { message, .. } => {
                assert!(message.contains("Wrong field count"));
            }
            _ => panic!("expected MalformedInput"),
        }
    }

    #[test]
    fn parses_tpf_fixture_into_expected_display() {
        let asm = parse_tpf(TPF.as_bytes(), "aaBbbCccc1").unwrap();
        let expected = "Assembly: aaBbbCccc1\n  \
            scaffold_1\n  \
                        1       93024  scaffold_1:1-93024(+)\n  \
                    93025       93224  Gap:200 TYPE-2\n  \
                    93225      232397  scaffold_1:93225-232397(+)\n  \
                   232398      232597  Gap:200 TYPE-2\n  \
                   232598      261916  scaffold_1:232598-261916(+)\n  \
                   261917      262116  Gap:200 TYPE-2\n  \
                   262117      906261  scaffold_1:262117-906261(+)\n  \
            scaffold_2\n  \
                        1      166725  scaffold_2:1-166725(+)\n  \
                   166726      166925  Gap:200 TYPE-2\n  \
                   166926      629099  scaffold_2:166926-629099(-)\n  \
                   629100      629299  Gap:200 TYPE-2\n  \
                   629300      719848  scaffold_2:629300-719848(-)\n  \
                   719849      720048  Gap:200 TYPE-2\n  \
                   720049     3207246  scaffold_2:720049-3207246(+)\n  \
                  3207247     3207446  Gap:200 TYPE-2\n  \
                  3207447     3240707  scaffold_2:3207447-3240707(+)\n";
        assert_eq!(asm.to_string(), expected);
    }

    #[test]
    fn round_trips_through_write_tpf() {
        let asm = parse_tpf(TPF.as_bytes(), "aaBbbCccc1").unwrap();
        let mut buf = Vec::new();
        write_tpf(&mut buf, &asm).unwrap();
        let reparsed = parse_tpf(buf.as_slice(), "aaBbbCccc1").unwrap();
        assert_eq!(asm.to_string(), reparsed.to_string());
    }
}
