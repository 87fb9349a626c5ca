//! Format A: PretextView's AGP-like edit-assembly export. Read-only in
//! this crate — curators hand it in as `--pretext`, never written back
//! out, though `write_agp` exists alongside it for round-trip testing.
//!
//! Line shape for a sequence row (component type `W`): `object, obj_start,
//! obj_end, part_number, W, target, t_start, t_end, orientation, tags...`.
//! For a gap row (component type `U`/`N`): `object, obj_start, obj_end,
//! part_number, U, length, gap_type, linkage, linkage_evidence`. Mirrors
//! the teacher's `BedReader` (`src/bed.rs`): a line-buffered reader
//! tracking its own line number for error messages.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::OnceLock;

use regex::Regex;

use crate::assembly::Assembly;
use crate::error::{ParseError, ParseResult};
use crate::fragment::{Fragment, Strand};
use crate::gap::Gap;
use crate::row::Row;
use crate::scaffold::Scaffold;

fn resolution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"HiC MAP RESOLUTION:\s*([0-9.]+)\s*bp/texel").unwrap())
}

/// Parses an AGP-like stream into an [`Assembly`] named `name`.
pub fn parse_agp<R: Read>(reader: R, name: &str) -> ParseResult<Assembly> {
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

        if let Some(rest) = line.strip_prefix('#') {
            if rest.starts_with('#') {
                // "##agp-version ..." format declaration, not a comment to
                // preserve.
                continue;
            }
            let text = rest.trim_start();
            if text.is_empty() {
                continue;
            }
            if let Some(caps) = resolution_re().captures(text) {
                asm.bp_per_texel = caps[1].parse().ok();
            }
            asm.header_lines.push(text.to_string());
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(malformed(&file, line_no, format!("Wrong field count: {}", fields.len())));
        }

        let object = fields[0];
        if current.as_ref().map(|s| s.name.as_str() != object).unwrap_or(true) {
            if let Some(finished) = current.take() {
                asm.add_scaffold(finished);
            }
            current = Some(Scaffold::new(object));
        }
        let scaffold = current.as_mut().expect("just assigned");

        match fields[4] {
            "W" => {
                if fields.len() < 9 {
                    return Err(malformed(&file, line_no, format!("Wrong field count: {}", fields.len())));
                }
                let comp_id = fields[5];
                let comp_start = parse_coord(&file, line_no, fields[6])?;
                let comp_end = parse_coord(&file, line_no, fields[7])?;
                let strand = Strand::from_char(fields[8].chars().next().unwrap_or('.'));
                let mut frag = Fragment::new(comp_id, comp_start, comp_end, strand);
                frag.tags = fields[9..].iter().map(|s| s.to_string()).collect();
                scaffold.append_row(Row::Fragment(frag));
            }
            "U" | "N" => {
                if fields.len() < 6 {
                    return Err(malformed(&file, line_no, format!("Wrong field count: {}", fields.len())));
                }
                let gap_len = parse_coord(&file, line_no, fields[5])?;
                let gap_type = fields.get(6).copied().unwrap_or("scaffold");
                scaffold.append_row(Row::Gap(Gap::new(gap_len, gap_type)));
            }
            other => {
                return Err(malformed(
                    &file,
                    line_no,
                    format!("Unexpected component type: '{other}'"),
                ));
            }
        }
    }

    if let Some(finished) = current.take() {
        asm.add_scaffold(finished);
    }
    Ok(asm)
}

/// Writes `asm` back out as an AGP-like stream, for round-trip testing.
/// Linkage fields are not preserved by the parser, so they're emitted
/// with fixed placeholder values (`yes`, `paired-ends`) on gap rows.
pub fn write_agp<W: Write>(writer: &mut W, asm: &Assembly) -> io::Result<()> {
    writeln!(writer, "##agp-version 2.1")?;
    for line in &asm.header_lines {
        writeln!(writer, "# {line}")?;
    }
    for scaffold in &asm.scaffolds {
        let mut pos = 1i64;
        for (part, row) in scaffold.rows.iter().enumerate() {
            let len = row.length();
            let obj_end = pos + len - 1;
            match row {
                Row::Fragment(f) => {
                    write!(
                        writer,
                        "{}\t{}\t{}\t{}\tW\t{}\t{}\t{}\t{}",
                        scaffold.name,
                        pos,
                        obj_end,
                        part + 1,
                        f.seq_name,
                        f.start,
                        f.end,
                        f.strand
                    )?;
                    for tag in &f.tags {
                        write!(writer, "\t{tag}")?;
                    }
                    writeln!(writer)?;
                }
                Row::Gap(g) => {
                    writeln!(
                        writer,
                        "{}\t{}\t{}\t{}\tU\t{}\t{}\tyes\tpaired-ends",
                        scaffold.name,
                        pos,
                        obj_end,
                        part + 1,
                        g.length,
                        g.gap_type
                    )?;
                }
            }
            pos += len;
        }
    }
    Ok(())
}

fn parse_coord(file: &str, line: usize, s: &str) -> ParseResult<i64> {
    s.parse()
        .map_err(|_| malformed(file, line, format!("Expected an integer, got '{s}'")))
}

fn malformed(file: &str, line: usize, message: String) -> ParseError {
    ParseError::MalformedInput {
        file: file.to_string(),
        line,
        message,
    }
}
