// mod.rs - Output formatters module

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::core::{Screening, SubstitutionMatrix};
use crate::data::{Language, MatrixFile};

/// Delimited text format for score tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tsv,
    Csv,
}

impl OutputFormat {
    pub fn delimiter(&self) -> char {
        match self {
            OutputFormat::Tsv => '\t',
            OutputFormat::Csv => ',',
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unsupported output format: {}. Use: tsv, csv", s)),
        }
    }
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent)
            .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
    }
    Ok(())
}

fn create_writer(file_path: &str) -> Result<BufWriter<File>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    Ok(BufWriter::new(file))
}

fn write_header<W: Write>(writer: &mut W, command_line: &str) -> Result<(), String> {
    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))
        .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# lexdist v{}", env!("CARGO_PKG_VERSION")).map_err(|e| format!("Write error: {}", e))?;
    Ok(())
}

/// Write one row per screened pair: names, families, dERC/LDN and the related flag.
///
/// `members` is the (family, language) slice the screening indices refer to.
pub fn write_scores(
    file_path: &str,
    format: OutputFormat,
    screening: &Screening,
    members: &[(&str, &Language)],
    command_line: &str,
) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    let d = format.delimiter();

    write_header(&mut writer, command_line)?;
    writeln!(writer, "# theta_dERC: {}", screening.theta).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "Language1{d}Family1{d}Language2{d}Family2{d}dERC_LDN{d}Related")
        .map_err(|e| format!("Write error: {}", e))?;

    for score in &screening.scores {
        let (family1, left) = members[score.left];
        let (family2, right) = members[score.right];
        writeln!(
            writer,
            "{}{d}{}{d}{}{d}{}{d}{:.6}{d}{}",
            left.name,
            family1,
            right.name,
            family2,
            score.distance,
            screening.is_related(score)
        )
        .map_err(|e| format!("Write error: {}", e))?;
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Screening scores written to: {}", file_path);
    Ok(())
}

/// Write a substitution matrix as a `symbol1 symbol2 score` table sorted by pair
pub fn write_matrix_table(
    file_path: &str,
    matrix: &SubstitutionMatrix,
    command_line: &str,
) -> Result<(), String> {
    let mut writer = create_writer(file_path)?;
    write_header(&mut writer, command_line)?;
    writeln!(writer, "Symbol1\tSymbol2\tScore").map_err(|e| format!("Write error: {}", e))?;
    for (pair, score) in matrix.entries() {
        writeln!(writer, "{}\t{}\t{:.6}", pair.first(), pair.second(), score)
            .map_err(|e| format!("Write error: {}", e))?;
    }
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Substitution matrix written to: {} ({} entries)", file_path, matrix.len());
    Ok(())
}

/// Write a matrix as a table (`.tsv`) or as a JSON/LZ4 matrix file
pub fn write_matrix(file_path: &str, matrix_file: &MatrixFile, command_line: &str) -> Result<(), String> {
    if file_path.to_lowercase().ends_with(".tsv") {
        let matrix = matrix_file.matrix().map_err(|e| e.to_string())?;
        return write_matrix_table(file_path, &matrix, command_line);
    }
    ensure_parent_dir(file_path)?;
    matrix_file
        .save(Path::new(file_path))
        .map_err(|e| format!("Failed to save matrix: {}", e))?;
    println!(
        "✅ Substitution matrix saved to: {} ({} entries)",
        file_path, matrix_file.metadata.total_entries
    );
    if let Some(note) = &matrix_file.metadata.user_note {
        println!("📝 User note: {}", note);
    }
    Ok(())
}
