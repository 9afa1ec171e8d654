//! Readers for the whitespace-separated scale and smearing tables.

use super::category::{CategoryKey, Interval};
use super::config::{ScaleFormat, SmearingFormat};
use super::correction::{CorrectionTable, CorrectionValue};
use super::error::{Error, Result};
use std::f64::consts::FRAC_PI_2;
use std::io::BufRead;
use std::str::FromStr;

/// Run range assigned to smearing categories whose layout has no run columns.
const SMEARING_RUNS: (u32, u32) = (0, 900_000);

/// Token standing for π/2 in the angle columns of smearing tables.
const HALF_PI_TOKEN: &str = "M_PI_2";

// lines of a table without blank lines and comments, up to the first read error
fn rows<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, String)> {
    reader
        .lines()
        .enumerate()
        .map_while(|(index, line)| match line {
            Ok(line) => Some((index + 1, line)),
            Err(err) => {
                log::warn!("stopped reading table at line {}: {err}", index + 1);
                None
            }
        })
        .filter(|(_, line)| {
            let line = line.trim_start();
            !line.is_empty() && !line.starts_with('#')
        })
}

fn column<T: FromStr>(tokens: &[&str], index: usize) -> Option<T> {
    tokens.get(index)?.parse().ok()
}

fn parse_angle(token: &str) -> Result<f64> {
    if token == HALF_PI_TOKEN {
        Ok(FRAC_PI_2)
    } else {
        token
            .parse()
            .map_err(|_| Error::InvalidAngle(token.to_owned()))
    }
}

fn malformed(number: usize, line: &str) {
    log::warn!("stopped reading table at malformed line {number}: `{line}`");
}

fn scale_row(tokens: &[&str], format: ScaleFormat) -> Option<(CategoryKey, CorrectionValue)> {
    match format {
        ScaleFormat::Label => {
            let label = tokens.first()?;
            let key =
                CategoryKey::from_label(label).with_runs(column(tokens, 2)?, column(tokens, 3)?);
            let value = CorrectionValue::scale(
                column(tokens, 4)?,
                column(tokens, 6)?,
                column(tokens, 7)?,
                if tokens.len() > 8 { column(tokens, 8)? } else { 0.0 },
            );

            Some((key, value))
        }
        ScaleFormat::Numeric => {
            let interval =
                |index| Some(Interval::new(column(tokens, index)?, column(tokens, index + 1)?));
            let key = CategoryKey::new(
                Interval::new(column(tokens, 0)?, column(tokens, 1)?),
                interval(2)?,
                interval(4)?,
                interval(6)?,
                column(tokens, 8)?,
            );
            let value = CorrectionValue::scale(column(tokens, 9)?, column(tokens, 10)?, 0.0, 0.0);

            Some((key, value))
        }
    }
}

/// Reads a scale table in the given layout. Reading stops at the first malformed line or read
/// error; the rows read up to that point are kept. In the numeric layout a first line starting
/// with `r` is treated as header.
///
/// # Errors
///
/// Returns [`Error::DuplicateCategory`] if two rows describe equivalent categories.
pub fn read_scales<R: BufRead>(reader: R, format: ScaleFormat) -> Result<CorrectionTable> {
    let mut table = CorrectionTable::new();

    for (position, (number, line)) in rows(reader).enumerate() {
        if position == 0 && format == ScaleFormat::Numeric && line.trim_start().starts_with('r') {
            continue;
        }

        let tokens: Vec<_> = line.split_whitespace().collect();

        let Some((key, value)) = scale_row(&tokens, format) else {
            malformed(number, &line);
            break;
        };

        table.insert(key, value)?;
    }

    Ok(table)
}

fn smearing_row(
    tokens: &[&str],
    format: SmearingFormat,
) -> Result<Option<(CategoryKey, CorrectionValue)>> {
    let Some(label) = tokens.first() else {
        return Ok(None);
    };
    let key = CategoryKey::from_label(label);

    let row = match format {
        SmearingFormat::Legacy => {
            let numbers: Option<Vec<f64>> = (8..14).map(|index| column(tokens, index)).collect();
            let run_min = column::<i64>(tokens, 6).map(|run| u32::try_from(run.max(0)).ok());
            let run_max = column::<i64>(tokens, 7).map(|run| u32::try_from(run).ok());

            match (numbers, run_min.flatten(), run_max.flatten()) {
                (Some(numbers), Some(run_min), Some(run_max)) => Some((
                    key.with_runs(run_min, run_max),
                    CorrectionValue::smearing(
                        (numbers[2], numbers[3]),
                        (numbers[4], numbers[5]),
                        (numbers[0], numbers[1]),
                    ),
                )),
                _ => None,
            }
        }
        SmearingFormat::Compact => {
            let numbers: Option<Vec<f64>> = (1..5).map(|index| column(tokens, index)).collect();

            match (numbers, tokens.get(5), tokens.get(6)) {
                (Some(numbers), Some(phi), Some(phi_err)) => Some((
                    key.with_runs(SMEARING_RUNS.0, SMEARING_RUNS.1),
                    CorrectionValue::smearing(
                        (numbers[2], numbers[3]),
                        (parse_angle(phi)?, parse_angle(phi_err)?),
                        (numbers[0], numbers[1]),
                    ),
                )),
                _ => None,
            }
        }
        SmearingFormat::Minimal => match (column(tokens, 1), column(tokens, 2)) {
            (Some(rho), Some(phi)) => Some((
                key.with_runs(SMEARING_RUNS.0, SMEARING_RUNS.1),
                CorrectionValue::smearing((rho, 0.0), (phi, 0.0), (0.0, 0.0)),
            )),
            _ => None,
        },
    };

    Ok(row)
}

/// Reads a smearing table in the given layout. Blank lines and lines starting with `#` are
/// skipped; reading stops at the first malformed line or read error.
///
/// # Errors
///
/// Returns [`Error::InvalidAngle`] if an angle column of the compact layout is neither a number
/// nor `M_PI_2`, and [`Error::DuplicateCategory`] if two rows describe equivalent categories.
pub fn read_smearings<R: BufRead>(reader: R, format: SmearingFormat) -> Result<CorrectionTable> {
    let mut table = CorrectionTable::new();

    for (number, line) in rows(reader) {
        let tokens: Vec<_> = line.split_whitespace().collect();

        let Some((key, value)) = smearing_row(&tokens, format)? else {
            malformed(number, &line);
            break;
        };

        table.insert(key, value)?;
    }

    Ok(table)
}
