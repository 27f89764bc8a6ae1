//! Генератор диапазонов: превращает `RangeSpec` в упорядоченный список пар
//! (ряд, место) для вставки. Ничего не мутирует.
//!
//! Правила:
//! 1.  Если обе границы числовые - перечисляется целый диапазон по возрастанию с шагом 1.
//!     Нечисловые границы допустимы только равными (один литеральный ряд/место).
//!     Смешанные границы (`"1"`..`"B"`) - `InvalidRange`.
//! 2.  Четность применяется только к числовым местам.
//! 3.  Метка ряда - `row_prefix + номер + row_suffix`, номер без дополнения нулями.
//! 4.  В непрерывном режиме счетчик мест не сбрасывается на новом ряду.
//! 5.  Пары выдаются построчно, дубликаты отбрасываются.

use std::collections::HashSet;
use tracing::debug;

use crate::error::SeatingError;
use crate::models::range::{Parity, Placement, RangeSpec};
use crate::models::seat::parse_integer;

/// Верхняя граница числа пар за один запрос.
pub const MAX_PLACEMENTS: usize = 100_000;

#[derive(Debug)]
enum Span {
    Numeric { start: i64, end: i64 },
    Literal(String),
}

impl Span {
    fn parse(kind: &str, start: &str, end: &str) -> Result<Self, SeatingError> {
        if start.trim().is_empty() || end.trim().is_empty() {
            return Err(SeatingError::InvalidRange(format!(
                "{} bounds must not be empty",
                kind
            )));
        }
        match (parse_integer(start), parse_integer(end)) {
            (Some(start), Some(end)) => Ok(Span::Numeric { start, end }),
            (None, None) if start == end => Ok(Span::Literal(start.to_string())),
            (None, None) => Err(SeatingError::InvalidRange(format!(
                "non-numeric {} bounds '{}' and '{}' cannot be enumerated",
                kind, start, end
            ))),
            _ => Err(SeatingError::InvalidRange(format!(
                "mixed numeric and non-numeric {} bounds '{}' and '{}'",
                kind, start, end
            ))),
        }
    }

    /// Длина числового диапазона; пустой, если start > end.
    fn checked_len(start: i64, end: i64) -> Result<usize, SeatingError> {
        if start > end {
            return Ok(0);
        }
        let len = (end as i128) - (start as i128) + 1;
        if len > MAX_PLACEMENTS as i128 {
            return Err(too_large());
        }
        Ok(len as usize)
    }
}

fn too_large() -> SeatingError {
    SeatingError::InvalidRange(format!(
        "range produces more than {} seats",
        MAX_PLACEMENTS
    ))
}

/// Места одного ряда до применения непрерывной нумерации.
enum SeatSpan {
    Numbers(Vec<i64>),
    Literal(String),
}

fn row_numbers(spec: &RangeSpec) -> Result<Vec<String>, SeatingError> {
    let rows = match Span::parse("row", &spec.start_row, &spec.end_row)? {
        Span::Numeric { start, end } => {
            Span::checked_len(start, end)?;
            if start > end {
                Vec::new()
            } else {
                (start..=end).map(|n| n.to_string()).collect()
            }
        }
        Span::Literal(label) => vec![label],
    };
    Ok(rows)
}

fn seat_span(spec: &RangeSpec) -> Result<SeatSpan, SeatingError> {
    match Span::parse("seat", &spec.start_seat, &spec.end_seat)? {
        Span::Numeric { start, end } => {
            Span::checked_len(start, end)?;
            if start > end {
                return Ok(SeatSpan::Numbers(Vec::new()));
            }
            let numbers = (start..=end).filter(|n| spec.parity.accepts(*n)).collect();
            Ok(SeatSpan::Numbers(numbers))
        }
        Span::Literal(label) => {
            if spec.parity != Parity::All {
                return Err(SeatingError::InvalidRange(format!(
                    "parity filter needs numeric seats, got '{}'",
                    label
                )));
            }
            if spec.continuous {
                return Err(SeatingError::InvalidRange(format!(
                    "continuous numbering needs numeric seats, got '{}'",
                    label
                )));
            }
            Ok(SeatSpan::Literal(label))
        }
    }
}

/// Номера мест для ряда с индексом `row_index` в непрерывном режиме:
/// счетчик продолжает с того места, где закончил предыдущий ряд.
fn continuous_seats(
    numbers: &[i64],
    row_index: usize,
    step: i64,
) -> Result<Vec<String>, SeatingError> {
    let Some(&first) = numbers.first() else {
        return Ok(Vec::new());
    };
    let per_row = numbers.len();
    (0..per_row)
        .map(|j| {
            let offset = (row_index * per_row + j) as i64;
            offset
                .checked_mul(step)
                .and_then(|delta| first.checked_add(delta))
                .map(|n| n.to_string())
                .ok_or_else(|| SeatingError::InvalidRange("seat number overflow".to_string()))
        })
        .collect()
}

/// Разворачивает спецификацию в пары (ряд, место) в порядке вставки.
///
/// `existing_rows` - метки рядов, уже присутствующих в секции: флаг
/// `unnumbered` ставится только на ряды, которые создаст этот диапазон.
pub fn generate(
    spec: &RangeSpec,
    existing_rows: &[String],
) -> Result<Vec<Placement>, SeatingError> {
    spec.check()?;

    let rows = row_numbers(spec)?;
    let seats = seat_span(spec)?;

    let per_row = match &seats {
        SeatSpan::Numbers(numbers) => numbers.len(),
        SeatSpan::Literal(_) => 1,
    };
    if rows.len().saturating_mul(per_row) > MAX_PLACEMENTS {
        return Err(too_large());
    }

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut placements = Vec::with_capacity(rows.len() * per_row);

    for (row_index, number) in rows.iter().enumerate() {
        let row = format!("{}{}{}", spec.row_prefix, number, spec.row_suffix);
        let unnumbered = spec.unnumbered_rows && !existing_rows.contains(&row);

        let row_seats: Vec<String> = match &seats {
            SeatSpan::Literal(label) => vec![label.clone()],
            SeatSpan::Numbers(numbers) if spec.continuous => {
                continuous_seats(numbers, row_index, spec.parity.step())?
            }
            SeatSpan::Numbers(numbers) => numbers.iter().map(|n| n.to_string()).collect(),
        };

        for seat in row_seats {
            if seen.insert((row.clone(), seat.clone())) {
                placements.push(Placement {
                    row: row.clone(),
                    seat,
                    unnumbered,
                });
            }
        }
    }

    debug!(
        "Generated {} placements for rows {}..{} seats {}..{}",
        placements.len(),
        spec.start_row,
        spec.end_row,
        spec.start_seat,
        spec.end_seat
    );
    Ok(placements)
}
