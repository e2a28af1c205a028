use regex::Regex;

use super::demands::DemandMatrix;
use super::parse_tree::{XmlOdMatrixValues, XmlOdOrigin, XmlOdRow};
use super::registry::IdRegistry;
use super::zoning::Zone;
use super::InputError;


pub const DEFAULT_SEPARATOR: &str = ",";

/// Decodes one OD matrix element into `matrix`, multiplying every value by `pcu`.
///
/// Cell-by-cell matrices address zones by id. Row matrices name each origin by id but address
/// destinations by ordinal, and raw matrices address every zone by ordinal. On failure the cells
/// written so far stay in `matrix`; callers are expected to discard it.
pub fn decode_od_matrix(values: &XmlOdMatrixValues, pcu: f64, zones: &IdRegistry<Zone>,
                        matrix: &mut DemandMatrix, label: &str) -> Result<(), InputError> {
    match values {
        XmlOdMatrixValues::CellByCell(origins) => {
            decode_cell_by_cell(origins, pcu, zones, matrix, label)
        }
        XmlOdMatrixValues::Row {separator, rows} => {
            let separator = separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
            decode_rows(rows, separator, pcu, zones, matrix, label)
        }
        XmlOdMatrixValues::Raw {origin_separator, destination_separator, values} => {
            let origin_separator = origin_separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
            let destination_separator = destination_separator.as_deref()
                                                             .unwrap_or(DEFAULT_SEPARATOR);
            if origin_separator == destination_separator {
                decode_raw_flat(values, origin_separator, pcu, zones, matrix, label)
            } else {
                decode_raw_rows(values, origin_separator, destination_separator, pcu, zones,
                                matrix, label)
            }
        }
    }
}

/// Splits on the literal separator. The separator is escaped before it is compiled, so
/// characters such as `+`, `*` or `^` are not treated as regex syntax. A single trailing
/// separator is tolerated.
pub fn split_on_separator<'a>(values: &'a str, separator: &str)
                              -> Result<Vec<&'a str>, InputError> {
    if separator.is_empty() {
        return Err(InputError::InvalidValue {
            field: String::from("OD matrix separator"),
            value: String::from(separator),
            reason: String::from("must not be empty"),
        });
    }
    let pattern = Regex::new(&regex::escape(separator)).map_err(|err| InputError::InvalidValue {
        field: String::from("OD matrix separator"),
        value: String::from(separator),
        reason: err.to_string(),
    })?;
    let mut tokens: Vec<&str> = pattern.split(values.trim()).map(str::trim).collect();
    if tokens.len() > 1 && tokens.last() == Some(&"") {
        tokens.pop();
    }
    Ok(tokens)
}

/// Parses one trip count. Demand is never negative.
fn parse_demand(token: &str, context: &str) -> Result<f64, InputError> {
    let value: f64 = token.trim().parse().map_err(|_| InputError::NumericFormat {
        token: token.to_string(),
        context: context.to_string(),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(InputError::InvalidValue {
            field: format!("demand in {}", context),
            value: token.to_string(),
            reason: String::from("must be a non-negative number"),
        });
    }
    Ok(value)
}

fn zone_at<'a>(zones: &'a IdRegistry<Zone>, ordinal: usize, label: &str)
               -> Result<&'a Zone, InputError> {
    zones.get_by_ordinal(ordinal).ok_or_else(|| InputError::UnresolvedReference {
        kind: zones.kind(),
        id: format!("#{}", ordinal + 1),
        referrer: String::from(label),
    })
}

fn decode_cell_by_cell(origins: &[XmlOdOrigin], pcu: f64, zones: &IdRegistry<Zone>,
                       matrix: &mut DemandMatrix, label: &str) -> Result<(), InputError> {
    for origin_cells in origins {
        let origin = zones.lookup(&origin_cells.zone_ref, label)?;
        for cell in &origin_cells.cells {
            let destination = zones.lookup(&cell.zone_ref, label)?;
            let context = format!("{} cell ({}, {})", label, origin.id, destination.id);
            let value = parse_demand(&cell.value, &context)?;
            matrix.set(origin, destination, value * pcu);
        }
    }
    Ok(())
}

fn decode_rows(rows: &[XmlOdRow], separator: &str, pcu: f64, zones: &IdRegistry<Zone>,
               matrix: &mut DemandMatrix, label: &str) -> Result<(), InputError> {
    for row in rows {
        let origin = zones.lookup(&row.zone_ref, label)?;
        let tokens = split_on_separator(&row.values, separator)?;
        if tokens.len() != zones.len() {
            return Err(InputError::MatrixShape {
                element: String::from(label),
                message: format!("row for origin '{}' has {} values, expected one per zone ({})",
                                 origin.id, tokens.len(), zones.len()),
            });
        }
        for (dd, token) in tokens.iter().enumerate() {
            let destination = zone_at(zones, dd, label)?;
            let context = format!("{} row '{}'", label, origin.id);
            let value = parse_demand(token, &context)?;
            matrix.set(origin, destination, value * pcu);
        }
    }
    Ok(())
}

/// Raw matrix whose origin and destination separators coincide: the values form one flat,
/// row-major list whose length must be a perfect square.
fn decode_raw_flat(values: &str, separator: &str, pcu: f64, zones: &IdRegistry<Zone>,
                   matrix: &mut DemandMatrix, label: &str) -> Result<(), InputError> {
    let tokens = split_on_separator(values, separator)?;
    let num_values = tokens.len();
    let side = (num_values as f64).sqrt().round() as usize;
    if side * side != num_values {
        return Err(InputError::MatrixShape {
            element: String::from(label),
            message: format!("{} values do not form a square matrix (closest is {}x{} = {})",
                             num_values, side, side, side * side),
        });
    }

    for (ii, token) in tokens.iter().enumerate() {
        let origin = zone_at(zones, ii / side, label)?;
        let destination = zone_at(zones, ii % side, label)?;
        let context = format!("{} cell ({}, {})", label, origin.id, destination.id);
        let value = parse_demand(token, &context)?;
        matrix.set(origin, destination, value * pcu);
    }
    Ok(())
}

/// Raw matrix with distinct separators: split into rows first, then each row into columns.
/// Every row needs as many columns as there are rows.
fn decode_raw_rows(values: &str, origin_separator: &str, destination_separator: &str, pcu: f64,
                   zones: &IdRegistry<Zone>, matrix: &mut DemandMatrix, label: &str)
                   -> Result<(), InputError> {
    let rows = split_on_separator(values, origin_separator)?;
    let num_rows = rows.len();
    for (oo, row) in rows.iter().enumerate() {
        let tokens = split_on_separator(row, destination_separator)?;
        if tokens.len() != num_rows {
            return Err(InputError::MatrixShape {
                element: String::from(label),
                message: format!("row {} has {} values, expected {} to match the number of rows",
                                 oo + 1, tokens.len(), num_rows),
            });
        }
        let origin = zone_at(zones, oo, label)?;
        for (dd, token) in tokens.iter().enumerate() {
            let destination = zone_at(zones, dd, label)?;
            let context = format!("{} cell ({}, {})", label, origin.id, destination.id);
            let value = parse_demand(token, &context)?;
            matrix.set(origin, destination, value * pcu);
        }
    }
    Ok(())
}
