//! Bounding-box extraction from propagation tool output

/// Field separator in the tool's bounding-box line
pub const FIELD_SEPARATOR: char = '|';

/// Extract the first four numbers from pipe-delimited tool output.
///
/// Fields are trimmed before parsing, so the trailing newline of the last
/// field does not hide a value. Fields that do not parse are skipped. When
/// fewer than four numbers are found the remaining slots stay at `0.0`.
pub fn parse_bounding_box(output: &str) -> [f64; 4] {
    let mut bbox = [0.0; 4];

    let values = output
        .split(FIELD_SEPARATOR)
        .filter_map(|field| field.trim().parse::<f64>().ok());

    for (slot, value) in bbox.iter_mut().zip(values) {
        *slot = value;
    }

    bbox
}
