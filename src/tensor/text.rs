// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The textual dump format.
//!
//! Each entry is `<dim0>x<dim1>x...x<typeTag>=<space-separated values>`,
//! e.g. `2x3xf32=0.0 0.5 1.0 1.5 2.0 2.5`. A rank-0 entry is just
//! `<typeTag>=<value>`. Float values always carry a decimal point so the
//! entry parses back to the same element type.

use crate::tensor::{ElementType, TensorData, TensorError, TensorValue};

/// Format one value as a dump entry.
pub fn format_entry(value: &TensorValue) -> Result<String, TensorError> {
    let mut parts: Vec<String> = value.shape().iter().map(|d| d.to_string()).collect();
    parts.push(value.element_type().type_tag()?);
    let shape = parts.join("x");
    Ok(format!("{}={}", shape, format_values(value.data())))
}

/// Format values as one dump entry per line.
pub fn format_entries(values: &[TensorValue]) -> Result<String, TensorError> {
    let lines: Vec<String> = values
        .iter()
        .map(format_entry)
        .collect::<Result<_, _>>()?;
    Ok(lines.join("\n"))
}

fn format_values(data: &TensorData) -> String {
    fn join<T: ToString>(values: &[T]) -> String {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
    match data {
        TensorData::I8(v) => join(v),
        TensorData::I16(v) => join(v),
        TensorData::I32(v) => join(v),
        TensorData::I64(v) => join(v),
        TensorData::U8(v) => join(v),
        // Debug formatting keeps the decimal point on whole floats.
        TensorData::F32(v) => v
            .iter()
            .map(|x| format!("{:?}", x))
            .collect::<Vec<_>>()
            .join(" "),
        TensorData::F64(v) => v
            .iter()
            .map(|x| format!("{:?}", x))
            .collect::<Vec<_>>()
            .join(" "),
        TensorData::Bool(v) => join(v),
    }
}

/// Parse one dump entry back into a value.
///
/// The round-trip is informational: an entry formatted from unsigned storage
/// parses back as the signed type of the same width, because the tag does
/// not record signedness.
pub fn parse_entry(entry: &str) -> Result<TensorValue, TensorError> {
    let (lhs, rhs) = entry
        .split_once('=')
        .ok_or_else(|| TensorError::MissingSeparator(entry.to_string()))?;

    let mut tokens: Vec<&str> = lhs.split('x').collect();
    let tag = tokens.pop().unwrap_or("");
    let element_type = match tag {
        "i8" => ElementType::I8,
        "i16" => ElementType::I16,
        "i32" => ElementType::I32,
        "i64" => ElementType::I64,
        "f32" => ElementType::F32,
        "f64" => ElementType::F64,
        other => return Err(TensorError::UnknownTypeTag(other.to_string())),
    };

    let shape: Vec<usize> = tokens
        .iter()
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| TensorError::InvalidDimension(t.to_string()))
        })
        .collect::<Result<_, _>>()?;

    let values: Vec<&str> = rhs.split_whitespace().collect();
    let expected: usize = shape.iter().product();
    if values.len() != expected {
        return Err(TensorError::ValueCountMismatch {
            expected,
            found: values.len(),
        });
    }

    let data = parse_values(&values, element_type)?;
    TensorValue::new(shape, data)
}

/// Parse a multi-line dump, skipping blank lines.
pub fn parse_entries(dump: &str) -> Result<Vec<TensorValue>, TensorError> {
    dump.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_values(tokens: &[&str], element_type: ElementType) -> Result<TensorData, TensorError> {
    fn parse_all<T: std::str::FromStr>(
        tokens: &[&str],
        element_type: ElementType,
    ) -> Result<Vec<T>, TensorError> {
        tokens
            .iter()
            .map(|t| {
                t.parse::<T>().map_err(|_| TensorError::InvalidValue {
                    token: t.to_string(),
                    element_type,
                })
            })
            .collect()
    }
    Ok(match element_type {
        ElementType::I8 => TensorData::I8(parse_all(tokens, element_type)?),
        ElementType::I16 => TensorData::I16(parse_all(tokens, element_type)?),
        ElementType::I32 => TensorData::I32(parse_all(tokens, element_type)?),
        ElementType::I64 => TensorData::I64(parse_all(tokens, element_type)?),
        ElementType::U8 => TensorData::U8(parse_all(tokens, element_type)?),
        ElementType::F32 => TensorData::F32(parse_all(tokens, element_type)?),
        ElementType::F64 => TensorData::F64(parse_all(tokens, element_type)?),
        ElementType::Bool => return Err(TensorError::UnsupportedElementType(element_type)),
    })
}
