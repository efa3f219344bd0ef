use crate::domain::{Price, Record, RecordError};

/// Parse one comma-separated source line into a record
///
/// Rejects blank lines, lines with fewer than three fields, an id that is not
/// an integer, and a price that is not a non-negative decimal. Fields past
/// the third are ignored. The name is kept verbatim.
pub fn parse_line(line: &str) -> Result<Record, RecordError> {
    if line.trim().is_empty() {
        return Err(RecordError::Blank);
    }
    parse_fields(line.split(','))
}

/// Parse already-split fields into a record
pub fn parse_fields<'a, I>(fields: I) -> Result<Record, RecordError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = fields.into_iter();

    let (id_field, name, price_field) = match (fields.next(), fields.next(), fields.next()) {
        (Some(id), Some(name), Some(price)) => (id, name, price),
        (None, _, _) => return Err(RecordError::Blank),
        (Some(only), None, _) if only.trim().is_empty() => return Err(RecordError::Blank),
        (Some(_), None, _) => return Err(RecordError::MissingFields { found: 1 }),
        (Some(_), Some(_), None) => return Err(RecordError::MissingFields { found: 2 }),
    };

    let id: i64 = id_field
        .trim()
        .parse()
        .map_err(|_| RecordError::InvalidId(id_field.to_string()))?;
    let price = Price::parse(price_field)?;

    Ok(Record::new(id, name, price))
}
