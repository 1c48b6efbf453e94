use std::{convert::Infallible, error::Error as StdError};

use crate::{
    error::ConversionError,
    filter::FilterResolver,
    influx::{MEASUREMENT_NAME, Point},
    ruuvi::{DATA_FORMAT, FIELDS, FieldValue, MAC, Measurement, is_derived},
};

/// Converts with every non-null field included.
pub fn to_point(measurement: &Measurement) -> Point {
    to_point_extended(measurement, true)
}

/// `extended = false` drops the derived fields and keeps every raw one.
pub fn to_point_extended(measurement: &Measurement, extended: bool) -> Point {
    to_point_with(measurement, |field| extended || !is_derived(field))
}

/// Converts using the storage filter configured for the measurement's
/// device tag.
pub fn to_point_for(measurement: &Measurement, resolver: &FilterResolver) -> Point {
    to_point_with(measurement, resolver.allowed(&measurement.mac))
}

/// Converts, keeping each optional field that is non-null and accepted by
/// `allow`. `mac`, `dataFormat` and the timestamp are always written.
///
/// NaN and infinite values have no line protocol form and are treated as
/// null.
pub fn to_point_with<F>(measurement: &Measurement, allow: F) -> Point
where
    F: Fn(&str) -> bool,
{
    let Ok(point) = build_point(measurement, |field| Ok::<_, Infallible>(allow(field)));
    point
}

/// Like [`to_point_with`], but the filter may fail. The first failure aborts
/// the whole conversion.
pub fn try_to_point_with<F, E>(
    measurement: &Measurement,
    mut allow: F,
) -> Result<Point, ConversionError>
where
    F: FnMut(&str) -> Result<bool, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    build_point(measurement, |field| {
        allow(field).map_err(|e| ConversionError::Predicate {
            field,
            source: e.into(),
        })
    })
}

fn build_point<F, E>(measurement: &Measurement, mut allow: F) -> Result<Point, E>
where
    F: FnMut(&'static str) -> Result<bool, E>,
{
    let mut point = Point::new(MEASUREMENT_NAME, measurement.time);
    point.add_tag(MAC, measurement.mac.as_str());
    point.add_field(
        DATA_FORMAT,
        FieldValue::Integer(measurement.data_format.into()),
    );

    for field in FIELDS {
        let Some(value) = field.value(measurement).filter(FieldValue::is_finite) else {
            continue;
        };

        if allow(field.name)? {
            point.add_field(field.name, value);
        }
    }

    Ok(point)
}
