use std::{error::Error as StdError, fmt, str::FromStr};

use crate::{error::FieldParseError, ruuvi::Measurement};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Tag key carrying the device tag.
pub const MAC: &str = "mac";

/// Field that is written for every measurement, whatever the filter says.
pub const DATA_FORMAT: &str = "dataFormat";

/// Name of the point timestamp.
pub const TIME: &str = "time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Measured directly by the tag.
    Raw,
    /// Computed from raw values before the measurement reaches the store.
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
}

impl FieldValue {
    /// InfluxDB has no representation for NaN or infinities.
    pub fn is_finite(&self) -> bool {
        match self {
            FieldValue::Float(v) => v.is_finite(),
            FieldValue::Integer(_) => true,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Integer(v) => write!(f, "{v}i"),
        }
    }
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,

    pub kind: FieldKind,

    value: fn(&Measurement) -> Option<FieldValue>,

    parse: fn(&mut Measurement, &str) -> Result<(), BoxError>,
}

impl Field {
    pub fn value(&self, measurement: &Measurement) -> Option<FieldValue> {
        (self.value)(measurement)
    }

    /// Sets the field from its text form. Empty text sets it to `None`.
    pub fn parse(&self, measurement: &mut Measurement, text: &str) -> Result<(), FieldParseError> {
        (self.parse)(measurement, text).map_err(|source| FieldParseError {
            field: self.name,
            value: text.to_string(),
            source,
        })
    }

    pub fn is_derived(&self) -> bool {
        self.kind == FieldKind::Derived
    }

    pub fn by_name(name: &str) -> Option<&'static Field> {
        FIELDS.iter().find(|f| f.name == name)
    }
}

/// Every optional field in the order it is written to a point.
#[rustfmt::skip]
pub static FIELDS: &[Field] = &[
    Field { name: "temperature", kind: FieldKind::Raw, value: |m| m.temperature.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.temperature, s) },
    Field { name: "humidity", kind: FieldKind::Raw, value: |m| m.humidity.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.humidity, s) },
    Field { name: "pressure", kind: FieldKind::Raw, value: |m| m.pressure.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.pressure, s) },
    Field { name: "accelerationX", kind: FieldKind::Raw, value: |m| m.acceleration_x.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.acceleration_x, s) },
    Field { name: "accelerationY", kind: FieldKind::Raw, value: |m| m.acceleration_y.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.acceleration_y, s) },
    Field { name: "accelerationZ", kind: FieldKind::Raw, value: |m| m.acceleration_z.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.acceleration_z, s) },
    Field { name: "batteryVoltage", kind: FieldKind::Raw, value: |m| m.battery_voltage.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.battery_voltage, s) },
    Field { name: "txPower", kind: FieldKind::Raw, value: |m| m.tx_power.map(|v| FieldValue::Integer(v.into())), parse: |m, s| parse_into(&mut m.tx_power, s) },
    Field { name: "movementCounter", kind: FieldKind::Raw, value: |m| m.movement_counter.map(|v| FieldValue::Integer(v.into())), parse: |m, s| parse_into(&mut m.movement_counter, s) },
    Field { name: "measurementSequenceNumber", kind: FieldKind::Raw, value: |m| m.measurement_sequence_number.map(|v| FieldValue::Integer(v.into())), parse: |m, s| parse_into(&mut m.measurement_sequence_number, s) },
    Field { name: "rssi", kind: FieldKind::Raw, value: |m| m.rssi.map(|v| FieldValue::Integer(v.into())), parse: |m, s| parse_into(&mut m.rssi, s) },
    Field { name: "accelerationTotal", kind: FieldKind::Derived, value: |m| m.acceleration_total.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.acceleration_total, s) },
    Field { name: "absoluteHumidity", kind: FieldKind::Derived, value: |m| m.absolute_humidity.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.absolute_humidity, s) },
    Field { name: "dewPoint", kind: FieldKind::Derived, value: |m| m.dew_point.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.dew_point, s) },
    Field { name: "equilibriumVaporPressure", kind: FieldKind::Derived, value: |m| m.equilibrium_vapor_pressure.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.equilibrium_vapor_pressure, s) },
    Field { name: "airDensity", kind: FieldKind::Derived, value: |m| m.air_density.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.air_density, s) },
    Field { name: "accelerationAngleFromX", kind: FieldKind::Derived, value: |m| m.acceleration_angle_from_x.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.acceleration_angle_from_x, s) },
    Field { name: "accelerationAngleFromY", kind: FieldKind::Derived, value: |m| m.acceleration_angle_from_y.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.acceleration_angle_from_y, s) },
    Field { name: "accelerationAngleFromZ", kind: FieldKind::Derived, value: |m| m.acceleration_angle_from_z.map(FieldValue::Float), parse: |m, s| parse_into(&mut m.acceleration_angle_from_z, s) },
];

fn parse_into<T>(slot: &mut Option<T>, text: &str) -> Result<(), BoxError>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    *slot = if text.is_empty() {
        None
    } else {
        Some(text.parse()?)
    };
    Ok(())
}

pub fn raw_fields() -> impl Iterator<Item = &'static Field> {
    FIELDS.iter().filter(|f| f.kind == FieldKind::Raw)
}

pub fn is_derived(name: &str) -> bool {
    Field::by_name(name).is_some_and(Field::is_derived)
}
