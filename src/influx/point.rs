use std::fmt;

use indexmap::IndexMap;

use crate::ruuvi::FieldValue;

/// InfluxDB measurement every RuuviTag point is written to.
pub const MEASUREMENT_NAME: &str = "ruuvi_measurements";

/// One store-ready measurement: tags, typed fields and a millisecond
/// timestamp. Fields keep the order they were added in.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: &'static str,

    tags: IndexMap<&'static str, String>,

    fields: IndexMap<&'static str, FieldValue>,

    time: i64,
}

impl Point {
    pub fn new(measurement: &'static str, time: i64) -> Self {
        Self {
            measurement,
            tags: IndexMap::new(),
            fields: IndexMap::new(),
            time,
        }
    }

    pub fn add_tag(&mut self, key: &'static str, value: impl Into<String>) {
        self.tags.insert(key, value.into());
    }

    pub fn add_field(&mut self, name: &'static str, value: FieldValue) {
        self.fields.insert(name, value);
    }

    pub fn measurement(&self) -> &str {
        self.measurement
    }

    pub fn tags(&self) -> &IndexMap<&'static str, String> {
        &self.tags
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &IndexMap<&'static str, FieldValue> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).copied()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Epoch milliseconds.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Renders the point as one line of InfluxDB line protocol with
    /// millisecond precision.
    pub fn to_line_protocol(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", escape(self.measurement, &[',', ' ']))?;

        // Line protocol has no representation for an empty tag value.
        for (key, value) in self.tags.iter().filter(|(_, v)| !v.is_empty()) {
            write!(
                f,
                ",{}={}",
                escape(key, &[',', '=', ' ']),
                escape(value, &[',', '=', ' '])
            )?;
        }

        for (i, (name, value)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ' ' } else { ',' };
            write!(f, "{sep}{}={value}", escape(name, &[',', '=', ' ']))?;
        }

        write!(f, " {}", self.time)
    }
}

fn escape(s: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_line_protocol() {
        let mut point = Point::new(MEASUREMENT_NAME, 1_700_000_000_123);
        point.add_tag("mac", "AAAAAAAAAAAA");
        point.add_field("dataFormat", FieldValue::Integer(5));
        point.add_field("temperature", FieldValue::Float(21.5));
        point.add_field("rssi", FieldValue::Integer(-80));

        assert_eq!(
            point.to_line_protocol(),
            "ruuvi_measurements,mac=AAAAAAAAAAAA dataFormat=5i,temperature=21.5,rssi=-80i 1700000000123"
        );
    }

    #[test]
    fn escapes_tag_values() {
        let mut point = Point::new(MEASUREMENT_NAME, 1);
        point.add_tag("mac", "a b,c=d");
        point.add_field("dataFormat", FieldValue::Integer(3));

        assert_eq!(
            point.to_line_protocol(),
            r"ruuvi_measurements,mac=a\ b\,c\=d dataFormat=3i 1"
        );
    }

    #[test]
    fn skips_empty_tag_values() {
        let mut point = Point::new(MEASUREMENT_NAME, 7);
        point.add_tag("mac", "");
        point.add_field("dataFormat", FieldValue::Integer(3));

        assert_eq!(point.tag("mac"), Some(""));
        assert_eq!(point.to_line_protocol(), "ruuvi_measurements dataFormat=3i 7");
    }

    #[test]
    fn keeps_field_insertion_order() {
        let mut point = Point::new(MEASUREMENT_NAME, 1);
        point.add_field("pressure", FieldValue::Float(100_000.0));
        point.add_field("humidity", FieldValue::Float(40.0));

        let names: Vec<_> = point.fields().keys().copied().collect();
        assert_eq!(names, ["pressure", "humidity"]);
    }
}
