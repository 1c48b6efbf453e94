use std::io::Read;

use anyhow::{Context as _, Result, anyhow, bail};
use chrono::{LocalResult, NaiveDateTime};
use chrono_tz::Tz;
use csv::{Reader, StringRecord};
use macaddr::MacAddr6;
use ruuvi_collector::ruuvi::{DATA_FORMAT, Field, MAC, Measurement, TIME, device_tag};
use tracing::warn;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column positions, resolved from the header row.
#[derive(Debug)]
struct Columns {
    mac: Option<usize>,
    data_format: usize,
    time: usize,
    fields: Vec<(usize, &'static Field)>,
}

impl Columns {
    fn from_headers(headers: &StringRecord, has_device_id: bool) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let mac = position(MAC);
        if mac.is_none() && !has_device_id {
            bail!("CSV has no {MAC:?} column and no device id was given");
        }
        let data_format =
            position(DATA_FORMAT).ok_or_else(|| anyhow!("CSV has no {DATA_FORMAT:?} column"))?;
        let time = position(TIME).ok_or_else(|| anyhow!("CSV has no {TIME:?} column"))?;

        let mut fields = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            let header = header.trim();
            if [MAC, DATA_FORMAT, TIME].contains(&header) {
                continue;
            }
            match Field::by_name(header) {
                Some(field) => fields.push((index, field)),
                None => warn!(column = header, "ignoring unknown CSV column"),
            }
        }

        Ok(Self {
            mac,
            data_format,
            time,
            fields,
        })
    }
}

#[derive(Debug)]
pub struct CsvMeasurementIter<R> {
    reader: Reader<R>,
    columns: Columns,
    device_tag: Option<String>,
    timezone: Tz,
}

impl<R: Read> CsvMeasurementIter<R> {
    pub fn new(input: R, device_id: Option<MacAddr6>, timezone: Tz) -> Result<Self> {
        let mut reader = Reader::from_reader(input);
        let headers = reader.headers().context("failed to read CSV header")?;
        let columns = Columns::from_headers(headers, device_id.is_some())?;

        Ok(Self {
            reader,
            columns,
            device_tag: device_id.as_ref().map(device_tag),
            timezone,
        })
    }

    fn parse_row(&self, row: &StringRecord) -> Result<Measurement> {
        let cell = |index: usize| row.get(index).map(str::trim).unwrap_or_default();

        let mac = match (&self.device_tag, self.columns.mac) {
            (Some(tag), _) => tag.clone(),
            (None, Some(index)) => cell(index).to_string(),
            (None, None) => bail!("no device tag for row"),
        };

        let data_format: u8 = cell(self.columns.data_format).parse().with_context(|| {
            format!(
                "failed to parse {DATA_FORMAT}: {}",
                cell(self.columns.data_format)
            )
        })?;

        let time = parse_time(cell(self.columns.time), self.timezone)
            .with_context(|| format!("failed to parse {TIME}: {}", cell(self.columns.time)))?;

        let mut measurement = Measurement::new(mac, data_format, time);
        for &(index, field) in &self.columns.fields {
            field
                .parse(&mut measurement, cell(index))
                .with_context(|| format!("failed to parse {}: {}", field.name, cell(index)))?;
        }

        Ok(measurement)
    }
}

impl<R: Read> Iterator for CsvMeasurementIter<R> {
    type Item = Result<Measurement>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.reader.records().next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e.into())),
        };

        Some(self.parse_row(&row))
    }
}

/// Epoch milliseconds, or a local timestamp in `timezone`.
fn parse_time(cell: &str, timezone: Tz) -> Result<i64> {
    if let Ok(millis) = cell.parse::<i64>() {
        return Ok(millis);
    }

    let naive = NaiveDateTime::parse_from_str(cell, LOCAL_TIME_FORMAT)?;
    let measured_at = match naive.and_local_timezone(timezone) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => bail!("invalid local time in {timezone}"),
    };

    Ok(measured_at.timestamp_millis())
}
