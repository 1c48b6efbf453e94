/// One decoded RuuviTag reading.
///
/// `mac`, `data_format` and `time` are structural and always end up in the
/// stored point. Every other value is optional; `None` means "not measured".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    pub mac: String,

    pub data_format: u8,

    /// Epoch milliseconds.
    pub time: i64,

    pub temperature: Option<f64>,

    pub humidity: Option<f64>,

    pub pressure: Option<f64>,

    pub acceleration_x: Option<f64>,

    pub acceleration_y: Option<f64>,

    pub acceleration_z: Option<f64>,

    pub battery_voltage: Option<f64>,

    pub tx_power: Option<i32>,

    pub movement_counter: Option<u32>,

    pub measurement_sequence_number: Option<u32>,

    pub rssi: Option<i32>,

    pub acceleration_total: Option<f64>,

    pub absolute_humidity: Option<f64>,

    pub dew_point: Option<f64>,

    pub equilibrium_vapor_pressure: Option<f64>,

    pub air_density: Option<f64>,

    pub acceleration_angle_from_x: Option<f64>,

    pub acceleration_angle_from_y: Option<f64>,

    pub acceleration_angle_from_z: Option<f64>,
}

impl Measurement {
    pub fn new(mac: impl Into<String>, data_format: u8, time: i64) -> Self {
        Self {
            mac: mac.into(),
            data_format,
            time,
            ..Default::default()
        }
    }
}
