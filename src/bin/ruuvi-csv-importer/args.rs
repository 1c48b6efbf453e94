use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Parser;
use macaddr::MacAddr6;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long)]
    pub file: PathBuf,

    /// Storage filter configuration (TOML). Everything is stored without one.
    #[arg(long, env = "RUUVI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Tag every row with this device instead of the `mac` column.
    #[arg(long)]
    pub device_id: Option<MacAddr6>,

    /// Timezone of `time` cells written as `%Y-%m-%d %H:%M:%S`.
    #[arg(long, env = "TZ", default_value = "UTC")]
    pub timezone: Tz,

    #[arg(long, env = "INFLUX_URL", default_value = "http://localhost:8086")]
    pub influx_url: String,

    #[arg(long, env = "INFLUX_DATABASE", default_value = "ruuvi")]
    pub influx_database: String,

    #[arg(long, env = "INFLUX_RETENTION_POLICY")]
    pub influx_retention_policy: Option<String>,

    #[arg(long, env = "INFLUX_USER")]
    pub influx_user: Option<String>,

    #[arg(long, env = "INFLUX_PASSWORD", hide_env_values = true)]
    pub influx_password: Option<String>,
}
