/// Default exceedance threshold for risk scoring
pub const DEFAULT_RISK_THRESHOLD: f64 = 100.0;
pub const DEFAULT_TOP_STATIONS: usize = 5;

/// Day/night split (inclusive daytime hours)
pub const DAY_START_HOUR: u32 = 6;
pub const DAY_END_HOUR: u32 = 18;

/// Wind speed category limits in m/s (exclusive upper bounds)
pub const CALM_WIND_LIMIT: f64 = 0.5;
pub const LIGHT_WIND_LIMIT: f64 = 3.4;
pub const MODERATE_WIND_LIMIT: f64 = 8.0;

/// RFM weights
pub const RECENCY_WEIGHT: f64 = 0.15;
pub const FREQUENCY_WEIGHT: f64 = 0.28;
pub const MONETARY_WEIGHT: f64 = 0.57;
pub const RFM_SCALE: f64 = 0.05;

/// Normalised rank ceiling
pub const RANK_SCALE: f64 = 100.0;

/// Segment floors (exclusive)
pub const CRITICAL_SCORE_FLOOR: f64 = 4.5;
pub const HIGH_RISK_SCORE_FLOOR: f64 = 4.0;
pub const MEDIUM_RISK_SCORE_FLOOR: f64 = 3.0;
pub const LOW_RISK_SCORE_FLOOR: f64 = 1.6;

/// Tokens treated as a missing reading
pub const MISSING_MARKERS: [&str; 4] = ["", "NA", "NaN", "nan"];

/// File names
pub const DEFAULT_CONFIG_FILE: &str = "air-quality.toml";
pub const ENV_PREFIX: &str = "AIRQ";

/// Reader defaults
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Report formats
pub const FORMAT_TEXT: &str = "text";
pub const FORMAT_JSON: &str = "json";
