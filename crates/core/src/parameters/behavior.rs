//! Behavior controller parameter definitions
//!
//! # Parameters
//!
//! | Name            | Default | Meaning                                          |
//! |-----------------|---------|--------------------------------------------------|
//! | `MOT_CRANK`     | 140     | Minimum duty to start a stopped wheel            |
//! | `MOT_IDLE`      | 90      | Minimum duty to keep a moving wheel turning      |
//! | `SPD_MOVE`      | 170     | Default linear speed (and ramp floor)            |
//! | `SPD_ROTATE`    | 150     | Default in-place rotation speed                  |
//! | `ROT_90_MS`     | 650     | Time to rotate ~90° at `SPD_ROTATE`              |
//! | `ROT_180_MS`    | 1200    | Time to rotate ~180° at `SPD_ROTATE`             |
//! | `OA_SCAN_MS`    | 250     | Default scan interval                            |
//! | `OA_MIN_DIST`   | 30      | Obstacle distance threshold (cm)                 |
//! | `RNG_MAX`       | 250     | Range sensor max / no-echo sentinel (cm)         |
//! | `RNG_MAX_LT`    | 100     | Range cap while line tracking (cm)               |
//! | `LT_DETOUR`     | 10      | Go-around clearance (cm)                         |
//! | `LT_SCAN_MS`    | 20      | Range refresh interval while line tracking       |
//! | `LT_XLINE_MS`   | 50      | Extra drive time to cross the line on rejoin     |
//! | `LT_UNTIL_LOST` | 1000    | Grace period before declaring the line lost      |
//! | `LT_LOST_MS`    | 5000    | Line search window during recovery               |
//! | `LT_MARGIN`     | 1       | Half width of the clearance band (cm)            |
//! | `LT_REACQ_MS`   | 5000    | Bound for rotate-until-line-reacquired           |
//! | `PK_MOVE_MS`    | 500     | Park creep duration                              |
//! | `PK_AWAY_MS`    | 150     | Park back-off duration                           |
//! | `PK_SEARCH_MS`  | 10000   | Bound for each park obstacle search phase        |
//! | `IR_MOVE_MS`    | 200     | IR dead-man timeout                              |
//! | `SRV_SETTLE_MS` | 300     | Settle delay after a scripted servo move         |

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::motor::DeadZone;

/// Typed snapshot of every behavior tunable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorParams {
    /// Minimum duty to start a stopped wheel
    pub crank_speed: u8,
    /// Minimum duty to keep a moving wheel turning
    pub idle_speed: u8,
    /// Default linear speed
    pub move_speed: u8,
    /// Default rotation speed
    pub rotate_speed: u8,
    /// Open-loop 90° rotation time (ms)
    pub rotate_90_ms: u32,
    /// Open-loop 180° rotation time (ms)
    pub rotate_180_ms: u32,
    /// Default scan interval (ms)
    pub scan_interval_ms: u32,
    /// Obstacle threshold (cm)
    pub min_distance_cm: u16,
    /// Sensor max range and no-echo sentinel (cm)
    pub max_distance_cm: u16,
    /// Sensor cap during line tracking (cm)
    pub max_distance_line_cm: u16,
    /// Go-around clearance (cm)
    pub detour_distance_cm: u16,
    /// Line tracking range refresh interval (ms)
    pub line_scan_interval_ms: u32,
    /// Extra drive time to cross the line (ms)
    pub extra_line_ms: u32,
    /// Grace period before the line is lost (ms)
    pub until_lost_ms: u32,
    /// Line search window during recovery (ms)
    pub lost_search_ms: u32,
    /// Clearance band half width (cm)
    pub detour_margin_cm: u16,
    /// Bound for rotate-until-line-reacquired (ms)
    pub reacquire_timeout_ms: u32,
    /// Park creep duration (ms)
    pub park_move_ms: u32,
    /// Park back-off duration (ms)
    pub park_away_ms: u32,
    /// Bound for each park search phase (ms)
    pub park_search_ms: u32,
    /// IR dead-man timeout (ms)
    pub ir_move_ms: u32,
    /// Scripted servo settle delay (ms)
    pub servo_settle_ms: u32,
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            crank_speed: 140,
            idle_speed: 90,
            move_speed: 170,
            rotate_speed: 150,
            rotate_90_ms: 650,
            rotate_180_ms: 1200,
            scan_interval_ms: 250,
            min_distance_cm: 30,
            max_distance_cm: 250,
            max_distance_line_cm: 100,
            detour_distance_cm: 10,
            line_scan_interval_ms: 20,
            extra_line_ms: 50,
            until_lost_ms: 1000,
            lost_search_ms: 5000,
            detour_margin_cm: 1,
            reacquire_timeout_ms: 5000,
            park_move_ms: 500,
            park_away_ms: 150,
            park_search_ms: 10_000,
            ir_move_ms: 200,
            servo_settle_ms: 300,
        }
    }
}

fn read_u8(store: &ParameterStore, name: &str, default: u8) -> u8 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(0, i32::from(u8::MAX)) as u8,
        Some(ParamValue::Float(v)) => v.clamp(0.0, 255.0) as u8,
        _ => default,
    }
}

fn read_u16(store: &ParameterStore, name: &str, default: u16) -> u16 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(0, i32::from(u16::MAX)) as u16,
        Some(ParamValue::Float(v)) => v.clamp(0.0, 65535.0) as u16,
        _ => default,
    }
}

fn read_ms(store: &ParameterStore, name: &str, default: u32) -> u32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).max(0) as u32,
        Some(ParamValue::Float(v)) => v.max(0.0) as u32,
        _ => default,
    }
}

impl BehaviorParams {
    /// Name/value table used for registration
    fn table(&self) -> [(&'static str, i32); 22] {
        [
            ("MOT_CRANK", i32::from(self.crank_speed)),
            ("MOT_IDLE", i32::from(self.idle_speed)),
            ("SPD_MOVE", i32::from(self.move_speed)),
            ("SPD_ROTATE", i32::from(self.rotate_speed)),
            ("ROT_90_MS", self.rotate_90_ms as i32),
            ("ROT_180_MS", self.rotate_180_ms as i32),
            ("OA_SCAN_MS", self.scan_interval_ms as i32),
            ("OA_MIN_DIST", i32::from(self.min_distance_cm)),
            ("RNG_MAX", i32::from(self.max_distance_cm)),
            ("RNG_MAX_LT", i32::from(self.max_distance_line_cm)),
            ("LT_DETOUR", i32::from(self.detour_distance_cm)),
            ("LT_SCAN_MS", self.line_scan_interval_ms as i32),
            ("LT_XLINE_MS", self.extra_line_ms as i32),
            ("LT_UNTIL_LOST", self.until_lost_ms as i32),
            ("LT_LOST_MS", self.lost_search_ms as i32),
            ("LT_MARGIN", i32::from(self.detour_margin_cm)),
            ("LT_REACQ_MS", self.reacquire_timeout_ms as i32),
            ("PK_MOVE_MS", self.park_move_ms as i32),
            ("PK_AWAY_MS", self.park_away_ms as i32),
            ("PK_SEARCH_MS", self.park_search_ms as i32),
            ("IR_MOVE_MS", self.ir_move_ms as i32),
            ("SRV_SETTLE_MS", self.servo_settle_ms as i32),
        ]
    }

    /// Register every behavior parameter with its default value
    ///
    /// # Arguments
    ///
    /// * `store` - Parameter store to register parameters in
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        for (name, value) in Self::default().table() {
            store.register(name, ParamValue::Int(value), ParamFlags::empty())?;
        }
        Ok(())
    }

    /// Load behavior parameters from a parameter store
    ///
    /// Missing or mistyped entries fall back to the defaults.
    pub fn from_store(store: &ParameterStore) -> Self {
        let d = Self::default();
        Self {
            crank_speed: read_u8(store, "MOT_CRANK", d.crank_speed),
            idle_speed: read_u8(store, "MOT_IDLE", d.idle_speed),
            move_speed: read_u8(store, "SPD_MOVE", d.move_speed),
            rotate_speed: read_u8(store, "SPD_ROTATE", d.rotate_speed),
            rotate_90_ms: read_ms(store, "ROT_90_MS", d.rotate_90_ms),
            rotate_180_ms: read_ms(store, "ROT_180_MS", d.rotate_180_ms),
            scan_interval_ms: read_ms(store, "OA_SCAN_MS", d.scan_interval_ms),
            min_distance_cm: read_u16(store, "OA_MIN_DIST", d.min_distance_cm),
            max_distance_cm: read_u16(store, "RNG_MAX", d.max_distance_cm),
            max_distance_line_cm: read_u16(store, "RNG_MAX_LT", d.max_distance_line_cm),
            detour_distance_cm: read_u16(store, "LT_DETOUR", d.detour_distance_cm),
            line_scan_interval_ms: read_ms(store, "LT_SCAN_MS", d.line_scan_interval_ms),
            extra_line_ms: read_ms(store, "LT_XLINE_MS", d.extra_line_ms),
            until_lost_ms: read_ms(store, "LT_UNTIL_LOST", d.until_lost_ms),
            lost_search_ms: read_ms(store, "LT_LOST_MS", d.lost_search_ms),
            detour_margin_cm: read_u16(store, "LT_MARGIN", d.detour_margin_cm),
            reacquire_timeout_ms: read_ms(store, "LT_REACQ_MS", d.reacquire_timeout_ms),
            park_move_ms: read_ms(store, "PK_MOVE_MS", d.park_move_ms),
            park_away_ms: read_ms(store, "PK_AWAY_MS", d.park_away_ms),
            park_search_ms: read_ms(store, "PK_SEARCH_MS", d.park_search_ms),
            ir_move_ms: read_ms(store, "IR_MOVE_MS", d.ir_move_ms),
            servo_settle_ms: read_ms(store, "SRV_SETTLE_MS", d.servo_settle_ms),
        }
    }

    /// Dead-zone thresholds for the motor driver
    pub fn dead_zone(&self) -> DeadZone {
        DeadZone {
            crank: self.crank_speed,
            idle: self.idle_speed,
        }
    }

    /// Check cross-parameter constraints
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.max_distance_cm <= self.min_distance_cm {
            return Err(ParameterError::InvalidConfig(
                "RNG_MAX must be above OA_MIN_DIST",
            ));
        }
        if self.max_distance_line_cm <= self.detour_distance_cm {
            return Err(ParameterError::InvalidConfig(
                "RNG_MAX_LT must be above LT_DETOUR",
            ));
        }
        if self.idle_speed > self.crank_speed {
            return Err(ParameterError::InvalidConfig(
                "MOT_IDLE must not exceed MOT_CRANK",
            ));
        }
        Ok(())
    }
}
