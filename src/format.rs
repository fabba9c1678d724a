/*
 * This file is part of Sensordeck.
 *
 * Copyright (C) 2025 Sensordeck contributors
 *
 * Sensordeck is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Sensordeck is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Sensordeck. If not, see <https://www.gnu.org/licenses/>.
 */

//! Sensor value formatting
//!
//! Maps a (sensor category, raw reading) pair to a number string and a unit.
//! Precision and unit are fixed per category; anything without an entry, and
//! any absent or non-finite reading, formats as [`SENTINEL`].

use std::fmt;

use serde::Serialize;

use crate::tree::SensorCategory;

/// Shown when a value cannot be determined.
pub const SENTINEL: &str = "N/A";

/// Decimal places and unit suffix for one sensor category.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnitFormat {
    pub precision: usize,
    pub unit: &'static str,
}

impl UnitFormat {
    const fn new(precision: usize, unit: &'static str) -> Self {
        Self { precision, unit }
    }
}

impl SensorCategory {
    /// Display format for this category, or `None` for categories that are
    /// never rendered with a value.
    pub fn unit_format(self) -> Option<UnitFormat> {
        let format = match self {
            SensorCategory::Temperature => UnitFormat::new(1, "°C"),
            SensorCategory::Fan => UnitFormat::new(0, "RPM"),
            SensorCategory::Load => UnitFormat::new(1, "%"),
            SensorCategory::Power => UnitFormat::new(1, "W"),
            SensorCategory::Voltage => UnitFormat::new(3, "V"),
            SensorCategory::Clock => UnitFormat::new(0, "MHz"),
            SensorCategory::Control => UnitFormat::new(0, "%"),
            SensorCategory::Factor => UnitFormat::new(2, ""),
            SensorCategory::Data => UnitFormat::new(2, "GB"),
            SensorCategory::SmallData => UnitFormat::new(0, "MB"),
            SensorCategory::Throughput => UnitFormat::new(0, "B/s"),
            SensorCategory::Level => UnitFormat::new(0, "%"),
            _ => return None,
        };
        Some(format)
    }

    pub fn is_displayable(self) -> bool {
        self.unit_format().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedValue {
    pub number: String,
    pub unit: &'static str,
}

impl FormattedValue {
    pub fn sentinel() -> Self {
        Self { number: SENTINEL.to_string(), unit: "" }
    }

    pub fn is_sentinel(&self) -> bool {
        self.number == SENTINEL && self.unit.is_empty()
    }
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.unit)
    }
}

/// Format a raw reading. Never fails.
pub fn format_value(category: SensorCategory, value: Option<f64>) -> FormattedValue {
    let (Some(format), Some(value)) = (category.unit_format(), value) else {
        return FormattedValue::sentinel();
    };
    if !value.is_finite() {
        return FormattedValue::sentinel();
    }
    FormattedValue {
        number: format!("{:.*}", format.precision, value),
        unit: format.unit,
    }
}
