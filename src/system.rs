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

//! Host identity used to name hardware nodes.

use std::fs;
use std::path::Path;

const CPUINFO: &str = "/proc/cpuinfo";
const DEVICE_TREE_MODEL: &str = "/proc/device-tree/model";
const DMI_DIR: &str = "/sys/devices/virtual/dmi/id";

/// CPU model string, e.g. "AMD Ryzen 7 5800X 8-Core Processor".
pub fn read_cpu_name() -> Option<String> {
    if let Some(name) = fs::read_to_string(CPUINFO).ok().as_deref().and_then(parse_cpu_name) {
        return Some(name);
    }
    // ARM boards often only have a device-tree model
    let mut model = fs::read_to_string(DEVICE_TREE_MODEL).ok()?;
    model.retain(|c| c != '\u{0}');
    non_empty(&model)
}

/// First usable descriptor in a `/proc/cpuinfo` dump: `model name`, then
/// `Hardware`, then a non-numeric `Processor`.
pub fn parse_cpu_name(cpuinfo: &str) -> Option<String> {
    let mut model_name = None;
    let mut hardware = None;
    let mut processor = None;

    for line in cpuinfo.lines() {
        let Some((key, value)) = line.split_once(':') else { continue };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "model name" => &mut model_name,
            "hardware" => &mut hardware,
            "processor" if !value.chars().all(|c| c.is_ascii_digit()) => &mut processor,
            _ => continue,
        };
        slot.get_or_insert_with(|| value.to_string());
    }

    model_name.or(hardware).or(processor)
}

/// Board vendor and name from DMI, e.g. "ASUSTeK COMPUTER INC. ROG STRIX B550-F GAMING".
pub fn read_mb_name() -> Option<String> {
    read_mb_name_from(Path::new(DMI_DIR))
}

pub fn read_mb_name_from(dmi_dir: &Path) -> Option<String> {
    let read = |file: &str| fs::read_to_string(dmi_dir.join(file)).ok().and_then(|s| non_empty(&s));
    match (read("board_vendor"), read("board_name")) {
        (Some(vendor), Some(name)) => Some(format!("{vendor} {name}")),
        (Some(vendor), None) => Some(vendor),
        (None, Some(name)) => Some(name),
        (None, None) => read("product_name"),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_cpu_name_prefers_model_name() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: AuthenticAMD\nmodel name\t: AMD Ryzen 7 5800X 8-Core Processor\n\
                       processor\t: 1\nmodel name\t: ignored second core\n";
        assert_eq!(parse_cpu_name(cpuinfo).as_deref(), Some("AMD Ryzen 7 5800X 8-Core Processor"));
    }

    #[test]
    fn test_parse_cpu_name_arm_fallbacks() {
        let cpuinfo = "processor\t: 0\nBogoMIPS\t: 108.00\nHardware\t: BCM2835\n";
        assert_eq!(parse_cpu_name(cpuinfo).as_deref(), Some("BCM2835"));

        let cpuinfo = "Processor\t: ARMv7 Processor rev 4 (v7l)\nprocessor\t: 0\n";
        assert_eq!(parse_cpu_name(cpuinfo).as_deref(), Some("ARMv7 Processor rev 4 (v7l)"));

        assert_eq!(parse_cpu_name("processor\t: 0\n"), None);
    }

    #[test]
    fn test_mb_name_from_dmi() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("board_vendor"), "ASUSTeK COMPUTER INC.\n").unwrap();
        fs::write(dir.path().join("board_name"), "ROG STRIX B550-F GAMING\n").unwrap();
        assert_eq!(
            read_mb_name_from(dir.path()).as_deref(),
            Some("ASUSTeK COMPUTER INC. ROG STRIX B550-F GAMING")
        );
    }

    #[test]
    fn test_mb_name_falls_back_to_product() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("board_vendor"), "  \n").unwrap();
        fs::write(dir.path().join("product_name"), "ThinkPad T14\n").unwrap();
        assert_eq!(read_mb_name_from(dir.path()).as_deref(), Some("ThinkPad T14"));

        let empty = TempDir::new().unwrap();
        assert_eq!(read_mb_name_from(empty.path()), None);
    }
}
