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

//! Linux hwmon sensor provider
//!
//! Every `/sys/class/hwmon/hwmonX` directory becomes one hardware node named
//! after its driver. Super I/O chips and ACPI thermal zones are grouped under a
//! synthetic motherboard node so the tree resembles what desktop monitoring
//! tools show. Sensor values are re-read from sysfs on every update; a file
//! that cannot be read or parsed gives an absent value.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::provider::SensorProvider;
use crate::system;
use crate::tree::{HardwareCategory, HardwareNode, SensorCategory, SensorId, SensorNode};

pub const DEFAULT_HWMON_ROOT: &str = "/sys/class/hwmon";

/// Id of the synthetic node that groups board-level chips.
pub const MOTHERBOARD_ID: &str = "/motherboard";

/// Where a chip is placed in the tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Placement {
    TopLevel,
    UnderMotherboard,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChipClass {
    pub category: HardwareCategory,
    pub placement: Placement,
}

impl ChipClass {
    const fn top(category: HardwareCategory) -> Self {
        Self { category, placement: Placement::TopLevel }
    }

    const fn board(category: HardwareCategory) -> Self {
        Self { category, placement: Placement::UnderMotherboard }
    }
}

lazy_static! {
    /// Drivers matched by their exact hwmon `name`.
    static ref DRIVER_CLASSES: HashMap<&'static str, ChipClass> = {
        use HardwareCategory::*;
        let mut m = HashMap::new();
        for driver in ["coretemp", "k10temp", "k8temp", "zenpower", "fam15h_power", "via_cputemp"] {
            m.insert(driver, ChipClass::top(Cpu));
        }
        for driver in ["amdgpu", "radeon"] {
            m.insert(driver, ChipClass::top(GpuAmd));
        }
        for driver in ["nouveau", "nvidia"] {
            m.insert(driver, ChipClass::top(GpuNvidia));
        }
        for driver in ["i915", "xe"] {
            m.insert(driver, ChipClass::top(GpuIntel));
        }
        for driver in ["nvme", "drivetemp"] {
            m.insert(driver, ChipClass::top(Storage));
        }
        for driver in ["spd5118", "jc42", "ee1004"] {
            m.insert(driver, ChipClass::top(Memory));
        }
        for driver in ["r8169", "igc", "igb", "e1000e", "atlantic", "mt7921_phy0"] {
            m.insert(driver, ChipClass::top(Network));
        }
        for driver in ["thinkpad", "dell_smm", "applesmc", "surface_fan", "cros_ec"] {
            m.insert(driver, ChipClass::top(EmbeddedController));
        }
        for driver in ["corsairpsu", "nzxt_smart2"] {
            m.insert(driver, ChipClass::top(Psu));
        }
        m.insert("corsaircpro", ChipClass::top(Cooler));
        m.insert("acpitz", ChipClass::board(Motherboard));
        m
    };
}

/// Drivers matched by name prefix, checked in order after the exact table.
const DRIVER_PREFIXES: &[(&str, ChipClass)] = &[
    ("nct", ChipClass::board(HardwareCategory::SuperIo)),
    ("it8", ChipClass::board(HardwareCategory::SuperIo)),
    ("w83", ChipClass::board(HardwareCategory::SuperIo)),
    ("f71", ChipClass::board(HardwareCategory::SuperIo)),
    ("pch_", ChipClass::board(HardwareCategory::Motherboard)),
    ("asus", ChipClass::top(HardwareCategory::EmbeddedController)),
    ("iwlwifi", ChipClass::top(HardwareCategory::Network)),
    ("mt79", ChipClass::top(HardwareCategory::Network)),
    ("ath1", ChipClass::top(HardwareCategory::Network)),
    ("BAT", ChipClass::top(HardwareCategory::Battery)),
    ("nzxt", ChipClass::top(HardwareCategory::Cooler)),
    ("kraken", ChipClass::top(HardwareCategory::Cooler)),
];

/// Map an hwmon driver name to a hardware category.
pub fn classify_driver(driver: &str) -> ChipClass {
    if let Some(class) = DRIVER_CLASSES.get(driver) {
        return *class;
    }
    DRIVER_PREFIXES
        .iter()
        .find(|(prefix, _)| driver.starts_with(prefix))
        .map(|(_, class)| *class)
        .unwrap_or(ChipClass::top(HardwareCategory::Controller))
}

/// sysfs attribute families, in the order their sensors are listed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Family {
    Temp,
    Fan,
    Pwm,
    In,
    Curr,
    Power,
    Energy,
    Freq,
    Humidity,
    Busy,
}

impl Family {
    fn prefix(self) -> &'static str {
        match self {
            Family::Temp => "temp",
            Family::Fan => "fan",
            Family::Pwm => "pwm",
            Family::In => "in",
            Family::Curr => "curr",
            Family::Power => "power",
            Family::Energy => "energy",
            Family::Freq => "freq",
            Family::Humidity => "humidity",
            Family::Busy => "busy",
        }
    }

    fn category(self) -> SensorCategory {
        match self {
            Family::Temp => SensorCategory::Temperature,
            Family::Fan => SensorCategory::Fan,
            Family::Pwm => SensorCategory::Control,
            Family::In => SensorCategory::Voltage,
            Family::Curr => SensorCategory::Current,
            Family::Power => SensorCategory::Power,
            Family::Energy => SensorCategory::Energy,
            Family::Freq => SensorCategory::Clock,
            Family::Humidity => SensorCategory::Humidity,
            Family::Busy => SensorCategory::Load,
        }
    }

    /// Convert a raw sysfs integer to the unit the formatter expects.
    fn scale(self, raw: f64) -> f64 {
        match self {
            // millidegrees, millivolts, milliamps, milli-percent
            Family::Temp | Family::In | Family::Curr | Family::Humidity => raw / 1000.0,
            // microwatts, microjoules, hertz to megahertz
            Family::Power | Family::Energy | Family::Freq => raw / 1_000_000.0,
            Family::Pwm => raw * 100.0 / 255.0,
            Family::Fan | Family::Busy => raw,
        }
    }
}

/// Classify a sysfs file name as a readable value attribute.
fn parse_attribute(fname: &str) -> Option<(Family, usize)> {
    const INPUTS: &[Family] = &[
        Family::Temp,
        Family::Fan,
        Family::In,
        Family::Curr,
        Family::Energy,
        Family::Freq,
        Family::Humidity,
    ];
    for &family in INPUTS {
        if let Some(idx) = extract_index(fname, family.prefix(), "_input") {
            return Some((family, idx));
        }
    }
    if let Some(idx) = extract_index(fname, "power", "_average").or_else(|| extract_index(fname, "power", "_input")) {
        return Some((Family::Power, idx));
    }
    extract_index(fname, "pwm", "").map(|idx| (Family::Pwm, idx))
}

#[derive(Debug, Clone)]
struct SensorSource {
    path: PathBuf,
    family: Family,
}

/// Reads the kernel's hwmon class directory.
pub struct HwmonProvider {
    root: PathBuf,
    sources: HashMap<SensorId, SensorSource>,
}

impl HwmonProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), sources: HashMap::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn chip_dirs(&self) -> Result<Vec<PathBuf>, ProviderError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(it) => it,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ProviderError::Unavailable(format!("{} does not exist", self.root.display())));
            }
            Err(e) => {
                return Err(ProviderError::Read { path: self.root.clone(), reason: e.to_string() });
            }
        };

        let mut dirs: Vec<(usize, String, PathBuf)> = Vec::new();
        for ent in entries.flatten() {
            let path = ent.path();
            if !path.is_dir() {
                continue;
            }
            let tag = ent.file_name().to_string_lossy().into_owned();
            let order = extract_index(&tag, "hwmon", "").unwrap_or(usize::MAX);
            // Resolve to the actual device dir in case of symlink
            let dir = fs::canonicalize(&path).unwrap_or(path);
            dirs.push((order, tag, dir));
        }
        // hwmon0, hwmon1, ..., hwmon10 in kernel registration order
        dirs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        Ok(dirs.into_iter().map(|(_, _, dir)| dir).collect())
    }

    fn scan_chip(&mut self, dir: &Path) -> (HardwareNode, Placement) {
        let driver = read_trimmed(dir.join("name")).unwrap_or_else(|_| "unknown".into());
        let tag = dir.file_name().and_then(|s| s.to_str()).unwrap_or("hwmon").to_string();
        let class = classify_driver(&driver);
        let chip_id = format!("/{driver}/{tag}");
        let name = chip_display_name(dir, &driver, class.category);

        let mut found: Vec<(Family, usize, PathBuf)> = Vec::new();
        if let Ok(dir_iter) = fs::read_dir(dir) {
            for file in dir_iter.flatten() {
                let fname = file.file_name();
                let fname = fname.to_string_lossy();
                let Some((family, idx)) = parse_attribute(&fname) else { continue };
                match found.iter_mut().find(|(f, i, _)| *f == family && *i == idx) {
                    // powerN_average wins over powerN_input
                    Some(existing) if fname.ends_with("_average") => existing.2 = file.path(),
                    Some(_) => {}
                    None => found.push((family, idx, file.path())),
                }
            }
        }
        if driver == "amdgpu" {
            for (idx, file) in ["gpu_busy_percent", "mem_busy_percent"].iter().enumerate() {
                let path = dir.join("device").join(file);
                if path.exists() {
                    found.push((Family::Busy, idx, path));
                }
            }
        }
        found.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut node = HardwareNode::new(chip_id.clone(), name, class.category);
        for (family, idx, path) in found {
            let sensor_id = format!("{chip_id}/{}{idx}", family.prefix());
            let label = sensor_label(dir, family, idx);
            let source = SensorSource { path, family };
            let sensor = SensorNode {
                value: read_source(&source),
                ..SensorNode::new(sensor_id, label, family.category())
            };
            self.sources.insert(sensor.id.clone(), source);
            node.sensors.push(sensor);
        }
        debug!(chip = %chip_id, driver = %driver, sensors = node.sensors.len(), "scanned hwmon chip");
        (node, class.placement)
    }
}

impl Default for HwmonProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HWMON_ROOT)
    }
}

impl SensorProvider for HwmonProvider {
    fn name(&self) -> String {
        "hwmon".to_string()
    }

    fn open(&mut self) -> Result<Vec<HardwareNode>, ProviderError> {
        self.sources.clear();
        let dirs = self.chip_dirs()?;

        let mut hardware: Vec<HardwareNode> = Vec::new();
        let mut board: Option<(usize, HardwareNode)> = None;
        for dir in dirs {
            let (node, placement) = self.scan_chip(&dir);
            match placement {
                Placement::TopLevel => hardware.push(node),
                Placement::UnderMotherboard => {
                    let (_, parent) = board.get_or_insert_with(|| {
                        let name = system::read_mb_name().unwrap_or_else(|| "Motherboard".to_string());
                        (hardware.len(), HardwareNode::new(MOTHERBOARD_ID, name, HardwareCategory::Motherboard))
                    });
                    parent.children.push(node);
                }
            }
        }
        // The board sits where its first chip was found
        if let Some((position, node)) = board {
            hardware.insert(position, node);
        }

        if hardware.is_empty() {
            warn!(root = %self.root.display(), "no hwmon chips found");
        }
        info!(root = %self.root.display(), hardware = hardware.len(), sensors = self.sources.len(), "hwmon scan complete");
        Ok(hardware)
    }

    fn update(&mut self, node: &mut HardwareNode) -> Result<(), ProviderError> {
        node.for_each_sensor_mut(|_, sensor| {
            sensor.value = self.sources.get(&sensor.id).and_then(read_source);
        });
        Ok(())
    }

    fn close(&mut self) {
        self.sources.clear();
    }
}

fn chip_display_name(dir: &Path, driver: &str, category: HardwareCategory) -> String {
    let read = |rel: &str| read_trimmed(dir.join(rel)).ok().filter(|s| !s.is_empty());
    let described = match category {
        HardwareCategory::Cpu => system::read_cpu_name(),
        HardwareCategory::Storage => read("device/model"),
        HardwareCategory::GpuAmd => Some(format!("AMD GPU ({driver})")),
        HardwareCategory::GpuNvidia => Some(format!("NVIDIA GPU ({driver})")),
        HardwareCategory::GpuIntel => Some(format!("Intel GPU ({driver})")),
        HardwareCategory::Battery => read("device/model_name").or_else(|| read("model_name")),
        _ => None,
    };
    described.unwrap_or_else(|| driver.to_string())
}

fn sensor_label(dir: &Path, family: Family, idx: usize) -> String {
    match family {
        Family::Busy if idx == 0 => "GPU Core".to_string(),
        Family::Busy => "GPU Memory".to_string(),
        _ => {
            let prefix = family.prefix();
            read_trimmed(dir.join(format!("{prefix}{idx}_label")))
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("{prefix}{idx}"))
        }
    }
}

fn read_source(source: &SensorSource) -> Option<f64> {
    let raw = read_trimmed(&source.path).ok()?;
    let raw: f64 = raw.parse::<i64>().ok()? as f64;
    Some(source.family.scale(raw))
}

fn read_trimmed<P: AsRef<Path>>(p: P) -> io::Result<String> {
    let mut s = String::new();
    fs::File::open(p)?.read_to_string(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn extract_index(fname: &str, prefix: &str, suffix: &str) -> Option<usize> {
    if fname.len() > prefix.len() + suffix.len() && fname.starts_with(prefix) && fname.ends_with(suffix) {
        let mid = &fname[prefix.len()..fname.len() - suffix.len()];
        mid.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn chip(root: &Path, tag: &str, driver: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = root.join(tag);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), format!("{driver}\n")).unwrap();
        for (file, contents) in files {
            let path = dir.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, format!("{contents}\n")).unwrap();
        }
        dir
    }

    fn fake_sysfs() -> TempDir {
        let root = TempDir::new().unwrap();
        chip(root.path(), "hwmon0", "acpitz", &[("temp1_input", "27800")]);
        chip(
            root.path(),
            "hwmon1",
            "nvme",
            &[("temp1_input", "39850"), ("temp1_label", "Composite"), ("device/model", "Samsung SSD 980 PRO 1TB")],
        );
        chip(
            root.path(),
            "hwmon2",
            "k10temp",
            &[
                ("temp1_input", "61250"),
                ("temp1_label", "Tctl"),
                ("temp3_input", "58000"),
                ("temp3_label", "Tccd1"),
            ],
        );
        chip(
            root.path(),
            "hwmon3",
            "nct6798",
            &[
                ("fan2_input", "980"),
                ("fan2_label", "CPU Fan"),
                ("fan1_input", "650"),
                ("pwm2", "97"),
                ("pwm2_enable", "5"),
                ("in0_input", "1344"),
                ("in0_label", "Vcore"),
            ],
        );
        chip(
            root.path(),
            "hwmon10",
            "amdgpu",
            &[
                ("temp1_input", "44000"),
                ("temp1_label", "edge"),
                ("power1_average", "45120000"),
                ("power1_input", "50000000"),
                ("freq1_input", "2105000000"),
                ("freq1_label", "sclk"),
                ("device/gpu_busy_percent", "7"),
                ("device/mem_busy_percent", "3"),
            ],
        );
        root
    }

    #[test]
    fn test_extract_index_valid() {
        assert_eq!(extract_index("fan1_input", "fan", "_input"), Some(1));
        assert_eq!(extract_index("fan12_input", "fan", "_input"), Some(12));
        assert_eq!(extract_index("pwm3", "pwm", ""), Some(3));
        assert_eq!(extract_index("hwmon10", "hwmon", ""), Some(10));
    }

    #[test]
    fn test_extract_index_invalid() {
        assert_eq!(extract_index("fan_input", "fan", "_input"), None);
        assert_eq!(extract_index("fan1_output", "fan", "_input"), None);
        assert_eq!(extract_index("pwm1_enable", "pwm", ""), None);
        assert_eq!(extract_index("pwm", "pwm", ""), None);
        assert_eq!(extract_index("", "fan", "_input"), None);
    }

    #[test]
    fn test_parse_attribute() {
        assert_eq!(parse_attribute("temp1_input"), Some((Family::Temp, 1)));
        assert_eq!(parse_attribute("in0_input"), Some((Family::In, 0)));
        assert_eq!(parse_attribute("power1_average"), Some((Family::Power, 1)));
        assert_eq!(parse_attribute("pwm2"), Some((Family::Pwm, 2)));
        assert_eq!(parse_attribute("pwm2_enable"), None);
        assert_eq!(parse_attribute("temp1_label"), None);
        assert_eq!(parse_attribute("name"), None);
    }

    #[test]
    fn test_classify_driver() {
        assert_eq!(classify_driver("k10temp").category, HardwareCategory::Cpu);
        assert_eq!(classify_driver("coretemp").category, HardwareCategory::Cpu);
        assert_eq!(classify_driver("amdgpu").category, HardwareCategory::GpuAmd);
        assert_eq!(classify_driver("nouveau").category, HardwareCategory::GpuNvidia);
        assert_eq!(classify_driver("i915").category, HardwareCategory::GpuIntel);
        assert_eq!(classify_driver("nvme").category, HardwareCategory::Storage);
        assert_eq!(classify_driver("nct6798"), ChipClass::board(HardwareCategory::SuperIo));
        assert_eq!(classify_driver("it8688"), ChipClass::board(HardwareCategory::SuperIo));
        assert_eq!(classify_driver("acpitz").placement, Placement::UnderMotherboard);
        assert_eq!(classify_driver("BAT0").category, HardwareCategory::Battery);
        assert_eq!(classify_driver("iwlwifi_1").category, HardwareCategory::Network);
        assert_eq!(classify_driver("lm75"), ChipClass::top(HardwareCategory::Controller));
    }

    #[test]
    fn test_scaling() {
        assert_eq!(Family::Temp.scale(61250.0), 61.25);
        assert_eq!(Family::In.scale(1344.0), 1.344);
        assert_eq!(Family::Power.scale(45_120_000.0), 45.12);
        assert_eq!(Family::Freq.scale(2_105_000_000.0), 2105.0);
        assert_eq!(Family::Pwm.scale(255.0), 100.0);
        assert_eq!(Family::Fan.scale(980.0), 980.0);
    }

    #[test]
    fn test_open_builds_tree_in_hwmon_order() {
        let root = fake_sysfs();
        let mut provider = HwmonProvider::new(root.path());
        let hardware = provider.open().unwrap();

        let ids: Vec<&str> = hardware.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![MOTHERBOARD_ID, "/nvme/hwmon1", "/k10temp/hwmon2", "/amdgpu/hwmon10"]);

        let board = &hardware[0];
        assert_eq!(board.category, HardwareCategory::Motherboard);
        assert!(board.sensors.is_empty());
        let children: Vec<&str> = board.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(children, vec!["/acpitz/hwmon0", "/nct6798/hwmon3"]);

        assert_eq!(hardware[1].name, "Samsung SSD 980 PRO 1TB");
        assert_eq!(hardware[1].sensors[0].name, "Composite");
        assert_eq!(hardware[1].sensors[0].value, Some(39.85));
    }

    #[test]
    fn test_sensor_order_labels_and_values() {
        let root = fake_sysfs();
        let mut provider = HwmonProvider::new(root.path());
        let hardware = provider.open().unwrap();

        let superio = &hardware[0].children[1];
        let names: Vec<(&str, SensorCategory)> =
            superio.sensors.iter().map(|s| (s.name.as_str(), s.category)).collect();
        assert_eq!(
            names,
            vec![
                ("fan1", SensorCategory::Fan),
                ("CPU Fan", SensorCategory::Fan),
                ("pwm2", SensorCategory::Control),
                ("Vcore", SensorCategory::Voltage),
            ]
        );
        assert_eq!(superio.sensors[1].id.as_str(), "/nct6798/hwmon3/fan2");
        assert_eq!(superio.sensors[3].value, Some(1.344));

        let gpu = &hardware[3];
        let power = gpu.sensors.iter().find(|s| s.category == SensorCategory::Power).unwrap();
        assert_eq!(power.value, Some(45.12));
        assert_eq!(gpu.sensors.iter().filter(|s| s.category == SensorCategory::Power).count(), 1);
        let busy = gpu.find_sensor(&SensorId::new("/amdgpu/hwmon10/busy0")).unwrap();
        assert_eq!((busy.name.as_str(), busy.value), ("GPU Core", Some(7.0)));
        let clock = gpu.sensors.iter().find(|s| s.name == "sclk").unwrap();
        assert_eq!(clock.value, Some(2105.0));
    }

    #[test]
    fn test_update_rereads_values() {
        let root = fake_sysfs();
        let mut provider = HwmonProvider::new(root.path());
        let mut hardware = provider.open().unwrap();
        let cpu = &mut hardware[2];

        let mut f = fs::File::create(root.path().join("hwmon2/temp1_input")).unwrap();
        writeln!(f, "70500").unwrap();
        fs::remove_file(root.path().join("hwmon2/temp3_input")).unwrap();

        provider.update(cpu).unwrap();
        assert_eq!(cpu.sensors[0].value, Some(70.5));
        assert_eq!(cpu.sensors[1].value, None);
    }

    #[test]
    fn test_unparsable_value_is_absent() {
        let root = TempDir::new().unwrap();
        chip(root.path(), "hwmon0", "lm75", &[("temp1_input", "garbage")]);
        let mut provider = HwmonProvider::new(root.path());
        let hardware = provider.open().unwrap();
        assert_eq!(hardware[0].category, HardwareCategory::Controller);
        assert_eq!(hardware[0].sensors[0].value, None);
    }

    #[test]
    fn test_missing_root_is_unavailable() {
        let root = TempDir::new().unwrap();
        let mut provider = HwmonProvider::new(root.path().join("does-not-exist"));
        assert!(matches!(provider.open(), Err(ProviderError::Unavailable(_))));
    }

    #[test]
    fn test_read_trimmed() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("test.txt");
        fs::write(&test_file, "  42000  \n").unwrap();
        assert_eq!(read_trimmed(&test_file).unwrap(), "42000");
        assert!(read_trimmed(temp_dir.path().join("nonexistent")).is_err());
    }
}
