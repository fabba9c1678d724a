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

//! Default dashboard selection
//!
//! Seeds the visibility store from the first tree snapshot: every CPU is shown,
//! the first GPU in traversal order is shown, everything else is hidden. Within
//! shown hardware, sensors are picked from a keyword table per hardware kind.

use tracing::{debug, info};

use crate::tree::{HardwareCategory, HardwareNode, SensorCategory, SensorNode, SensorTree};
use crate::visibility::VisibilityStore;

/// One row of a keyword table. A sensor matches when its category equals
/// `category` and its lowercased name contains any of `keywords`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub group: &'static str,
    pub category: SensorCategory,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    fn matches(&self, sensor: &SensorNode) -> bool {
        if sensor.category != self.category {
            return false;
        }
        let name = sensor.name.to_lowercase();
        self.keywords.iter().any(|keyword| name.contains(keyword))
    }
}

pub const CPU_RULES: &[KeywordRule] = &[
    KeywordRule {
        group: "Temperature",
        category: SensorCategory::Temperature,
        keywords: &["package", "core", "tctl", "tdie"],
    },
    KeywordRule {
        group: "CPU Fan",
        category: SensorCategory::Fan,
        keywords: &["cpu fan", "cpu_fan1"],
    },
    KeywordRule {
        group: "System Fan",
        category: SensorCategory::Fan,
        keywords: &["system fan", "sys_fan"],
    },
    KeywordRule {
        group: "Load",
        category: SensorCategory::Load,
        keywords: &["cpu total"],
    },
];

pub const GPU_RULES: &[KeywordRule] = &[
    KeywordRule {
        group: "Temperature",
        category: SensorCategory::Temperature,
        keywords: &["core", "edge"],
    },
    KeywordRule {
        group: "Hot Spot Temp",
        category: SensorCategory::Temperature,
        keywords: &["hot spot", "hotspot", "junction"],
    },
    KeywordRule {
        group: "Fan Speed",
        category: SensorCategory::Fan,
        keywords: &["gpu fan", "fan"],
    },
    KeywordRule {
        group: "Load",
        category: SensorCategory::Load,
        keywords: &["gpu core", "core"],
    },
];

fn rules_for(category: HardwareCategory) -> &'static [KeywordRule] {
    match category {
        HardwareCategory::Cpu => CPU_RULES,
        c if c.is_gpu() => GPU_RULES,
        _ => &[],
    }
}

/// First rule in table order that matches `sensor`, if any.
pub fn matching_rule(hardware: HardwareCategory, sensor: &SensorNode) -> Option<&'static KeywordRule> {
    rules_for(hardware).iter().find(|rule| rule.matches(sensor))
}

/// Reset `store` and seed it from `tree`. Running it again on the same tree
/// produces the same store.
pub fn apply_default_visibility(store: &mut VisibilityStore, tree: &SensorTree) {
    store.clear();
    let mut gpu_shown = false;

    for node in tree.hardware() {
        if store.get(&node.id).is_some() {
            debug!(hardware_id = %node.id, "skipping duplicate hardware id");
            continue;
        }
        store.ensure(node);

        let show = match node.category {
            HardwareCategory::Cpu => true,
            c if c.is_gpu() && !gpu_shown => {
                gpu_shown = true;
                true
            }
            _ => false,
        };
        if !show {
            continue;
        }
        store.set_hardware_visible(&node.id, true);
        seed_sensors(store, node);
    }

    info!(
        hardware = store.len(),
        visible = store.visible_hardware().len(),
        "Seeded default dashboard selection"
    );
}

fn seed_sensors(store: &mut VisibilityStore, node: &HardwareNode) {
    node.for_each_sensor(|sensor| {
        if let Some(rule) = matching_rule(node.category, sensor) {
            debug!(sensor_id = %sensor.id, group = rule.group, "sensor shown by default");
            store.set_sensor_visible(&node.id, &sensor.id, true);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{amd_gpu, desktop_tree, mainboard_with_superio, nvidia_gpu, ryzen_cpu};
    use crate::tree::{HardwareId, SensorId};

    fn sensor(name: &str, category: SensorCategory) -> SensorNode {
        SensorNode::new("/s/0", name, category)
    }

    #[test]
    fn test_cpu_rules() {
        let cpu = HardwareCategory::Cpu;
        assert_eq!(matching_rule(cpu, &sensor("Core (Tctl/Tdie)", SensorCategory::Temperature)).unwrap().group, "Temperature");
        assert_eq!(matching_rule(cpu, &sensor("CPU Package", SensorCategory::Temperature)).unwrap().group, "Temperature");
        assert_eq!(matching_rule(cpu, &sensor("CPU Fan", SensorCategory::Fan)).unwrap().group, "CPU Fan");
        assert_eq!(matching_rule(cpu, &sensor("SYS_FAN2", SensorCategory::Fan)).unwrap().group, "System Fan");
        assert_eq!(matching_rule(cpu, &sensor("CPU Total", SensorCategory::Load)).unwrap().group, "Load");
        // keyword must match together with the category
        assert!(matching_rule(cpu, &sensor("CPU Core #1", SensorCategory::Load)).is_none());
        assert!(matching_rule(cpu, &sensor("Core #1", SensorCategory::Clock)).is_none());
    }

    #[test]
    fn test_gpu_rules_first_match_wins() {
        let gpu = HardwareCategory::GpuNvidia;
        // "GPU Core Hot Spot" matches both temperature rows; table order decides
        let rule = matching_rule(gpu, &sensor("GPU Core Hot Spot", SensorCategory::Temperature)).unwrap();
        assert_eq!(rule.group, "Temperature");
        let rule = matching_rule(gpu, &sensor("GPU Junction", SensorCategory::Temperature)).unwrap();
        assert_eq!(rule.group, "Hot Spot Temp");
        assert_eq!(matching_rule(gpu, &sensor("GPU Fan 1", SensorCategory::Fan)).unwrap().group, "Fan Speed");
        assert_eq!(matching_rule(gpu, &sensor("GPU Core", SensorCategory::Load)).unwrap().group, "Load");
        assert!(matching_rule(gpu, &sensor("GPU Memory", SensorCategory::Load)).is_none());
    }

    #[test]
    fn test_other_hardware_has_no_rules() {
        let s = sensor("CPU Fan", SensorCategory::Fan);
        assert!(matching_rule(HardwareCategory::Motherboard, &s).is_none());
        assert!(matching_rule(HardwareCategory::SuperIo, &s).is_none());
    }

    #[test]
    fn test_cpu_and_first_gpu_shown() {
        let tree = desktop_tree();
        let mut store = VisibilityStore::new();
        apply_default_visibility(&mut store, &tree);

        let visible: Vec<&str> = store.visible_hardware().iter().map(|id| id.as_str()).collect();
        assert_eq!(visible, vec!["/amdcpu/0", "/gpu-nvidia/0"]);
        assert_eq!(store.len(), tree.len());

        let cpu = HardwareId::new("/amdcpu/0");
        let sensors: Vec<&str> = store.visible_sensors(&cpu).iter().map(|id| id.as_str()).collect();
        assert_eq!(
            sensors,
            vec!["/amdcpu/0/temperature/2", "/amdcpu/0/temperature/3", "/amdcpu/0/load/0"]
        );

        let gpu = HardwareId::new("/gpu-nvidia/0");
        let sensors: Vec<&str> = store.visible_sensors(&gpu).iter().map(|id| id.as_str()).collect();
        assert_eq!(
            sensors,
            vec![
                "/gpu-nvidia/0/temperature/0",
                "/gpu-nvidia/0/temperature/2",
                "/gpu-nvidia/0/load/0",
                "/gpu-nvidia/0/fan/1",
            ]
        );
    }

    #[test]
    fn test_hidden_hardware_keeps_hidden_sensor_entries() {
        let tree = desktop_tree();
        let mut store = VisibilityStore::new();
        apply_default_visibility(&mut store, &tree);

        let amd = store.get(&HardwareId::new("/gpu-amd/0")).unwrap();
        assert!(!amd.show_hardware);
        assert_eq!(amd.sensors().len(), 3);
        assert!(amd.sensors().iter().all(|s| !s.show_sensor));

        // board fans are recorded but hidden even though they say "CPU Fan"
        let board = HardwareId::new("/mainboard");
        assert!(!store.is_sensor_visible(&board, &SensorId::new("/lpc/nct6798d/0/fan/1")));
        assert!(store.get(&board).unwrap().sensor(&SensorId::new("/lpc/nct6798d/0/fan/1")).is_some());
    }

    #[test]
    fn test_only_first_gpu_without_cpu() {
        let tree = SensorTree::new(vec![amd_gpu(), nvidia_gpu()]);
        let mut store = VisibilityStore::new();
        apply_default_visibility(&mut store, &tree);
        assert!(store.is_hardware_visible(&HardwareId::new("/gpu-amd/0")));
        assert!(!store.is_hardware_visible(&HardwareId::new("/gpu-nvidia/0")));
    }

    #[test]
    fn test_idempotent() {
        let tree = SensorTree::new(vec![ryzen_cpu(), mainboard_with_superio(), nvidia_gpu()]);
        let mut first = VisibilityStore::new();
        apply_default_visibility(&mut first, &tree);
        let mut second = first.clone();
        apply_default_visibility(&mut second, &tree);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_hardware_id_first_wins() {
        let shadow = HardwareNode::new("/amdcpu/0", "Shadow", HardwareCategory::Motherboard);
        let tree = SensorTree::new(vec![ryzen_cpu(), shadow]);
        let mut store = VisibilityStore::new();
        apply_default_visibility(&mut store, &tree);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&HardwareId::new("/amdcpu/0")).unwrap().name, "AMD Ryzen 7 5800X");
        assert!(store.is_hardware_visible(&HardwareId::new("/amdcpu/0")));
    }
}
