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

//! Dashboard visibility store
//!
//! One entry per top-level hardware id, each holding a `show_hardware` flag and
//! a `show_sensor` flag for every sensor under that hardware (sub-hardware
//! included). Entries are created lazily at `false` and are never removed for
//! the lifetime of a session. Mutations with ids the store has never seen are
//! no-ops.

use std::collections::HashMap;

use tracing::debug;

use crate::tree::{HardwareCategory, HardwareId, HardwareNode, SensorCategory, SensorId, SensorTree};

#[derive(Debug, Clone, PartialEq)]
pub struct SensorVisibility {
    pub id: SensorId,
    /// Raw sensor name, used as the dashboard row label.
    pub name: String,
    /// Path including sub-hardware names, used in the configuration dialog.
    pub path: String,
    pub category: SensorCategory,
    pub show_sensor: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HardwareVisibility {
    pub id: HardwareId,
    pub name: String,
    pub category: HardwareCategory,
    pub show_hardware: bool,
    sensors: Vec<SensorVisibility>,
    sensor_index: HashMap<SensorId, usize>,
}

impl HardwareVisibility {
    fn new(node: &HardwareNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            category: node.category,
            show_hardware: false,
            sensors: Vec::new(),
            sensor_index: HashMap::new(),
        }
    }

    /// Sensors in the order they were first observed.
    pub fn sensors(&self) -> &[SensorVisibility] {
        &self.sensors
    }

    pub fn sensor(&self, id: &SensorId) -> Option<&SensorVisibility> {
        self.sensor_index.get(id).map(|&i| &self.sensors[i])
    }

    fn sensor_mut(&mut self, id: &SensorId) -> Option<&mut SensorVisibility> {
        match self.sensor_index.get(id) {
            Some(&i) => Some(&mut self.sensors[i]),
            None => None,
        }
    }

    fn ensure_sensor(&mut self, id: &SensorId, name: &str, path: &str, category: SensorCategory) -> bool {
        if self.sensor_index.contains_key(id) {
            return false;
        }
        self.sensor_index.insert(id.clone(), self.sensors.len());
        self.sensors.push(SensorVisibility {
            id: id.clone(),
            name: name.to_string(),
            path: path.to_string(),
            category,
            show_sensor: false,
        });
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityStore {
    entries: Vec<HardwareVisibility>,
    index: HashMap<HardwareId, usize>,
}

impl VisibilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order their hardware was first observed.
    pub fn entries(&self) -> impl Iterator<Item = &HardwareVisibility> {
        self.entries.iter()
    }

    pub fn get(&self, id: &HardwareId) -> Option<&HardwareVisibility> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    fn get_mut(&mut self, id: &HardwareId) -> Option<&mut HardwareVisibility> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Create missing entries for `node` and every sensor beneath it, all at
    /// `false`. Existing flags are left untouched. Returns how many sensor
    /// entries were added.
    pub fn ensure(&mut self, node: &HardwareNode) -> usize {
        let idx = match self.index.get(&node.id) {
            Some(&i) => i,
            None => {
                self.index.insert(node.id.clone(), self.entries.len());
                self.entries.push(HardwareVisibility::new(node));
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        let mut added = 0;
        node.for_each_sensor(|sensor| {
            if entry.ensure_sensor(&sensor.id, &sensor.name, &sensor.path, sensor.category) {
                added += 1;
            }
        });
        added
    }

    /// Pick up hardware and sensors that appeared since the last scan.
    pub fn rescan(&mut self, tree: &SensorTree) -> usize {
        tree.hardware().iter().map(|node| self.ensure(node)).sum()
    }

    pub fn set_hardware_visible(&mut self, id: &HardwareId, visible: bool) {
        match self.get_mut(id) {
            Some(entry) => entry.show_hardware = visible,
            None => debug!(hardware_id = %id, "ignoring visibility change for unknown hardware"),
        }
    }

    pub fn set_sensor_visible(&mut self, hardware_id: &HardwareId, sensor_id: &SensorId, visible: bool) {
        match self.get_mut(hardware_id).and_then(|entry| entry.sensor_mut(sensor_id)) {
            Some(sensor) => sensor.show_sensor = visible,
            None => debug!(
                hardware_id = %hardware_id,
                sensor_id = %sensor_id,
                "ignoring visibility change for unknown sensor"
            ),
        }
    }

    /// Flip a hardware flag, returning the new value (`None` if unknown).
    pub fn toggle_hardware(&mut self, id: &HardwareId) -> Option<bool> {
        let visible = !self.get(id)?.show_hardware;
        self.set_hardware_visible(id, visible);
        Some(visible)
    }

    pub fn toggle_sensor(&mut self, hardware_id: &HardwareId, sensor_id: &SensorId) -> Option<bool> {
        let visible = !self.get(hardware_id)?.sensor(sensor_id)?.show_sensor;
        self.set_sensor_visible(hardware_id, sensor_id, visible);
        Some(visible)
    }

    pub fn is_hardware_visible(&self, id: &HardwareId) -> bool {
        self.get(id).is_some_and(|entry| entry.show_hardware)
    }

    pub fn is_sensor_visible(&self, hardware_id: &HardwareId, sensor_id: &SensorId) -> bool {
        self.get(hardware_id)
            .and_then(|entry| entry.sensor(sensor_id))
            .is_some_and(|sensor| sensor.show_sensor)
    }

    pub fn visible_hardware(&self) -> Vec<&HardwareId> {
        self.entries
            .iter()
            .filter(|entry| entry.show_hardware)
            .map(|entry| &entry.id)
            .collect()
    }

    pub fn visible_sensors(&self, hardware_id: &HardwareId) -> Vec<&SensorId> {
        self.get(hardware_id)
            .map(|entry| {
                entry
                    .sensors
                    .iter()
                    .filter(|sensor| sensor.show_sensor)
                    .map(|sensor| &sensor.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{desktop_tree, mainboard_with_superio, ryzen_cpu};
    use crate::tree::SensorNode;

    #[test]
    fn test_ensure_creates_hidden_entries() {
        let mut store = VisibilityStore::new();
        let added = store.ensure(&mainboard_with_superio());
        assert_eq!(added, 4);
        let entry = store.get(&HardwareId::new("/mainboard")).unwrap();
        assert!(!entry.show_hardware);
        assert!(entry.sensors().iter().all(|s| !s.show_sensor));
        // sub-hardware sensors are recorded under the top-level hardware
        assert!(entry.sensor(&SensorId::new("/lpc/nct6798d/0/fan/1")).is_some());
    }

    #[test]
    fn test_ensure_is_idempotent_and_keeps_user_choices() {
        let cpu = ryzen_cpu();
        let mut store = VisibilityStore::new();
        store.ensure(&cpu);
        store.set_hardware_visible(&cpu.id, true);
        store.set_sensor_visible(&cpu.id, &SensorId::new("/amdcpu/0/load/0"), true);

        let added = store.ensure(&cpu);
        assert_eq!(added, 0);
        assert_eq!(store.len(), 1);
        assert!(store.is_hardware_visible(&cpu.id));
        assert!(store.is_sensor_visible(&cpu.id, &SensorId::new("/amdcpu/0/load/0")));
    }

    #[test]
    fn test_ensure_picks_up_new_sensors() {
        let mut cpu = ryzen_cpu();
        let mut store = VisibilityStore::new();
        store.ensure(&cpu);
        cpu.sensors.push(SensorNode::new("/amdcpu/0/factor/0", "Bus Multiplier", SensorCategory::Factor));
        assert_eq!(store.ensure(&cpu), 1);
        assert!(!store.is_sensor_visible(&cpu.id, &SensorId::new("/amdcpu/0/factor/0")));
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut store = VisibilityStore::new();
        store.ensure(&ryzen_cpu());
        let before = store.clone();

        store.set_hardware_visible(&HardwareId::new("/ghost"), true);
        store.set_sensor_visible(&HardwareId::new("/amdcpu/0"), &SensorId::new("/ghost/0"), true);
        store.set_sensor_visible(&HardwareId::new("/ghost"), &SensorId::new("/amdcpu/0/load/0"), true);
        assert_eq!(store, before);
        assert_eq!(store.toggle_hardware(&HardwareId::new("/ghost")), None);
        assert!(store.visible_sensors(&HardwareId::new("/ghost")).is_empty());
    }

    #[test]
    fn test_toggle_flips_flags() {
        let cpu = ryzen_cpu();
        let load = SensorId::new("/amdcpu/0/load/0");
        let mut store = VisibilityStore::new();
        store.ensure(&cpu);
        assert_eq!(store.toggle_hardware(&cpu.id), Some(true));
        assert_eq!(store.toggle_hardware(&cpu.id), Some(false));
        assert_eq!(store.toggle_sensor(&cpu.id, &load), Some(true));
        assert!(store.is_sensor_visible(&cpu.id, &load));
    }

    #[test]
    fn test_visible_lists_follow_traversal_order() {
        let tree = desktop_tree();
        let mut store = VisibilityStore::new();
        store.rescan(&tree);
        for node in tree.hardware().iter().rev() {
            store.set_hardware_visible(&node.id, true);
        }
        let visible: Vec<&str> = store.visible_hardware().iter().map(|id| id.as_str()).collect();
        let expected: Vec<&str> = tree.hardware().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(visible, expected);

        let cpu = HardwareId::new("/amdcpu/0");
        store.set_sensor_visible(&cpu, &SensorId::new("/amdcpu/0/power/0"), true);
        store.set_sensor_visible(&cpu, &SensorId::new("/amdcpu/0/temperature/2"), true);
        let sensors: Vec<&str> = store.visible_sensors(&cpu).iter().map(|id| id.as_str()).collect();
        assert_eq!(sensors, vec!["/amdcpu/0/temperature/2", "/amdcpu/0/power/0"]);
    }
}
