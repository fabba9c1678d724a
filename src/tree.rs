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

//! Hardware/sensor tree captured from a provider session.
//!
//! The tree shape is fixed once captured; only sensor values change when the
//! provider refreshes a node. All recursive walks go through
//! [`HardwareNode::walk_sensors`] (read) or [`HardwareNode::for_each_sensor_mut`]
//! (write), which visit a node's own sensors before descending into each
//! sub-hardware node in order.

use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Separator between ancestor sub-hardware names in a sensor path.
pub const PATH_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareId(String);

impl HardwareId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HardwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(String);

impl SensorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardwareCategory {
    Cpu,
    GpuNvidia,
    GpuAmd,
    GpuIntel,
    Motherboard,
    SuperIo,
    Memory,
    Storage,
    Network,
    Controller,
    EmbeddedController,
    Cooler,
    Psu,
    Battery,
}

impl HardwareCategory {
    pub fn is_gpu(self) -> bool {
        matches!(self, Self::GpuNvidia | Self::GpuAmd | Self::GpuIntel)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "Cpu",
            Self::GpuNvidia => "GpuNvidia",
            Self::GpuAmd => "GpuAmd",
            Self::GpuIntel => "GpuIntel",
            Self::Motherboard => "Motherboard",
            Self::SuperIo => "SuperIO",
            Self::Memory => "Memory",
            Self::Storage => "Storage",
            Self::Network => "Network",
            Self::Controller => "Controller",
            Self::EmbeddedController => "EmbeddedController",
            Self::Cooler => "Cooler",
            Self::Psu => "Psu",
            Self::Battery => "Battery",
        }
    }
}

impl fmt::Display for HardwareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of reading a sensor produces. Only twelve of these have a display
/// format (see [`crate::format`]); the rest are carried in the tree but never
/// rendered with a unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorCategory {
    Voltage,
    Current,
    Power,
    Clock,
    Temperature,
    Load,
    Frequency,
    Fan,
    Flow,
    Control,
    Level,
    Factor,
    Data,
    SmallData,
    Throughput,
    TimeSpan,
    Energy,
    Noise,
    Humidity,
}

impl SensorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Voltage => "Voltage",
            Self::Current => "Current",
            Self::Power => "Power",
            Self::Clock => "Clock",
            Self::Temperature => "Temperature",
            Self::Load => "Load",
            Self::Frequency => "Frequency",
            Self::Fan => "Fan",
            Self::Flow => "Flow",
            Self::Control => "Control",
            Self::Level => "Level",
            Self::Factor => "Factor",
            Self::Data => "Data",
            Self::SmallData => "SmallData",
            Self::Throughput => "Throughput",
            Self::TimeSpan => "TimeSpan",
            Self::Energy => "Energy",
            Self::Noise => "Noise",
            Self::Humidity => "Humidity",
        }
    }
}

impl fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorNode {
    pub id: SensorId,
    /// Raw sensor name, e.g. "Core #1".
    pub name: String,
    /// Name qualified by the ancestor sub-hardware names, e.g. "nct6798 / CPU Fan".
    pub path: String,
    pub category: SensorCategory,
    /// Latest reading; `None` means the provider has no current value.
    pub value: Option<f64>,
}

impl SensorNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: SensorCategory) -> Self {
        let name = name.into();
        Self {
            id: SensorId::new(id),
            path: name.clone(),
            name,
            category,
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HardwareNode {
    pub id: HardwareId,
    pub name: String,
    pub category: HardwareCategory,
    pub sensors: Vec<SensorNode>,
    pub children: Vec<HardwareNode>,
}

impl HardwareNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: HardwareCategory) -> Self {
        Self {
            id: HardwareId::new(id),
            name: name.into(),
            category,
            sensors: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_sensor(mut self, sensor: SensorNode) -> Self {
        self.sensors.push(sensor);
        self
    }

    pub fn with_child(mut self, child: HardwareNode) -> Self {
        self.children.push(child);
        self
    }

    /// Visit every sensor under this node: own sensors first, then each
    /// sub-hardware node recursively, in provider order. Stops at the first
    /// `Break` and returns it.
    pub fn walk_sensors<'a, B>(
        &'a self,
        mut visit: impl FnMut(&'a SensorNode) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        self.walk_sensors_with(&mut visit)
    }

    fn walk_sensors_with<'a, B, F>(&'a self, visit: &mut F) -> ControlFlow<B>
    where
        F: FnMut(&'a SensorNode) -> ControlFlow<B>,
    {
        for sensor in &self.sensors {
            if let ControlFlow::Break(b) = visit(sensor) {
                return ControlFlow::Break(b);
            }
        }
        for child in &self.children {
            if let ControlFlow::Break(b) = child.walk_sensors_with(visit) {
                return ControlFlow::Break(b);
            }
        }
        ControlFlow::Continue(())
    }

    pub fn for_each_sensor<'a>(&'a self, mut visit: impl FnMut(&'a SensorNode)) {
        let _ = self.walk_sensors(|sensor| {
            visit(sensor);
            ControlFlow::<()>::Continue(())
        });
    }

    /// Mutable counterpart of [`walk_sensors`](Self::walk_sensors). The
    /// callback also receives the path prefix built from sub-hardware names.
    pub fn for_each_sensor_mut(&mut self, mut visit: impl FnMut(&str, &mut SensorNode)) {
        self.for_each_sensor_mut_prefixed("", &mut visit);
    }

    fn for_each_sensor_mut_prefixed<F>(&mut self, prefix: &str, visit: &mut F)
    where
        F: FnMut(&str, &mut SensorNode),
    {
        for sensor in &mut self.sensors {
            visit(prefix, sensor);
        }
        for child in &mut self.children {
            let child_prefix = format!("{prefix}{}{PATH_SEPARATOR}", child.name);
            child.for_each_sensor_mut_prefixed(&child_prefix, visit);
        }
    }

    /// Locate a sensor by id, searching direct sensors before sub-hardware.
    pub fn find_sensor(&self, id: &SensorId) -> Option<&SensorNode> {
        match self.walk_sensors(|sensor| {
            if &sensor.id == id {
                ControlFlow::Break(sensor)
            } else {
                ControlFlow::Continue(())
            }
        }) {
            ControlFlow::Break(sensor) => Some(sensor),
            ControlFlow::Continue(()) => None,
        }
    }

    pub fn find_hardware(&self, id: &HardwareId) -> Option<&HardwareNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_hardware(id))
    }

    pub fn find_hardware_mut(&mut self, id: &HardwareId) -> Option<&mut HardwareNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_hardware_mut(id))
    }

    pub fn sensor_count(&self) -> usize {
        let mut count = 0;
        self.for_each_sensor(|_| count += 1);
        count
    }

    pub(crate) fn assign_paths(&mut self) {
        self.for_each_sensor_mut(|prefix, sensor| {
            sensor.path = format!("{prefix}{}", sensor.name);
        });
    }

    fn collect_ids<'a>(&'a self, hardware: &mut Vec<&'a HardwareId>, sensors: &mut Vec<&'a SensorId>) {
        hardware.push(&self.id);
        sensors.extend(self.sensors.iter().map(|s| &s.id));
        for child in &self.children {
            child.collect_ids(hardware, sensors);
        }
    }
}

/// Snapshot of the provider's top-level hardware, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorTree {
    hardware: Vec<HardwareNode>,
}

impl SensorTree {
    pub fn new(mut hardware: Vec<HardwareNode>) -> Self {
        for node in &mut hardware {
            node.assign_paths();
        }
        let tree = Self { hardware };
        tree.warn_on_duplicate_ids();
        tree
    }

    pub fn hardware(&self) -> &[HardwareNode] {
        &self.hardware
    }

    pub(crate) fn hardware_mut(&mut self) -> &mut [HardwareNode] {
        &mut self.hardware
    }

    pub fn is_empty(&self) -> bool {
        self.hardware.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hardware.len()
    }

    /// Lookup by id anywhere in the tree. When a provider reports a duplicate
    /// id, the first node in traversal order wins.
    pub fn find_hardware(&self, id: &HardwareId) -> Option<&HardwareNode> {
        self.hardware.iter().find_map(|node| node.find_hardware(id))
    }

    pub fn find_hardware_mut(&mut self, id: &HardwareId) -> Option<&mut HardwareNode> {
        self.hardware.iter_mut().find_map(|node| node.find_hardware_mut(id))
    }

    fn warn_on_duplicate_ids(&self) {
        let mut hardware = Vec::new();
        let mut sensors = Vec::new();
        for node in &self.hardware {
            node.collect_ids(&mut hardware, &mut sensors);
        }
        let mut seen = HashSet::new();
        for id in hardware {
            if !seen.insert(id.as_str()) {
                warn!(hardware_id = %id, "duplicate hardware id in provider tree; first occurrence wins");
            }
        }
        let mut seen = HashSet::new();
        for id in sensors {
            if !seen.insert(id.as_str()) {
                warn!(sensor_id = %id, "duplicate sensor id in provider tree; first occurrence wins");
            }
        }
    }
}
