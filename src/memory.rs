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

//! In-memory sensor provider.
//!
//! Serves a fixed tree: values come from the template the provider was built
//! with. The demo machine additionally moves its values along a sine wave on
//! every update, so the dashboard has something to show without real hardware.

use std::collections::HashMap;
use std::f64::consts::TAU;

use tracing::debug;

use crate::error::ProviderError;
use crate::provider::SensorProvider;
use crate::tree::{HardwareCategory, HardwareNode, SensorCategory, SensorId, SensorNode};

/// Updates per full oscillation of a demo value.
const DEMO_PERIOD: f64 = 24.0;

#[derive(Debug, Clone, Copy)]
enum Motion {
    Fixed,
    Wave,
}

pub struct StaticProvider {
    name: String,
    template: Option<Vec<HardwareNode>>,
    values: HashMap<SensorId, Option<f64>>,
    motion: Motion,
    updates: u64,
}

impl StaticProvider {
    /// Serve `hardware` as-is; every update restores the template values.
    pub fn new(hardware: Vec<HardwareNode>) -> Self {
        Self::build("static", Some(hardware), Motion::Fixed)
    }

    /// A plausible desktop whose readings drift on every update.
    pub fn demo() -> Self {
        Self::build("demo", Some(demo_machine()), Motion::Wave)
    }

    /// A provider whose `open` always fails.
    pub fn unavailable() -> Self {
        Self::build("unavailable", None, Motion::Fixed)
    }

    fn build(name: &str, template: Option<Vec<HardwareNode>>, motion: Motion) -> Self {
        let mut values = HashMap::new();
        if let Some(hardware) = &template {
            for node in hardware {
                node.for_each_sensor(|sensor| {
                    values.entry(sensor.id.clone()).or_insert(sensor.value);
                });
            }
        }
        Self { name: name.to_string(), template, values, motion, updates: 0 }
    }

    fn reading(&self, id: &SensorId, category: SensorCategory, slot: usize) -> Option<f64> {
        let base = (*self.values.get(id)?)?;
        match self.motion {
            Motion::Fixed => Some(base),
            Motion::Wave => {
                let phase = (self.updates as f64 / DEMO_PERIOD) * TAU + slot as f64 * 0.7;
                let swing = match category {
                    SensorCategory::Load | SensorCategory::Control => 0.6,
                    SensorCategory::Power => 0.35,
                    SensorCategory::Fan => 0.15,
                    SensorCategory::Temperature => 0.08,
                    SensorCategory::Clock => 0.05,
                    SensorCategory::Voltage => 0.01,
                    SensorCategory::Data => 0.0,
                    _ => 0.1,
                };
                let value = base * (1.0 + swing * phase.sin());
                let value = match category {
                    SensorCategory::Load | SensorCategory::Control | SensorCategory::Level => value.clamp(0.0, 100.0),
                    _ => value.max(0.0),
                };
                Some(value)
            }
        }
    }
}

impl SensorProvider for StaticProvider {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&mut self) -> Result<Vec<HardwareNode>, ProviderError> {
        self.template
            .clone()
            .ok_or_else(|| ProviderError::Unavailable(format!("{} provider has no hardware", self.name)))
    }

    fn update(&mut self, node: &mut HardwareNode) -> Result<(), ProviderError> {
        if self.template.is_none() {
            return Err(ProviderError::Unavailable(self.name.clone()));
        }
        self.updates += 1;
        let mut slot = 0;
        node.for_each_sensor_mut(|_, sensor| {
            sensor.value = self.reading(&sensor.id, sensor.category, slot);
            slot += 1;
        });
        debug!(provider = %self.name, hardware_id = %node.id, "updated in-memory hardware");
        Ok(())
    }

    fn close(&mut self) {}
}

fn demo_machine() -> Vec<HardwareNode> {
    let mut cpu = HardwareNode::new("/amdcpu/0", "AMD Ryzen 7 5800X", HardwareCategory::Cpu)
        .with_sensor(SensorNode::new("/amdcpu/0/temperature/2", "Core (Tctl/Tdie)", SensorCategory::Temperature).with_value(58.0))
        .with_sensor(SensorNode::new("/amdcpu/0/temperature/3", "CCD1 (Tdie)", SensorCategory::Temperature).with_value(55.5))
        .with_sensor(SensorNode::new("/amdcpu/0/load/0", "CPU Total", SensorCategory::Load).with_value(18.0))
        .with_sensor(SensorNode::new("/amdcpu/0/power/0", "Package", SensorCategory::Power).with_value(62.0))
        .with_sensor(SensorNode::new("/amdcpu/0/voltage/0", "Core (SVI2 TFN)", SensorCategory::Voltage).with_value(1.25))
        .with_sensor(SensorNode::new("/amdcpu/0/factor/0", "Bus Speed Factor", SensorCategory::Factor).with_value(1.0));
    for core in 1..=8 {
        cpu.sensors.push(
            SensorNode::new(format!("/amdcpu/0/load/{core}"), format!("CPU Core #{core}"), SensorCategory::Load)
                .with_value(10.0 + core as f64 * 3.0),
        );
        cpu.sensors.push(
            SensorNode::new(format!("/amdcpu/0/clock/{core}"), format!("Core #{core}"), SensorCategory::Clock)
                .with_value(4200.0 + core as f64 * 25.0),
        );
    }

    let board = HardwareNode::new("/motherboard", "ASUS ROG STRIX B550-F GAMING", HardwareCategory::Motherboard)
        .with_child(
            HardwareNode::new("/lpc/nct6798d/0", "Nuvoton NCT6798D", HardwareCategory::SuperIo)
                .with_sensor(SensorNode::new("/lpc/nct6798d/0/voltage/0", "Vcore", SensorCategory::Voltage).with_value(1.344))
                .with_sensor(SensorNode::new("/lpc/nct6798d/0/voltage/1", "+12V", SensorCategory::Voltage).with_value(12.096))
                .with_sensor(SensorNode::new("/lpc/nct6798d/0/temperature/0", "Motherboard", SensorCategory::Temperature).with_value(34.0))
                .with_sensor(SensorNode::new("/lpc/nct6798d/0/fan/1", "CPU Fan", SensorCategory::Fan).with_value(1150.0))
                .with_sensor(SensorNode::new("/lpc/nct6798d/0/fan/0", "System Fan #1", SensorCategory::Fan).with_value(720.0))
                .with_sensor(SensorNode::new("/lpc/nct6798d/0/fan/2", "System Fan #2", SensorCategory::Fan))
                .with_sensor(SensorNode::new("/lpc/nct6798d/0/control/1", "CPU Fan", SensorCategory::Control).with_value(42.0)),
        )
        .with_child(
            HardwareNode::new("/ec/0", "Embedded Controller", HardwareCategory::EmbeddedController)
                .with_sensor(SensorNode::new("/ec/0/current/0", "CPU Current", SensorCategory::Current).with_value(31.5)),
        );

    let nvidia = HardwareNode::new("/gpu-nvidia/0", "NVIDIA GeForce RTX 3070", HardwareCategory::GpuNvidia)
        .with_sensor(SensorNode::new("/gpu-nvidia/0/temperature/0", "GPU Core", SensorCategory::Temperature).with_value(47.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/temperature/2", "GPU Hot Spot", SensorCategory::Temperature).with_value(58.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/load/0", "GPU Core", SensorCategory::Load).with_value(24.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/load/1", "GPU Memory Controller", SensorCategory::Load).with_value(9.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/clock/0", "GPU Core", SensorCategory::Clock).with_value(1740.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/power/0", "GPU Package", SensorCategory::Power).with_value(96.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/fan/1", "GPU Fan 1", SensorCategory::Fan).with_value(1300.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/control/1", "GPU Fan 1", SensorCategory::Control).with_value(40.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/smalldata/1", "GPU Memory Used", SensorCategory::SmallData).with_value(2150.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/throughput/1", "GPU PCIe Tx", SensorCategory::Throughput).with_value(3_500_000.0));

    let amd = HardwareNode::new("/gpu-amd/0", "AMD Radeon RX 6800", HardwareCategory::GpuAmd)
        .with_sensor(SensorNode::new("/gpu-amd/0/temperature/0", "GPU Edge", SensorCategory::Temperature).with_value(41.0))
        .with_sensor(SensorNode::new("/gpu-amd/0/temperature/1", "GPU Junction", SensorCategory::Temperature).with_value(49.0))
        .with_sensor(SensorNode::new("/gpu-amd/0/load/0", "GPU Core", SensorCategory::Load).with_value(3.0))
        .with_sensor(SensorNode::new("/gpu-amd/0/fan/0", "GPU Fan", SensorCategory::Fan));

    let memory = HardwareNode::new("/ram", "Generic Memory", HardwareCategory::Memory)
        .with_sensor(SensorNode::new("/ram/load/0", "Memory", SensorCategory::Load).with_value(41.0))
        .with_sensor(SensorNode::new("/ram/data/0", "Memory Used", SensorCategory::Data).with_value(13.12))
        .with_sensor(SensorNode::new("/ram/data/1", "Memory Available", SensorCategory::Data).with_value(18.71));

    let nvme = HardwareNode::new("/nvme/0", "Samsung SSD 980 PRO 1TB", HardwareCategory::Storage)
        .with_sensor(SensorNode::new("/nvme/0/temperature/0", "Composite Temperature", SensorCategory::Temperature).with_value(39.0))
        .with_sensor(SensorNode::new("/nvme/0/level/0", "Available Spare", SensorCategory::Level).with_value(100.0))
        .with_sensor(SensorNode::new("/nvme/0/data/0", "Data Written", SensorCategory::Data).with_value(12345.68))
        .with_sensor(SensorNode::new("/nvme/0/throughput/0", "Read Rate", SensorCategory::Throughput).with_value(52_000.0));

    vec![cpu, board, nvidia, amd, memory, nvme]
}
