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

//! Test utilities and fixtures for unit tests

use crate::tree::{HardwareCategory, HardwareNode, SensorCategory, SensorNode, SensorTree};

/// Creates a mock AMD CPU with package, core, load, clock and power sensors
pub fn ryzen_cpu() -> HardwareNode {
    HardwareNode::new("/amdcpu/0", "AMD Ryzen 7 5800X", HardwareCategory::Cpu)
        .with_sensor(SensorNode::new("/amdcpu/0/temperature/2", "Core (Tctl/Tdie)", SensorCategory::Temperature).with_value(61.3))
        .with_sensor(SensorNode::new("/amdcpu/0/temperature/3", "CCD1 (Tdie)", SensorCategory::Temperature).with_value(58.0))
        .with_sensor(SensorNode::new("/amdcpu/0/load/0", "CPU Total", SensorCategory::Load).with_value(12.345))
        .with_sensor(SensorNode::new("/amdcpu/0/load/1", "CPU Core #1", SensorCategory::Load).with_value(20.0))
        .with_sensor(SensorNode::new("/amdcpu/0/clock/1", "Core #1", SensorCategory::Clock).with_value(4549.7))
        .with_sensor(SensorNode::new("/amdcpu/0/power/0", "Package", SensorCategory::Power).with_value(45.12))
        .with_sensor(SensorNode::new("/amdcpu/0/voltage/0", "Core (SVI2 TFN)", SensorCategory::Voltage).with_value(1.28125))
}

/// Creates a mock NVIDIA GPU
pub fn nvidia_gpu() -> HardwareNode {
    HardwareNode::new("/gpu-nvidia/0", "NVIDIA GeForce RTX 3070", HardwareCategory::GpuNvidia)
        .with_sensor(SensorNode::new("/gpu-nvidia/0/temperature/0", "GPU Core", SensorCategory::Temperature).with_value(48.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/temperature/2", "GPU Hot Spot", SensorCategory::Temperature).with_value(59.9))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/load/0", "GPU Core", SensorCategory::Load).with_value(7.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/fan/1", "GPU Fan 1", SensorCategory::Fan).with_value(1100.0))
        .with_sensor(SensorNode::new("/gpu-nvidia/0/smalldata/1", "GPU Memory Used", SensorCategory::SmallData).with_value(1024.4))
}

/// Creates a mock AMD GPU
pub fn amd_gpu() -> HardwareNode {
    HardwareNode::new("/gpu-amd/0", "AMD Radeon RX 6800", HardwareCategory::GpuAmd)
        .with_sensor(SensorNode::new("/gpu-amd/0/temperature/0", "GPU Edge", SensorCategory::Temperature).with_value(44.0))
        .with_sensor(SensorNode::new("/gpu-amd/0/temperature/1", "GPU Junction", SensorCategory::Temperature).with_value(51.0))
        .with_sensor(SensorNode::new("/gpu-amd/0/fan/0", "GPU Fan", SensorCategory::Fan))
}

/// Creates a mock mainboard whose fans live on a Super I/O sub-hardware node
pub fn mainboard_with_superio() -> HardwareNode {
    HardwareNode::new("/mainboard", "ASUS ROG STRIX B550-F", HardwareCategory::Motherboard).with_child(
        HardwareNode::new("/lpc/nct6798d/0", "Nuvoton NCT6798D", HardwareCategory::SuperIo)
            .with_sensor(SensorNode::new("/lpc/nct6798d/0/fan/1", "CPU Fan", SensorCategory::Fan).with_value(980.0))
            .with_sensor(SensorNode::new("/lpc/nct6798d/0/fan/0", "System Fan #1", SensorCategory::Fan).with_value(650.0))
            .with_sensor(SensorNode::new("/lpc/nct6798d/0/voltage/0", "Vcore", SensorCategory::Voltage).with_value(1.344))
            .with_sensor(SensorNode::new("/lpc/nct6798d/0/control/1", "CPU Fan", SensorCategory::Control).with_value(38.0)),
    )
}

/// Creates a mock NVMe drive
pub fn nvme_drive() -> HardwareNode {
    HardwareNode::new("/nvme/0", "Samsung SSD 980 PRO 1TB", HardwareCategory::Storage)
        .with_sensor(SensorNode::new("/nvme/0/temperature/0", "Composite Temperature", SensorCategory::Temperature).with_value(39.85))
        .with_sensor(SensorNode::new("/nvme/0/data/0", "Data Written", SensorCategory::Data).with_value(12345.678))
        .with_sensor(SensorNode::new("/nvme/0/throughput/0", "Read Rate", SensorCategory::Throughput).with_value(5120.4))
}

/// A full desktop: CPU, two GPUs, mainboard and a drive
pub fn desktop_tree() -> SensorTree {
    SensorTree::new(vec![ryzen_cpu(), mainboard_with_superio(), nvidia_gpu(), amd_gpu(), nvme_drive()])
}
