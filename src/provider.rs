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

//! Sensor provider abstraction and the owned session around it.

use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::tree::{HardwareId, HardwareNode, SensorTree};

/// A hardware monitoring back-end.
#[cfg_attr(test, mockall::automock)]
pub trait SensorProvider {
    /// Short name used in logs and the status bar.
    fn name(&self) -> String;

    /// Acquire the back-end and enumerate its top-level hardware in native order.
    fn open(&mut self) -> Result<Vec<HardwareNode>, ProviderError>;

    /// Refresh live values of `node` and all of its sub-hardware in place.
    fn update(&mut self, node: &mut HardwareNode) -> Result<(), ProviderError>;

    /// Release the back-end.
    fn close(&mut self);
}

/// Owns a provider for the lifetime of the process together with the tree
/// captured when it was opened.
///
/// The provider is closed exactly once: by [`ProviderSession::close`] or on
/// drop, whichever comes first, and also when opening failed.
pub struct ProviderSession {
    provider: Box<dyn SensorProvider>,
    name: String,
    tree: SensorTree,
    available: bool,
    open_error: Option<String>,
    closed: bool,
}

impl ProviderSession {
    /// Open `provider` and capture its tree. A failure is not fatal: the
    /// session comes up degraded with no hardware.
    pub fn open(mut provider: Box<dyn SensorProvider>) -> Self {
        let name = provider.name();
        match provider.open() {
            Ok(hardware) => {
                let tree = SensorTree::new(hardware);
                info!(provider = %name, hardware = tree.len(), "Sensor provider opened");
                Self { provider, name, tree, available: true, open_error: None, closed: false }
            }
            Err(e) => {
                warn!(provider = %name, error = %e, "Sensor provider unavailable, running degraded");
                Self {
                    provider,
                    name,
                    tree: SensorTree::default(),
                    available: false,
                    open_error: Some(e.to_string()),
                    closed: false,
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_available(&self) -> bool {
        self.available && !self.closed
    }

    /// Why opening failed, if it did.
    pub fn open_error(&self) -> Option<&str> {
        self.open_error.as_deref()
    }

    pub fn tree(&self) -> &SensorTree {
        &self.tree
    }

    /// Refresh one hardware node (top-level or sub-hardware) and return it.
    pub fn update(&mut self, id: &HardwareId) -> Result<&HardwareNode, ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::Unavailable(self.name.clone()));
        }
        let node = self
            .tree
            .find_hardware_mut(id)
            .ok_or_else(|| ProviderError::UnknownHardware(id.clone()))?;
        self.provider.update(node)?;
        Ok(&*node)
    }

    /// Refresh every top-level node. Stops at the first error.
    pub fn update_all(&mut self) -> Result<(), ProviderError> {
        if !self.is_available() {
            return Err(ProviderError::Unavailable(self.name.clone()));
        }
        for node in self.tree.hardware_mut() {
            self.provider.update(node)?;
        }
        Ok(())
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.provider.close();
        debug!(provider = %self.name, "Sensor provider closed");
    }
}

impl Drop for ProviderSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mainboard_with_superio, ryzen_cpu};
    use crate::tree::SensorId;

    fn named_mock() -> MockSensorProvider {
        let mut mock = MockSensorProvider::new();
        mock.expect_name().return_const("mock".to_string());
        mock
    }

    #[test]
    fn test_open_captures_tree() {
        let mut mock = named_mock();
        mock.expect_open().times(1).returning(|| Ok(vec![ryzen_cpu(), mainboard_with_superio()]));
        mock.expect_close().times(1).return_const(());

        let session = ProviderSession::open(Box::new(mock));
        assert!(session.is_available());
        assert_eq!(session.tree().len(), 2);
        assert_eq!(session.name(), "mock");
    }

    #[test]
    fn test_failed_open_is_degraded_and_still_closed_once() {
        let mut mock = named_mock();
        mock.expect_open()
            .times(1)
            .returning(|| Err(ProviderError::Unavailable("no driver".into())));
        mock.expect_update().never();
        mock.expect_close().times(1).return_const(());

        let mut session = ProviderSession::open(Box::new(mock));
        assert!(!session.is_available());
        assert!(session.tree().is_empty());
        assert!(session.open_error().unwrap().contains("no driver"));
        assert!(matches!(
            session.update(&HardwareId::new("/amdcpu/0")),
            Err(ProviderError::Unavailable(_))
        ));
        session.close();
        session.close();
        drop(session);
    }

    #[test]
    fn test_update_refreshes_sub_hardware_in_place() {
        let mut mock = named_mock();
        mock.expect_open().returning(|| Ok(vec![mainboard_with_superio()]));
        mock.expect_update().times(1).returning(|node| {
            node.for_each_sensor_mut(|_, sensor| sensor.value = Some(1.0));
            Ok(())
        });
        mock.expect_close().return_const(());

        let mut session = ProviderSession::open(Box::new(mock));
        let node = session.update(&HardwareId::new("/lpc/nct6798d/0")).unwrap();
        assert_eq!(node.name, "Nuvoton NCT6798D");
        let fan = session.tree().hardware()[0]
            .find_sensor(&SensorId::new("/lpc/nct6798d/0/fan/1"))
            .unwrap();
        assert_eq!(fan.value, Some(1.0));
    }

    #[test]
    fn test_update_unknown_hardware() {
        let mut mock = named_mock();
        mock.expect_open().returning(|| Ok(vec![ryzen_cpu()]));
        mock.expect_update().never();
        mock.expect_close().return_const(());

        let mut session = ProviderSession::open(Box::new(mock));
        let err = session.update(&HardwareId::new("/ghost")).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownHardware(id) if id.as_str() == "/ghost"));
    }

    #[test]
    fn test_closed_session_is_unavailable() {
        let mut mock = named_mock();
        mock.expect_open().returning(|| Ok(vec![ryzen_cpu()]));
        mock.expect_close().times(1).return_const(());

        let mut session = ProviderSession::open(Box::new(mock));
        session.close();
        assert!(!session.is_available());
        assert!(session.update_all().is_err());
    }
}
