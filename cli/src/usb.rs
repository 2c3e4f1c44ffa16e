//! `UsbDevice` backed by `nusb`.
//!
//! Opens the first device matching the target's vendor/product id. Closing
//! drops the claimed interface and the device handle.

use jzboot_core::usbboot::{ControlSetup, UsbDevice, UsbError};
use nusb::transfer::{ControlOut, ControlType, Recipient};

pub struct NusbDevice {
    vendor_id: u16,
    product_id: u16,
    device: Option<nusb::Device>,
    interface: Option<nusb::Interface>,
}

impl NusbDevice {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self { vendor_id, product_id, device: None, interface: None }
    }

    fn interface(&self) -> Result<&nusb::Interface, UsbError> {
        self.interface.as_ref().ok_or(UsbError::NotOpen)
    }
}

impl UsbDevice for NusbDevice {
    async fn open(&mut self) -> Result<(), UsbError> {
        let info = nusb::list_devices()
            .map_err(|e| UsbError::Open(e.to_string()))?
            .find(|d| d.vendor_id() == self.vendor_id && d.product_id() == self.product_id)
            .ok_or(UsbError::NoDevice { vendor_id: self.vendor_id, product_id: self.product_id })?;
        log::debug!("usb: opening {:04x}:{:04x}", info.vendor_id(), info.product_id());
        let device = info.open().map_err(|e| UsbError::Open(e.to_string()))?;
        self.device = Some(device);
        Ok(())
    }

    async fn claim_interface(&mut self, interface: u8) -> Result<(), UsbError> {
        let device = self.device.as_ref().ok_or(UsbError::NotOpen)?;
        let claimed = device
            .claim_interface(interface)
            .map_err(|e| UsbError::Claim { interface, msg: e.to_string() })?;
        self.interface = Some(claimed);
        Ok(())
    }

    async fn control_out(&mut self, setup: ControlSetup) -> Result<(), UsbError> {
        let transfer = ControlOut {
            control_type: ControlType::Vendor,
            recipient: Recipient::Device,
            request: setup.request,
            value: setup.value,
            index: setup.index,
            data: &[],
        };
        self.interface()?
            .control_out(transfer)
            .await
            .into_result()
            .map_err(|e| UsbError::Control { request: setup.request, msg: e.to_string() })?;
        Ok(())
    }

    async fn bulk_out(&mut self, endpoint: u8, data: &[u8]) -> Result<(), UsbError> {
        let completion = self.interface()?.bulk_out(endpoint, data.to_vec()).await;
        let sent = completion.data.actual_length();
        completion
            .status
            .map_err(|e| UsbError::Bulk { endpoint, msg: e.to_string() })?;
        if sent != data.len() {
            return Err(UsbError::Bulk {
                endpoint,
                msg: format!("short transfer: {} of {} bytes", sent, data.len()),
            });
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), UsbError> {
        self.interface = None;
        self.device = None;
        Ok(())
    }
}
