/*!
POST diagnostic card on port 0x80.

Latches the code the firmware writes during the power-on self test and
logs it; reading the port returns the last code.
*/

use std::any::Any;

use crate::error::Result;
use crate::peripheral::{DeviceId, Peripheral};
use crate::system::System;

#[derive(Debug, Default)]
pub struct PostCard {
    code: u8,
}

impl PostCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(&self) -> u8 {
        self.code
    }
}

impl Peripheral for PostCard {
    fn name(&self) -> &'static str {
        "Post Card"
    }

    fn install(&mut self, sys: &mut System, id: DeviceId) -> Result<()> {
        sys.install_io_at(id, 0x80);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.code = 0;
        Ok(())
    }

    fn io_in(&mut self, _sys: &System, _port: u16) -> u8 {
        self.code
    }

    fn io_out(&mut self, _sys: &System, _port: u16, data: u8) {
        self.code = data;
        log::info!("POST {data:#04X}");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
