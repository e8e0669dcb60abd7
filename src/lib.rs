#![cfg_attr(not(test), no_std)]

/*
 * The device independent part of the intersection controller.
 *
 * Everything in here is plain data and plain state, so that it can be built
 * and tested on the host. The board specific bits (pins, SPI, USART and the
 * Embassy tasks) live in the firmware binary and talk to the controller only
 * through the traits in `crossing::ports`.
 */

#[macro_use]
mod fmt;

pub mod crossing;
pub mod inputs;
pub mod lamps;
pub mod sensors;
