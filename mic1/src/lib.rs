#![allow(unused_doc_comments)]
#![warn(clippy::all)]
#![allow(clippy::cast_lossless)]

#[macro_use]
mod util;

pub mod cpu;
pub mod error;
pub mod log;
pub mod mmu;

pub use cpu::register::Register;
pub use cpu::{Config, Cpu};

#[macro_use]
extern crate log as logging;
#[macro_use]
extern crate more_asserts;
