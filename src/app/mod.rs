pub mod adb;
pub mod bvt;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod net_probe;
pub mod uiauto;
pub mod wifi;
