pub mod locator;
pub mod runner;
pub mod shell;
