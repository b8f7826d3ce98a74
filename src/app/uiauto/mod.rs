#[cfg(test)]
pub(crate) mod fake;
pub mod hierarchy;
pub mod selector;
pub mod session;
