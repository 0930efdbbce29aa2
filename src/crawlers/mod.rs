pub mod crawler;
pub mod navigation;
pub mod signal;
pub mod web;

#[cfg(test)]
pub(crate) mod fake;
