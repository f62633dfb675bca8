//! Food Handlers

pub(crate) mod index;
