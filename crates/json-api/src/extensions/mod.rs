//! Extension traits

mod depot;
mod result;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::{ResultExt as _, unavailable};

#[cfg(test)]
pub(crate) use result::UNAVAILABLE_BRIEF;
