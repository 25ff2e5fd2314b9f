pub(crate) mod model;
#[cfg(feature = "remote")]
pub(crate) mod remote;
pub(crate) mod source;
