mod chunks;

pub use chunks::Body;
#[cfg(test)]
pub(crate) use chunks::capture_wire;
