pub(crate) mod ease;
pub(crate) mod interval;
pub(crate) mod proc;
