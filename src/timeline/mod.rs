pub(crate) mod chain;
pub(crate) mod phase;
pub(crate) mod typewriter;
