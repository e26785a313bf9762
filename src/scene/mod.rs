pub(crate) mod composer;
pub(crate) mod dsl;
pub(crate) mod spec;
pub(crate) mod state;
