pub(crate) mod record;
pub(crate) mod source;
pub(crate) mod store;
