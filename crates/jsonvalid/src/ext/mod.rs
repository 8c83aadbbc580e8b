pub(crate) mod cmp;
pub(crate) mod numeric;
