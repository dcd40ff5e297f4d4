pub(crate) mod conversions;
pub(crate) mod html;
pub(crate) mod regex;
