pub(crate) mod html;

pub(crate) use html::escape;
