mod async_conversion;
mod byte_size_ext;

pub use async_conversion::{AsyncTryFrom, AsyncTryInto};
pub use byte_size_ext::ByteSizeExt;
