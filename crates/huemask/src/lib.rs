#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use huemask_engine as engine;

#[doc(inline)]
pub use huemask_image as image;

#[doc(inline)]
pub use huemask_imgproc as imgproc;

#[doc(inline)]
pub use huemask_io as io;
