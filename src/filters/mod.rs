//! Filter dispatch.
//!
//! ## Filter Kinds
//!
//! | Kind | Parameters | Border policies |
//! |------|------------|-----------------|
//! | box | mask size, anchor | none, replicate |
//! | sobel_h, sobel_v | - | none, replicate |
//! | roberts_up, roberts_down | - | none, replicate |
//! | laplace, highpass, lowpass | 3x3 or 5x5 mask | none, replicate |
//! | gauss | 3x3 to 15x15 mask | none, replicate |
//! | sharpen | - | none, replicate |
//! | wiener | mask size, anchor, noise | replicate |
//!
//! Each kind maps through [`primitives`] to a pair of backend entry points,
//! one per border policy. Mask sizes for the fixed-size kinds are rounded
//! to the nearest size the backend provides.

mod descriptor;
mod dispatch;

pub use descriptor::{FilterDescriptor, ParamSet};
pub use dispatch::{primitives, BorderArgs, FilterArgs, FilterDispatcher, Primitives};
