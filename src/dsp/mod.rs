//! # DSP Core
//!
//! Framework-free building blocks of the delay:
//!
//! - **`ring_buffer`**: multi-channel circular history with a shared write
//!   cursor and wrap-aware block copy / add operations.
//! - **`processor`**: the per-block delay algorithm (dry scaling, ring
//!   write, delayed read, feedback write-back, cursor advance).
//! - **`parameters`**: the [`ParameterSource`](parameters::ParameterSource)
//!   trait the processor reads its seven values through, plus link rules.
//! - **`gain`**: constant and ramped gain helpers shared by the above.
//!
//! Nothing here knows about nih-plug; the plugin wiring lives in the crate
//! root and `params`.

pub mod gain;
pub mod parameters;
pub mod processor;
pub mod ring_buffer;
