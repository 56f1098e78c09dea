//! Union value-type synthesis: tag assignment, conversion planning, and
//! cross-module layout caching for the emitter's union lowering.

mod conversion;
mod layout;
mod synthesizer;

pub use conversion::{plan_conversion, plan_narrow, ConversionKind};
pub use layout::{UnionLayout, UnionMember};
pub use synthesizer::UnionSynthesizer;
