//! Final assembly: class/function metadata ordering, body emission, and
//! entry-point selection, producing a `BinaryImage`.

pub mod entry;
pub mod image;
pub mod linker;
pub mod metadata;

pub use entry::EntryPoint;
pub use image::BinaryImage;
pub use linker::Linker;
pub use metadata::{ClassMetadata, FieldMetadata, FunctionMetadata, MethodMetadata, ModuleInit};
