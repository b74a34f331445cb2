//! # Figwind Tailwind Compiler
//!
//! Compiles a design selection into Tailwind-styled HTML or JSX.
//!
//! ## Passes
//!
//! 1. Normalize the host tree (see `figwind_normalizer`)
//! 2. Emit code and render the HTML preview concurrently from the same
//!    intermediate tree, sharing bitmap exports and the asset pipeline
//! 3. Collect warnings, the color report and the text-style report
//!
//! Style resolution lives in [`resolve`]; each resolver maps one group of
//! node properties to utility classes and never touches the host.
//!
//! ## Example
//!
//! ```ignore
//! let compiler = Compiler::new(Arc::new(host), Arc::new(AssetPipeline::http()));
//! match compiler.compile(&selection, &settings, &CompileOptions::default()).await? {
//!     CompileOutcome::Converted(conversion) => println!("{}", conversion.code),
//!     CompileOutcome::EmptySelection => {}
//! }
//! ```

mod compiler;
mod emitter;
pub mod markup;
mod preview;
pub mod report;
pub mod resolve;

pub use compiler::{
    CompileError, CompileOptions, CompileOutcome, CompileResult, Compiler, Conversion,
};
pub use emitter::{Emitter, Fragment, ImageMode};
pub use preview::{render_preview, Preview, PreviewSize};
pub use report::{colors_report, render_text_styles, ColorEntry, TextStyleEntry};

#[cfg(test)]
mod tests;
