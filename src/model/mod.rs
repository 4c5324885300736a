//! Layout model types.
//!
//! The structural layout tree (`pdf_info` pages of blocks, lines and spans)
//! and the flat span-size dump are produced by external extractors. The model
//! keeps every field it does not interpret so an enriched layout can be
//! written back in the producer's shape.

mod bbox;
mod block;
mod document;
mod page;
mod spans;

pub use bbox::{BBox, PageSize};
pub use block::{Block, BlockKind, Line, Span, SpanKind};
pub use document::LayoutDocument;
pub use page::Page;
pub use spans::{DumpBlock, DumpLine, DumpPage, SizedSpan, SpanDump};
