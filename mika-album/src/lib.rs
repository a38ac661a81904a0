//! mika-album library interface
//!
//! Resolves a loose album filter such as `[Young Thug, Rap, 2015]` to one
//! album record, using Discogs as the authoritative catalog and Spotify for
//! optional enrichment (cleaner link, cover art and tracklist).

pub mod artist_resolver;
pub mod assembler;
pub mod clients;
pub mod error;
pub mod fallback;
pub mod filter_parser;
pub mod http;
pub mod normalize;
pub mod pipeline;
pub mod search_cascade;
pub mod secondary_matcher;
pub mod similarity;
pub mod tracklist;
pub mod types;

pub use crate::error::{LookupError, LookupResult};
pub use crate::http::HttpContext;
pub use crate::pipeline::{find_album, AlbumPipeline, PipelineSettings};
pub use crate::types::{AlbumRecord, TrackEntry, Tracklist};
