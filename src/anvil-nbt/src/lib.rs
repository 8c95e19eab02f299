//! Anvil NBT - the tagged-tree codec used by Anvil world data.
//!
//! Chunk payloads, entity and POI records, and `level.dat` are all encoded as
//! NBT: a big-endian binary tree of named, typed fields. This crate decodes
//! that encoding into [`Compound`]/[`Tag`] values and encodes it back without
//! reordering fields, so a decode/encode cycle reproduces the input bytes.
//!
//! # Usage
//!
//! ```rust,no_run
//! use anvil_nbt::{read_gzip, write_gzip};
//!
//! fn main() -> anvil_nbt::Result<()> {
//!     let mut level = read_gzip("world/level.dat")?;
//!     if let Some(data) = level.root.get_compound_mut("Data") {
//!         data.insert("Player", anvil_nbt::Compound::new());
//!     }
//!     write_gzip("world/level.dat", &level)?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
mod mutf8;
pub mod tag;

pub use codec::{from_bytes, read_gzip, to_bytes, write_gzip, MAX_DEPTH};
pub use error::{NbtError, Result};
pub use tag::{Compound, List, NamedCompound, Tag, TagType};
