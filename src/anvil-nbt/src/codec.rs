//! Binary encoding and decoding.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::{NbtError, Result};
use crate::mutf8;
use crate::tag::{Compound, List, NamedCompound, Tag, TagType};

/// Maximum nesting of compounds and lists accepted by the decoder.
pub const MAX_DEPTH: usize = 512;

/// Decode an uncompressed NBT document.
pub fn from_bytes(bytes: &[u8]) -> Result<NamedCompound> {
    read_named(&mut Cursor::new(bytes))
}

/// Encode an NBT document without compression.
pub fn to_bytes(doc: &NamedCompound) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_named(&mut out, doc)?;
    Ok(out)
}

/// Read a gzip-compressed NBT file such as `level.dat`.
pub fn read_gzip(path: impl AsRef<Path>) -> Result<NamedCompound> {
    let file = File::open(path.as_ref())?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    read_named(&mut decoder)
}

/// Write a gzip-compressed NBT file, syncing it to disk before returning.
pub fn write_gzip(path: impl AsRef<Path>, doc: &NamedCompound) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    write_named(&mut encoder, doc)?;
    let writer = encoder.finish()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Read a named root compound from any reader.
pub fn read_named<R: Read>(reader: &mut R) -> Result<NamedCompound> {
    let tag_type = TagType::try_from(read_u8(reader)?)?;
    if tag_type != TagType::Compound {
        return Err(NbtError::RootNotCompound(tag_type));
    }
    let name = read_string(reader)?;
    let root = read_compound(reader, 1)?;
    Ok(NamedCompound { name, root })
}

/// Write a named root compound to any writer.
pub fn write_named<W: Write>(writer: &mut W, doc: &NamedCompound) -> Result<()> {
    writer.write_all(&[TagType::Compound.id()])?;
    write_string(writer, &doc.name)?;
    write_compound(writer, &doc.root)
}

// ============================================================================
// Decoding
// ============================================================================

fn read_payload<R: Read>(reader: &mut R, tag_type: TagType, depth: usize) -> Result<Tag> {
    Ok(match tag_type {
        TagType::End => return Err(NbtError::UnknownTag(0)),
        TagType::Byte => Tag::Byte(read_u8(reader)? as i8),
        TagType::Short => Tag::Short(i16::from_be_bytes(read_array(reader)?)),
        TagType::Int => Tag::Int(read_i32(reader)?),
        TagType::Long => Tag::Long(i64::from_be_bytes(read_array(reader)?)),
        TagType::Float => Tag::Float(f32::from_be_bytes(read_array(reader)?)),
        TagType::Double => Tag::Double(f64::from_be_bytes(read_array(reader)?)),
        TagType::ByteArray => {
            let len = read_len(reader)?;
            let buf = read_bytes(reader, len)?;
            Tag::ByteArray(buf.into_iter().map(|b| b as i8).collect())
        }
        TagType::String => Tag::String(read_string(reader)?),
        TagType::List => Tag::List(read_list(reader, depth + 1)?),
        TagType::Compound => Tag::Compound(read_compound(reader, depth + 1)?),
        TagType::IntArray => {
            let len = read_len(reader)?;
            let mut out = Vec::with_capacity(len.min(1 << 16));
            for _ in 0..len {
                out.push(read_i32(reader)?);
            }
            Tag::IntArray(out)
        }
        TagType::LongArray => {
            let len = read_len(reader)?;
            let mut out = Vec::with_capacity(len.min(1 << 16));
            for _ in 0..len {
                out.push(i64::from_be_bytes(read_array(reader)?));
            }
            Tag::LongArray(out)
        }
    })
}

fn read_compound<R: Read>(reader: &mut R, depth: usize) -> Result<Compound> {
    if depth > MAX_DEPTH {
        return Err(NbtError::TooDeep(MAX_DEPTH));
    }
    let mut compound = Compound::new();
    loop {
        let tag_type = TagType::try_from(read_u8(reader)?)?;
        if tag_type == TagType::End {
            return Ok(compound);
        }
        let name = read_string(reader)?;
        let value = read_payload(reader, tag_type, depth)?;
        compound.insert(name, value);
    }
}

fn read_list<R: Read>(reader: &mut R, depth: usize) -> Result<List> {
    if depth > MAX_DEPTH {
        return Err(NbtError::TooDeep(MAX_DEPTH));
    }
    let element = TagType::try_from(read_u8(reader)?)?;
    let len = read_len(reader)?;
    if element == TagType::End && len > 0 {
        return Err(NbtError::UnknownTag(0));
    }
    let mut items = Vec::with_capacity(len.min(1 << 16));
    for _ in 0..len {
        items.push(read_payload(reader, element, depth)?);
    }
    Ok(List::from_parts(element, items))
}

fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = u16::from_be_bytes(read_array(reader)?) as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    mutf8::decode(&buf)
}

fn read_len<R: Read>(reader: &mut R) -> Result<usize> {
    let len = read_i32(reader)?;
    if len < 0 {
        return Err(NbtError::NegativeLength(len));
    }
    Ok(len as usize)
}

/// Read exactly `len` bytes, growing the buffer only as data arrives so a
/// corrupt length cannot force a large allocation up front.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(1 << 16));
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {len} bytes, found {}", buf.len()),
        ));
    }
    Ok(buf)
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let [b] = read_array::<R, 1>(reader)?;
    Ok(b)
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    Ok(i32::from_be_bytes(read_array(reader)?))
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

// ============================================================================
// Encoding
// ============================================================================

fn write_payload<W: Write>(writer: &mut W, tag: &Tag) -> Result<()> {
    match tag {
        Tag::Byte(v) => writer.write_all(&[*v as u8])?,
        Tag::Short(v) => writer.write_all(&v.to_be_bytes())?,
        Tag::Int(v) => writer.write_all(&v.to_be_bytes())?,
        Tag::Long(v) => writer.write_all(&v.to_be_bytes())?,
        Tag::Float(v) => writer.write_all(&v.to_be_bytes())?,
        Tag::Double(v) => writer.write_all(&v.to_be_bytes())?,
        Tag::ByteArray(v) => {
            write_len(writer, v.len())?;
            let bytes: Vec<u8> = v.iter().map(|b| *b as u8).collect();
            writer.write_all(&bytes)?;
        }
        Tag::String(s) => write_string(writer, s)?,
        Tag::List(list) => write_list(writer, list)?,
        Tag::Compound(c) => write_compound(writer, c)?,
        Tag::IntArray(v) => {
            write_len(writer, v.len())?;
            for i in v {
                writer.write_all(&i.to_be_bytes())?;
            }
        }
        Tag::LongArray(v) => {
            write_len(writer, v.len())?;
            for l in v {
                writer.write_all(&l.to_be_bytes())?;
            }
        }
    }
    Ok(())
}

fn write_compound<W: Write>(writer: &mut W, compound: &Compound) -> Result<()> {
    for (name, value) in compound.iter() {
        writer.write_all(&[value.tag_type().id()])?;
        write_string(writer, name)?;
        write_payload(writer, value)?;
    }
    writer.write_all(&[TagType::End.id()])?;
    Ok(())
}

fn write_list<W: Write>(writer: &mut W, list: &List) -> Result<()> {
    let element = list.element_type();
    if let Some(bad) = list.iter().find(|t| t.tag_type() != element) {
        return Err(NbtError::MixedList {
            expected: element,
            found: bad.tag_type(),
        });
    }
    writer.write_all(&[element.id()])?;
    write_len(writer, list.len())?;
    for item in list {
        write_payload(writer, item)?;
    }
    Ok(())
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    let bytes = mutf8::encode(s);
    let len = u16::try_from(bytes.len()).map_err(|_| NbtError::StringTooLong(bytes.len()))?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(&bytes)?;
    Ok(())
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<()> {
    let len = i32::try_from(len).map_err(|_| NbtError::TooLong(len))?;
    writer.write_all(&len.to_be_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> NamedCompound {
        let mut section = Compound::new();
        section.insert("Y", Tag::Byte(-4));
        section.insert("data", Tag::LongArray(vec![1, -1, i64::MAX]));
        let mut root = Compound::new();
        root.insert("DataVersion", Tag::Int(3465));
        root.insert("sections", List::of_compounds([section]));
        root.insert("Heights", Tag::IntArray(vec![64, 65]));
        root.insert("Biome", Tag::String("minecraft:plains".into()));
        root.insert("Empty", List::empty(TagType::Compound));
        NamedCompound::new("", root)
    }

    #[test]
    fn test_decode_reproduces_encoded_document() {
        let doc = sample();
        let bytes = to_bytes(&doc).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), doc);
    }

    #[test]
    fn test_known_byte_layout() {
        let mut root = Compound::new();
        root.insert("a", Tag::Byte(1));
        let bytes = to_bytes(&NamedCompound::new("", root)).unwrap();
        assert_eq!(
            bytes,
            vec![10, 0, 0, /* byte tag */ 1, 0, 1, b'a', 1, /* end */ 0]
        );
    }

    #[test]
    fn test_root_must_be_compound() {
        let err = from_bytes(&[8, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, NbtError::RootNotCompound(TagType::String)));
    }

    #[test]
    fn test_truncated_input_fails() {
        let bytes = to_bytes(&sample()).unwrap();
        let err = from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, NbtError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_negative_array_length_fails() {
        // root { LongArray "d" len=-1 }
        let bytes = [10, 0, 0, 12, 0, 1, b'd', 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            from_bytes(&bytes),
            Err(NbtError::NegativeLength(-1))
        ));
    }

    #[test]
    fn test_oversized_byte_array_length_fails_without_allocating() {
        // root { ByteArray "b" len=i32::MAX } with no body
        let bytes = [10, 0, 0, 7, 0, 1, b'b', 0x7F, 0xFF, 0xFF, 0xFF];
        let err = from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, NbtError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_byte_array_decodes_signed_bytes() {
        let mut root = Compound::new();
        root.insert("b", Tag::ByteArray(vec![-1, 0, 127]));
        let doc = NamedCompound::new("", root);
        assert_eq!(from_bytes(&to_bytes(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_excessive_nesting_fails() {
        let mut bytes = vec![10, 0, 0];
        for _ in 0..MAX_DEPTH + 1 {
            bytes.extend_from_slice(&[10, 0, 1, b'n']);
        }
        assert!(matches!(from_bytes(&bytes), Err(NbtError::TooDeep(_))));
    }

    #[test]
    fn test_unknown_tag_id_fails() {
        let bytes = [10, 0, 0, 42, 0, 1, b'x'];
        assert!(matches!(from_bytes(&bytes), Err(NbtError::UnknownTag(42))));
    }
}
