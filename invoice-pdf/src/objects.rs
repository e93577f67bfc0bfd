use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Indirect object identifier: (object number, generation).
/// Generation is always 0 since documents are written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32, pub u16);

impl ObjId {
    pub fn num(&self) -> u32 {
        self.0
    }
}

/// PDF object model (PDF 32000-1:2008, 7.3).
#[derive(Debug, Clone)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// Name, stored without the leading `/`.
    Name(String),
    /// Literal string, stored unescaped. Encoded as Latin-1 on output.
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Entries keep insertion order so output is deterministic.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn literal_string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn array(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(owned_entries(entries))
    }

    /// `[0 0 width height]`, as used by `/MediaBox`.
    pub fn page_box(width: f64, height: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Integer(0),
            PdfObject::Integer(0),
            PdfObject::Real(width),
            PdfObject::Real(height),
        ])
    }

    pub fn stream(dict_entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: owned_entries(dict_entries),
            data,
        }
    }

    /// Zlib-compress `data` and tag the stream with `/Filter /FlateDecode`.
    pub fn flate_stream(dict_entries: Vec<(&str, PdfObject)>, data: &[u8]) -> io::Result<Self> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;
        let mut dict = owned_entries(dict_entries);
        dict.push(("Filter".to_string(), PdfObject::name("FlateDecode")));
        Ok(PdfObject::Stream {
            dict,
            data: compressed,
        })
    }
}

fn owned_entries(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::ZlibDecoder;

    use super::*;

    #[test]
    fn obj_ids_order_by_number() {
        assert!(ObjId(2, 0) < ObjId(5, 0));
        assert_eq!(ObjId(7, 0).num(), 7);
    }

    #[test]
    fn dict_keeps_insertion_order() {
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(ObjId(2, 0))),
        ]);
        match obj {
            PdfObject::Dictionary(entries) => {
                assert_eq!(entries[0].0, "Type");
                assert_eq!(entries[1].0, "Parent");
            }
            _ => panic!("expected Dictionary"),
        }
    }

    #[test]
    fn page_box_has_four_numbers() {
        match PdfObject::page_box(595.28, 841.89) {
            PdfObject::Array(items) => assert_eq!(items.len(), 4),
            _ => panic!("expected Array"),
        }
    }

    #[test]
    fn flate_stream_round_trips_and_tags_filter() {
        let raw = vec![7u8; 4096];
        let obj = PdfObject::flate_stream(
            vec![("Subtype", PdfObject::name("Image"))],
            &raw,
        )
        .unwrap();
        match obj {
            PdfObject::Stream { dict, data } => {
                assert!(data.len() < raw.len());
                assert_eq!(dict.last().unwrap().0, "Filter");
                let mut out = Vec::new();
                ZlibDecoder::new(data.as_slice())
                    .read_to_end(&mut out)
                    .unwrap();
                assert_eq!(out, raw);
            }
            _ => panic!("expected Stream"),
        }
    }
}
