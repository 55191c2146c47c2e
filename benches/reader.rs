use criterion::{criterion_group, criterion_main, Criterion};

use embedded_stax::{ParsingResult, XmlReader};

fn document(items: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><feed>");
    for index in 0..items {
        xml.push_str("<entry id='");
        xml.push_str(&index.to_string());
        xml.push_str("' kind=\"plain\">value &amp; ");
        xml.push_str(&index.to_string());
        xml.push_str("<!-- note --><payload><![CDATA[ raw <data> ]]></payload></entry>");
    }
    xml.push_str("</feed>");
    xml
}

fn parse_all(bytes: &[u8], chunk_size: usize) {
    let mut reader = XmlReader::new();
    let mut offset = 0;

    loop {
        match reader.parse() {
            ParsingResult::NeedMoreData => {
                if offset == bytes.len() {
                    break;
                }
                let end = usize::min(offset + chunk_size, bytes.len());
                offset += reader.write_data(&bytes[offset..end]);
            }
            ParsingResult::EndOfDocument => break,
            ParsingResult::Error => panic!("unexpected parse error"),
            _ => {}
        }
    }
}

fn reader_benchmark(c: &mut Criterion) {
    let xml = document(100);
    let bytes = xml.as_bytes();

    c.bench_function("parse_full_buffer", |b| {
        b.iter(|| parse_all(bytes, bytes.len()));
    });
    c.bench_function("parse_64_byte_chunks", |b| {
        b.iter(|| parse_all(bytes, 64));
    });
}

criterion_group!(benches, reader_benchmark);
criterion_main!(benches);
