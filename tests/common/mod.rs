//! Shared fixtures for the integration tests: template archives, mapping
//! text, and source files written into temporary directories.
#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

pub const MAPPING: &str = "\
[fields]
성명 = B
세목 = F
전자납부번호 = G
과세기간 = H
과세대상 = I
본세 = J
가산금 = K
합계세액 = L
";

/// Section XML for a template variant with `rows` item rows. Mirrors the
/// real template family: header tokens on top, one paragraph block per item
/// row with a linesegarray for the overlap-prone field, aggregate tokens at
/// the bottom, and (when item rows exist) one named token.
pub fn section_xml(rows: usize) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <hs:sec xmlns:hs=\"http://www.hancom.co.kr/hwpml/2011/section\">\
         <hp:p>%A2% %B2% %C2% %D2% %E2%</hp:p>",
    );
    if rows > 0 {
        xml.push_str("<hp:p>납세자 %성명% 귀하</hp:p>");
    }
    for row in 2..=rows + 1 {
        xml.push_str(&format!(
            "<hp:p>%F{row}% %G{row}% %H{row}%</hp:p>\
             <hp:p>%I{row}%<hp:linesegarray>\
             <hp:lineseg textpos=\"0\" vertpos=\"0\"/></hp:linesegarray></hp:p>\
             <hp:p>%J{row}% %K{row}% %L{row}%</hp:p>"
        ));
    }
    xml.push_str("<hp:p>%TAX_TOTAL_AMOUNT%</hp:p><hp:p>%TAX_TOTAL_AMOUNT_STR%</hp:p></hs:sec>");
    xml
}

/// Write `template-tax-{rows}.hwpx` into `dir`.
pub fn write_template(dir: &Path, rows: usize) {
    let path = dir.join(format!("template-tax-{rows}.hwpx"));
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    writer.start_file("mimetype", options).unwrap();
    writer.write_all(b"application/hwp+zip").unwrap();
    writer.start_file("version.xml", options).unwrap();
    writer
        .write_all(b"<hv:HCFVersion xmlns:hv=\"http://www.hancom.co.kr/hwpml/2011/version\"/>")
        .unwrap();
    writer.start_file("Contents/header.xml", options).unwrap();
    writer.write_all(b"<hh:head/>").unwrap();
    writer.start_file("Contents/section0.xml", options).unwrap();
    writer.write_all(section_xml(rows).as_bytes()).unwrap();
    writer.finish().unwrap();
}

/// Monetary values for data row `i` (1-based): (본세, 가산금, 합계세액).
pub fn amounts_for_row(i: usize) -> (u64, u64, u64) {
    let base = 100_000 + i as u64 * 1_000;
    let surcharge = 3_000 + i as u64 * 10;
    (base, surcharge, base + surcharge)
}

/// Write a CSV source with `rows` item rows (plus header).
pub fn write_csv(path: &Path, rows: usize) {
    let mut content = String::from(
        "관리번호,성명,주소,과세연도,발행일,세목,전자납부번호,과세기간,과세대상,본세,가산금,합계세액\n",
    );
    for i in 1..=rows {
        let (base, surcharge, total) = amounts_for_row(i);
        content.push_str(&format!(
            "A-{i:02},홍길동,대전광역시 중구,2024,2024-06-01,자동차세 {i}기분,1100-{i},2024-{i:02},승용 1598cc,{base},{surcharge},{total}\n"
        ));
    }
    std::fs::write(path, content).unwrap();
}

/// Sum of the 합계세액 column across `rows` item rows.
pub fn expected_total(rows: usize) -> u64 {
    (1..=rows).map(|i| amounts_for_row(i).2).sum()
}

/// Read one part of a generated archive as text.
pub fn read_part(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut content = String::new();
    part.read_to_string(&mut content).unwrap();
    content
}
