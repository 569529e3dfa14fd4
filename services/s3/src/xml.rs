//! The few XML fragments the multipart flow produces.

use crate::CompletedPart;

/// Escape the five XML-special characters.
pub(crate) fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Body for `CompleteMultipartUpload`: every uploaded part in ascending
/// part-number order.
pub(crate) fn complete_multipart_upload_body(parts: &[CompletedPart]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <CompleteMultipartUpload xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">",
    );
    for part in parts {
        xml.push_str("<Part><ETag>");
        xml.push_str(&xml_escape(&part.etag));
        xml.push_str("</ETag><PartNumber>");
        xml.push_str(&part.part_number.to_string());
        xml.push_str("</PartNumber></Part>");
    }
    xml.push_str("</CompleteMultipartUpload>");
    xml
}
