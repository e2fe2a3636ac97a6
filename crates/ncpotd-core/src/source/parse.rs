//! Streaming extraction of image references from a WebDAV multistatus body.

use super::{has_image_extension, CandidateSet};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Path component of a reference: everything before `?` or `#`.
fn path_component(href: &str) -> &str {
    href.split(['?', '#']).next().unwrap_or(href)
}

fn is_image_reference(href: &str) -> bool {
    !href.ends_with('/') && has_image_extension(path_component(href))
}

/// Scans `body` for `href` elements (any namespace prefix) and collects
/// `base_url + href` for every non-directory image reference, in document
/// order, stopping once `cap` entries are collected.
///
/// `href` values are server-rooted (`/remote.php/dav/...`) and are appended to
/// `base_url` as-is. Malformed XML ends the scan; entries found before the
/// error are kept.
pub fn collect_image_hrefs(body: &[u8], base_url: &str, cap: Option<usize>) -> CandidateSet {
    let mut set = CandidateSet::new(cap);
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_href = false;
    let mut href = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"href" => {
                in_href = true;
                href.clear();
            }
            Ok(Event::Text(t)) if in_href => match t.unescape() {
                Ok(text) => href.push_str(&text),
                Err(e) => tracing::warn!("undecodable href text: {}", e),
            },
            Ok(Event::CData(c)) if in_href => {
                href.push_str(&String::from_utf8_lossy(&c));
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"href" => {
                in_href = false;
                let reference = href.trim();
                if is_image_reference(reference) {
                    let location = format!("{}{}", base_url, reference);
                    tracing::debug!(base_url, href = reference, %location, "listing entry");
                    if set.offer(location) {
                        break;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    "listing XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multistatus(hrefs: &[&str]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0"?><d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">"#,
        );
        for h in hrefs {
            xml.push_str(&format!(
                "<d:response><d:href>{}</d:href><d:propstat><d:prop><d:displayname/></d:prop>\
                 <d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>",
                h
            ));
        }
        xml.push_str("</d:multistatus>");
        xml
    }

    #[test]
    fn keeps_only_image_files_in_listing_order() {
        let body = multistatus(&[
            "/remote.php/dav/files/u/Pics/",
            "/remote.php/dav/files/u/Pics/b.PNG",
            "/remote.php/dav/files/u/Pics/notes.txt",
            "/remote.php/dav/files/u/Pics/sub/",
            "/remote.php/dav/files/u/Pics/sub/a.jpeg",
        ]);
        let set = collect_image_hrefs(body.as_bytes(), "https://host", None);
        assert_eq!(
            set.as_slice(),
            [
                "https://host/remote.php/dav/files/u/Pics/b.PNG",
                "https://host/remote.php/dav/files/u/Pics/sub/a.jpeg",
            ]
        );
    }

    #[test]
    fn composes_exactly_one_slash() {
        let body = multistatus(&["/remote.php/dav/files/u/a.jpg"]);
        let set = collect_image_hrefs(body.as_bytes(), "https://host", None);
        assert_eq!(set.as_slice(), ["https://host/remote.php/dav/files/u/a.jpg"]);
    }

    #[test]
    fn cap_keeps_first_entries() {
        let body = multistatus(&["/p/1.jpg", "/p/dir/", "/p/2.jpg", "/p/3.jpg", "/p/4.jpg"]);
        let set = collect_image_hrefs(body.as_bytes(), "http://h", Some(2));
        assert_eq!(set.as_slice(), ["http://h/p/1.jpg", "http://h/p/2.jpg"]);
    }

    #[test]
    fn unprefixed_namespace_and_entities() {
        let body = r#"<multistatus xmlns="DAV:"><response><href>/p/a&amp;b.gif</href></response></multistatus>"#;
        let set = collect_image_hrefs(body.as_bytes(), "http://h", None);
        assert_eq!(set.as_slice(), ["http://h/p/a&b.gif"]);
    }

    #[test]
    fn query_is_ignored_for_extension_check() {
        let body = multistatus(&["/p/a.jpg?version=2", "/p/b.txt?x=.jpg"]);
        let set = collect_image_hrefs(body.as_bytes(), "http://h", None);
        assert_eq!(set.as_slice(), ["http://h/p/a.jpg?version=2"]);
    }

    #[test]
    fn malformed_xml_keeps_earlier_entries() {
        let body = r#"<d:multistatus xmlns:d="DAV:"><d:response><d:href>/p/a.jpg</d:href></d:response><d:response><d:href>/p/b.jpg</d:oops>"#;
        let set = collect_image_hrefs(body.as_bytes(), "http://h", None);
        assert_eq!(set.as_slice(), ["http://h/p/a.jpg"]);
    }

    #[test]
    fn empty_body_yields_nothing() {
        assert!(collect_image_hrefs(b"", "http://h", None).is_empty());
    }
}
