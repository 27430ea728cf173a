//! The HTTP operations the list view issues against the notes server.

use log::debug;
use std::time::Duration;

use crate::models::Id;
use crate::page::{categories_from_notes, dedup_notes, parse_notes_payload, PageData};
use crate::{Error, Result};

/// Mutating requests the controller depends on. Any non-2xx status or
/// transport failure is an error; response bodies are ignored.
pub trait NotesBackend: Send + Sync {
    fn delete_note(&self, id: &Id) -> Result<()>;
    fn like_note(&self, id: &Id) -> Result<()>;
}

/// Something that can serve the paged note listing.
pub trait ListingSource: Send + Sync {
    fn fetch_listing(&self, page: u64) -> Result<PageData>;
}

/// Path of a note's detail page.
pub fn note_path(id: &Id) -> String {
    format!("/notes/{}", id)
}

pub struct HttpBackend {
    base_url: String,
    session_cookie: Option<String>,
    agent: ureq::Agent,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: None,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Send `cookie` (e.g. `session=...`) with every request.
    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a note's detail page.
    pub fn note_url(&self, id: &Id) -> String {
        format!("{}{}", self.base_url, note_path(id))
    }

    fn post(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let mut request = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json");
        if let Some(cookie) = &self.session_cookie {
            request = request.set("Cookie", cookie);
        }

        let response = request.call()?;
        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(Error::Status(status));
        }
        Ok(())
    }
}

impl ListingSource for HttpBackend {
    /// Fetch one page of the JSON listing. The listing carries no separate
    /// categories array, so categories come from the notes themselves.
    fn fetch_listing(&self, page: u64) -> Result<PageData> {
        let url = format!("{}/notes/keep", self.base_url);
        debug!("GET {} (page {})", url, page);

        let mut request = self
            .agent
            .get(&url)
            .query("format", "json")
            .query("page", &page.to_string());
        if let Some(cookie) = &self.session_cookie {
            request = request.set("Cookie", cookie);
        }

        let body = request.call()?.into_string()?;
        let (notes, pagination) = parse_notes_payload(&body)?;
        let notes = dedup_notes(notes);
        let categories = categories_from_notes(&notes);

        Ok(PageData {
            notes,
            categories,
            pagination,
        })
    }
}

impl NotesBackend for HttpBackend {
    fn delete_note(&self, id: &Id) -> Result<()> {
        self.post(&format!("/notes/{}/delete", id))
    }

    fn like_note(&self, id: &Id) -> Result<()> {
        self.post(&format!("/notes/{}/like", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve a single request with `status` and `body`; report the request line
    /// and headers back through the channel.
    fn one_shot_server(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = Vec::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push(line.trim_end().to_string());
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(head).unwrap();
        });

        (format!("http://{}", addr), rx)
    }

    #[test]
    fn test_like_posts_to_like_path() {
        let (base, rx) = one_shot_server("200 OK", "{}");
        let backend = HttpBackend::new(&base, Duration::from_secs(5))
            .with_session_cookie(Some("session=abc".to_string()));

        backend.like_note(&Id::Int(7)).unwrap();

        let head = rx.recv().unwrap();
        assert_eq!(head[0], "POST /notes/7/like HTTP/1.1");
        assert!(head.iter().any(|h| h.eq_ignore_ascii_case("content-type: application/json")));
        assert!(head.iter().any(|h| h.eq_ignore_ascii_case("cookie: session=abc")));
    }

    #[test]
    fn test_delete_error_status() {
        let (base, rx) = one_shot_server("404 Not Found", "");
        let backend = HttpBackend::new(&base, Duration::from_secs(5));

        let result = backend.delete_note(&Id::Int(3));
        assert!(matches!(result, Err(Error::Status(404))));
        assert_eq!(rx.recv().unwrap()[0], "POST /notes/3/delete HTTP/1.1");
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let backend = HttpBackend::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2));
        assert!(matches!(backend.like_note(&Id::Int(1)), Err(Error::Transport(_))));
    }

    #[test]
    fn test_fetch_listing() {
        let (base, rx) = one_shot_server(
            "200 OK",
            r##"{"items": [{"id": 1, "title": "A", "category_id": 2, "category": {"id": 2, "name": "Home", "color": "#0f0"}}], "total": 1, "page": 1, "pages": 1, "has_prev": false, "has_next": false}"##,
        );
        let backend = HttpBackend::new(&base, Duration::from_secs(5));

        let data = backend.fetch_listing(1).unwrap();
        assert_eq!(data.notes.len(), 1);
        assert_eq!(data.categories[0].name, "Home");
        assert_eq!(data.pagination.unwrap().pages, Some(1));

        let head = rx.recv().unwrap();
        assert_eq!(head[0], "GET /notes/keep?format=json&page=1 HTTP/1.1");
    }

    #[test]
    fn test_fetch_listing_later_page() {
        let (base, rx) = one_shot_server(
            "200 OK",
            r#"{"items": [{"id": 13, "title": "M"}], "total": 13, "page": 2, "pages": 2, "has_prev": true, "has_next": false, "prev_num": 1, "next_num": null}"#,
        );
        let backend = HttpBackend::new(&base, Duration::from_secs(5))
            .with_session_cookie(Some("session=abc".to_string()));

        let data = backend.fetch_listing(2).unwrap();
        let pagination = data.pagination.unwrap();
        assert_eq!(pagination.page, Some(2));
        assert_eq!(pagination.prev_num, Some(1));
        assert!(!pagination.has_next);
        assert!(data.categories.is_empty());

        let head = rx.recv().unwrap();
        assert_eq!(head[0], "GET /notes/keep?format=json&page=2 HTTP/1.1");
        assert!(head.iter().any(|h| h.eq_ignore_ascii_case("cookie: session=abc")));
    }

    #[test]
    fn test_note_url_trims_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:5000/", Duration::from_secs(1));
        assert_eq!(backend.note_url(&Id::Int(9)), "http://localhost:5000/notes/9");
        assert_eq!(note_path(&Id::from("abc")), "/notes/abc");
    }
}
