//! One-shot HTTP responder for exercising the fetcher without network access.

use reqwest::Url;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

pub(crate) struct OneShotServer {
    pub url: Url,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// Waits for the single request and returns its request line.
    pub fn request_line(self) -> String {
        self.handle.join().unwrap()
    }
}

/// Serves exactly one response on `127.0.0.1` and then closes.
pub(crate) fn serve_once(status_line: &str, content_type: &str, body: &str) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            let read = reader.read_line(&mut header).unwrap();
            if read == 0 || header == "\r\n" {
                break;
            }
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request_line
    });

    let url = Url::parse(&format!(
        "http://{addr}/api/psm3-download.csv?api_key=test-key&names=2020"
    ))
    .unwrap();
    OneShotServer { url, handle }
}
