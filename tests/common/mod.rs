//! A throwaway HTTP/1.1 backend serving canned responses, one per connection.

use flate2::{
    write::GzEncoder,
    Compression,
};
use std::{
    io::{
        Read,
        Write,
    },
    net::{
        TcpListener,
        TcpStream,
    },
    sync::{
        Arc,
        Mutex,
    },
    thread,
};

pub struct CannedResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json".to_string())],
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn gzipped_json(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                ("Content-Encoding", "gzip".to_string()),
            ],
            body: gzip(body.as_bytes()),
        }
    }
}

pub struct MockBackend {
    pub base_url: url::Url,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Serves `responses` in order. Connections beyond that are left hanging.
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let request = read_request(&mut stream);
                recorded.lock().unwrap().push(request);
                write_response(&mut stream, &response);
            }
        });

        Self {
            base_url: url::Url::parse(&format!("http://{addr}")).unwrap(),
            requests,
        }
    }

    /// Raw request heads received so far, lowercased.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).to_lowercase()
}

fn write_response(stream: &mut TcpStream, response: &CannedResponse) {
    let mut head = format!(
        "HTTP/1.1 {} Canned\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes()).unwrap();
    stream.write_all(&response.body).unwrap();
    stream.flush().unwrap();
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
