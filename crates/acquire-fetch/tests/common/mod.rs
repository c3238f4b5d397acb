//! Minimal loopback HTTP/1.1 server for download tests.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Clone)]
pub enum Route {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Empty response with this status.
    Status(u16),
    /// 200 announcing `chunk.len() * count` bytes, sent one chunk per `delay`.
    Trickle {
        chunk: Vec<u8>,
        count: usize,
        delay: Duration,
    },
}

pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    pub fn start(routes: impl IntoIterator<Item = (&'static str, Route)>) -> Self {
        let routes: Arc<HashMap<&'static str, Route>> = Arc::new(routes.into_iter().collect());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let routes = Arc::clone(&routes);
                thread::spawn(move || {
                    let _ = serve(stream, &routes);
                });
            }
        });

        Self { addr }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/file.bin")
}

fn serve(stream: TcpStream, routes: &HashMap<&'static str, Route>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" {
            break;
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let mut stream = stream;
    match routes.get(path).cloned().unwrap_or(Route::Status(404)) {
        Route::Body(body) => {
            write_head(&mut stream, 200, body.len())?;
            stream.write_all(&body)?;
        }
        Route::Status(status) => write_head(&mut stream, status, 0)?,
        Route::Trickle { chunk, count, delay } => {
            write_head(&mut stream, 200, chunk.len() * count)?;
            for _ in 0..count {
                stream.write_all(&chunk)?;
                stream.flush()?;
                thread::sleep(delay);
            }
        }
    }
    stream.flush()
}

fn write_head(stream: &mut TcpStream, status: u16, len: usize) -> std::io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {status} Test\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n"
    )
}
