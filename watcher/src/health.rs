use std::io::Write;
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct WatcherStatus {
    pub polls: u64,
    pub last_signature: Option<String>,
    pub fish_caught: u64,
    pub processed: u64,
    pub last_error: Option<String>,
}

pub type SharedStatus = Arc<Mutex<WatcherStatus>>;

fn response(status: &SharedStatus) -> String {
    let body = match status.lock() {
        Ok(s) => serde_json::to_string(&*s).unwrap_or_else(|_| "{}".to_string()),
        Err(_) => "{}".to_string(),
    };
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
}

/// Answers every connection with the current status until `running` drops.
pub fn start_health_server(
    listener: TcpListener,
    status: SharedStatus,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = listener.set_nonblocking(true) {
            error!("health listener cannot go non-blocking: {e}");
            return;
        }
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "health endpoint listening");
        }

        while running.load(Ordering::Relaxed) {
            match listener.accept() {
                Ok((mut stream, _)) => {
                    let _ = stream.write_all(response(&status).as_bytes());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => error!("health accept error: {e}"),
            }
        }
    })
}

pub fn bind_health(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(("0.0.0.0", port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpStream;

    #[test]
    fn test_health_serves_status() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let status: SharedStatus = Arc::new(Mutex::new(WatcherStatus {
            polls: 3,
            last_signature: Some("abc".to_string()),
            ..WatcherStatus::default()
        }));
        let running = Arc::new(AtomicBool::new(true));
        let handle = start_health_server(listener, status, running.clone());

        let mut stream = TcpStream::connect(addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut buf = String::new();
        stream.read_to_string(&mut buf).unwrap();
        assert!(buf.starts_with("HTTP/1.1 200 OK"));
        assert!(buf.contains("\"polls\":3"));
        assert!(buf.contains("\"last_signature\":\"abc\""));

        running.store(false, Ordering::Relaxed);
        handle.join().unwrap();
    }
}
